//! Counter/histogram consistency in the rendered exposition.

mod common;

use std::sync::OnceLock;

use metrics_exporter_prometheus::PrometheusHandle;
use synthload::config::ServiceConfig;
use synthload::observability::metrics::{
    install_exporter, REQUESTS_IN_FLIGHT, REQUEST_DURATION_SECONDS, REQUESTS_TOTAL,
};

/// The process-wide recorder can only be installed once; every test in
/// this binary shares it, so tests keep their label tuples disjoint.
fn exporter() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| install_exporter().expect("exporter installs once"))
        .clone()
}

fn test_config() -> ServiceConfig {
    ServiceConfig {
        rng_seed: Some(31),
        ..ServiceConfig::default()
    }
}

/// Find a sample value by metric name and label pairs, order-agnostic.
fn scrape(rendered: &str, metric: &str, route: &str, status: &str, le: Option<&str>) -> f64 {
    rendered
        .lines()
        .find(|line| {
            line.starts_with(&format!("{metric}{{"))
                && line.contains(&format!("route=\"{route}\""))
                && line.contains("method=\"GET\"")
                && line.contains(&format!("status=\"{status}\""))
                && match le {
                    Some(bound) => line.contains(&format!("le=\"{bound}\"")),
                    None => !line.contains("le=\""),
                }
        })
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| panic!("no sample for {metric} route={route} status={status} le={le:?}"))
}

#[tokio::test]
async fn counter_equals_histogram_count_for_every_tuple() {
    let handle = exporter();
    let (addr, _recorder, shutdown) =
        common::spawn_service_with_handle(test_config(), Some(handle.clone())).await;
    let client = reqwest::Client::new();

    for _ in 0..7 {
        let res = client
            .get(format!("http://{addr}/api/users"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }
    for _ in 0..3 {
        let res = client
            .get(format!("http://{addr}/api/users"))
            .header("x-force-error", "true")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 500);
    }
    for _ in 0..5 {
        let res = client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let rendered = handle.render();
    let duration_count = format!("{REQUEST_DURATION_SECONDS}_count");
    let duration_bucket = format!("{REQUEST_DURATION_SECONDS}_bucket");

    for (route, status, expected) in [
        ("/api/users", "200", 7.0),
        ("/api/users", "500", 3.0),
        ("/health", "200", 5.0),
    ] {
        let counted = scrape(&rendered, REQUESTS_TOTAL, route, status, None);
        let observed = scrape(&rendered, &duration_count, route, status, None);
        let inf_bucket = scrape(&rendered, &duration_bucket, route, status, Some("+Inf"));

        assert_eq!(counted, expected, "{route} {status} counter");
        assert_eq!(counted, observed, "{route} {status} counter vs histogram count");
        assert_eq!(counted, inf_bucket, "{route} {status} counter vs +Inf bucket");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn exposition_exposes_the_gauge_and_the_fixed_buckets() {
    let handle = exporter();
    let (addr, _recorder, shutdown) =
        common::spawn_service_with_handle(test_config(), Some(handle)).await;
    let client = reqwest::Client::new();

    // One forced orders failure gives this test its own label tuple.
    let res = client
        .get(format!("http://{addr}/api/orders"))
        .header("x-force-error", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    // The service serves its own exposition.
    let body = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains(&format!("# TYPE {REQUESTS_IN_FLIGHT} gauge")));
    assert!(body.contains(&format!("# TYPE {REQUESTS_TOTAL} counter")));
    assert!(body.contains(&format!("# TYPE {REQUEST_DURATION_SECONDS} histogram")));
    assert!(body.contains("le=\"0.005\""));
    assert!(body.contains("le=\"10\""));
    assert!(body.contains("le=\"+Inf\""));
    assert!(body.contains("route=\"/api/orders\""));

    shutdown.trigger();
}
