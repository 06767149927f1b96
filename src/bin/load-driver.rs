//! Load driver binary.
//!
//! Generates weighted traffic against the simulated service at a fixed
//! target rate; chaos mode skews selection toward the slow endpoint and
//! layers an independent forced-error probability on top.

use clap::Parser;

use synthload::config::{self, DriverConfig};
use synthload::driver::LoadDriver;
use synthload::lifecycle::{signals, Shutdown};
use synthload::observability::logging;

#[derive(Parser)]
#[command(name = "load-driver")]
#[command(about = "Fixed-rate traffic generator for the simulated service", long_about = None)]
struct Cli {
    /// Target base URL (overrides TARGET_URL).
    #[arg(short, long)]
    target: Option<String>,

    /// Dispatch rate in requests per second (overrides RATE).
    #[arg(short, long)]
    rate: Option<f64>,

    /// Enable chaos mode (overrides CHAOS_MODE).
    #[arg(long)]
    chaos: bool,

    /// Cap on concurrently outstanding requests (overrides MAX_IN_FLIGHT).
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Seed for the selection and chaos rngs (overrides RNG_SEED).
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply(self, mut config: DriverConfig) -> DriverConfig {
        if let Some(target) = self.target {
            config.target_url = target;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        if self.chaos {
            config.chaos = true;
        }
        if let Some(cap) = self.max_in_flight {
            config.max_in_flight = Some(cap);
        }
        if let Some(seed) = self.seed {
            config.rng_seed = Some(seed);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("load_driver=info,synthload=info");

    let cli = Cli::parse();
    let config = cli.apply(config::driver_config_from_env()?);

    let shutdown = Shutdown::new();
    let driver_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    // LoadDriver::new re-validates rate and target, covering CLI overrides
    // that bypassed the environment loader's checks.
    let driver = LoadDriver::new(&config)?;
    driver.run(driver_shutdown).await;

    Ok(())
}
