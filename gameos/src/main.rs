//! GameOS terminal application.
//!
//! Runs the gamified OS simulation over stdin/stdout:
//!
//! ```bash
//! cargo run -p gameos -- --name neo --seed 42
//! ```
//!
//! Configuration comes from `GAMEOS_*` environment variables (a `.env` file
//! is loaded if present) and is overridden by command line flags.

mod headless;

use anyhow::Result;
use gameos_core::SessionConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = headless::parse_config_from_args(&args, SessionConfig::from_env()?)?;
    headless::run_headless(config)
}

fn print_help() {
    println!("GameOS - a gamified operating system simulation");
    println!();
    println!("USAGE:");
    println!("  gameos [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help              Show this help message");
    println!("  --name <NAME>           Player name (default: $GAMEOS_PLAYER or player)");
    println!("  --seed <SEED>           Seed for missions and simulated memory");
    println!("  --streak <DAYS>         Login streak carried into the session");
    println!("  --reward-repeat-kills   Reward killing an already-terminated process");
    println!();
    println!("ENVIRONMENT:");
    println!("  GAMEOS_PLAYER, GAMEOS_SEED, GAMEOS_LOGIN_STREAK, GAMEOS_REWARD_REPEAT_KILLS");
    println!("  RUST_LOG                Log filter (default: warn)");
}
