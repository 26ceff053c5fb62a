use clap::Parser;

use atc_types::Mode;

#[derive(Parser)]
#[command(name = "atctower")]
#[command(about = "Realtime ops dashboard for issues, inference hosts, and experiment runs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Operating profile: planning, active, or experiment
    #[arg(long, default_value = "planning")]
    pub mode: Mode,

    /// Issue-tracker owner (planning mode)
    #[arg(long, default_value = "atctower")]
    pub owner: String,

    /// Issue-tracker repository (planning mode)
    #[arg(long, default_value = "atctower")]
    pub repo: String,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
