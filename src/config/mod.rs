pub mod spec;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "reqargs")]
#[command(about = "Apply a declarative argument spec to a captured request")]
pub struct CliConfig {
    /// TOML spec file declaring the expected arguments
    #[arg(long)]
    pub spec: String,

    /// JSON file with the captured request (method, url, json, form, headers, cookies)
    #[arg(long)]
    pub request: String,

    /// Override the location priority, e.g. --locations json,headers
    #[arg(long, value_delimiter = ',')]
    pub locations: Vec<String>,

    #[arg(long, help = "Pretty-print the parsed output")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
