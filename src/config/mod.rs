pub mod cli;
pub mod consts;
pub mod network;

// Re-export for convenience
pub use cli::{AppConfig, CliArgs, Command};
pub use network::{NetworkConfig, load_network_config};
