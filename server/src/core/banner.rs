//! Startup banner and URL display

use super::constants::APP_NAME;

/// Print the startup banner with the listening address and useful URLs
pub fn print_banner(host: &str, port: u16, data_dir: &str) {
    let display_host = if host == "0.0.0.0" { "localhost" } else { host };

    println!();
    println!("  {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!();
    println!("  API:      http://{}:{}/api/v1", display_host, port);
    println!("  Docs:     http://{}:{}/api/docs", display_host, port);
    println!("  Health:   http://{}:{}/api/v1/health", display_host, port);
    println!("  Data:     {}", data_dir);
    println!();
}
