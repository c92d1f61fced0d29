//! Web server command.

use console::style;

use crate::config::{Settings, DEFAULT_BIND};

/// Start the web server.
pub async fn cmd_serve(settings: &Settings) -> anyhow::Result<()> {
    println!(
        "{} Uploads stored in {}",
        style("→").cyan(),
        settings.upload_dir.display()
    );
    if settings.llm.is_configured() {
        println!(
            "  {} Analysis via {:?} ({})",
            style("✓").green(),
            settings.llm.provider,
            settings.llm.model
        );
    } else {
        println!(
            "  {} No LLM API key configured; analysis requests will fail",
            style("!").yellow()
        );
    }

    println!(
        "{} Starting document wizard at http://{}",
        style("→").cyan(),
        settings.bind
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings).await
}

fn default_port() -> u16 {
    DEFAULT_BIND
        .rsplit_once(':')
        .and_then(|(_, port)| port.parse().ok())
        .unwrap_or(5002)
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> 127.0.0.1:8080
/// - Just a host: "0.0.0.0" -> 0.0.0.0:5002
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
pub fn parse_bind_address(bind: &str) -> String {
    if let Ok(port) = bind.parse::<u16>() {
        return format!("127.0.0.1:{}", port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if port_str.parse::<u16>().is_ok() {
            return format!("{}:{}", host, port_str);
        }
    }

    format!("{}:{}", bind, default_port())
}
