use std::sync::Arc;

pub mod cli;
pub mod config;
pub mod http_probe;
pub mod profile;
pub mod target;

use cli::{USAGE, parse_args};
use config::app_config::{load_config, setup_resolver, setup_tls_connector};
use http_probe::{probe::TlsTransport, report};
use profile::run_tasks;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(message) => {
            // help, version and argument errors all end the run with exit code 0
            print!("{message}");
            return Ok(());
        }
    };
    let app_config = load_config(cli.config.as_deref())?;
    log::info!("Using probe settings from {}", app_config.source);

    let settings = app_config.settings;
    let connector = setup_tls_connector()?;
    let resolver = setup_resolver(&settings.dns_hosts)?;
    let transport = Arc::new(TlsTransport::new(connector, resolver, settings.clone()));

    match run_tasks(transport, &cli.url, cli.run_mode(), &settings).await {
        Ok(Some(summary)) => println!("{summary}"),
        Ok(None) => {}
        Err(e) => {
            let kind = if e.is_connection_error() {
                "Connection failure"
            } else {
                "Protocol error"
            };
            log::error!("{kind} while probing {}: {e}", cli.url);
            // Probe failures end the run like a completed one, exit code 0
            println!("Error: {}\n{USAGE}", report(&e));
        }
    }

    Ok(())
}
