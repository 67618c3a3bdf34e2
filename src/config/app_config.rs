use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts},
};

use super::probe_config::ProbeSettings;

pub struct AppConfig {
    pub settings: ProbeSettings,
    pub source: String,
}

/// Load the application configuration from an optional YAML file.
/// Without a path every setting keeps its default value.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig {
            settings: ProbeSettings::default(),
            source: "defaults".to_string(),
        });
    };

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    // An empty file is a valid "all defaults" config
    let settings: ProbeSettings = if config_str.trim().is_empty() {
        ProbeSettings::default()
    } else {
        serde_yaml::from_str(&config_str)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    };

    Ok(AppConfig {
        settings,
        source: path.display().to_string(),
    })
}

/// Setup the TLS connector used for every probe.
/// Certificates are verified with the platform defaults.
pub fn setup_tls_connector() -> Result<TokioTlsConnector, native_tls::Error> {
    let connector = native_tls::TlsConnector::builder().build()?;
    Ok(TokioTlsConnector::from(connector))
}

/// Setup a DNS resolver using the provided DNS hosts.
/// Returns `None` when no hosts are given, in which case the system resolver is used.
/// The resolver makes 2 attempts per lookup with a 100 millisecond timeout each.
pub fn setup_resolver(dns_hosts: &[String]) -> anyhow::Result<Option<TokioAsyncResolver>> {
    if dns_hosts.is_empty() {
        return Ok(None);
    }

    let mut opts = ResolverOpts::default();
    opts.attempts = 2;
    opts.timeout = Duration::from_millis(100);
    opts.cache_size = 1024;

    let mut name_servers = NameServerConfigGroup::new();

    for host in dns_hosts {
        let ip: IpAddr = host
            .trim()
            .parse()
            .with_context(|| format!("Invalid DNS host '{host}'"))?;
        name_servers.push(NameServerConfig {
            socket_addr: (ip, 53).into(),
            protocol: Protocol::Tcp,
            tls_dns_name: None,
            trust_negative_responses: false,
            bind_addr: None,
        });
    }

    log::info!("Using DNS hosts: {:?}", dns_hosts);

    let resolver_config = ResolverConfig::from_parts(None, vec![], name_servers);
    Ok(Some(TokioAsyncResolver::tokio(resolver_config, opts)))
}
