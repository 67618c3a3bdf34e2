use serde::Deserialize;

/// Settings shared by every probe of a run.
/// All fields are optional in the YAML file and fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Upper bound for the TCP connect plus the TLS handshake, in seconds.
    pub connect_timeout_seconds: u64,

    /// Destination port of every probe.
    pub port: u16,

    /// Maximum number of redirects followed within a single probe.
    /// `0` disables the limit.
    pub max_redirects: usize,

    /// Name servers to resolve target hosts with.
    /// When empty, the system resolver is used.
    pub dns_hosts: Vec<String>,
}

pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            port: DEFAULT_PORT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            dns_hosts: Vec::new(),
        }
    }
}

impl ProbeSettings {
    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Returns true when `hops` redirects exhaust the configured limit.
    pub fn redirect_limit_reached(&self, hops: usize) -> bool {
        self.max_redirects != 0 && hops >= self.max_redirects
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.connect_timeout_seconds, 5);
        assert_eq!(settings.port, 443);
        assert_eq!(settings.max_redirects, 10);
        assert!(settings.dns_hosts.is_empty());
    }

    #[test]
    fn test_settings_deserialization() {
        let yaml = r#"
                    connect_timeout_seconds: 2
                    max_redirects: 3
                    dns_hosts: ["1.1.1.1", "8.8.8.8"]
                                    "#;

        let settings: ProbeSettings = serde_yaml::from_str(yaml).expect("Invalid YAML");
        assert_eq!(settings.connect_timeout_seconds, 2);
        assert_eq!(settings.max_redirects, 3);
        assert_eq!(settings.dns_hosts, vec!["1.1.1.1", "8.8.8.8"]);
        // omitted fields keep their defaults
        assert_eq!(settings.port, 443);
    }

    #[test]
    fn test_unknown_settings_are_rejected() {
        // certificate checks always use the platform defaults, there is no knob to relax them
        let yaml = "accept_invalid_certs: true";
        assert!(serde_yaml::from_str::<ProbeSettings>(yaml).is_err());
    }

    #[test]
    fn test_redirect_limit() {
        let mut settings = ProbeSettings::default();
        settings.max_redirects = 2;
        assert!(!settings.redirect_limit_reached(1));
        assert!(settings.redirect_limit_reached(2));

        settings.max_redirects = 0;
        assert!(!settings.redirect_limit_reached(10_000));
    }
}
