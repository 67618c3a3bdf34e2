use std::time::Duration;

use thiserror::Error;

/// Everything that can stop a probe before it yields a terminal response.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to resolve {host}: {message}")]
    Resolve { host: String, message: String },

    #[error("failed to connect to {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("connecting to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[error("TLS handshake with {host} failed")]
    Tls {
        host: String,
        #[source]
        source: native_tls::Error,
    },

    #[error("I/O error while talking to {host}")]
    Io {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed status line in response from {host}: {line:?}")]
    MalformedStatusLine { host: String, line: String },

    #[error("{status} response from {target} has no Location header")]
    MissingLocation { target: String, status: u16 },

    #[error("gave up after {limit} redirects, last target {target}")]
    TooManyRedirects { limit: usize, target: String },

    #[error("probe worker exited without delivering a result")]
    WorkerLost,
}

impl ProbeError {
    /// Transport level failures: resolution, dial, handshake and socket I/O.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ProbeError::Resolve { .. }
                | ProbeError::Connect { .. }
                | ProbeError::ConnectTimeout { .. }
                | ProbeError::Tls { .. }
                | ProbeError::Io { .. }
        )
    }
}
