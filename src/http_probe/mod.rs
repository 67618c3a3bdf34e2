pub mod error;
pub mod probe;
pub mod result;
pub mod worker;

pub mod prelude {
    pub use super::error::ProbeError;
    pub use super::result::{ProbeResult, RawResponse};
}

use std::fmt::Write;

/// Renders an error followed by its whole `source()` chain.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::*;

    #[test]
    fn test_report_includes_cause_chain() {
        let err = ProbeError::Connect {
            host: "example.com".into(),
            port: 443,
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert_eq!(
            report(&err),
            "failed to connect to example.com:443\n\nCaused by: refused"
        );
    }

    #[test]
    fn test_report_without_source() {
        assert_eq!(
            report(&ProbeError::WorkerLost),
            "probe worker exited without delivering a result"
        );
    }
}
