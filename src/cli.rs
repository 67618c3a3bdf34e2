use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::LazyLock;

use clap::Parser;
use clap::error::ErrorKind;
use regex::Regex;

use crate::profile::RunMode;

pub const USAGE: &str = "Usage:\n\t\ttlsprobe --url <Url>\n\t\ttlsprobe --url <Url> --profile <Number of requests>";

const INVALID_ARGUMENTS: &str = "Invalid/Missing  Arguments";

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?[\w.-]+(?:\.[\w.-]+)+[\w\-._\~:/?\#\[\]@!$\&'()*+,;=]+$")
        .expect("URL pattern is valid")
});

#[derive(Parser, Debug)]
#[command(name = "tlsprobe")]
#[command(version)]
#[command(about = "Probe an HTTPS endpoint with a raw HTTP/1.0 request", long_about = None)]
#[command(override_usage = "tlsprobe --url <Url>\n       tlsprobe --url <Url> --profile <Number of requests>")]
pub struct Cli {
    /// URL to probe, the scheme is optional
    #[arg(long, value_name = "Url", value_parser = parse_url_arg)]
    pub url: String,

    /// Repeat the probe and print latency statistics
    #[arg(long, value_name = "Number of requests", value_parser = parse_count)]
    pub profile: Option<usize>,

    /// Optional YAML file with probe settings
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_mode(&self) -> RunMode {
        match self.profile {
            Some(count) => RunMode::Profile(count),
            None => RunMode::Single,
        }
    }
}

/// Parses the command line.
///
/// When the arguments do not describe a run, the error holds the text to print instead:
/// the help or version text, or `Error: <reason>` followed by the usage. The process exits
/// with code 0 in both cases.
pub fn parse_args<I, T>(args: I) -> Result<Cli, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.to_string(),
        _ => {
            // value parser failures carry our own message as their source
            let reason = std::error::Error::source(&err)
                .map(|source| source.to_string())
                .unwrap_or_else(|| INVALID_ARGUMENTS.to_string());
            format!("Error: {reason}\n{USAGE}\n")
        }
    })
}

/// Host with at least one dot separated label, scheme optional.
pub fn validate_url(raw: &str) -> bool {
    URL_PATTERN.is_match(&raw.to_lowercase())
}

fn parse_url_arg(raw: &str) -> Result<String, String> {
    if validate_url(raw) {
        Ok(raw.to_string())
    } else {
        Err("Invalid <Url>".to_string())
    }
}

/// Repetition counts must be whole numbers of at least one.
pub fn parse_count(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err("Invalid <Number of requests>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com"));
        assert!(validate_url("http://example.com/foo"));
        assert!(validate_url("WWW.Example.org/path?q=1&x=[2]"));
        assert!(validate_url("sub.domain.example.co.uk"));
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(!validate_url("localhost"));
        assert!(!validate_url("https://"));
        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("exa mple.com"));
        assert!(!validate_url(""));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1"), Ok(1));
        assert_eq!(parse_count("25"), Ok(25));
        assert!(parse_count("0").is_err());
        assert!(parse_count("-3").is_err());
        assert!(parse_count("ten").is_err());
    }

    #[test]
    fn test_cli_single_probe() {
        let cli = Cli::try_parse_from(["tlsprobe", "--url", "https://example.com"]).unwrap();
        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.run_mode(), RunMode::Single);
    }

    #[test]
    fn test_cli_profile() {
        let cli = Cli::try_parse_from([
            "tlsprobe",
            "--url",
            "example.com/foo",
            "--profile",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.run_mode(), RunMode::Profile(4));
    }

    #[test]
    fn test_cli_rejects_zero_count() {
        let err = Cli::try_parse_from([
            "tlsprobe",
            "--url",
            "http://example.com/foo",
            "--profile",
            "0",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Invalid <Number of requests>"));
    }

    #[test]
    fn test_cli_rejects_invalid_url() {
        let err = Cli::try_parse_from(["tlsprobe", "--url", "nodots"]).unwrap_err();
        assert!(err.to_string().contains("Invalid <Url>"));
    }

    #[test]
    fn test_cli_requires_url() {
        assert!(Cli::try_parse_from(["tlsprobe", "--profile", "3"]).is_err());
    }

    #[test]
    fn test_parse_args_zero_count_prints_usage() {
        let message = parse_args(["tlsprobe", "--url", "http://example.com/foo", "--profile", "0"])
            .unwrap_err();
        assert_eq!(message, format!("Error: Invalid <Number of requests>\n{USAGE}\n"));
    }

    #[test]
    fn test_parse_args_invalid_url_prints_usage() {
        let message = parse_args(["tlsprobe", "--url", "nodots"]).unwrap_err();
        assert_eq!(message, format!("Error: Invalid <Url>\n{USAGE}\n"));
    }

    #[test]
    fn test_parse_args_other_shapes_print_usage() {
        for args in [
            vec!["tlsprobe"],
            vec!["tlsprobe", "--url"],
            vec!["tlsprobe", "--url", "example.com", "--profile"],
            vec!["tlsprobe", "--url", "example.com", "--verbose"],
        ] {
            let message = parse_args(args.clone()).unwrap_err();
            assert_eq!(
                message,
                format!("Error: Invalid/Missing  Arguments\n{USAGE}\n"),
                "args: {args:?}"
            );
        }
    }

    #[test]
    fn test_parse_args_help_is_printed() {
        let message = parse_args(["tlsprobe", "--help"]).unwrap_err();
        assert!(message.contains("--url <Url>"));
        assert!(!message.starts_with("Error:"));
    }

    #[test]
    fn test_parse_args_valid_run() {
        let cli = parse_args(["tlsprobe", "--url", "example.com", "--profile", "3"]).unwrap();
        assert_eq!(cli.run_mode(), RunMode::Profile(3));
    }

    #[test]
    fn test_cli_help() {
        let err = Cli::try_parse_from(["tlsprobe", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
