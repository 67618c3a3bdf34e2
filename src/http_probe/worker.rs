use std::time::Instant;

use super::prelude::*;
use super::probe::Transport;
use crate::config::probe_config::ProbeSettings;
use crate::target::{Target, parse_url};

const LOCATION_HEADER: &str = "Location: ";

pub const RESPONSE_BANNER: &str = "------------------------Response------------------------";
pub const RESPONSE_FOOTER: &str = "--------------------------------------------------------";

/// Outcome of a single hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Redirect(Target),
    Terminal(RawResponse),
}

/// Finds the redirect destination in a raw 3xx response.
/// Relative locations stay on the host that issued the redirect.
pub fn redirect_target(response: &str, current: &Target) -> Option<Target> {
    let start = response.find(LOCATION_HEADER)? + LOCATION_HEADER.len();
    let rest = &response[start..];
    let location = rest[..rest.find('\n').unwrap_or(rest.len())].trim();

    // protocol relative: `//host/path`
    if let Some(authority) = location.strip_prefix("//") {
        return Some(parse_url(authority));
    }
    if location.starts_with('/') {
        return Some(Target {
            host: current.host.clone(),
            path: location.to_string(),
        });
    }
    Some(parse_url(location))
}

/// Executes one request and decides whether the chain continues.
pub async fn step<T>(transport: &T, target: &Target) -> Result<Step, ProbeError>
where
    T: Transport + ?Sized,
{
    let response = transport.execute(target).await?;
    if !response.is_redirect() {
        return Ok(Step::Terminal(response));
    }

    redirect_target(&response.text(), target)
        .map(Step::Redirect)
        .ok_or_else(|| ProbeError::MissingLocation {
            target: target.to_string(),
            status: response.status_code,
        })
}

pub fn format_response(response: &RawResponse) -> String {
    format!("{RESPONSE_BANNER}\n{}\n{RESPONSE_FOOTER}", response.text())
}

/// Runs a full probe: follows redirects from `target` until a terminal status.
/// The elapsed time covers every hop of the chain.
pub async fn follow_redirects<T>(
    transport: &T,
    target: Target,
    settings: &ProbeSettings,
    print_response: bool,
) -> Result<ProbeResult, ProbeError>
where
    T: Transport + ?Sized,
{
    let start = Instant::now();
    let mut current = target;
    let mut hops = 0usize;

    let response = loop {
        match step(transport, &current).await? {
            Step::Terminal(response) => break response,
            Step::Redirect(next) => {
                if settings.redirect_limit_reached(hops) {
                    return Err(ProbeError::TooManyRedirects {
                        limit: settings.max_redirects,
                        target: current.to_string(),
                    });
                }
                log::debug!("Redirect {current} -> {next}");
                hops += 1;
                current = next;
            }
        }
    };

    if print_response {
        println!("{}", format_response(&response));
    }

    Ok(ProbeResult {
        status_code: response.status_code,
        time_taken_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        response_size: response.bytes.len(),
    })
}
