use std::fmt;

/// An endpoint to probe: a bare host and an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub path: String,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.path)
    }
}

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Splits a raw URL into host and path.
///
/// A leading `http://` or `https://` is dropped regardless of case. The host is everything up
/// to the first `/`, and the path is the rest, defaulting to `/`. Nothing is rejected here:
/// garbage in gives a host that fails to connect later.
pub fn parse_url(raw: &str) -> Target {
    let mut rest = raw.trim();
    for scheme in SCHEMES {
        if rest
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        {
            rest = &rest[scheme.len()..];
            break;
        }
    }

    match rest.find('/') {
        Some(index) => Target {
            host: rest[..index].to_ascii_lowercase(),
            path: rest[index..].to_string(),
        },
        None => Target {
            host: rest.to_ascii_lowercase(),
            path: "/".to_string(),
        },
    }
}
