use std::borrow::Cow;

/// A response exactly as read from the wire, plus the status code sniffed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub bytes: Vec<u8>,
    pub status_code: u16,
}

impl RawResponse {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }
}

/// Outcome of one probe: the terminal response of a redirect chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub status_code: u16,
    /// Measured from the first hop, so it covers every redirect.
    pub time_taken_ms: u64,
    /// Byte length of the terminal response, headers included.
    pub response_size: usize,
}
