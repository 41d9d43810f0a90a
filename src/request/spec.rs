use crate::{Result, StormError};
use bytes::Bytes;

/// Blank line that ends an HTTP header block
pub const END_OF_HEADERS: &[u8] = b"\r\n\r\n";

/// Bytes written by every worker plus the marker that ends a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Full request written on each connection
    pub payload: Bytes,
    /// Once seen in the response, the worker stops reading. Empty disables
    /// the check.
    pub terminator: Bytes,
}

impl RequestSpec {
    pub fn new(payload: impl Into<Bytes>, terminator: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            terminator: terminator.into(),
        }
    }

    /// Creates a request terminated by the HTTP end-of-headers marker
    pub fn with_default_terminator(payload: impl Into<Bytes>) -> Self {
        Self::new(payload, Bytes::from_static(END_OF_HEADERS))
    }

    pub fn validate(&self) -> Result<()> {
        if self.payload.is_empty() {
            return Err(StormError::Config("request payload must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether the payload itself ends with the terminator
    pub fn is_terminated(&self) -> bool {
        self.terminator.is_empty() || self.payload.ends_with(&self.terminator)
    }

    /// Checks whether `response` holds the terminator, only scanning bytes
    /// at or after `from` (minus the overlap a split terminator needs)
    pub fn terminator_seen(&self, response: &[u8], from: usize) -> bool {
        let needle = self.terminator.as_ref();
        if needle.is_empty() || response.len() < needle.len() {
            return false;
        }
        let start = from.saturating_sub(needle.len() - 1);
        response[start..].windows(needle.len()).any(|w| w == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_rejected() {
        let spec = RequestSpec::with_default_terminator(Bytes::new());
        assert!(matches!(spec.validate(), Err(StormError::Config(_))));
    }

    #[test]
    fn test_is_terminated() {
        assert!(RequestSpec::with_default_terminator("STOP\r\n\r\n").is_terminated());
        assert!(!RequestSpec::with_default_terminator("STOP").is_terminated());
        assert!(RequestSpec::new("STOP", Bytes::new()).is_terminated());
    }

    #[test]
    fn test_terminator_seen_across_chunks() {
        let spec = RequestSpec::with_default_terminator("x");
        let response = b"HTTP/1.1 200 OK\r\n\r\n";
        // Terminator straddles the boundary between the previous and new chunk
        assert!(spec.terminator_seen(response, response.len() - 2));
        assert!(!spec.terminator_seen(b"HTTP/1.1 200 OK\r\n", 0));
    }

    #[test]
    fn test_empty_terminator_never_seen() {
        let spec = RequestSpec::new("x", Bytes::new());
        assert!(!spec.terminator_seen(b"\r\n\r\n", 0));
    }
}
