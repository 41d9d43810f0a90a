/// Outcome of one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResult {
    pub succeeded: bool,
    /// Why the exchange failed; `None` on success
    pub error_detail: Option<String>,
    /// Response bytes collected before the connection was closed
    pub bytes_received: usize,
}

impl WorkerResult {
    pub fn success(bytes_received: usize) -> Self {
        Self {
            succeeded: true,
            error_detail: None,
            bytes_received,
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error_detail: Some(detail.into()),
            bytes_received: 0,
        }
    }
}
