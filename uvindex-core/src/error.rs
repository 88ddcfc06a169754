use thiserror::Error;

/// Failure of a single refresh.
///
/// Every cause (transport error, timeout, non-200 status, unparseable body)
/// collapses into `FetchFailed` with a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UvError {
    #[error("Error fetching data: {0}")]
    FetchFailed(String),
}

impl UvError {
    pub fn detail(&self) -> &str {
        match self {
            UvError::FetchFailed(detail) => detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failed_display_carries_detail() {
        let err = UvError::FetchFailed("status 503".into());
        assert_eq!(err.to_string(), "Error fetching data: status 503");
        assert_eq!(err.detail(), "status 503");
    }
}
