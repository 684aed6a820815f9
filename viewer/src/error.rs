use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Archive API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ViewerError {
    /// Whether the archive answered but had nothing under the requested id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewerError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ViewerError::Api {
            status: 502,
            message: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "Archive API error 502: upstream down");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ViewerError = parse.unwrap_err().into();
        assert!(matches!(err, ViewerError::Json(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        assert!(ViewerError::NotFound("abc".to_string()).is_not_found());
    }
}
