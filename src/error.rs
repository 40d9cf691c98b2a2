// 🚨 Error types - fatal pipeline errors vs. recoverable source failures

use thiserror::Error;

/// Errors that stop the pipeline.
///
/// `CriticalDataMissing` is the only one raised by the consolidation core;
/// the rest come from writing report artifacts.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Critical data missing: {} empty", missing.join(" and "))]
    CriticalDataMissing { missing: Vec<String> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn is_critical_data_missing(&self) -> bool {
        matches!(self, PipelineError::CriticalDataMissing { .. })
    }

    /// Process exit status for this failure: 1 when the critical sources are
    /// empty, 2 when reports could not be written.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::CriticalDataMissing { .. } => 1,
            PipelineError::Io(_) | PipelineError::Csv(_) | PipelineError::Json(_) => 2,
        }
    }
}

/// Why a single source could not be read. Never fatal: the source is
/// replaced by an empty table.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status code {0}")]
    HttpStatus(u16),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_data_missing_message() {
        let err = PipelineError::CriticalDataMissing {
            missing: vec!["sales".to_string(), "products".to_string()],
        };

        assert!(err.is_critical_data_missing());
        assert_eq!(err.to_string(), "Critical data missing: sales and products empty");
    }

    #[test]
    fn test_exit_codes() {
        let missing = PipelineError::CriticalDataMissing {
            missing: vec!["products".to_string()],
        };
        let io = PipelineError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));

        assert_eq!(missing.exit_code(), 1);
        assert_eq!(io.exit_code(), 2);
    }

    #[test]
    fn test_http_status_message() {
        assert_eq!(
            SourceError::HttpStatus(503).to_string(),
            "API returned status code 503"
        );
    }
}
