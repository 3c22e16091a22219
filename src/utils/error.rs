use thiserror::Error;

#[derive(Error, Debug)]
pub enum MolluskError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Request to {url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Unresolved reference: {name}")]
    UnresolvedReference { name: String },

    #[error("Invalid URL template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl MolluskError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            MolluskError::Http(e) if e.is_connect() => {
                "Could not reach the mollusk server. Is it running?".to_string()
            }
            MolluskError::Http(e) if e.is_timeout() => {
                "The mollusk server did not answer in time".to_string()
            }
            MolluskError::Status { status: 404, url } => {
                format!("Nothing found at {}", url)
            }
            MolluskError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            MolluskError::ConfigError { .. }
            | MolluskError::InvalidConfigValueError { .. }
            | MolluskError::InvalidTemplate { .. }
            | MolluskError::TomlError(_)
            | MolluskError::UrlError(_) => 2,
            MolluskError::Http(_) | MolluskError::Status { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, MolluskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        let config = MolluskError::ConfigError {
            message: "missing".to_string(),
        };
        assert_eq!(config.exit_code(), 2);

        let status = MolluskError::Status {
            status: 500,
            url: "http://localhost:31415/mollusk".to_string(),
        };
        assert_eq!(status.exit_code(), 3);

        let unresolved = MolluskError::UnresolvedReference {
            name: "Mollusk".to_string(),
        };
        assert_eq!(unresolved.exit_code(), 1);
    }

    #[test]
    fn test_not_found_message() {
        let err = MolluskError::Status {
            status: 404,
            url: "http://localhost:31415/mollusk/abc".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "Nothing found at http://localhost:31415/mollusk/abc"
        );
    }
}
