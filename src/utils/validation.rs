use crate::utils::error::{MolluskError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MolluskError {
    MolluskError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute http(s) URLs with a host. Template escapes (`\:`) must be expanded first.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, url_str, "URL has no host"));
    }
    Ok(url)
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| invalid(field_name, addr, format!("Invalid socket address: {}", e)))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
