use crate::utils::error::{Result, UsersError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UsersError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// A resource path is joined onto the base URL, so it must be absolute.
pub fn validate_resource_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if !path.starts_with('/') {
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Resource path must start with '/'".to_string(),
        });
    }

    // "//host/path" is scheme-relative and would leave the base host.
    if path.starts_with("//") {
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Resource path cannot start with '//'".to_string(),
        });
    }

    if path.chars().any(char::is_whitespace) {
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Resource path cannot contain whitespace".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_ordered<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    low: T,
    high: T,
) -> Result<()> {
    if low > high {
        return Err(UsersError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..={}", low, high),
            reason: "Lower bound must not exceed upper bound".to_string(),
        });
    }
    Ok(())
}
