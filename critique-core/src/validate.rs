// Pre-flight checks. Both run before any network call is attempted.

use crate::config::LimitsSection;
use crate::error::ValidationError;

pub const API_KEY_PREFIX: &str = "sk-or-";
pub const MIN_API_KEY_LEN: usize = 30;

/// Check the shape of an OpenRouter credential. Returns the trimmed key.
pub fn validate_api_key(key: &str) -> Result<&str, ValidationError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::EmptyApiKey);
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(ValidationError::ApiKeyPrefix {
            prefix: API_KEY_PREFIX,
        });
    }
    if key.chars().count() < MIN_API_KEY_LEN {
        return Err(ValidationError::ApiKeyTooShort);
    }
    Ok(key)
}

/// Check code length against `limits`, counting characters of the trimmed input.
pub fn validate_code(code: &str, limits: &LimitsSection) -> Result<(), ValidationError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyCode);
    }
    let len = trimmed.chars().count();
    if len < limits.min_code_length {
        return Err(ValidationError::CodeTooShort {
            min: limits.min_code_length,
        });
    }
    if len > limits.max_code_length {
        return Err(ValidationError::CodeTooLong {
            max: limits.max_code_length,
        });
    }
    Ok(())
}
