use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// Regex for category display colors
    /// Six or three hex digits, optionally prefixed with '#'
    /// - Valid: "#8B5CF6", "8b5cf6", "#fff"
    /// - Invalid: "bg-blue-500", "#12345", "purple"
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#?(?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").unwrap();
}

/// Validator hook for `#[validate(custom(function = "validate_hex_color"))]`
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a hex value such as #8B5CF6".into());
        Err(err)
    }
}

/// Ensure a color is stored with its leading '#'
pub fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{}", trimmed)
    }
}

/// Build a case-insensitive substring pattern for ILIKE, escaping wildcards
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Single-field error for checks that need more than the derive can express
pub fn invalid_field(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationErrors {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Trim a required text field, rejecting values that are blank once trimmed
pub fn required_text(
    field: &'static str,
    value: &str,
    message: &'static str,
) -> Result<String, ValidationErrors> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid_field(field, "required", message));
    }
    Ok(trimmed.to_string())
}

/// Flatten validator errors into "field: message" strings, sorted by field
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(|e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value ({})", field, e.code),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    messages.sort();
    messages
}
