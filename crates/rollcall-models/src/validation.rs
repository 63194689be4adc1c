//! Shared custom validators for request DTOs.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

static DEPARTMENT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+$").expect("valid department code pattern"));

pub(crate) fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub(crate) fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", message));
    }
    Ok(())
}

pub(crate) fn department_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(error("required", "Department name is required"));
    }
    if name.chars().count() < 2 {
        return Err(error(
            "length",
            "Department name must be at least 2 characters",
        ));
    }
    Ok(())
}

pub(crate) fn department_code(code: &str) -> Result<(), ValidationError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(error("required", "Department code is required"));
    }
    if code.chars().count() < 2 {
        return Err(error(
            "length",
            "Department code must be at least 2 characters",
        ));
    }
    if !DEPARTMENT_CODE_RE.is_match(code) {
        return Err(error(
            "pattern",
            "Department code must contain only uppercase letters and numbers",
        ));
    }
    Ok(())
}
