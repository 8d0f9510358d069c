//! Input contracts for tools.
//!
//! Each tool declares a typed input struct. Serde supplies structure and
//! documented defaults; [`ValidateInput`] supplies the rules serde cannot
//! express. [`parse_input`] runs both and is the only way raw caller arguments
//! become typed input, so no partially-checked value ever reaches an adapter.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default for `maxItems` / `maxKeys` style parameters.
pub const DEFAULT_MAX_ITEMS: i32 = 100;
/// Lower bound for `maxItems` / `maxKeys` style parameters.
pub const MIN_MAX_ITEMS: i32 = 1;
/// Upper bound for `maxItems` / `maxKeys` style parameters.
pub const MAX_MAX_ITEMS: i32 = 1000;

/// Default role session duration in seconds.
pub const DEFAULT_SESSION_DURATION: i32 = 3600;
/// Shortest role session STS will issue.
pub const MIN_SESSION_DURATION: i32 = 900;
/// Longest role session STS will issue.
pub const MAX_SESSION_DURATION: i32 = 43200;

/// A caller-supplied argument broke its contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },

    /// Structural problems reported by serde: missing required fields, wrong
    /// types, values outside an enumeration.
    #[error("Invalid arguments: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Name of the offending field, when it is known.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Empty { field } | Self::OutOfRange { field, .. } => Some(field),
            Self::Malformed(_) => None,
        }
    }
}

/// Rule checks applied after deserialization.
pub trait ValidateInput {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Turn raw caller arguments into a tool's typed input.
///
/// A missing or `null` argument object is treated as `{}` so tools whose
/// fields are all optional can be called without arguments.
pub fn parse_input<T>(raw: Value) -> Result<T, ValidationError>
where
    T: DeserializeOwned + ValidateInput,
{
    let raw = match raw {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let input: T =
        serde_json::from_value(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    input.validate()?;
    Ok(input)
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Inclusive range check.
///
/// Numeric inputs are declared `i64` so that any JSON integer reaches this
/// check and fails with the field and bounds rather than a type error.
pub fn require_range(
    field: &'static str,
    value: i64,
    min: i32,
    max: i32,
) -> Result<(), ValidationError> {
    narrow(field, value, min, max).map(|_| ())
}

/// [`require_range`], returning the value as the `i32` the adapters take.
pub fn narrow(field: &'static str, value: i64, min: i32, max: i32) -> Result<i32, ValidationError> {
    let out_of_range = || ValidationError::OutOfRange {
        field,
        min: min.into(),
        max: max.into(),
        actual: value,
    };
    if value < i64::from(min) || value > i64::from(max) {
        return Err(out_of_range());
    }
    i32::try_from(value).map_err(|_| out_of_range())
}

pub fn default_max_items() -> i64 {
    DEFAULT_MAX_ITEMS.into()
}

pub fn default_session_duration() -> i64 {
    DEFAULT_SESSION_DURATION.into()
}
