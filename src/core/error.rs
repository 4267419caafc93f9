use thiserror::Error;

/// Errors that can occur during invoice construction or totals computation.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FatooraError {
    /// Malformed numeric input (NaN, infinite, or negative where disallowed).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The discount category was requested for an invoice without lines.
    #[error("invoice has no lines; discount tax category is undefined")]
    EmptyLineSet,

    /// A monetary value exceeded the representable decimal range.
    #[error("rounding overflow: {0}")]
    RoundingOverflow(String),

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),
}

/// One failed `FT-xx` rule, located by the invoice or totals field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path into [`Invoice`](super::Invoice) or [`Totals`](super::Totals), with
    /// lines addressed by position (`lines[2].tax_rate`, `totals.subtotals`).
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// `FT-01`..`FT-10` for input and structure, `FT-20`..`FT-25` for totals.
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_rule() {
        let err = ValidationError::with_rule("lines[0].quantity", "must not be negative", "FT-03");
        assert_eq!(err.to_string(), "[FT-03] lines[0].quantity: must not be negative");
    }

    #[test]
    fn display_without_rule() {
        let err = ValidationError::new("number", "must not be empty");
        assert_eq!(err.to_string(), "number: must not be empty");
    }

    #[test]
    fn empty_line_set_message() {
        assert_eq!(
            FatooraError::EmptyLineSet.to_string(),
            "invoice has no lines; discount tax category is undefined"
        );
    }
}
