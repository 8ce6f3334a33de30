//! Per-step field validation.
//!
//! [`validate`] is pure: it reads the record, never touches stored errors, and
//! returns one entry per field of the requested step.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error_map::ErrorMap;
use super::field::{Field, Step};
use super::record::FormRecord;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z\s]+$"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static POSTAL_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{6}$"));
static CARD_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{16}$"));
static EXPIRY_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^(0[1-9]|1[0-2])/[0-9]{2}$"));
static CVV_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{3}$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static validation pattern")
}

/// Format constraint applied once a required field is non-empty.
struct Format {
    pattern: &'static Lazy<Regex>,
    message: &'static str,
}

/// Validation rule for a single field.
pub struct FieldRule {
    required_message: &'static str,
    format: Option<Format>,
}

impl FieldRule {
    /// Returns the message describing why `value` is invalid, if it is.
    pub fn check(&self, value: &str) -> Option<&'static str> {
        if value.is_empty() {
            return Some(self.required_message);
        }
        match &self.format {
            Some(format) if !format.pattern.is_match(value) => Some(format.message),
            _ => None,
        }
    }
}

/// Rule table for every field.
pub fn rule_for(field: Field) -> FieldRule {
    let (required_message, format) = match field {
        Field::Name => (
            "Name is required.",
            Some(Format {
                pattern: &NAME_PATTERN,
                message: "Name should only contain alphabets and spaces.",
            }),
        ),
        Field::Email => (
            "Email is required.",
            Some(Format {
                pattern: &EMAIL_PATTERN,
                message: "Please enter a valid email address.",
            }),
        ),
        Field::Street => ("Street is required.", None),
        Field::City => ("City is required.", None),
        Field::State => ("State is required.", None),
        Field::PostalCode => (
            "Postal Code is required.",
            Some(Format {
                pattern: &POSTAL_CODE_PATTERN,
                message: "Postal Code must be a 6-digit number.",
            }),
        ),
        Field::CardNumber => (
            "Card Number is required.",
            Some(Format {
                pattern: &CARD_NUMBER_PATTERN,
                message: "Card Number must be a 16-digit number.",
            }),
        ),
        Field::Expiry => (
            "Expiry is required.",
            Some(Format {
                pattern: &EXPIRY_PATTERN,
                message: "Expiry date must be in MM/YY format.",
            }),
        ),
        Field::Cvv => (
            "CVV is required.",
            Some(Format {
                pattern: &CVV_PATTERN,
                message: "CVV must be a 3-digit number.",
            }),
        ),
    };
    FieldRule {
        required_message,
        format,
    }
}

/// Checks one field against its rule.
pub fn validate_field(field: Field, value: &str) -> Option<&'static str> {
    rule_for(field).check(value)
}

/// Validates the fields of `step` only. The result holds exactly one entry
/// per field of the step, empty when that field is valid.
pub fn validate(step: Step, record: &FormRecord) -> ErrorMap {
    step.fields()
        .iter()
        .map(|field| {
            let message = validate_field(*field, record.get(*field)).unwrap_or_default();
            (*field, message.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_report_required_messages() {
        let errors = validate(Step::Address, &FormRecord::new());
        assert_eq!(errors.message(Field::Street), Some("Street is required."));
        assert_eq!(errors.message(Field::City), Some("City is required."));
        assert_eq!(errors.message(Field::State), Some("State is required."));
        assert_eq!(
            errors.message(Field::PostalCode),
            Some("Postal Code is required.")
        );
    }

    #[test]
    fn name_allows_letters_and_whitespace_only() {
        assert_eq!(validate_field(Field::Name, "John Doe"), None);
        assert_eq!(validate_field(Field::Name, "  "), None);
        assert_eq!(
            validate_field(Field::Name, "John123"),
            Some("Name should only contain alphabets and spaces.")
        );
        assert_eq!(
            validate_field(Field::Name, "Zoë"),
            Some("Name should only contain alphabets and spaces.")
        );
    }

    #[test]
    fn email_needs_single_at_and_dot_in_domain() {
        assert_eq!(validate_field(Field::Email, "john@example.com"), None);
        for bad in ["john", "john@example", "jo hn@example.com", "a@b@c.com", "@x.io"] {
            assert_eq!(
                validate_field(Field::Email, bad),
                Some("Please enter a valid email address."),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn digit_fields_require_exact_ascii_lengths() {
        assert_eq!(validate_field(Field::PostalCode, "123456"), None);
        assert_eq!(
            validate_field(Field::PostalCode, "12345"),
            Some("Postal Code must be a 6-digit number.")
        );
        assert_eq!(
            validate_field(Field::PostalCode, "１２３４５６"),
            Some("Postal Code must be a 6-digit number.")
        );
        assert_eq!(validate_field(Field::CardNumber, "4111111111111111"), None);
        assert_eq!(
            validate_field(Field::CardNumber, "4111 1111 1111 1111"),
            Some("Card Number must be a 16-digit number.")
        );
        assert_eq!(validate_field(Field::Cvv, "123"), None);
        assert_eq!(
            validate_field(Field::Cvv, "1234"),
            Some("CVV must be a 3-digit number.")
        );
    }

    #[test]
    fn expiry_accepts_months_one_through_twelve() {
        assert_eq!(validate_field(Field::Expiry, "01/30"), None);
        assert_eq!(validate_field(Field::Expiry, "12/25"), None);
        for bad in ["13/25", "00/25", "1/25", "12/2025", "12-25"] {
            assert_eq!(
                validate_field(Field::Expiry, bad),
                Some("Expiry date must be in MM/YY format."),
                "{bad} should be rejected"
            );
        }
    }
}
