use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::WizardError;

/// The nine inputs collected by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Street,
    City,
    State,
    PostalCode,
    CardNumber,
    Expiry,
    Cvv,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Email,
        Field::Street,
        Field::City,
        Field::State,
        Field::PostalCode,
        Field::CardNumber,
        Field::Expiry,
        Field::Cvv,
    ];

    /// Record key, as used in serialized records and error maps.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Street => "street",
            Field::City => "city",
            Field::State => "state",
            Field::PostalCode => "postalCode",
            Field::CardNumber => "cardNumber",
            Field::Expiry => "expiry",
            Field::Cvv => "cvv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Street => "Street",
            Field::City => "City",
            Field::State => "State",
            Field::PostalCode => "Postal Code",
            Field::CardNumber => "Card Number",
            Field::Expiry => "Expiry Date (MM/YY)",
            Field::Cvv => "CVV",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "Enter your name",
            Field::Email => "Enter your email",
            Field::Street => "Enter your street",
            Field::City => "Enter your city",
            Field::State => "Enter your state",
            Field::PostalCode => "Enter your postal code",
            Field::CardNumber => "Enter your card number",
            Field::Expiry => "MM/YY",
            Field::Cvv => "Enter CVV",
        }
    }

    /// Step whose field set owns this field.
    pub fn step(self) -> Step {
        match self {
            Field::Name | Field::Email => Step::Identity,
            Field::Street | Field::City | Field::State | Field::PostalCode => Step::Address,
            Field::CardNumber | Field::Expiry | Field::Cvv => Step::Payment,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = WizardError;

    /// Accepts the record key (`postalCode`) as well as snake/kebab spellings
    /// (`postal_code`, `postal-code`), case-insensitively.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-'))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        Field::ALL
            .into_iter()
            .find(|field| field.key().to_ascii_lowercase() == normalized)
            .ok_or_else(|| WizardError::UnknownField(input.trim().to_string()))
    }
}

/// Position in the wizard. Numbered 1 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    Identity,
    Address,
    Payment,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Identity, Step::Address, Step::Payment];
    pub const COUNT: u8 = 3;

    pub fn number(self) -> u8 {
        match self {
            Step::Identity => 1,
            Step::Address => 2,
            Step::Payment => 3,
        }
    }

    /// Ordered field set rendered and validated on this step.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Identity => &[Field::Name, Field::Email],
            Step::Address => &[Field::Street, Field::City, Field::State, Field::PostalCode],
            Step::Payment => &[Field::CardNumber, Field::Expiry, Field::Cvv],
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Identity => Some(Step::Address),
            Step::Address => Some(Step::Payment),
            Step::Payment => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Identity => None,
            Step::Address => Some(Step::Identity),
            Step::Payment => Some(Step::Address),
        }
    }

    pub fn is_first(self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl TryFrom<u8> for Step {
    type Error = WizardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Step::Identity),
            2 => Ok(Step::Address),
            3 => Ok(Step::Payment),
            other => Err(WizardError::InvalidStep(other)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
