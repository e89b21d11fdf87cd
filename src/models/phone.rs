//! Normalized North American phone numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Minimum digit count for a dialable NANP number.
pub const MIN_DIGITS: usize = 10;

/// A phone number reduced to its ten national digits.
///
/// Built once by [`PhoneNumber::parse`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Input exactly as supplied
    pub raw: String,

    /// National significant digits (area code first)
    pub digits: String,

    /// `NPA-NXX` lookup key
    pub exchange_key: String,

    /// `+1` followed by the ten national digits
    pub e164: String,
}

impl PhoneNumber {
    /// Strip formatting and derive the lookup key and E.164 form.
    ///
    /// A leading `1` country code is dropped when more than ten digits
    /// remain, so `+1 (985) 267-9258` and `9852679258` agree.
    pub fn parse(input: &str) -> Result<Self> {
        let all: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

        if all.len() < MIN_DIGITS {
            return Err(AppError::invalid_number(input, all.len()));
        }

        let national = if all.len() > MIN_DIGITS && all.starts_with('1') {
            &all[1..]
        } else {
            all.as_str()
        };

        if national.len() < MIN_DIGITS {
            return Err(AppError::invalid_number(input, national.len()));
        }

        let digits = national[..MIN_DIGITS].to_string();
        let exchange_key = format!("{}-{}", &digits[..3], &digits[3..6]);
        let e164 = format!("+1{digits}");

        Ok(Self {
            raw: input.to_string(),
            digits,
            exchange_key,
            e164,
        })
    }

    /// Area code (NPA).
    pub fn area_code(&self) -> &str {
        &self.digits[..3]
    }

    /// Human-readable `+1 (NPA) NXX-XXXX` rendering.
    pub fn display(&self) -> String {
        format!(
            "+1 ({}) {}-{}",
            &self.digits[..3],
            &self.digits[3..6],
            &self.digits[6..10]
        )
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
