use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult};

const NAMES: [&str; 4] = ["SUNNY", "CLOUDY", "RAINY", "FLURRY"];
const CODES: [&str; 4] = ["1", "2", "3", "4"];

/// Sky condition of an observation.
///
/// The only way to obtain one is [`Condition::create`]; the code field is private,
/// so a literal built outside this module does not compile:
///
/// ```compile_fail
/// let sunny = sw_core::Condition { code: 0 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Condition {
    // zero-based index into NAMES and CODES
    code: u8,
}

impl Condition {
    /// Build a condition from its single-digit wire code, `"1"` through `"4"`.
    pub fn create(code: &str) -> DomainResult<Self> {
        let mut chars = code.chars();
        let digit = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.to_digit(10).ok_or(DomainError::PatternMismatch {
                field: "condition",
                reason: "must be a single digit from 1 to 4",
            })?,
            _ => {
                return Err(DomainError::PatternMismatch {
                    field: "condition",
                    reason: "must be a single digit from 1 to 4",
                })
            }
        };
        match u8::try_from(digit) {
            Ok(value @ 1..=4) => Ok(Self { code: value - 1 }),
            _ => Err(DomainError::OutOfRange {
                field: "condition",
                value: digit.to_string(),
                min: "1".into(),
                max: "4".into(),
            }),
        }
    }

    /// Every condition in code order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..4).map(|code| Self { code })
    }

    /// Display name, such as `SUNNY`.
    pub fn value(self) -> &'static str {
        NAMES[usize::from(self.code)]
    }

    /// Wire code, such as `"1"`.
    pub fn enum_value(self) -> &'static str {
        CODES[usize::from(self.code)]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl TryFrom<String> for Condition {
    type Error = DomainError;

    fn try_from(code: String) -> DomainResult<Self> {
        Self::create(&code)
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.enum_value().to_string()
    }
}
