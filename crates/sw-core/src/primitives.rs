use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DomainError, DomainResult};

/// Describe a JSON value's kind for error messages.
pub(crate) fn json_kind(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(flag) => format!("boolean {flag}"),
        Value::Number(number) => format!("number {number}"),
        Value::String(text) => format!("string {text:?}"),
        Value::Array(_) => "an array".into(),
        Value::Object(_) => "an object".into(),
    }
}

macro_rules! bounded_integer {
    ($(#[$meta:meta])* $name:ident, $field:literal, $min:literal, $max:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
        #[serde(try_from = "i64", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Smallest accepted value.
            pub const MIN: i32 = $min;
            /// Largest accepted value.
            pub const MAX: i32 = $max;

            /// Create a new value, rejecting anything outside `[MIN, MAX]`.
            pub fn new(value: i32) -> DomainResult<Self> {
                Self::try_from(i64::from(value))
            }

            /// Access the wrapped integer.
            pub fn value(self) -> i32 {
                self.0
            }

            fn out_of_range(value: impl fmt::Display) -> DomainError {
                DomainError::OutOfRange {
                    field: $field,
                    value: value.to_string(),
                    min: Self::MIN.to_string(),
                    max: Self::MAX.to_string(),
                }
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DomainError;

            fn try_from(value: i64) -> DomainResult<Self> {
                if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
                    return Err(Self::out_of_range(value));
                }
                i32::try_from(value)
                    .map(Self)
                    .map_err(|_| Self::out_of_range(value))
            }
        }

        impl TryFrom<&Value> for $name {
            type Error = DomainError;

            fn try_from(value: &Value) -> DomainResult<Self> {
                match value {
                    Value::Number(number) => {
                        if let Some(integer) = number.as_i64() {
                            Self::try_from(integer)
                        } else if number.is_u64() {
                            Err(Self::out_of_range(number))
                        } else {
                            Err(DomainError::WrongType {
                                field: $field,
                                found: json_kind(value),
                            })
                        }
                    }
                    other => Err(DomainError::WrongType {
                        field: $field,
                        found: json_kind(other),
                    }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(input: &str) -> DomainResult<Self> {
                let integer: i64 = input.trim().parse().map_err(|_| DomainError::Parse {
                    field: $field,
                    input: input.to_string(),
                    reason: "expected a whole number",
                })?;
                Self::try_from(integer)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

bounded_integer!(
    /// Air temperature in degrees Celsius, within `[-50, 50]`.
    Temperature,
    "temperature",
    -50,
    50
);

bounded_integer!(
    /// Relative humidity percentage, within `[0, 100]`.
    Humidity,
    "humidity",
    0,
    100
);

bounded_integer!(
    /// Wind speed in km/h, within `[0, 200]`.
    Wind,
    "wind",
    0,
    200
);

bounded_integer!(
    /// Server-assigned record identifier, within `[1, 99999]`.
    Id,
    "id",
    1,
    99999
);

const USERNAME_MIN_LEN: usize = 3;
const PASSWORD_MIN_LEN: usize = 8;

/// Account name accepted by the record service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username {
    value: String,
}

impl Username {
    /// Create a username of at least three letters, digits, `_`, `-` or `@`.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::PatternMismatch {
                field: "username",
                reason: "cannot be empty",
            });
        }
        if value.chars().count() < USERNAME_MIN_LEN {
            return Err(DomainError::PatternMismatch {
                field: "username",
                reason: "must be at least 3 characters long",
            });
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '@'))
        {
            return Err(DomainError::PatternMismatch {
                field: "username",
                reason: "may only contain letters, digits, `_`, `-` and `@`",
            });
        }
        Ok(Self { value })
    }

    /// Access the username text.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Account secret. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    value: String,
}

impl Password {
    /// Create a password that is at least eight characters and not purely numeric.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::PatternMismatch {
                field: "password",
                reason: "cannot be empty",
            });
        }
        if value.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(DomainError::PatternMismatch {
                field: "password",
                reason: "cannot be entirely numeric",
            });
        }
        if value.chars().count() < PASSWORD_MIN_LEN {
            return Err(DomainError::PatternMismatch {
                field: "password",
                reason: "must be at least 8 characters long",
            });
        }
        Ok(Self { value })
    }

    /// Access the secret text.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}
