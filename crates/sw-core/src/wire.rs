//! JSON shapes exchanged with the record service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::primitives::json_kind;
use crate::{
    Condition, DomainError, DomainResult, Humidity, Id, Record, RecordDate, Temperature, Wind,
};

/// Body sent when storing a new record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    pub condition: String,
    pub humidity: i32,
    pub temperature: i32,
    pub wind: i32,
    pub date: String,
}

impl From<&Record> for RecordPayload {
    fn from(record: &Record) -> Self {
        Self {
            condition: record.condition().enum_value().to_string(),
            humidity: record.humidity().value(),
            temperature: record.temperature().value(),
            wind: record.wind().value(),
            date: record.record_date().db_date(),
        }
    }
}

/// Record as listed by the service.
///
/// Fields stay raw JSON until [`Record::try_from`] validates them, so a mistyped field
/// surfaces as a domain error naming that field.
#[derive(Clone, Debug, Deserialize)]
pub struct RecordResponse {
    pub id: Value,
    pub condition: Value,
    pub humidity: Value,
    pub temperature: Value,
    pub wind: Value,
    pub date: Value,
}

impl TryFrom<&RecordResponse> for Record {
    type Error = DomainError;

    fn try_from(response: &RecordResponse) -> DomainResult<Self> {
        let condition = Condition::create(expect_str(&response.condition, "condition")?)?;
        let record_date = RecordDate::parse(expect_str(&response.date, "record date")?)?;
        let record = Record::new(
            Temperature::try_from(&response.temperature)?,
            Humidity::try_from(&response.humidity)?,
            Wind::try_from(&response.wind)?,
            condition,
            record_date,
        );
        Ok(record.with_id(Id::try_from(&response.id)?))
    }
}

/// Credentials body for the login endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Token returned by the login endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub key: String,
}

fn expect_str<'a>(value: &'a Value, field: &'static str) -> DomainResult<&'a str> {
    value.as_str().ok_or_else(|| DomainError::WrongType {
        field,
        found: json_kind(value),
    })
}
