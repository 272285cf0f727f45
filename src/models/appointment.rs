use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One row of the appointments table. Only `Status` and `Appt_type` are
/// consumed; any other column ends up in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "Status", default, deserialize_with = "coerced_label")]
    pub status: Option<String>,
    #[serde(rename = "Appt_type", default, deserialize_with = "coerced_label")]
    pub appt_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appointment {
    pub fn new(status: &str, appt_type: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            appt_type: Some(appt_type.to_string()),
            ..Default::default()
        }
    }

    /// Reads `field` as a category label. Empty and null values are absent.
    pub fn field_value(&self, field: &AppointmentField) -> Option<String> {
        let value = match field {
            AppointmentField::Status => self.status.clone(),
            AppointmentField::ApptType => self.appt_type.clone(),
            AppointmentField::Other(name) => self.extra.get(name).and_then(coerce_value),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn coerce_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Accepts any JSON value for a category column and keeps its text form.
fn coerced_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_value))
}

/// Field selector for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentField {
    Status,
    ApptType,
    Other(String),
}

impl AppointmentField {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentField::Status => "Status",
            AppointmentField::ApptType => "Appt_type",
            AppointmentField::Other(name) => name,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Status" | "status" => AppointmentField::Status,
            "Appt_type" | "appt_type" | "type" => AppointmentField::ApptType,
            other => AppointmentField::Other(other.to_string()),
        }
    }
}
