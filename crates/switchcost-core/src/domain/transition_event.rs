use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Elapsed;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Renders a local timestamp with a fixed six-digit fraction.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a rendered timestamp; the fractional part is optional.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_PARSE_FORMAT).ok()
}

/// One recorded change of the focused application.
///
/// `duration` is the gap since the previously recorded event, `None` when
/// this is the first event of the log (serialised as the literal `"0"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(deserialize_with = "null_as_empty")]
    pub from: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub to: String,
    #[serde(with = "duration_format")]
    pub duration: Option<Elapsed>,
}

impl TransitionEvent {
    pub fn new(
        timestamp: NaiveDateTime,
        from: impl Into<String>,
        to: impl Into<String>,
        previous_timestamp: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            timestamp,
            from: from.into(),
            to: to.into(),
            duration: previous_timestamp.map(|previous| Elapsed::between(previous, timestamp)),
        }
    }

    pub fn elapsed_or_zero(&self) -> Elapsed {
        self.duration.unwrap_or_else(Elapsed::zero)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_timestamp(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", value)))
    }
}

mod duration_format {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::domain::Elapsed;

    const NO_PRIOR_EVENT: &str = "0";

    pub fn serialize<S>(duration: &Option<Elapsed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(elapsed) => serializer.serialize_str(&elapsed.to_string()),
            None => serializer.serialize_str(NO_PRIOR_EVENT),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Elapsed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        if value.trim() == NO_PRIOR_EVENT {
            return Ok(None);
        }

        Elapsed::parse(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid duration: {}", value)))
    }
}
