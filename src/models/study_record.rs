use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "de_time")]
    pub time: f64,
}

/// The mutable part of a record, sent on insert and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyInput {
    pub title: String,
    pub time: f64,
}

// Tables keyed by bigint hand ids back as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

// Postgres `numeric` columns come back as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Number(f64),
    Text(String),
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Int(id) => id.to_string(),
    })
}

fn de_time<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTime::deserialize(deserializer)? {
        RawTime::Number(time) => Ok(time),
        RawTime::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid time value: {}", text))),
    }
}
