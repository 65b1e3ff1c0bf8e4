//! Tolerant decoding of destination maps
//!
//! Routing programs are user-written, so the map form is accepted loosely:
//! keys match case-insensitively, unknown keys are ignored, missing or null
//! fields take their zero value, and scalars are coerced where the intent is
//! unambiguous (`"42"` and `42.0` are both thread 42).

use super::types::Destination;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
struct LooseDestination {
    #[serde(default, deserialize_with = "loose_string")]
    peer: String,
    #[serde(default, deserialize_with = "loose_int")]
    thread: i64,
}

/// Decode a destination map returned by a routing program
pub fn decode_destination(map: &Map<String, Value>) -> Result<Destination, serde_json::Error> {
    let normalized: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), value.clone()))
        .collect();

    let loose = LooseDestination::deserialize(Value::Object(normalized))?;
    Ok(Destination::new(loose.peer, loose.thread))
}

fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(if b { "1" } else { "0" }.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                // f64 Display drops a zero fraction: 5.0 renders as "5"
                Ok(n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string()))
            }
        }
        other => Err(de::Error::custom(format!(
            "expected peer identifier, got {}",
            super::types::type_name(&other)
        ))),
    }
}

fn loose_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i64::from(b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(f as i64)
                    }
                    _ => Err(de::Error::custom(format!("thread {} out of range", n))),
                }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0);
            }
            s.parse::<i64>()
                .map_err(|e| de::Error::custom(format!("cannot parse thread {:?}: {}", s, e)))
        }
        other => Err(de::Error::custom(format!(
            "expected thread number, got {}",
            super::types::type_name(&other)
        ))),
    }
}
