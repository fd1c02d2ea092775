//! Conversions between [`Value`] and `serde_json::Value`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::Value;

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        v.to_json()
    }
}

impl Value {
    /// Renders the value as JSON.
    ///
    /// Binary payloads become base64 data URIs, timestamps RFC 3339 strings
    /// and non-finite floats `null`. Map keys that are not strings are
    /// stringified.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(i),
            Value::UInt(u) => serde_json::json!(u),
            Value::F32(f) => float_to_json(*f as f64),
            Value::F64(f) => float_to_json(*f),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Bin(b) => serde_json::Value::String(format!(
                "data:application/octet-stream;base64,{}",
                STANDARD.encode(b)
            )),
            Value::Array(arr) => serde_json::Value::Array(arr.iter().map(Value::to_json).collect()),
            Value::Map(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (json_key(k), v.to_json()))
                    .collect(),
            ),
            Value::Ext(ext) => serde_json::Value::String(format!(
                "data:application/msgpack;base64,{};ext={}",
                STANDARD.encode(&ext.data),
                ext.type_code
            )),
            Value::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
            Value::Tagged(_, inner) => inner.to_json(),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn json_key(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        other => match other.to_json() {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        },
    }
}
