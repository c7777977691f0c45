//! JSON bodies exchanged with the device firmware.
//!
//! The firmware parses requests with a fixed-size token parser, so every
//! request ends with a `"success": 1` marker and field order within a save is
//! the declaration order of the tab. Replies are plain JSON objects whose
//! remaining keys (after the envelope keys are split off) are field updates.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::{
    schema::{FieldKind, TabSpec},
    types::ControlValue,
};

/// Shown when the device answers with an empty body.
pub const NO_RESPONSE: &str = "No response from device.";

/// A device reply, normalized. Transport failures and malformed bodies are
/// folded into `success: false` with a synthesized message, so handlers never
/// see a second error channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceReply {
    pub success: bool,
    pub message: Option<String>,
    /// Tab index the device wants revealed, if it sent one.
    pub page: Option<usize>,
    /// Update handshake echo (`doUpdate` key).
    pub do_update: Option<i64>,
    /// Remaining keys, applied to the form as field updates.
    pub fields: Map<String, Value>,
}

impl DeviceReply {
    pub fn failure(message: impl Into<String>) -> Self {
        DeviceReply {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Body requesting the values of one tab.
pub fn selector_request(tab: usize) -> Value {
    json!({ "page": tab, "success": 1 })
}

/// Body asking the device to restart.
pub fn reboot_request() -> Value {
    json!({ "reboot": 1, "success": 1 })
}

/// Body asking the device to drop into its update mode.
pub fn prepare_update_request() -> Value {
    json!({ "doUpdate": 1, "success": 1 })
}

/// Body probing whether the update mode is ready to receive the image.
pub fn poll_update_request() -> Value {
    json!({ "doUpdate": 2, "success": 1 })
}

/// Body saving one tab: the tab index, every serializable field of the tab,
/// and the success marker, in that order. A field name already present is
/// skipped, the first occurrence wins.
pub fn save_request(tab: &TabSpec, page: usize, values: &BTreeMap<String, ControlValue>) -> Value {
    let mut body = Map::new();
    body.insert("page".to_string(), json!(page));
    for spec in tab.fields {
        if body.contains_key(spec.name) {
            continue;
        }
        if let Some(value) = encode_field(&spec.kind, values.get(spec.name)) {
            body.insert(spec.name.to_string(), value);
        }
    }
    body.insert("success".to_string(), json!(1));
    Value::Object(body)
}

/// Wire value for one field, `None` for read-only kinds.
pub fn encode_field(kind: &FieldKind, value: Option<&ControlValue>) -> Option<Value> {
    match kind {
        FieldKind::Display | FieldKind::DisplayQuad => None,
        FieldKind::Text { .. } => {
            let text = match value {
                Some(ControlValue::Scalar(s)) => s.clone(),
                _ => String::new(),
            };
            Some(Value::String(text))
        }
        FieldKind::Number => {
            let raw = match value {
                Some(ControlValue::Scalar(s)) => s.as_str(),
                _ => "",
            };
            Some(number_value(raw))
        }
        FieldKind::Flag => {
            let set = value.is_some_and(ControlValue::is_set);
            Some(json!(if set { 1 } else { 0 }))
        }
        FieldKind::Choice { options } => {
            let selected = match value {
                Some(ControlValue::Scalar(s)) => s.clone(),
                _ => options.first().copied().unwrap_or_default().to_string(),
            };
            Some(Value::String(selected))
        }
        FieldKind::Quad { .. } => {
            let parts = match value {
                Some(ControlValue::Quad(parts)) => parts.clone(),
                _ => Default::default(),
            };
            let numbers: Vec<Value> = parts
                .iter()
                .map(|part| json!(part.trim().parse::<i64>().unwrap_or(0)))
                .collect();
            Some(Value::Array(numbers))
        }
    }
}

/// Numeric encoding: empty is 0, a parsable integer is carried as a number,
/// anything else is passed through verbatim for the firmware to reject.
fn number_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return json!(0);
    }
    match trimmed.parse::<i64>() {
        Ok(n) => json!(n),
        Err(_) => Value::String(raw.to_string()),
    }
}

/// Parse a reply body. Never fails; anything that is not a JSON object
/// becomes an unsuccessful reply carrying a diagnostic message.
pub fn parse_reply(body: &[u8]) -> DeviceReply {
    if body.is_empty() {
        return DeviceReply::failure(NO_RESPONSE);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => {
            let success = fields.remove("success").as_ref().and_then(value_as_i64) == Some(1);
            let message = fields.remove("message").map(|v| value_as_text(&v));
            let page = fields
                .remove("page")
                .as_ref()
                .and_then(value_as_i64)
                .and_then(|n| usize::try_from(n).ok());
            let do_update = fields.remove("doUpdate").as_ref().and_then(value_as_i64);
            DeviceReply { success, message, page, do_update, fields }
        }
        _ => DeviceReply::failure(format!(
            "Unexpected response from device. [{}]",
            String::from_utf8_lossy(body)
        )),
    }
}

/// Text rendering of a scalar reply value.
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Integer reading of a reply value, lenient about a quoted number.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// The first four elements of an array value, rendered as text.
pub fn quad_values(value: &Value) -> Option<[String; 4]> {
    let items = value.as_array()?;
    if items.len() < 4 {
        return None;
    }
    Some([
        value_as_text(&items[0]),
        value_as_text(&items[1]),
        value_as_text(&items[2]),
        value_as_text(&items[3]),
    ])
}
