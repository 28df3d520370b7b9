//! The structured-text encoding, following the protocol-buffer JSON mapping.
//!
//! Keys are the lowerCamelCase field names, in declaration order. Absent
//! fields are not written. 64-bit integers are written as strings, bytes as
//! base64, enums by name.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use log::warn;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::MessageError;
use crate::message::DynamicMessage;
use crate::value::Value;

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("Expected a JSON object for {message}, found {found}.")]
    ExpectedObject { message: String, found: String },
    #[error("{message} has no field named \"{field}\".")]
    UnknownField { message: String, field: String },
    #[error("Invalid value for field {field}: {reason}.")]
    InvalidValue { field: String, reason: String },
    #[error("{0}")]
    Field(#[from] MessageError),
}

/// How to write a message as JSON.
#[derive(Debug, Clone)]
pub struct JsonPrintOptions {
    /// Use the declared field names instead of lowerCamelCase.
    pub preserving_proto_field_name: bool,
    /// Write enum values as numbers instead of names.
    pub use_integers_for_enums: bool,
    /// Indent nested values by that many spaces; `None` for compact output.
    pub indent: Option<usize>,
}

impl Default for JsonPrintOptions {
    fn default() -> Self {
        Self {
            preserving_proto_field_name: false,
            use_integers_for_enums: false,
            indent: Some(2),
        }
    }
}

/// Write a message as pretty-printed JSON with the default options.
pub fn to_json(message: &DynamicMessage) -> String {
    to_json_with(message, &JsonPrintOptions::default())
}

pub fn to_json_with(message: &DynamicMessage, options: &JsonPrintOptions) -> String {
    let value = to_json_value_with(message, options);
    match options.indent {
        None => value.to_string(),
        Some(width) => {
            let indent = vec![b' '; width];
            let mut output = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut output, PrettyFormatter::with_indent(&indent));
            match value.serialize(&mut serializer) {
                Ok(()) => String::from_utf8_lossy(&output).into_owned(),
                Err(error) => {
                    warn!("Cannot indent the JSON output, writing it compact: {error}");
                    value.to_string()
                }
            }
        }
    }
}

pub fn to_json_value(message: &DynamicMessage) -> JsonValue {
    to_json_value_with(message, &JsonPrintOptions::default())
}

pub fn to_json_value_with(message: &DynamicMessage, options: &JsonPrintOptions) -> JsonValue {
    let mut object = Map::new();
    for (field, values) in message.present_fields() {
        let key = if options.preserving_proto_field_name {
            field.name.to_string()
        } else {
            field.json_name()
        };
        let value = if field.is_repeated() {
            JsonValue::Array(
                values
                    .iter()
                    .map(|value| value_to_json(field, value, options))
                    .collect(),
            )
        } else {
            match values {
                [value] => value_to_json(field, value, options),
                _ => continue,
            }
        };
        object.insert(key, value);
    }
    JsonValue::Object(object)
}

fn value_to_json(field: &FieldDescriptor, value: &Value, options: &JsonPrintOptions) -> JsonValue {
    match value {
        Value::Bool(value) => JsonValue::Bool(*value),
        Value::I32(value) => JsonValue::from(*value),
        Value::U32(value) => JsonValue::from(*value),
        Value::I64(value) => JsonValue::String(value.to_string()),
        Value::U64(value) => JsonValue::String(value.to_string()),
        // The shortest text of an f32 reads back as the same f32.
        Value::F32(value) => float_to_json(value.to_string().parse().unwrap_or(f64::from(*value))),
        Value::F64(value) => float_to_json(*value),
        Value::String(value) => JsonValue::String(value.clone()),
        Value::Bytes(value) => JsonValue::String(STANDARD.encode(value)),
        Value::Enum(number) => match field.kind {
            FieldKind::Enum(descriptor) if !options.use_integers_for_enums => descriptor
                .name_of(*number)
                .map(|name| JsonValue::String(name.to_string()))
                .unwrap_or_else(|| JsonValue::from(*number)),
            _ => JsonValue::from(*number),
        },
        Value::Message(message) => to_json_value_with(message, options),
    }
}

fn float_to_json(value: f64) -> JsonValue {
    match Number::from_f64(value) {
        Some(number) => JsonValue::Number(number),
        None if value.is_nan() => JsonValue::String(String::from("NaN")),
        None if value > 0.0 => JsonValue::String(String::from("Infinity")),
        None => JsonValue::String(String::from("-Infinity")),
    }
}

/// Read a message of the given schema from JSON.
pub fn from_json(
    descriptor: &'static MessageDescriptor,
    text: &str,
) -> Result<DynamicMessage, JsonError> {
    let mut message = DynamicMessage::new(descriptor);
    merge_json(&mut message, text)?;
    Ok(message)
}

/// Read JSON into an existing message.
pub fn merge_json(message: &mut DynamicMessage, text: &str) -> Result<(), JsonError> {
    let value: JsonValue = serde_json::from_str(text)?;
    merge_json_value(message, &value)
}

/// Read an already parsed JSON value into an existing message.
///
/// Both the lowerCamelCase and the declared field names are accepted.
/// `null` leaves a field untouched.
pub fn merge_json_value(message: &mut DynamicMessage, value: &JsonValue) -> Result<(), JsonError> {
    let descriptor = message.descriptor();
    let JsonValue::Object(object) = value else {
        return Err(JsonError::ExpectedObject {
            message: descriptor.full_name.to_string(),
            found: describe(value),
        });
    };
    for (key, value) in object {
        let field = descriptor
            .field_by_json_name(key)
            .ok_or_else(|| JsonError::UnknownField {
                message: descriptor.full_name.to_string(),
                field: key.clone(),
            })?;
        if value.is_null() {
            continue;
        }
        if field.is_repeated() {
            let JsonValue::Array(elements) = value else {
                return Err(invalid(field, format!("expected an array, found {}", describe(value))));
            };
            for element in elements {
                if let FieldKind::Message(_) = field.kind {
                    merge_json_value(message.add(field)?, element)?;
                } else {
                    message.push(field, json_to_value(field, element)?)?;
                }
            }
        } else if let FieldKind::Message(_) = field.kind {
            merge_json_value(message.mutable_message(field)?, value)?;
        } else {
            message.set(field, json_to_value(field, value)?)?;
        }
    }
    Ok(())
}

fn invalid(field: &FieldDescriptor, reason: impl Into<String>) -> JsonError {
    JsonError::InvalidValue {
        field: field.name.to_string(),
        reason: reason.into(),
    }
}

fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::from("null"),
        JsonValue::Bool(_) => String::from("a boolean"),
        JsonValue::Number(number) => format!("number {number}"),
        JsonValue::String(text) => format!("string \"{text}\""),
        JsonValue::Array(_) => String::from("an array"),
        JsonValue::Object(_) => String::from("an object"),
    }
}

/// Convert a JSON scalar to a value; range checks happen on assignment.
fn json_to_value(field: &FieldDescriptor, value: &JsonValue) -> Result<Value, JsonError> {
    let unexpected = || invalid(field, format!("unexpected {}", describe(value)));
    match field.kind {
        FieldKind::Bool => value.as_bool().map(Value::Bool).ok_or_else(unexpected),
        FieldKind::String => value
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .ok_or_else(unexpected),
        FieldKind::Bytes => {
            let text = value.as_str().ok_or_else(unexpected)?;
            STANDARD
                .decode(text)
                .or_else(|_| URL_SAFE.decode(text))
                .map(Value::Bytes)
                .map_err(|error| invalid(field, format!("invalid base64: {error}")))
        }
        FieldKind::Float | FieldKind::Double => {
            let number = match value {
                JsonValue::Number(number) => number.as_f64().ok_or_else(unexpected)?,
                JsonValue::String(text) => match text.as_str() {
                    "NaN" => f64::NAN,
                    "Infinity" => f64::INFINITY,
                    "-Infinity" => f64::NEG_INFINITY,
                    other => other.parse().map_err(|_| unexpected())?,
                },
                _ => return Err(unexpected()),
            };
            let narrowed = number as f32;
            if matches!(field.kind, FieldKind::Float) && number.is_finite() && narrowed.is_infinite()
            {
                return Err(invalid(field, format!("{number} is out of range for a float")));
            }
            Ok(Value::F64(number))
        }
        FieldKind::Enum(_) => match value {
            JsonValue::String(name) => Ok(Value::String(name.clone())),
            JsonValue::Number(_) => json_integer(field, value),
            _ => Err(unexpected()),
        },
        FieldKind::Message(_) => Err(unexpected()),
        _ => json_integer(field, value),
    }
}

/// Integers may be written as JSON numbers or as strings.
fn json_integer(field: &FieldDescriptor, value: &JsonValue) -> Result<Value, JsonError> {
    let unexpected = || invalid(field, format!("expected an integer, found {}", describe(value)));
    let number = match value {
        JsonValue::Number(number) => number.clone(),
        JsonValue::String(text) => text.parse::<Number>().map_err(|_| unexpected())?,
        _ => return Err(unexpected()),
    };
    if let Some(integer) = number.as_i64() {
        Ok(Value::I64(integer))
    } else if let Some(integer) = number.as_u64() {
        Ok(Value::U64(integer))
    } else {
        // 1.0 or 1e3 are fine, 1.5 is not.
        match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 9.2e18 => Ok(Value::I64(float as i64)),
            _ => Err(unexpected()),
        }
    }
}
