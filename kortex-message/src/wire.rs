//! The protocol-buffer binary encoding.
//!
//! Fields are written in declaration order. Repeated numeric, boolean and
//! enum fields are packed; both packed and unpacked forms are read back.

use log::{debug, trace};
use prost::bytes::Buf;
use prost::encoding::{
    self, decode_key, decode_varint, encode_key, encode_varint, skip_field, DecodeContext,
    WireType,
};
use thiserror::Error;

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::MessageError;
use crate::message::{DynamicMessage, RECURSION_LIMIT};
use crate::pack::UnPack;
use crate::value::Value;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Invalid wire data: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("Field {field} holds a message and cannot be read from wire type {found:?}.")]
    WireType { field: String, found: WireType },
    #[error("The data ends in the middle of field {0}.")]
    Truncated(String),
    #[error("Messages are nested more than {} levels deep.", RECURSION_LIMIT)]
    RecursionLimit,
    #[error("{0}")]
    Field(#[from] MessageError),
}

/// Encode a message.
pub fn encode(message: &DynamicMessage) -> Vec<u8> {
    let mut buffer = Vec::new();
    encode_into(message, &mut buffer);
    buffer
}

fn encode_into(message: &DynamicMessage, buffer: &mut Vec<u8>) {
    for (field, values) in message.present_fields() {
        if field.is_repeated() && field.kind.is_packable() {
            encode_packed(field, values, buffer);
        } else {
            for value in values {
                encode_value(field, value, buffer);
            }
        }
    }
}

fn encode_value(field: &FieldDescriptor, value: &Value, buffer: &mut Vec<u8>) {
    let tag = field.number;
    match (value, field.kind) {
        (Value::Bool(value), _) => encoding::bool::encode(tag, value, buffer),
        (Value::I32(value), FieldKind::SInt32) => encoding::sint32::encode(tag, value, buffer),
        (Value::I32(value), FieldKind::SFixed32) => encoding::sfixed32::encode(tag, value, buffer),
        (Value::I32(value), _) => encoding::int32::encode(tag, value, buffer),
        (Value::I64(value), FieldKind::SInt64) => encoding::sint64::encode(tag, value, buffer),
        (Value::I64(value), FieldKind::SFixed64) => encoding::sfixed64::encode(tag, value, buffer),
        (Value::I64(value), _) => encoding::int64::encode(tag, value, buffer),
        (Value::U32(value), FieldKind::Fixed32) => encoding::fixed32::encode(tag, value, buffer),
        (Value::U32(value), _) => encoding::uint32::encode(tag, value, buffer),
        (Value::U64(value), FieldKind::Fixed64) => encoding::fixed64::encode(tag, value, buffer),
        (Value::U64(value), _) => encoding::uint64::encode(tag, value, buffer),
        (Value::F32(value), _) => encoding::float::encode(tag, value, buffer),
        (Value::F64(value), _) => encoding::double::encode(tag, value, buffer),
        (Value::String(value), _) => encoding::string::encode(tag, value, buffer),
        (Value::Bytes(value), _) => encoding::bytes::encode(tag, value, buffer),
        (Value::Enum(value), _) => encoding::int32::encode(tag, value, buffer),
        (Value::Message(nested), _) => {
            let body = encode(nested);
            encode_key(tag, WireType::LengthDelimited, buffer);
            encode_varint(body.len() as u64, buffer);
            buffer.extend_from_slice(&body);
        }
    }
}

fn unpacked<T>(values: &[Value]) -> Vec<T>
where
    for<'v> &'v Value: UnPack<T>,
{
    values.iter().filter_map(|value| value.unpack()).collect()
}

fn encode_packed(field: &FieldDescriptor, values: &[Value], buffer: &mut Vec<u8>) {
    let tag = field.number;
    match field.kind {
        FieldKind::Double => encoding::double::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Float => encoding::float::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Int32 => encoding::int32::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Int64 => encoding::int64::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::UInt32 => encoding::uint32::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::UInt64 => encoding::uint64::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::SInt32 => encoding::sint32::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::SInt64 => encoding::sint64::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Fixed32 => encoding::fixed32::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Fixed64 => encoding::fixed64::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::SFixed32 => encoding::sfixed32::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::SFixed64 => encoding::sfixed64::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Bool => encoding::bool::encode_packed(tag, &unpacked(values), buffer),
        FieldKind::Enum(_) => {
            let numbers: Vec<i32> = values
                .iter()
                .filter_map(|value| match value {
                    Value::Enum(number) => Some(*number),
                    _ => None,
                })
                .collect();
            encoding::int32::encode_packed(tag, &numbers, buffer);
        }
        FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) => {
            for value in values {
                encode_value(field, value, buffer);
            }
        }
    }
}

/// Decode a message of the given schema.
pub fn decode(descriptor: &'static MessageDescriptor, bytes: &[u8]) -> Result<DynamicMessage, WireError> {
    debug!("Decoding {} bytes as a {}.", bytes.len(), descriptor.name());
    let mut message = DynamicMessage::new(descriptor);
    merge(&mut message, bytes)?;
    Ok(message)
}

/// Decode into an existing message.
///
/// Singular scalars are replaced, nested messages merged, repeated
/// elements appended. Unknown fields are skipped.
pub fn merge(message: &mut DynamicMessage, bytes: &[u8]) -> Result<(), WireError> {
    merge_nested(message, bytes, 0)
}

fn merge_nested(
    message: &mut DynamicMessage,
    mut bytes: &[u8],
    depth: usize,
) -> Result<(), WireError> {
    let buffer = &mut bytes;
    while buffer.has_remaining() {
        let (tag, wire_type) = decode_key(buffer)?;
        let Some(field) = message.descriptor().field_by_number(tag) else {
            trace!(
                "Skipping unknown field {tag} of {}.",
                message.descriptor().full_name
            );
            skip_field(wire_type, tag, buffer, DecodeContext::default())?;
            continue;
        };
        merge_field(message, field, wire_type, buffer, depth)?;
    }
    Ok(())
}

fn merge_field(
    message: &mut DynamicMessage,
    field: &'static FieldDescriptor,
    wire_type: WireType,
    buffer: &mut &[u8],
    depth: usize,
) -> Result<(), WireError> {
    if field.kind.is_message() {
        if depth >= RECURSION_LIMIT {
            return Err(WireError::RecursionLimit);
        }
        let body = length_delimited(field, wire_type, buffer)?;
        let nested = if field.is_repeated() {
            message.add(field)?
        } else {
            message.mutable_message(field)?
        };
        return merge_nested(nested, body, depth + 1);
    }
    if field.is_repeated() {
        for value in decode_repeated(field, wire_type, buffer)? {
            message.push(field, value)?;
        }
    } else {
        let value = decode_scalar(field, wire_type, buffer)?;
        message.set(field, value)?;
    }
    Ok(())
}

fn length_delimited<'b>(
    field: &FieldDescriptor,
    wire_type: WireType,
    buffer: &mut &'b [u8],
) -> Result<&'b [u8], WireError> {
    if wire_type != WireType::LengthDelimited {
        return Err(WireError::WireType {
            field: field.name.to_string(),
            found: wire_type,
        });
    }
    let length = decode_varint(buffer)?;
    let remaining: &'b [u8] = *buffer;
    let length = usize::try_from(length)
        .ok()
        .filter(|length| *length <= remaining.len())
        .ok_or_else(|| WireError::Truncated(field.name.to_string()))?;
    let (body, rest) = remaining.split_at(length);
    *buffer = rest;
    Ok(body)
}

macro_rules! merge_one {
    ($module:ident, $variant:ident, $wire_type:expr, $buffer:expr) => {{
        let mut value = Default::default();
        encoding::$module::merge($wire_type, &mut value, $buffer, DecodeContext::default())?;
        Value::$variant(value)
    }};
}

macro_rules! merge_many {
    ($module:ident, $variant:ident, $wire_type:expr, $buffer:expr) => {{
        let mut values = Vec::new();
        encoding::$module::merge_repeated($wire_type, &mut values, $buffer, DecodeContext::default())?;
        values.into_iter().map(Value::$variant).collect()
    }};
}

fn decode_scalar(
    field: &FieldDescriptor,
    wire_type: WireType,
    buffer: &mut &[u8],
) -> Result<Value, WireError> {
    Ok(match field.kind {
        FieldKind::Double => merge_one!(double, F64, wire_type, buffer),
        FieldKind::Float => merge_one!(float, F32, wire_type, buffer),
        FieldKind::Int32 => merge_one!(int32, I32, wire_type, buffer),
        FieldKind::Int64 => merge_one!(int64, I64, wire_type, buffer),
        FieldKind::UInt32 => merge_one!(uint32, U32, wire_type, buffer),
        FieldKind::UInt64 => merge_one!(uint64, U64, wire_type, buffer),
        FieldKind::SInt32 => merge_one!(sint32, I32, wire_type, buffer),
        FieldKind::SInt64 => merge_one!(sint64, I64, wire_type, buffer),
        FieldKind::Fixed32 => merge_one!(fixed32, U32, wire_type, buffer),
        FieldKind::Fixed64 => merge_one!(fixed64, U64, wire_type, buffer),
        FieldKind::SFixed32 => merge_one!(sfixed32, I32, wire_type, buffer),
        FieldKind::SFixed64 => merge_one!(sfixed64, I64, wire_type, buffer),
        FieldKind::Bool => merge_one!(bool, Bool, wire_type, buffer),
        FieldKind::String => merge_one!(string, String, wire_type, buffer),
        FieldKind::Bytes => {
            let mut value: Vec<u8> = Vec::new();
            encoding::bytes::merge(wire_type, &mut value, buffer, DecodeContext::default())?;
            Value::Bytes(value)
        }
        FieldKind::Enum(_) => merge_one!(int32, Enum, wire_type, buffer),
        FieldKind::Message(_) => {
            return Err(WireError::WireType {
                field: field.name.to_string(),
                found: wire_type,
            })
        }
    })
}

fn decode_repeated(
    field: &FieldDescriptor,
    wire_type: WireType,
    buffer: &mut &[u8],
) -> Result<Vec<Value>, WireError> {
    Ok(match field.kind {
        FieldKind::Double => merge_many!(double, F64, wire_type, buffer),
        FieldKind::Float => merge_many!(float, F32, wire_type, buffer),
        FieldKind::Int32 => merge_many!(int32, I32, wire_type, buffer),
        FieldKind::Int64 => merge_many!(int64, I64, wire_type, buffer),
        FieldKind::UInt32 => merge_many!(uint32, U32, wire_type, buffer),
        FieldKind::UInt64 => merge_many!(uint64, U64, wire_type, buffer),
        FieldKind::SInt32 => merge_many!(sint32, I32, wire_type, buffer),
        FieldKind::SInt64 => merge_many!(sint64, I64, wire_type, buffer),
        FieldKind::Fixed32 => merge_many!(fixed32, U32, wire_type, buffer),
        FieldKind::Fixed64 => merge_many!(fixed64, U64, wire_type, buffer),
        FieldKind::SFixed32 => merge_many!(sfixed32, I32, wire_type, buffer),
        FieldKind::SFixed64 => merge_many!(sfixed64, I64, wire_type, buffer),
        FieldKind::Bool => merge_many!(bool, Bool, wire_type, buffer),
        FieldKind::Enum(_) => merge_many!(int32, Enum, wire_type, buffer),
        FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) => {
            vec![decode_scalar(field, wire_type, buffer)?]
        }
    })
}
