use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::error::MessageError;
use crate::message::DynamicMessage;

/// A single field value.
///
/// Each field kind is stored with one canonical variant: `int32`, `sint32`
/// and `sfixed32` as `I32`, `uint32` and `fixed32` as `U32`, and so on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Message(Box<DynamicMessage>),
}

impl Value {
    /// Whether the value is the implicit default of its type.
    ///
    /// Messages are never default: a message value is present once stored.
    /// A negative zero is not the default.
    pub fn is_default(&self) -> bool {
        match self {
            Self::Bool(value) => !value,
            Self::I32(value) | Self::Enum(value) => *value == 0,
            Self::I64(value) => *value == 0,
            Self::U32(value) => *value == 0,
            Self::U64(value) => *value == 0,
            Self::F32(value) => value.to_bits() == 0,
            Self::F64(value) => value.to_bits() == 0,
            Self::String(value) => value.is_empty(),
            Self::Bytes(value) => value.is_empty(),
            Self::Message(_) => false,
        }
    }

    /// A short description of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }

    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_message_mut(&mut self) -> Option<&mut DynamicMessage> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::I32(value) | Self::Enum(value) => Some(value.into()),
            Self::I64(value) => Some(value.into()),
            Self::U32(value) => Some(value.into()),
            Self::U64(value) => Some(value.into()),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match *self {
            Self::F32(value) => Some(value.into()),
            Self::F64(value) => Some(value),
            _ => self.as_integer().map(|value| value as f64),
        }
    }
}

/// Convert a value to the canonical variant of the field's kind.
///
/// Integers are accepted by every integer kind as long as they fit, and by
/// the float kinds. Text and bytes are distinct. Enums take a number or the
/// name of one of their values. Messages must share the field's schema.
pub(crate) fn coerce(field: &FieldDescriptor, value: Value) -> Result<Value, MessageError> {
    let mismatch = |value: &Value| MessageError::TypeMismatch {
        field: field.name.to_string(),
        expected: field.kind.type_name().to_string(),
        found: value.kind_name(),
    };
    let out_of_range = |value: i128| MessageError::OutOfRange {
        field: field.name.to_string(),
        expected: field.kind.type_name().to_string(),
        value: value.to_string(),
    };

    match field.kind {
        FieldKind::Bool => match value {
            Value::Bool(_) => Ok(value),
            other => Err(mismatch(&other)),
        },
        FieldKind::String => match value {
            Value::String(_) => Ok(value),
            other => Err(mismatch(&other)),
        },
        FieldKind::Bytes => match value {
            Value::Bytes(_) => Ok(value),
            other => Err(mismatch(&other)),
        },
        FieldKind::Float => match value.as_float() {
            Some(number) => Ok(Value::F32(number as f32)),
            None => Err(mismatch(&value)),
        },
        FieldKind::Double => match value.as_float() {
            Some(number) => Ok(Value::F64(number)),
            None => Err(mismatch(&value)),
        },
        FieldKind::Enum(descriptor) => match value {
            Value::String(ref name) => descriptor
                .number_of(name)
                .map(Value::Enum)
                .ok_or_else(|| MessageError::UnknownEnumValue {
                    enumeration: descriptor.full_name.to_string(),
                    value: name.clone(),
                }),
            other => {
                let number = other.as_integer().ok_or_else(|| mismatch(&other))?;
                i32::try_from(number)
                    .map(Value::Enum)
                    .map_err(|_| out_of_range(number))
            }
        },
        FieldKind::Message(descriptor) => match value {
            Value::Message(message) => {
                if message.descriptor().same_schema(descriptor) {
                    Ok(Value::Message(message))
                } else {
                    Err(MessageError::SchemaMismatch {
                        expected: descriptor.full_name.to_string(),
                        found: message.descriptor().full_name.to_string(),
                    })
                }
            }
            other => Err(mismatch(&other)),
        },
        kind => {
            let number = value.as_integer().ok_or_else(|| mismatch(&value))?;
            let converted = match kind {
                FieldKind::Int32 | FieldKind::SInt32 | FieldKind::SFixed32 => {
                    i32::try_from(number).map(Value::I32).ok()
                }
                FieldKind::Int64 | FieldKind::SInt64 | FieldKind::SFixed64 => {
                    i64::try_from(number).map(Value::I64).ok()
                }
                FieldKind::UInt32 | FieldKind::Fixed32 => {
                    u32::try_from(number).map(Value::U32).ok()
                }
                FieldKind::UInt64 | FieldKind::Fixed64 => {
                    u64::try_from(number).map(Value::U64).ok()
                }
                _ => None,
            };
            converted.ok_or_else(|| out_of_range(number))
        }
    }
}
