use std::fmt::{self, Write};

use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::message::DynamicMessage;
use crate::value::Value;

const INDENT: usize = 2;

pub(crate) fn write_message<W: Write>(
    message: &DynamicMessage,
    depth: usize,
    output: &mut W,
) -> fmt::Result {
    for (field, values) in message.present_fields() {
        for value in values {
            write_field(field, value, depth, output)?;
        }
    }
    Ok(())
}

fn write_field<W: Write>(
    field: &FieldDescriptor,
    value: &Value,
    depth: usize,
    output: &mut W,
) -> fmt::Result {
    let indent = depth * INDENT;
    match value {
        Value::Message(nested) => {
            writeln!(output, "{:indent$}{} {{", "", field.name)?;
            write_message(nested, depth + 1, output)?;
            writeln!(output, "{:indent$}}}", "")
        }
        scalar => writeln!(
            output,
            "{:indent$}{}: {}",
            "",
            field.name,
            format_scalar(&field.kind, scalar)
        ),
    }
}

fn format_scalar(kind: &FieldKind, value: &Value) -> String {
    match value {
        Value::Bool(value) => value.to_string(),
        Value::I32(value) => value.to_string(),
        Value::I64(value) => value.to_string(),
        Value::U32(value) => value.to_string(),
        Value::U64(value) => value.to_string(),
        Value::F32(value) => format_float(f64::from(*value), || format!("{value:?}")),
        Value::F64(value) => format_float(*value, || format!("{value:?}")),
        Value::String(value) => quote(value.as_bytes()),
        Value::Bytes(value) => quote(value),
        Value::Enum(number) => match kind {
            FieldKind::Enum(descriptor) => descriptor
                .name_of(*number)
                .map(str::to_string)
                .unwrap_or_else(|| number.to_string()),
            _ => number.to_string(),
        },
        // Messages are written as blocks by the caller.
        Value::Message(_) => String::new(),
    }
}

/// The shortest representation that reads back as the same number.
fn format_float(value: f64, shortest: impl FnOnce() -> String) -> String {
    if value.is_nan() {
        String::from("nan")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        shortest()
    }
}

/// Double-quote a byte sequence with C escapes.
///
/// Bytes outside of printable ASCII are written as three octal digits, so
/// the output is plain ASCII whatever the content.
pub(super) fn quote(bytes: &[u8]) -> String {
    let mut quoted = String::with_capacity(bytes.len() + 2);
    quoted.push('"');
    for &byte in bytes {
        match byte {
            b'\n' => quoted.push_str("\\n"),
            b'\r' => quoted.push_str("\\r"),
            b'\t' => quoted.push_str("\\t"),
            b'"' => quoted.push_str("\\\""),
            b'\'' => quoted.push_str("\\'"),
            b'\\' => quoted.push_str("\\\\"),
            0x20..=0x7e => quoted.push(char::from(byte)),
            _ => quoted.push_str(&format!("\\{byte:03o}")),
        }
    }
    quoted.push('"');
    quoted
}
