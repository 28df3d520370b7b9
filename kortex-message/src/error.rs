use thiserror::Error;

/// What went wrong while reading or writing a field of a message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MessageError {
    #[error("{message} has no field named \"{field}\".")]
    UnknownField { message: String, field: String },
    #[error("{message} has no field number {number}.")]
    UnknownFieldNumber { message: String, number: u32 },
    #[error("Field {field} expects a value of type {expected}, got a {found}.")]
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },
    #[error("Value {value} does not fit in field {field} of type {expected}.")]
    OutOfRange {
        field: String,
        expected: String,
        value: String,
    },
    #[error("{value} is not a value of enum {enumeration}.")]
    UnknownEnumValue { enumeration: String, value: String },
    #[error("Field {0} is repeated.")]
    Repeated(String),
    #[error("Field {0} is not repeated.")]
    NotRepeated(String),
    #[error("Field {0} does not hold a message.")]
    NotAMessage(String),
    #[error("Cannot combine a {found} with a {expected}.")]
    SchemaMismatch { expected: String, found: String },
}
