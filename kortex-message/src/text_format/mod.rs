//! The line-oriented text format.
//!
//! ```text
//! name: "A Name"
//! tasks {
//!   group_identifier: 10
//! }
//! ```
//!
//! Fields come in declaration order, one line per scalar value and one block
//! per message value. Absent fields are not written.

mod lexer;
mod parser;
pub(crate) mod printer;

use thiserror::Error;

use crate::descriptor::MessageDescriptor;
use crate::error::MessageError;
use crate::message::DynamicMessage;

#[derive(Error, Debug)]
pub enum TextFormatError {
    #[error("{line}:{column}: {reason}.")]
    Syntax {
        line: usize,
        column: usize,
        reason: String,
    },
    #[error("{line}:{column}: {source}")]
    Field {
        line: usize,
        column: usize,
        source: MessageError,
    },
}

/// Write a message in the text format.
pub fn to_text(message: &DynamicMessage) -> String {
    message.to_string()
}

/// Read a message of the given schema from the text format.
pub fn from_text(
    descriptor: &'static MessageDescriptor,
    text: &str,
) -> Result<DynamicMessage, TextFormatError> {
    let mut message = DynamicMessage::new(descriptor);
    merge_text(&mut message, text)?;
    Ok(message)
}

/// Read the text format into an existing message.
///
/// Singular fields that appear in the text replace the current values,
/// repeated fields get the new elements appended.
pub fn merge_text(message: &mut DynamicMessage, text: &str) -> Result<(), TextFormatError> {
    parser::Parser::new(text).parse_message(message, None)
}
