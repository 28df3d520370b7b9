//! Read a message in one encoding and write it in another.

use clap::ValueEnum;
use kortex_message::json::{self, JsonPrintOptions};
use kortex_message::{text_format, wire, DynamicMessage, MessageDescriptor};
use log::debug;

use crate::application::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Json,
    /// The line-oriented text format.
    Text,
    /// The binary protocol-buffer encoding.
    Wire,
}

pub fn read_message(
    descriptor: &'static MessageDescriptor,
    encoding: Encoding,
    input: Vec<u8>,
) -> Result<DynamicMessage, AppError> {
    debug!(
        "Reading {} bytes of {encoding:?} as a {}.",
        input.len(),
        descriptor.name()
    );
    let message = match encoding {
        Encoding::Json => json::from_json(descriptor, &String::from_utf8(input)?)?,
        Encoding::Text => text_format::from_text(descriptor, &String::from_utf8(input)?)?,
        Encoding::Wire => wire::decode(descriptor, &input)?,
    };
    Ok(message)
}

/// Text outputs end with a new line; the wire output is written as is.
pub fn write_message(
    message: &DynamicMessage,
    encoding: Encoding,
    json_options: &JsonPrintOptions,
) -> Vec<u8> {
    match encoding {
        Encoding::Json => {
            let mut output = json::to_json_with(message, json_options);
            output.push('\n');
            output.into_bytes()
        }
        Encoding::Text => text_format::to_text(message).into_bytes(),
        Encoding::Wire => wire::encode(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kortex_proto::base::SEQUENCE;
    use rstest::rstest;

    fn sequence() -> DynamicMessage {
        let mut sequence = DynamicMessage::new(&SEQUENCE);
        sequence.set("name", "A Name").unwrap();
        sequence
            .add("tasks")
            .unwrap()
            .set("group_identifier", 10)
            .unwrap();
        sequence
    }

    #[rstest]
    fn test_conversion_round_trip(
        #[values(Encoding::Json, Encoding::Text, Encoding::Wire)] encoding: Encoding,
    ) {
        let written = write_message(&sequence(), encoding, &JsonPrintOptions::default());
        let read = read_message(&SEQUENCE, encoding, written).unwrap();
        assert_eq!(read, sequence());
    }

    #[test]
    fn test_compact_json() {
        let options = JsonPrintOptions {
            indent: None,
            ..Default::default()
        };
        let written = write_message(&sequence(), Encoding::Json, &options);
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "{\"name\":\"A Name\",\"tasks\":[{\"groupIdentifier\":10}]}\n"
        );
    }

    #[test]
    fn test_text_input_must_be_utf8() {
        let error = read_message(&SEQUENCE, Encoding::Text, vec![0xff]).unwrap_err();
        assert!(matches!(error, AppError::InputNotText(_)));
    }
}
