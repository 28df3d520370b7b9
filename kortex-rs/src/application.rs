use std::io::{Read, Write};
use std::path::PathBuf;
use std::string::FromUtf8Error;

use clap::{Parser, Subcommand};
use kortex_message::json::{JsonError, JsonPrintOptions};
use kortex_message::text_format::TextFormatError;
use kortex_message::wire::WireError;
use kortex_message::MessageError;
use log::info;
use thiserror::Error;

use crate::convert::{read_message, write_message, Encoding};
use crate::walkthrough::{self, Section};

/// Build, combine and convert Kortex API messages.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
    /// Display more information about what the software does.
    #[clap(short, long, global = true, value_parser, default_value_t = false)]
    pub verbose: bool,
    /// Be very verbose about what the software does.
    #[clap(short, long, global = true, value_parser, default_value_t = false)]
    pub trace: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay the message manipulation walkthrough.
    Walkthrough {
        #[clap(short, long, value_enum, default_value_t = Section::All)]
        section: Section,
    },
    /// Convert a message from an encoding to another.
    Convert {
        /// The message type, as a full or short name.
        #[clap(short, long, value_parser)]
        message: String,
        #[clap(long, value_enum)]
        from: Encoding,
        #[clap(long, value_enum)]
        to: Encoding,
        /// Write JSON on a single line.
        #[clap(long, value_parser, default_value_t = false)]
        compact: bool,
        /// Read from this file instead of the standard input.
        #[clap(value_parser)]
        input: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot read the input: {0}")]
    CannotReadInput(std::io::Error),
    #[error("Cannot write the output: {0}")]
    CannotWriteOutput(#[from] std::io::Error),
    #[error("The input is not valid UTF-8 text.")]
    InputNotText(#[from] FromUtf8Error),
    #[error("There is no message named {0}.")]
    UnknownMessage(String),
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error("Cannot read JSON: {0}")]
    Json(#[from] JsonError),
    #[error("Cannot read the text format: {0}")]
    TextFormat(#[from] TextFormatError),
    #[error("Cannot read the wire format: {0}")]
    Wire(#[from] WireError),
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>, AppError> {
    match path {
        Some(path) => {
            info!("Reading {}.", path.display());
            std::fs::read(path).map_err(AppError::CannotReadInput)
        }
        None => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .map_err(AppError::CannotReadInput)?;
            Ok(input)
        }
    }
}

pub fn run(cli: Cli, output: &mut impl Write) -> Result<(), AppError> {
    match cli.command {
        Command::Walkthrough { section } => walkthrough::run(section, output),
        Command::Convert {
            message,
            from,
            to,
            compact,
            input,
        } => {
            let descriptor = kortex_proto::descriptor_by_name(&message)
                .ok_or(AppError::UnknownMessage(message))?;
            let input = read_input(input.as_ref())?;
            let message = read_message(descriptor, from, input)?;
            let json_options = JsonPrintOptions {
                indent: if compact { None } else { Some(2) },
                ..Default::default()
            };
            output.write_all(&write_message(&message, to, &json_options))?;
            output.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_walkthrough() {
        let cli = Cli::try_parse_from(["kortex-cli", "walkthrough", "--section", "list", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.trace);
        assert!(matches!(
            cli.command,
            Command::Walkthrough {
                section: Section::List
            }
        ));
    }

    #[test]
    fn test_walkthrough_defaults_to_all_sections() {
        let cli = Cli::try_parse_from(["kortex-cli", "walkthrough"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Walkthrough {
                section: Section::All
            }
        ));
    }

    #[test]
    fn test_convert_requires_encodings() {
        assert!(Cli::try_parse_from(["kortex-cli", "convert", "--message", "Ssid"]).is_err());
    }

    #[test]
    fn test_convert_file() {
        let path = std::env::temp_dir().join(format!("kortex-convert-{}.txt", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "identifier: \"123\"").unwrap();
        drop(file);

        let cli = Cli::try_parse_from([
            "kortex-cli",
            "convert",
            "--message",
            "Ssid",
            "--from",
            "text",
            "--to",
            "json",
            "--compact",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let mut output = Vec::new();
        run(cli, &mut output).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "{\"identifier\":\"123\"}\n");
    }

    #[test]
    fn test_unknown_message() {
        let cli = Cli::try_parse_from([
            "kortex-cli", "convert", "-m", "Unicorn", "--from", "json", "--to", "text",
        ])
        .unwrap();
        let error = run(cli, &mut Vec::new()).unwrap_err();
        assert!(matches!(error, AppError::UnknownMessage(name) if name == "Unicorn"));
    }
}
