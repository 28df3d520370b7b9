use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::error::MessageError;
use crate::message::{DynamicMessage, RECURSION_LIMIT};
use crate::value::Value;

use super::lexer::{Lexer, Location, Token};
use super::TextFormatError;

fn syntax(location: Location, reason: impl Into<String>) -> TextFormatError {
    TextFormatError::Syntax {
        line: location.line,
        column: location.column,
        reason: reason.into(),
    }
}

fn field_error(location: Location, source: MessageError) -> TextFormatError {
    TextFormatError::Field {
        line: location.line,
        column: location.column,
        source,
    }
}

pub(super) struct Parser {
    lexer: Lexer,
    peeked: Option<(Token, Location)>,
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, TextFormatError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(token, _)| token))
    }

    fn next(&mut self) -> Result<Option<(Token, Location)>, TextFormatError> {
        match self.peeked.take() {
            Some(peeked) => Ok(Some(peeked)),
            None => self.lexer.next_token(),
        }
    }

    fn location(&self) -> Location {
        match &self.peeked {
            Some((_, location)) => *location,
            None => self.lexer.location(),
        }
    }

    fn try_consume(&mut self, symbol: char) -> Result<bool, TextFormatError> {
        if self.peek()? == Some(&Token::Symbol(symbol)) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, symbol: char) -> Result<(), TextFormatError> {
        match self.next()? {
            Some((Token::Symbol(found), _)) if found == symbol => Ok(()),
            Some((token, location)) => Err(syntax(
                location,
                format!("expected \"{symbol}\", found {}", token.describe()),
            )),
            None => Err(syntax(
                self.location(),
                format!("expected \"{symbol}\", reached the end of the input"),
            )),
        }
    }

    /// Read fields into `message` until `closing`, or the end of the input
    /// for the top-level message.
    pub fn parse_message(
        &mut self,
        message: &mut DynamicMessage,
        closing: Option<char>,
    ) -> Result<(), TextFormatError> {
        loop {
            let Some((token, location)) = self.next()? else {
                return match closing {
                    None => Ok(()),
                    Some(symbol) => Err(syntax(
                        self.location(),
                        format!("expected \"{symbol}\", reached the end of the input"),
                    )),
                };
            };
            match token {
                Token::Symbol(symbol) if Some(symbol) == closing => return Ok(()),
                Token::Identifier(name) => {
                    self.parse_field(message, &name, location)?;
                    if !self.try_consume(',')? {
                        self.try_consume(';')?;
                    }
                }
                other => {
                    return Err(syntax(
                        location,
                        format!("expected a field name, found {}", other.describe()),
                    ))
                }
            }
        }
    }

    fn parse_field(
        &mut self,
        message: &mut DynamicMessage,
        name: &str,
        location: Location,
    ) -> Result<(), TextFormatError> {
        let descriptor = message.descriptor();
        let field = descriptor.field_by_name(name).ok_or_else(|| {
            field_error(
                location,
                MessageError::UnknownField {
                    message: descriptor.full_name.to_string(),
                    field: name.to_string(),
                },
            )
        })?;

        if field.kind.is_message() {
            let has_colon = self.try_consume(':')?;
            if has_colon && self.try_consume('[')? {
                self.parse_list(message, field, |parser, message| {
                    parser.parse_nested(message, field)
                })
            } else {
                self.parse_nested(message, field)
            }
        } else {
            self.expect(':')?;
            if self.try_consume('[')? {
                self.parse_list(message, field, |parser, message| {
                    parser.parse_scalar_into(message, field)
                })
            } else {
                self.parse_scalar_into(message, field)
            }
        }
    }

    /// Parse the elements of `[a, b, ...]`, the opening bracket consumed.
    fn parse_list(
        &mut self,
        message: &mut DynamicMessage,
        field: &'static FieldDescriptor,
        mut parse_element: impl FnMut(&mut Self, &mut DynamicMessage) -> Result<(), TextFormatError>,
    ) -> Result<(), TextFormatError> {
        if !field.is_repeated() {
            return Err(field_error(
                self.location(),
                MessageError::NotRepeated(field.name.to_string()),
            ));
        }
        if self.try_consume(']')? {
            return Ok(());
        }
        loop {
            parse_element(self, message)?;
            if !self.try_consume(',')? {
                return self.expect(']');
            }
        }
    }

    fn parse_nested(
        &mut self,
        message: &mut DynamicMessage,
        field: &'static FieldDescriptor,
    ) -> Result<(), TextFormatError> {
        let location = self.location();
        let closing = if self.try_consume('{')? {
            '}'
        } else if self.try_consume('<')? {
            '>'
        } else {
            return Err(syntax(location, "expected \"{\" or \"<\""));
        };
        if self.depth >= RECURSION_LIMIT {
            return Err(syntax(location, "recursion limit reached"));
        }
        let nested = if field.is_repeated() {
            message.add(field)
        } else {
            message.mutable_message(field)
        }
        .map_err(|error| field_error(location, error))?;
        self.depth += 1;
        let parsed = self.parse_message(nested, Some(closing));
        self.depth -= 1;
        parsed
    }

    fn parse_scalar_into(
        &mut self,
        message: &mut DynamicMessage,
        field: &'static FieldDescriptor,
    ) -> Result<(), TextFormatError> {
        let location = self.location();
        let value = self.parse_scalar(field)?;
        let stored = if field.is_repeated() {
            message.push(field, value)
        } else {
            message.set(field, value)
        };
        stored.map_err(|error| field_error(location, error))
    }

    fn parse_scalar(&mut self, field: &FieldDescriptor) -> Result<Value, TextFormatError> {
        let location = self.location();
        match field.kind {
            FieldKind::String => {
                let bytes = self.parse_bytes()?;
                String::from_utf8(bytes)
                    .map(Value::String)
                    .map_err(|_| syntax(location, "string is not valid UTF-8"))
            }
            FieldKind::Bytes => self.parse_bytes().map(Value::Bytes),
            FieldKind::Bool => match self.next()? {
                Some((Token::Identifier(word), _)) if matches!(word.as_str(), "true" | "True" | "t") => {
                    Ok(Value::Bool(true))
                }
                Some((Token::Identifier(word), _)) if matches!(word.as_str(), "false" | "False" | "f") => {
                    Ok(Value::Bool(false))
                }
                Some((Token::Number(text), _)) if text == "1" => Ok(Value::Bool(true)),
                Some((Token::Number(text), _)) if text == "0" => Ok(Value::Bool(false)),
                other => Err(unexpected(other, location, "a boolean")),
            },
            FieldKind::Enum(_) => {
                let negative = self.try_consume('-')?;
                match self.next()? {
                    Some((Token::Identifier(name), _)) if !negative => Ok(Value::String(name)),
                    Some((Token::Number(text), location)) => integer_value(&text, negative, location),
                    other => Err(unexpected(other, location, "an enum value")),
                }
            }
            FieldKind::Float | FieldKind::Double => {
                let negative = self.try_consume('-')?;
                let magnitude = match self.next()? {
                    Some((Token::Number(text), location)) => parse_float(&text)
                        .ok_or_else(|| syntax(location, format!("{text} is not a number")))?,
                    Some((Token::Identifier(word), location)) => {
                        match word.to_ascii_lowercase().as_str() {
                            "inf" | "infinity" => f64::INFINITY,
                            "nan" => f64::NAN,
                            _ => return Err(syntax(location, format!("{word} is not a number"))),
                        }
                    }
                    other => return Err(unexpected(other, location, "a number")),
                };
                Ok(Value::F64(if negative { -magnitude } else { magnitude }))
            }
            FieldKind::Message(_) => Err(syntax(location, "expected \"{\"")),
            _ => {
                let negative = self.try_consume('-')?;
                match self.next()? {
                    Some((Token::Number(text), location)) => integer_value(&text, negative, location),
                    other => Err(unexpected(other, location, "an integer")),
                }
            }
        }
    }

    /// One string, or several adjacent ones concatenated.
    fn parse_bytes(&mut self) -> Result<Vec<u8>, TextFormatError> {
        let location = self.location();
        let mut bytes = match self.next()? {
            Some((Token::String(bytes), _)) => bytes,
            other => return Err(unexpected(other, location, "a string")),
        };
        while matches!(self.peek()?, Some(Token::String(_))) {
            if let Some((Token::String(more), _)) = self.next()? {
                bytes.extend(more);
            }
        }
        Ok(bytes)
    }
}

fn unexpected(found: Option<(Token, Location)>, location: Location, expected: &str) -> TextFormatError {
    match found {
        Some((token, location)) => syntax(
            location,
            format!("expected {expected}, found {}", token.describe()),
        ),
        None => syntax(
            location,
            format!("expected {expected}, reached the end of the input"),
        ),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    let digits = text.trim_end_matches(|c: char| c == 'f' || c == 'F');
    digits.parse().ok()
}

/// Parse a decimal, hexadecimal (`0x`) or octal (leading `0`) integer.
fn parse_integer(text: &str, negative: bool) -> Option<i128> {
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn integer_value(text: &str, negative: bool, location: Location) -> Result<Value, TextFormatError> {
    let number = parse_integer(text, negative)
        .ok_or_else(|| syntax(location, format!("{text} is not an integer")))?;
    if let Ok(number) = i64::try_from(number) {
        Ok(Value::I64(number))
    } else if let Ok(number) = u64::try_from(number) {
        Ok(Value::U64(number))
    } else {
        Err(syntax(location, format!("{number} does not fit in 64 bits")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10", false, Some(10))]
    #[case("10", true, Some(-10))]
    #[case("0x1f", false, Some(31))]
    #[case("017", false, Some(15))]
    #[case("0", false, Some(0))]
    #[case("08", false, None)]
    #[case("1.5", false, None)]
    #[case("0x", false, None)]
    fn test_parse_integer(#[case] text: &str, #[case] negative: bool, #[case] expected: Option<i128>) {
        assert_eq!(parse_integer(text, negative), expected);
    }

    #[rstest]
    #[case("1.5", 1.5)]
    #[case("2f", 2.0)]
    #[case("1e-3", 0.001)]
    #[case(".25", 0.25)]
    fn test_parse_float(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_float(text), Some(expected));
    }
}
