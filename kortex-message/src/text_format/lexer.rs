use super::TextFormatError;

/// Where a token starts in the input, counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Identifier(String),
    /// The raw text of a number, without its sign.
    Number(String),
    /// A quoted string, escapes resolved.
    String(Vec<u8>),
    Symbol(char),
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("\"{name}\""),
            Self::Number(text) => format!("number {text}"),
            Self::String(_) => String::from("a string"),
            Self::Symbol(symbol) => format!("\"{symbol}\""),
        }
    }
}

pub(super) struct Lexer {
    chars: Vec<char>,
    position: usize,
    location: Location,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
            location: Location { line: 1, column: 1 },
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_second_char(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let character = self.peek_char()?;
        self.position += 1;
        if character == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(character)
    }

    fn error(&self, reason: impl Into<String>) -> TextFormatError {
        TextFormatError::Syntax {
            line: self.location.line,
            column: self.location.column,
            reason: reason.into(),
        }
    }

    /// Skip white spaces and `#` comments.
    fn skip_blanks(&mut self) {
        while let Some(character) = self.peek_char() {
            if character.is_whitespace() {
                self.bump();
            } else if character == '#' {
                while let Some(character) = self.bump() {
                    if character == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Option<(Token, Location)>, TextFormatError> {
        self.skip_blanks();
        let location = self.location;
        let Some(character) = self.peek_char() else {
            return Ok(None);
        };
        let starts_number = character.is_ascii_digit()
            || (character == '.' && self.peek_second_char().is_some_and(|c| c.is_ascii_digit()));
        let token = if starts_number {
            Token::Number(self.read_number())
        } else if character.is_alphabetic() || character == '_' {
            Token::Identifier(self.read_identifier())
        } else if character == '"' || character == '\'' {
            Token::String(self.read_string()?)
        } else {
            self.bump();
            Token::Symbol(character)
        };
        Ok(Some((token, location)))
    }

    fn read_identifier(&mut self) -> String {
        let mut identifier = String::new();
        while let Some(character) = self.peek_char() {
            if character.is_alphanumeric() || character == '_' {
                identifier.push(character);
                self.bump();
            } else {
                break;
            }
        }
        identifier
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        let mut previous = ' ';
        while let Some(character) = self.peek_char() {
            let is_hex = text.starts_with("0x") || text.starts_with("0X");
            let exponent_sign =
                matches!(character, '+' | '-') && matches!(previous, 'e' | 'E') && !is_hex;
            if character.is_ascii_alphanumeric() || character == '.' || exponent_sign {
                text.push(character);
                previous = character;
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    fn read_string(&mut self) -> Result<Vec<u8>, TextFormatError> {
        let Some(quote) = self.bump() else {
            return Err(self.error("expected a string"));
        };
        let mut bytes = Vec::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(character) if character == quote => return Ok(bytes),
                Some('\\') => self.read_escape(&mut bytes)?,
                Some(character) => {
                    let mut buffer = [0u8; 4];
                    bytes.extend_from_slice(character.encode_utf8(&mut buffer).as_bytes());
                }
            }
        }
    }

    fn read_escape(&mut self, bytes: &mut Vec<u8>) -> Result<(), TextFormatError> {
        let Some(escaped) = self.bump() else {
            return Err(self.error("unterminated string"));
        };
        match escaped {
            'n' => bytes.push(b'\n'),
            'r' => bytes.push(b'\r'),
            't' => bytes.push(b'\t'),
            'a' => bytes.push(0x07),
            'b' => bytes.push(0x08),
            'f' => bytes.push(0x0c),
            'v' => bytes.push(0x0b),
            '\\' | '\'' | '"' | '?' => bytes.push(escaped as u8),
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek_char().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            self.bump();
                        }
                        None => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| self.error(format!("octal escape {value:o} is above \\377")))?;
                bytes.push(byte);
            }
            'x' => {
                let value = self.read_hex_digits(1, 2)?;
                // Two hexadecimal digits always fit in a byte.
                bytes.push(value as u8);
            }
            'u' | 'U' => {
                let length = if escaped == 'u' { 4 } else { 8 };
                let value = self.read_hex_digits(length, length)?;
                let character = char::from_u32(value)
                    .ok_or_else(|| self.error(format!("\\{escaped}{value:x} is not a character")))?;
                let mut buffer = [0u8; 4];
                bytes.extend_from_slice(character.encode_utf8(&mut buffer).as_bytes());
            }
            other => return Err(self.error(format!("unknown escape \\{other}"))),
        }
        Ok(())
    }

    fn read_hex_digits(&mut self, minimum: usize, maximum: usize) -> Result<u32, TextFormatError> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < maximum {
            let Some(digit) = self.peek_char().and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value * 16 + digit;
            count += 1;
            self.bump();
        }
        if count < minimum {
            return Err(self.error(format!("expected {minimum} hexadecimal digits")));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some((token, _)) = lexer.next_token().unwrap() {
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_field_line() {
        assert_eq!(
            tokens("group_identifier: 10 # comment\ntasks {}"),
            vec![
                Token::Identifier(String::from("group_identifier")),
                Token::Symbol(':'),
                Token::Number(String::from("10")),
                Token::Identifier(String::from("tasks")),
                Token::Symbol('{'),
                Token::Symbol('}'),
            ]
        );
    }

    #[rstest]
    #[case("1.5e-3", "1.5e-3")]
    #[case("0x1F", "0x1F")]
    #[case("2.0f", "2.0f")]
    #[case(".5", ".5")]
    fn test_numbers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(tokens(input), vec![Token::Number(String::from(expected))]);
    }

    #[test]
    fn test_negative_number_is_a_symbol_then_a_number() {
        assert_eq!(
            tokens("-3"),
            vec![Token::Symbol('-'), Token::Number(String::from("3"))]
        );
    }

    #[rstest]
    #[case(r#""A Name""#, b"A Name".to_vec())]
    #[case(r#"'single'"#, b"single".to_vec())]
    #[case(r#""\n\t\\\"\'""#, b"\n\t\\\"'".to_vec())]
    #[case(r#""\000\177\377""#, vec![0, 127, 255])]
    #[case(r#""\x41\x7""#, vec![0x41, 0x07])]
    #[case(r#""\u00e9""#, "é".as_bytes().to_vec())]
    #[case("\"été\"", "été".as_bytes().to_vec())]
    fn test_strings(#[case] input: &str, #[case] expected: Vec<u8>) {
        assert_eq!(tokens(input), vec![Token::String(expected)]);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("name: \"abc\nnext");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let error = lexer.next_token().unwrap_err();
        assert!(matches!(error, TextFormatError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_locations() {
        let mut lexer = Lexer::new("a\n  b");
        let (_, first) = lexer.next_token().unwrap().unwrap();
        let (_, second) = lexer.next_token().unwrap().unwrap();
        assert_eq!(first, Location { line: 1, column: 1 });
        assert_eq!(second, Location { line: 2, column: 3 });
    }
}
