use crate::tokens::Token;
use crate::ParseError;

/// Lex method source text into a token stream
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        // Skip whitespace
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Skip line comments
        if c == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        // Skip block comments
        if c == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            pos += 2;
            while pos + 1 < bytes.len() && !(bytes[pos] == b'*' && bytes[pos + 1] == b'/') {
                pos += 1;
            }
            if pos + 1 >= bytes.len() {
                return Err(ParseError::UnexpectedEndOfSource);
            }
            pos += 2;
            continue;
        }

        if c.is_ascii_digit() {
            let (token, next) = lex_number(bytes, pos)?;
            tokens.push(token);
            pos = next;
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            let (token, next) = lex_word(bytes, pos);
            tokens.push(token);
            pos = next;
            continue;
        }

        let (token, next) = lex_symbol(bytes, pos)?;
        tokens.push(token);
        pos = next;
    }

    Ok(tokens)
}

/// Lex a numeric literal
///
/// Fractional literals default to single precision to match the target
/// language. The host suffixes f/F, d/D and u/U are consumed here so the
/// emitted literal is always in bare numeric form.
fn lex_number(bytes: &[u8], start: usize) -> Result<(Token, usize), ParseError> {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }

    let mut has_fraction = false;
    if pos < bytes.len() && bytes[pos] == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
    {
        has_fraction = true;
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    // Exponent part
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        has_fraction = true;
        pos += 1;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            pos += 1;
        }
        if !bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            return Err(ParseError::UnexpectedCharacter(pos));
        }
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    let digits = std::str::from_utf8(&bytes[start..pos]).unwrap();

    let token = match bytes.get(pos) {
        Some(b'f') | Some(b'F') => {
            pos += 1;
            Token::LiteralFloat(digits.parse::<f32>().unwrap())
        }
        Some(b'd') | Some(b'D') => {
            pos += 1;
            Token::LiteralDouble(digits.parse::<f64>().unwrap())
        }
        Some(b'u') | Some(b'U') if !has_fraction => {
            pos += 1;
            Token::LiteralUInt(parse_int(digits, start)?)
        }
        _ if has_fraction => Token::LiteralFloat(digits.parse::<f32>().unwrap()),
        _ => Token::LiteralInt(parse_int(digits, start)?),
    };

    Ok((token, pos))
}

/// Parse an integer literal that may be too large to represent
fn parse_int(digits: &str, start: usize) -> Result<u64, ParseError> {
    digits
        .parse::<u64>()
        .map_err(|_| ParseError::UnexpectedCharacter(start))
}

/// Lex an identifier or keyword
fn lex_word(bytes: &[u8], start: usize) -> (Token, usize) {
    let mut pos = start;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        pos += 1;
    }

    let word = std::str::from_utf8(&bytes[start..pos]).unwrap();
    let token = match word {
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "while" => Token::While,
        "return" => Token::Return,
        "break" => Token::Break,
        "continue" => Token::Continue,
        "new" => Token::New,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Id(word.to_string()),
    };

    (token, pos)
}

/// Lex an operator or punctuation token
fn lex_symbol(bytes: &[u8], pos: usize) -> Result<(Token, usize), ParseError> {
    let next = bytes.get(pos + 1).copied();

    let (token, len) = match (bytes[pos], next) {
        (b'+', Some(b'+')) => (Token::PlusPlus, 2),
        (b'+', Some(b'=')) => (Token::PlusEquals, 2),
        (b'+', _) => (Token::Plus, 1),
        (b'-', Some(b'-')) => (Token::MinusMinus, 2),
        (b'-', Some(b'=')) => (Token::MinusEquals, 2),
        (b'-', _) => (Token::Minus, 1),
        (b'*', Some(b'=')) => (Token::AsterixEquals, 2),
        (b'*', _) => (Token::Asterix, 1),
        (b'/', Some(b'=')) => (Token::ForwardSlashEquals, 2),
        (b'/', _) => (Token::ForwardSlash, 1),
        (b'%', _) => (Token::Percent, 1),
        (b'|', Some(b'|')) => (Token::VerticalBarVerticalBar, 2),
        (b'|', _) => (Token::VerticalBar, 1),
        (b'&', Some(b'&')) => (Token::AmpersandAmpersand, 2),
        (b'&', _) => (Token::Ampersand, 1),
        (b'^', _) => (Token::Hat, 1),
        (b'~', _) => (Token::Tilde, 1),
        (b'!', Some(b'=')) => (Token::ExclamationPointEquals, 2),
        (b'!', _) => (Token::ExclamationPoint, 1),
        (b'=', Some(b'=')) => (Token::EqualsEquals, 2),
        (b'=', _) => (Token::Equals, 1),
        (b'<', Some(b'=')) => (Token::LeftAngleBracketEquals, 2),
        (b'<', Some(b'<')) => (Token::LeftShift, 2),
        (b'<', _) => (Token::LeftAngleBracket, 1),
        (b'>', Some(b'=')) => (Token::RightAngleBracketEquals, 2),
        (b'>', Some(b'>')) => (Token::RightShift, 2),
        (b'>', _) => (Token::RightAngleBracket, 1),
        (b'{', _) => (Token::LeftBrace, 1),
        (b'}', _) => (Token::RightBrace, 1),
        (b'(', _) => (Token::LeftParen, 1),
        (b')', _) => (Token::RightParen, 1),
        (b'[', _) => (Token::LeftSquareBracket, 1),
        (b']', _) => (Token::RightSquareBracket, 1),
        (b';', _) => (Token::Semicolon, 1),
        (b',', _) => (Token::Comma, 1),
        (b'.', _) => (Token::Period, 1),
        (b'?', _) => (Token::QuestionMark, 1),
        (b':', _) => (Token::Colon, 1),
        _ => return Err(ParseError::UnexpectedCharacter(pos)),
    };

    Ok((token, pos + len))
}
