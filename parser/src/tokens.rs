/// A single token lexed from method source
#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    Id(String),

    LiteralInt(u64),
    LiteralUInt(u64),
    LiteralFloat(f32),
    LiteralDouble(f64),
    True,
    False,

    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftSquareBracket,
    RightSquareBracket,
    Semicolon,
    Comma,
    Period,
    QuestionMark,
    Colon,

    Plus,
    PlusPlus,
    PlusEquals,
    Minus,
    MinusMinus,
    MinusEquals,
    Asterix,
    AsterixEquals,
    ForwardSlash,
    ForwardSlashEquals,
    Percent,
    VerticalBar,
    VerticalBarVerticalBar,
    Ampersand,
    AmpersandAmpersand,
    Hat,
    Tilde,
    ExclamationPoint,
    ExclamationPointEquals,
    Equals,
    EqualsEquals,
    LeftAngleBracket,
    LeftAngleBracketEquals,
    LeftShift,
    RightAngleBracket,
    RightAngleBracketEquals,
    RightShift,

    If,
    Else,
    For,
    While,
    Return,
    Break,
    Continue,
    New,
}
