use std::fmt;

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Whitespace,
    Word,
    /// Reserved `OPEN_ALL` keyword.
    OpenAll,
}

impl TokenKind {
    pub fn is_reserved(self) -> bool {
        RESERVED_WORDS.iter().any(|(_, kind)| *kind == self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "EOF"),
            Self::Whitespace => write!(f, "WHITESPACE"),
            Self::Word => write!(f, "WORD"),
            Self::OpenAll => write!(f, "OPEN_ALL"),
        }
    }
}

/// Reserved words and the token kind each one scans to. Matching is exact
/// and case-sensitive against a whole word run.
pub const RESERVED_WORDS: &[(&str, TokenKind)] = &[("OPEN_ALL", TokenKind::OpenAll)];

/// Classify an accumulated word run.
pub fn classify_word(literal: &str) -> TokenKind {
    RESERVED_WORDS
        .iter()
        .find(|(word, _)| *word == literal)
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenKind::Word)
}

/// A token and the exact text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
