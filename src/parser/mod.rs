//! Lexical scanning of raw launcher queries.
//!
//! The scanner splits a query into whitespace runs and word runs without
//! consuming past the token it reports. Reserved words (currently only
//! `OPEN_ALL`) are classified after a word run has been accumulated, so the
//! scanning loop itself never needs to know about keywords.
//!
//! ```rust,ignore
//! use console_router::parser::{TokenKind, tokenize};
//!
//! let tokens = tokenize("iam OPEN_ALL");
//! assert_eq!(tokens[2].kind, TokenKind::OpenAll);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::{MAX_RUN_ITERATIONS, Scanner, tokenize};
pub use token::{RESERVED_WORDS, Token, TokenKind, classify_word};
