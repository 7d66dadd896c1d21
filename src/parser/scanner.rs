use std::str::Chars;

use super::token::{Token, TokenKind, classify_word};

/// Upper bound on loop iterations for a single whitespace or word run.
///
/// A run that reaches the bound ends early with what it has accumulated;
/// the remaining runes are picked up by the next call to [`Scanner::next_token`].
pub const MAX_RUN_ITERATIONS: usize = 300;

/// Forward-only lexical scanner over a stream of runes.
///
/// Holds at most one pushed-back rune, which is how a run peeks at the rune
/// that ends it without losing it.
pub struct Scanner<I: Iterator<Item = char>> {
    source: I,
    pushback: Option<char>,
    truncated_runs: usize,
    finished: bool,
}

impl<'a> Scanner<Chars<'a>> {
    pub fn for_input(input: &'a str) -> Self {
        Self::new(input.chars())
    }
}

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            pushback: None,
            truncated_runs: 0,
            finished: false,
        }
    }

    /// Number of runs that stopped at [`MAX_RUN_ITERATIONS`].
    pub fn truncated_runs(&self) -> usize {
        self.truncated_runs
    }

    fn read(&mut self) -> Option<char> {
        self.pushback.take().or_else(|| self.source.next())
    }

    fn unread(&mut self, ch: char) {
        debug_assert!(self.pushback.is_none(), "only one rune of pushback");
        self.pushback = Some(ch);
    }

    /// Return the next token. Once the input is exhausted every call returns
    /// an `Eof` token with an empty literal.
    pub fn next_token(&mut self) -> Token {
        let Some(ch) = self.read() else {
            return Token::eof();
        };
        self.unread(ch);
        if is_whitespace(ch) {
            self.scan_run(TokenKind::Whitespace)
        } else {
            self.scan_run(TokenKind::Word)
        }
    }

    /// Consume the current rune and every following rune of the same class.
    fn scan_run(&mut self, kind: TokenKind) -> Token {
        let want_whitespace = kind == TokenKind::Whitespace;
        let mut buf = String::new();
        if let Some(first) = self.read() {
            buf.push(first);
        }

        let mut iterations = 0;
        loop {
            if iterations >= MAX_RUN_ITERATIONS {
                self.truncated_runs += 1;
                tracing::warn!(
                    kind = %kind,
                    limit = MAX_RUN_ITERATIONS,
                    accumulated = buf.len(),
                    "scan run hit iteration limit; emitting partial token"
                );
                break;
            }
            iterations += 1;

            match self.read() {
                None => break,
                Some(ch) if is_whitespace(ch) != want_whitespace => {
                    self.unread(ch);
                    break;
                }
                Some(ch) => buf.push(ch),
            }
        }

        if want_whitespace {
            Token::new(TokenKind::Whitespace, buf)
        } else {
            Token::new(classify_word(&buf), buf)
        }
    }
}

/// Yields tokens up to, but not including, `Eof`.
impl<I: Iterator<Item = char>> Iterator for Scanner<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.finished = true;
            return None;
        }
        Some(token)
    }
}

pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n')
}

/// Scan a whole string, excluding the trailing `Eof`.
pub fn tokenize(input: &str) -> Vec<Token> {
    Scanner::for_input(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_eof() {
        let mut scanner = Scanner::for_input("");
        assert_eq!(scanner.next_token(), Token::eof());
        assert_eq!(scanner.next_token(), Token::eof());
    }

    #[test]
    fn whitespace_only_is_single_token() {
        let mut scanner = Scanner::for_input(" \t\n  ");
        assert_eq!(scanner.next_token(), Token::new(TokenKind::Whitespace, " \t\n  "));
        assert!(scanner.next_token().is_eof());
    }

    #[test]
    fn words_and_whitespace_alternate() {
        let tokens = tokenize("iam  rol");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Word, "iam"),
                Token::new(TokenKind::Whitespace, "  "),
                Token::new(TokenKind::Word, "rol"),
            ]
        );
    }

    #[test]
    fn keyword_exact_match_only() {
        assert_eq!(
            kinds("OPEN_ALL foo"),
            vec![TokenKind::OpenAll, TokenKind::Whitespace, TokenKind::Word]
        );
        assert_eq!(kinds("OPEN_ALLfoo"), vec![TokenKind::Word]);
        assert_eq!(kinds("open_all"), vec![TokenKind::Word]);
        assert_eq!(
            kinds("s3 OPEN_ALL"),
            vec![TokenKind::Word, TokenKind::Whitespace, TokenKind::OpenAll]
        );
    }

    #[test]
    fn carriage_return_is_part_of_a_word() {
        assert_eq!(kinds("a\rb"), vec![TokenKind::Word]);
    }

    #[test]
    fn unbounded_source_is_cut_at_limit() {
        let mut scanner = Scanner::new(std::iter::repeat('a'));
        let first = scanner.next_token();
        assert_eq!(first.kind, TokenKind::Word);
        assert_eq!(first.literal.len(), MAX_RUN_ITERATIONS + 1);
        assert_eq!(scanner.truncated_runs(), 1);

        let second = scanner.next_token();
        assert_eq!(second.literal.len(), MAX_RUN_ITERATIONS + 1);
        assert_eq!(scanner.truncated_runs(), 2);
    }

    #[test]
    fn long_run_splits_but_stays_lossless() {
        let input = format!("{} x", "b".repeat(MAX_RUN_ITERATIONS * 2));
        let mut scanner = Scanner::for_input(&input);
        let tokens: Vec<Token> = scanner.by_ref().collect();
        assert!(tokens.len() > 3);
        assert_eq!(scanner.truncated_runs(), 1);
        let rebuilt: String = tokens.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn non_ascii_words() {
        let tokens = tokenize("café ünïcode");
        assert_eq!(tokens[0].literal, "café");
        assert_eq!(tokens[2].literal, "ünïcode");
    }

    proptest! {
        #[test]
        fn tokenization_is_lossless(input in "[a-zA-Z0-9_$ \t\n\r.-]{0,64}") {
            let rebuilt: String = tokenize(&input).iter().map(|t| t.literal.as_str()).collect();
            prop_assert_eq!(rebuilt, input);
        }

        #[test]
        fn keyword_iff_whole_run(prefix in "[a-z]{0,3}", suffix in "[a-z]{0,3}") {
            let word = format!("{prefix}OPEN_ALL{suffix}");
            let tokens = tokenize(&word);
            prop_assert_eq!(tokens.len(), 1);
            let expected = if prefix.is_empty() && suffix.is_empty() {
                TokenKind::OpenAll
            } else {
                TokenKind::Word
            };
            prop_assert_eq!(tokens[0].kind, expected);
        }

        #[test]
        fn runs_never_mix_classes(input in "[ab \t]{0,40}") {
            for token in tokenize(&input) {
                let ws = token.literal.chars().filter(|c| is_whitespace(*c)).count();
                let len = token.literal.chars().count();
                match token.kind {
                    TokenKind::Whitespace => prop_assert_eq!(ws, len),
                    _ => prop_assert_eq!(ws, 0),
                }
            }
        }
    }
}
