//! Deterministic fuzzy ranking.
//!
//! Each query word is scored against every search text of a candidate and
//! the best match per word is kept; the candidate score is the mean over
//! words. Scores fall into tiers so that a contiguous match always beats a
//! scattered one:
//!
//! ```text
//! exact            100
//! prefix            80..90
//! word-start infix  70..80
//! infix             60..70
//! subsequence       20..50
//! no match           0
//! ```
//!
//! Candidates at or below [`MIN_SCORE`] are dropped. Ordering is a stable
//! sort on score, so ties keep the order the candidates were given in.

use std::cmp::Ordering;

use crate::parser::{Scanner, TokenKind};

use super::item::ResultItem;

/// Candidates must score strictly above this to be kept.
pub const MIN_SCORE: f64 = 0.0;

/// Anything the fuzzy filter can rank.
pub trait Candidate {
    /// Texts the query is matched against, display text first.
    fn search_texts(&self) -> Vec<&str>;
}

impl Candidate for ResultItem {
    fn search_texts(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }
}

/// Query words as seen by the filter.
///
/// Reserved words are not search terms. A query with no words, or one that
/// carries `OPEN_ALL` anywhere, matches every candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    pub words: Vec<String>,
    pub open_all: bool,
}

impl QueryTerms {
    pub fn parse(query: &str) -> Self {
        let mut terms = Self::default();
        for token in Scanner::for_input(query) {
            match token.kind {
                TokenKind::Word => terms.words.push(token.literal.to_lowercase()),
                TokenKind::OpenAll => terms.open_all = true,
                TokenKind::Whitespace | TokenKind::Eof => {}
            }
        }
        terms
    }

    pub fn is_identity(&self) -> bool {
        self.open_all || self.words.is_empty()
    }
}

/// Score a single term against a single text, case-insensitively.
pub fn score_text(text: &str, term: &str) -> f64 {
    score_lowered(&text.to_lowercase(), &term.to_lowercase())
}

fn score_lowered(text: &str, term: &str) -> f64 {
    if term.is_empty() || text.is_empty() {
        return 0.0;
    }
    let term_len = term.chars().count() as f64;
    let text_len = text.chars().count() as f64;
    let coverage = (term_len / text_len).min(1.0);

    if text == term {
        return 100.0;
    }
    if text.starts_with(term) {
        return 80.0 + 10.0 * coverage;
    }
    if let Some(idx) = text.find(term) {
        let at_word_start = text[..idx]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_alphanumeric());
        let base = if at_word_start { 70.0 } else { 60.0 };
        return base + 10.0 * coverage;
    }
    if is_subsequence(term, text) {
        let run = longest_common_run(term, text) as f64;
        return 20.0 + 20.0 * (run / term_len) + 10.0 * strsim::jaro_winkler(term, text);
    }
    0.0
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle.chars().all(|n| hay.any(|h| h == n))
}

/// Length of the longest run of characters shared contiguously by both.
fn longest_common_run(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev = vec![0usize; b.len() + 1];
    let mut best = 0;
    for ca in &a {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                cur[j + 1] = prev[j] + 1;
                best = best.max(cur[j + 1]);
            }
        }
        prev = cur;
    }
    best
}

fn score_candidate<C: Candidate + ?Sized>(candidate: &C, terms: &QueryTerms) -> f64 {
    let texts: Vec<String> = candidate
        .search_texts()
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    let total: f64 = terms
        .words
        .iter()
        .map(|word| {
            texts
                .iter()
                .map(|text| score_lowered(text, word))
                .fold(0.0, f64::max)
        })
        .sum();
    total / terms.words.len() as f64
}

/// A candidate paired with its score.
#[derive(Debug)]
pub struct Ranked<'a, C> {
    pub candidate: &'a C,
    pub score: f64,
}

/// Score and order candidates against `query`.
pub fn rank<'a, C: Candidate>(candidates: &'a [C], query: &str) -> Vec<Ranked<'a, C>> {
    let terms = QueryTerms::parse(query);
    if terms.is_identity() {
        return candidates
            .iter()
            .map(|candidate| Ranked {
                candidate,
                score: 0.0,
            })
            .collect();
    }

    let mut ranked: Vec<Ranked<'a, C>> = candidates
        .iter()
        .map(|candidate| Ranked {
            candidate,
            score: score_candidate(candidate, &terms),
        })
        .filter(|r| r.score > MIN_SCORE)
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

/// Rank candidates and turn the survivors into result items.
pub fn filter<C: Candidate>(
    candidates: &[C],
    query: &str,
    to_item: impl Fn(&C) -> ResultItem,
) -> Vec<ResultItem> {
    rank(candidates, query)
        .into_iter()
        .map(|r| to_item(r.candidate).with_score(r.score))
        .collect()
}
