//! Result items and the shared fuzzy ranking used by every retrieval path.

pub mod fuzzy;
pub mod item;

pub use fuzzy::{Candidate, MIN_SCORE, QueryTerms, Ranked, filter, rank, score_text};
pub use item::{Feedback, Icon, Outcome, ResultItem, ScriptFilter};
