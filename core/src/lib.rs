//! In-memory full-text search over caller-identified documents.
//!
//! Documents are split on spaces, stop words are dropped and every remaining
//! word is stored once in an append-only term arena. A forward index
//! (document → term frequencies) and an inverted index (term → posting list)
//! are kept in lock-step by [`SearchServer`], which ranks queries by TF-IDF.
//!
//! Every query-side operation comes in a sequential flavour and a `*_in`
//! flavour taking an [`ExecutionMode`]; the parallel mode fans work out over
//! rayon's pool.

pub mod batch;
pub mod dedup;
pub mod error;
pub mod query;
pub mod request_queue;
pub mod tokenizer;

mod arena;
mod index;
mod matching;
mod ranking;
mod server;
mod sharded;

pub use error::{ErrorKind, Result, SearchError};
pub use index::{Document, DocumentStatus};
pub use query::{ExecutionMode, Query};
pub use server::SearchServer;

/// Caller-assigned document identifier. Negative values are rejected on insert.
pub type DocId = i32;

/// Upper bound on the number of hits returned by a top-documents query.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance values closer than this are considered equal when sorting.
pub const RELEVANCE_TOLERANCE: f64 = 1e-6;

/// Shard count of the accumulator used by parallel ranking.
pub const ACCUMULATOR_SHARDS: usize = 8;
