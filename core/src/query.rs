use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};

/// How a query-side operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Parsed query. Terms borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_terms: Vec<&'q str>,
    pub minus_terms: Vec<&'q str>,
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
}

fn parse_query_word(text: &str) -> Result<QueryWord<'_>> {
    let (word, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
        return Err(SearchError::InvalidQueryWord(text.to_string()));
    }
    Ok(QueryWord { data: word, is_minus })
}

/// Parse a raw query into plus and minus terms, dropping stop words.
///
/// Sequential mode sorts and deduplicates both term lists. Parallel mode keeps
/// them as written, duplicates included, and ranking counts a repeated plus
/// term once per occurrence.
pub fn parse_query<'q>(raw: &'q str, stop_words: &StopWords, mode: ExecutionMode) -> Result<Query<'q>> {
    let mut query = Query::default();
    for text in split_into_words(raw) {
        let word = parse_query_word(text)?;
        if stop_words.contains(word.data) {
            continue;
        }
        if word.is_minus {
            query.minus_terms.push(word.data);
        } else {
            query.plus_terms.push(word.data);
        }
    }
    if mode == ExecutionMode::Sequential {
        query.plus_terms.sort_unstable();
        query.plus_terms.dedup();
        query.minus_terms.sort_unstable();
        query.minus_terms.dedup();
    }
    Ok(query)
}
