use std::collections::BTreeSet;

use crate::error::{Result, SearchError};

/// Split text into words on ASCII space. Empty runs are dropped; no other
/// normalization is applied.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// A word is valid when it carries no control characters (below `' '`).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Immutable stop word set fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build from any collection of words, dropping empties and duplicates.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() { continue; }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from a space-delimited string.
    pub fn parse(text: &str) -> Result<Self> { Self::new(split_into_words(text)) }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

/// Tokenize document text, failing on the first invalid word and skipping stop words.
pub fn split_into_words_no_stop<'t>(text: &'t str, stop_words: &StopWords) -> Result<Vec<&'t str>> {
    let mut words = Vec::new();
    for word in split_into_words(text) {
        if !is_valid_word(word) {
            return Err(SearchError::InvalidWord(word.to_string()));
        }
        if !stop_words.contains(word) {
            words.push(word);
        }
    }
    Ok(words)
}
