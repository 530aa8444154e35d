//! Append-only storage for indexed words.
//!
//! Indexes refer to words through [`TermId`] handles. A handle stays valid for
//! the arena's lifetime: entries are never moved out, rewritten or freed.

use std::collections::HashMap;
use std::sync::Arc;

pub type TermId = u32;

#[derive(Debug, Default)]
pub struct TermArena {
    terms: Vec<Arc<str>>,
    dictionary: HashMap<Arc<str>, TermId>,
}

impl TermArena {
    #[cfg(test)]
    pub fn new() -> Self { Self::default() }

    /// Handle for `word`, allocating a new entry only for an unseen spelling.
    pub fn intern(&mut self, word: &str) -> TermId {
        if let Some(&id) = self.dictionary.get(word) {
            return id;
        }
        let id = self.terms.len() as TermId;
        let term: Arc<str> = Arc::from(word);
        self.terms.push(Arc::clone(&term));
        self.dictionary.insert(term, id);
        id
    }

    pub fn get(&self, word: &str) -> Option<TermId> { self.dictionary.get(word).copied() }

    /// Word behind a handle issued by this arena.
    pub fn resolve(&self, id: TermId) -> &str { &self.terms[id as usize] }

    #[cfg(test)]
    pub fn len(&self) -> usize { self.terms.len() }
}
