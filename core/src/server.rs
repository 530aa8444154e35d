use std::collections::{BTreeMap, HashMap};

use crate::arena::{TermArena, TermId};
use crate::error::{Result, SearchError};
use crate::index::{BidirectionalIndex, DocumentRecord, DocumentStatus};
use crate::query::ExecutionMode;
use crate::tokenizer::{split_into_words_no_stop, StopWords};
use crate::DocId;

/// In-memory TF-IDF search server.
///
/// Reads take `&self` and mutations `&mut self`, so any number of concurrent
/// queries or a single writer can hold the server at a time.
#[derive(Debug, Default)]
pub struct SearchServer {
    pub(crate) stop_words: StopWords,
    pub(crate) arena: TermArena,
    pub(crate) index: BidirectionalIndex,
    pub(crate) documents: HashMap<DocId, DocumentRecord>,
    document_ids: Vec<DocId>,
}

impl SearchServer {
    /// Create a server from a space-delimited stop word list.
    pub fn new(stop_words: &str) -> Result<Self> {
        Ok(Self::from_stop_words(StopWords::parse(stop_words)?))
    }

    /// Create a server from any collection of stop words.
    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_stop_words(StopWords::new(stop_words)?))
    }

    pub fn from_stop_words(stop_words: StopWords) -> Self {
        Self { stop_words, ..Self::default() }
    }

    pub fn add_document(&mut self, document_id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if document_id < 0 {
            return Err(SearchError::InvalidDocumentId(document_id));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::DuplicateDocumentId(document_id));
        }
        let words = split_into_words_no_stop(text, &self.stop_words)?;
        let rating = compute_average_rating(document_id, ratings)?;

        let terms: Vec<TermId> = words.iter().map(|w| self.arena.intern(w)).collect();
        self.index.insert(document_id, &terms);
        self.documents.insert(document_id, DocumentRecord { rating, status });
        self.document_ids.push(document_id);
        tracing::debug!(document_id, words = terms.len(), %status, "document added");
        Ok(())
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    /// Live ids in insertion order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, DocId>> { self.document_ids.iter().copied() }

    pub fn document_id_at(&self, index: usize) -> Option<DocId> { self.document_ids.get(index).copied() }

    /// Term frequencies of a document, empty when the id is unknown.
    pub fn word_frequencies(&self, document_id: DocId) -> BTreeMap<&str, f64> {
        self.index
            .term_frequencies(document_id)
            .map(|terms| terms.iter().map(|(&term, &freq)| (self.arena.resolve(term), freq)).collect())
            .unwrap_or_default()
    }

    pub fn document_status(&self, document_id: DocId) -> Option<DocumentStatus> {
        self.documents.get(&document_id).map(|d| d.status)
    }

    pub fn document_rating(&self, document_id: DocId) -> Option<i32> {
        self.documents.get(&document_id).map(|d| d.rating)
    }

    pub fn remove_document(&mut self, document_id: DocId) {
        self.remove_document_in(ExecutionMode::Sequential, document_id)
    }

    /// Remove a document from both index directions and the document store.
    /// Unknown ids are ignored.
    pub fn remove_document_in(&mut self, mode: ExecutionMode, document_id: DocId) {
        if self.documents.remove(&document_id).is_none() {
            return;
        }
        match mode {
            ExecutionMode::Sequential => self.index.remove(document_id),
            ExecutionMode::Parallel => self.index.par_remove(document_id),
        }
        self.document_ids.retain(|&id| id != document_id);
        tracing::debug!(document_id, ?mode, "document removed");
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> &BidirectionalIndex { &self.index }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocId>>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

fn compute_average_rating(document_id: DocId, ratings: &[i32]) -> Result<i32> {
    if ratings.is_empty() {
        return Err(SearchError::EmptyRatings(document_id));
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    Ok((sum / ratings.len() as i64) as i32)
}
