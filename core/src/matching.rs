use rayon::prelude::*;

use crate::arena::TermId;
use crate::error::{Result, SearchError};
use crate::index::DocumentStatus;
use crate::query::{parse_query, ExecutionMode};
use crate::server::SearchServer;
use crate::DocId;

impl SearchServer {
    pub fn match_document(&self, raw_query: &str, document_id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_in(ExecutionMode::Sequential, raw_query, document_id)
    }

    /// Plus terms of the query found in the document, sorted and unique, with
    /// the document's status. A minus term found in the document empties the
    /// list.
    pub fn match_document_in(&self, mode: ExecutionMode, raw_query: &str, document_id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        let query = parse_query(raw_query, &self.stop_words, mode)?;
        let status = self
            .document_status(document_id)
            .ok_or(SearchError::DocumentNotFound(document_id))?;

        let matched = match mode {
            ExecutionMode::Sequential => {
                if query.minus_terms.iter().any(|w| self.term_in_document(w, document_id).is_some()) {
                    return Ok((Vec::new(), status));
                }
                query
                    .plus_terms
                    .iter()
                    .filter_map(|w| self.term_in_document(w, document_id))
                    .map(|term| self.arena.resolve(term))
                    .collect()
            }
            ExecutionMode::Parallel => {
                if query.minus_terms.par_iter().any(|w| self.term_in_document(w, document_id).is_some()) {
                    return Ok((Vec::new(), status));
                }
                let mut matched: Vec<&str> = query
                    .plus_terms
                    .par_iter()
                    .filter_map(|w| self.term_in_document(w, document_id))
                    .map(|term| self.arena.resolve(term))
                    .collect();
                matched.par_sort_unstable();
                matched.dedup();
                matched
            }
        };
        Ok((matched, status))
    }

    fn term_in_document(&self, word: &str, document_id: DocId) -> Option<TermId> {
        self.arena.get(word).filter(|&term| self.index.contains(term, document_id))
    }
}
