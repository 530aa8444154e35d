use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::arena::TermId;
use crate::error::Result;
use crate::index::{Document, DocumentStatus, PostingList};
use crate::query::{parse_query, ExecutionMode, Query};
use crate::server::SearchServer;
use crate::sharded::ShardedMap;
use crate::{DocId, ACCUMULATOR_SHARDS, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_TOLERANCE};

impl SearchServer {
    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_in(ExecutionMode::Sequential, raw_query)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_in(ExecutionMode::Sequential, raw_query, status)
    }

    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with_in(ExecutionMode::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_in(&self, mode: ExecutionMode, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_in(mode, raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status_in(&self, mode: ExecutionMode, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_with_in(mode, raw_query, move |_, document_status, _| document_status == status)
    }

    /// Rank documents accepted by `predicate(id, status, rating)` against the
    /// query and keep the best [`MAX_RESULT_DOCUMENT_COUNT`].
    ///
    /// Parallel mode parses the query without deduplication, so a plus term
    /// written twice contributes twice.
    pub fn find_top_documents_with_in<P>(&self, mode: ExecutionMode, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words, mode)?;
        let mut matched = match mode {
            ExecutionMode::Sequential => self.find_all_documents(&query, &predicate),
            ExecutionMode::Parallel => self.par_find_all_documents(&query, &predicate),
        };
        sort_by_relevance(&mut matched, mode);
        tracing::trace!(raw_query, ?mode, candidates = matched.len(), "ranked documents");
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(matched)
    }

    /// Posting list of an indexed word with its inverse document frequency.
    fn weighted_postings(&self, word: &str) -> Option<(&PostingList, f64)> {
        let term: TermId = self.arena.get(word)?;
        let postings = self.index.postings(term)?;
        let idf = (self.document_count() as f64 / postings.len() as f64).ln();
        Some((postings, idf))
    }

    fn postings_of(&self, word: &str) -> Option<&PostingList> {
        self.arena.get(word).and_then(|term| self.index.postings(term))
    }

    fn accepts<P>(&self, document_id: DocId, predicate: &P) -> bool
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        self.documents
            .get(&document_id)
            .is_some_and(|record| predicate(document_id, record.status, record.rating))
    }

    fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_terms {
            let Some((postings, idf)) = self.weighted_postings(word) else { continue };
            for (&document_id, &tf) in postings {
                if self.accepts(document_id, predicate) {
                    *relevance.entry(document_id).or_insert(0.0) += tf * idf;
                }
            }
        }
        for word in &query.minus_terms {
            let Some(postings) = self.postings_of(word) else { continue };
            for document_id in postings.keys() {
                relevance.remove(document_id);
            }
        }
        self.to_documents(relevance)
    }

    fn par_find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let relevance: ShardedMap<DocId, f64> = ShardedMap::new(ACCUMULATOR_SHARDS);
        query.plus_terms.par_iter().for_each(|word| {
            let Some((postings, idf)) = self.weighted_postings(word) else { return };
            for (&document_id, &tf) in postings {
                if self.accepts(document_id, predicate) {
                    *relevance.access(document_id) += tf * idf;
                }
            }
        });
        query.minus_terms.par_iter().for_each(|word| {
            let Some(postings) = self.postings_of(word) else { return };
            for document_id in postings.keys() {
                relevance.erase(document_id);
            }
        });
        self.to_documents(relevance.into_ordinary_map())
    }

    fn to_documents(&self, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
        relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                let rating = self.documents.get(&id)?.rating;
                Some(Document { id, relevance, rating })
            })
            .collect()
    }
}

/// Relevance descending. Documents within [`RELEVANCE_TOLERANCE`] of the
/// first document of their run are ties and are ordered by rating descending.
fn sort_by_relevance(documents: &mut [Document], mode: ExecutionMode) {
    let by_relevance = |lhs: &Document, rhs: &Document| {
        rhs.relevance.total_cmp(&lhs.relevance).then_with(|| rhs.rating.cmp(&lhs.rating))
    };
    match mode {
        ExecutionMode::Sequential => documents.sort_by(by_relevance),
        ExecutionMode::Parallel => documents.par_sort_by(by_relevance),
    }
    let mut start = 0;
    while start < documents.len() {
        let anchor = documents[start].relevance;
        let mut end = start + 1;
        while end < documents.len() && anchor - documents[end].relevance < RELEVANCE_TOLERANCE {
            end += 1;
        }
        documents[start..end].sort_by(|lhs, rhs| rhs.rating.cmp(&lhs.rating));
        start = end;
    }
}
