use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::TermId;
use crate::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Actual => "actual",
            DocumentStatus::Irrelevant => "irrelevant",
            DocumentStatus::Banned => "banned",
            DocumentStatus::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ document_id = {}, relevance = {}, rating = {} }}", self.id, self.relevance, self.rating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRecord {
    pub rating: i32,
    pub status: DocumentStatus,
}

pub type PostingList = BTreeMap<DocId, f64>;
pub type TermFrequencies = BTreeMap<TermId, f64>;

/// Inverted (term → documents) and forward (document → terms) views of the
/// same `(term, document, frequency)` triples.
///
/// Posting lists are stored densely by [`TermId`], like the arena that issues
/// the ids. An empty slot means the term occurs in no live document.
#[derive(Debug, Default)]
pub struct BidirectionalIndex {
    inverted: Vec<PostingList>,
    forward: HashMap<DocId, TermFrequencies>,
}

impl BidirectionalIndex {
    #[cfg(test)]
    pub fn new() -> Self { Self::default() }

    /// Record every term of a document. `terms` must already be validated; one
    /// entry per occurrence, each adding `1 / terms.len()`.
    pub fn insert(&mut self, doc_id: DocId, terms: &[TermId]) {
        let forward = self.forward.entry(doc_id).or_default();
        if terms.is_empty() {
            return;
        }
        let inv_word_count = 1.0 / terms.len() as f64;
        for &term in terms {
            let slot = term as usize;
            if self.inverted.len() <= slot {
                self.inverted.resize_with(slot + 1, PostingList::new);
            }
            *self.inverted[slot].entry(doc_id).or_insert(0.0) += inv_word_count;
            *forward.entry(term).or_insert(0.0) += inv_word_count;
        }
    }

    /// Posting list of an indexed term; `None` when no live document has it.
    pub fn postings(&self, term: TermId) -> Option<&PostingList> {
        self.inverted.get(term as usize).filter(|p| !p.is_empty())
    }

    pub fn term_frequencies(&self, doc_id: DocId) -> Option<&TermFrequencies> { self.forward.get(&doc_id) }

    /// Whether `term` occurs in `doc_id`.
    pub fn contains(&self, term: TermId, doc_id: DocId) -> bool {
        self.inverted.get(term as usize).is_some_and(|p| p.contains_key(&doc_id))
    }

    #[cfg(test)]
    pub fn document_frequency(&self, term: TermId) -> usize {
        self.inverted.get(term as usize).map_or(0, |p| p.len())
    }

    /// Number of terms present in at least one live document.
    #[cfg(test)]
    pub fn term_count(&self) -> usize { self.inverted.iter().filter(|p| !p.is_empty()).count() }

    /// Drop a document by scanning every posting list.
    pub fn remove(&mut self, doc_id: DocId) {
        self.forward.remove(&doc_id);
        for postings in &mut self.inverted {
            postings.remove(&doc_id);
        }
    }

    /// Drop a document, touching only the posting lists of its own terms. Each
    /// list is borrowed mutably by exactly one task.
    pub fn par_remove(&mut self, doc_id: DocId) {
        use rayon::prelude::*;

        let Some(terms) = self.forward.remove(&doc_id) else { return };
        let lists = disjoint_slots(&mut self.inverted, terms.keys().copied());
        lists.into_par_iter().for_each(|postings| {
            postings.remove(&doc_id);
        });
    }

    /// Check the mirror invariant between both directions.
    #[cfg(test)]
    pub fn is_consistent(&self) -> bool {
        let forward_triples: usize = self.forward.values().map(|t| t.len()).sum();
        let inverted_triples: usize = self.inverted.iter().map(|p| p.len()).sum();
        forward_triples == inverted_triples
            && self.forward.iter().all(|(doc, terms)| {
                terms
                    .iter()
                    .all(|(term, freq)| self.inverted.get(*term as usize).and_then(|p| p.get(doc)) == Some(freq))
            })
    }
}

/// Mutable borrows of the slots named by `terms`, which must be ascending and
/// unique. Costs one step per term, independent of the vocabulary size.
fn disjoint_slots(slots: &mut [PostingList], terms: impl Iterator<Item = TermId>) -> Vec<&mut PostingList> {
    let mut lists = Vec::new();
    let mut rest = slots;
    let mut offset = 0;
    for term in terms {
        let slot = term as usize;
        let tail = std::mem::take(&mut rest);
        let Some((list, tail)) = tail.get_mut(slot - offset..).and_then(|t| t.split_first_mut()) else { break };
        lists.push(list);
        rest = tail;
        offset = slot + 1;
    }
    lists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BidirectionalIndex {
        let mut index = BidirectionalIndex::new();
        index.insert(1, &[0, 1, 0, 2]);
        index.insert(2, &[1, 3]);
        index
    }

    #[test]
    fn frequencies_sum_to_one() {
        let index = sample();
        let total: f64 = index.term_frequencies(1).unwrap().values().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(index.term_frequencies(1).unwrap()[&0], 0.5);
        assert_eq!(index.document_frequency(1), 2);
        assert!(index.is_consistent());
    }

    #[test]
    fn empty_document_has_empty_forward_entry() {
        let mut index = BidirectionalIndex::new();
        index.insert(9, &[]);
        assert!(index.term_frequencies(9).unwrap().is_empty());
        assert_eq!(index.term_count(), 0);
    }

    #[test]
    fn sequential_and_parallel_removal_agree() {
        let mut seq = sample();
        let mut par = sample();
        seq.remove(1);
        par.par_remove(1);
        for term in 0..4 {
            assert_eq!(seq.postings(term), par.postings(term));
        }
        assert_eq!(seq.term_count(), 2);
        assert!(seq.term_frequencies(1).is_none() && par.term_frequencies(1).is_none());
        assert!(seq.is_consistent() && par.is_consistent());
    }

    #[test]
    fn parallel_removal_borrows_only_the_documents_terms() {
        let mut slots: Vec<PostingList> = (0..6).map(|i| PostingList::from([(i, 1.0)])).collect();
        let picked = disjoint_slots(&mut slots, [1, 2, 5].into_iter());
        assert_eq!(picked.len(), 3);
        for list in picked {
            list.clear();
        }
        let emptied: Vec<usize> = (0..6).filter(|&i| slots[i].is_empty()).collect();
        assert_eq!(emptied, vec![1, 2, 5]);
    }

    #[test]
    fn removed_terms_stop_being_indexed() {
        let mut index = sample();
        index.par_remove(2);
        assert!(index.postings(3).is_none());
        assert!(!index.contains(3, 2));
        assert_eq!(index.document_frequency(1), 1);
        assert!(index.is_consistent());
    }

    #[test]
    fn status_serializes_in_snake_case() {
        assert_eq!(serde_json::to_string(&DocumentStatus::Banned).unwrap(), "\"banned\"");
        let doc = Document { id: 3, relevance: 0.25, rating: 4 };
        assert_eq!(doc.to_string(), "{ document_id = 3, relevance = 0.25, rating = 4 }");
    }
}
