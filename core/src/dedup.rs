//! Duplicate detection by term set.
//!
//! Two documents are duplicates when they contain the same set of non-stop
//! words, regardless of order and repetition. The earliest inserted document
//! of each set is kept.

use std::collections::{BTreeSet, HashSet};

use crate::query::ExecutionMode;
use crate::server::SearchServer;
use crate::DocId;

/// Ids whose term set repeats an earlier document's, ascending.
pub fn find_duplicates(server: &SearchServer) -> Vec<DocId> {
    let mut seen: HashSet<BTreeSet<&str>> = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for document_id in server {
        let words: BTreeSet<&str> = server.word_frequencies(document_id).into_keys().collect();
        if !seen.insert(words) {
            duplicates.insert(document_id);
        }
    }
    duplicates.into_iter().collect()
}

/// Remove every duplicate document and return the removed ids.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let duplicates = find_duplicates(server);
    for &document_id in &duplicates {
        tracing::info!(document_id, "found duplicate document");
        server.remove_document_in(ExecutionMode::Parallel, document_id);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStatus;

    #[test]
    fn keeps_the_first_document_of_each_term_set() {
        let mut server = SearchServer::new("and with").unwrap();
        let docs = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "funny pet with curly hair"),
            (4, "funny pet and curly hair"),
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in docs {
            server.add_document(id, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }
        assert!(server.add_document(9, "nasty rat with curly hair", DocumentStatus::Actual, &[1, 2]).is_err());
        assert_eq!(server.document_count(), 9);

        assert_eq!(remove_duplicates(&mut server), vec![3, 4, 5, 7]);
        assert_eq!(server.iter().collect::<Vec<_>>(), vec![1, 2, 6, 8, 9]);
        assert!(find_duplicates(&server).is_empty());
    }
}
