//! Independent top-document queries fanned out over rayon.

use rayon::prelude::*;

use crate::error::Result;
use crate::index::Document;
use crate::server::SearchServer;

/// Run every query against the same server, keeping input order. The first
/// failing query, in input order, aborts the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect()
}

/// Like [`process_queries`], flattened query by query.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
