//! Sliding-window bookkeeping of queries that found nothing.

use std::collections::VecDeque;

use crate::error::Result;
use crate::index::{Document, DocumentStatus};
use crate::query::ExecutionMode;
use crate::server::SearchServer;
use crate::DocId;

/// Number of requests remembered by default, one per minute of a day.
pub const REQUEST_WINDOW: usize = 1440;

pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    window: usize,
    mode: ExecutionMode,
    requests: VecDeque<bool>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self { Self::with_window(server, REQUEST_WINDOW) }

    pub fn with_window(server: &'a SearchServer, window: usize) -> Self {
        let window = window.max(1);
        Self { server, window, mode: ExecutionMode::Sequential, requests: VecDeque::with_capacity(window), no_result_requests: 0 }
    }

    /// Rank every later request in `mode`.
    pub fn in_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents_in(self.mode, raw_query)?;
        self.record(result.is_empty());
        Ok(result)
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents_by_status_in(self.mode, raw_query, status)?;
        self.record(result.is_empty());
        Ok(result)
    }

    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.server.find_top_documents_with_in(self.mode, raw_query, predicate)?;
        self.record(result.is_empty());
        Ok(result)
    }

    /// Requests inside the window that returned no documents.
    pub fn no_result_requests(&self) -> usize { self.no_result_requests }

    fn record(&mut self, empty: bool) {
        if self.requests.len() == self.window && self.requests.pop_front() == Some(true) {
            self.no_result_requests -= 1;
        }
        self.requests.push_back(empty);
        if empty {
            self.no_result_requests += 1;
        }
    }
}
