use anyhow::{Context, Result};
use docsearch_core::dedup::remove_duplicates;
use docsearch_core::request_queue::RequestQueue;
use docsearch_core::{DocId, Document, DocumentStatus, ExecutionMode, SearchServer};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    #[serde(alias = "body")]
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    pub ratings: Vec<i32>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub added: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

#[derive(Serialize)]
pub struct SearchReport<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Document>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct MatchReport<'a> {
    pub document_id: DocId,
    pub status: DocumentStatus,
    pub words: Vec<&'a str>,
}

/// JSON/JSONL files under `input`, or `input` itself when it is a file.
pub fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

pub fn read_documents(input: &Path) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for file in collect_input_files(input) {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed document", file.display(), line_no + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("{}: malformed JSON", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for (i, v) in arr.into_iter().enumerate() {
                let doc: InputDoc = serde_json::from_value(v)
                    .with_context(|| format!("{}[{}]: malformed document", file.display(), i))?;
                docs.push(doc);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)
                .with_context(|| format!("{}: malformed document", file.display()))?;
            docs.push(doc);
        }
        _ => tracing::warn!(file = %file.display(), "ignoring JSON that is neither an object nor an array"),
    }
    Ok(())
}

/// Index the documents, skipping the ones the server rejects, and optionally
/// drop duplicates afterwards.
pub fn build_server(stop_words: &str, docs: Vec<InputDoc>, dedup: bool) -> Result<(SearchServer, LoadSummary)> {
    let mut server = SearchServer::new(stop_words).context("invalid stop words")?;
    let mut summary = LoadSummary::default();
    for doc in docs {
        match server.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
            Ok(()) => summary.added += 1,
            Err(err) => {
                summary.rejected += 1;
                tracing::warn!(document_id = doc.id, %err, "document rejected");
            }
        }
    }
    if dedup {
        summary.duplicates = remove_duplicates(&mut server).len();
    }
    tracing::info!(added = summary.added, rejected = summary.rejected, duplicates = summary.duplicates, "documents loaded");
    Ok((server, summary))
}

/// Run each query through a request queue, writing one JSON line per query.
/// Returns how many requests in the queue's window found nothing.
pub fn run_queries<W: Write>(
    server: &SearchServer,
    queries: &[String],
    status: DocumentStatus,
    mode: ExecutionMode,
    window: usize,
    out: &mut W,
) -> Result<usize> {
    let mut queue = RequestQueue::with_window(server, window).in_mode(mode);
    for query in queries {
        let report = match queue.add_find_request_by_status(query, status) {
            Ok(results) => SearchReport { query, results: Some(results), error: None },
            Err(err) => SearchReport { query, results: None, error: Some(err.to_string()) },
        };
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    }
    Ok(queue.no_result_requests())
}

/// Match the query against every document, one JSON line per document.
pub fn run_match<W: Write>(server: &SearchServer, query: &str, mode: ExecutionMode, out: &mut W) -> Result<()> {
    for document_id in server {
        let (words, status) = server.match_document_in(mode, query, document_id)?;
        let report = MatchReport { document_id, status, words };
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    }
    Ok(())
}

/// Queries from a file, one per line, blank lines skipped.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path).with_context(|| format!("opening {}", path.display()))?);
    let mut queries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            queries.push(line);
        }
    }
    Ok(queries)
}
