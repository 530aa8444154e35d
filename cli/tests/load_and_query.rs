use docsearch_cli::{build_server, read_documents, read_queries, run_match, run_queries};
use docsearch_core::{DocumentStatus, ExecutionMode};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn write_corpus(dir: &std::path::Path) {
    fs::write(
        dir.join("pets.jsonl"),
        concat!(
            "{\"id\": 1, \"text\": \"funny pet and nasty rat\", \"ratings\": [7, 2, 7]}\n",
            "\n",
            "{\"id\": 2, \"text\": \"funny pet with curly hair\", \"ratings\": [1, 2]}\n",
            "{\"id\": 3, \"body\": \"funny pet with curly hair\", \"ratings\": [1, 2]}\n",
            "{\"id\": 4, \"text\": \"nasty rat\", \"status\": \"banned\", \"ratings\": [3]}\n",
        ),
    )
    .unwrap();
    fs::write(
        dir.join("more.json"),
        r#"[{"id": 5, "text": "curly cat", "ratings": [4]}, {"id": -1, "text": "bad id", "ratings": [1]}]"#,
    )
    .unwrap();
    fs::write(dir.join("notes.txt"), "not a document").unwrap();
}

fn lines(out: Vec<u8>) -> Vec<Value> {
    String::from_utf8(out).unwrap().lines().map(|l| serde_json::from_str(l).unwrap()).collect()
}

#[test]
fn loads_every_json_file_in_a_directory() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let docs = read_documents(dir.path()).unwrap();
    assert_eq!(docs.len(), 6);
    assert_eq!(docs.iter().find(|d| d.id == 4).unwrap().status, DocumentStatus::Banned);

    let (server, summary) = build_server("and with", docs, false).unwrap();
    assert_eq!((summary.added, summary.rejected, summary.duplicates), (5, 1, 0));
    assert_eq!(server.document_count(), 5);
}

#[test]
fn dedup_drops_later_copies() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let docs = read_documents(dir.path()).unwrap();
    let (server, summary) = build_server("and with", docs, true).unwrap();
    assert_eq!(summary.duplicates, 1);
    assert!(server.word_frequencies(3).is_empty());
    assert!(!server.word_frequencies(2).is_empty());
}

#[test]
fn queries_report_results_and_errors() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let docs = read_documents(&dir.path().join("pets.jsonl")).unwrap();
    let (server, _) = build_server("and with", docs, false).unwrap();

    let queries = vec!["curly -rat".to_string(), "cat --dog".to_string(), "zebra".to_string()];
    for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
        let mut out = Vec::new();
        let empty = run_queries(&server, &queries, DocumentStatus::Actual, mode, 10, &mut out).unwrap();
        assert_eq!(empty, 1);
        let reports = lines(out);
        assert_eq!(reports.len(), 3);
        let ids: Vec<i64> = reports[0]["results"].as_array().unwrap().iter().map(|d| d["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(reports[1]["error"].as_str().unwrap().contains("--dog"));
        assert!(reports[2]["results"].as_array().unwrap().is_empty());
    }
}

#[test]
fn match_reports_each_document() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let docs = read_documents(&dir.path().join("pets.jsonl")).unwrap();
    let (server, _) = build_server("and with", docs, false).unwrap();

    let mut out = Vec::new();
    run_match(&server, "pet rat -hair", ExecutionMode::Parallel, &mut out).unwrap();
    let reports = lines(out);
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0]["words"], serde_json::json!(["pet", "rat"]));
    assert_eq!(reports[1]["words"], serde_json::json!([]));
    assert_eq!(reports[3]["status"], "banned");
}

#[test]
fn query_files_skip_blank_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queries.txt");
    fs::write(&path, "cat\n\n  \nnasty -rat\n").unwrap();
    assert_eq!(read_queries(&path).unwrap(), vec!["cat".to_string(), "nasty -rat".to_string()]);
}

#[test]
fn malformed_json_names_the_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), r#"[{"id": 1, "text": "cat", "ratings": [1]}, {"id": "x"}]"#).unwrap();
    let err = read_documents(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json[1]: malformed document"), "{err:#}");

    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let err = read_documents(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json: malformed JSON"), "{err:#}");
}
