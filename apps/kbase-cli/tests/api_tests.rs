use std::fs;

use kbase_cli::api::{self, AddTextRequest, RequestError, SearchRequest, MAX_K};
use kbase_cli::ingest::ingest_dir;
use kbase_core::config::RetrievalSettings;
use kbase_hybrid::KnowledgeBase;

fn kb() -> KnowledgeBase {
    KnowledgeBase::in_memory(RetrievalSettings::default()).unwrap()
}

#[test]
fn add_text_reports_updated_stats() {
    let kb = kb();
    let res = api::add_text(&kb, AddTextRequest::new("Paris is the capital of France.").with_title("Geo")).unwrap();
    assert_eq!(res.chunks_added, 1);
    assert_eq!(res.stats.chunk_count, 1);
    assert_eq!(res.stats.document_count, 1);

    let json = serde_json::to_value(&res).unwrap();
    assert_eq!(json["chunksAdded"], 1);
    assert_eq!(json["stats"]["chunkCount"], 1);
    assert!(json["documentId"].is_string());
}

#[test]
fn invalid_text_never_reaches_the_index() {
    let kb = kb();
    let err = api::add_text(&kb, AddTextRequest::new("too short")).unwrap_err();
    assert_eq!(err.code(), "text_too_short");
    let err = api::add_text(&kb, AddTextRequest::new("y".repeat(200_001))).unwrap_err();
    assert!(matches!(err, RequestError::TextTooLong(200_001)));
    assert_eq!(api::stats(&kb).unwrap().chunk_count, 0);
}

#[test]
fn search_validates_query_and_caps_k() {
    let kb = kb();
    for i in 0..15 {
        api::add_text(&kb, AddTextRequest::new(format!("Lantern oil note number {i}."))).unwrap();
    }
    assert!(matches!(api::search(&kb, &SearchRequest::new("   ", None)), Err(RequestError::MissingQuery)));

    let res = api::search(&kb, &SearchRequest::new("  lantern oil ", Some(50))).unwrap();
    assert_eq!(res.query, "lantern oil");
    assert_eq!(res.items.len(), MAX_K);

    let res = api::search(&kb, &SearchRequest::new("lantern", None)).unwrap();
    assert_eq!(res.items.len(), 5);
}

#[test]
fn search_response_serializes_camel_case() {
    let kb = kb();
    api::add_text(&kb, AddTextRequest::new("Compost needs nitrogen and carbon.").with_title("Compost")).unwrap();
    let res = api::search(&kb, &SearchRequest::new("compost", Some(1))).unwrap();
    let json = serde_json::to_value(&res).unwrap();
    assert_eq!(json["query"], "compost");
    let item = &json["items"][0];
    assert_eq!(item["title"], "Compost");
    assert!(item["documentId"].is_string());
    assert!(item["score"].is_number());
    assert!(item["text"].as_str().unwrap().contains("Compost needs nitrogen"));
}

#[test]
fn ingest_dir_adds_txt_files_by_relative_path() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("water")).unwrap();
    fs::write(tmp.path().join("water/filters.txt"), "Sand and charcoal filters remove sediment.").unwrap();
    fs::write(tmp.path().join("fire.txt"), "A rocket stove burns small sticks cleanly.").unwrap();
    fs::write(tmp.path().join("tiny.txt"), "short").unwrap();
    fs::write(tmp.path().join("readme.md"), "Not a text document for ingestion.").unwrap();

    let kb = kb();
    let report = ingest_dir(&kb, tmp.path(), false).unwrap();
    assert_eq!(report.files, 3);
    assert_eq!(report.documents, 2);
    assert_eq!(report.skipped, vec!["tiny.txt".to_string()]);
    assert_eq!(api::stats(&kb).unwrap().document_count, 2);

    let res = api::search(&kb, &SearchRequest::new("charcoal filters", Some(1))).unwrap();
    assert_eq!(res.items[0].document_id, "water/filters.txt");
    assert_eq!(res.items[0].title.as_deref(), Some("filters"));
}
