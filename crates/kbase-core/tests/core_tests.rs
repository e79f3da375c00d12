use std::fs;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use kbase_core::chunker::{Chunker, ChunkingConfig};
use kbase_core::config::{resolve_with_base, Config, CorruptIndexPolicy, RetrievalSettings};
use kbase_core::error::Error;

#[test]
fn retrieval_settings_default_without_config_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path(), "dev").expect("load");
    let settings = config.retrieval().expect("retrieval");

    assert_eq!(settings.dimensions, 1024);
    assert_eq!(settings.chunk_size, 800);
    assert_eq!(settings.fragments_per_document, 3);
    assert_eq!(settings.max_excerpt_chars, 2000);
    assert_eq!(settings.on_corrupt, CorruptIndexPolicy::Backup);
}

#[test]
fn env_specific_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[retrieval]\nindex_path = \"kb/index.json\"\nchunk_size = 600\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[retrieval]\nchunk_size = 400\non_corrupt = \"fail\"\n").unwrap();

    let settings = Config::load_from(tmp.path(), "test").unwrap().retrieval().unwrap();
    assert_eq!(settings.index_path, "kb/index.json");
    assert_eq!(settings.chunk_size, 400, "test profile wins over config.toml");
    assert_eq!(settings.on_corrupt, CorruptIndexPolicy::Fail);
    assert_eq!(settings.max_k, 20, "unspecified keys keep defaults");
}

#[test]
fn invalid_weight_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[retrieval]\nvector_weight = 1.5\n").unwrap();

    let err = Config::load_from(tmp.path(), "prod").unwrap().retrieval().unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn relative_index_path_resolves_against_base() {
    let settings = RetrievalSettings::default();
    let resolved = settings.resolved_index_path(Path::new("/srv/kb"));
    assert_eq!(resolved, Path::new("/srv/kb/data/index.json"));
    assert_eq!(resolve_with_base(Path::new("/srv"), "/abs/index.json"), Path::new("/abs/index.json"));
}

proptest! {
    #[test]
    fn chunks_concatenate_to_input(
        text in "[a-zA-Z .!?;\n\r。！？；汉字]{1,4000}",
        size in 300usize..=1500,
    ) {
        prop_assume!(!text.trim().is_empty());
        let chunks = Chunker::new(ChunkingConfig::new(Some(size))).split(&text);
        prop_assert_eq!(chunks.concat(), text);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            if i < last {
                prop_assert!(chunk.chars().count() >= size);
            }
        }
    }
}
