use tempfile::TempDir;

use paperqa_core::traits::{Embedder, VectorSearch};
use paperqa_core::types::Chunk;
use paperqa_vector::CosineVectorIndex;

/// Maps texts onto a 3-axis topic space by keyword counting, so similarity
/// rankings are predictable without a real model.
struct TopicEmbedder;

impl Embedder for TopicEmbedder {
    fn dim(&self) -> usize {
        3
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                let count = |word: &str| lower.matches(word).count() as f32;
                vec![count("ocean"), count("forest"), count("desert")]
            })
            .collect())
    }
}

fn chunk(content: &str, source: &str, page: usize) -> Chunk {
    Chunk {
        content: content.to_string(),
        source_document: source.to_string(),
        page_number: page,
    }
}

fn sample_chunks() -> Vec<Chunk> {
    vec![
        chunk("the ocean currents drive ocean weather", "ocean.txt", 0),
        chunk("forest canopies shelter forest wildlife", "forest.txt", 1),
        chunk("desert dunes shift with the wind", "desert.txt", 2),
    ]
}

#[test]
fn search_ranks_by_cosine_similarity() {
    let mut index = CosineVectorIndex::new(Box::new(TopicEmbedder));
    index.index_chunks(&sample_chunks()).expect("index");

    let hits = index.search("life in the forest", 2).expect("search");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source_document, "forest.txt");
}

#[test]
fn k_caps_results_and_zero_k_is_empty() {
    let mut index = CosineVectorIndex::new(Box::new(TopicEmbedder));
    index.index_chunks(&sample_chunks()).expect("index");

    assert_eq!(index.search("ocean", 1).expect("search").len(), 1);
    assert!(index.search("ocean", 0).expect("search").is_empty());
    // Asking for more than the index holds returns everything.
    assert_eq!(index.search("ocean", 10).expect("search").len(), 3);
}

#[test]
fn empty_index_returns_no_hits() {
    let index = CosineVectorIndex::new(Box::new(TopicEmbedder));
    assert!(index.search("anything", 4).expect("search").is_empty());
}

#[test]
fn save_and_load_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("vectors.json");

    let mut index = CosineVectorIndex::new(Box::new(TopicEmbedder));
    index.index_chunks(&sample_chunks()).expect("index");
    index.save(&path).expect("save");

    let loaded = CosineVectorIndex::load(&path, Box::new(TopicEmbedder)).expect("load");
    assert_eq!(loaded.len(), 3);

    let hits = loaded.search_chunks("desert wind", 1).expect("search");
    assert_eq!(hits[0].source_document, "desert.txt");
}

#[test]
fn load_rejects_dimension_mismatch() {
    struct WideEmbedder;
    impl Embedder for WideEmbedder {
        fn dim(&self) -> usize {
            8
        }
        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 8]).collect())
        }
    }

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("vectors.json");

    let mut index = CosineVectorIndex::new(Box::new(TopicEmbedder));
    index.index_chunks(&sample_chunks()).expect("index");
    index.save(&path).expect("save");

    let err = CosineVectorIndex::load(&path, Box::new(WideEmbedder))
        .expect_err("dim mismatch must fail");
    assert!(err.to_string().contains("dim"));
}
