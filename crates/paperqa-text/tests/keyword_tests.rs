use tempfile::TempDir;

use paperqa_core::traits::KeywordSearch;
use paperqa_core::types::Chunk;
use paperqa_text::TantivyKeywordIndex;

fn chunk(content: &str, source: &str, page: usize) -> Chunk {
    Chunk {
        content: content.to_string(),
        source_document: source.to_string(),
        page_number: page,
    }
}

#[test]
fn index_and_search_returns_metadata() {
    let tmp = TempDir::new().unwrap();
    let index = TantivyKeywordIndex::create(tmp.path()).expect("create index");

    index
        .index_chunks(&[
            chunk("embodied intelligence breakthroughs in robotics", "survey.txt", 4),
            chunk("gardening techniques for arid climates", "gardening.txt", 0),
        ])
        .expect("index");

    let hits = index.search("robotics").expect("search");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_document, "survey.txt");
    assert_eq!(hits[0].page_number, 4);
    assert!(hits[0].content.contains("robotics"));
}

#[test]
fn limit_caps_hit_count() {
    let tmp = TempDir::new().unwrap();
    let index = TantivyKeywordIndex::create(tmp.path())
        .expect("create index")
        .with_limit(2);

    let chunks: Vec<Chunk> = (0..5)
        .map(|i| chunk(&format!("reusable rocket engine design part {i}"), "rockets.txt", i))
        .collect();
    index.index_chunks(&chunks).expect("index");

    let hits = index.search("rocket engine").expect("search");
    assert_eq!(hits.len(), 2);
}

#[test]
fn unmatched_query_returns_empty() {
    let tmp = TempDir::new().unwrap();
    let index = TantivyKeywordIndex::create(tmp.path()).expect("create index");
    index
        .index_chunks(&[chunk("solar panel maintenance", "solar.txt", 0)])
        .expect("index");

    let hits = index.search("quantum").expect("search");
    assert!(hits.is_empty());
}

#[test]
fn reopen_sees_committed_chunks() {
    let tmp = TempDir::new().unwrap();
    {
        let index = TantivyKeywordIndex::create(tmp.path()).expect("create index");
        index
            .index_chunks(&[chunk("fermentation of sourdough starters", "bread.txt", 1)])
            .expect("index");
    }

    let reopened = TantivyKeywordIndex::open(tmp.path()).expect("open index");
    let hits = reopened.search("sourdough").expect("search");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_document, "bread.txt");
}
