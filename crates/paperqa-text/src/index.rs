use anyhow::Result;
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, TantivyDocument};

use paperqa_core::traits::KeywordSearch;
use paperqa_core::types::Chunk;

use crate::schema::{build_schema, register_tokenizer};

/// How many hits a keyword query returns when the caller does not say.
pub const DEFAULT_KEYWORD_LIMIT: usize = 8;

/// Lexical index over chunks, ranked by BM25.
pub struct TantivyKeywordIndex {
    index: Index,
    content_field: tantivy::schema::Field,
    source_field: tantivy::schema::Field,
    page_field: tantivy::schema::Field,
    limit: usize,
}

impl TantivyKeywordIndex {
    /// Create a fresh index directory, wiping any previous index there.
    pub fn create(index_dir: &Path) -> Result<Self> {
        let schema = build_schema();
        if index_dir.exists() {
            std::fs::remove_dir_all(index_dir)?;
        }
        std::fs::create_dir_all(index_dir)?;
        let index = Index::create_in_dir(index_dir, schema)?;
        Self::from_index(index)
    }

    /// Open an existing index directory.
    pub fn open(index_dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_dir)?;
        Self::from_index(index)
    }

    fn from_index(index: Index) -> Result<Self> {
        register_tokenizer(&index);
        let schema = index.schema();
        let content_field = schema.get_field("content")?;
        let source_field = schema.get_field("source_document")?;
        let page_field = schema.get_field("page_number")?;
        Ok(Self {
            index,
            content_field,
            source_field,
            page_field,
            limit: DEFAULT_KEYWORD_LIMIT,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn index_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        let mut index_writer = self.index.writer(50_000_000)?;
        for c in chunks {
            let d = doc!(
                self.content_field => c.content.clone(),
                self.source_field => c.source_document.clone(),
                self.page_field => c.page_number as u64,
            );
            index_writer.add_document(d)?;
        }
        index_writer.commit()?;
        tracing::debug!(chunks = chunks.len(), "keyword index committed");
        Ok(())
    }

    pub fn search_chunks(&self, query: &str, limit: usize) -> Result<Vec<Chunk>> {
        let reader = self.index.reader()?;
        let searcher = reader.searcher();
        let qp = QueryParser::for_index(&self.index, vec![self.content_field]);
        let q = qp.parse_query(query)?;
        let top_docs = searcher.search(&q, &TopDocs::with_limit(limit))?;
        let mut hits = Vec::new();
        for (_score, addr) in top_docs {
            let d: TantivyDocument = searcher.doc(addr)?;
            let content = d
                .get_first(self.content_field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let source_document = d
                .get_first(self.source_field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let page_number = d
                .get_first(self.page_field)
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as usize;
            hits.push(Chunk { content, source_document, page_number });
        }
        Ok(hits)
    }
}

impl KeywordSearch for TantivyKeywordIndex {
    fn search(&self, query: &str) -> anyhow::Result<Vec<Chunk>> {
        self.search_chunks(query, self.limit)
    }
}
