//! Document loading and chunking.
//!
//! Stands in for the external loader stage: walks a directory of plain-text
//! files, splits each file into pages on form feeds and into overlapping
//! chunks sized for retrieval.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Chunk;

/// Character budget per chunk with overlap between neighbors. The defaults
/// match the splitter settings the indexes were tuned against.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 400, overlap_chars: 100 }
    }
}

#[derive(Default)]
pub struct DocumentProcessor {
    chunking: ChunkingConfig,
}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunking(chunking: ChunkingConfig) -> Self {
        Self { chunking }
    }

    /// Process every text document under `docs_dir` into retrieval chunks.
    pub fn process_directory(&self, docs_dir: &Path) -> Result<Vec<Chunk>> {
        let files = self.list_text_files(docs_dir);
        if files.is_empty() {
            tracing::warn!("no text documents found under {}", docs_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::info!(
                "processing file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            let content = self.read_file_content(file_path)?;
            let source_document = Self::document_name(file_path);
            all_chunks.extend(self.chunk_document(&content, &source_document));
        }
        tracing::info!("processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    /// Split one document into chunks.
    ///
    /// Pages are separated by form feeds; files without form feeds are a
    /// single page 0. Within a page, paragraphs that fit the chunk budget
    /// stay whole and oversized paragraphs are windowed with overlap.
    pub fn chunk_document(&self, content: &str, source_document: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for (page_number, page) in content.split('\x0c').enumerate() {
            for piece in self.split_page(page) {
                chunks.push(Chunk {
                    content: piece,
                    source_document: source_document.to_string(),
                    page_number,
                });
            }
        }
        chunks
    }

    fn split_page(&self, page: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        for paragraph in page.split("\n\n") {
            let trimmed = paragraph.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.chars().count() <= self.chunking.max_chars {
                pieces.push(trimmed.to_string());
            } else {
                pieces.extend(self.split_with_overlap(trimmed));
            }
        }
        pieces
    }

    fn split_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let chars: Vec<char> = paragraph.chars().collect();
        let step = self
            .chunking
            .max_chars
            .saturating_sub(self.chunking.overlap_chars)
            .max(1);
        let mut pieces = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunking.max_chars).min(chars.len());
            pieces.push(chars[start..end].iter().collect());
            if end >= chars.len() {
                break;
            }
            start += step;
        }
        pieces
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn document_name(file_path: &Path) -> String {
        file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string())
    }

    fn list_text_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            match path.extension().and_then(|s| s.to_str()) {
                Some("txt") | Some("md") => files.push(path.to_path_buf()),
                _ => {}
            }
        }
        files.sort();
        files
    }
}
