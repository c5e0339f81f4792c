#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Tantivy-based lexical index adapter. Wraps a term-frequency ranking
//! backend behind the `KeywordSearch` contract.

pub mod index;
pub mod schema;

pub use index::TantivyKeywordIndex;
