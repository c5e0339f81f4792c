#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Vector index adapter: cosine similarity over chunk embeddings produced
//! by whatever `Embedder` the caller supplies. The embedding model itself
//! stays external; this crate only owns the similarity surface and a JSON
//! persistence format.

pub mod index;

pub use index::CosineVectorIndex;
