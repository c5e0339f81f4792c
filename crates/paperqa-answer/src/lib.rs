#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Answer orchestration: session state, context construction and delegation
//! to the language model, with generation failures reported to the user
//! instead of crashing the interaction.

pub mod context;
pub mod orchestrator;
pub mod session;
pub mod summary;

pub use orchestrator::{answer, Answer, UPLOAD_PROMPT};
pub use session::Session;
