pub mod generation;
pub mod retrieval;

pub use generation::{Generator, ResilientGenerator, StubGenerator};
pub use retrieval::{Retriever, StubRetriever};
