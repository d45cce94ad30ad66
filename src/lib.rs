//! nlst: natural-language syntax trees
//!
//! Turns dependency-parse responses from syntax-analysis services into
//! navigable [`Document`]s of [`Sentence`]s, each holding one dependency
//! [`Tree`], and extracts relation triples from them.
//! Core implementation in Rust with optional Python bindings.

pub mod adapter; // Provider-neutral conversion interface and errors
pub mod document; // Sentences and documents
pub mod google; // Google Cloud Natural Language responses and client
pub mod pool; // Interned strings shared by a document's trees
pub mod tree; // Arena dependency trees and node handles
pub mod triples; // (left, head, right) triple extraction

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use adapter::{ConvertError, MalformedResponse, ResponseAdapter};
pub use document::{Document, Sentence, SentenceSource};
pub use google::{GoogleCloudAdapter, VerbTripleOptions, document_from_response, find_verb_triples};
pub use tree::{NodeId, NodeRef, Tree, TreeBuilder, TreeError, Walk, Word};
pub use triples::{
    Criteria, Triple, TripleMatcher, find_generic_triples, find_generic_triples_multi_criteria,
    find_triples, find_triples_any,
};
