//! Meaning nodes: types, lenient decoding from stored blobs, and the SQLite
//! node store.

pub mod decode;
pub mod store;
pub mod types;

pub use types::{MeaningNode, StoredNode};
