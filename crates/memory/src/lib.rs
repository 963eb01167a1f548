//! Memory system implementations for mnemos.
//!
//! - [`CoreMemory`]: the persona and human blocks rendered into every prompt
//! - [`InMemoryArchive`]: best-effort archival store ranked by cosine similarity
//! - [`recall`]: substring and date-range search over committed history
//! - [`MemoryStore`]: the facade the agent loop and tool executors share

pub mod archive;
pub mod core_memory;
pub mod embedding;
pub mod page;
pub mod recall;
pub mod store;
pub mod vector;

pub use archive::InMemoryArchive;
pub use core_memory::CoreMemory;
pub use embedding::{FallbackEmbedder, HashEmbedder, ProviderEmbedder};
pub use page::Page;
pub use store::MemoryStore;
pub use vector::{cosine_similarity, vector_search};
