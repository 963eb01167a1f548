//! Memory types — core memory blocks and the archival store abstraction.
//!
//! The agent has three memory tiers:
//! - **Core memory**: two short text blocks (persona, human) that are always
//!   rendered into the system prompt
//! - **Recall memory**: the committed message history (see `message.rs`)
//! - **Archival memory**: an unbounded, embedding-searchable store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MemoryError;

/// Which core memory block an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockName {
    /// The agent's own persona / profile
    Persona,
    /// What the agent knows about the human it talks to
    Human,
}

impl BlockName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::Human => "human",
        }
    }
}

impl fmt::Display for BlockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockName {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "persona" => Ok(Self::Persona),
            "human" => Ok(Self::Human),
            other => Err(MemoryError::BlockNotFound(other.to_string())),
        }
    }
}

/// One of the two always-in-prompt text blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreMemoryBlock {
    pub name: BlockName,
    pub text: String,
}

impl CoreMemoryBlock {
    pub fn new(name: BlockName, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
        }
    }
}

/// A single archival memory record. Records are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivalRecord {
    /// Unique ID for this record
    pub id: String,

    /// The stored text
    pub content: String,

    /// When this record was inserted
    pub created_at: DateTime<Utc>,

    /// Similarity to the query (set by search operations)
    #[serde(default)]
    pub score: f32,

    /// The embedding computed at insert time
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// Text-to-vector capability used by archival memory.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// A short name for logs (e.g., "openai", "hash").
    fn name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError>;
}

/// An append-only store of embedded records with nearest-neighbour search.
#[async_trait]
pub trait ArchivalMemory: Send + Sync {
    /// The backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Store a record whose embedding was already computed. Returns its ID.
    async fn insert(&self, content: String, embedding: Vec<f32>) -> Result<String, MemoryError>;

    /// Rank records by similarity to `query_embedding`, best first.
    ///
    /// Only records with a positive similarity are returned.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ArchivalRecord>, MemoryError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, MemoryError>;
}
