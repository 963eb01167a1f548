//! Embedders for archival memory.
//!
//! - [`ProviderEmbedder`] calls the provider's embedding endpoint
//! - [`HashEmbedder`] is an offline bag-of-words encoder: each token is
//!   hashed (FNV-1a) into one of `dimensions` buckets. Texts that share
//!   words end up with positive cosine similarity, texts that don't score 0.
//! - [`FallbackEmbedder`] tries a primary embedder once and commits to
//!   either it or the fallback for the rest of the session.

use async_trait::async_trait;
use mnemos_core::error::MemoryError;
use mnemos_core::memory::Embedder;
use mnemos_core::provider::{EmbeddingRequest, Provider};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Words too common to carry meaning.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "do", "for", "has", "have", "i", "in", "is",
    "it", "me", "my", "of", "on", "or", "so", "that", "the", "to", "was", "what", "with", "you",
];

/// Deterministic local embedder; needs no network.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Encode synchronously.
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        Ok(self.encode(text))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
}

/// Embeds through a provider's embedding endpoint.
pub struct ProviderEmbedder {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for ProviderEmbedder {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        debug!(provider = %self.provider.name(), model = %self.model, "Embedding text");
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![text.to_string()],
            })
            .await
            .map_err(|e| MemoryError::EmbeddingFailed(e.to_string()))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::EmbeddingFailed("provider returned no embedding".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Primary,
    Fallback,
}

/// Uses `primary` unless its very first embedding fails, in which case every
/// later call goes to `fallback`. The choice never flips afterwards, so one
/// archive never holds vectors from two embedders.
pub struct FallbackEmbedder {
    primary: Arc<dyn Embedder>,
    fallback: Arc<dyn Embedder>,
    choice: OnceLock<Choice>,
}

impl FallbackEmbedder {
    pub fn new(primary: Arc<dyn Embedder>, fallback: Arc<dyn Embedder>) -> Self {
        Self {
            primary,
            fallback,
            choice: OnceLock::new(),
        }
    }

    /// Name of the embedder in use, or `None` before the first call.
    pub fn active(&self) -> Option<&str> {
        self.choice.get().map(|choice| match choice {
            Choice::Primary => self.primary.name(),
            Choice::Fallback => self.fallback.name(),
        })
    }
}

#[async_trait]
impl Embedder for FallbackEmbedder {
    fn name(&self) -> &str {
        self.active().unwrap_or_else(|| self.primary.name())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        match self.choice.get() {
            Some(Choice::Primary) => return self.primary.embed(text).await,
            Some(Choice::Fallback) => return self.fallback.embed(text).await,
            None => {}
        }

        match self.primary.embed(text).await {
            Ok(vector) => match *self.choice.get_or_init(|| Choice::Primary) {
                Choice::Primary => Ok(vector),
                Choice::Fallback => self.fallback.embed(text).await,
            },
            Err(e) => {
                if *self.choice.get_or_init(|| Choice::Fallback) == Choice::Primary {
                    return Err(e);
                }
                warn!(
                    primary = %self.primary.name(),
                    fallback = %self.fallback.name(),
                    error = %e,
                    "Embedding endpoint unavailable, switching to fallback embedder"
                );
                self.fallback.embed(text).await
            }
        }
    }
}
