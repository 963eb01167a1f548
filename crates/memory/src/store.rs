//! The memory facade shared by the agent loop and the tool executors.

use mnemos_core::error::MemoryError;
use mnemos_core::memory::{ArchivalMemory, BlockName, CoreMemoryBlock, Embedder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::archive::InMemoryArchive;
use crate::core_memory::CoreMemory;
use crate::page::Page;

/// Owns core memory and archival memory.
///
/// Core memory edits bump a revision counter so prompt builders can tell
/// when their rendered prompt is stale. The archival store is built on
/// first use.
pub struct MemoryStore {
    core: RwLock<CoreMemory>,
    revision: AtomicU64,
    archive: OnceCell<Arc<dyn ArchivalMemory>>,
    embedder: Arc<dyn Embedder>,
}

impl MemoryStore {
    pub fn new(core: CoreMemory, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            core: RwLock::new(core),
            revision: AtomicU64::new(0),
            archive: OnceCell::new(),
            embedder,
        }
    }

    /// Use a pre-built archival backend instead of the lazy in-memory one.
    pub fn with_archive(self, archive: Arc<dyn ArchivalMemory>) -> Self {
        let _ = self.archive.set(archive);
        self
    }

    fn read_core(&self) -> RwLockReadGuard<'_, CoreMemory> {
        self.core.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_core(&self) -> RwLockWriteGuard<'_, CoreMemory> {
        self.core.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Monotonic counter of core memory edits.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub fn core_block(&self, name: BlockName) -> String {
        self.read_core().get(name).to_string()
    }

    pub fn core_snapshot(&self) -> [CoreMemoryBlock; 2] {
        self.read_core().blocks()
    }

    pub fn core_append(&self, name: BlockName, content: &str) {
        self.write_core().append(name, content);
        self.bump();
        debug!(block = %name, "Appended to core memory");
    }

    /// Returns `false` when `old` was not found and nothing changed.
    pub fn core_replace(&self, name: BlockName, old: &str, new: &str) -> bool {
        let replaced = self.write_core().replace(name, old, new);
        if replaced {
            self.bump();
            debug!(block = %name, "Replaced text in core memory");
        }
        replaced
    }

    /// Overwrite a block, e.g. after the bot profile changed.
    pub fn reset_core(&self, name: BlockName, text: &str) {
        self.write_core().set(name, text);
        self.bump();
    }

    /// Preamble followed by the rendered core memory blocks.
    pub fn render_prompt(&self, preamble: &str) -> String {
        self.read_core().render(preamble)
    }

    async fn archive(&self) -> &Arc<dyn ArchivalMemory> {
        self.archive
            .get_or_init(|| async {
                info!(embedder = %self.embedder.name(), "Initializing archival memory");
                Arc::new(InMemoryArchive::new()) as Arc<dyn ArchivalMemory>
            })
            .await
    }

    /// Embed `content` and append it to archival memory.
    pub async fn archival_insert(&self, content: &str) -> Result<String, MemoryError> {
        let embedding = self.embedder.embed(content).await?;
        let id = self.archive().await.insert(content.to_string(), embedding).await?;
        debug!(id = %id, "Inserted archival record");
        Ok(id)
    }

    /// Rank archival records against `query` and return one page of content.
    pub async fn archival_search(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Page<String>, MemoryError> {
        let archive = self.archive().await;
        if archive.count().await? == 0 {
            return Ok(Page::paginate(Vec::new(), page, page_size));
        }

        let embedding = self.embedder.embed(query).await?;
        let ranked = archive.search(&embedding, usize::MAX).await?;
        Ok(Page::paginate(ranked, page, page_size).map(|record| record.content))
    }

    pub async fn archival_count(&self) -> Result<usize, MemoryError> {
        self.archive().await.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn store() -> MemoryStore {
        MemoryStore::new(
            CoreMemory::new("I am Sam.", ""),
            Arc::new(HashEmbedder::default()),
        )
    }

    #[test]
    fn core_edits_bump_revision() {
        let store = store();
        assert_eq!(store.revision(), 0);
        store.core_append(BlockName::Human, "likes cats");
        assert_eq!(store.revision(), 1);
        assert_eq!(store.core_block(BlockName::Human), "\nlikes cats");
        assert!(
            store
                .render_prompt("PRE")
                .contains("<human>\n\nlikes cats\n</human>")
        );
    }

    #[test]
    fn failed_replace_keeps_revision() {
        let store = store();
        assert!(!store.core_replace(BlockName::Persona, "Bob", "Rob"));
        assert_eq!(store.revision(), 0);
        assert!(store.core_replace(BlockName::Persona, "Sam", "Samantha"));
        assert_eq!(store.core_block(BlockName::Persona), "I am Samantha.");
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn archival_insert_then_search() {
        let store = store();
        store
            .archival_insert("Favorite food: sushi, especially salmon nigiri")
            .await
            .unwrap();
        store
            .archival_insert("Works night shifts as a nurse")
            .await
            .unwrap();

        let page = store.archival_search("sushi", 0, 5).await.unwrap();
        assert_eq!(page.items, vec!["Favorite food: sushi, especially salmon nigiri"]);
        assert_eq!(store.archival_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn search_on_empty_archive_is_empty() {
        let store = store();
        let page = store.archival_search("anything", 0, 5).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn prebuilt_archive_is_used() {
        let archive = Arc::new(InMemoryArchive::new());
        archive.insert("seeded".into(), vec![1.0]).await.unwrap();
        let store = store().with_archive(archive);
        assert_eq!(store.archival_count().await.unwrap(), 1);
    }
}
