//! Core memory — the two always-in-prompt blocks.

use mnemos_core::memory::{BlockName, CoreMemoryBlock};
use serde::{Deserialize, Serialize};

/// Header placed between the system preamble and the blocks.
pub const CORE_MEMORY_HEADER: &str = "Core memory shown below (limited in size, additional information stored in archival / recall memory):";

/// The persona and human blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreMemory {
    persona: String,
    human: String,
}

impl CoreMemory {
    pub fn new(persona: impl Into<String>, human: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            human: human.into(),
        }
    }

    pub fn get(&self, name: BlockName) -> &str {
        match name {
            BlockName::Persona => &self.persona,
            BlockName::Human => &self.human,
        }
    }

    fn block_mut(&mut self, name: BlockName) -> &mut String {
        match name {
            BlockName::Persona => &mut self.persona,
            BlockName::Human => &mut self.human,
        }
    }

    /// Overwrite a block entirely.
    pub fn set(&mut self, name: BlockName, text: impl Into<String>) {
        *self.block_mut(name) = text.into();
    }

    /// Append `content` on a new line.
    pub fn append(&mut self, name: BlockName, content: &str) {
        let block = self.block_mut(name);
        block.push('\n');
        block.push_str(content);
    }

    /// Replace the first exact occurrence of `old` with `new`.
    ///
    /// Returns `false` (and leaves the block untouched) when `old` is empty
    /// or not present.
    pub fn replace(&mut self, name: BlockName, old: &str, new: &str) -> bool {
        if old.is_empty() {
            return false;
        }
        let block = self.block_mut(name);
        if !block.contains(old) {
            return false;
        }
        *block = block.replacen(old, new, 1);
        true
    }

    pub fn blocks(&self) -> [CoreMemoryBlock; 2] {
        [
            CoreMemoryBlock::new(BlockName::Persona, self.persona.clone()),
            CoreMemoryBlock::new(BlockName::Human, self.human.clone()),
        ]
    }

    /// Render the live system prompt: preamble followed by both blocks.
    pub fn render(&self, preamble: &str) -> String {
        [
            preamble,
            CORE_MEMORY_HEADER,
            "<persona>",
            &self.persona,
            "</persona>",
            "<human>",
            &self.human,
            "</human>",
        ]
        .join("\n")
    }
}
