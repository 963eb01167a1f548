//! Bot profiles: named bundles of system prompt, persona and human text.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One bot profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotProfile {
    pub id: String,
    pub name: String,

    /// Replaces the built-in system preamble when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Initial persona core memory block
    #[serde(default)]
    pub persona: String,

    /// Initial human core memory block
    #[serde(default)]
    pub human: String,
}

impl BotProfile {
    /// A profile with an empty id; [`BotBook::create`] assigns one.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            system_prompt: None,
            persona: String::new(),
            human: String::new(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_human(mut self, human: impl Into<String>) -> Self {
        self.human = human.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// The ordered set of profiles plus the current selection.
///
/// Maps to the `[bots]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,

    #[serde(default)]
    pub profiles: Vec<BotProfile>,
}

impl BotBook {
    pub fn get(&self, id: &str) -> Option<&BotProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    fn index_of(&self, id: &str) -> Result<usize, ConfigError> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ConfigError::UnknownBot(id.to_string()))
    }

    /// Add a profile under a freshly generated id and return the id.
    pub fn create(&mut self, mut profile: BotProfile) -> String {
        let mut id = generate_id(&profile.name);
        while self.get(&id).is_some() {
            id = generate_id(&profile.name);
        }
        profile.id = id.clone();
        self.profiles.push(profile);
        id
    }

    /// Copy a profile as "<name> Clone" and return the new id.
    pub fn clone_bot(&mut self, id: &str) -> Result<String, ConfigError> {
        let source = self.profiles[self.index_of(id)?].clone();
        let name = format!("{} Clone", source.name);
        Ok(self.create(BotProfile { name, ..source }))
    }

    /// Replace a profile's content. The id is kept.
    pub fn update(&mut self, id: &str, profile: BotProfile) -> Result<(), ConfigError> {
        let index = self.index_of(id)?;
        self.profiles[index] = BotProfile {
            id: id.to_string(),
            ..profile
        };
        Ok(())
    }

    /// Remove a profile; the selection moves to the first remaining one.
    pub fn delete(&mut self, id: &str) -> Result<BotProfile, ConfigError> {
        let index = self.index_of(id)?;
        let removed = self.profiles.remove(index);
        self.selected = self.profiles.first().map(|p| p.id.clone());
        Ok(removed)
    }

    pub fn select(&mut self, id: &str) -> Result<(), ConfigError> {
        self.index_of(id)?;
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// The selected profile, falling back to the first one when the
    /// selection is unset or dangling.
    pub fn selected(&self) -> Option<&BotProfile> {
        self.selected
            .as_deref()
            .and_then(|id| self.get(id))
            .or_else(|| self.profiles.first())
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// `"Study Buddy"` becomes `"study-buddy-3fa9c1"`.
fn generate_id(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let suffix = &suffix[..6];
    if slug.is_empty() {
        format!("bot-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> (BotBook, String, String) {
        let mut book = BotBook::default();
        let sam = book.create(BotProfile::named("Sam").with_persona("I am Sam."));
        let tutor = book.create(BotProfile::named("Study Buddy"));
        (book, sam, tutor)
    }

    #[test]
    fn create_assigns_slug_ids() {
        let (book, sam, tutor) = book();
        assert!(sam.starts_with("sam-"));
        assert!(tutor.starts_with("study-buddy-"));
        assert_eq!(tutor.len(), "study-buddy-".len() + 6);
        assert_eq!(book.profiles.len(), 2);
    }

    #[test]
    fn selected_falls_back_to_first() {
        let (mut book, sam, tutor) = book();
        assert_eq!(book.selected().unwrap().id, sam);

        book.select(&tutor).unwrap();
        assert_eq!(book.selected().unwrap().name, "Study Buddy");

        book.selected = Some("gone".into());
        assert_eq!(book.selected().unwrap().id, sam);
    }

    #[test]
    fn clone_appends_suffix() {
        let (mut book, sam, _) = book();
        let copy = book.clone_bot(&sam).unwrap();
        let copy = book.get(&copy).unwrap();
        assert_eq!(copy.name, "Sam Clone");
        assert_eq!(copy.persona, "I am Sam.");
        assert_ne!(copy.id, sam);
    }

    #[test]
    fn delete_moves_selection_to_first() {
        let (mut book, sam, tutor) = book();
        book.select(&tutor).unwrap();
        book.delete(&tutor).unwrap();
        assert_eq!(book.selected.as_deref(), Some(sam.as_str()));

        book.delete(&sam).unwrap();
        assert!(book.selected.is_none());
        assert!(book.selected().is_none());
    }

    #[test]
    fn update_keeps_id() {
        let (mut book, sam, _) = book();
        book.update(&sam, BotProfile::named("Samuel").with_human("Name: Chad"))
            .unwrap();
        let bot = book.get(&sam).unwrap();
        assert_eq!(bot.name, "Samuel");
        assert_eq!(bot.human, "Name: Chad");
        assert_eq!(bot.id, sam);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (mut book, _, _) = book();
        assert!(matches!(book.select("nope"), Err(ConfigError::UnknownBot(_))));
        assert!(matches!(book.delete("nope"), Err(ConfigError::UnknownBot(_))));
        assert!(book.clone_bot("nope").is_err());
    }

    #[test]
    fn punctuation_only_name_gets_generic_slug() {
        assert!(generate_id("!!!").starts_with("bot-"));
    }
}
