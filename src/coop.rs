use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::matcher::{keys_of, match_local_keyed, LocalMatch};
use crate::models::CoopEntry;

#[derive(Debug, Default)]
pub struct CoopCatalog {
    entries: Vec<CoopEntry>,
    keys: Vec<String>,
    warned: Mutex<HashSet<String>>,
}

impl CoopCatalog {
    pub fn merge(first: Vec<CoopEntry>, second: Vec<CoopEntry>) -> Self {
        let mut catalog = Self::default();
        catalog.extend(first);
        catalog.extend(second);
        catalog
    }

    pub fn extend(&mut self, more: Vec<CoopEntry>) {
        let mut names: HashSet<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        let fresh: Vec<CoopEntry> = more
            .into_iter()
            .filter(|e| names.insert(e.name.clone()))
            .collect();
        self.keys.extend(keys_of(&fresh));
        self.entries.extend(fresh);
        debug!(total = self.entries.len(), "Merged co-op listing");
    }

    pub fn lookup(&self, title: &str) -> LocalMatch<'_, CoopEntry> {
        match_local_keyed(title, &self.entries, &self.keys)
    }

    /// Ambiguous names count as not local and are warned about once per title.
    pub fn is_local_multiplayer(&self, title: &str) -> bool {
        match self.lookup(title) {
            LocalMatch::Unique(_) => true,
            LocalMatch::None => false,
            LocalMatch::Ambiguous(hits) => {
                if self.first_warning(title) {
                    let ids = hits.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
                    warn!(
                        "Ambiguous co-op match for '{}': {} entries ({})",
                        title,
                        hits.len(),
                        ids.join(", ")
                    );
                }
                false
            }
        }
    }

    fn first_warning(&self, title: &str) -> bool {
        match self.warned.lock() {
            Ok(mut warned) => warned.insert(title.to_string()),
            Err(_) => true,
        }
    }

    pub fn entries(&self) -> &[CoopEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> CoopEntry {
        CoopEntry {
            id: id.to_string(),
            name: name.to_string(),
            ..CoopEntry::default()
        }
    }

    #[test]
    fn merge_keeps_first_list_and_skips_known_names() {
        let couch = vec![entry("1", "Overcooked"), entry("2", "Rayman Legends")];
        let split = vec![
            entry("3", "Overcooked"),
            entry("4", "overcooked"),
            entry("5", "Borderlands 2"),
        ];
        let catalog = CoopCatalog::merge(couch, split);
        let ids = catalog.entries().iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn merging_again_does_not_grow() {
        let couch = vec![entry("1", "Overcooked"), entry("2", "Rayman Legends")];
        let split = vec![entry("3", "Overcooked"), entry("5", "Borderlands 2")];
        let mut catalog = CoopCatalog::merge(couch.clone(), split.clone());
        let size = catalog.len();
        catalog.extend(couch);
        catalog.extend(split);
        assert_eq!(catalog.len(), size);
    }

    #[test]
    fn keys_follow_merged_entries() {
        let catalog = CoopCatalog::merge(
            vec![entry("1", "Pokémon 3")],
            vec![entry("2", "Pokémon 3"), entry("3", "Gravity Rush 2")],
        );
        assert_eq!(catalog.keys, vec!["pokemoniii", "gravityrushii"]);
        assert!(catalog.is_local_multiplayer("Gravity Rush II"));
        assert!(catalog.is_local_multiplayer("pokemon iii"));
    }

    #[test]
    fn ambiguity_is_warned_once_per_title() {
        let catalog = CoopCatalog::merge(
            vec![entry("1", "Overcooked"), entry("2", "OVERCOOKED")],
            Vec::new(),
        );
        assert!(catalog.first_warning("overcooked"));
        assert!(!catalog.first_warning("overcooked"));
        assert!(!catalog.is_local_multiplayer("overcooked"));
        assert!(catalog.first_warning("Knack"));
    }

    #[test]
    fn ambiguous_names_are_not_local() {
        let catalog = CoopCatalog::merge(
            vec![entry("1", "Overcooked"), entry("2", "OVERCOOKED")],
            vec![entry("3", "Knack")],
        );
        assert!(matches!(catalog.lookup("overcooked"), LocalMatch::Ambiguous(_)));
        assert!(!catalog.is_local_multiplayer("overcooked"));
        assert!(catalog.is_local_multiplayer("Knack"));
        assert!(catalog.is_local_multiplayer("Knack 2"));
        assert!(!catalog.is_local_multiplayer("Gran Turismo"));
    }
}
