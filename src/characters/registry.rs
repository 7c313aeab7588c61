//! Character template registry.
//!
//! Stores templates by id (in registration order) and builds rosters from
//! them. `CharacterRegistry::standard()` loads the built-in toy collection.

use rustc_hash::FxHashMap;

use super::builtin;
use super::definition::CharacterTemplate;
use super::instance::CharacterInstance;
use crate::core::{CharacterId, InstanceId, Side};
use crate::error::{BattleError, Result};

/// Registry of character templates.
///
/// ```
/// use toy_arena::characters::CharacterRegistry;
/// use toy_arena::core::Side;
///
/// let registry = CharacterRegistry::standard();
/// let roster = registry
///     .roster(Side::A, "player1", &["robo_fighter", "brick_dude", "wizard_toy"])
///     .unwrap();
///
/// assert_eq!(roster[1].instance_id.as_str(), "player1-brick_dude-1");
/// assert_eq!(roster[0].name, "Robot Guardian");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CharacterRegistry {
    templates: FxHashMap<CharacterId, CharacterTemplate>,
    order: Vec<CharacterId>,
}

impl CharacterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in toy.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for template in builtin::templates() {
            registry.insert(template);
        }
        registry
    }

    /// Register a template. Fails if the id is already taken.
    pub fn register(&mut self, template: CharacterTemplate) -> Result<()> {
        if self.templates.contains_key(&template.id) {
            return Err(BattleError::InvalidConfig(format!(
                "character template `{}` registered twice",
                template.id
            )));
        }
        self.insert(template);
        Ok(())
    }

    fn insert(&mut self, template: CharacterTemplate) {
        if !self.templates.contains_key(&template.id) {
            self.order.push(template.id.clone());
        }
        self.templates.insert(template.id.clone(), template);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CharacterTemplate> {
        self.templates.get(&CharacterId::new(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterTemplate> {
        self.order.iter().filter_map(|id| self.templates.get(id))
    }

    /// Instantiate a roster. Instance ids are `<prefix>-<template>-<slot>`.
    pub fn roster(&self, side: Side, prefix: &str, ids: &[&str]) -> Result<Vec<CharacterInstance>> {
        ids.iter()
            .enumerate()
            .map(|(slot, id)| {
                let template = self
                    .get(id)
                    .ok_or_else(|| BattleError::UnknownTemplate((*id).to_owned()))?;
                let instance_id = InstanceId::for_slot(prefix, &template.id, slot);
                Ok(template.instantiate(instance_id, side))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::Rarity;

    #[test]
    fn test_standard_registry_contents() {
        let registry = CharacterRegistry::standard();
        assert!(registry.len() >= 10);

        let wizard = registry.get("wizard_toy").unwrap();
        assert_eq!(wizard.rarity, Rarity::Legendary);
        assert_eq!(wizard.max_health, 85);
        assert_eq!(wizard.abilities.len(), 3);
    }

    #[test]
    fn test_every_builtin_has_an_ultimate() {
        let registry = CharacterRegistry::standard();
        for template in registry.iter() {
            assert!(
                template.abilities.iter().any(|a| a.is_ultimate),
                "{} has no ultimate",
                template.id
            );
        }
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = CharacterRegistry::new();
        let toy = CharacterTemplate::new("toy", "Toy", Rarity::Common, 50);
        registry.register(toy.clone()).unwrap();
        assert!(registry.register(toy).is_err());
    }

    #[test]
    fn test_roster_unknown_template() {
        let registry = CharacterRegistry::standard();
        let err = registry.roster(Side::A, "p", &["robo_fighter", "nope"]).unwrap_err();
        assert_eq!(err, BattleError::UnknownTemplate("nope".into()));
    }

    #[test]
    fn test_iter_preserves_registration_order() {
        let mut registry = CharacterRegistry::new();
        for id in ["c", "a", "b"] {
            registry
                .register(CharacterTemplate::new(id, id, Rarity::Common, 10))
                .unwrap();
        }
        let ids: Vec<_> = registry.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
