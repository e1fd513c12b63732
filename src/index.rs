//! Derived, read-only view of a configuration catalog.

use crate::catalog::{ConfigurationCatalog, ConfigurationId};
use crate::sets::ModuleSet;
use serde::{Deserialize, Serialize};

/// One configuration with its module set materialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexedConfiguration {
    /// The catalog key.
    pub id: ConfigurationId,
    /// Display name.
    pub name: String,
    /// Keys of the configuration's `module_positions`.
    pub module_set: ModuleSet,
    /// Cardinality of `module_set`.
    pub size: usize,
}

/// Every configuration of a catalog, in catalog order.
///
/// Built once per catalog; the [`Configurator`](crate::Configurator) rebuilds it
/// only when it is handed a different catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationIndex {
    entries: Vec<IndexedConfiguration>,
}

impl ConfigurationIndex {
    /// Materializes every configuration of `catalog`.
    pub fn build(catalog: &ConfigurationCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|(key, cfg)| {
                let module_set = cfg.module_set();
                IndexedConfiguration {
                    id: key.to_owned(),
                    name: cfg.name.clone(),
                    size: module_set.len(),
                    module_set,
                }
            })
            .collect();
        Self { entries }
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedConfiguration> {
        self.entries.iter()
    }

    /// Looks up an entry by configuration id.
    pub fn get(&self, id: &str) -> Option<&IndexedConfiguration> {
        self.entries.iter().find(|cfg| cfg.id == id)
    }

    /// The configuration with the most active modules; the first one wins ties.
    pub fn largest(&self) -> Option<&IndexedConfiguration> {
        self.entries
            .iter()
            .fold(None, |best: Option<&IndexedConfiguration>, cfg| match best {
                Some(b) if b.size >= cfg.size => Some(b),
                _ => Some(cfg),
            })
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
    use crate::catalog::ConfigurationSpecification;
    use crate::sets::module_set;
    use glam::Vec3;

    fn catalog() -> ConfigurationCatalog {
        [
            ConfigurationSpecification::new("base", "Base Only").with_module("base", Vec3::ZERO),
            ConfigurationSpecification::new("base-head", "Base + Head")
                .with_module("base", Vec3::ZERO)
                .with_module("head", Vec3::Y),
            ConfigurationSpecification::new("base-torso", "Base + Torso")
                .with_module("base", Vec3::ZERO)
                .with_module("torso", Vec3::Y),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn build_materializes_sets_in_catalog_order() {
        let index = ConfigurationIndex::build(&catalog());
        let ids: Vec<_> = index.iter().map(|cfg| cfg.id.as_str()).collect();
        assert_eq!(ids, ["base", "base-head", "base-torso"]);

        let entry = index.get("base-head").unwrap();
        assert_eq!(entry.name, "Base + Head");
        assert_eq!(entry.module_set, module_set(["base", "head"]));
        assert_eq!(entry.size, 2);
    }

    #[test]
    fn largest_prefers_first_on_ties() {
        let index = ConfigurationIndex::build(&catalog());
        assert_eq!(index.largest().unwrap().id, "base-head");
        assert!(ConfigurationIndex::default().largest().is_none());
    }

    #[test]
    fn index_uses_catalog_key() {
        let mut catalog = ConfigurationCatalog::new();
        catalog.insert("key", ConfigurationSpecification::new("declared", "Mismatch"));
        let index = ConfigurationIndex::build(&catalog);
        assert!(index.get("key").is_some());
        assert!(index.get("declared").is_none());
    }
}
