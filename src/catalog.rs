use crate::error::{CatalogError, CatalogResult};
use crate::sets::ModuleSet;
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// A unique identifier for a physical module type (e.g. `"head"`, `"arms"`).
pub type ModuleId = String;

/// A unique identifier for a catalog configuration.
pub type ConfigurationId = String;

/// One swappable physical module of the product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpecification {
    /// Should equal the catalog key this module is stored under.
    #[serde(default)]
    pub id: ModuleId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Opaque asset key handed to the renderer (e.g. a GLB path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Fixed start point used whenever this module enters.
    /// When omitted, the entry waypoint is computed from the assembly bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_from: Option<Vec3>,

    /// Fixed waypoint used whenever this module exits.
    /// When omitted, falls back to `enter_from`, then to a computed waypoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_to: Option<Vec3>,
}

impl ModuleSpecification {
    pub fn new(id: impl Into<ModuleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_enter_from(mut self, enter_from: Vec3) -> Self {
        self.enter_from = Some(enter_from);
        self
    }

    pub fn with_exit_to(mut self, exit_to: Vec3) -> Self {
        self.exit_to = Some(exit_to);
        self
    }

    /// The declared exit override, falling back to the entry override.
    pub fn exit_override(&self) -> Option<Vec3> {
        self.exit_to.or(self.enter_from)
    }
}

/// A named, catalog-defined combination of modules with fixed positions.
///
/// A module is active in this configuration if and only if it has an entry in
/// `module_positions`. There is no separate on/off flag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpecification {
    /// Should equal the catalog key; the key is authoritative.
    #[serde(default)]
    pub id: ConfigurationId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Resting position of every active module.
    #[serde(default)]
    pub module_positions: BTreeMap<ModuleId, Vec3>,
}

impl ConfigurationSpecification {
    pub fn new(id: impl Into<ConfigurationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            module_positions: BTreeMap::new(),
        }
    }

    /// Places `module` at `position` (builder pattern).
    pub fn with_module(mut self, module: impl Into<ModuleId>, position: Vec3) -> Self {
        self.module_positions.insert(module.into(), position);
        self
    }

    pub fn position(&self, module: &str) -> Option<Vec3> {
        self.module_positions.get(module).copied()
    }

    pub fn contains(&self, module: &str) -> bool {
        self.module_positions.contains_key(module)
    }

    /// The materialized set of active module ids.
    pub fn module_set(&self) -> ModuleSet {
        self.module_positions.keys().cloned().collect()
    }

    /// Positions of every active module except `excluded`.
    pub fn other_positions<'a>(&'a self, excluded: &'a str) -> impl Iterator<Item = Vec3> + 'a {
        self.module_positions
            .iter()
            .filter(move |(id, _)| id.as_str() != excluded)
            .map(|(_, position)| *position)
    }

    /// Number of active modules.
    pub fn len(&self) -> usize {
        self.module_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.module_positions.is_empty()
    }
}

/// An entry that can live in a [`Catalog`].
pub trait CatalogEntry {
    /// Human-readable kind used in diagnostics.
    const KIND: &'static str;

    fn declared_id(&self) -> &str;

    fn adopt_id(&mut self, key: &str);
}

impl CatalogEntry for ModuleSpecification {
    const KIND: &'static str = "module";

    fn declared_id(&self) -> &str {
        &self.id
    }

    fn adopt_id(&mut self, key: &str) {
        self.id = key.to_owned();
    }
}

impl CatalogEntry for ConfigurationSpecification {
    const KIND: &'static str = "configuration";

    fn declared_id(&self) -> &str {
        &self.id
    }

    fn adopt_id(&mut self, key: &str) {
        self.id = key.to_owned();
    }
}

/// An insertion-ordered, keyed collection of catalog entries.
///
/// Iteration order is the order keys were first inserted (document order when
/// loaded from JSON). Every "first encountered wins" tie-break in the resolver
/// depends on this order.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Catalog<T> {
    entries: IndexMap<String, T>,
}

/// All module types, keyed by [`ModuleId`].
pub type ModuleCatalog = Catalog<ModuleSpecification>;

/// All valid module combinations, keyed by [`ConfigurationId`].
pub type ConfigurationCatalog = Catalog<ConfigurationSpecification>;

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The first entry in catalog order.
    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries
            .first()
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Iterates `(key, entry)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: CatalogEntry> Catalog<T> {
    /// Stores `entry` under `key`.
    ///
    /// Re-inserting an existing key replaces the entry but keeps its original
    /// position. An entry with an empty id adopts the key; a different declared
    /// id is reported and otherwise ignored, since the key is authoritative.
    pub fn insert(&mut self, key: impl Into<String>, mut entry: T) {
        let key = key.into();
        if entry.declared_id().is_empty() {
            entry.adopt_id(&key);
        } else if entry.declared_id() != key {
            warn!(
                kind = T::KIND,
                key = %key,
                declared = %entry.declared_id(),
                "Catalog key does not match declared id; using the key"
            );
        }

        self.entries.insert(key, entry);
    }

    /// Stores `entry` under its own declared id (builder pattern).
    pub fn with(mut self, entry: T) -> Self {
        let key = entry.declared_id().to_owned();
        self.insert(key, entry);
        self
    }

    /// Fails on the first entry whose declared id differs from its key.
    pub fn check_ids(&self) -> CatalogResult<()> {
        for (key, entry) in self.iter() {
            if entry.declared_id() != key {
                return Err(CatalogError::IdMismatch {
                    kind: T::KIND,
                    key: key.to_owned(),
                    declared: entry.declared_id().to_owned(),
                });
            }
        }
        Ok(())
    }
}

impl<T: CatalogEntry> FromIterator<T> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl ConfigurationCatalog {
    /// Strict content validation against `modules`.
    ///
    /// Rejects mismatched ids, non-finite coordinates, positions for modules the
    /// module catalog does not define, and module-set collisions. Nothing in the
    /// runtime path calls this; hosts opt in at load time.
    pub fn validate(&self, modules: &ModuleCatalog) -> CatalogResult<()> {
        if self.is_empty() {
            return Err(CatalogError::Empty);
        }
        modules.check_ids()?;
        self.check_ids()?;

        let mut seen: HashMap<ModuleSet, &str> = HashMap::new();
        for (key, cfg) in self.iter() {
            for (module, position) in &cfg.module_positions {
                if !position.is_finite() {
                    return Err(CatalogError::NonFinitePosition {
                        configuration: key.to_owned(),
                        module: module.clone(),
                    });
                }
                if !modules.contains(module) {
                    return Err(CatalogError::UnknownModule {
                        configuration: key.to_owned(),
                        module: module.clone(),
                    });
                }
            }
            if let Some(first) = seen.insert(cfg.module_set(), key) {
                return Err(CatalogError::DuplicateModuleSet {
                    first: first.to_owned(),
                    second: key.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Deserialized in document order; every entry goes through [`Catalog::insert`].
impl<'de, T> Deserialize<'de> for Catalog<T>
where
    T: CatalogEntry + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, T>::deserialize(deserializer)?;
        let mut catalog = Self::new();
        for (key, entry) in raw {
            catalog.insert(key, entry);
        }
        Ok(catalog)
    }
}

/// A complete product catalog as shipped with the site content.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub modules: ModuleCatalog,

    pub configurations: ConfigurationCatalog,

    /// Preferred starting configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_configuration_id: Option<ConfigurationId>,
}

impl CatalogDocument {
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string_pretty(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// See [`ConfigurationCatalog::validate`].
    pub fn validate(&self) -> CatalogResult<()> {
        self.configurations.validate(&self.modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "modules": {
            "torso": { "id": "torso", "name": "Torso" },
            "base": { "id": "base", "name": "Mobile Base", "enterFrom": [-3, -0.75, 0] },
            "head": { "name": "Head" }
        },
        "configurations": {
            "base-torso": {
                "id": "base-torso",
                "name": "Base + Torso",
                "modulePositions": { "torso": [0, 0.9, 0], "base": [0, -0.75, 0] }
            },
            "base": {
                "id": "base",
                "name": "Base Only",
                "modulePositions": { "base": [0, -0.75, 0] }
            }
        }
    }"#;

    #[test]
    fn json_keeps_document_order() {
        let doc = CatalogDocument::from_json_str(DOC).unwrap();
        let modules: Vec<_> = doc.modules.ids().collect();
        assert_eq!(modules, ["torso", "base", "head"]);
        let configs: Vec<_> = doc.configurations.ids().collect();
        assert_eq!(configs, ["base-torso", "base"]);
    }

    #[test]
    fn serialized_catalog_keeps_document_order() {
        let doc = CatalogDocument::from_json_str(DOC).unwrap();
        let json = doc.to_json_string_pretty().unwrap();
        assert!(json.find("\"torso\": {").unwrap() < json.find("\"base\": {").unwrap());

        let reloaded = CatalogDocument::from_json_str(&json).unwrap();
        let configs: Vec<_> = reloaded.configurations.ids().collect();
        assert_eq!(configs, ["base-torso", "base"]);
        assert_eq!(reloaded.modules.first().unwrap().0, "torso");
        assert_eq!(reloaded.modules.get("head").unwrap().id, "head");
    }

    #[test]
    fn missing_id_adopts_key() {
        let doc = CatalogDocument::from_json_str(DOC).unwrap();
        assert_eq!(doc.modules.get("head").unwrap().id, "head");
    }

    #[test]
    fn positions_parse_as_vectors() {
        let doc = CatalogDocument::from_json_str(DOC).unwrap();
        let cfg = doc.configurations.get("base-torso").unwrap();
        assert_eq!(cfg.position("torso"), Some(Vec3::new(0.0, 0.9, 0.0)));
        assert_eq!(cfg.len(), 2);
        assert!(cfg.contains("base"));
        assert!(!cfg.contains("head"));
        assert_eq!(
            doc.modules.get("base").unwrap().enter_from,
            Some(Vec3::new(-3.0, -0.75, 0.0))
        );
    }

    #[test]
    fn mismatched_id_keeps_key_authoritative() {
        let mut catalog = ConfigurationCatalog::new();
        catalog.insert("base", ConfigurationSpecification::new("wrong", "Base Only"));
        assert!(catalog.contains("base"));
        assert!(!catalog.contains("wrong"));
        assert!(matches!(
            catalog.check_ids(),
            Err(CatalogError::IdMismatch { key, declared, .. }) if key == "base" && declared == "wrong"
        ));
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut catalog = ModuleCatalog::new();
        catalog.insert("a", ModuleSpecification::new("a", "First"));
        catalog.insert("b", ModuleSpecification::new("b", "Second"));
        catalog.insert("a", ModuleSpecification::new("a", "Replaced"));
        let names: Vec<_> = catalog.iter().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(names, ["Replaced", "Second"]);
    }

    #[test]
    fn exit_override_falls_back_to_enter_from() {
        let module = ModuleSpecification::new("arms", "Arms").with_enter_from(Vec3::new(0.0, 3.5, -3.0));
        assert_eq!(module.exit_override(), Some(Vec3::new(0.0, 3.5, -3.0)));
        let module = module.with_exit_to(Vec3::X);
        assert_eq!(module.exit_override(), Some(Vec3::X));
        assert_eq!(ModuleSpecification::new("head", "Head").exit_override(), None);
    }

    #[test]
    fn validate_rejects_duplicate_module_sets() {
        let modules: ModuleCatalog = [ModuleSpecification::new("base", "Base")]
            .into_iter()
            .collect();
        let configs: ConfigurationCatalog = [
            ConfigurationSpecification::new("a", "A").with_module("base", Vec3::ZERO),
            ConfigurationSpecification::new("b", "B").with_module("base", Vec3::Y),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            configs.validate(&modules),
            Err(CatalogError::DuplicateModuleSet { first, second }) if first == "a" && second == "b"
        ));
    }

    #[test]
    fn validate_rejects_unknown_and_non_finite() {
        let modules: ModuleCatalog = [ModuleSpecification::new("base", "Base")]
            .into_iter()
            .collect();
        let unknown: ConfigurationCatalog =
            [ConfigurationSpecification::new("a", "A").with_module("head", Vec3::ZERO)]
                .into_iter()
                .collect();
        assert!(matches!(
            unknown.validate(&modules),
            Err(CatalogError::UnknownModule { module, .. }) if module == "head"
        ));

        let nan: ConfigurationCatalog = [ConfigurationSpecification::new("a", "A")
            .with_module("base", Vec3::new(f32::NAN, 0.0, 0.0))]
        .into_iter()
        .collect();
        assert!(matches!(
            nan.validate(&modules),
            Err(CatalogError::NonFinitePosition { .. })
        ));

        assert!(matches!(
            ConfigurationCatalog::new().validate(&modules),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            CatalogDocument::from_json_str("{\"configurations\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }
}
