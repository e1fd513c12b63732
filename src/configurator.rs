//! State machine that owns the active configuration and its transition waypoints.
//!
//! The entry point is [`Configurator`]. Build it from a [`ModuleCatalog`], a
//! [`ConfigurationCatalog`] and a [`ConfiguratorConfig`], optionally attach a
//! [`Location`] with [`Configurator::with_location`], then drive it with
//! [`Configurator::toggle`] or [`Configurator::set_configuration_id`].
//!
//! The transition itself is the pure function [`transition`]; the configurator
//! only persists its result as the next previous state.

use crate::catalog::{
    ConfigurationCatalog, ConfigurationId, ConfigurationSpecification, ModuleCatalog, ModuleId,
};
use crate::config::ConfiguratorConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::index::ConfigurationIndex;
use crate::location::{Location, UrlSync};
use crate::resolver::Resolver;
use crate::scene::{ScenePlan, plan_scene};
use crate::sets::ModuleSet;
use crate::toggle::{TogglePreview, ToggleState};
use crate::waypoint::{compute_entry_waypoint, compute_exit_waypoint};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a reader needs for one committed configuration.
///
/// The waypoint maps only describe the most recent transition: a module is in
/// `enter_from_by_module` iff it was absent before and present after, and in
/// `exit_via_by_module` iff it was present before and absent after.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguratorState {
    pub active_configuration_id: ConfigurationId,
    pub enter_from_by_module: BTreeMap<ModuleId, Vec3>,
    pub exit_via_by_module: BTreeMap<ModuleId, Vec3>,
}

impl ConfiguratorState {
    /// A resting state with no transition data.
    pub fn at(id: impl Into<ConfigurationId>) -> Self {
        Self {
            active_configuration_id: id.into(),
            ..Default::default()
        }
    }
}

/// Computes the state after switching from `prev` to `next_id`.
///
/// # Waypoints
///
/// For every module in `modules`:
/// - absent before, present after: enters from its `enter_from` override, or
///   from [`compute_entry_waypoint`] against the next configuration.
/// - present before, absent after: exits via its `exit_to` override, then its
///   `enter_from` override, then [`compute_exit_waypoint`] against the previous
///   configuration.
/// - otherwise: no waypoint.
///
/// An empty `next_id` or the active id returns `prev` unchanged. If either
/// configuration is missing from the catalog the id is switched without any
/// waypoints.
pub fn transition(
    prev: &ConfiguratorState,
    modules: &ModuleCatalog,
    configurations: &ConfigurationCatalog,
    next_id: &str,
) -> ConfiguratorState {
    if next_id.is_empty() || next_id == prev.active_configuration_id {
        return prev.clone();
    }

    let (Some(prev_cfg), Some(next_cfg)) = (
        configurations.get(&prev.active_configuration_id),
        configurations.get(next_id),
    ) else {
        warn!(
            from = %prev.active_configuration_id,
            to = next_id,
            "Configuration missing from catalog; switching without waypoints"
        );
        return ConfiguratorState::at(next_id);
    };

    let mut entering = BTreeMap::new();
    let mut exiting = BTreeMap::new();

    for (id, module) in modules.iter() {
        match (prev_cfg.position(id), next_cfg.position(id)) {
            (None, Some(next_target)) => {
                let from = module
                    .enter_from
                    .unwrap_or_else(|| compute_entry_waypoint(next_cfg, id, next_target));
                entering.insert(id.to_owned(), from);
            }
            (Some(prev_target), None) => {
                let via = module
                    .exit_override()
                    .unwrap_or_else(|| compute_exit_waypoint(prev_cfg, id, prev_target));
                exiting.insert(id.to_owned(), via);
            }
            _ => {}
        }
    }

    ConfiguratorState {
        active_configuration_id: next_id.to_owned(),
        enter_from_by_module: entering,
        exit_via_by_module: exiting,
    }
}

/// The default starting configuration: the explicit initial id when the
/// catalog has it, else the configuration with the most modules.
pub fn default_configuration_id(
    index: &ConfigurationIndex,
    configurations: &ConfigurationCatalog,
    config: &ConfiguratorConfig,
) -> Option<ConfigurationId> {
    if let Some(initial) = &config.initial_configuration_id
        && configurations.contains(initial)
    {
        return Some(initial.clone());
    }
    index.largest().map(|cfg| cfg.id.clone())
}

/// Owns the catalogs, the derived index and the committed [`ConfiguratorState`].
#[derive(Debug)]
pub struct Configurator {
    modules: Arc<ModuleCatalog>,
    configurations: Arc<ConfigurationCatalog>,
    index: ConfigurationIndex,
    config: ConfiguratorConfig,
    state: ConfiguratorState,
    default_id: ConfigurationId,
    url: Option<UrlSync>,
}

impl Configurator {
    /// Starts at the default configuration with empty waypoint maps.
    pub fn new(
        modules: Arc<ModuleCatalog>,
        configurations: Arc<ConfigurationCatalog>,
        config: ConfiguratorConfig,
    ) -> CatalogResult<Self> {
        let index = ConfigurationIndex::build(&configurations);
        let default_id =
            default_configuration_id(&index, &configurations, &config).ok_or(CatalogError::Empty)?;
        debug!(
            modules = modules.len(),
            configurations = configurations.len(),
            initial = %default_id,
            "Configurator ready"
        );

        Ok(Self {
            modules,
            configurations,
            index,
            config,
            state: ConfiguratorState::at(default_id.clone()),
            default_id,
            url: None,
        })
    }

    /// Attaches a URL location (builder pattern).
    ///
    /// Only takes effect when `url_sync` is enabled. The query parameter is read
    /// exactly once, here: a known configuration id overrides the default start.
    /// Later transitions are mirrored back into the parameter.
    pub fn with_location(mut self, location: Box<dyn Location>) -> Self {
        if !self.config.url_sync {
            debug!("URL sync disabled; ignoring location");
            return self;
        }

        let sync = UrlSync::new(
            location,
            self.config.url_param.clone(),
            self.config.url_history_mode,
        );
        if let Some(requested) = sync.requested(&self.configurations) {
            self.state = ConfiguratorState::at(requested);
        }
        self.url = Some(sync);
        self
    }

    /// Commits a switch to `next_id`.
    ///
    /// Returns `false` for an empty id or the already active one. Waypoint maps
    /// are replaced together with the id, never merged.
    pub fn set_configuration_id(&mut self, next_id: &str) -> bool {
        if next_id.is_empty() || next_id == self.state.active_configuration_id {
            return false;
        }

        let next = transition(&self.state, &self.modules, &self.configurations, next_id);
        debug!(
            from = %self.state.active_configuration_id,
            to = %next.active_configuration_id,
            entering = ?next.enter_from_by_module.keys().collect::<Vec<_>>(),
            exiting = ?next.exit_via_by_module.keys().collect::<Vec<_>>(),
            "Configuration changed"
        );
        self.state = next;

        if let Some(url) = &mut self.url {
            url.publish(&self.state.active_configuration_id);
        }
        true
    }

    /// Toggles `module` through the resolver.
    ///
    /// Returns `false`, leaving everything untouched, when the toggle is
    /// unavailable or resolves to the active configuration.
    pub fn toggle(&mut self, module: &str) -> bool {
        let active = self.active_module_set();
        let Some(next_id) = self
            .resolver()
            .next_configuration_id(&active, module)
            .map(str::to_owned)
        else {
            debug!(module, "Toggle unavailable");
            return false;
        };
        self.set_configuration_id(&next_id)
    }

    /// Swaps in new catalogs and re-applies the default policy.
    ///
    /// The index is rebuilt only when `configurations` is a different catalog.
    /// If the active id no longer exists, or the default changed, the
    /// configurator transitions to the new default.
    pub fn replace_catalogs(
        &mut self,
        modules: Arc<ModuleCatalog>,
        configurations: Arc<ConfigurationCatalog>,
    ) -> CatalogResult<()> {
        if configurations.is_empty() {
            return Err(CatalogError::Empty);
        }
        if !Arc::ptr_eq(&self.configurations, &configurations) {
            self.index = ConfigurationIndex::build(&configurations);
        }
        self.modules = modules;
        self.configurations = configurations;

        let default_id = default_configuration_id(&self.index, &self.configurations, &self.config)
            .ok_or(CatalogError::Empty)?;
        let has_active = self
            .configurations
            .contains(&self.state.active_configuration_id);
        if !has_active || default_id != self.default_id {
            info!(
                previous = %self.default_id,
                default = %default_id,
                has_active,
                "Catalog replaced; applying default configuration"
            );
            self.default_id = default_id.clone();
            self.set_configuration_id(&default_id);
        }
        Ok(())
    }

    pub fn state(&self) -> &ConfiguratorState {
        &self.state
    }

    pub fn active_configuration_id(&self) -> &str {
        &self.state.active_configuration_id
    }

    /// The active configuration, or the first catalog entry if the active id
    /// is somehow unknown.
    pub fn active_configuration(&self) -> Option<&ConfigurationSpecification> {
        self.configurations
            .get(&self.state.active_configuration_id)
            .or_else(|| self.configurations.first().map(|(_, cfg)| cfg))
    }

    pub fn active_module_set(&self) -> ModuleSet {
        self.active_configuration()
            .map(ConfigurationSpecification::module_set)
            .unwrap_or_default()
    }

    pub fn enter_from_by_module(&self) -> &BTreeMap<ModuleId, Vec3> {
        &self.state.enter_from_by_module
    }

    pub fn exit_via_by_module(&self) -> &BTreeMap<ModuleId, Vec3> {
        &self.state.exit_via_by_module
    }

    pub fn modules(&self) -> &Arc<ModuleCatalog> {
        &self.modules
    }

    pub fn configurations(&self) -> &Arc<ConfigurationCatalog> {
        &self.configurations
    }

    pub fn index(&self) -> &ConfigurationIndex {
        &self.index
    }

    pub fn config(&self) -> &ConfiguratorConfig {
        &self.config
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.index)
    }

    /// What toggling `module` would change, without changing it.
    pub fn preview(&self, module: &str) -> Option<TogglePreview> {
        self.resolver().preview(
            &self.state.active_configuration_id,
            &self.active_module_set(),
            module,
        )
    }

    pub fn toggle_state(&self, module: &str) -> ToggleState {
        self.resolver().toggle_state(
            &self.state.active_configuration_id,
            &self.active_module_set(),
            module,
        )
    }

    /// Control state of every module, in catalog order.
    pub fn toggle_states(&self) -> Vec<(&str, ToggleState)> {
        let active = self.active_module_set();
        let resolver = self.resolver();
        self.modules
            .ids()
            .map(|id| {
                let state =
                    resolver.toggle_state(&self.state.active_configuration_id, &active, id);
                (id, state)
            })
            .collect()
    }

    /// Placement of every module for the renderer.
    pub fn scene(&self) -> ScenePlan {
        plan_scene(
            &self.modules,
            self.active_configuration(),
            &self.state,
            self.config.offscreen_position,
            self.config.world_offset,
        )
    }
}
