use crate::catalog::ConfigurationId;
use crate::location::HistoryMode;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Query parameter used for URL synchronization unless configured otherwise.
pub const DEFAULT_URL_PARAM: &str = "config";

/// Where absent modules are parked, far outside the camera's view.
pub const DEFAULT_OFFSCREEN_POSITION: Vec3 = Vec3::new(0.0, 1000.0, 0.0);

/// Configuration for a [`Configurator`](crate::Configurator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfiguratorConfig {
    /// Preferred starting configuration; ignored when not in the catalog.
    pub initial_configuration_id: Option<ConfigurationId>,
    /// Read the starting configuration from, and mirror changes to, a query parameter.
    pub url_sync: bool,
    /// Name of the query parameter. Default: `"config"`.
    pub url_param: String,
    /// History write used when mirroring. Default: replace.
    pub url_history_mode: HistoryMode,
    /// Target handed to the renderer for modules the active configuration lacks.
    pub offscreen_position: Vec3,
    /// Translation applied to the whole assembly.
    pub world_offset: Vec3,
}

impl Default for ConfiguratorConfig {
    fn default() -> Self {
        Self {
            initial_configuration_id: None,
            url_sync: false,
            url_param: DEFAULT_URL_PARAM.to_owned(),
            url_history_mode: HistoryMode::Replace,
            offscreen_position: DEFAULT_OFFSCREEN_POSITION,
            world_offset: Vec3::ZERO,
        }
    }
}

impl ConfiguratorConfig {
    pub fn with_initial_configuration(mut self, id: impl Into<ConfigurationId>) -> Self {
        self.initial_configuration_id = Some(id.into());
        self
    }

    /// Enables URL synchronization on `param`.
    pub fn with_url_sync(mut self, param: impl Into<String>, mode: HistoryMode) -> Self {
        self.url_sync = true;
        self.url_param = param.into();
        self.url_history_mode = mode;
        self
    }
}
