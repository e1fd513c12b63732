//! Per-module placement handed to the renderer each frame.

use crate::catalog::{ConfigurationSpecification, ModuleCatalog, ModuleId};
use crate::configurator::ConfiguratorState;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where one module should be and how it gets there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModulePlacement {
    /// The module this placement describes.
    pub module_id: ModuleId,
    /// Resting position in the active configuration, or the offscreen parking spot.
    pub target: Vec3,
    /// Active in the current configuration.
    pub is_present: bool,
    /// Translation of the whole assembly, copied from the [`ScenePlan`].
    pub world_offset: Vec3,
    /// Set only while the module is entering.
    pub enter_from: Option<Vec3>,
    /// Set only while the module is exiting.
    pub exit_via: Option<Vec3>,
}

impl ModulePlacement {
    /// Where an entering module appears before it animates to `target`.
    pub fn entry_start(&self) -> Vec3 {
        self.enter_from.unwrap_or(self.target + Vec3::Y)
    }

    /// `target` in world space.
    pub fn world_target(&self) -> Vec3 {
        self.world_offset + self.target
    }

    /// Where the module should animate towards right now.
    pub fn animation_target(&self) -> Vec3 {
        match self.exit_via {
            Some(exit) if !self.is_present => exit,
            _ => self.target,
        }
    }
}

/// Every module of the catalog, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenePlan {
    /// Translation of the whole assembly.
    pub world_offset: Vec3,
    /// One entry per catalog module.
    pub placements: Vec<ModulePlacement>,
}

impl ScenePlan {
    /// The placement of `module`, if the catalog defines it.
    pub fn get(&self, module: &str) -> Option<&ModulePlacement> {
        self.placements.iter().find(|p| p.module_id == module)
    }

    /// `local` moved into world space.
    pub fn world_position(&self, local: Vec3) -> Vec3 {
        self.world_offset + local
    }
}

/// Builds the placement of every module in `modules`.
pub fn plan_scene(
    modules: &ModuleCatalog,
    active: Option<&ConfigurationSpecification>,
    state: &ConfiguratorState,
    offscreen_position: Vec3,
    world_offset: Vec3,
) -> ScenePlan {
    let placements = modules
        .ids()
        .map(|id| {
            let position = active.and_then(|cfg| cfg.position(id));
            ModulePlacement {
                module_id: id.to_owned(),
                target: position.unwrap_or(offscreen_position),
                is_present: position.is_some(),
                world_offset,
                enter_from: state.enter_from_by_module.get(id).copied(),
                exit_via: state.exit_via_by_module.get(id).copied(),
            }
        })
        .collect();

    ScenePlan {
        world_offset,
        placements,
    }
}
