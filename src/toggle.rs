//! Toggle availability and hover previews for module controls.

use crate::catalog::ConfigurationId;
use crate::resolver::Resolver;
use crate::sets::ModuleSet;
use serde::{Deserialize, Serialize};

/// What previewing a toggle would do to one module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewAction {
    /// The module would be turned on.
    Add,
    /// The module would be turned off.
    Remove,
}

/// The outcome of a toggle, computed without committing it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TogglePreview {
    /// Configuration the toggle would commit.
    pub next_id: ConfigurationId,
    /// Modules the next configuration turns on.
    pub added: ModuleSet,
    /// Modules the next configuration turns off.
    pub removed: ModuleSet,
}

impl TogglePreview {
    pub fn action_for(&self, module: &str) -> Option<PreviewAction> {
        if self.added.contains(module) {
            Some(PreviewAction::Add)
        } else if self.removed.contains(module) {
            Some(PreviewAction::Remove)
        } else {
            None
        }
    }
}

/// How a module control should be presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleState {
    /// Active in the current configuration.
    pub is_on: bool,
    /// A toggle resolves to a configuration other than the active one.
    pub can_toggle: bool,
    /// On, and no configuration can turn it off.
    pub locked: bool,
    /// The control should not accept clicks.
    pub disabled: bool,
}

impl<'a> Resolver<'a> {
    /// Previews toggling `module`.
    ///
    /// `None` when the toggle is unreachable or leads back to `active_id`.
    pub fn preview(
        &self,
        active_id: &str,
        active: &ModuleSet,
        module: &str,
    ) -> Option<TogglePreview> {
        let next = self.resolve_toggle(active, module)?.configuration;
        if next.id == active_id {
            return None;
        }

        Some(TogglePreview {
            next_id: next.id.clone(),
            added: next.module_set.difference(active).cloned().collect(),
            removed: active.difference(&next.module_set).cloned().collect(),
        })
    }

    pub fn toggle_state(&self, active_id: &str, active: &ModuleSet, module: &str) -> ToggleState {
        let is_on = active.contains(module);
        let can_toggle = self
            .next_configuration_id(active, module)
            .is_some_and(|next| next != active_id);
        let locked = is_on && !can_toggle;
        ToggleState {
            is_on,
            can_toggle,
            locked,
            disabled: (!is_on && !can_toggle) || locked,
        }
    }
}
