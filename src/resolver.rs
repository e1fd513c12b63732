//! Maps a module toggle to the best matching catalog configuration.
//!
//! Given the active module set `A` and a toggled module `m`, the desired set is
//! `A ∪ {m}` (turning on) or `A \ {m}` (turning off). Resolution order, first
//! success wins:
//!
//! 1. A configuration whose module set equals the desired set.
//! 2. Turning on: the smallest configuration containing the desired set.
//!    Turning off: the largest configuration contained in the desired set.
//! 3. The closest configuration that contains `m` (turning on) or excludes it
//!    (turning off), scored by [`closeness_score`].
//!
//! Ties always go to the configuration that comes first in catalog order.
//! Every query is side-effect free so it can back hover previews as well as
//! committed toggles.

use crate::index::{ConfigurationIndex, IndexedConfiguration};
use crate::sets::{ModuleSet, are_equal, difference_size, is_subset};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::trace;

/// Weight that makes one unwanted change outrank any number of tolerated ones.
pub const PRIORITY_WEIGHT: usize = 1000;

/// Whether a toggle switches a module on or off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleDirection {
    /// The module is absent and gets added.
    On,
    /// The module is active and gets removed.
    Off,
}

impl ToggleDirection {
    /// Toggling an active module turns it off; anything else turns it on.
    pub fn for_module(active: &ModuleSet, module: &str) -> Self {
        if active.contains(module) {
            Self::Off
        } else {
            Self::On
        }
    }
}

/// Which resolution step produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionRule {
    /// Module set equals the desired set.
    Exact,
    /// Smallest configuration containing the desired set.
    MinimalSuperset,
    /// Largest configuration contained in the desired set.
    MaximalSubset,
    /// Lowest [`closeness_score`] among configurations honouring the toggle.
    ClosestFallback,
}

/// The configuration a toggle resolves to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution<'a> {
    /// The chosen configuration.
    pub configuration: &'a IndexedConfiguration,
    /// Which step picked it.
    pub rule: ResolutionRule,
    /// Whether the toggle added or removed the module.
    pub direction: ToggleDirection,
}

/// Fallback score of `candidate` relative to the active set.
///
/// Turning on, losing an active module costs [`PRIORITY_WEIGHT`] and gaining an
/// extra one costs 1. Turning off, the weights swap.
pub fn closeness_score(
    active: &ModuleSet,
    candidate: &ModuleSet,
    direction: ToggleDirection,
) -> usize {
    let removals = difference_size(active, candidate);
    let additions = difference_size(candidate, active);
    match direction {
        ToggleDirection::On => removals * PRIORITY_WEIGHT + additions,
        ToggleDirection::Off => additions * PRIORITY_WEIGHT + removals,
    }
}

/// The set `active` would become if `module` were toggled.
pub fn desired_set(active: &ModuleSet, module: &str) -> (ModuleSet, ToggleDirection) {
    let direction = ToggleDirection::for_module(active, module);
    let mut desired = active.clone();
    match direction {
        ToggleDirection::On => {
            desired.insert(module.to_owned());
        }
        ToggleDirection::Off => {
            desired.remove(module);
        }
    }
    (desired, direction)
}

/// Pure queries over a [`ConfigurationIndex`].
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    index: &'a ConfigurationIndex,
}

impl<'a> Resolver<'a> {
    /// A resolver over `index`.
    pub fn new(index: &'a ConfigurationIndex) -> Self {
        Self { index }
    }

    /// The index this resolver queries.
    pub fn index(&self) -> &'a ConfigurationIndex {
        self.index
    }

    /// First configuration whose module set equals `desired`.
    pub fn find_exact(&self, desired: &ModuleSet) -> Option<&'a IndexedConfiguration> {
        self.index
            .iter()
            .find(|cfg| are_equal(&cfg.module_set, desired))
    }

    /// Smallest configuration containing `desired`; first one wins ties.
    pub fn find_minimal_superset(&self, desired: &ModuleSet) -> Option<&'a IndexedConfiguration> {
        self.index
            .iter()
            .filter(|cfg| is_subset(desired, &cfg.module_set))
            .min_by_key(|cfg| cfg.size)
    }

    /// Largest configuration contained in `desired`; first one wins ties.
    pub fn find_maximal_subset(&self, desired: &ModuleSet) -> Option<&'a IndexedConfiguration> {
        self.index
            .iter()
            .filter(|cfg| is_subset(&cfg.module_set, desired))
            .min_by_key(|cfg| Reverse(cfg.size))
    }

    /// Closest configuration that contains (`On`) or excludes (`Off`) `module`.
    pub fn find_closest(
        &self,
        active: &ModuleSet,
        module: &str,
        direction: ToggleDirection,
    ) -> Option<&'a IndexedConfiguration> {
        let wants_module = direction == ToggleDirection::On;
        self.index
            .iter()
            .filter(|cfg| cfg.module_set.contains(module) == wants_module)
            .min_by_key(|cfg| closeness_score(active, &cfg.module_set, direction))
    }

    /// Resolves toggling `module` while `active` is on.
    ///
    /// Returns `None` when no configuration can honour the toggle at all; the
    /// control should then be presented as unavailable.
    pub fn resolve_toggle(&self, active: &ModuleSet, module: &str) -> Option<Resolution<'a>> {
        let (desired, direction) = desired_set(active, module);
        let resolution = |configuration, rule| Resolution {
            configuration,
            rule,
            direction,
        };

        if let Some(cfg) = self.find_exact(&desired) {
            return Some(resolution(cfg, ResolutionRule::Exact));
        }

        let nearest = match direction {
            ToggleDirection::On => self
                .find_minimal_superset(&desired)
                .map(|cfg| resolution(cfg, ResolutionRule::MinimalSuperset)),
            ToggleDirection::Off => self
                .find_maximal_subset(&desired)
                .map(|cfg| resolution(cfg, ResolutionRule::MaximalSubset)),
        };

        let found = nearest.or_else(|| {
            self.find_closest(active, module, direction)
                .map(|cfg| resolution(cfg, ResolutionRule::ClosestFallback))
        });

        trace!(
            module,
            ?direction,
            resolved = found.map(|r| r.configuration.id.as_str()),
            rule = ?found.map(|r| r.rule),
            "Resolved toggle"
        );
        found
    }

    /// Id of the configuration toggling `module` leads to, if any.
    pub fn next_configuration_id(&self, active: &ModuleSet, module: &str) -> Option<&'a str> {
        self.resolve_toggle(active, module)
            .map(|r| r.configuration.id.as_str())
    }
}
