//! Entry and exit waypoints for modules joining or leaving an assembly.
//!
//! A module whose resting position sits inside the box of the *other* active
//! modules drops in from (or leaves towards) the sky above the box. A module
//! outside that box slides along the radial direction it already occupies.

use crate::bounds::{Bounds, normalize_or_up};
use crate::catalog::ConfigurationSpecification;
use glam::Vec3;

/// Travel distance policy for one kind of waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaypointProfile {
    /// Floor so single-module assemblies still travel visibly.
    pub min_distance: f32,
    /// Fraction of the bounds diagonal used when it exceeds the floor.
    pub diagonal_scale: f32,
}

impl WaypointProfile {
    pub fn travel_distance(&self, bounds: Option<&Bounds>) -> f32 {
        let diagonal = bounds.map_or(0.0, |b| b.diagonal);
        self.min_distance.max(diagonal * self.diagonal_scale)
    }
}

pub const ENTRY_PROFILE: WaypointProfile = WaypointProfile {
    min_distance: 0.9,
    diagonal_scale: 0.35,
};

/// Exits clear the assembly further than entries approach it.
pub const EXIT_PROFILE: WaypointProfile = WaypointProfile {
    min_distance: 1.15,
    diagonal_scale: 0.55,
};

/// Computes the waypoint for `module_id` resting at `target`, measured against
/// every other module active in `config`.
pub fn compute_waypoint(
    config: &ConfigurationSpecification,
    module_id: &str,
    target: Vec3,
    profile: &WaypointProfile,
) -> Vec3 {
    let bounds = Bounds::from_positions(config.other_positions(module_id));
    let distance = profile.travel_distance(bounds.as_ref());

    match bounds {
        Some(b) if !b.contains(target) => {
            let outward = normalize_or_up(target - b.clamp(target));
            target + outward * distance
        }
        _ => {
            let from_y = bounds.map_or(target.y, |b| b.max.y) + distance;
            Vec3::new(target.x, from_y, target.z)
        }
    }
}

/// Where a module entering `config` at `target` starts its animation.
pub fn compute_entry_waypoint(
    config: &ConfigurationSpecification,
    module_id: &str,
    target: Vec3,
) -> Vec3 {
    compute_waypoint(config, module_id, target, &ENTRY_PROFILE)
}

/// Where a module leaving `config` (the configuration *before* removal) travels through.
pub fn compute_exit_waypoint(
    config: &ConfigurationSpecification,
    module_id: &str,
    target: Vec3,
) -> Vec3 {
    compute_waypoint(config, module_id, target, &EXIT_PROFILE)
}
