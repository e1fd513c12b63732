//! # modular-configurator
//!
//! Configuration resolution and transition waypoints for modular hardware
//! configurators, built on `glam`.
//!
//! Given a catalog of physical modules and a catalog of valid module
//! combinations, a [`Configurator`] lets a user toggle modules on and off,
//! picks the best matching configuration for every toggle, and computes the
//! 3D waypoints that modules entering or leaving the assembly animate through.
//! Rendering is left to the host: it reads a [`ScenePlan`] and draws it with
//! whatever engine it likes.

pub mod bounds;
pub mod catalog;
pub mod config;
pub mod configurator;
pub mod error;
pub mod index;
pub mod location;
pub mod resolver;
pub mod scene;
pub mod sets;
pub mod toggle;
pub mod waypoint;

pub use bounds::*;
pub use catalog::*;
pub use config::*;
pub use configurator::*;
pub use error::*;
pub use index::*;
pub use location::*;
pub use resolver::*;
pub use scene::*;
pub use sets::*;
pub use toggle::*;
pub use waypoint::*;
