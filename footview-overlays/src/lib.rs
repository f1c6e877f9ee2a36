//! Measurement and fit-zone overlays for footview
//!
//! Everything here is plain geometry in foot coordinates: rulers and their
//! stop lines for distance measurements, padded outlines for girth planes,
//! info points on named markers and the fit-zone anchors. The render crate
//! turns these into scene nodes and shader uniforms.

pub mod lines;
pub mod ruler;
pub mod plane_rect;
pub mod builder;
pub mod canvas;
pub mod info_points;
pub mod fit_zones;

pub use lines::*;
pub use ruler::*;
pub use plane_rect::*;
pub use builder::*;
pub use canvas::*;
pub use info_points::*;
pub use fit_zones::*;
