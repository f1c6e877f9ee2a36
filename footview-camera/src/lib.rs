//! Camera and navigation for footview
//!
//! This crate provides the blended perspective/orthographic
//! [`ProjectionCamera`], the [`OrbitController`] that drives it from
//! pointer and touch input or animated pose transitions, and the named
//! camera presets of the scan viewer.

pub mod spherical;
pub mod projection;
pub mod orientation;
pub mod animation;
pub mod events;
pub mod input;
pub mod controls;
#[cfg(feature = "winit")]
pub mod winit_input;

pub use spherical::*;
pub use projection::*;
pub use orientation::*;
pub use animation::*;
pub use events::*;
pub use input::*;
pub use controls::*;
#[cfg(feature = "winit")]
pub use winit_input::WinitInputAdapter;
