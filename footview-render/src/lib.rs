//! Render engine for footview
//!
//! This crate ties the camera, the overlays and the decoded assets into
//! [`FootView`], a single-threaded engine that paints one frame per host
//! callback. Graphics APIs plug in through [`RenderBackend`] and display
//! timing through [`FrameScheduler`]; [`HeadlessBackend`] and
//! [`ManualFrames`] run the engine without a window.

pub mod backend;
pub mod config;
pub mod container;
pub mod error;
pub mod frames;
pub mod headless;
pub mod materials;
pub mod resize;
pub mod scene;
pub mod timing;
pub mod variant;
pub mod view;

pub use backend::*;
pub use config::*;
pub use container::*;
pub use error::*;
pub use frames::*;
pub use headless::*;
pub use materials::*;
pub use resize::*;
pub use scene::*;
pub use timing::*;
pub use variant::*;
pub use view::*;
