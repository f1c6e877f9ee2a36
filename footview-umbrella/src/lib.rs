//! # footview
//!
//! Interactive viewing of a pair of scanned feet: BMF mesh decoding, a
//! blended perspective/orthographic camera with an animated orbit
//! controller, measurement rulers and girth planes, fit-zone markers and a
//! frame-driven render engine.
//!
//! This is the umbrella crate; the individual `footview-*` crates can be
//! used on their own for finer control over dependencies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use footview::prelude::*;
//! use std::rc::Rc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let host = ViewHost {
//!     container: Box::new(SharedContainer::new(SurfaceSize::new(800, 600, 1.0))),
//!     surface: Box::new(FixedSurface::new(800.0, 600.0)),
//!     clock: Rc::new(SystemClock::new()),
//! };
//! let mut view = FootView::new(
//!     ViewConfig::detailed(),
//!     ViewVariant::scan(),
//!     HeadlessBackend::new(),
//!     ManualFrames::new(),
//!     host,
//! );
//! view.load_from_source(&FileSystemSource::new("scans/1234"))?;
//! view.paint();
//! view.dispose();
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: `io`, `overlays` and `render`
//! - `io`: BMF decoding and scan side files
//! - `overlays`: measurement geometry and fit-zone annotation
//! - `render`: the [`FootView`](render::FootView) engine
//! - `winit`: translate winit window events into controller input
//! - `all`: everything above

pub use footview_core::*;

pub use footview_camera as camera;

#[cfg(feature = "io")]
pub use footview_io as io;

#[cfg(feature = "overlays")]
pub use footview_overlays as overlays;

#[cfg(feature = "render")]
pub use footview_render as render;

/// Convenient imports for common use cases
pub mod prelude {
    pub use footview_core::{
        Aabb, Clock, FitClassification, FitZone, FitZoneClassifications, FootPair, FootSide,
        ManualClock, MeasurementDescriptions, MeasurementType, MeshGroup, Plane, Point2f,
        Point3f, Ray, SystemClock, Transform3D, Vector3f, ZoneMap,
    };

    pub use footview_camera::{
        CameraOrientation, CameraView, ControlEvent, FixedSurface, InputEvent, InputSurface,
        OrbitController, OrbitSettings, PointerButton, ProjectionCamera,
    };

    #[cfg(feature = "winit")]
    pub use footview_camera::WinitInputAdapter;

    #[cfg(feature = "io")]
    pub use footview_io::{
        read_mesh_groups, AssetSource, BmfDecoder, BmfWriter, FileSystemSource, MemorySource,
        MeshLines, ScanAssets, SceneFile,
    };

    #[cfg(feature = "overlays")]
    pub use footview_overlays::{
        FitZoneAnnotator, FitZoneCanvasPositions, InfoPointCanvasPositions, MeasurementGeometry,
        MeasurementGeometryBuilder, Viewport,
    };

    #[cfg(feature = "render")]
    pub use footview_render::{
        ColorMode, FootView, FrameScheduler, HeadlessBackend, ManualFrames, RenderBackend,
        SharedContainer, Style, SurfaceSize, ViewConfig, ViewContainer, ViewHost, ViewVariant,
    };
}
