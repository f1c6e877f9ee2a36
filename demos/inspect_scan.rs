//! Load a scan directory into a headless foot view and report what the
//! engine built.
//!
//! Usage:
//!   cargo run -p footview-demos --bin make_sample_scan -- /tmp/scan
//!   cargo run -p footview-demos --bin inspect_scan -- /tmp/scan --measurement length
//!
//! `descriptions.json` and `fit_zones.json` next to the meshes are picked up
//! automatically.

use anyhow::{bail, Context, Result};
use clap::Parser;
use footview::prelude::*;
use footview::render::ResourceCounts;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "inspect_scan")]
#[command(about = "Load a foot scan into a headless view and report the scene")]
struct Args {
    /// Directory holding left.bmf, right.bmf and the optional side files
    scan_dir: PathBuf,

    /// Measurement descriptions, keyed by "{side}_{measurement}"
    #[arg(long)]
    descriptions: Option<PathBuf>,

    /// Fit-zone classifications
    #[arg(long)]
    fit_zones: Option<PathBuf>,

    /// Measurement to draw on both feet; repeatable
    #[arg(long = "measurement")]
    measurements: Vec<String>,

    /// Camera preset to animate to once the feet are loaded
    #[arg(long)]
    view: Option<String>,

    /// Simulated time to paint frames for, in seconds
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Use the onboarding variant instead of the result page
    #[arg(long)]
    onboarding: bool,

    /// View configuration JSON; absent fields keep the detailed preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ResourceReport {
    geometries: usize,
    materials: usize,
    render_targets: usize,
}

impl From<ResourceCounts> for ResourceReport {
    fn from(counts: ResourceCounts) -> Self {
        Self {
            geometries: counts.geometries,
            materials: counts.materials,
            render_targets: counts.render_targets,
        }
    }
}

#[derive(Serialize)]
struct CameraReport {
    position: [f32; 3],
    target: [f32; 3],
    zoom: f32,
    orthographic_blend: f32,
}

#[derive(Serialize)]
struct Report {
    variant: &'static str,
    scene_nodes: usize,
    resources: ResourceReport,
    frames_rendered: usize,
    render_target: Option<(u32, u32)>,
    camera: CameraReport,
    info_points: Option<InfoPointCanvasPositions>,
    fit_zones: Option<FitZoneCanvasPositions>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

/// The explicit path, else the conventional file in the scan directory
fn side_file(explicit: &Option<PathBuf>, scan_dir: &Path, name: &str) -> Option<PathBuf> {
    explicit
        .clone()
        .or_else(|| Some(scan_dir.join(name)).filter(|path| path.exists()))
}

fn load_config(path: &Option<PathBuf>) -> Result<ViewConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(ViewConfig::from_json(&text)?)
        }
        None => Ok(ViewConfig::detailed()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args.config)?;
    let variant = if args.onboarding {
        ViewVariant::onboarding()
    } else {
        ViewVariant::scan()
    };

    let clock = Rc::new(ManualClock::new(0.0));
    let host = ViewHost {
        container: Box::new(SharedContainer::new(SurfaceSize::new(
            args.width,
            args.height,
            args.pixel_ratio,
        ))),
        surface: Box::new(FixedSurface::new(args.width as f32, args.height as f32)),
        clock: clock.clone(),
    };
    let mut view = FootView::new(config, variant, HeadlessBackend::new(), ManualFrames::new(), host);

    view.load_from_source(&FileSystemSource::new(&args.scan_dir))
        .with_context(|| format!("Failed to load scan from {}", args.scan_dir.display()))?;

    let descriptions: Option<MeasurementDescriptions> =
        side_file(&args.descriptions, &args.scan_dir, "descriptions.json")
            .map(|path| read_json(&path))
            .transpose()?;

    let info_points: Rc<RefCell<Option<InfoPointCanvasPositions>>> = Rc::default();
    if !args.measurements.is_empty() {
        let Some(descriptions) = &descriptions else {
            bail!("--measurement needs measurement descriptions");
        };
        for id in &args.measurements {
            for side in FootSide::ALL {
                view.show_description(side, id, descriptions);
                let sink = info_points.clone();
                view.show_description_notes(side, id, descriptions, move |positions| {
                    *sink.borrow_mut() = Some(positions.clone());
                });
            }
        }
    }

    let fit_zones: Rc<RefCell<Option<FitZoneCanvasPositions>>> = Rc::default();
    if let Some(path) = side_file(&args.fit_zones, &args.scan_dir, "fit_zones.json") {
        let Some(descriptions) = &descriptions else {
            bail!("Fit zones need measurement descriptions to place their markers");
        };
        let classifications: FitZoneClassifications = read_json(&path)?;
        let sink = fit_zones.clone();
        view.show_fit_zones(&classifications, descriptions, move |positions| {
            *sink.borrow_mut() = Some(*positions);
        })?;
    }

    if let Some(name) = &args.view {
        view.animate_to_named(name)?;
    }

    let frames = (args.seconds * 1000.0 / FRAME_MS).ceil() as usize;
    for _ in 0..frames {
        clock.advance(FRAME_MS);
        if view.frames_mut().take_pending() {
            view.paint();
        }
    }

    let camera = view.camera();
    let target = view.controls().target();
    let report = Report {
        variant: view.variant().name,
        scene_nodes: view.scene().node_count(),
        resources: view.backend().counts().into(),
        frames_rendered: view.backend().frames_rendered(),
        render_target: view
            .render_target()
            .and_then(|handle| view.backend().render_target_size(handle)),
        camera: CameraReport {
            position: camera.position.coords.into(),
            target: target.coords.into(),
            zoom: camera.zoom,
            orthographic_blend: camera.orthographic_blend,
        },
        info_points: info_points.borrow().clone(),
        fit_zones: *fit_zones.borrow(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    view.dispose();
    let leaked = view.backend().counts();
    if leaked.total() > 0 {
        bail!("{} backend resources outlived the view: {:?}", leaked.total(), leaked);
    }
    log::info!("All backend resources released");
    Ok(())
}

fn print_report(report: &Report) {
    println!("{} view", report.variant);
    println!("==========");
    println!("Scene nodes:      {}", report.scene_nodes);
    println!(
        "Backend:          {} geometries, {} materials, {} render targets",
        report.resources.geometries, report.resources.materials, report.resources.render_targets
    );
    println!("Frames rendered:  {}", report.frames_rendered);
    if let Some((width, height)) = report.render_target {
        println!("Offscreen target: {}x{}", width, height);
    }

    let camera = &report.camera;
    println!(
        "Camera:           position {:?}, target {:?}, zoom {:.3}, ortho blend {:.3}",
        camera.position, camera.target, camera.zoom, camera.orthographic_blend
    );

    if let Some(points) = &report.info_points {
        println!("\nInfo points:");
        for (side, markers) in points.iter() {
            for (marker, position) in markers {
                println!("  {:5} {:16} ({:7.1}, {:7.1})", side.as_str(), marker, position.x, position.y);
            }
        }
    }

    if let Some(zones) = &report.fit_zones {
        println!("\nFit-zone markers:");
        for (side, positions) in zones.iter() {
            for (zone, position) in positions.iter() {
                println!("  {:5} {:16} ({:7.1}, {:7.1})", side.as_str(), zone.as_str(), position.x, position.y);
            }
        }
    }
}
