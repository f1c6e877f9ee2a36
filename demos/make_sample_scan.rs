//! Write a synthetic scan directory that `inspect_scan` can load.
//!
//! Each foot is a half ellipsoid standing on the ground plate, with contour
//! lines, measurement descriptions and fit-zone classifications to match.

use anyhow::{Context, Result};
use clap::Parser;
use footview::io::{BmfDocument, BmfGroup, BmfWriter, MeshLines, ScanAssets};
use footview::FootSide;
use serde_json::{json, Value};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};

const HALF_WIDTH: f32 = 0.045;
const HALF_LENGTH: f32 = 0.13;
const HEIGHT: f32 = 0.07;
const CENTER_Y: f32 = 0.01;

#[derive(Parser, Debug)]
#[command(name = "make_sample_scan")]
#[command(about = "Write a synthetic foot scan for the footview tools")]
struct Args {
    /// Output directory, created if missing
    out_dir: PathBuf,

    /// Rings from the ground up to the top of each foot
    #[arg(long, default_value_t = 12)]
    rings: u32,

    /// Vertices around each ring
    #[arg(long, default_value_t = 32)]
    segments: u32,

    /// Contour lines drawn over each foot
    #[arg(long, default_value_t = 6)]
    contours: u32,
}

fn surface_point(elevation: f32, azimuth: f32) -> [f32; 3] {
    [
        HALF_WIDTH * elevation.cos() * azimuth.cos(),
        CENTER_Y + HALF_LENGTH * elevation.cos() * azimuth.sin(),
        HEIGHT * elevation.sin(),
    ]
}

fn foot_document(rings: u32, segments: u32) -> BmfDocument {
    let mut positions = Vec::with_capacity((rings * segments + 2) as usize);
    for ring in 0..rings {
        let elevation = FRAC_PI_2 * ring as f32 / rings as f32;
        for segment in 0..segments {
            positions.push(surface_point(elevation, TAU * segment as f32 / segments as f32));
        }
    }
    let top = positions.len() as u32;
    positions.push([0.0, CENTER_Y, HEIGHT]);
    let bottom = top + 1;
    positions.push([0.0, CENTER_Y, 0.0]);

    let index = |ring: u32, segment: u32| ring * segments + segment % segments;
    let mut faces = Vec::new();
    for ring in 0..rings.saturating_sub(1) {
        for segment in 0..segments {
            let a = index(ring, segment);
            let b = index(ring, segment + 1);
            let c = index(ring + 1, segment + 1);
            let d = index(ring + 1, segment);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    for segment in 0..segments {
        faces.push([index(rings - 1, segment), index(rings - 1, segment + 1), top]);
        faces.push([bottom, index(0, segment + 1), index(0, segment)]);
    }

    BmfDocument {
        positions,
        colors: None,
        groups: vec![BmfGroup {
            material_name: Some("foot".to_string()),
            faces,
            uvs: None,
            normals: None,
        }],
    }
}

fn contour_lines(contours: u32, segments: u32) -> MeshLines {
    let mut lines = MeshLines::default();
    for contour in 1..=contours {
        let elevation = FRAC_PI_2 * contour as f32 / (contours + 1) as f32;
        let first = lines.vertices.len() as u32;
        for segment in 0..segments {
            let mut point = surface_point(elevation, TAU * segment as f32 / segments as f32);
            // lift off the surface so the lines are not z-fighting
            point[2] += 0.0005;
            lines.vertices.push(point);
            lines.edges.push([first + segment, first + (segment + 1) % segments]);
        }
    }
    lines
}

fn identity_with_offset(x: f32, y: f32) -> Value {
    json!([[1, 0, 0, x], [0, 1, 0, y], [0, 0, 1, 0], [0, 0, 0, 1]])
}

fn scene_file() -> Value {
    json!({
        "world_from_foot": {
            "left": identity_with_offset(-0.06, -0.2),
            "right": identity_with_offset(0.06, -0.2),
        },
        "world_from_ground": identity_with_offset(0.0, 0.0),
    })
}

/// Descriptions for one foot; the lateral side faces away from the other foot
fn side_descriptions(side: FootSide, out: &mut serde_json::Map<String, Value>) {
    let lateral = side.sign() * HALF_WIDTH;
    let ball_y = CENTER_Y + 0.5 * HALF_LENGTH;
    let toe_y = CENTER_Y + HALF_LENGTH;
    let heel_y = CENTER_Y - HALF_LENGTH;
    let key = |id: &str| format!("{}_{}", side.as_str(), id);

    out.insert(
        key("length"),
        json!({
            "axis": [0, 1, 0], "from": [0, heel_y, 0], "to": [0, toe_y, 0],
            "markers": {"toe": [0, toe_y, 0.01], "heel": [0, heel_y, 0.02]},
        }),
    );
    out.insert(
        key("width"),
        json!({
            "axis": [1, 0, 0], "from": [-HALF_WIDTH, ball_y, 0], "to": [HALF_WIDTH, ball_y, 0],
            "markers": {"width_lateral": [lateral, ball_y, 0.01], "width_medial": [-lateral, ball_y, 0.01]},
        }),
    );
    out.insert(
        key("heel_width"),
        json!({
            "axis": [1, 0, 0], "from": [-0.8 * HALF_WIDTH, heel_y + 0.03, 0], "to": [0.8 * HALF_WIDTH, heel_y + 0.03, 0],
        }),
    );
    out.insert(
        key("instep_height"),
        json!({
            "axis": [0, 0, 1], "from": [0, CENTER_Y, 0], "to": [0, CENTER_Y, HEIGHT],
            "markers": {"maxz": [0, CENTER_Y, HEIGHT]},
        }),
    );
    out.insert(
        key("forefoot_height"),
        json!({
            "axis": [0, 0, 1], "from": [0, ball_y, 0], "to": [0, ball_y, 0.6 * HEIGHT],
            "markers": {"maxz": [0, ball_y, 0.6 * HEIGHT]},
        }),
    );
    out.insert(
        key("ball_girth"),
        json!({
            "axis": [1, 0, 0], "from": [0, ball_y, 0], "to": [0, ball_y, 0],
            "plane": [0, 1, 0, -ball_y],
            "cross_section_bounds": {
                "tangent": [1, 0, 0], "cotangent": [0, 0, 1],
                "tangent_min": -HALF_WIDTH, "tangent_max": HALF_WIDTH,
                "cotangent_min": 0.0, "cotangent_max": 0.6 * HEIGHT,
            },
        }),
    );
}

fn write_json(dir: &Path, name: &str, value: &impl serde::Serialize) -> Result<()> {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    anyhow::ensure!(args.rings >= 2 && args.segments >= 3, "Need at least 2 rings and 3 segments");

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let document = foot_document(args.rings, args.segments);
    let bytes = BmfWriter::encode(&document)?;
    let lines = contour_lines(args.contours, args.segments);
    let mut descriptions = serde_json::Map::new();
    for side in FootSide::ALL {
        let path = args.out_dir.join(ScanAssets::mesh(side));
        std::fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        write_json(&args.out_dir, &ScanAssets::mesh_lines(side), &lines)?;
        side_descriptions(side, &mut descriptions);
    }
    write_json(&args.out_dir, ScanAssets::SCENE, &scene_file())?;
    write_json(&args.out_dir, "descriptions.json", &Value::Object(descriptions))?;
    write_json(
        &args.out_dir,
        "fit_zones.json",
        &json!({"toe": "great", "ball": "snug", "instep": "roomy", "heel": "tight"}),
    )?;

    log::info!(
        "Wrote {} vertices and {} triangles per foot to {}",
        document.positions.len(),
        document.groups.iter().map(|group| group.faces.len()).sum::<usize>(),
        args.out_dir.display()
    );
    Ok(())
}
