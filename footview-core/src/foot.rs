//! Foot sides, fit zones and fit classifications

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which foot of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FootSide {
    Left,
    Right,
}

impl FootSide {
    /// Both sides, left first
    pub const ALL: [FootSide; 2] = [FootSide::Left, FootSide::Right];

    /// Lowercase name used in keys and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            FootSide::Left => "left",
            FootSide::Right => "right",
        }
    }

    /// `-1` for the left foot, `+1` for the right
    pub fn sign(&self) -> f32 {
        match self {
            FootSide::Left => -1.0,
            FootSide::Right => 1.0,
        }
    }

    pub fn opposite(&self) -> FootSide {
        match self {
            FootSide::Left => FootSide::Right,
            FootSide::Right => FootSide::Left,
        }
    }
}

impl fmt::Display for FootSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value for each foot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FootPair<T> {
    pub left: T,
    pub right: T,
}

impl<T> FootPair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Build both entries from a per-side constructor
    pub fn from_fn(mut f: impl FnMut(FootSide) -> T) -> Self {
        Self {
            left: f(FootSide::Left),
            right: f(FootSide::Right),
        }
    }

    pub fn get(&self, side: FootSide) -> &T {
        match side {
            FootSide::Left => &self.left,
            FootSide::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: FootSide) -> &mut T {
        match side {
            FootSide::Left => &mut self.left,
            FootSide::Right => &mut self.right,
        }
    }

    /// Iterate as `(side, value)`, left first
    pub fn iter(&self) -> impl Iterator<Item = (FootSide, &T)> {
        [(FootSide::Left, &self.left), (FootSide::Right, &self.right)].into_iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(FootSide, &T) -> U) -> FootPair<U> {
        FootPair {
            left: f(FootSide::Left, &self.left),
            right: f(FootSide::Right, &self.right),
        }
    }
}

/// One of the four regions of a foot used for fit feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitZone {
    Toe,
    Ball,
    Instep,
    Heel,
}

impl FitZone {
    pub const ALL: [FitZone; 4] = [FitZone::Toe, FitZone::Ball, FitZone::Instep, FitZone::Heel];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitZone::Toe => "toe",
            FitZone::Ball => "ball",
            FitZone::Instep => "instep",
            FitZone::Heel => "heel",
        }
    }

    /// Parse a zone name
    pub fn from_name(name: &str) -> Option<FitZone> {
        FitZone::ALL.into_iter().find(|zone| zone.as_str() == name)
    }
}

impl fmt::Display for FitZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value for each fit zone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneMap<T> {
    pub toe: T,
    pub ball: T,
    pub instep: T,
    pub heel: T,
}

impl<T> ZoneMap<T> {
    pub fn from_fn(mut f: impl FnMut(FitZone) -> T) -> Self {
        Self {
            toe: f(FitZone::Toe),
            ball: f(FitZone::Ball),
            instep: f(FitZone::Instep),
            heel: f(FitZone::Heel),
        }
    }

    pub fn get(&self, zone: FitZone) -> &T {
        match zone {
            FitZone::Toe => &self.toe,
            FitZone::Ball => &self.ball,
            FitZone::Instep => &self.instep,
            FitZone::Heel => &self.heel,
        }
    }

    pub fn get_mut(&mut self, zone: FitZone) -> &mut T {
        match zone {
            FitZone::Toe => &mut self.toe,
            FitZone::Ball => &mut self.ball,
            FitZone::Instep => &mut self.instep,
            FitZone::Heel => &mut self.heel,
        }
    }

    /// Iterate as `(zone, value)` in toe, ball, instep, heel order
    pub fn iter(&self) -> impl Iterator<Item = (FitZone, &T)> {
        FitZone::ALL.into_iter().map(move |zone| (zone, self.get(zone)))
    }
}

/// How a shoe fits a foot in one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitClassification {
    Tight,
    Snug,
    Great,
    Roomy,
    Loose,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FitClassification {
    /// Marker color as linear rgb
    pub fn color(&self) -> Vector3f {
        rgb_from_hex(match self {
            FitClassification::Tight | FitClassification::Loose => 0xd7263d,
            FitClassification::Snug | FitClassification::Roomy => 0xf49d37,
            FitClassification::Great => 0x3f9b5a,
            FitClassification::Unknown => 0x9e9e9e,
        })
    }

    /// Strength of the zone tint painted on the foot
    pub fn paint_alpha(&self) -> f32 {
        match self {
            FitClassification::Snug | FitClassification::Roomy => 0.35,
            _ => 1.0,
        }
    }

    /// Zone tint: white blended towards `color()` by `paint_alpha()`
    pub fn paint_color(&self) -> Vector3f {
        let white = Vector3f::new(1.0, 1.0, 1.0);
        white.lerp(&self.color(), self.paint_alpha())
    }
}

/// Classification per zone, as supplied by the fit service
pub type FitZoneClassifications = ZoneMap<FitClassification>;
