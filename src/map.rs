//! Obstacle geometry, loaded once at startup and read-only afterwards.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// The fixed set of axis-aligned obstacle rectangles, in arena coordinates.
#[derive(Resource, Clone, Debug, Default)]
pub struct ObstacleMap {
    rects: Vec<Rect>,
}

/// On-disk form of one obstacle rectangle (top-left corner plus size).
#[derive(Deserialize)]
struct RectDef {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read obstacle map: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse obstacle map: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ObstacleMap {
    pub fn from_rects(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let defs: Vec<RectDef> = serde_json::from_str(json)?;
        Ok(Self::from_rects(
            defs.iter()
                .map(|d| Rect::new(d.x, d.y, d.x + d.w, d.y + d.h))
                .collect(),
        ))
    }

    /// Loads a JSON array of `{x, y, w, h}` rectangles. Any failure here is a
    /// hard initialization failure; there is no degraded mode.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MapError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Whether a point lies inside any obstacle.
    pub fn contains(&self, point: Vec2) -> bool {
        self.rects.iter().any(|rect| rect.contains(point))
    }

    /// Spawn validation: probes a `probe_size` square with its top-left
    /// corner at `position` against every obstacle.
    pub fn blocks_spawn(&self, position: Vec2, probe_size: f32) -> bool {
        let probe = Rect::from_corners(position, position + Vec2::splat(probe_size));
        self.rects
            .iter()
            .any(|rect| !rect.intersect(probe).is_empty())
    }
}
