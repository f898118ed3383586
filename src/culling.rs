//! Viewport culling and level-of-detail reduction for render copies.
//!
//! Culling keeps every vector whose anchor or swept body may touch the
//! padded viewport. Level of detail then thins vectors far from the
//! viewport center and flags them as `simplified` so the render layer can
//! skip per-vector effects. Both work on copies; the animated state is
//! never modified.

use crate::precision;
use crate::vector::VectorItem;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Pixel size of a vector at factor 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VectorDims {
    pub base_length: f64,
    pub base_width: f64,
}

impl Default for VectorDims {
    fn default() -> Self {
        Self {
            base_length: 20.0,
            base_width: 1.0,
        }
    }
}

impl VectorDims {
    pub fn length_of(&self, vector: &VectorItem) -> f64 {
        self.base_length * vector.length_factor
    }

    pub fn width_of(&self, vector: &VectorItem) -> f64 {
        self.base_width * vector.width_factor
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CullingOptions {
    pub dims: VectorDims,
    /// Fixed padding in pixels; `None` adapts to the longest vector.
    pub padding: Option<f64>,
    /// Floor of the adaptive padding.
    pub min_padding: f64,
    pub lod: bool,
    /// Distance from the viewport center where thinning starts;
    /// `None` uses a quarter of the viewport diagonal.
    pub lod_threshold: Option<f64>,
    /// Width multiplier at the viewport corners.
    pub lod_min_scale: f64,
    /// Curve of the thinning between threshold and corner (1 = linear).
    pub lod_power: f64,
}

impl Default for CullingOptions {
    fn default() -> Self {
        Self {
            dims: VectorDims::default(),
            padding: None,
            min_padding: 150.0,
            lod: true,
            lod_threshold: None,
            lod_min_scale: 0.4,
            lod_power: 1.0,
        }
    }
}

impl CullingOptions {
    /// Padding used for `vectors`.
    pub fn padding_for(&self, vectors: &[VectorItem]) -> f64 {
        if let Some(p) = self.padding {
            return p.max(0.0);
        }
        vectors
            .iter()
            .map(|v| self.dims.length_of(v))
            .filter(|l| l.is_finite())
            .fold(self.min_padding, f64::max)
    }
}

/// Whether `vector` may be visible in a `width` x `height` viewport grown by
/// `padding` on every side.
///
/// The anchor test accepts most vectors. Otherwise the box from anchor to
/// tip, grown by half the stroke width, is tested; only a box lying fully
/// outside is rejected.
pub fn is_visible(vector: &VectorItem, width: f64, height: f64, padding: f64, dims: &VectorDims) -> bool {
    let lo = DVec2::splat(-padding);
    let hi = DVec2::new(width + padding, height + padding);
    let anchor = vector.position();
    if anchor.cmpge(lo).all() && anchor.cmple(hi).all() {
        return true;
    }

    let tip = anchor + vector.direction() * dims.length_of(vector);
    let reach = dims.width_of(vector) * 0.5;
    let min = anchor.min(tip) - DVec2::splat(reach);
    let max = anchor.max(tip) + DVec2::splat(reach);
    !(max.x < lo.x || min.x > hi.x || max.y < lo.y || min.y > hi.y)
}

/// Copies of the vectors that may be visible.
pub fn filter_visible(vectors: &[VectorItem], width: f64, height: f64, opts: &CullingOptions) -> Vec<VectorItem> {
    let padding = opts.padding_for(vectors);
    vectors
        .iter()
        .filter(|v| is_visible(v, width, height, padding, &opts.dims))
        .cloned()
        .collect()
}

/// Thin vectors far from the viewport center.
pub fn apply_lod(mut vectors: Vec<VectorItem>, width: f64, height: f64, opts: &CullingOptions) -> Vec<VectorItem> {
    if !opts.lod {
        return vectors;
    }
    let center = DVec2::new(width, height) * 0.5;
    let corner = center.length();
    let threshold = opts.lod_threshold.unwrap_or(corner * 0.5).max(0.0);
    let span = (corner - threshold).max(1.0);
    let min_scale = opts.lod_min_scale.clamp(0.0, 1.0);
    let power = if opts.lod_power > 0.0 { opts.lod_power } else { 1.0 };

    for v in &mut vectors {
        let distance = v.position().distance(center);
        if distance <= threshold {
            continue;
        }
        let t = ((distance - threshold) / span).clamp(0.0, 1.0);
        let scale = 1.0 - (1.0 - min_scale) * t.powf(power);
        v.width_factor = precision::factor(v.width_factor * scale);
        v.simplified = true;
    }
    vectors
}

/// Cull, then thin what is left.
pub fn apply_culling(vectors: &[VectorItem], width: f64, height: f64, opts: &CullingOptions) -> Vec<VectorItem> {
    apply_lod(filter_visible(vectors, width, height, opts), width, height, opts)
}
