//! GPU-ready per-vector instance data.
//!
//! A render layer draws each visible vector as one instanced quad. This
//! module packs culled vectors into a tightly laid out `#[repr(C)]` record
//! that can be uploaded as-is with `bytemuck::cast_slice`.

use crate::culling::VectorDims;
use crate::settings::FieldType;
use crate::vector::VectorItem;
use bytemuck::{Pod, Zeroable};

/// Set on instances thinned by level of detail.
pub const FLAG_SIMPLIFIED: u32 = 1;
/// Set when the instance carries a field intensity.
pub const FLAG_HAS_INTENSITY: u32 = 1 << 1;

/// One vector as the vertex shader sees it. 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VectorInstance {
    /// Anchor in canvas pixels.
    pub anchor: [f32; 2],
    /// Radians, y down.
    pub angle: f32,
    /// Pixels.
    pub length: f32,
    /// Pixels.
    pub width: f32,
    pub intensity: f32,
    /// Active field index, see `u32::from(FieldType)`.
    pub field: u32,
    pub flags: u32,
}

impl VectorInstance {
    pub fn from_vector(vector: &VectorItem, dims: &VectorDims, field: FieldType) -> Self {
        let mut flags = 0;
        if vector.simplified {
            flags |= FLAG_SIMPLIFIED;
        }
        if vector.intensity_factor.is_some() {
            flags |= FLAG_HAS_INTENSITY;
        }
        Self {
            anchor: [vector.base_x as f32, vector.base_y as f32],
            angle: vector.current_angle.to_radians() as f32,
            length: dims.length_of(vector) as f32,
            width: dims.width_of(vector) as f32,
            intensity: vector.intensity_factor.unwrap_or(0.0) as f32,
            field: u32::from(field),
            flags,
        }
    }
}

/// Pack a frame's visible vectors for upload.
pub fn pack(vectors: &[VectorItem], dims: &VectorDims, field: FieldType) -> Vec<VectorInstance> {
    vectors
        .iter()
        .map(|v| VectorInstance::from_vector(v, dims, field))
        .collect()
}

/// Raw bytes of packed instances.
pub fn as_bytes(instances: &[VectorInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::vector_at;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<VectorInstance>(), 32);
    }

    #[test]
    fn test_pack_flags_and_sizes() {
        let mut v = vector_at(0, 10.0, 20.0, 180.0);
        v.length_factor = 1.5;
        v.width_factor = 2.0;
        v.simplified = true;
        v.intensity_factor = Some(0.25);
        let instances = pack(&[v], &VectorDims::default(), FieldType::Vortex);
        let i = instances[0];
        assert_eq!(i.anchor, [10.0, 20.0]);
        assert_eq!(i.length, 30.0);
        assert_eq!(i.width, 2.0);
        assert_eq!(i.intensity, 0.25);
        assert_eq!(i.flags, FLAG_SIMPLIFIED | FLAG_HAS_INTENSITY);
        assert_eq!(i.field, u32::from(FieldType::Vortex));
        assert!((i.angle - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let instances = pack(&[vector_at(0, 1.0, 2.0, 0.0)], &VectorDims::default(), FieldType::None);
        let bytes = as_bytes(&instances);
        assert_eq!(bytes.len(), 32);
        let back: &[VectorInstance] = bytemuck::cast_slice(bytes);
        assert_eq!(back, &instances[..]);
    }
}
