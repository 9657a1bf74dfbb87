// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Kinetic Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

/// Faces of a hexahedral voxel, indexed 0..6.
pub const VOXEL_FACES: u8 = 6;

/// The pending-crossing locator packs the face index into the low three
/// bits of the voxel field, so a local domain may address at most 2^28
/// voxels.
pub const MAX_VOXELS: i32 = 1 << 28;

/// Emitter-created particles carry extra tag bits and tolerate a tighter
/// voxel bound of 2^26.
pub const MAX_EMITTER_VOXELS: i32 = 1 << 26;

/// Alignment (bytes) of the particle, mover, identifier and annotation
/// arrays. Matches the layout the vectorized kernels assume.
pub const PARTICLE_ALIGNMENT: usize = 128;

/// Default number of steps between spatial sorts of a species.
pub const DEFAULT_SORT_INTERVAL: i64 = 25;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_bounds_are_consistent() {
        assert!(MAX_EMITTER_VOXELS < MAX_VOXELS);
        assert_eq!(MAX_VOXELS, 268_435_456);
    }

    #[test]
    fn test_particle_alignment_is_power_of_two() {
        assert!(PARTICLE_ALIGNMENT.is_power_of_two());
    }
}
