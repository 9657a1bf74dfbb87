// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Particle Data Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The per-particle record and its lifecycle locator.
//!
//! In memory the containing-voxel field is an explicit tagged value
//! ([`Locator`]) so the resident/pending lifecycle state is carried by the
//! type instead of by convention. On the wire ([`ParticleRecord`]) the
//! locator collapses to the packed 32-bit encoding `8*voxel + face` that
//! the cross-domain injector layout fixes.

use bytemuck::{Pod, Zeroable};
use kinetic_types::constants::{MAX_VOXELS, VOXEL_FACES};

/// Lifecycle-tagged containing-voxel locator.
///
/// A particle is `Resident` for the remainder of a sub-step once it is
/// fully inside the local domain; it is `Pending` between the advance
/// kernel detecting a face crossing and the boundary pass resolving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum Locator {
    Resident { voxel: i32 },
    Pending { voxel: i32, face: u8 },
}

// SAFETY: repr(C) enum; the all-zero pattern is tag 0 with voxel 0, a
// valid `Resident` value.
unsafe impl Zeroable for Locator {}

impl Locator {
    /// Pack into the 32-bit wire encoding: a resident particle carries
    /// its pure voxel index, a pending one carries `8*voxel + face`. The
    /// packing limits the local voxel space to 2^28 entries.
    pub fn encode(self) -> i32 {
        match self {
            Locator::Resident { voxel } => {
                debug_assert!((0..MAX_VOXELS).contains(&voxel));
                voxel
            }
            Locator::Pending { voxel, face } => {
                debug_assert!((0..MAX_VOXELS).contains(&voxel));
                debug_assert!(face < VOXEL_FACES);
                8 * voxel + i32::from(face)
            }
        }
    }

    /// Interpret a raw wire value as a resident locator.
    pub fn decode_resident(raw: i32) -> Self {
        Locator::Resident { voxel: raw }
    }

    /// Interpret a raw wire value as a pending locator, recovering the
    /// `(voxel, face)` pair.
    pub fn decode_pending(raw: i32) -> Self {
        Locator::Pending {
            voxel: raw >> 3,
            face: (raw & 7) as u8,
        }
    }

    /// The voxel index regardless of lifecycle state.
    pub fn voxel(self) -> i32 {
        match self {
            Locator::Resident { voxel } | Locator::Pending { voxel, .. } => voxel,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Locator::Pending { .. })
    }
}

/// In-memory particle state.
///
/// Position is in local-cell normalized coordinates, each component on
/// [-1, 1] while the particle is resident. Momentum is normalized; the
/// weight is the number of physical particles this macro-particle
/// represents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Particle {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub locator: Locator,
    pub ux: f32,
    pub uy: f32,
    pub uz: f32,
    pub w: f32,
}

// SAFETY: repr(C) struct of Zeroable fields.
unsafe impl Zeroable for Particle {}

impl Particle {
    /// A resident particle at the given voxel.
    pub fn resident(voxel: i32, pos: [f32; 3], mom: [f32; 3], w: f32) -> Self {
        Particle {
            dx: pos[0],
            dy: pos[1],
            dz: pos[2],
            locator: Locator::Resident { voxel },
            ux: mom[0],
            uy: mom[1],
            uz: mom[2],
            w,
        }
    }

    /// Collapse to the fixed wire layout.
    pub fn to_record(&self) -> ParticleRecord {
        ParticleRecord {
            dx: self.dx,
            dy: self.dy,
            dz: self.dz,
            i: self.locator.encode(),
            ux: self.ux,
            uy: self.uy,
            uz: self.uz,
            w: self.w,
        }
    }

    /// Rebuild the tagged form from the wire layout. The wire encoding
    /// cannot distinguish the two lifecycle states on its own; the caller
    /// supplies the state from protocol context.
    pub fn from_record(rec: &ParticleRecord, pending: bool) -> Self {
        let locator = if pending {
            Locator::decode_pending(rec.i)
        } else {
            Locator::decode_resident(rec.i)
        };
        Particle {
            dx: rec.dx,
            dy: rec.dy,
            dz: rec.dz,
            locator,
            ux: rec.ux,
            uy: rec.uy,
            uz: rec.uz,
            w: rec.w,
        }
    }
}

/// Fixed 32-byte wire layout of one particle.
///
/// Field order and width are part of the cross-rank injector contract and
/// must not change: position ×3, packed voxel index, momentum ×3, weight.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ParticleRecord {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub i: i32,
    pub ux: f32,
    pub uy: f32,
    pub uz: f32,
    pub w: f32,
}

pub const PARTICLE_RECORD_BYTES: usize = 32;

const _: () = assert!(std::mem::size_of::<ParticleRecord>() == PARTICLE_RECORD_BYTES);
const _: () = assert!(std::mem::align_of::<ParticleRecord>() == 4);
const _: () = assert!(std::mem::offset_of!(ParticleRecord, i) == 12);
const _: () = assert!(std::mem::offset_of!(ParticleRecord, w) == 28);
