// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Particle Injector
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Transport-ready boundary-crossing handoff records.
//!
//! The first 48 bytes of an [`InjectorRecord`] are, byte for byte, one
//! [`ParticleRecord`] followed by one [`Mover`]. That concatenation
//! contract is what allows bulk byte-copy construction from a matched
//! particle+mover pair and is the fixed cross-rank wire layout. Particle
//! annotations never travel in an injector; they move through a separate
//! channel.

use bytemuck::{bytes_of, bytes_of_mut, Pod, Zeroable};
use kinetic_types::error::{KineticError, KineticResult};

use crate::mover::{Mover, MOVER_BYTES};
use crate::particle::{ParticleRecord, PARTICLE_RECORD_BYTES};

/// Fixed 52-byte injector wire layout: position ×3, voxel index,
/// momentum ×3, weight, displacement ×3, species id.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InjectorRecord {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub i: i32,
    pub ux: f32,
    pub uy: f32,
    pub uz: f32,
    pub w: f32,
    pub dispx: f32,
    pub dispy: f32,
    pub dispz: f32,
    pub mover_i: i32,
    pub sp_id: i32,
}

pub const INJECTOR_BYTES: usize = 52;
pub const INJECTOR_BYTES_WITH_ID: usize = INJECTOR_BYTES + 8;

// The layout invariant: particle record at offset 0, mover at offset 32,
// species id at offset 48.
const _: () = assert!(std::mem::size_of::<InjectorRecord>() == INJECTOR_BYTES);
const _: () = assert!(std::mem::offset_of!(InjectorRecord, dx) == 0);
const _: () = assert!(std::mem::offset_of!(InjectorRecord, dispx) == PARTICLE_RECORD_BYTES);
const _: () =
    assert!(std::mem::offset_of!(InjectorRecord, sp_id) == PARTICLE_RECORD_BYTES + MOVER_BYTES);

impl InjectorRecord {
    /// Bulk byte-copy construction from a matched particle+mover pair.
    pub fn from_parts(particle: &ParticleRecord, mover: &Mover, sp_id: i32) -> Self {
        let mut rec = InjectorRecord::zeroed();
        let bytes = bytes_of_mut(&mut rec);
        bytes[..PARTICLE_RECORD_BYTES].copy_from_slice(bytes_of(particle));
        bytes[PARTICLE_RECORD_BYTES..PARTICLE_RECORD_BYTES + MOVER_BYTES]
            .copy_from_slice(bytes_of(mover));
        rec.sp_id = sp_id;
        rec
    }

    /// The embedded particle record (bytes 0..32).
    pub fn particle_record(&self) -> ParticleRecord {
        let mut out = ParticleRecord::zeroed();
        bytes_of_mut(&mut out).copy_from_slice(&bytes_of(self)[..PARTICLE_RECORD_BYTES]);
        out
    }

    /// The embedded mover record (bytes 32..48).
    pub fn mover(&self) -> Mover {
        let mut out = Mover::zeroed();
        bytes_of_mut(&mut out)
            .copy_from_slice(&bytes_of(self)[PARTICLE_RECORD_BYTES..PARTICLE_RECORD_BYTES + MOVER_BYTES]);
        out
    }
}

/// One boundary-crossing handoff: the fixed wire record plus the global
/// particle identifier when the species tracks ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Injector {
    pub record: InjectorRecord,
    pub global_id: Option<u64>,
}

impl Injector {
    /// Serialize to the wire form. The 8-byte little-endian identifier is
    /// appended only when `with_id` is set; both sides of a transport link
    /// must agree on the flag.
    pub fn to_bytes(&self, with_id: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(if with_id {
            INJECTOR_BYTES_WITH_ID
        } else {
            INJECTOR_BYTES
        });
        out.extend_from_slice(bytes_of(&self.record));
        if with_id {
            out.extend_from_slice(&self.global_id.unwrap_or(0).to_le_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8], with_id: bool) -> KineticResult<Self> {
        let expected = if with_id {
            INJECTOR_BYTES_WITH_ID
        } else {
            INJECTOR_BYTES
        };
        if bytes.len() != expected {
            return Err(KineticError::WireError(format!(
                "Injector frame length mismatch: expected {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let mut record = InjectorRecord::zeroed();
        bytes_of_mut(&mut record).copy_from_slice(&bytes[..INJECTOR_BYTES]);
        let global_id = if with_id {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[INJECTOR_BYTES..]);
            Some(u64::from_le_bytes(raw))
        } else {
            None
        };
        Ok(Injector { record, global_id })
    }
}

/// An injector tagged with the rank of the domain that owns its
/// destination voxel; the unit handed to the transport collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedInjector {
    pub dest_rank: usize,
    pub injector: Injector,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Locator, Particle};

    fn sample_pair() -> (ParticleRecord, Mover) {
        let p = Particle {
            dx: 0.5,
            dy: -0.25,
            dz: 0.125,
            locator: Locator::Pending { voxel: 777, face: 3 },
            ux: 1.25,
            uy: -2.5,
            uz: 0.5,
            w: 3.5e8,
        };
        let m = Mover {
            dispx: 0.01,
            dispy: -0.02,
            dispz: 0.03,
            i: 42,
        };
        (p.to_record(), m)
    }

    #[test]
    fn test_byte_copy_construction_matches_field_access() {
        let (p, m) = sample_pair();
        let rec = InjectorRecord::from_parts(&p, &m, 9);

        assert_eq!(rec.dx, p.dx);
        assert_eq!(rec.dy, p.dy);
        assert_eq!(rec.dz, p.dz);
        assert_eq!(rec.i, p.i);
        assert_eq!(rec.ux, p.ux);
        assert_eq!(rec.uy, p.uy);
        assert_eq!(rec.uz, p.uz);
        assert_eq!(rec.w, p.w);
        assert_eq!(rec.dispx, m.dispx);
        assert_eq!(rec.dispy, m.dispy);
        assert_eq!(rec.dispz, m.dispz);
        assert_eq!(rec.sp_id, 9);
    }

    #[test]
    fn test_embedded_records_extract_exactly() {
        let (p, m) = sample_pair();
        let rec = InjectorRecord::from_parts(&p, &m, 1);
        assert_eq!(rec.particle_record(), p);
        assert_eq!(rec.mover(), m);
    }

    #[test]
    fn test_wire_roundtrip_with_and_without_id() {
        let (p, m) = sample_pair();
        let inj = Injector {
            record: InjectorRecord::from_parts(&p, &m, 2),
            global_id: Some(20_000_057),
        };

        let framed = inj.to_bytes(true);
        assert_eq!(framed.len(), INJECTOR_BYTES_WITH_ID);
        assert_eq!(Injector::from_bytes(&framed, true).unwrap(), inj);

        let bare = Injector {
            global_id: None,
            ..inj
        };
        let framed = bare.to_bytes(false);
        assert_eq!(framed.len(), INJECTOR_BYTES);
        assert_eq!(Injector::from_bytes(&framed, false).unwrap(), bare);
    }

    #[test]
    fn test_frame_length_mismatch_errors() {
        let err = Injector::from_bytes(&[0u8; 51], false).unwrap_err();
        match err {
            KineticError::WireError(msg) => assert!(msg.contains("length mismatch")),
            other => panic!("Unexpected error: {other:?}"),
        }
        assert!(Injector::from_bytes(&[0u8; 52], true).is_err());
    }
}
