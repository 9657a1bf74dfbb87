// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Particle Mover Queue
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pending boundary-crossing records.
//!
//! A mover pairs a remaining sub-step displacement with the index of the
//! particle it moves. It is meaningful only against the particle-array
//! snapshot it was created from: any compaction of that array invalidates
//! the index, so the boundary pass sequences its removals accordingly.

use bytemuck::{Pod, Zeroable};
use kinetic_types::constants::PARTICLE_ALIGNMENT;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_util::AlignedVec;

/// Fixed 16-byte crossing record: remaining displacement plus the index
/// of the particle being moved. The layout is the second half of the
/// injector wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mover {
    pub dispx: f32,
    pub dispy: f32,
    pub dispz: f32,
    pub i: i32,
}

pub const MOVER_BYTES: usize = 16;

const _: () = assert!(std::mem::size_of::<Mover>() == MOVER_BYTES);
const _: () = assert!(std::mem::offset_of!(Mover, i) == 12);

/// Per-species queue of movers, paired 1:1 by index with particles still
/// being advanced in the current sub-step.
#[derive(Debug)]
pub struct MoverQueue {
    buf: AlignedVec<Mover>,
    nm: usize,
}

impl MoverQueue {
    pub fn new(max_nm: usize) -> KineticResult<Self> {
        Ok(MoverQueue {
            buf: AlignedVec::with_capacity(max_nm, PARTICLE_ALIGNMENT)?,
            nm: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.nm
    }

    pub fn is_empty(&self) -> bool {
        self.nm == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Append a crossing record. A full queue is a fatal condition: it
    /// means the configured capacity undersizes this timestep's
    /// cross-boundary traffic.
    pub fn push(&mut self, m: Mover) -> KineticResult<()> {
        if self.nm == self.buf.len() {
            return Err(KineticError::MoverQueueFull {
                nm: self.nm,
                max_nm: self.buf.len(),
            });
        }
        self.buf[self.nm] = m;
        self.nm += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[Mover] {
        &self.buf[..self.nm]
    }

    pub fn get(&self, k: usize) -> &Mover {
        &self.as_slice()[k]
    }

    /// Discard all pending records. Called once the boundary pass has
    /// consumed the queue.
    pub fn clear(&mut self) {
        self.nm = 0;
    }

    /// Enlarge capacity. Only legal at a serial phase boundary; pending
    /// records are preserved.
    pub fn grow(&mut self, new_max: usize) -> KineticResult<()> {
        self.buf.grow(new_max)
    }
}
