// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Particle Store
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The per-species particle array: aligned storage, a live count `np`
//! and a capacity `max_np`.

use kinetic_types::constants::PARTICLE_ALIGNMENT;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_util::AlignedVec;

use crate::particle::Particle;

#[derive(Debug)]
pub struct ParticleStore {
    buf: AlignedVec<Particle>,
    np: usize,
}

impl ParticleStore {
    pub fn new(max_np: usize) -> KineticResult<Self> {
        Ok(ParticleStore {
            buf: AlignedVec::with_capacity(max_np, PARTICLE_ALIGNMENT)?,
            np: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.np
    }

    pub fn is_empty(&self) -> bool {
        self.np == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Append a particle, returning its slot. A full store is fatal: the
    /// configured capacity undersizes the local population.
    pub fn push(&mut self, p: Particle) -> KineticResult<usize> {
        if self.np == self.buf.len() {
            return Err(KineticError::CapacityExceeded {
                np: self.np,
                max_np: self.buf.len(),
            });
        }
        let slot = self.np;
        self.buf[slot] = p;
        self.np += 1;
        Ok(slot)
    }

    /// Remove by index, backfilling with the last live particle.
    ///
    /// O(1), but any index-based cross reference (movers, partition
    /// table) to the former last slot now points at `index` instead; the
    /// caller owns sequencing removals so stale indices are never
    /// dereferenced.
    pub fn swap_remove(&mut self, index: usize) -> Particle {
        assert!(index < self.np, "swap_remove index {index} out of range 0..{}", self.np);
        let removed = self.buf[index];
        self.np -= 1;
        self.buf[index] = self.buf[self.np];
        removed
    }

    pub fn get(&self, index: usize) -> &Particle {
        &self.as_slice()[index]
    }

    /// Overwrite a live slot.
    pub fn set(&mut self, index: usize, p: Particle) {
        *self.get_mut(index) = p;
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Particle {
        let np = self.np;
        &mut self.buf[..np][index]
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.buf[..self.np]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        let np = self.np;
        &mut self.buf[..np]
    }

    /// Enlarge capacity with an aligned reallocation, preserving live
    /// particles. Only legal at a serial phase boundary.
    pub fn grow(&mut self, new_max: usize) -> KineticResult<()> {
        self.buf.grow(new_max)
    }

    /// Adopt a freshly scattered buffer of the same population (used by
    /// the out-of-place sort). The replacement must hold at least the
    /// current live count.
    pub(crate) fn replace_buf(&mut self, buf: AlignedVec<Particle>) {
        assert!(buf.len() >= self.np, "replacement buffer smaller than live population");
        self.buf = buf;
    }
}
