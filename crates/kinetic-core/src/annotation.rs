// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Particle Annotations
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Optional fixed-width per-particle scalar payloads.
//!
//! Accessors are bounds-checked but never fatal: an out-of-range read
//! yields NaN and an out-of-range write is dropped. Abortive handling on
//! this per-particle path would be unacceptably expensive, and a stale
//! index here is a diagnostic nuisance rather than a correctness hazard.

use kinetic_types::constants::PARTICLE_ALIGNMENT;
use kinetic_types::error::KineticResult;
use kinetic_util::AlignedVec;

/// `max_np * slots` scalars, row-major by particle slot. Kept in lockstep
/// with the particle array by the owning species: swap-remove compaction
/// and growth are mirrored here.
#[derive(Debug)]
pub struct AnnotationBuffer {
    buf: AlignedVec<f32>,
    slots: i32,
}

impl AnnotationBuffer {
    /// `slots` must be positive; a non-positive count is handled one
    /// level up by disabling the extension instead of allocating.
    pub fn new(max_np: usize, slots: i32) -> KineticResult<Self> {
        debug_assert!(slots > 0);
        Ok(AnnotationBuffer {
            buf: AlignedVec::with_capacity(max_np * slots as usize, PARTICLE_ALIGNMENT)?,
            slots,
        })
    }

    pub fn slots(&self) -> i32 {
        self.slots
    }

    fn offset(&self, np: usize, particle_index: i32, slot_index: i32) -> Option<usize> {
        if particle_index < 0 || particle_index as usize >= np {
            return None;
        }
        if slot_index < 0 || slot_index >= self.slots {
            return None;
        }
        Some(particle_index as usize * self.slots as usize + slot_index as usize)
    }

    /// Read one slot; NaN sentinel for any out-of-range index.
    pub fn get(&self, np: usize, particle_index: i32, slot_index: i32) -> f32 {
        match self.offset(np, particle_index, slot_index) {
            Some(k) => self.buf[k],
            None => f32::NAN,
        }
    }

    /// Write one slot; out-of-range writes are silently discarded.
    pub fn set(&mut self, np: usize, particle_index: i32, slot_index: i32, value: f32) {
        if let Some(k) = self.offset(np, particle_index, slot_index) {
            self.buf[k] = value;
        }
    }

    /// Add to one slot; out-of-range increments are silently discarded.
    pub fn increment(&mut self, np: usize, particle_index: i32, slot_index: i32, delta: f32) {
        if let Some(k) = self.offset(np, particle_index, slot_index) {
            self.buf[k] += delta;
        }
    }

    /// Mirror a swap-remove of the particle array: copy the row of the
    /// former last particle into the removed slot.
    pub(crate) fn swap_remove(&mut self, removed: usize, last: usize) {
        if removed == last {
            return;
        }
        let s = self.slots as usize;
        for k in 0..s {
            self.buf[removed * s + k] = self.buf[last * s + k];
        }
    }

    /// Swap two particle rows (used by the in-place sort).
    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let s = self.slots as usize;
        for k in 0..s {
            self.buf.swap(a * s + k, b * s + k);
        }
    }

    /// Copy row `src` of `from` into row `dst` of self (out-of-place
    /// sort scatter).
    pub(crate) fn scatter_row(&mut self, from: &AnnotationBuffer, src: usize, dst: usize) {
        let s = self.slots as usize;
        for k in 0..s {
            self.buf[dst * s + k] = from.buf[src * s + k];
        }
    }

    /// Clear one particle row (freshly admitted particles start with
    /// zeroed annotations; their payloads arrive through the separate
    /// annotation channel).
    pub(crate) fn clear_row(&mut self, row: usize) {
        let s = self.slots as usize;
        for k in 0..s {
            self.buf[row * s + k] = 0.0;
        }
    }

    pub(crate) fn grow(&mut self, new_max_np: usize) -> KineticResult<()> {
        self.buf.grow(new_max_np * self.slots as usize)
    }
}
