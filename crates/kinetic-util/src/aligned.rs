// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Aligned Storage
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-length heap arrays with caller-chosen alignment.
//!
//! The particle, mover, identifier and annotation arrays all live in
//! 128-byte aligned storage so vectorized kernels can assume aligned
//! loads. Allocation failure is a terminal condition for the simulation;
//! it surfaces as [`KineticError::AllocationFailed`] and is never
//! recovered locally.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use bytemuck::Zeroable;
use kinetic_types::error::{KineticError, KineticResult};

/// A zero-initialized, fixed-length array with explicit alignment.
///
/// Unlike `Vec`, the length is fixed at construction and only changes
/// through [`AlignedVec::grow`], which reallocates while preserving
/// contents. Element types must be plain old data (`Zeroable + Copy`).
#[derive(Debug)]
pub struct AlignedVec<T> {
    ptr: NonNull<T>,
    len: usize,
    align: usize,
    _marker: PhantomData<T>,
}

impl<T: Zeroable + Copy> AlignedVec<T> {
    /// Allocate `len` zero-filled elements with the given alignment.
    ///
    /// `align` must be a power of two; it is raised to at least the
    /// natural alignment of `T`. A zero-length vector allocates nothing.
    pub fn with_capacity(len: usize, align: usize) -> KineticResult<Self> {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        assert!(mem::size_of::<T>() > 0, "zero-sized element types are not storable");
        let align = align.max(mem::align_of::<T>());
        if len == 0 {
            return Ok(AlignedVec {
                ptr: NonNull::dangling(),
                len: 0,
                align,
                _marker: PhantomData,
            });
        }
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .ok_or(KineticError::AllocationFailed { bytes: usize::MAX, align })?;
        let layout = Layout::from_size_align(bytes, align)
            .map_err(|_| KineticError::AllocationFailed { bytes, align })?;
        // SAFETY: layout has non-zero size here.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            log::error!("Aligned allocation of {bytes} bytes (alignment {align}) failed");
            return Err(KineticError::AllocationFailed { bytes, align });
        };
        Ok(AlignedVec {
            ptr,
            len,
            align,
            _marker: PhantomData,
        })
    }

    /// Reallocate to `new_len` elements, preserving existing contents.
    /// New elements are zero-filled. Shrinking is rejected: live data
    /// would be lost silently.
    pub fn grow(&mut self, new_len: usize) -> KineticResult<()> {
        if new_len < self.len {
            return Err(KineticError::InvalidWorkload(format!(
                "AlignedVec::grow cannot shrink from {} to {new_len}",
                self.len
            )));
        }
        if new_len == self.len {
            return Ok(());
        }
        let mut next = AlignedVec::with_capacity(new_len, self.align)?;
        next[..self.len].copy_from_slice(self);
        mem::swap(self, &mut next);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment of the backing allocation in bytes.
    pub fn alignment(&self) -> usize {
        self.align
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Zeroable + Copy> Deref for AlignedVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: ptr is valid for len elements (or dangling with len 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable + Copy> DerefMut for AlignedVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: ptr is valid for len elements (or dangling with len 0).
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for AlignedVec<T> {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        let bytes = self.len * mem::size_of::<T>();
        // Layout was validated at allocation time.
        let layout = Layout::from_size_align(bytes, self.align)
            .expect("allocation layout was validated at construction");
        // SAFETY: ptr was allocated with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
    }
}

// SAFETY: AlignedVec owns its allocation; T is plain old data.
unsafe impl<T: Send> Send for AlignedVec<T> {}
unsafe impl<T: Sync> Sync for AlignedVec<T> {}
