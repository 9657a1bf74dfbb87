// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Grid Topology
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Read-only voxel connectivity consulted by the boundary pass.
//!
//! The particle subsystem never stores grid geometry; it asks a
//! [`GridTopology`] where a face crossing leads. [`CartesianGrid`] is the
//! concrete local topology: a ghost-padded brick of
//! `(nx+2)(ny+2)(nz+2)` voxels whose interior runs over `1..=n` on each
//! axis.

use kinetic_types::constants::{MAX_VOXELS, VOXEL_FACES};
use kinetic_types::error::{KineticError, KineticResult};

/// Where a face crossing leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceNeighbor {
    /// Another voxel of this domain.
    Interior(i32),
    /// A voxel owned by another rank; `voxel` is the index in the
    /// *receiver's* local numbering (the mirrored entry voxel).
    Remote { rank: usize, voxel: i32 },
    /// The particle leaves the simulation.
    Absorbing,
}

/// Behavior of one exterior face of the local brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceBoundary {
    Absorb,
    /// Hand particles to the given rank, which holds a brick of the same
    /// dimensions; the entry voxel mirrors across the shared face.
    Remote(usize),
    /// Wrap to the opposite interior voxel of this domain.
    Periodic,
}

/// Voxel connectivity, read-only and shared across species.
pub trait GridTopology {
    /// Total voxel count including the ghost shell.
    fn voxel_count(&self) -> usize;

    /// Resolve a crossing of `face` (0..6: -x, -y, -z, +x, +y, +z) out of
    /// `voxel`.
    fn neighbor(&self, voxel: i32, face: u8) -> FaceNeighbor;
}

/// Ghost-padded Cartesian brick.
#[derive(Debug, Clone)]
pub struct CartesianGrid {
    nx: i32,
    ny: i32,
    nz: i32,
    faces: [FaceBoundary; VOXEL_FACES as usize],
}

impl CartesianGrid {
    /// `nx`, `ny`, `nz` are interior cell counts; the ghost shell adds two
    /// per axis. All faces default to absorbing.
    pub fn new(nx: i32, ny: i32, nz: i32) -> KineticResult<Self> {
        if nx < 1 || ny < 1 || nz < 1 {
            return Err(KineticError::TopologyViolation(format!(
                "Grid dimensions must be >= 1, got {nx}x{ny}x{nz}"
            )));
        }
        let padded = (nx as i64 + 2) * (ny as i64 + 2) * (nz as i64 + 2);
        if padded > MAX_VOXELS as i64 {
            return Err(KineticError::TopologyViolation(format!(
                "Padded grid of {padded} voxels exceeds the addressable bound {MAX_VOXELS}"
            )));
        }
        Ok(CartesianGrid {
            nx,
            ny,
            nz,
            faces: [FaceBoundary::Absorb; VOXEL_FACES as usize],
        })
    }

    pub fn with_face(mut self, face: u8, boundary: FaceBoundary) -> Self {
        self.faces[face as usize] = boundary;
        self
    }

    pub fn face_boundary(&self, face: u8) -> FaceBoundary {
        self.faces[face as usize]
    }

    /// Padded linear index of the cell at `(x, y, z)`; interior cells run
    /// over `1..=n` on each axis, 0 and `n+1` are the ghost shell.
    pub fn voxel(&self, x: i32, y: i32, z: i32) -> i32 {
        debug_assert!((0..self.nx + 2).contains(&x));
        debug_assert!((0..self.ny + 2).contains(&y));
        debug_assert!((0..self.nz + 2).contains(&z));
        x + (self.nx + 2) * (y + (self.ny + 2) * z)
    }

    /// Inverse of [`voxel`](Self::voxel).
    pub fn coords(&self, voxel: i32) -> (i32, i32, i32) {
        let sx = self.nx + 2;
        let sy = self.ny + 2;
        let x = voxel % sx;
        let y = (voxel / sx) % sy;
        let z = voxel / (sx * sy);
        (x, y, z)
    }

    pub fn is_interior(&self, voxel: i32) -> bool {
        let (x, y, z) = self.coords(voxel);
        (1..=self.nx).contains(&x) && (1..=self.ny).contains(&y) && (1..=self.nz).contains(&z)
    }

    fn axis_extent(&self, axis: usize) -> i32 {
        match axis {
            0 => self.nx,
            1 => self.ny,
            _ => self.nz,
        }
    }
}

impl GridTopology for CartesianGrid {
    fn voxel_count(&self) -> usize {
        ((self.nx + 2) * (self.ny + 2) * (self.nz + 2)) as usize
    }

    fn neighbor(&self, voxel: i32, face: u8) -> FaceNeighbor {
        debug_assert!(face < VOXEL_FACES);
        debug_assert!(self.is_interior(voxel));
        let axis = (face % 3) as usize;
        let step: i32 = if face < 3 { -1 } else { 1 };
        let mut c = {
            let (x, y, z) = self.coords(voxel);
            [x, y, z]
        };
        c[axis] += step;

        let n = self.axis_extent(axis);
        if (1..=n).contains(&c[axis]) {
            return FaceNeighbor::Interior(self.voxel(c[0], c[1], c[2]));
        }
        match self.faces[face as usize] {
            FaceBoundary::Absorb => FaceNeighbor::Absorbing,
            FaceBoundary::Periodic => {
                c[axis] = if step > 0 { 1 } else { n };
                FaceNeighbor::Interior(self.voxel(c[0], c[1], c[2]))
            }
            FaceBoundary::Remote(rank) => {
                // Entry voxel in the receiver's numbering: the first
                // interior cell on its facing side, same transverse
                // coordinates.
                c[axis] = if step > 0 { 1 } else { n };
                FaceNeighbor::Remote {
                    rank,
                    voxel: self.voxel(c[0], c[1], c[2]),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_coords_roundtrip() {
        let g = CartesianGrid::new(4, 3, 2).unwrap();
        for z in 0..4 {
            for y in 0..5 {
                for x in 0..6 {
                    let v = g.voxel(x, y, z);
                    assert_eq!(g.coords(v), (x, y, z));
                }
            }
        }
        assert_eq!(g.voxel_count(), 6 * 5 * 4);
    }

    #[test]
    fn test_interior_neighbors() {
        let g = CartesianGrid::new(3, 3, 3).unwrap();
        let v = g.voxel(2, 2, 2);
        assert_eq!(g.neighbor(v, 0), FaceNeighbor::Interior(g.voxel(1, 2, 2)));
        assert_eq!(g.neighbor(v, 1), FaceNeighbor::Interior(g.voxel(2, 1, 2)));
        assert_eq!(g.neighbor(v, 2), FaceNeighbor::Interior(g.voxel(2, 2, 1)));
        assert_eq!(g.neighbor(v, 3), FaceNeighbor::Interior(g.voxel(3, 2, 2)));
        assert_eq!(g.neighbor(v, 4), FaceNeighbor::Interior(g.voxel(2, 3, 2)));
        assert_eq!(g.neighbor(v, 5), FaceNeighbor::Interior(g.voxel(2, 2, 3)));
    }

    #[test]
    fn test_faces_default_to_absorbing() {
        let g = CartesianGrid::new(2, 2, 2).unwrap();
        let v = g.voxel(1, 1, 1);
        assert_eq!(g.neighbor(v, 0), FaceNeighbor::Absorbing);
        assert_eq!(g.neighbor(v, 1), FaceNeighbor::Absorbing);
        assert_eq!(g.neighbor(v, 2), FaceNeighbor::Absorbing);
    }

    #[test]
    fn test_periodic_face_wraps_to_opposite_interior() {
        let g = CartesianGrid::new(4, 2, 2)
            .unwrap()
            .with_face(0, FaceBoundary::Periodic)
            .with_face(3, FaceBoundary::Periodic);
        let low = g.voxel(1, 1, 1);
        let high = g.voxel(4, 1, 1);
        assert_eq!(g.neighbor(low, 0), FaceNeighbor::Interior(high));
        assert_eq!(g.neighbor(high, 3), FaceNeighbor::Interior(low));
    }

    #[test]
    fn test_remote_face_mirrors_entry_voxel() {
        let g = CartesianGrid::new(4, 2, 2)
            .unwrap()
            .with_face(3, FaceBoundary::Remote(7))
            .with_face(0, FaceBoundary::Remote(5));
        // Crossing +x out of the last interior column enters the
        // receiver's first interior column.
        let v = g.voxel(4, 1, 2);
        assert_eq!(
            g.neighbor(v, 3),
            FaceNeighbor::Remote {
                rank: 7,
                voxel: g.voxel(1, 1, 2)
            }
        );
        // Crossing -x enters from the receiver's far side.
        let v = g.voxel(1, 2, 1);
        assert_eq!(
            g.neighbor(v, 0),
            FaceNeighbor::Remote {
                rank: 5,
                voxel: g.voxel(4, 2, 1)
            }
        );
    }

    #[test]
    fn test_degenerate_dimensions_rejected() {
        match CartesianGrid::new(0, 2, 2).unwrap_err() {
            KineticError::TopologyViolation(msg) => assert!(msg.contains(">= 1")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }
}
