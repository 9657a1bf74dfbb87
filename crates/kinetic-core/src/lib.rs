// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Kinetic Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Particle data subsystem of the kinetic PIC pipeline.
//!
//! Owns per-species particle populations, tracks voxel-boundary crossings,
//! packages cross-domain handoff records, periodically reorders particles
//! by containing voxel and assigns globally-distinguishable identifiers.
//! The field solve, the push physics and the interprocess transport are
//! external collaborators.

pub mod advance;
pub mod annotation;
pub mod boundary;
pub mod grid;
pub mod injector;
pub mod mover;
pub mod particle;
pub mod sort;
pub mod species;
pub mod store;

pub use advance::advance_pass;
pub use boundary::{admit, process_movers, BoundaryStats, LoopbackTransport, Transport};
pub use grid::{CartesianGrid, FaceBoundary, FaceNeighbor, GridTopology};
pub use injector::{Injector, InjectorRecord, RoutedInjector};
pub use mover::{Mover, MoverQueue};
pub use particle::{Locator, Particle, ParticleRecord};
pub use sort::{maybe_sort, sort_by_voxel};
pub use species::{generate_particle_id, SortMode, Species, SpeciesId, SpeciesRegistry};
pub use store::ParticleStore;
