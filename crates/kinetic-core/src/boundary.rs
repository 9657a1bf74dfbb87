// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Boundary Crossing Protocol
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Resolution of pending voxel-face crossings after an advance pass.
//!
//! The mover queue is drained in *reverse* enqueue order. Movers are
//! enqueued in ascending particle index, so every removal's backfill pulls
//! from the tail, past the indices of all movers not yet processed; no
//! mover ever dereferences a stale slot. Processing forward would break
//! exactly that.

use kinetic_types::error::KineticResult;

use crate::grid::{FaceNeighbor, GridTopology};
use crate::injector::{Injector, InjectorRecord, RoutedInjector};
use crate::mover::Mover;
use crate::particle::{Locator, Particle};
use crate::species::Species;

/// Tally of one boundary pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryStats {
    /// Crossings into another local voxel.
    pub re_resident: usize,
    /// Particles packaged for another rank.
    pub injected: usize,
    /// Particles that left the simulation.
    pub absorbed: usize,
}

/// Interprocess delivery of routed injectors. The injector byte layout is
/// the fixed contract; framing beyond it belongs to the implementor.
pub trait Transport {
    fn deliver(&mut self, outbound: Vec<RoutedInjector>) -> KineticResult<()>;
    fn collect(&mut self) -> KineticResult<Vec<Injector>>;
}

/// Single-process transport that returns everything delivered to it.
/// Exists for tests and single-rank runs.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    queue: Vec<Injector>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        LoopbackTransport::default()
    }
}

impl Transport for LoopbackTransport {
    fn deliver(&mut self, outbound: Vec<RoutedInjector>) -> KineticResult<()> {
        self.queue.extend(outbound.into_iter().map(|r| r.injector));
        Ok(())
    }

    fn collect(&mut self) -> KineticResult<Vec<Injector>> {
        Ok(std::mem::take(&mut self.queue))
    }
}

/// Drain the species' mover queue, resolving each pending crossing
/// against the grid. Outbound handoffs are appended to `outbound`; the
/// queue is empty on return.
pub fn process_movers<G: GridTopology>(
    species: &mut Species,
    grid: &G,
    outbound: &mut Vec<RoutedInjector>,
) -> KineticResult<BoundaryStats> {
    let mut stats = BoundaryStats::default();

    for k in (0..species.nm()).rev() {
        let m = *species.movers.get(k);
        let slot = m.i as usize;
        let (voxel, face) = match species.particle(slot).locator {
            Locator::Pending { voxel, face } => (voxel, face),
            // The kernel resolved this crossing within the sub-step.
            Locator::Resident { .. } => continue,
        };

        match grid.neighbor(voxel, face) {
            FaceNeighbor::Interior(v) => {
                let p = species.particle_mut(slot);
                p.locator = Locator::Resident { voxel: v };
                flip_entry_position(p, face);
                stats.re_resident += 1;
            }
            FaceNeighbor::Remote { rank, voxel: entry } => {
                let global_id = species.global_id(slot);
                let mut p = *species.particle(slot);
                p.locator = Locator::Resident { voxel: entry };
                flip_entry_position(&mut p, face);
                let injector = Injector {
                    record: InjectorRecord::from_parts(&p.to_record(), &m, species.id.0),
                    global_id,
                };
                outbound.push(RoutedInjector {
                    dest_rank: rank,
                    injector,
                });
                species.remove_particle(slot);
                stats.injected += 1;
            }
            FaceNeighbor::Absorbing => {
                species.remove_particle(slot);
                stats.absorbed += 1;
            }
        }
    }

    species.clear_movers();
    log::debug!(
        "Boundary pass on '{}': {} re-resident, {} injected, {} absorbed",
        species.name,
        stats.re_resident,
        stats.injected,
        stats.absorbed
    );
    Ok(stats)
}

/// Admit one incoming injector: append as a resident particle at the
/// carried voxel, restore the global id when tracked and re-enqueue the
/// crossing when displacement remains.
pub fn admit(species: &mut Species, injector: &Injector) -> KineticResult<usize> {
    let rec = injector.record.particle_record();
    let particle = Particle::from_record(&rec, false);
    let slot = species.append_particle(particle, injector.global_id)?;

    let mut m = injector.record.mover();
    if m.dispx != 0.0 || m.dispy != 0.0 || m.dispz != 0.0 {
        m.i = slot as i32;
        species.enqueue_mover(m)?;
    }
    Ok(slot)
}

/// A particle exiting through a face enters the next voxel at the
/// opposite edge: the crossed-axis coordinate negates.
fn flip_entry_position(p: &mut Particle, face: u8) {
    match face % 3 {
        0 => p.dx = -p.dx,
        1 => p.dy = -p.dy,
        _ => p.dz = -p.dz,
    }
}
