// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Advance Pass
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel scaffolding for one advance pass over a species.
//!
//! The particle range is split into disjoint pipeline shares, each share
//! is advanced on its own thread through a caller-supplied kernel (the
//! push physics lives outside this crate), and the per-pipeline crossing
//! requests are merged serially into the mover queue afterwards. No
//! storage may grow while the pass runs; capacity faults surface at the
//! merge. Shares are disjoint by construction, so the pass needs no
//! locking.

use kinetic_types::error::KineticResult;
use kinetic_util::distribute::shares;

use crate::mover::Mover;
use crate::particle::Particle;
use crate::species::Species;

/// Run `kernel` over every particle of `species` using `pipelines` worker
/// threads plus the dispatcher share, then merge the crossing requests
/// into the mover queue. Returns the number of requests merged.
///
/// The kernel receives the share's base slot and its particle slice, and
/// pushes one [`Mover`] per face crossing with `i` *relative to the
/// slice*, in ascending order (the natural order of a linear sweep).
/// Merging in pipeline order then yields queue entries in ascending
/// absolute slot order, which is what the boundary pass's reverse drain
/// relies on.
pub fn advance_pass<K>(
    species: &mut Species,
    pipelines: usize,
    block: usize,
    kernel: K,
) -> KineticResult<usize>
where
    K: Fn(usize, &mut [Particle], &mut Vec<Mover>) + Sync,
{
    let plan = shares(species.np(), block, pipelines)?;
    let mut requests: Vec<Vec<Mover>> = plan.iter().map(|_| Vec::new()).collect();

    {
        let mut rest = species.particles_mut();
        let mut chunks = Vec::with_capacity(plan.len());
        for &(offset, count) in &plan {
            let (head, tail) = rest.split_at_mut(count);
            chunks.push((offset, head));
            rest = tail;
        }

        let kernel = &kernel;
        rayon::scope(|s| {
            for ((base, chunk), out) in chunks.into_iter().zip(requests.iter_mut()) {
                s.spawn(move |_| kernel(base, chunk, out));
            }
        });
    }

    let mut merged = 0;
    for (&(base, count), out) in plan.iter().zip(requests.iter()) {
        for m in out {
            debug_assert!((m.i as usize) < count);
            species.enqueue_mover(Mover {
                i: m.i + base as i32,
                ..*m
            })?;
            merged += 1;
        }
    }
    Ok(merged)
}
