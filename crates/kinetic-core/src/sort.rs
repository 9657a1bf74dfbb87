// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Spatial Sort
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Counting sort of a species by containing voxel.
//!
//! Runs between boundary passes, when every particle is resident. After a
//! sort, `partition[v]..partition[v+1]` are exactly the slots of voxel
//! `v`, which restores cache locality for the advance kernels and gives
//! the accumulation passes contiguous per-voxel runs. Ordering within a
//! voxel is not guaranteed. The parallel identifier and annotation arrays
//! are permuted together with the particles.

use kinetic_types::constants::PARTICLE_ALIGNMENT;
use kinetic_types::error::KineticResult;
use kinetic_util::AlignedVec;

use crate::annotation::AnnotationBuffer;
use crate::particle::Particle;
use crate::species::{SortMode, Species};

/// Sort the species now, in its configured [`SortMode`].
pub fn sort_by_voxel(species: &mut Species) -> KineticResult<()> {
    build_partition(species);
    match species.sort_mode {
        SortMode::OutOfPlace => scatter_out_of_place(species)?,
        SortMode::InPlace => place_in_cycles(species),
    }
    debug_assert!(species.partition.windows(2).all(|w| w[0] <= w[1]));
    log::debug!(
        "Sorted species '{}': {} particles over {} voxels",
        species.name,
        species.np(),
        species.voxel_count()
    );
    Ok(())
}

/// Sort when the configured interval has elapsed. Returns whether a sort
/// ran. A non-positive interval disables periodic sorting.
pub fn maybe_sort(species: &mut Species, step: i64) -> KineticResult<bool> {
    if species.sort_interval <= 0 || step - species.last_sorted < species.sort_interval {
        return Ok(false);
    }
    sort_by_voxel(species)?;
    species.last_sorted = step;
    Ok(true)
}

/// Tally per-voxel occupancy and prefix-sum it into the partition table.
fn build_partition(species: &mut Species) {
    let voxel_count = species.voxel_count();
    let mut counts = vec![0i32; voxel_count];
    for p in species.particles() {
        debug_assert!(!p.locator.is_pending(), "sort ran with unresolved crossings");
        counts[p.locator.voxel() as usize] += 1;
    }
    species.partition[0] = 0;
    for v in 0..voxel_count {
        species.partition[v + 1] = species.partition[v] + counts[v];
    }
}

/// Scatter into freshly allocated aligned buffers, then adopt them. One
/// streaming read pass; costs a second particle array while it runs.
fn scatter_out_of_place(species: &mut Species) -> KineticResult<()> {
    let np = species.np();
    let max_np = species.max_np();
    let mut next: Vec<i32> = species.partition[..species.voxel_count()].to_vec();

    let mut fresh: AlignedVec<Particle> = AlignedVec::with_capacity(max_np, PARTICLE_ALIGNMENT)?;
    let mut fresh_ids = match species.ids.as_ref() {
        Some(_) => Some(AlignedVec::<u64>::with_capacity(max_np, PARTICLE_ALIGNMENT)?),
        None => None,
    };
    let mut fresh_ann = match species.annotations.as_ref() {
        Some(ann) => Some(AnnotationBuffer::new(max_np, ann.slots())?),
        None => None,
    };

    for src in 0..np {
        let p = *species.store.get(src);
        let v = p.locator.voxel() as usize;
        let dst = next[v] as usize;
        next[v] += 1;
        fresh[dst] = p;
        if let (Some(fresh_ids), Some(ids)) = (fresh_ids.as_mut(), species.ids.as_ref()) {
            fresh_ids[dst] = ids[src];
        }
        if let (Some(fresh_ann), Some(ann)) = (fresh_ann.as_mut(), species.annotations.as_ref()) {
            fresh_ann.scatter_row(ann, src, dst);
        }
    }

    species.store.replace_buf(fresh);
    if let Some(fresh_ids) = fresh_ids {
        species.ids = Some(fresh_ids);
    }
    if let Some(fresh_ann) = fresh_ann {
        species.annotations = Some(fresh_ann);
    }
    Ok(())
}

/// Cyclic in-place placement: no auxiliary particle buffer, at the cost
/// of swap traffic. Every bucket below the current one is already final,
/// so a misplaced particle always swaps forward and each swap finalizes
/// one slot.
fn place_in_cycles(species: &mut Species) {
    let voxel_count = species.voxel_count();
    let mut next: Vec<i32> = species.partition[..voxel_count].to_vec();

    for v in 0..voxel_count {
        while next[v] < species.partition[v + 1] {
            let i = next[v] as usize;
            let pv = species.store.get(i).locator.voxel() as usize;
            if pv == v {
                next[v] += 1;
                continue;
            }
            let j = next[pv] as usize;
            next[pv] += 1;
            species.store.as_mut_slice().swap(i, j);
            if let Some(ids) = species.ids.as_mut() {
                ids.swap(i, j);
            }
            if let Some(ann) = species.annotations.as_mut() {
                ann.swap_rows(i, j);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesId;

    fn scrambled_species(mode: SortMode) -> Species {
        let mut sp = Species::new("electron", -1.0, 1.0, SpeciesId(0), 64, 16, 8).unwrap();
        sp.sort_mode = mode;
        sp.enable_id_tracking().unwrap();
        sp.allocate_annotation_buffer(1).unwrap();
        // Voxels in deliberately shuffled order, weight tags the identity.
        for (k, v) in [5, 1, 3, 1, 7, 0, 3, 5, 1, 2].iter().enumerate() {
            let p = Particle::resident(*v, [0.0; 3], [0.0; 3], k as f32);
            let slot = sp.append_particle(p, Some(100 + k as u64)).unwrap();
            sp.set_annotation(slot as i32, 0, k as f32 * 0.5);
        }
        sp
    }

    fn assert_sorted_consistently(sp: &Species) {
        let part = sp.partition().to_vec();
        assert_eq!(part[0], 0);
        assert_eq!(*part.last().unwrap() as usize, sp.np());
        assert!(part.windows(2).all(|w| w[0] <= w[1]));
        for v in 0..sp.voxel_count() {
            for slot in part[v] as usize..part[v + 1] as usize {
                assert_eq!(sp.particle(slot).locator.voxel(), v as i32);
            }
        }
        // Parallel arrays moved with their particles: weight k maps to
        // id 100+k and annotation k*0.5.
        for slot in 0..sp.np() {
            let k = sp.particle(slot).w as u64;
            assert_eq!(sp.global_id(slot), Some(100 + k));
            assert_eq!(sp.get_annotation(slot as i32, 0), k as f32 * 0.5);
        }
    }

    #[test]
    fn test_out_of_place_sort_groups_by_voxel() {
        let mut sp = scrambled_species(SortMode::OutOfPlace);
        sort_by_voxel(&mut sp).unwrap();
        assert_sorted_consistently(&sp);
        assert_eq!(sp.partition()[2] - sp.partition()[1], 3); // voxel 1 × 3
        assert_eq!(sp.partition()[7] - sp.partition()[6], 0); // voxel 6 empty
    }

    #[test]
    fn test_in_place_sort_groups_by_voxel() {
        let mut sp = scrambled_species(SortMode::InPlace);
        sort_by_voxel(&mut sp).unwrap();
        assert_sorted_consistently(&sp);
    }

    #[test]
    fn test_modes_agree_on_partition() {
        let mut a = scrambled_species(SortMode::OutOfPlace);
        let mut b = scrambled_species(SortMode::InPlace);
        sort_by_voxel(&mut a).unwrap();
        sort_by_voxel(&mut b).unwrap();
        assert_eq!(a.partition(), b.partition());
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut sp = scrambled_species(SortMode::InPlace);
        sort_by_voxel(&mut sp).unwrap();
        let first: Vec<i32> = sp.particles().iter().map(|p| p.locator.voxel()).collect();
        sort_by_voxel(&mut sp).unwrap();
        let second: Vec<i32> = sp.particles().iter().map(|p| p.locator.voxel()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_species_sorts_cleanly() {
        let mut sp = Species::new("ion", 1.0, 1836.0, SpeciesId(1), 8, 4, 4).unwrap();
        sort_by_voxel(&mut sp).unwrap();
        assert!(sp.partition().iter().all(|&x| x == 0));
    }

    #[test]
    fn test_maybe_sort_honors_interval() {
        let mut sp = scrambled_species(SortMode::OutOfPlace);
        sp.sort_interval = 10;
        sp.last_sorted = 0;
        assert!(!maybe_sort(&mut sp, 9).unwrap());
        assert!(maybe_sort(&mut sp, 10).unwrap());
        assert_eq!(sp.last_sorted, 10);
        assert!(!maybe_sort(&mut sp, 19).unwrap());
        assert!(maybe_sort(&mut sp, 20).unwrap());

        sp.sort_interval = 0;
        assert!(!maybe_sort(&mut sp, 1000).unwrap());
    }
}
