// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Species
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A named particle population with its store, mover queue, partition
//! table and optional identifier/annotation extensions, plus the owning
//! registry that replaces the legacy intrusive species list.

use kinetic_types::config::KineticConfig;
use kinetic_types::constants::PARTICLE_ALIGNMENT;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_util::AlignedVec;

use crate::annotation::AnnotationBuffer;
use crate::mover::{Mover, MoverQueue};
use crate::particle::Particle;
use crate::store::ParticleStore;

/// Unique species identifier. 32-bit wide: the width is fixed by the
/// injector wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub i32);

/// Spatial sort strategy (§ sort module): out-of-place scatters into a
/// fresh buffer, in-place trades an extra pass for no auxiliary storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    OutOfPlace,
    InPlace,
}

/// A particle population sharing charge and rest mass.
///
/// Owns its particle store, mover queue, per-voxel partition table and,
/// when enabled, the parallel global-identifier and annotation arrays.
/// Grid geometry is a shared read-only collaborator and is passed into
/// operations explicitly rather than stored here.
#[derive(Debug)]
pub struct Species {
    pub name: String,
    /// Particle charge, normalized units.
    pub q: f32,
    /// Particle rest mass, normalized units.
    pub m: f32,
    pub id: SpeciesId,
    pub(crate) store: ParticleStore,
    pub(crate) movers: MoverQueue,
    /// Per-voxel offsets into the sorted particle array; length
    /// `voxel_count + 1`. Valid immediately after a sort.
    pub(crate) partition: Vec<i32>,
    /// Step at which the particles were last sorted.
    pub last_sorted: i64,
    /// Steps between sorts; 0 disables periodic sorting.
    pub sort_interval: i64,
    pub sort_mode: SortMode,
    pub(crate) ids: Option<AlignedVec<u64>>,
    pub(crate) annotations: Option<AnnotationBuffer>,
}

impl Species {
    pub fn new(
        name: &str,
        q: f32,
        m: f32,
        id: SpeciesId,
        max_np: usize,
        max_nm: usize,
        voxel_count: usize,
    ) -> KineticResult<Self> {
        if max_np == 0 {
            return Err(KineticError::ConfigError(format!(
                "Species '{name}' requires max_np >= 1"
            )));
        }
        Ok(Species {
            name: name.to_string(),
            q,
            m,
            id,
            store: ParticleStore::new(max_np)?,
            movers: MoverQueue::new(max_nm)?,
            partition: vec![0; voxel_count + 1],
            last_sorted: 0,
            sort_interval: 0,
            sort_mode: SortMode::OutOfPlace,
            ids: None,
            annotations: None,
        })
    }

    pub fn np(&self) -> usize {
        self.store.len()
    }

    pub fn max_np(&self) -> usize {
        self.store.capacity()
    }

    pub fn nm(&self) -> usize {
        self.movers.len()
    }

    pub fn max_nm(&self) -> usize {
        self.movers.capacity()
    }

    pub fn voxel_count(&self) -> usize {
        self.partition.len() - 1
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.store.as_mut_slice()
    }

    pub fn particle(&self, index: usize) -> &Particle {
        self.store.get(index)
    }

    pub fn particle_mut(&mut self, index: usize) -> &mut Particle {
        self.store.get_mut(index)
    }

    pub fn movers(&self) -> &[Mover] {
        self.movers.as_slice()
    }

    pub fn clear_movers(&mut self) {
        self.movers.clear();
    }

    /// Partition table: after a sort, `partition[v]..partition[v+1]` are
    /// exactly the slots of particles resident in voxel `v`.
    pub fn partition(&self) -> &[i32] {
        &self.partition
    }

    /// Append a particle, keeping the optional parallel arrays in
    /// lockstep. `global_id` is stored only when the species tracks ids.
    pub fn append_particle(
        &mut self,
        particle: Particle,
        global_id: Option<u64>,
    ) -> KineticResult<usize> {
        let slot = match self.store.push(particle) {
            Ok(slot) => slot,
            Err(e) => {
                log::error!("Species '{}': {e}", self.name);
                return Err(e);
            }
        };
        if let Some(ids) = self.ids.as_mut() {
            ids[slot] = global_id.unwrap_or(0);
        }
        if let Some(ann) = self.annotations.as_mut() {
            ann.clear_row(slot);
        }
        Ok(slot)
    }

    /// Remove by index with swap-with-last compaction, mirroring the
    /// backfill into the identifier and annotation arrays.
    pub fn remove_particle(&mut self, index: usize) -> Particle {
        let last = self.store.len() - 1;
        let removed = self.store.swap_remove(index);
        if let Some(ids) = self.ids.as_mut() {
            ids[index] = ids[last];
        }
        if let Some(ann) = self.annotations.as_mut() {
            ann.swap_remove(index, last);
        }
        removed
    }

    /// Record a pending boundary crossing for the particle at `m.i`.
    pub fn enqueue_mover(&mut self, m: Mover) -> KineticResult<()> {
        if let Err(e) = self.movers.push(m) {
            log::error!("Species '{}': {e}", self.name);
            return Err(e);
        }
        Ok(())
    }

    /// Enlarge the particle store (and parallel arrays). Only legal at a
    /// serial phase boundary: outstanding slices and index references
    /// must not survive a reallocation.
    pub fn grow_storage(&mut self, new_max_np: usize) -> KineticResult<()> {
        self.store.grow(new_max_np)?;
        if let Some(ids) = self.ids.as_mut() {
            ids.grow(new_max_np)?;
        }
        if let Some(ann) = self.annotations.as_mut() {
            ann.grow(new_max_np)?;
        }
        Ok(())
    }

    // ── Global identifier extension ─────────────────────────────────

    pub fn has_ids(&self) -> bool {
        self.ids.is_some()
    }

    /// Allocate the parallel identifier array (one `u64` per particle
    /// slot). Idempotent.
    pub fn enable_id_tracking(&mut self) -> KineticResult<()> {
        if self.ids.is_none() {
            self.ids = Some(AlignedVec::with_capacity(
                self.store.capacity(),
                PARTICLE_ALIGNMENT,
            )?);
        }
        Ok(())
    }

    /// The global id of a live particle; `None` when the species does
    /// not track ids or the index is out of range.
    pub fn global_id(&self, index: usize) -> Option<u64> {
        let ids = self.ids.as_ref()?;
        if index < self.store.len() {
            Some(ids[index])
        } else {
            None
        }
    }

    pub fn set_global_id(&mut self, index: usize, id: u64) {
        let np = self.store.len();
        if let Some(ids) = self.ids.as_mut() {
            if index < np {
                ids[index] = id;
            }
        }
    }

    // ── Annotation extension ────────────────────────────────────────

    /// Allocate `max_np * slot_count` aligned scalar storage. A
    /// non-positive count disables the extension for this species
    /// instead of failing.
    pub fn allocate_annotation_buffer(&mut self, slot_count: i32) -> KineticResult<()> {
        if slot_count <= 0 {
            self.annotations = None;
            return Ok(());
        }
        self.annotations = Some(AnnotationBuffer::new(self.store.capacity(), slot_count)?);
        Ok(())
    }

    /// Annotation slots per particle; 0 when the extension is disabled.
    pub fn annotation_slots(&self) -> i32 {
        self.annotations.as_ref().map_or(0, AnnotationBuffer::slots)
    }

    pub fn get_annotation(&self, particle_index: i32, slot_index: i32) -> f32 {
        match self.annotations.as_ref() {
            Some(ann) => ann.get(self.store.len(), particle_index, slot_index),
            None => f32::NAN,
        }
    }

    pub fn set_annotation(&mut self, particle_index: i32, slot_index: i32, value: f32) {
        let np = self.store.len();
        if let Some(ann) = self.annotations.as_mut() {
            ann.set(np, particle_index, slot_index, value);
        }
    }

    pub fn increment_annotation(&mut self, particle_index: i32, slot_index: i32, delta: f32) {
        let np = self.store.len();
        if let Some(ann) = self.annotations.as_mut() {
            ann.increment(np, particle_index, slot_index, delta);
        }
    }
}

/// Derive a particle identifier with a high probability of being globally
/// unique: `10^ceil(log10(max_np)) * (rank * scale_factor) + local_slot`.
///
/// Distinct slots on one rank never collide. Distinct ranks do not
/// collide as long as `max_np` stays below the power-of-ten base implied
/// by the formula; this is a best-effort diagnostic scheme, not a strict
/// guarantee, and growing `max_np` across the base between calls shifts
/// the encoding. The decimal base keeps the ids human readable.
///
/// `scale_factor == 0` is a programming error, not a runtime condition.
pub fn generate_particle_id(
    local_slot: usize,
    max_np: usize,
    rank: usize,
    scale_factor: usize,
) -> u64 {
    assert!(scale_factor > 0, "scale_factor must be > 0");
    assert!(max_np > 0, "max_np must be > 0");
    let id_base = (max_np as f64).log10().ceil() as u32;
    10u64.pow(id_base) * (rank as u64 * scale_factor as u64) + local_slot as u64
}

/// Owning, index-addressable collection of species for one
/// domain-decomposed process. Replaces the legacy intrusive linked list;
/// iteration order is insertion order but nothing may depend on it.
#[derive(Debug)]
pub struct SpeciesRegistry {
    rank: usize,
    species: Vec<Species>,
}

impl SpeciesRegistry {
    /// `rank` is this process's distributed identity, injected at
    /// construction so id generation never consults ambient state.
    pub fn new(rank: usize) -> Self {
        SpeciesRegistry {
            rank,
            species: Vec::new(),
        }
    }

    /// Build the registry (and each species' extensions) from
    /// configuration. `voxel_count` comes from the grid collaborator.
    pub fn from_config(config: &KineticConfig, voxel_count: usize) -> KineticResult<Self> {
        config.validate()?;
        let mut registry = SpeciesRegistry::new(config.rank);
        for (idx, sc) in config.species.iter().enumerate() {
            let mut sp = Species::new(
                &sc.name,
                sc.charge as f32,
                sc.mass as f32,
                SpeciesId(idx as i32),
                sc.max_np,
                sc.max_nm,
                voxel_count,
            )?;
            sp.sort_interval = sc.sort_interval;
            sp.sort_mode = if sc.sort_out_of_place {
                SortMode::OutOfPlace
            } else {
                SortMode::InPlace
            };
            if sc.track_ids {
                sp.enable_id_tracking()?;
            }
            sp.allocate_annotation_buffer(sc.annotation_slots)?;
            registry.insert(sp)?;
        }
        Ok(registry)
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn insert(&mut self, species: Species) -> KineticResult<()> {
        if self.species.iter().any(|s| s.id == species.id) {
            return Err(KineticError::ConfigError(format!(
                "Duplicate species id {:?}",
                species.id
            )));
        }
        if self.species.iter().any(|s| s.name == species.name) {
            return Err(KineticError::ConfigError(format!(
                "Duplicate species name '{}'",
                species.name
            )));
        }
        log::info!(
            "Registered species '{}' (id {}, max_np {}, max_nm {})",
            species.name,
            species.id.0,
            species.max_np(),
            species.max_nm()
        );
        self.species.push(species);
        Ok(())
    }

    pub fn by_id(&self, id: SpeciesId) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn by_id_mut(&mut self, id: SpeciesId) -> Option<&mut Species> {
        self.species.iter_mut().find(|s| s.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.name == name)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Species> {
        self.species.iter_mut().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Species> {
        self.species.iter_mut()
    }

    /// Generate a global particle id for a slot of this rank's arrays.
    pub fn generate_id(&self, local_slot: usize, max_np: usize, scale_factor: usize) -> u64 {
        generate_particle_id(local_slot, max_np, self.rank, scale_factor)
    }
}
