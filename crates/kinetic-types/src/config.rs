// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Kinetic Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SORT_INTERVAL;
use crate::error::{KineticError, KineticResult};

/// Top-level configuration of the particle subsystem for one
/// domain-decomposed process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KineticConfig {
    /// Distributed rank of this process. Passed in explicitly so nothing
    /// in the subsystem queries ambient process state.
    pub rank: usize,
    pub species: Vec<SpeciesConfig>,
}

/// Per-species capacities and sort policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    /// Particle charge, normalized units.
    pub charge: f64,
    /// Particle rest mass, normalized units.
    pub mass: f64,
    /// Capacity of the local particle array.
    pub max_np: usize,
    /// Capacity of the pending boundary-crossing queue.
    pub max_nm: usize,
    /// Steps between spatial sorts; 0 disables periodic sorting.
    #[serde(default = "default_sort_interval")]
    pub sort_interval: i64,
    /// Out-of-place sort trades an auxiliary particle buffer for one fewer
    /// pass over the array.
    #[serde(default = "default_sort_out_of_place")]
    pub sort_out_of_place: bool,
    /// Float annotation slots per particle; 0 disables the extension.
    #[serde(default)]
    pub annotation_slots: i32,
    /// Whether this species carries globally-distinguishable particle ids.
    #[serde(default)]
    pub track_ids: bool,
}

fn default_sort_interval() -> i64 {
    DEFAULT_SORT_INTERVAL
}

fn default_sort_out_of_place() -> bool {
    true
}

impl KineticConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> KineticResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KineticResult<()> {
        if self.species.is_empty() {
            return Err(KineticError::ConfigError(
                "At least one species must be configured".to_string(),
            ));
        }
        for (idx, sp) in self.species.iter().enumerate() {
            if sp.name.trim().is_empty() {
                return Err(KineticError::ConfigError(format!(
                    "species[{idx}] has an empty name"
                )));
            }
            if sp.max_np == 0 {
                return Err(KineticError::ConfigError(format!(
                    "species '{}' requires max_np >= 1",
                    sp.name
                )));
            }
            if sp.sort_interval < 0 {
                return Err(KineticError::ConfigError(format!(
                    "species '{}' has negative sort_interval {}",
                    sp.name, sp.sort_interval
                )));
            }
            if !sp.charge.is_finite() || !sp.mass.is_finite() || sp.mass <= 0.0 {
                return Err(KineticError::ConfigError(format!(
                    "species '{}' has non-physical charge/mass: q={}, m={}",
                    sp.name, sp.charge, sp.mass
                )));
            }
        }
        let mut names: Vec<&str> = self.species.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.species.len() {
            return Err(KineticError::ConfigError(
                "Species names must be unique".to_string(),
            ));
        }
        Ok(())
    }
}
