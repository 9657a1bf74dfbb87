// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Kinetic Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

/// Failure taxonomy of the particle subsystem.
///
/// Capacity exhaustion and allocation failure are configuration faults the
/// simulation cannot safely continue past; callers log them at error
/// severity and stop the run rather than recover. Annotation bounds faults
/// are deliberately *not* represented here: the annotation accessors absorb
/// them locally with a NaN sentinel so the per-particle hot path never pays
/// for error plumbing.
#[derive(Error, Debug)]
pub enum KineticError {
    #[error("Particle store full: np={np}, max_np={max_np}")]
    CapacityExceeded { np: usize, max_np: usize },

    #[error("Mover queue full: nm={nm}, max_nm={max_nm}")]
    MoverQueueFull { nm: usize, max_nm: usize },

    #[error("Aligned allocation of {bytes} bytes (alignment {align}) failed")]
    AllocationFailed { bytes: usize, align: usize },

    #[error("Workload distribution error: {0}")]
    InvalidWorkload(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Topology violation: {0}")]
    TopologyViolation(String),

    #[error("Injector wire error: {0}")]
    WireError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KineticResult<T> = Result<T, KineticError>;
