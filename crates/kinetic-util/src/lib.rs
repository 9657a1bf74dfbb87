// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Kinetic Util
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Leaf utilities of the particle subsystem: aligned array storage and
//! the pipeline workload-distribution primitive.

pub mod aligned;
pub mod distribute;

pub use aligned::AlignedVec;
pub use distribute::{distribute, shares};
