// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Property-Based Tests (proptest) for kinetic-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kinetic-types using proptest.
//!
//! Covers: configuration serialization roundtrip and validation of
//! generated species tables.

use kinetic_types::config::{KineticConfig, SpeciesConfig};
use proptest::prelude::*;

fn species_strategy() -> impl Strategy<Value = SpeciesConfig> {
    (
        "[a-z][a-z0-9_]{0,15}",
        -2.0f64..2.0,
        0.1f64..4000.0,
        1usize..1 << 20,
        1usize..1 << 16,
        0i64..1000,
        any::<bool>(),
        0i32..8,
        any::<bool>(),
    )
        .prop_map(
            |(name, charge, mass, max_np, max_nm, sort_interval, oop, slots, ids)| SpeciesConfig {
                name,
                charge,
                mass,
                max_np,
                max_nm,
                sort_interval,
                sort_out_of_place: oop,
                annotation_slots: slots,
                track_ids: ids,
            },
        )
}

proptest! {
    /// JSON serialization round-trips every field of a species table.
    #[test]
    fn config_roundtrips_through_json(
        rank in 0usize..4096,
        species in prop::collection::vec(species_strategy(), 1..6),
    ) {
        let cfg = KineticConfig { rank, species };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: KineticConfig = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(back.rank, cfg.rank);
        prop_assert_eq!(back.species.len(), cfg.species.len());
        for (a, b) in cfg.species.iter().zip(back.species.iter()) {
            prop_assert_eq!(&a.name, &b.name);
            prop_assert_eq!(a.charge.to_bits(), b.charge.to_bits());
            prop_assert_eq!(a.mass.to_bits(), b.mass.to_bits());
            prop_assert_eq!(a.max_np, b.max_np);
            prop_assert_eq!(a.max_nm, b.max_nm);
            prop_assert_eq!(a.sort_interval, b.sort_interval);
            prop_assert_eq!(a.sort_out_of_place, b.sort_out_of_place);
            prop_assert_eq!(a.annotation_slots, b.annotation_slots);
            prop_assert_eq!(a.track_ids, b.track_ids);
        }
    }

    /// Generated tables with unique names always validate.
    #[test]
    fn unique_named_tables_validate(
        rank in 0usize..64,
        mut species in prop::collection::vec(species_strategy(), 1..6),
    ) {
        for (idx, sp) in species.iter_mut().enumerate() {
            sp.name = format!("{}_{idx}", sp.name);
        }
        let cfg = KineticConfig { rank, species };
        prop_assert!(cfg.validate().is_ok());
    }
}
