// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Workload Distribution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Range partitioning of `n` items across `pipelines + 1` shares.
//!
//! Pipelines `0..pipelines` are parallel workers; share `pipelines` is the
//! dispatcher. Worker shares are rounded to a multiple of the block size;
//! the dispatcher absorbs the sub-block remainder. Shares are contiguous,
//! monotonically increasing, pairwise disjoint and collectively exhaustive,
//! which is what lets an advance pass mutate one particle array from many
//! pipelines with no locking.

use kinetic_types::error::{KineticError, KineticResult};

/// Compute the `(offset, count)` share of pipeline `p`.
///
/// `p == pipelines` addresses the dispatcher share. The worker split point
/// for pipeline `p` is `block * round(blocks / pipelines * p)` with
/// `blocks = n / block`, so every worker receives a whole number of blocks
/// and consecutive workers differ by at most one block.
pub fn distribute(
    n: usize,
    block: usize,
    p: usize,
    pipelines: usize,
) -> KineticResult<(usize, usize)> {
    if block == 0 {
        return Err(KineticError::InvalidWorkload(
            "Block size must be >= 1".to_string(),
        ));
    }
    if pipelines == 0 {
        return Err(KineticError::InvalidWorkload(
            "At least one worker pipeline is required".to_string(),
        ));
    }
    if p > pipelines {
        return Err(KineticError::InvalidWorkload(format!(
            "Pipeline index {p} out of range 0..={pipelines}"
        )));
    }

    if p == pipelines {
        // Dispatcher: everything past the last whole block.
        return Ok((block * (n / block), n % block));
    }

    let t = (n / block) as f64 / pipelines as f64;
    let first = block * ((t * p as f64 + 0.5) as usize);
    let next = block * ((t * (p + 1) as f64 + 0.5) as usize);
    Ok((first, next - first))
}

/// All `pipelines + 1` shares of `n` items, in pipeline order.
pub fn shares(n: usize, block: usize, pipelines: usize) -> KineticResult<Vec<(usize, usize)>> {
    (0..=pipelines)
        .map(|p| distribute(n, block, p, pipelines))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_1000_over_4_workers() {
        let all = shares(1000, 10, 4).unwrap();
        assert_eq!(all.len(), 5);
        let total: usize = all.iter().map(|&(_, n)| n).sum();
        assert_eq!(total, 1000);
        for &(_, count) in &all[..4] {
            assert_eq!(count % 10, 0, "worker share must be a block multiple");
        }
        // 1000 divides evenly into blocks, so the dispatcher gets nothing.
        assert_eq!(all[4], (1000, 0));
    }

    #[test]
    fn test_dispatcher_absorbs_remainder() {
        let (first, count) = distribute(1007, 10, 4, 4).unwrap();
        assert_eq!(first, 1000);
        assert_eq!(count, 7);
    }

    #[test]
    fn test_shares_are_contiguous_and_monotone() {
        let all = shares(7777, 16, 5).unwrap();
        let mut cursor = 0usize;
        for &(first, count) in &all {
            assert_eq!(first, cursor, "shares must be contiguous");
            cursor = first + count;
        }
        assert_eq!(cursor, 7777);
    }

    #[test]
    fn test_fewer_items_than_one_block() {
        // Workers get nothing; the dispatcher takes everything.
        let all = shares(5, 8, 3).unwrap();
        assert_eq!(all[0], (0, 0));
        assert_eq!(all[1], (0, 0));
        assert_eq!(all[2], (0, 0));
        assert_eq!(all[3], (0, 5));
    }

    #[test]
    fn test_empty_workload() {
        for p in 0..=3 {
            assert_eq!(distribute(0, 4, p, 3).unwrap(), (0, 0));
        }
    }

    #[test]
    fn test_invalid_arguments_error() {
        assert!(distribute(100, 0, 0, 4).is_err());
        assert!(distribute(100, 8, 0, 0).is_err());
        assert!(distribute(100, 8, 5, 4).is_err());
    }
}
