//! Seeded sampling of the eligible population.
//!
//! Reproducibility is the core contract: the draw depends only on the seed
//! and the *set* of eligible identifiers. Candidates are sorted canonically
//! before the draw, so input row order never changes the result, and the
//! generator is a fixed, named algorithm (ChaCha8 seeded from a `u64`) so a
//! rerun anywhere reproduces bit-identical membership and order.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::debug;

use euctr_model::{EudractNumber, InclusionRecord, PipelineError, Result, SamplePlan, StudyConfig};

/// Draw `size` identifiers uniformly without replacement.
///
/// The pool is sorted, then a partial Fisher-Yates shuffle selects the first
/// `size` positions; the selection order is the output order.
pub fn seeded_sample<'a, I>(candidates: I, size: usize, seed: u64) -> Result<Vec<EudractNumber>>
where
    I: IntoIterator<Item = &'a EudractNumber>,
{
    let mut pool: Vec<EudractNumber> = candidates.into_iter().cloned().collect();
    pool.sort();

    if size > pool.len() {
        return Err(PipelineError::InsufficientPopulation {
            requested: size,
            available: pool.len(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for index in 0..size {
        let pick = rng.gen_range(index..pool.len());
        pool.swap(index, pick);
    }
    pool.truncate(size);
    Ok(pool)
}

/// Draw the primary sample and the disjoint replacement pool.
///
/// The replacement draw runs against the eligible population minus the
/// primary sample, under its own seed, so replacing problem trials later
/// never disturbs the primary membership.
pub fn draw_sample_plan(
    population: &[InclusionRecord],
    config: &StudyConfig,
) -> Result<SamplePlan> {
    let eligible: Vec<&EudractNumber> = population
        .iter()
        .filter(|record| record.eligible)
        .map(|record| &record.eudract_number)
        .collect();

    let primary = seeded_sample(
        eligible.iter().copied(),
        config.primary_sample_size,
        config.primary_seed,
    )?;

    let drawn: BTreeSet<&EudractNumber> = primary.iter().collect();
    let remainder = eligible.iter().copied().filter(|id| !drawn.contains(id));
    let replacement = seeded_sample(
        remainder,
        config.replacement_sample_size,
        config.replacement_seed,
    )?;

    debug!(
        eligible_count = eligible.len(),
        primary_count = primary.len(),
        replacement_count = replacement.len(),
        "sample plan drawn"
    );
    Ok(SamplePlan {
        primary,
        replacement,
    })
}
