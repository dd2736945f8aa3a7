//! Proportion estimates and tests.

use crate::error::{Result, StatsError};
use crate::normal::{chi_square_sf, two_sided_p};

/// Default critical value: the two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Normal-approximation confidence interval around a proportion.
///
/// Returns `(lower, point, upper)`. `successes > trials` is the caller's
/// responsibility and propagates as NaN bounds rather than an error.
pub fn confidence_interval(successes: u64, trials: u64, z: f64) -> Result<(f64, f64, f64)> {
    if trials == 0 {
        return Err(StatsError::DivisionByZero {
            context: format!("confidence_interval with {successes} successes over 0 trials"),
        });
    }
    let p = successes as f64 / trials as f64;
    let se = (p * (1.0 - p) / trials as f64).sqrt();
    let margin = z * se;
    Ok((p - margin, p, p + margin))
}

/// Test of equal proportions across groups.
///
/// Two groups use the pooled two-sample z-test and return the signed z
/// statistic with its two-sided normal p-value. Three or more groups return
/// the chi-square homogeneity statistic (k - 1 degrees of freedom) and its
/// upper-tail p-value.
pub fn proportion_z_test(counts: &[u64], totals: &[u64]) -> Result<(f64, f64)> {
    if counts.len() != totals.len() {
        return Err(StatsError::InvalidInput(format!(
            "{} counts against {} totals",
            counts.len(),
            totals.len()
        )));
    }
    if counts.len() < 2 {
        return Err(StatsError::InvalidInput(
            "need at least two groups to compare proportions".to_string(),
        ));
    }
    for (index, (&count, &total)) in counts.iter().zip(totals.iter()).enumerate() {
        if total == 0 {
            return Err(StatsError::InvalidInput(format!(
                "group {index} has zero observations"
            )));
        }
        if count > total {
            return Err(StatsError::InvalidInput(format!(
                "group {index} has {count} successes over {total} observations"
            )));
        }
    }

    let pooled = counts.iter().sum::<u64>() as f64 / totals.iter().sum::<u64>() as f64;

    if counts.len() == 2 {
        let p1 = counts[0] as f64 / totals[0] as f64;
        let p2 = counts[1] as f64 / totals[1] as f64;
        let se = (pooled * (1.0 - pooled) * (1.0 / totals[0] as f64 + 1.0 / totals[1] as f64))
            .sqrt();
        let statistic = (p1 - p2) / se;
        return Ok((statistic, two_sided_p(statistic)));
    }

    let mut statistic = 0.0;
    for (&count, &total) in counts.iter().zip(totals.iter()) {
        let expected_success = total as f64 * pooled;
        let expected_failure = total as f64 * (1.0 - pooled);
        let observed_success = count as f64;
        let observed_failure = (total - count) as f64;
        statistic += (observed_success - expected_success).powi(2) / expected_success
            + (observed_failure - expected_failure).powi(2) / expected_failure;
    }
    let df = (counts.len() - 1) as f64;
    Ok((statistic, chi_square_sf(statistic, df)))
}
