//! Simple binary logistic regression.
//!
//! Newton-Raphson on the log-likelihood with an explicit intercept column,
//! reporting Wald odds ratios, confidence bounds, and p-values per covariate.
//! Quasi-complete separation makes the MLE diverge; that surfaces as a
//! `ConvergenceFailure` naming the suspect covariate so the caller can drop
//! it and refit.

use crate::error::{Result, StatsError};
use crate::normal::{normal_quantile, two_sided_p};

const MAX_ITERATIONS: usize = 25;
const TOLERANCE: f64 = 1e-8;
/// A coefficient this large means an odds ratio beyond any plausible effect;
/// the optimizer is walking toward infinity.
const DIVERGENCE_BOUND: f64 = 30.0;

/// Wald estimate for one model term.
#[derive(Debug, Clone, PartialEq)]
pub struct CovariateEffect {
    pub name: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub odds_ratio: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub p_value: f64,
}

/// Fit `outcome ~ intercept + covariates` by maximum likelihood.
///
/// `alpha` sets the confidence level of the odds-ratio bounds (0.05 gives
/// 95% intervals). The returned table starts with the intercept term.
pub fn simple_logistic_regression(
    outcome: &[bool],
    covariates: &[(String, Vec<f64>)],
    alpha: f64,
) -> Result<Vec<CovariateEffect>> {
    if outcome.is_empty() {
        return Err(StatsError::InvalidInput(
            "empty outcome vector".to_string(),
        ));
    }
    if covariates.is_empty() {
        return Err(StatsError::InvalidInput("no covariates".to_string()));
    }
    if !(0.0..1.0).contains(&alpha) || alpha == 0.0 {
        return Err(StatsError::InvalidInput(format!(
            "alpha {alpha} outside (0, 1)"
        )));
    }
    for (name, values) in covariates {
        if values.len() != outcome.len() {
            return Err(StatsError::InvalidInput(format!(
                "covariate '{name}' has {} values for {} outcomes",
                values.len(),
                outcome.len()
            )));
        }
    }

    let observations = outcome.len();
    let terms = covariates.len() + 1;

    // Design matrix rows with the intercept column first.
    let design: Vec<Vec<f64>> = (0..observations)
        .map(|row| {
            let mut values = Vec::with_capacity(terms);
            values.push(1.0);
            for (_, column) in covariates {
                values.push(column[row]);
            }
            values
        })
        .collect();

    let mut beta = vec![0.0; terms];
    let mut converged = false;
    let mut information = vec![vec![0.0; terms]; terms];

    for _ in 0..MAX_ITERATIONS {
        let mut gradient = vec![0.0; terms];
        for cell in information.iter_mut().flatten() {
            *cell = 0.0;
        }

        for (row, &observed) in design.iter().zip(outcome.iter()) {
            let eta: f64 = row.iter().zip(beta.iter()).map(|(x, b)| x * b).sum();
            let mu = 1.0 / (1.0 + (-eta).exp());
            let weight = mu * (1.0 - mu);
            let residual = f64::from(u8::from(observed)) - mu;
            for j in 0..terms {
                gradient[j] += row[j] * residual;
                for k in 0..terms {
                    information[j][k] += row[j] * weight * row[k];
                }
            }
        }

        let Some(step) = solve(&information, &gradient) else {
            return Err(diverged(covariates, &beta));
        };
        for (b, delta) in beta.iter_mut().zip(step.iter()) {
            *b += delta;
        }

        if beta.iter().any(|b| b.abs() > DIVERGENCE_BOUND) {
            return Err(diverged(covariates, &beta));
        }
        if step.iter().all(|delta| delta.abs() < TOLERANCE) {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(diverged(covariates, &beta));
    }

    let Some(covariance) = invert(&information) else {
        return Err(diverged(covariates, &beta));
    };
    let critical = normal_quantile(1.0 - alpha / 2.0);

    let mut effects = Vec::with_capacity(terms);
    let names = std::iter::once("intercept").chain(covariates.iter().map(|(name, _)| name.as_str()));
    for (index, name) in names.enumerate() {
        let coefficient = beta[index];
        let std_error = covariance[index][index].sqrt();
        effects.push(CovariateEffect {
            name: name.to_string(),
            coefficient,
            std_error,
            odds_ratio: coefficient.exp(),
            ci_lower: (coefficient - critical * std_error).exp(),
            ci_upper: (coefficient + critical * std_error).exp(),
            p_value: two_sided_p(coefficient / std_error),
        });
    }
    Ok(effects)
}

/// Name the covariate most likely responsible for a diverging fit: the
/// non-intercept term with the largest coefficient magnitude.
fn diverged(covariates: &[(String, Vec<f64>)], beta: &[f64]) -> StatsError {
    let mut suspect = 0usize;
    let mut largest = f64::NEG_INFINITY;
    for (index, value) in beta.iter().enumerate().skip(1) {
        if value.abs() > largest {
            largest = value.abs();
            suspect = index - 1;
        }
    }
    StatsError::ConvergenceFailure {
        covariate: covariates
            .get(suspect)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "intercept".to_string()),
    }
}

/// Solve `matrix * x = rhs` by Gaussian elimination with partial pivoting.
fn solve(matrix: &[Vec<f64>], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = rhs.len();
    let mut augmented: Vec<Vec<f64>> = matrix
        .iter()
        .zip(rhs.iter())
        .map(|(row, value)| {
            let mut extended = row.clone();
            extended.push(*value);
            extended
        })
        .collect();

    for pivot in 0..n {
        let best = (pivot..n).max_by(|&a, &b| {
            augmented[a][pivot]
                .abs()
                .total_cmp(&augmented[b][pivot].abs())
        })?;
        if augmented[best][pivot].abs() < 1e-12 {
            return None;
        }
        augmented.swap(pivot, best);

        let pivot_row = augmented[pivot].clone();
        for row in augmented.iter_mut().skip(pivot + 1) {
            let factor = row[pivot] / pivot_row[pivot];
            for column in pivot..=n {
                row[column] -= factor * pivot_row[column];
            }
        }
    }

    let mut solution = vec![0.0; n];
    for pivot in (0..n).rev() {
        let mut value = augmented[pivot][n];
        for column in pivot + 1..n {
            value -= augmented[pivot][column] * solution[column];
        }
        solution[pivot] = value / augmented[pivot][pivot];
    }
    Some(solution)
}

/// Invert a symmetric positive-definite matrix by Gauss-Jordan elimination.
fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut work: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut extended = row.clone();
            extended.extend((0..n).map(|column| f64::from(u8::from(column == index))));
            extended
        })
        .collect();

    for pivot in 0..n {
        let best = (pivot..n).max_by(|&a, &b| work[a][pivot].abs().total_cmp(&work[b][pivot].abs()))?;
        if work[best][pivot].abs() < 1e-12 {
            return None;
        }
        work.swap(pivot, best);

        let scale = work[pivot][pivot];
        for value in work[pivot].iter_mut() {
            *value /= scale;
        }
        let pivot_row = work[pivot].clone();
        for (row, values) in work.iter_mut().enumerate() {
            if row == pivot {
                continue;
            }
            let factor = values[pivot];
            for column in 0..2 * n {
                values[column] -= factor * pivot_row[column];
            }
        }
    }

    Some(work.into_iter().map(|row| row[n..].to_vec()).collect())
}
