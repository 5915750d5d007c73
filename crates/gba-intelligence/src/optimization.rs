// ABOUTME: Derivative-free Nelder-Mead simplex minimizer used for ARIMA parameter estimation
// ABOUTME: Supports optional box bounds, convergence on function-value spread and an iteration cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Tuning knobs for [`nelder_mead`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadConfig {
    /// Iteration cap
    pub max_iter: usize,
    /// Stop once the spread of function values across the simplex falls below this
    pub tolerance: f64,
    /// Offset used to build the initial simplex around the start point
    pub initial_step: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.1,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
        }
    }
}

/// Outcome of a minimization
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadResult {
    /// Best point found
    pub optimal_point: Vec<f64>,
    /// Objective at `optimal_point`
    pub optimal_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerance was met before the iteration cap
    pub converged: bool,
}

fn clamp_to_bounds(point: &mut [f64], bounds: Option<&[(f64, f64)]>) {
    if let Some(bounds) = bounds {
        for (value, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *value = value.clamp(lo, hi);
        }
    }
}

fn evaluate<F: Fn(&[f64]) -> f64>(f: &F, point: &[f64]) -> f64 {
    let value = f(point);
    if value.is_finite() {
        value
    } else {
        f64::INFINITY
    }
}

/// Along the line from `from` through `to`: `from + coef * (to - from)`
fn blend(from: &[f64], to: &[f64], coef: f64) -> Vec<f64> {
    from.iter()
        .zip(to)
        .map(|(a, b)| coef.mul_add(b - a, *a))
        .collect()
}

/// Minimize `f` starting at `x0`
///
/// Non-finite objective values are treated as `+inf` so the simplex moves away
/// from them. When `bounds` is given every trial point is clamped into it.
pub fn nelder_mead<F>(
    f: F,
    x0: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let dim = x0.len();
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);

    let mut start = x0.to_vec();
    clamp_to_bounds(&mut start, bounds);
    let start_value = evaluate(&f, &start);
    simplex.push((start.clone(), start_value));

    for i in 0..dim {
        let mut vertex = start.clone();
        vertex[i] += config.initial_step;
        clamp_to_bounds(&mut vertex, bounds);
        if (vertex[i] - start[i]).abs() < f64::EPSILON {
            vertex[i] -= 2.0 * config.initial_step;
            clamp_to_bounds(&mut vertex, bounds);
        }
        let value = evaluate(&f, &vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best = simplex[0].1;
        let worst = simplex[dim].1;
        if best.is_finite() && (worst - best).abs() <= config.tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        let mut centroid = vec![0.0; dim];
        for (vertex, _) in &simplex[..dim] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / dim as f64;
            }
        }

        let worst_point = simplex[dim].0.clone();
        let mut reflected = blend(&centroid, &worst_point, -config.alpha);
        clamp_to_bounds(&mut reflected, bounds);
        let reflected_value = evaluate(&f, &reflected);

        if reflected_value < best {
            let mut expanded = blend(&centroid, &worst_point, -config.alpha * config.gamma);
            clamp_to_bounds(&mut expanded, bounds);
            let expanded_value = evaluate(&f, &expanded);
            simplex[dim] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[dim - 1].1 {
            simplex[dim] = (reflected, reflected_value);
            continue;
        }

        let (mut contracted, outside) = if reflected_value < worst {
            (blend(&centroid, &reflected, config.rho), true)
        } else {
            (blend(&centroid, &worst_point, config.rho), false)
        };
        clamp_to_bounds(&mut contracted, bounds);
        let contracted_value = evaluate(&f, &contracted);
        let accept = if outside {
            contracted_value <= reflected_value
        } else {
            contracted_value < worst
        };
        if accept {
            simplex[dim] = (contracted, contracted_value);
            continue;
        }

        let best_point = simplex[0].0.clone();
        for entry in simplex.iter_mut().skip(1) {
            let mut shrunk = blend(&best_point, &entry.0, config.sigma);
            clamp_to_bounds(&mut shrunk, bounds);
            let value = evaluate(&f, &shrunk);
            *entry = (shrunk, value);
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (optimal_point, optimal_value) = simplex.swap_remove(0);

    NelderMeadResult {
        optimal_point,
        optimal_value,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimizes_shifted_quadratic() {
        let result = nelder_mead(
            |p| (p[0] - 1.5).powi(2) + (p[1] + 0.5).powi(2),
            &[0.0, 0.0],
            None,
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert!((result.optimal_point[0] - 1.5).abs() < 1e-3);
        assert!((result.optimal_point[1] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_respects_bounds() {
        let result = nelder_mead(
            |p| (p[0] - 5.0).powi(2),
            &[0.0],
            Some(&[(-1.0, 1.0)]),
            NelderMeadConfig::default(),
        );

        assert!((result.optimal_point[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rosenbrock_within_iteration_cap() {
        let config = NelderMeadConfig {
            max_iter: 5000,
            tolerance: 1e-12,
            ..Default::default()
        };
        let result = nelder_mead(
            |p| (1.0 - p[0]).powi(2) + 100.0 * p[0].mul_add(-p[0], p[1]).powi(2),
            &[-1.2, 1.0],
            None,
            config,
        );

        assert!((result.optimal_point[0] - 1.0).abs() < 1e-2);
        assert!((result.optimal_point[1] - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_reports_non_convergence_when_capped() {
        let config = NelderMeadConfig {
            max_iter: 2,
            tolerance: 0.0,
            ..Default::default()
        };
        let result = nelder_mead(|p| p[0] * p[0], &[10.0], None, config);
        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
    }
}
