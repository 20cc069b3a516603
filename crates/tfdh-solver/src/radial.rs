//! Volume integrals of radially sampled quantities.

use crate::error::SolverResult;
use std::f64::consts::PI;
use tfdh_numerics::{CubicSpline, QuadratureConfig};

const RADIAL_QUADRATURE: QuadratureConfig = QuadratureConfig {
    abs: 1e-6,
    rel: 1e-6,
    max_subintervals: 1000,
};

fn volume_weighted(radii: &[f64], values: &[f64]) -> SolverResult<CubicSpline> {
    let weighted: Vec<f64> = radii
        .iter()
        .zip(values)
        .map(|(&r, &v)| 4.0 * PI * r * r * v)
        .collect();
    Ok(CubicSpline::new(radii, &weighted)?)
}

/// ∫ 4πr² f(r) dr over the sampled domain, with f interpolated by a cubic
/// spline through the weighted samples.
pub fn integrate_over_radius(radii: &[f64], values: &[f64]) -> SolverResult<f64> {
    Ok(volume_weighted(radii, values)?.integral(&RADIAL_QUADRATURE)?)
}

/// Running volume integral from the innermost sample up to each sample.
///
/// The first entry is zero and the result has one entry per sample.
pub fn accumulate_over_radius(radii: &[f64], values: &[f64]) -> SolverResult<Vec<f64>> {
    let segments = volume_weighted(radii, values)?.segment_integrals(&RADIAL_QUADRATURE)?;
    let mut total = 0.0;
    let mut out = Vec::with_capacity(radii.len());
    out.push(0.0);
    out.extend(segments.into_iter().map(|s| {
        total += s;
        total
    }));
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn uniform_density_scales_with_volume(c in 1e-3f64..1e3, outer in 1e-9f64..1.0) {
            let r: Vec<f64> = (0..101).map(|i| outer * i as f64 / 100.0).collect();
            let values = vec![c; r.len()];
            let sphere = 4.0 / 3.0 * PI * outer.powi(3) * c;
            let total = integrate_over_radius(&r, &values).unwrap();
            prop_assert!((total / sphere - 1.0).abs() < 1e-3);
            let partial = accumulate_over_radius(&r, &values).unwrap();
            prop_assert!(partial.windows(2).all(|w| w[1] >= w[0]));
        }
    }
}
