//! Expanding-bracket-then-bisect search for the boundary between two sets.
//!
//! The classifier only has to say on which side of the boundary a trial
//! point lies. No smoothness of an underlying residual is assumed, so the
//! same routine serves a monotone residual (sign test) and a qualitative
//! outcome such as "the trajectory diverged".

use crate::error::NumericError;
use tfdh_core::Tolerances;
use tracing::debug;

/// Position of a trial point relative to the sought boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Trial is too low; the boundary lies at larger values.
    Below,
    /// Trial is too high; the boundary lies at smaller values.
    Above,
    /// Trial is exactly on the boundary.
    Boundary,
}

/// How trial points move away from the start while bracketing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expansion {
    /// `start ± k·step` for k = 1, 2, ...
    Linear { step: f64 },
    /// `start ± seed·2^k` for k = 0, 1, ...; from zero this is ±1, ±2, ±4 for a unit seed.
    Doubling { seed: f64 },
}

impl Expansion {
    fn offset(self, attempt: usize) -> f64 {
        match self {
            Expansion::Linear { step } => step * (attempt + 1) as f64,
            Expansion::Doubling { seed } => seed * 2f64.powi(attempt as i32),
        }
    }
}

/// Budgets and tolerances for [`find_boundary`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BracketLimits {
    pub max_expansions: usize,
    pub max_bisections: usize,
    /// Width at which bisection stops; zero tolerances bisect to underflow.
    pub tolerances: Tolerances,
}

impl Default for BracketLimits {
    fn default() -> Self {
        Self {
            max_expansions: 100,
            max_bisections: 100,
            tolerances: Tolerances::new(0.0, 0.0),
        }
    }
}

/// A pair of points classified on opposite sides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    pub below: f64,
    pub above: f64,
}

impl Bracket {
    pub fn width(&self) -> f64 {
        (self.above - self.below).abs()
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.below + self.above)
    }
}

/// Outcome of the expansion phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bracketing {
    /// A trial landed on the boundary itself.
    Exact(f64),
    Bracketed(Bracket),
}

/// Walk away from `start` until the classification flips.
///
/// The direction of travel follows the classification of `start`: a point
/// that is too high moves down, one that is too low moves up.
pub fn expand_bracket<F, E>(
    start: f64,
    expansion: Expansion,
    max_expansions: usize,
    mut classify: F,
) -> Result<Bracketing, E>
where
    F: FnMut(f64) -> Result<Side, E>,
    E: From<NumericError>,
{
    if !start.is_finite() {
        return Err(NumericError::NonFinite {
            what: "bracket start",
            value: start,
        }
        .into());
    }

    let initial = classify(start)?;
    let direction = match initial {
        Side::Boundary => return Ok(Bracketing::Exact(start)),
        Side::Above => -1.0,
        Side::Below => 1.0,
    };

    let mut last = start;
    let mut trial = start;
    for attempt in 0..max_expansions {
        trial = start + direction * expansion.offset(attempt);
        let side = classify(trial)?;
        debug!(attempt, trial, ?side, "bracket expansion");
        match side {
            Side::Boundary => return Ok(Bracketing::Exact(trial)),
            s if s == initial => last = trial,
            Side::Above => {
                return Ok(Bracketing::Bracketed(Bracket {
                    below: last,
                    above: trial,
                }));
            }
            Side::Below => {
                return Ok(Bracketing::Bracketed(Bracket {
                    below: trial,
                    above: last,
                }));
            }
        }
    }

    Err(NumericError::BracketExhausted {
        attempts: max_expansions,
        last: trial,
    }
    .into())
}

/// Bisect a bracket until its width is within tolerance or the midpoint
/// can no longer be distinguished from an endpoint.
pub fn bisect<F, E>(
    mut bracket: Bracket,
    max_bisections: usize,
    tolerances: Tolerances,
    mut classify: F,
) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<Side, E>,
    E: From<NumericError>,
{
    for _ in 0..max_bisections {
        let mid = bracket.midpoint();
        if mid == bracket.below || mid == bracket.above {
            return Ok(mid);
        }
        match classify(mid)? {
            Side::Boundary => return Ok(mid),
            Side::Below => bracket.below = mid,
            Side::Above => bracket.above = mid,
        }
        let scale = bracket.below.abs().min(bracket.above.abs());
        if bracket.width() <= tolerances.abs + tolerances.rel * scale {
            return Ok(bracket.midpoint());
        }
    }

    Err(NumericError::BisectionExhausted {
        iterations: max_bisections,
        below: bracket.below,
        above: bracket.above,
    }
    .into())
}

/// Expand from `start`, then bisect: the consolidated boundary search used
/// by the chi inversion and the shooting method alike.
pub fn find_boundary<F, E>(
    start: f64,
    expansion: Expansion,
    limits: BracketLimits,
    mut classify: F,
) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<Side, E>,
    E: From<NumericError>,
{
    match expand_bracket(start, expansion, limits.max_expansions, &mut classify)? {
        Bracketing::Exact(x) => Ok(x),
        Bracketing::Bracketed(bracket) => {
            debug!(below = bracket.below, above = bracket.above, "bracket found");
            bisect(bracket, limits.max_bisections, limits.tolerances, classify)
        }
    }
}

/// Classifier for a residual that increases through the boundary.
pub fn side_of_residual(residual: f64) -> Side {
    if residual > 0.0 {
        Side::Above
    } else if residual < 0.0 {
        Side::Below
    } else {
        Side::Boundary
    }
}
