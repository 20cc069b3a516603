//! Adaptive-step Dormand-Prince 5(4) integration of small fixed-size systems.

use crate::error::NumericError;
use nalgebra::SVector;
use tfdh_core::Tolerances;

/// A first-order system y' = f(x, y) with `N` components.
///
/// The right-hand side is fallible: models that evaluate an equation of
/// state inside `rhs` surface their own errors through `Self::Error`.
pub trait OdeSystem<const N: usize> {
    type Error: From<NumericError>;

    fn rhs(&mut self, x: f64, y: &SVector<f64, N>) -> Result<SVector<f64, N>, Self::Error>;
}

/// Step-size control for [`AdaptiveStepper`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepControl {
    /// Per-component error bound `abs + rel·|y_i|`.
    pub tolerances: Tolerances,
    pub safety: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Attempted steps (accepted or rejected) before giving up.
    pub max_steps: usize,
}

impl Default for StepControl {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::new(1e-6, 0.0),
            safety: 0.9,
            min_scale: 0.2,
            max_scale: 5.0,
            max_steps: 100_000,
        }
    }
}

// Dormand-Prince tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// fifth minus fourth order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Adaptive stepper that advances a state one accepted step per call.
///
/// Between calls the caller may inspect the state, stop early, or shrink the
/// next step with [`AdaptiveStepper::cap_step`].
#[derive(Clone, Debug)]
pub struct AdaptiveStepper {
    control: StepControl,
    h: f64,
    attempts: usize,
    accepted: usize,
}

impl AdaptiveStepper {
    pub fn new(control: StepControl, initial_step: f64) -> Self {
        Self {
            control,
            h: initial_step,
            attempts: 0,
            accepted: 0,
        }
    }

    /// Step size proposed for the next call.
    pub fn step_size(&self) -> f64 {
        self.h
    }

    pub fn cap_step(&mut self, max: f64) {
        if max > 0.0 && max < self.h {
            self.h = max;
        }
    }

    pub fn accepted_steps(&self) -> usize {
        self.accepted
    }

    fn trial<S, const N: usize>(
        sys: &mut S,
        x: f64,
        y: &SVector<f64, N>,
        h: f64,
    ) -> Result<(SVector<f64, N>, SVector<f64, N>), S::Error>
    where
        S: OdeSystem<N>,
    {
        let k1 = sys.rhs(x, y)?;
        let k2 = sys.rhs(x + C2 * h, &(y + k1 * (A21 * h)))?;
        let k3 = sys.rhs(x + C3 * h, &(y + (k1 * A31 + k2 * A32) * h))?;
        let k4 = sys.rhs(x + C4 * h, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h))?;
        let k5 = sys.rhs(
            x + C5 * h,
            &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h),
        )?;
        let k6 = sys.rhs(
            x + h,
            &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
        )?;
        let y5 = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = sys.rhs(x + h, &y5)?;
        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
        Ok((y5, err))
    }

    /// Advance `(x, y)` by one accepted step toward `x_end`, never past it.
    ///
    /// Rejected trials shrink the step and retry. The step proposed for the
    /// next call is grown or shrunk from the error of the accepted one.
    pub fn apply<S, const N: usize>(
        &mut self,
        sys: &mut S,
        x: &mut f64,
        x_end: f64,
        y: &mut SVector<f64, N>,
    ) -> Result<(), S::Error>
    where
        S: OdeSystem<N>,
    {
        if !(x_end > *x) || !(self.h > 0.0) {
            return Err(NumericError::InvalidArg {
                what: "stepper integrates forward with a positive step",
            }
            .into());
        }

        let order_exp = -1.0 / 5.0;
        loop {
            if self.attempts >= self.control.max_steps {
                return Err(NumericError::StepLimitExceeded {
                    at: *x,
                    steps: self.attempts,
                }
                .into());
            }
            self.attempts += 1;

            let remaining = x_end - *x;
            let final_step = self.h >= remaining;
            let h = if final_step { remaining } else { self.h };

            let (y_new, err) = Self::trial(sys, *x, y, h)?;
            let mut ratio = 0.0f64;
            for i in 0..N {
                let bound = self.control.tolerances.abs + self.control.tolerances.rel * y[i].abs().max(y_new[i].abs());
                ratio = ratio.max(err[i].abs() / bound);
            }
            let finite = y_new.iter().all(|v| v.is_finite());

            if finite && ratio <= 1.0 {
                *x = if final_step { x_end } else { *x + h };
                *y = y_new;
                self.accepted += 1;
                let grow = if ratio == 0.0 {
                    self.control.max_scale
                } else {
                    (self.control.safety * ratio.powf(order_exp)).clamp(1.0, self.control.max_scale)
                };
                self.h = h * grow;
                return Ok(());
            }

            let shrink = if finite && ratio.is_finite() {
                (self.control.safety * ratio.powf(order_exp)).clamp(self.control.min_scale, 1.0)
            } else {
                self.control.min_scale
            };
            self.h = h * shrink;
            if self.h <= f64::EPSILON * x.abs().max(f64::MIN_POSITIVE) {
                return Err(NumericError::StepSizeUnderflow {
                    at: *x,
                    step: self.h,
                }
                .into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    struct Oscillator;

    impl OdeSystem<2> for Oscillator {
        type Error = NumericError;

        fn rhs(&mut self, _x: f64, y: &Vector2<f64>) -> Result<Vector2<f64>, NumericError> {
            Ok(Vector2::new(y[1], -y[0]))
        }
    }

    struct Decay {
        calls: usize,
    }

    impl OdeSystem<1> for Decay {
        type Error = NumericError;

        fn rhs(
            &mut self,
            _x: f64,
            y: &SVector<f64, 1>,
        ) -> Result<SVector<f64, 1>, NumericError> {
            self.calls += 1;
            Ok(-y)
        }
    }

    fn run<S: OdeSystem<N, Error = NumericError>, const N: usize>(
        sys: &mut S,
        control: StepControl,
        x_end: f64,
        y: &mut SVector<f64, N>,
    ) -> Result<usize, NumericError> {
        let mut stepper = AdaptiveStepper::new(control, 1e-3);
        let mut x = 0.0;
        while x < x_end {
            stepper.apply(sys, &mut x, x_end, y)?;
        }
        assert_eq!(x, x_end);
        Ok(stepper.accepted_steps())
    }

    #[test]
    fn harmonic_oscillator_one_period() {
        let control = StepControl {
            tolerances: Tolerances::new(1e-10, 1e-10),
            ..StepControl::default()
        };
        let mut y = Vector2::new(1.0, 0.0);
        run(&mut Oscillator, control, 2.0 * std::f64::consts::PI, &mut y).unwrap();
        assert!((y[0] - 1.0).abs() < 1e-7, "y = {y:?}");
        assert!(y[1].abs() < 1e-7);
    }

    #[test]
    fn exponential_decay() {
        let mut sys = Decay { calls: 0 };
        let mut y = SVector::<f64, 1>::new(1.0);
        let steps = run(&mut sys, StepControl::default(), 5.0, &mut y).unwrap();
        assert!((y[0] - (-5f64).exp()).abs() < 1e-5);
        assert!(steps > 1);
        assert_eq!(sys.calls % 7, 0);
    }

    #[test]
    fn cap_limits_next_step() {
        let mut stepper = AdaptiveStepper::new(StepControl::default(), 1.0);
        stepper.cap_step(0.25);
        assert_eq!(stepper.step_size(), 0.25);
        stepper.cap_step(2.0);
        assert_eq!(stepper.step_size(), 0.25);

        let mut x = 0.0;
        let mut y = SVector::<f64, 1>::new(1.0);
        stepper
            .apply(&mut Decay { calls: 0 }, &mut x, 10.0, &mut y)
            .unwrap();
        assert!(x <= 0.25 + 1e-15);
    }

    #[test]
    fn step_budget_is_enforced() {
        let control = StepControl {
            max_steps: 3,
            ..StepControl::default()
        };
        let mut y = Vector2::new(1.0, 0.0);
        let mut stepper = AdaptiveStepper::new(control, 1e-3);
        let mut x = 0.0;
        let mut result = Ok(());
        for _ in 0..10 {
            result = stepper.apply(&mut Oscillator, &mut x, 100.0, &mut y);
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(
            result,
            Err(NumericError::StepLimitExceeded { steps: 3, .. })
        ));
    }

    #[test]
    fn backwards_span_is_rejected() {
        let mut stepper = AdaptiveStepper::new(StepControl::default(), 1e-3);
        let mut x = 1.0;
        let mut y = Vector2::new(1.0, 0.0);
        let err = stepper
            .apply(&mut Oscillator, &mut x, 0.0, &mut y)
            .unwrap_err();
        assert!(matches!(err, NumericError::InvalidArg { .. }));
    }
}
