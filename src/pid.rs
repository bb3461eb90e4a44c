//! PID controller and low-pass filter primitives.
//!
//! These are the signal-processing building blocks [`crate::adlfu::AdlfuCache`] uses to
//! retune the decaying-LFU engine's time constant from measured statistics. Both types
//! are general-purpose and carry no cache-specific knowledge.

/// A first-order low-pass filter.
///
/// `update` folds a new sample into the filter's running output, weighted by the
/// filter's characteristic time constant `T` against the caller-supplied sample
/// interval `dt`: `output' = (x·dt + output·T) / (T + dt)`.
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    time_constant: f64,
    output: f64,
}

impl LowPassFilter {
    /// Creates a filter with the given characteristic time constant and zeroed output.
    pub fn new(time_constant: f64) -> Self {
        Self {
            time_constant,
            output: 0.0,
        }
    }

    /// Folds in a new sample taken `dt` time units after the previous one and returns
    /// the filtered output.
    pub fn update(&mut self, value: f64, dt: f64) -> f64 {
        self.output = (value * dt + self.output * self.time_constant) / (self.time_constant + dt);
        self.output
    }

    /// The filter's current output without taking a new sample.
    pub fn output(&self) -> f64 {
        self.output
    }
}

/// Clamps `value` into `[min, max]`.
fn limit(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// A standard-form PID controller with anti-windup and a derivative low-pass filter.
///
/// Output is always clamped to `[-1.0, 1.0]`. The derivative term is filtered with time
/// constant `Ld`, which both smooths derivative noise and avoids the divide-by-zero a
/// naive derivative would hit on a `dt = 0` step input. The integral term is clamped to
/// `[output_min - span, output_max + span]` (where `span = output_max - output_min`) to
/// bound windup.
#[derive(Debug, Clone, Copy)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    ld: f64,
    le: f64,
    error: f64,
    integ: f64,
    deriv: f64,
    output: f64,
}

const OUTPUT_MIN: f64 = -1.0;
const OUTPUT_MAX: f64 = 1.0;
const INTEG_MIN: f64 = OUTPUT_MIN - (OUTPUT_MAX - OUTPUT_MIN);
const INTEG_MAX: f64 = OUTPUT_MAX + (OUTPUT_MAX - OUTPUT_MIN);

impl PidController {
    /// Constructs a controller directly from its gains and filter time constants.
    pub fn new(kp: f64, ki: f64, kd: f64, ld: f64, le: f64) -> Self {
        let integ = (OUTPUT_MIN + OUTPUT_MAX) / 2.0;
        Self {
            kp,
            ki,
            kd,
            ld,
            le,
            error: 0.0,
            integ,
            deriv: 0.0,
            output: integ,
        }
    }

    /// Standard-form constructor: `Ti` is how far in the past the integral term looks,
    /// `Td` is how far in the future the derivative term looks. `Ld` defaults to
    /// `Td/8`, `Le` to `Ld/8`.
    pub fn standard_form(kp: f64, ti: f64, td: f64, ld: Option<f64>, le: Option<f64>) -> Self {
        let ld = ld.unwrap_or(td / 8.0);
        let le = le.unwrap_or(ld / 8.0);
        Self::new(kp, 1.0 / ti, td, ld, le)
    }

    /// Classic Ziegler-Nichols tuning from an ultimate gain `Ku` and ultimate
    /// oscillation period `Tu`.
    pub fn ziegler_nichols(ku: f64, tu: f64, ld: Option<f64>, le: Option<f64>) -> Self {
        Self::standard_form(0.6 * ku, tu / 2.0, tu / 8.0, ld, le)
    }

    /// Feeds a new `error = demand - measurement` sample taken `dt` time units after
    /// the previous one, returning the clamped control output.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        let mut error = self.kp * error;
        if self.le != 0.0 {
            error = (dt * error + self.le * self.error) / (dt + self.le);
        }
        let integ = limit(
            self.ki * dt * (error + self.error) / 2.0 + self.integ,
            INTEG_MIN,
            INTEG_MAX,
        );
        let deriv = (self.kd * (error - self.error) + self.ld * self.deriv) / (dt + self.ld);
        self.output = limit(error + integ + deriv, OUTPUT_MIN, OUTPUT_MAX);
        self.error = error;
        self.integ = integ;
        self.deriv = deriv;
        self.output
    }

    /// The controller's last computed output, without taking a new sample.
    pub fn output(&self) -> f64 {
        self.output
    }
}
