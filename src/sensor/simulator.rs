//! Triangle-wave temperature simulator

const MIN_TEMP: f64 = 34.0;
const MAX_TEMP: f64 = 38.0;
const TEMP_INCREMENT: f64 = 0.4;

/// Bounded oscillating temperature generator.
///
/// Each call to [`next_reading`](Self::next_reading) advances the wave by
/// one step and returns the value formatted to one fractional digit.
/// Direction is tested against the thresholds *before* the step is
/// applied, so the flip happens one step late when the step does not
/// evenly divide the range; the value is clamped back into bounds
/// afterwards. Downstream consumers depend on the exact sequence this
/// produces, so the ordering of the threshold test and the step must not
/// change.
#[derive(Debug, Clone)]
pub struct TemperatureSimulator {
    current: f64,
    min: f64,
    max: f64,
    step: f64,
    increasing: bool,
}

impl TemperatureSimulator {
    /// Create a simulator with the default 34.0–38.0 range and 0.4 step
    pub fn new() -> Self {
        Self::with_config(MIN_TEMP, MAX_TEMP, TEMP_INCREMENT)
    }

    /// Create a simulator with a custom range and step, starting at `min`
    pub fn with_config(min: f64, max: f64, step: f64) -> Self {
        Self {
            current: min,
            min,
            max,
            step,
            increasing: true,
        }
    }

    /// Advance the wave by one step and return the new reading
    pub fn next_reading(&mut self) -> String {
        if self.current >= self.max {
            self.increasing = false;
        } else if self.current <= self.min {
            self.increasing = true;
        }

        self.current += if self.increasing {
            self.step
        } else {
            -self.step
        };
        self.current = self.current.clamp(self.min, self.max);

        format!("{:.1}", self.current)
    }
}

impl Default for TemperatureSimulator {
    fn default() -> Self {
        Self::new()
    }
}
