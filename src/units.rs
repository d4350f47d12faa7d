/// Display unit for benchmark durations.
///
/// Catch2 records every estimate in nanoseconds, so all conversions start
/// from nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
    #[default]
    Nanoseconds,
}

impl TimeUnit {
    pub fn all() -> &'static [TimeUnit] {
        &[
            TimeUnit::Seconds,
            TimeUnit::Milliseconds,
            TimeUnit::Microseconds,
            TimeUnit::Nanoseconds,
        ]
    }

    /// Multiplier taking a nanosecond value into this unit
    pub fn scale(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1e-9,
            TimeUnit::Milliseconds => 1e-6,
            TimeUnit::Microseconds => 1e-3,
            TimeUnit::Nanoseconds => 1.0,
        }
    }

    pub fn from_nanos(&self, nanos: f64) -> f64 {
        nanos * self.scale()
    }

    pub fn to_nanos(&self, value: f64) -> f64 {
        value / self.scale()
    }

    /// Element-wise conversion of a nanosecond series
    pub fn convert(&self, nanos: &[f64]) -> Vec<f64> {
        nanos.iter().map(|&v| self.from_nanos(v)).collect()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Microseconds => "µs",
            TimeUnit::Nanoseconds => "ns",
        }
    }

    pub fn axis_label(&self) -> String {
        format!("Time in {}.", self.symbol())
    }
}
