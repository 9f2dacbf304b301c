use crate::foundation::math::fract;

/// Shared scalar advanced by exactly one behavior and sampled modulo 1 by its readers.
///
/// Readers never subscribe; they project from [`PhaseSignal::sample`] every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct PhaseSignal {
    value: f64,
}

impl PhaseSignal {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn fract(self) -> f64 {
        fract(self.value)
    }

    /// `fract(value + offset)`; readers use `index / count` as their offset.
    pub fn sample(self, offset: f64) -> f64 {
        fract(self.value + offset)
    }

    pub(crate) fn set(&mut self, value: f64) {
        self.value = value;
    }
}
