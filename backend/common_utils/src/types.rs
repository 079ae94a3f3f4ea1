use serde::{Deserialize, Serialize};

/// An amount denominated in the major unit of its currency (e.g. dollars),
/// as exchanged with both the processor and the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloatMajorUnit(f64);

impl FloatMajorUnit {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// String form the processor expects in `amount` fields.
    pub fn to_amount_string(self) -> String {
        format!("{:.2}", self.0)
    }
}
