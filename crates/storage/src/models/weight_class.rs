use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tournament-scoped weight class: an upper bound in kg and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeightClass {
    pub limit: Decimal,
    pub label: String,
}

impl WeightClass {
    pub fn new(limit: Decimal, label: impl Into<String>) -> Self {
        Self {
            limit,
            label: label.into(),
        }
    }

    /// `+N` classes are open-ended: `limit` is their floor, not a ceiling.
    pub fn is_open(&self) -> bool {
        self.label.trim_start().starts_with('+')
    }

    pub fn ceiling(&self) -> Option<Decimal> {
        (!self.is_open()).then_some(self.limit)
    }

    pub fn admits(&self, weight: Decimal) -> bool {
        match self.ceiling() {
            Some(ceiling) => weight <= ceiling,
            None => weight > self.limit,
        }
    }
}
