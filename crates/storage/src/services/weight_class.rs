use std::str::FromStr;

use rust_decimal::Decimal;

use super::classification::UNCLASSIFIED;
use crate::models::Gender;

/// Standard men's divisions, lightest first.
pub const MALE_DIVISIONS: &[&str] = &[
    "-60kg", "-66kg", "-73kg", "-81kg", "-90kg", "-100kg", "+100kg",
];

/// Standard women's divisions, lightest first.
pub const FEMALE_DIVISIONS: &[&str] = &[
    "-48kg", "-52kg", "-57kg", "-63kg", "-70kg", "-78kg", "+78kg",
];

pub fn weight_divisions(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Male => MALE_DIVISIONS,
        Gender::Female => FEMALE_DIVISIONS,
    }
}

/// Numeric bound encoded in a division label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    /// `-Nkg`: weights up to and including N.
    UpTo(Decimal),
    /// `+Nkg`: weights strictly above N.
    Over(Decimal),
}

impl Division {
    pub fn admits(&self, weight: Decimal) -> bool {
        match *self {
            Self::UpTo(limit) => weight <= limit,
            Self::Over(floor) => weight > floor,
        }
    }
}

/// Parses labels like `-73kg` or `+100kg`. The `kg` suffix is optional.
pub fn parse_division(label: &str) -> Option<Division> {
    let label = label.trim();
    let number = label
        .strip_suffix("kg")
        .or_else(|| label.strip_suffix("KG"))
        .unwrap_or(label);

    if let Some(limit) = number.strip_prefix('-') {
        Decimal::from_str(limit).ok().map(Division::UpTo)
    } else if let Some(floor) = number.strip_prefix('+') {
        Decimal::from_str(floor).ok().map(Division::Over)
    } else {
        None
    }
}

/// Places a body weight into the standard division table for `gender`.
///
/// Non-positive weights resolve to [`UNCLASSIFIED`].
pub fn bucket_weight_class(gender: Gender, weight: Decimal) -> &'static str {
    if weight <= Decimal::ZERO {
        return UNCLASSIFIED;
    }

    weight_divisions(gender)
        .iter()
        .copied()
        .find(|label| parse_division(label).is_some_and(|d| d.admits(weight)))
        .unwrap_or(UNCLASSIFIED)
}
