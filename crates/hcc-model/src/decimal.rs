//! Fixed-precision numeric output.
//!
//! Arithmetic runs on raw `f64`; these wrappers only decide how a value is
//! rendered and serialized. Scores print 4 decimals, money prints 2.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

use serde::{Serialize, Serializer};

/// A RAF score or coefficient.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

/// A dollar amount, usually score times base rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Money(pub f64);

impl Score {
    pub const ZERO: Score = Score(0.0);
    pub const PRECISION: usize = 4;

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn premium(self, base_rate: f64) -> Money {
        Money(self.0 * base_rate)
    }

    /// Renders with an explicit number of decimals.
    pub fn to_fixed(self, decimals: usize) -> String {
        format!("{:.*}", decimals, round_to(self.0, decimals))
    }
}

impl Money {
    pub const PRECISION: usize = 2;

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Avoids printing `-0.0000` for values that round to zero.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    normalize_zero(rounded)
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", Self::PRECISION, round_to(self.0, Self::PRECISION))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", Self::PRECISION, round_to(self.0, Self::PRECISION))
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Score) -> Score {
        Score(self.0 - rhs.0)
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score(-self.0)
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        Score(iter.map(|s| s.0).sum())
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score(value)
    }
}
