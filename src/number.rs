//! A numeric literal value that is either an exact 64-bit integer or a double.
//!
//! Equality, ordering, and hashing are defined on the numeric *value*, so
//! `Integer(5)` and `Double(5.0)` are interchangeable everywhere a
//! `Number64` is compared or used as a map key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// 2^63 as a double; the first value past the end of the i64 range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number64 {
    Integer(i64),
    Double(f64),
}

impl Number64 {
    pub fn is_integer(&self) -> bool {
        matches!(self, Number64::Integer(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Number64::Double(_))
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Number64::Double(d) if d.is_infinite())
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Number64::Double(d) if d.is_nan())
    }

    /// The value as a double. Integers beyond 2^53 lose precision.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Number64::Integer(i) => i as f64,
            Number64::Double(d) => d,
        }
    }

    /// The exact integer this value denotes, if there is one.
    ///
    /// Doubles qualify when they are integral and inside the i64 range;
    /// `-0.0` maps to `0`.
    pub fn as_exact_i64(&self) -> Option<i64> {
        match *self {
            Number64::Integer(i) => Some(i),
            Number64::Double(d) => {
                if d.is_finite() && d.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&d) {
                    Some(d as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Value hash, consistent with `==`.
    ///
    /// Anything with an exact integer value hashes like that integer, folding
    /// the high and low halves together. Remaining doubles fold their bit
    /// pattern the same way, with every NaN collapsing to one hash.
    pub fn value_hash(&self) -> i32 {
        let bits = match self.as_exact_i64() {
            Some(i) => i,
            None if self.is_nan() => f64::NAN.to_bits() as i64,
            None => self.to_f64().to_bits() as i64,
        };
        (bits as i32) ^ ((bits >> 32) as i32)
    }

    /// Total order over numeric values. NaN sorts below everything and equals itself.
    pub fn compare(&self, other: &Number64) -> Ordering {
        match (*self, *other) {
            (Number64::Integer(a), Number64::Integer(b)) => a.cmp(&b),
            (Number64::Double(a), Number64::Double(b)) => compare_doubles(a, b),
            (Number64::Integer(a), Number64::Double(b)) => compare_mixed(a, b),
            (Number64::Double(a), Number64::Integer(b)) => compare_mixed(b, a).reverse(),
        }
    }
}

fn compare_doubles(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares an integer against a double without rounding the integer.
fn compare_mixed(int: i64, double: f64) -> Ordering {
    if double.is_nan() {
        return Ordering::Greater;
    }
    if double >= I64_LIMIT {
        return Ordering::Less;
    }
    if double < -I64_LIMIT {
        return Ordering::Greater;
    }
    let whole = double.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(double - whole)).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

impl PartialEq for Number64 {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Number64 {}

impl PartialOrd for Number64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Number64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Number64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.value_hash());
    }
}

impl From<i64> for Number64 {
    fn from(value: i64) -> Self {
        Number64::Integer(value)
    }
}

impl From<i32> for Number64 {
    fn from(value: i32) -> Self {
        Number64::Integer(value as i64)
    }
}

impl From<f64> for Number64 {
    fn from(value: f64) -> Self {
        Number64::Double(value)
    }
}

impl TryFrom<&serde_json::Number> for Number64 {
    type Error = ();

    fn try_from(number: &serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(i) = number.as_i64() {
            Ok(Number64::Integer(i))
        } else if let Some(d) = number.as_f64() {
            Ok(Number64::Double(d))
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Number64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number64::Integer(i) => write!(f, "{i}"),
            Number64::Double(d) => f.write_str(&crate::serializer::format_double(*d)),
        }
    }
}
