//! Constant values
//!
//! Constant arithmetic is exact: integers are big integers, floats are big
//! rationals and complex values are pairs of rationals. Values are only
//! rounded when they are converted to a typed float.

use std::fmt;

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;

use super::Basic;
use crate::frontend::lexer::tokens::{Literal, TokenKind};

/// Largest power exponent folded on constants
const MAX_POW: u32 = 4096;

static MAX_FLOAT64: Lazy<BigRational> =
    Lazy::new(|| BigRational::from_float(f64::MAX).unwrap_or_else(BigRational::zero));
static MAX_FLOAT32: Lazy<BigRational> =
    Lazy::new(|| BigRational::from_float(f32::MAX as f64).unwrap_or_else(BigRational::zero));

/// A constant value
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    String(String),
    Int(BigInt),
    Float(BigRational),
    Complex(BigRational, BigRational),
}

/// Constant evaluation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstError {
    #[error("division by zero")]
    DivByZero,
    #[error("constant {value} overflows {ty}")]
    Overflow { value: String, ty: &'static str },
    #[error("constant {value} truncated to integer")]
    Truncated { value: String },
    #[error("cannot use constant {value} as {ty}")]
    Mismatch { value: String, ty: &'static str },
    #[error("invalid operation: operator {op} not defined on {value}")]
    InvalidOp { op: &'static str, value: String },
    #[error("constant exponent {0} out of range")]
    Exponent(String),
}

impl ConstValue {
    /// Text for messages; long integers are shortened to scientific form
    pub fn brief(&self) -> String {
        let text = self.to_string();
        let digits = text.trim_start_matches('-');
        if text.len() <= 24 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return text;
        }
        let sign = if text.starts_with('-') { "-" } else { "" };
        let (head, rest) = digits.split_at(1);
        let frac = rest[..rest.len().min(5)].trim_end_matches('0');
        if frac.is_empty() {
            format!("{}{}e+{}", sign, head, rest.len())
        } else {
            format!("{}{}.{}e+{}", sign, head, frac, rest.len())
        }
    }

    /// The value of a literal token
    pub fn from_literal(lit: &Literal) -> Option<ConstValue> {
        Some(match lit {
            Literal::Int(v) => ConstValue::Int(v.clone()),
            Literal::Float(v) => ConstValue::Float(v.clone()),
            Literal::Imaginary(v) => ConstValue::Complex(BigRational::zero(), v.clone()),
            Literal::String(s) => ConstValue::String(s.clone()),
            Literal::Rune(c) => ConstValue::Int(BigInt::from(*c as u32)),
            Literal::Ident(_) => return None,
        })
    }

    pub fn int(v: impl Into<BigInt>) -> ConstValue {
        ConstValue::Int(v.into())
    }

    /// Numeric rank: int 0, float 1, complex 2
    fn rank(&self) -> Option<u8> {
        match self {
            ConstValue::Int(_) => Some(0),
            ConstValue::Float(_) => Some(1),
            ConstValue::Complex(..) => Some(2),
            _ => None,
        }
    }

    fn to_rank(
        &self,
        rank: u8,
    ) -> ConstValue {
        match (self, rank) {
            (ConstValue::Int(i), 1) => ConstValue::Float(BigRational::from_integer(i.clone())),
            (ConstValue::Int(i), 2) => {
                ConstValue::Complex(BigRational::from_integer(i.clone()), BigRational::zero())
            }
            (ConstValue::Float(f), 2) => ConstValue::Complex(f.clone(), BigRational::zero()),
            (v, _) => v.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            ConstValue::Int(i) => i.is_zero(),
            ConstValue::Float(f) => f.is_zero(),
            ConstValue::Complex(re, im) => re.is_zero() && im.is_zero(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an integer, if it is integral
    pub fn as_int(&self) -> Option<BigInt> {
        match self {
            ConstValue::Int(i) => Some(i.clone()),
            ConstValue::Float(f) if f.is_integer() => Some(f.to_integer()),
            ConstValue::Complex(re, im) if im.is_zero() && re.is_integer() => Some(re.to_integer()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(|i| i.to_i64())
    }

    /// The untyped basic kind this value has when it appears in source
    pub fn untyped_kind(&self) -> Basic {
        match self {
            ConstValue::Bool(_) => Basic::UntypedBool,
            ConstValue::String(_) => Basic::UntypedString,
            ConstValue::Int(_) => Basic::UntypedInteger,
            ConstValue::Float(_) => Basic::UntypedFloat,
            ConstValue::Complex(..) => Basic::UntypedComplex,
        }
    }

    /// Convert to the representation of `basic`, checking the value fits
    ///
    /// Integers must be exact and in range. Float values are rounded to
    /// `float32`; values beyond the largest finite float overflow.
    pub fn represent(
        &self,
        basic: Basic,
    ) -> Result<ConstValue, ConstError> {
        let mismatch = || ConstError::Mismatch {
            value: self.brief(),
            ty: basic.name(),
        };
        match basic {
            Basic::Bool | Basic::UntypedBool => match self {
                ConstValue::Bool(_) => Ok(self.clone()),
                _ => Err(mismatch()),
            },
            Basic::String | Basic::UntypedString => match self {
                ConstValue::String(_) => Ok(self.clone()),
                _ => Err(mismatch()),
            },
            Basic::UntypedInteger | Basic::UntypedRune => match self.rank() {
                Some(_) => self.as_int().map(ConstValue::Int).ok_or_else(|| ConstError::Truncated {
                    value: self.brief(),
                }),
                None => Err(mismatch()),
            },
            Basic::UntypedFloat => match self {
                ConstValue::Int(_) | ConstValue::Float(_) => Ok(self.to_rank(1)),
                ConstValue::Complex(re, im) if im.is_zero() => Ok(ConstValue::Float(re.clone())),
                _ => Err(mismatch()),
            },
            Basic::UntypedComplex => match self.rank() {
                Some(_) => Ok(self.to_rank(2)),
                None => Err(mismatch()),
            },
            Basic::Num => match self.rank() {
                Some(_) => Ok(self.clone()),
                None => Err(mismatch()),
            },
            b if b.is_integer() => {
                if self.rank().is_none() {
                    return Err(mismatch());
                }
                let i = self.as_int().ok_or_else(|| ConstError::Truncated {
                    value: self.brief(),
                })?;
                let (min, max) = int_range(b);
                if i < min || i > max {
                    return Err(ConstError::Overflow {
                        value: self.brief(),
                        ty: b.name(),
                    });
                }
                Ok(ConstValue::Int(i))
            }
            b if b.is_float() => {
                let f = match self {
                    ConstValue::Int(i) => BigRational::from_integer(i.clone()),
                    ConstValue::Float(f) => f.clone(),
                    ConstValue::Complex(re, im) if im.is_zero() => re.clone(),
                    _ => return Err(mismatch()),
                };
                Ok(ConstValue::Float(round_float(&f, b, self)?))
            }
            b if b.is_complex() => {
                let part = match b {
                    Basic::Complex64 => Basic::Float32,
                    _ => Basic::Float64,
                };
                match self.to_rank(2) {
                    ConstValue::Complex(re, im) => Ok(ConstValue::Complex(
                        round_float(&re, part, self)?,
                        round_float(&im, part, self)?,
                    )),
                    _ => Err(mismatch()),
                }
            }
            _ => Err(mismatch()),
        }
    }

    /// Apply a unary operator
    pub fn unary(
        &self,
        op: TokenKind,
    ) -> Result<ConstValue, ConstError> {
        let invalid = || ConstError::InvalidOp {
            op: op.as_str(),
            value: self.brief(),
        };
        match (op, self) {
            (TokenKind::Add, v) if v.rank().is_some() => Ok(v.clone()),
            (TokenKind::Sub, ConstValue::Int(i)) => Ok(ConstValue::Int(-i)),
            (TokenKind::Sub, ConstValue::Float(f)) => Ok(ConstValue::Float(-f)),
            (TokenKind::Sub, ConstValue::Complex(re, im)) => Ok(ConstValue::Complex(-re, -im)),
            (TokenKind::Not, ConstValue::Bool(b)) => Ok(ConstValue::Bool(!b)),
            _ => Err(invalid()),
        }
    }

    /// Apply a binary arithmetic or logical operator
    ///
    /// Operands of different numeric kinds are promoted to the larger
    /// kind first. Integer division truncates.
    pub fn binary(
        &self,
        op: TokenKind,
        other: &ConstValue,
    ) -> Result<ConstValue, ConstError> {
        let invalid = || ConstError::InvalidOp {
            op: op.as_str(),
            value: self.brief(),
        };
        if let (ConstValue::Bool(a), ConstValue::Bool(b)) = (self, other) {
            return match op {
                TokenKind::LogicalAnd => Ok(ConstValue::Bool(*a && *b)),
                TokenKind::LogicalOr => Ok(ConstValue::Bool(*a || *b)),
                _ => Err(invalid()),
            };
        }
        if let (ConstValue::String(a), ConstValue::String(b)) = (self, other) {
            return match op {
                TokenKind::Add => Ok(ConstValue::String(format!("{}{}", a, b))),
                _ => Err(invalid()),
            };
        }
        if op == TokenKind::Pow {
            return self.pow(other);
        }
        let rank = match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a.max(b),
            _ => return Err(invalid()),
        };
        match (self.to_rank(rank), other.to_rank(rank)) {
            (ConstValue::Int(a), ConstValue::Int(b)) => match op {
                TokenKind::Add => Ok(ConstValue::Int(a + b)),
                TokenKind::Sub => Ok(ConstValue::Int(a - b)),
                TokenKind::Mul => Ok(ConstValue::Int(a * b)),
                TokenKind::Div | TokenKind::Rem if b.is_zero() => Err(ConstError::DivByZero),
                TokenKind::Div => Ok(ConstValue::Int(a / b)),
                TokenKind::Rem => Ok(ConstValue::Int(a % b)),
                TokenKind::Pipe => Ok(ConstValue::Int(a | b)),
                _ => Err(invalid()),
            },
            (ConstValue::Float(a), ConstValue::Float(b)) => match op {
                TokenKind::Add => Ok(ConstValue::Float(a + b)),
                TokenKind::Sub => Ok(ConstValue::Float(a - b)),
                TokenKind::Mul => Ok(ConstValue::Float(a * b)),
                TokenKind::Div if b.is_zero() => Err(ConstError::DivByZero),
                TokenKind::Div => Ok(ConstValue::Float(a / b)),
                _ => Err(invalid()),
            },
            (ConstValue::Complex(ar, ai), ConstValue::Complex(br, bi)) => match op {
                TokenKind::Add => Ok(ConstValue::Complex(ar + br, ai + bi)),
                TokenKind::Sub => Ok(ConstValue::Complex(ar - br, ai - bi)),
                TokenKind::Mul => Ok(ConstValue::Complex(
                    &ar * &br - &ai * &bi,
                    &ar * &bi + &ai * &br,
                )),
                TokenKind::Div => {
                    let denom = &br * &br + &bi * &bi;
                    if denom.is_zero() {
                        return Err(ConstError::DivByZero);
                    }
                    Ok(ConstValue::Complex(
                        (&ar * &br + &ai * &bi) / &denom,
                        (&ai * &br - &ar * &bi) / &denom,
                    ))
                }
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }

    /// `x ^ n` for an integral exponent
    fn pow(
        &self,
        exp: &ConstValue,
    ) -> Result<ConstValue, ConstError> {
        let n = exp
            .as_int()
            .ok_or_else(|| ConstError::Exponent(exp.to_string()))?;
        let magnitude = n
            .abs()
            .to_u32()
            .filter(|m| *m <= MAX_POW)
            .ok_or_else(|| ConstError::Exponent(exp.to_string()))? as usize;
        match self {
            ConstValue::Int(base) if !n.is_negative() => {
                Ok(ConstValue::Int(num_traits::pow(base.clone(), magnitude)))
            }
            ConstValue::Int(_) | ConstValue::Float(_) => {
                let base = match self.to_rank(1) {
                    ConstValue::Float(f) => f,
                    _ => return Err(ConstError::Exponent(exp.to_string())),
                };
                if base.is_zero() && n.is_negative() {
                    return Err(ConstError::DivByZero);
                }
                let numer = num_traits::pow(base.numer().clone(), magnitude);
                let denom = num_traits::pow(base.denom().clone(), magnitude);
                Ok(ConstValue::Float(if n.is_negative() {
                    BigRational::new(denom, numer)
                } else {
                    BigRational::new(numer, denom)
                }))
            }
            _ => Err(ConstError::InvalidOp {
                op: "^",
                value: self.brief(),
            }),
        }
    }

    /// Compare two constants with a comparison operator
    pub fn compare(
        &self,
        op: TokenKind,
        other: &ConstValue,
    ) -> Result<bool, ConstError> {
        use std::cmp::Ordering;

        let invalid = || ConstError::InvalidOp {
            op: op.as_str(),
            value: self.brief(),
        };
        let ord: Option<Ordering> = match (self, other) {
            (ConstValue::Bool(a), ConstValue::Bool(b)) => {
                return match op {
                    TokenKind::Equal => Ok(a == b),
                    TokenKind::NotEqual => Ok(a != b),
                    _ => Err(invalid()),
                }
            }
            (ConstValue::String(a), ConstValue::String(b)) => Some(a.cmp(b)),
            _ => {
                let rank = match (self.rank(), other.rank()) {
                    (Some(a), Some(b)) => a.max(b),
                    _ => return Err(invalid()),
                };
                match (self.to_rank(rank), other.to_rank(rank)) {
                    (ConstValue::Int(a), ConstValue::Int(b)) => Some(a.cmp(&b)),
                    (ConstValue::Float(a), ConstValue::Float(b)) => Some(a.cmp(&b)),
                    (ConstValue::Complex(ar, ai), ConstValue::Complex(br, bi)) => {
                        let eq = ar == br && ai == bi;
                        return match op {
                            TokenKind::Equal => Ok(eq),
                            TokenKind::NotEqual => Ok(!eq),
                            _ => Err(invalid()),
                        };
                    }
                    _ => None,
                }
            }
        };
        let ord = ord.ok_or_else(invalid)?;
        Ok(match op {
            TokenKind::Equal => ord == Ordering::Equal,
            TokenKind::NotEqual => ord != Ordering::Equal,
            TokenKind::Less => ord == Ordering::Less,
            TokenKind::LessEqual => ord != Ordering::Greater,
            TokenKind::Greater => ord == Ordering::Greater,
            TokenKind::GreaterEqual => ord != Ordering::Less,
            _ => return Err(invalid()),
        })
    }
}

/// Inclusive range of an integer basic type
pub fn int_range(b: Basic) -> (BigInt, BigInt) {
    let signed = |bits: u32| {
        let half = BigInt::one() << (bits - 1);
        (-half.clone(), half - 1)
    };
    let unsigned = |bits: u32| (BigInt::zero(), (BigInt::one() << bits) - 1);
    match b {
        Basic::Int8 => signed(8),
        Basic::Int16 => signed(16),
        Basic::Int32 => signed(32),
        Basic::Int | Basic::Int64 => signed(64),
        Basic::Uint8 => unsigned(8),
        Basic::Uint16 => unsigned(16),
        Basic::Uint32 => unsigned(32),
        Basic::Uint | Basic::Uint64 | Basic::Uintptr => unsigned(64),
        // Untyped integers are unbounded; use a very wide range.
        _ => signed(1 << 16),
    }
}

fn round_float(
    f: &BigRational,
    b: Basic,
    original: &ConstValue,
) -> Result<BigRational, ConstError> {
    let overflow = || ConstError::Overflow {
        value: original.brief(),
        ty: b.name(),
    };
    match b {
        Basic::Float32 => {
            if f.abs() > *MAX_FLOAT32 {
                return Err(overflow());
            }
            let rounded = rat_to_f64(f) as f32;
            if rounded.is_infinite() {
                return Err(overflow());
            }
            BigRational::from_float(rounded as f64).ok_or_else(overflow)
        }
        _ => {
            if f.abs() > *MAX_FLOAT64 {
                return Err(overflow());
            }
            Ok(f.clone())
        }
    }
}

/// Nearest-below `f64` for a rational, computed on 64 significant bits
pub fn rat_to_f64(r: &BigRational) -> f64 {
    if r.is_zero() {
        return 0.0;
    }
    let negative = r.is_negative();
    let numer = r.numer().abs();
    let denom = r.denom().clone();
    // Scale so the integer quotient carries 64 significant bits.
    let shift = 64 - (numer.bits() as i64 - denom.bits() as i64);
    let quotient = if shift >= 0 {
        (numer << shift as usize) / denom
    } else {
        numer / (denom << (-shift) as usize)
    };
    let mantissa = quotient.to_f64().unwrap_or(f64::INFINITY);
    let mut value = mantissa;
    let mut exp = -shift;
    // Apply the power of two in steps to avoid overflowing the intermediate.
    while exp > 0 {
        let step = exp.min(1000);
        value *= 2f64.powi(step as i32);
        exp -= step;
    }
    while exp < 0 {
        let step = (-exp).min(1000);
        value /= 2f64.powi(step as i32);
        exp += step;
    }
    if negative {
        -value
    } else {
        value
    }
}

/// Render a rational as a decimal when it has a short exact expansion,
/// otherwise in `%g` style
pub fn format_rat(r: &BigRational) -> String {
    if r.is_integer() {
        return r.to_integer().to_string();
    }
    if let Some(s) = exact_decimal(r) {
        return s;
    }
    let f = rat_to_f64(r);
    if f.is_finite() {
        let s = format!("{}", f);
        if s.len() <= 24 {
            return s;
        }
        return format!("{:e}", f);
    }
    format!("{}/{}", r.numer(), r.denom())
}

/// Exact decimal expansion when the denominator divides a small power of ten
fn exact_decimal(r: &BigRational) -> Option<String> {
    let denom = r.denom();
    let ten = BigInt::from(10);
    let mut scale = BigInt::one();
    for digits in 1..=20usize {
        scale *= &ten;
        if (&scale % denom).is_zero() {
            let scaled = r.numer() * (&scale / denom);
            let sign = if scaled.sign() == Sign::Minus { "-" } else { "" };
            let text = scaled.abs().to_string();
            let text = format!("{:0>width$}", text, width = digits + 1);
            let (int_part, frac) = text.split_at(text.len() - digits);
            let frac = frac.trim_end_matches('0');
            return Some(format!("{}{}.{}", sign, int_part, frac));
        }
    }
    None
}

impl fmt::Display for ConstValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{}", b),
            ConstValue::String(s) => write!(f, "{:?}", s),
            ConstValue::Int(i) => write!(f, "{}", i),
            ConstValue::Float(r) => f.write_str(&format_rat(r)),
            ConstValue::Complex(re, im) => {
                write!(f, "({} + {}i)", format_rat(re), format_rat(im))
            }
        }
    }
}
