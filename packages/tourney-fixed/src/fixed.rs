use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::MathError;

/// `1.0` as a raw magnitude.
pub const ONE: u64 = 1 << 32;
/// `0.5` as a raw magnitude.
pub const HALF: u64 = 1 << 31;

const FRACTION_MASK: u64 = ONE - 1;

/// Signed fixed-point number with 32 integer bits and 32 fractional bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Fixed {
    mag: u64,
    sign: bool,
}

impl Fixed {
    pub const ZERO: Fixed = Fixed { mag: 0, sign: false };
    pub const ONE: Fixed = Fixed {
        mag: ONE,
        sign: false,
    };

    /// Builds a value from a raw magnitude. Zero is always stored unsigned.
    pub const fn new(mag: u64, sign: bool) -> Self {
        Fixed {
            mag,
            sign: sign && mag != 0,
        }
    }

    /// Whole number `value`; every `u32` fits in the integer bits.
    pub const fn from_int(value: u32) -> Self {
        Fixed::new((value as u64) << 32, false)
    }

    pub fn from_ratio(numerator: u64, denominator: u64) -> Result<Self, MathError> {
        if denominator == 0 {
            return Err(MathError::DivideByZero {});
        }
        let raw = ((numerator as u128) << 32) / denominator as u128;
        let mag = u64::try_from(raw).map_err(|_| MathError::overflow("from_ratio"))?;
        Ok(Fixed::new(mag, false))
    }

    pub const fn mag(self) -> u64 {
        self.mag
    }

    pub const fn is_negative(self) -> bool {
        self.sign
    }

    pub const fn is_zero(self) -> bool {
        self.mag == 0
    }

    pub const fn is_integer(self) -> bool {
        self.mag & FRACTION_MASK == 0
    }

    /// Integer part of the magnitude, ignoring the sign.
    pub const fn int_part(self) -> u64 {
        self.mag >> 32
    }

    /// Fractional bits of the magnitude, ignoring the sign.
    pub const fn frac_part(self) -> u64 {
        self.mag & FRACTION_MASK
    }

    pub(crate) fn to_raw(self) -> i128 {
        if self.sign {
            -(self.mag as i128)
        } else {
            self.mag as i128
        }
    }

    pub(crate) fn from_raw(raw: i128, operation: &'static str) -> Result<Self, MathError> {
        let mag = u64::try_from(raw.unsigned_abs()).map_err(|_| MathError::overflow(operation))?;
        Ok(Fixed::new(mag, raw < 0))
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, MathError> {
        Fixed::from_raw(self.to_raw() + rhs.to_raw(), "add")
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, MathError> {
        Fixed::from_raw(self.to_raw() - rhs.to_raw(), "sub")
    }

    /// Multiplies through a 128-bit intermediate and truncates toward zero.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, MathError> {
        let product = (self.mag as u128 * rhs.mag as u128) >> 32;
        let mag = u64::try_from(product).map_err(|_| MathError::overflow("mul"))?;
        Ok(Fixed::new(mag, self.sign ^ rhs.sign))
    }

    /// Divides through a 128-bit intermediate and truncates toward zero.
    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.mag == 0 {
            return Err(MathError::DivideByZero {});
        }
        let quotient = ((self.mag as u128) << 32) / rhs.mag as u128;
        let mag = u64::try_from(quotient).map_err(|_| MathError::overflow("div"))?;
        Ok(Fixed::new(mag, self.sign ^ rhs.sign))
    }

    pub const fn abs(self) -> Self {
        Fixed::new(self.mag, false)
    }

    /// Largest integer not greater than `self`.
    pub fn floor(self) -> Result<Self, MathError> {
        let frac = self.frac_part();
        if frac == 0 {
            return Ok(self);
        }
        if self.sign {
            let mag = (self.mag - frac)
                .checked_add(ONE)
                .ok_or_else(|| MathError::overflow("floor"))?;
            Ok(Fixed::new(mag, true))
        } else {
            Ok(Fixed::new(self.mag - frac, false))
        }
    }

    /// Smallest integer not less than `self`.
    pub fn ceil(self) -> Result<Self, MathError> {
        let frac = self.frac_part();
        if frac == 0 {
            return Ok(self);
        }
        if self.sign {
            Ok(Fixed::new(self.mag - frac, true))
        } else {
            let mag = (self.mag - frac)
                .checked_add(ONE)
                .ok_or_else(|| MathError::overflow("ceil"))?;
            Ok(Fixed::new(mag, false))
        }
    }

    /// Rounds half away from zero.
    pub fn round(self) -> Result<Self, MathError> {
        let mag = self
            .mag
            .checked_add(HALF)
            .ok_or_else(|| MathError::overflow("round"))?;
        Ok(Fixed::new(mag & !FRACTION_MASK, self.sign))
    }
}

impl Ord for Fixed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_raw().cmp(&other.to_raw())
    }
}

impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign {
            write!(f, "-")?;
        }
        write!(f, "{}", self.int_part())?;

        // Nine decimal digits are exact enough for 32 fractional bits.
        let mut frac = self.frac_part() as u128;
        if frac == 0 {
            return Ok(());
        }
        write!(f, ".")?;
        let mut digits = 0;
        while frac != 0 && digits < 9 {
            frac *= 10;
            write!(f, "{}", frac >> 32)?;
            frac &= FRACTION_MASK as u128;
            digits += 1;
        }
        Ok(())
    }
}

macro_rules! panicking_op {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait for Fixed {
            type Output = Fixed;

            fn $method(self, rhs: Fixed) -> Fixed {
                match self.$checked(rhs) {
                    Ok(value) => value,
                    Err(err) => panic!("{err}"),
                }
            }
        }
    };
}

panicking_op!(Add, add, checked_add);
panicking_op!(Sub, sub, checked_sub);
panicking_op!(Mul, mul, checked_mul);
panicking_op!(Div, div, checked_div);

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed::new(self.mag, !self.sign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neg(value: u32) -> Fixed {
        -Fixed::from_int(value)
    }

    #[test]
    fn zero_is_never_negative() {
        assert_eq!(-Fixed::ZERO, Fixed::ZERO);
        assert_eq!(Fixed::new(0, true), Fixed::ZERO);
        assert_eq!(Fixed::from_int(3) - Fixed::from_int(3), Fixed::ZERO);
    }

    #[test]
    fn add_and_sub_cross_zero() {
        assert_eq!(Fixed::from_int(2) + neg(5), neg(3));
        assert_eq!(neg(2) - neg(5), Fixed::from_int(3));
        assert_eq!(neg(2) + neg(5), neg(7));
    }

    #[test]
    fn mul_and_div_keep_sign() {
        let half = Fixed::from_ratio(1, 2).unwrap();
        assert_eq!(Fixed::from_int(3) * half, Fixed::from_ratio(3, 2).unwrap());
        assert_eq!(neg(3) * neg(4), Fixed::from_int(12));
        assert_eq!(neg(3) / Fixed::from_int(2), -Fixed::from_ratio(3, 2).unwrap());
        assert_eq!(Fixed::ONE / half, Fixed::from_int(2));
    }

    #[test]
    fn overflow_is_reported() {
        let big = Fixed::from_int(1 << 20);
        assert_eq!(
            big.checked_mul(big),
            Err(MathError::Overflow { operation: "mul" })
        );
        assert_eq!(
            Fixed::new(u64::MAX, false).checked_add(Fixed::ONE),
            Err(MathError::Overflow { operation: "add" })
        );
        assert_eq!(
            Fixed::ONE.checked_div(Fixed::ZERO),
            Err(MathError::DivideByZero {})
        );
    }

    #[test]
    #[should_panic(expected = "Fixed-point overflow: mul")]
    fn mul_operator_panics_on_overflow() {
        let big = Fixed::from_int(u32::MAX);
        let _ = big * big;
    }

    #[test]
    fn rounding_functions() {
        let x = Fixed::from_ratio(5, 2).unwrap();
        assert_eq!(x.floor().unwrap(), Fixed::from_int(2));
        assert_eq!(x.ceil().unwrap(), Fixed::from_int(3));
        assert_eq!(x.round().unwrap(), Fixed::from_int(3));

        let y = -x;
        assert_eq!(y.floor().unwrap(), neg(3));
        assert_eq!(y.ceil().unwrap(), neg(2));
        assert_eq!(y.round().unwrap(), neg(3));

        let z = Fixed::from_ratio(9, 4).unwrap();
        assert_eq!(z.round().unwrap(), Fixed::from_int(2));
        assert_eq!(Fixed::from_int(4).floor().unwrap(), Fixed::from_int(4));
    }

    #[test]
    fn ordering_is_signed() {
        assert!(neg(1) < Fixed::ZERO);
        assert!(neg(5) < neg(1));
        assert!(Fixed::from_ratio(1, 3).unwrap() < Fixed::from_ratio(1, 2).unwrap());
    }

    #[test]
    fn display_renders_decimal() {
        assert_eq!(Fixed::from_ratio(5, 2).unwrap().to_string(), "2.5");
        assert_eq!((-Fixed::from_ratio(1, 4).unwrap()).to_string(), "-0.25");
        assert_eq!(Fixed::from_int(7).to_string(), "7");
    }
}
