use crate::{Fixed, MathError, ONE};

/// `ln(2)` as a raw magnitude.
pub const LN_2: u64 = 2_977_044_472;
/// `log2(e)` as a raw magnitude.
pub const LOG2_E: u64 = 6_196_328_019;

/// `2^k` for every integer part that still fits in 32 integer bits.
const EXP2_INT: [u64; 32] = {
    let mut table = [0u64; 32];
    let mut k = 0;
    while k < 32 {
        table[k] = ONE << k;
        k += 1;
    }
    table
};

/// Taylor terms needed for `e^x` with `0 <= x < ln 2` to converge below one ulp.
const EXP_SERIES_TERMS: u64 = 16;

/// `2^frac` for `0 <= frac < 1`, as a raw magnitude in `[ONE, 2 * ONE)`.
fn exp2_fraction(frac: u64) -> u128 {
    let x = (frac as u128 * LN_2 as u128) >> 32;
    let mut sum = ONE as u128;
    let mut term = ONE as u128;
    for k in 1..=EXP_SERIES_TERMS {
        term = ((term * x) >> 32) / k as u128;
        if term == 0 {
            break;
        }
        sum += term;
    }
    sum
}

fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }
    let mut x = 1u128 << ((128 - value.leading_zeros()).div_ceil(2));
    loop {
        let y = (x + value / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

impl Fixed {
    pub fn sqrt(self) -> Result<Self, MathError> {
        if self.is_negative() {
            return Err(MathError::NonPositiveInput { operation: "sqrt" });
        }
        let root = isqrt((self.mag() as u128) << 32);
        // sqrt of a u64 magnitude shifted by 32 always fits in 64 bits
        Ok(Fixed::new(root as u64, false))
    }

    /// `2^self`: table lookup for the integer part, series for the fraction.
    pub fn exp2(self) -> Result<Self, MathError> {
        if self.is_zero() {
            return Ok(Fixed::ONE);
        }
        let int_part = self.int_part();
        let frac = exp2_fraction(self.frac_part());

        if !self.is_negative() {
            let base = *EXP2_INT
                .get(int_part as usize)
                .ok_or_else(|| MathError::overflow("exp2"))?;
            let raw = (base as u128 * frac) >> 32;
            let mag = u64::try_from(raw).map_err(|_| MathError::overflow("exp2"))?;
            return Ok(Fixed::new(mag, false));
        }

        // 2^-(i + f) = (1 / 2^f) >> i
        if int_part >= 64 {
            return Ok(Fixed::ZERO);
        }
        let inverse = (1u128 << 64) / frac;
        Ok(Fixed::new((inverse >> int_part) as u64, false))
    }

    pub fn exp(self) -> Result<Self, MathError> {
        self.checked_mul(Fixed::new(LOG2_E, false))?.exp2()
    }

    /// Binary logarithm by normalization into `[1, 2)` and repeated squaring.
    pub fn log2(self) -> Result<Self, MathError> {
        if self.is_negative() || self.is_zero() {
            return Err(MathError::NonPositiveInput { operation: "log2" });
        }
        let mag = self.mag();
        let msb = 63 - mag.leading_zeros() as i64;
        let int_part = msb - 32;

        let mut y: u128 = if int_part >= 0 {
            (mag >> int_part) as u128
        } else {
            (mag << -int_part) as u128
        };

        let mut frac: u64 = 0;
        for bit in (0..32).rev() {
            y = (y * y) >> 32;
            if y >= 2 * ONE as u128 {
                y >>= 1;
                frac |= 1 << bit;
            }
        }

        Fixed::from_raw(((int_part as i128) << 32) + frac as i128, "log2")
    }

    pub fn ln(self) -> Result<Self, MathError> {
        self.log2()?.checked_mul(Fixed::new(LN_2, false))
    }

    /// `self^exponent`. Integer exponents square-and-multiply; anything else
    /// goes through `exp(exponent * ln(self))` and needs a positive base.
    pub fn pow(self, exponent: Fixed) -> Result<Self, MathError> {
        if exponent.is_integer() {
            let result = self.pow_int(exponent.int_part())?;
            return if exponent.is_negative() {
                Fixed::ONE.checked_div(result)
            } else {
                Ok(result)
            };
        }
        exponent.checked_mul(self.ln()?)?.exp()
    }

    fn pow_int(self, mut n: u64) -> Result<Self, MathError> {
        let mut result = Fixed::ONE;
        let mut base = self;
        while n > 0 {
            if n & 1 == 1 {
                result = result.checked_mul(base)?;
            }
            n >>= 1;
            if n > 0 {
                base = base.checked_mul(base)?;
            }
        }
        Ok(result)
    }
}
