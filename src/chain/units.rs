//! Conversion between display units and base units.
//!
//! All arithmetic is done on `U256`, so no precision is lost for any value a
//! token contract can hold. Excess fractional digits are floored.

use alloy::primitives::U256;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::chain::types::{ChainError, ChainResult};

/// Decimal scale of the native coin (1 TRX = 10^6 sun).
pub const NATIVE_DECIMALS: u8 = 6;

/// Largest scale for which 10^scale fits in a U256.
pub const MAX_DECIMALS: u8 = 77;

/// An amount expressed both in base units and in display units.
///
/// Serializes as `baseUnits` and `displayUnits` (exact decimal strings) plus
/// `displayValue`, the same amount as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountPair {
    pub base_units: U256,
    pub display_units: String,
}

impl AmountPair {
    /// Build a pair from a base-unit value at the given scale.
    pub fn from_base(base_units: U256, scale: u8) -> ChainResult<Self> {
        Ok(Self {
            display_units: to_display_units(base_units, scale)?,
            base_units,
        })
    }

    /// Display value as an ordinary (rounded) float.
    pub fn as_f64(&self) -> f64 {
        self.display_units.parse().unwrap_or(f64::NAN)
    }
}

impl Serialize for AmountPair {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut state = s.serialize_struct("AmountPair", 3)?;
        state.serialize_field("baseUnits", &self.base_units.to_string())?;
        state.serialize_field("displayUnits", &self.display_units)?;
        state.serialize_field("displayValue", &self.as_f64())?;
        state.end()
    }
}

/// Serialize a U256 as a plain decimal string.
pub fn serialize_decimal<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

fn pow10(scale: u8) -> ChainResult<U256> {
    if scale > MAX_DECIMALS {
        return Err(ChainError::InvalidAmount(format!(
            "scale {} exceeds maximum of {}",
            scale, MAX_DECIMALS
        )));
    }
    Ok(U256::from(10u8).pow(U256::from(scale)))
}

/// Convert a display amount such as `"4.999999"` into base units.
pub fn to_base_units(display: &str, scale: u8) -> ChainResult<U256> {
    let trimmed = display.trim();
    let invalid = || ChainError::InvalidAmount(format!("'{}' is not a decimal amount", display));

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    let whole = whole.strip_prefix('+').unwrap_or(whole);
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let scale_factor = pow10(scale)?;
    let overflow = || ChainError::InvalidAmount(format!("'{}' overflows 256 bits", display));

    let whole_units = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| overflow())?
    };

    // Floor: digits beyond the scale are dropped.
    let kept = &frac[..frac.len().min(scale as usize)];
    let frac_units = if kept.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", kept, width = scale as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(scale_factor)
        .and_then(|v| v.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Convert base units into the shortest exact decimal string.
pub fn to_display_units(base: U256, scale: u8) -> ChainResult<String> {
    let scale_factor = pow10(scale)?;
    let (whole, frac) = base.div_rem(scale_factor);
    if frac.is_zero() {
        return Ok(whole.to_string());
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = scale as usize);
    Ok(format!("{}.{}", whole, frac.trim_end_matches('0')))
}

/// Native-coin shorthand for [`to_base_units`].
pub fn trx_to_sun(display: &str) -> ChainResult<U256> {
    to_base_units(display, NATIVE_DECIMALS)
}

/// Native-coin shorthand for [`to_display_units`].
pub fn sun_to_trx(base: U256) -> String {
    // Scale 6 is always in range.
    to_display_units(base, NATIVE_DECIMALS).unwrap_or_default()
}
