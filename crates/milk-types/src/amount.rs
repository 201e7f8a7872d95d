//! Token amounts and the cross-chain amount payload codec.
//!
//! Amounts are unsigned 256-bit integers in base units. A deposit payload is
//! exactly one big-endian 32-byte word, the ABI encoding of a single
//! `uint256` on the paired chain.

use alloy_primitives::U256;

use crate::{MilkError, Result, constants::PAYLOAD_WORD_BYTES};

/// Base-unit token amount.
pub type Amount = U256;

/// Decode a deposit payload into an amount.
///
/// # Errors
/// Returns [`MilkError::MalformedPayload`] unless the payload is exactly one
/// 32-byte word.
pub fn decode_amount(payload: &[u8]) -> Result<Amount> {
    let word: [u8; PAYLOAD_WORD_BYTES] =
        payload
            .try_into()
            .map_err(|_| MilkError::MalformedPayload {
                reason: format!(
                    "expected a single {PAYLOAD_WORD_BYTES}-byte word, got {} bytes",
                    payload.len()
                ),
            })?;
    Ok(U256::from_be_bytes(word))
}

/// Encode an amount as a deposit payload (inverse of [`decode_amount`]).
#[must_use]
pub fn encode_amount(amount: Amount) -> [u8; PAYLOAD_WORD_BYTES] {
    amount.to_be_bytes::<PAYLOAD_WORD_BYTES>()
}

/// Parse a human-readable decimal amount (e.g. `"1.5"`) into base units.
///
/// # Errors
/// Returns [`MilkError::InvalidAmount`] on non-digit input, more fractional
/// digits than `decimals`, or a value beyond 256 bits.
pub fn parse_units(input: &str, decimals: u8) -> Result<Amount> {
    let invalid = |reason: &str| MilkError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim().replace('_', "");
    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed.as_str(), ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("empty"));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected decimal digits"));
    }
    if frac.len() > usize::from(decimals) {
        return Err(invalid("too many fractional digits"));
    }

    let digits = format!("{whole}{frac:0<width$}", width = usize::from(decimals));
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    digits
        .parse::<U256>()
        .map_err(|_| invalid("exceeds 256 bits"))
}

/// Render base units as a decimal string with trailing fractional zeros
/// removed (`1500000000000000000` at 18 decimals → `"1.5"`).
#[must_use]
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let width = usize::from(decimals);
    let raw = amount.to_string();
    if width == 0 {
        return raw;
    }
    let padded = format!("{raw:0>pad$}", pad = width + 1);
    let (whole, frac) = padded.split_at(padded.len() - width);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> Amount {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn decode_single_word() {
        let mut word = [0u8; 32];
        word[31] = 0x2a;
        assert_eq!(decode_amount(&word).unwrap(), U256::from(42u64));
    }

    #[test]
    fn decode_is_big_endian() {
        let mut word = [0u8; 32];
        word[30] = 0x01;
        assert_eq!(decode_amount(&word).unwrap(), U256::from(256u64));
    }

    #[test]
    fn decode_rejects_short_and_long_payloads() {
        for len in [0usize, 1, 31, 33, 64] {
            let payload = vec![0u8; len];
            let err = decode_amount(&payload).unwrap_err();
            assert!(
                matches!(err, MilkError::MalformedPayload { .. }),
                "len {len}: {err:?}"
            );
        }
    }

    #[test]
    fn encode_decode_bridge_amount() {
        let amount = ether(100_000_000);
        let payload = encode_amount(amount);
        assert_eq!(payload.len(), 32);
        assert_eq!(decode_amount(&payload).unwrap(), amount);
        assert_eq!(decode_amount(&encode_amount(U256::MAX)).unwrap(), U256::MAX);
    }

    #[test]
    fn parse_whole_and_fractional_units() {
        assert_eq!(parse_units("100000000", 18).unwrap(), ether(100_000_000));
        assert_eq!(
            parse_units("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(parse_units(".25", 2).unwrap(), U256::from(25u64));
        assert_eq!(parse_units("0", 18).unwrap(), U256::ZERO);
        assert_eq!(parse_units("1_000", 0).unwrap(), U256::from(1000u64));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_units("", 18).is_err());
        assert!(parse_units("1.2.3", 18).is_err());
        assert!(parse_units("-1", 18).is_err());
        assert!(parse_units("0.123", 2).is_err());
        let too_big = "1".repeat(80);
        assert!(matches!(
            parse_units(&too_big, 0),
            Err(MilkError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_units(ether(3), 18), "3");
        assert_eq!(
            format_units(U256::from(1_500_000_000_000_000_000u64), 18),
            "1.5"
        );
        assert_eq!(format_units(U256::from(5u64), 2), "0.05");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
        assert_eq!(format_units(U256::ZERO, 18), "0");
    }
}
