//! IBAN (ISO 13616) and BIC (ISO 9362) format checks.

use super::error::ValidationError;

/// Normalize and validate an IBAN: strips spaces, uppercases, checks the
/// country/check-digit shape and the mod-97 checksum.
///
/// ```
/// use sepa_pain::core::validate_iban;
///
/// assert_eq!(validate_iban("de89 3704 0044 0532 0130 00").unwrap(), "DE89370400440532013000");
/// assert!(validate_iban("DE89370400440532013001").is_err());
/// ```
pub fn validate_iban(iban: &str) -> Result<String, ValidationError> {
    let normalized: String = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let fail = |reason: &str| Err(ValidationError::new("iban", format!("'{iban}' {reason}")));

    if !(15..=34).contains(&normalized.len()) {
        return fail("must be 15 to 34 characters long");
    }
    let bytes = normalized.as_bytes();
    if !bytes[..2].iter().all(u8::is_ascii_uppercase) || !bytes[2..4].iter().all(u8::is_ascii_digit)
    {
        return fail("must start with a country code and two check digits");
    }
    if !bytes.iter().all(u8::is_ascii_alphanumeric) {
        return fail("contains invalid characters");
    }

    let rotated = bytes[4..].iter().chain(&bytes[..4]);
    let mut remainder: u32 = 0;
    for b in rotated {
        let value = if b.is_ascii_digit() {
            u32::from(b - b'0')
        } else {
            u32::from(b - b'A') + 10
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    if remainder != 1 {
        return fail("has an invalid checksum");
    }
    Ok(normalized)
}

pub fn is_valid_iban(iban: &str) -> bool {
    validate_iban(iban).is_ok()
}

/// Normalize and validate a BIC: 4-letter institution, 2-letter country,
/// 2-character location, optional 3-character branch.
pub fn validate_bic(bic: &str) -> Result<String, ValidationError> {
    let normalized = bic.trim().to_ascii_uppercase();
    let b = normalized.as_bytes();
    let valid = (b.len() == 8 || b.len() == 11)
        && b[..6].iter().all(u8::is_ascii_uppercase)
        && b[6..].iter().all(u8::is_ascii_alphanumeric);
    if !valid {
        return Err(ValidationError::new(
            "bic",
            format!("'{bic}' is not a valid BIC"),
        ));
    }
    Ok(normalized)
}

pub fn is_valid_bic(bic: &str) -> bool {
    validate_bic(bic).is_ok()
}
