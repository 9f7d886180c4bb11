//! Text primitives: escape decoding, bounded-length checks, boolean tokens.

use std::borrow::Cow;

use super::error::ValidationError;

/// Max35Text (message, batch and end-to-end identifiers).
pub const MAX_ID_LENGTH: usize = 35;
/// Max70Text (party names inside payment batches).
pub const MAX_NAME_LENGTH: usize = 70;
/// Max140Text (initiating party, address lines, remittance information).
pub const MAX_TEXT_LENGTH: usize = 140;

/// Decode `\uXXXX` escapes (including UTF-16 surrogate pairs) and XML
/// entity / character references into their characters.
///
/// Sequences that do not decode to a character allowed in XML 1.0 (lone
/// surrogates, `&#0;`, other control characters) are kept verbatim.
///
/// ```
/// use sepa_pain::core::decode_text;
///
/// assert_eq!(decode_text("Caf\\u00e9"), "Café");
/// assert_eq!(decode_text("M&amp;S &#x4F;&#107;"), "M&S Ok");
/// assert_eq!(decode_text("plain"), "plain");
/// ```
pub fn decode_text(input: &str) -> Cow<'_, str> {
    if !input.contains(['\\', '&']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(['\\', '&']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let consumed = if rest.starts_with('\\') {
            decode_unicode_escape(rest, &mut out)
        } else {
            decode_entity(rest, &mut out)
        };
        match consumed {
            Some(n) => rest = &rest[n..],
            None => {
                // '\\' and '&' are single-byte
                out.push_str(&rest[..1]);
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn parse_u_escape(s: &str) -> Option<u16> {
    let hex = s.strip_prefix("\\u")?.get(..4)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

fn decode_unicode_escape(s: &str, out: &mut String) -> Option<usize> {
    let first = parse_u_escape(s)?;
    if (0xD800..0xDC00).contains(&first) {
        let low = parse_u_escape(&s[6..])?;
        if !(0xDC00..0xE000).contains(&low) {
            return None;
        }
        let c = char::decode_utf16([first, low]).next()?.ok()?;
        out.push(c);
        return Some(12);
    }
    out.push(char::from_u32(u32::from(first)).filter(|c| is_xml_char(*c))?);
    Some(6)
}

fn decode_entity(s: &str, out: &mut String) -> Option<usize> {
    let end = s
        .char_indices()
        .take(12)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let c = match &s[1..end] {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        name => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                Some(_) => return None,
                None if !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()) => {
                    num.parse::<u32>().ok()?
                }
                None => return None,
            };
            char::from_u32(code).filter(|c| is_xml_char(*c))?
        }
    };
    out.push(c);
    Some(end + 1)
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{9}' | '\u{A}' | '\u{D}')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Whether `s` is at most `max` characters long once decoded.
pub fn check_bounded_length(s: &str, max: usize) -> bool {
    decode_text(s).chars().count() <= max
}

/// Decode `value` and enforce the length bound, returning the decoded text.
pub fn bounded_text(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let decoded = decode_text(value);
    if decoded.chars().count() > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(decoded.into_owned())
}

/// Like [`bounded_text`] but rejects empty or whitespace-only values.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let text = bounded_text(field, value, max)?;
    if text.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(text)
}

/// XML boolean token.
pub fn bool_to_token(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}
