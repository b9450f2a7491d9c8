//! JSON String Escape Decoding
//!
//! Handles decoding of JSON escape sequences:
//! - Single-character escapes: \" \\ \/ \b \f \n \r \t
//! - Unicode escapes: \uXXXX, including UTF-16 surrogate pairs
//!
//! Uses Cow for zero-copy when no escapes are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode the raw contents of a JSON string (without the surrounding quotes)
///
/// Returns Borrowed if no escapes are present (zero-copy),
/// returns Owned if escapes were decoded.
pub fn decode_str(raw: &[u8]) -> Result<Cow<'_, str>, &'static str> {
    // Fast path: no backslash means the raw bytes are the value
    if memchr(b'\\', raw).is_none() {
        return std::str::from_utf8(raw)
            .map(Cow::Borrowed)
            .map_err(|_| "Invalid UTF-8 in string");
    }
    decode_escapes(raw).map(Cow::Owned)
}

/// Compare the decoded value of a raw JSON string against `expected`
/// without allocating.
pub fn decoded_eq(raw: &[u8], expected: &[u8]) -> bool {
    if memchr(b'\\', raw).is_none() {
        return raw == expected;
    }

    let mut rest = expected;
    let mut pos = 0;
    let mut buf = [0u8; 4];

    while pos < raw.len() {
        let (decoded, consumed) = if raw[pos] == b'\\' {
            match decode_escape(&raw[pos..]) {
                Ok((ch, consumed)) => (ch.encode_utf8(&mut buf).as_bytes(), consumed),
                Err(_) => return false,
            }
        } else {
            (&raw[pos..pos + 1], 1)
        };
        match rest.strip_prefix(decoded) {
            Some(r) => rest = r,
            None => return false,
        }
        pos += consumed;
    }

    rest.is_empty()
}

/// Decode all escape sequences in the input
fn decode_escapes(raw: &[u8]) -> Result<String, &'static str> {
    let mut result = Vec::with_capacity(raw.len());
    let mut pos = 0;
    let mut buf = [0u8; 4];

    while pos < raw.len() {
        if let Some(offset) = memchr(b'\\', &raw[pos..]) {
            // Copy everything before the escape
            result.extend_from_slice(&raw[pos..pos + offset]);
            pos += offset;

            let (ch, consumed) = decode_escape(&raw[pos..])?;
            result.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            pos += consumed;
        } else {
            // No more escapes, copy the rest
            result.extend_from_slice(&raw[pos..]);
            break;
        }
    }

    String::from_utf8(result).map_err(|_| "Invalid UTF-8 in string")
}

/// Decode one escape sequence starting at a backslash.
/// Returns the character and the number of input bytes consumed.
pub(crate) fn decode_escape(input: &[u8]) -> Result<(char, usize), &'static str> {
    debug_assert_eq!(input.first(), Some(&b'\\'));

    let ch = match input.get(1) {
        Some(b'"') => '"',
        Some(b'\\') => '\\',
        Some(b'/') => '/',
        Some(b'b') => '\u{0008}',
        Some(b'f') => '\u{000C}',
        Some(b'n') => '\n',
        Some(b'r') => '\r',
        Some(b't') => '\t',
        Some(b'u') => return decode_unicode_escape(input),
        Some(_) => return Err("Invalid escape sequence"),
        None => return Err("Unterminated escape sequence"),
    };
    Ok((ch, 2))
}

/// Decode `\uXXXX`, joining a following low surrogate when present
fn decode_unicode_escape(input: &[u8]) -> Result<(char, usize), &'static str> {
    let high = parse_hex4(input.get(2..6))?;

    if !(0xD800..0xDC00).contains(&high) {
        if (0xDC00..0xE000).contains(&high) {
            return Err("Unpaired low surrogate");
        }
        let ch = char::from_u32(high).ok_or("Invalid unicode escape")?;
        return Ok((ch, 6));
    }

    // High surrogate must be followed by \uDC00..\uDFFF
    if input.get(6..8) != Some(&b"\\u"[..]) {
        return Err("Unpaired high surrogate");
    }
    let low = parse_hex4(input.get(8..12))?;
    if !(0xDC00..0xE000).contains(&low) {
        return Err("Unpaired high surrogate");
    }

    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    let ch = char::from_u32(code).ok_or("Invalid unicode escape")?;
    Ok((ch, 12))
}

fn parse_hex4(digits: Option<&[u8]>) -> Result<u32, &'static str> {
    let digits = digits.ok_or("Truncated unicode escape")?;
    let mut value = 0u32;
    for &d in digits {
        let nibble = match d {
            b'0'..=b'9' => d - b'0',
            b'a'..=b'f' => d - b'a' + 10,
            b'A'..=b'F' => d - b'A' + 10,
            _ => return Err("Invalid hex digit in unicode escape"),
        };
        value = (value << 4) | nibble as u32;
    }
    Ok(value)
}
