//! Decoding of Doxygen's escaped search ids and HTML entities in labels.
//!
//! Doxygen lowercases every search id, replaces each byte that is not an
//! ASCII letter or digit with `_XX` (two hex digits) and appends a `_<n>`
//! serial, so `wav64_open` becomes `wav64_5fopen_8`. Labels and scopes are
//! emitted as HTML text, so they carry entities such as `&#160;`.

use phf::phf_map;
use thiserror::Error;

/// Named entities Doxygen writes into search data labels.
static NAMED_ENTITIES: phf::Map<&'static str, char> = phf_map! {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
};

/// Longest entity body we try to interpret (`#x10ffff` is eight bytes).
const MAX_ENTITY_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    #[error("`_` at byte {offset} is not followed by two hex digits")]
    BadEscape { offset: usize },
    #[error("decoded id is not valid UTF-8")]
    NotUtf8,
    #[error("search id is empty")]
    Empty,
}

/// Decode a Doxygen search id into the searchable key.
///
/// ```
/// use doxsift_core::escape::decode_search_id;
/// assert_eq!(decode_search_id("wav64_5fopen_8").unwrap(), "wav64_open");
/// assert_eq!(decode_search_id("wav64_2ec_5").unwrap(), "wav64.c");
/// ```
pub fn decode_search_id(id: &str) -> Result<String, EscapeError> {
    let body = strip_serial(id);
    if body.is_empty() {
        return Err(EscapeError::Empty);
    }

    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or(EscapeError::BadEscape { offset: i })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| EscapeError::NotUtf8)
}

/// Drop the trailing `_<decimal>` serial, if present.
fn strip_serial(id: &str) -> &str {
    match id.rsplit_once('_') {
        Some((body, serial))
            if !serial.is_empty() && serial.bytes().all(|b| b.is_ascii_digit()) =>
        {
            body
        }
        _ => id,
    }
}

/// Replace numeric (`&#160;`, `&#xa0;`) and known named entities with the
/// characters they stand for. Anything unrecognised is kept verbatim.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| entity_char(&after[..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                u32::from_str_radix(hex, 16).ok()?
            }
            None if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()) => {
                num.parse::<u32>().ok()?
            }
            _ => return None,
        };
        return char::from_u32(code);
    }
    NAMED_ENTITIES.get(body).copied()
}
