//! Percent escapes for names inside the model string and for the share link.

use std::borrow::Cow;

/// Characters that carry structure in the model string, plus the escape marker itself.
const RESERVED: &[u8] = b"%~_- ";

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn push_escaped(out: &mut String, byte: u8) {
    out.push('%');
    out.push(HEX[usize::from(byte >> 4)] as char);
    out.push(HEX[usize::from(byte & 0x0F)] as char);
}

/// Escape the delimiter characters of a free-text field. Other characters pass through.
pub fn escape_field(raw: &str) -> Cow<'_, str> {
    if !raw.bytes().any(|byte| RESERVED.contains(&byte)) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        if ch.is_ascii() && RESERVED.contains(&(ch as u8)) {
            push_escaped(&mut out, ch as u8);
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Undo [`escape_field`]. Any `%XX` sequence is decoded; a `%` not followed by two hex digits
/// is kept literally so hand-edited links still load.
pub fn unescape_field(field: &str) -> Cow<'_, str> {
    if !field.contains('%') {
        return Cow::Borrowed(field);
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            if let Some(byte) = bytes
                .get(index + 1..index + 3)
                .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            {
                out.push(byte);
                index += 3;
                continue;
            }
        }
        out.push(bytes[index]);
        index += 1;
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

/// Percent-encode everything outside the RFC 3986 unreserved set, for use as a query value.
pub fn encode_query_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            push_escaped(&mut out, byte);
        }
    }
    out
}
