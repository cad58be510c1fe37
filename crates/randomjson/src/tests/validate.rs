//! Independent checkers for generated bytes. These deliberately share no code
//! with the encoders they verify.

use crate::BOM;

/// Checks the JSON number grammar:
/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
pub(crate) fn is_json_number(text: &[u8]) -> bool {
    let mut i = 0;
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < text.len() && text[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };
    if text.get(i) == Some(&b'-') {
        i += 1;
    }
    match text.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            digits(&mut i);
        }
        _ => return false,
    }
    if text.get(i) == Some(&b'.') {
        i += 1;
        if digits(&mut i) == 0 {
            return false;
        }
    }
    if matches!(text.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(text.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == text.len()
}

fn hex_unit(text: &[u8]) -> Option<u16> {
    let hex = core::str::from_utf8(text.get(..4)?).ok()?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

/// Checks every escape in the body of a string (quotes excluded): simple
/// escapes are from the JSON set, `\u` has four hex digits, and surrogates
/// only appear as high-then-low pairs.
pub(crate) fn check_escapes(inner: &[u8]) -> Result<(), String> {
    let mut i = 0;
    while i < inner.len() {
        if inner[i] != b'\\' {
            i += 1;
            continue;
        }
        match inner.get(i + 1) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => i += 2,
            Some(b'u') => {
                let unit = hex_unit(&inner[i + 2..]).ok_or_else(|| format!("bad \\u at {i}"))?;
                i += 6;
                if (0xDC00..=0xDFFF).contains(&unit) {
                    return Err(format!("unpaired low surrogate {unit:04X}"));
                }
                if (0xD800..=0xDBFF).contains(&unit) {
                    if inner.get(i..i + 2) != Some(&b"\\u"[..]) {
                        return Err(format!("unpaired high surrogate {unit:04X}"));
                    }
                    let low = hex_unit(&inner[i + 2..]).ok_or_else(|| format!("bad \\u at {i}"))?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(format!("high surrogate {unit:04X} followed by {low:04X}"));
                    }
                    i += 6;
                }
            }
            other => return Err(format!("illegal escape {other:?} at {i}")),
        }
    }
    Ok(())
}

/// Shape of a generated document as seen by [`check_document`].
#[derive(Debug, Default)]
pub(crate) struct DocumentStats {
    pub(crate) max_depth: usize,
    pub(crate) strings: usize,
    pub(crate) numbers: usize,
}

/// Scans a generated document: optional BOM, balanced brackets, depth within
/// `max_depth`, valid UTF-8, legal escapes, and legal numbers.
pub(crate) fn check_document(bytes: &[u8], max_depth: usize) -> Result<DocumentStats, String> {
    let body = bytes.strip_prefix(BOM.as_slice()).unwrap_or(bytes);
    core::str::from_utf8(body).map_err(|e| format!("invalid UTF-8: {e}"))?;

    let mut stats = DocumentStats::default();
    let mut closers = Vec::new();
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            b'{' | b'[' => {
                closers.push(if body[i] == b'{' { b'}' } else { b']' });
                stats.max_depth = stats.max_depth.max(closers.len());
                i += 1;
            }
            b'}' | b']' => {
                if closers.pop() != Some(body[i]) {
                    return Err(format!("mismatched {} at {i}", body[i] as char));
                }
                i += 1;
            }
            b'"' => {
                let start = i + 1;
                let mut end = start;
                while body.get(end).is_some_and(|&b| b != b'"') {
                    end += if body[end] == b'\\' { 2 } else { 1 };
                }
                if end >= body.len() {
                    return Err(format!("unterminated string at {i}"));
                }
                check_escapes(&body[start..end])?;
                stats.strings += 1;
                i = end + 1;
            }
            b'-' | b'0'..=b'9' => {
                let start = i;
                while body
                    .get(i)
                    .is_some_and(|b| matches!(b, b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9'))
                {
                    i += 1;
                }
                if !is_json_number(&body[start..i]) {
                    return Err(format!(
                        "illegal number {:?} at {start}",
                        String::from_utf8_lossy(&body[start..i])
                    ));
                }
                stats.numbers += 1;
            }
            b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' => i += 1,
            other => return Err(format!("unexpected byte {other:#04x} at {i}")),
        }
    }
    if !closers.is_empty() {
        return Err(format!("{} containers left open", closers.len()));
    }
    if stats.max_depth > max_depth {
        return Err(format!("depth {} exceeds {max_depth}", stats.max_depth));
    }
    Ok(stats)
}

#[test]
fn document_checker_sanity() {
    assert!(check_document(b" {\"a\": [1, -2.5e+3, \"\\ud83d\\ude00\"]} ", 2).is_ok());
    assert!(check_document(b"\xEF\xBB\xBF[]", 1).is_ok());
    assert!(check_document(b"[[]]", 1).is_err());
    assert!(check_document(b"[}", 4).is_err());
    assert!(check_document(b"[1.]", 4).is_err());
    assert!(check_document(b"[\"\\ud83d\"]", 4).is_err());
    assert!(check_document(b"[\"\xC0\xAF\"]", 4).is_err());
}
