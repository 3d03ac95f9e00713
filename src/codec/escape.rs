//! Byte escaping for string literals in the overlay table
//!
//! The consuming interpreter auto-detects text encoding, which mangles raw
//! high-bit bytes, so NUL and every byte from 127 up are written as a fixed
//! width `\DDD` decimal escape. Quote, backslash, tab, newline and carriage
//! return get their short escapes. Everything else, including the remaining
//! control bytes, is written as is.

/// Escaped form of one byte: up to four ASCII characters
#[derive(Debug, Clone, Copy)]
struct Escape {
    buf: [u8; 4],
    len: u8,
}

impl Escape {
    const fn literal(byte: u8) -> Self {
        Self {
            buf: [byte, 0, 0, 0],
            len: 1,
        }
    }

    const fn short(code: u8) -> Self {
        Self {
            buf: [b'\\', code, 0, 0],
            len: 2,
        }
    }

    const fn decimal(byte: u8) -> Self {
        Self {
            buf: [
                b'\\',
                b'0' + byte / 100,
                b'0' + (byte / 10) % 10,
                b'0' + byte % 10,
            ],
            len: 4,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

const fn build_table() -> [Escape; 256] {
    let mut table = [Escape::literal(0); 256];
    let mut i = 0;
    while i < 256 {
        let byte = i as u8;
        table[i] = match byte {
            b'"' => Escape::short(b'"'),
            b'\\' => Escape::short(b'\\'),
            b'\t' => Escape::short(b't'),
            b'\n' => Escape::short(b'n'),
            b'\r' => Escape::short(b'r'),
            0 | 127..=255 => Escape::decimal(byte),
            _ => Escape::literal(byte),
        };
        i += 1;
    }
    table
}

static ESCAPES: [Escape; 256] = build_table();

/// Escaped representation of a single byte
///
/// The result is always ASCII.
pub fn escape(byte: u8) -> &'static [u8] {
    ESCAPES[byte as usize].as_bytes()
}

/// Append the escaped form of `data` to `out`
pub fn escape_into(data: &[u8], out: &mut String) {
    out.reserve(data.len());
    for &byte in data {
        for &c in escape(byte) {
            out.push(c as char);
        }
    }
}

/// Escape a whole byte string
pub fn escape_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    escape_into(data, &mut out);
    out
}

/// Decode one escape sequence.
///
/// `seq` holds the bytes following a backslash. Returns the decoded byte and
/// how many bytes of `seq` it used, or `None` for an empty sequence or a
/// three-digit escape above 255.
pub fn unescape(seq: &[u8]) -> Option<(u8, usize)> {
    let first = *seq.first()?;
    if seq.len() >= 3 && seq[..3].iter().all(u8::is_ascii_digit) {
        let value = seq[..3]
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
        return u8::try_from(value).ok().map(|b| (b, 3));
    }
    let byte = match first {
        b't' => b'\t',
        b'n' => b'\n',
        b'r' => b'\r',
        other => other,
    };
    Some((byte, 1))
}

/// Decode a whole escaped string body (without surrounding quotes)
pub fn unescape_bytes(text: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i] == b'\\' {
            let (byte, used) = unescape(&text[i + 1..])?;
            out.push(byte);
            i += 1 + used;
        } else {
            out.push(text[i]);
            i += 1;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii_passes_through() {
        assert_eq!(escape(b'a'), b"a");
        assert_eq!(escape(b' '), b" ");
        assert_eq!(escape(b'~'), b"~");
    }

    #[test]
    fn test_short_escapes() {
        assert_eq!(escape(b'"'), b"\\\"");
        assert_eq!(escape(b'\\'), b"\\\\");
        assert_eq!(escape(9), b"\\t");
        assert_eq!(escape(10), b"\\n");
        assert_eq!(escape(13), b"\\r");
    }

    #[test]
    fn test_decimal_escapes() {
        assert_eq!(escape(0), b"\\000");
        assert_eq!(escape(127), b"\\127");
        assert_eq!(escape(128), b"\\128");
        assert_eq!(escape(255), b"\\255");
    }

    #[test]
    fn test_other_control_bytes_are_literal() {
        for byte in (1u8..=8).chain([11, 12]).chain(14..=31) {
            assert_eq!(escape(byte), &[byte], "byte {}", byte);
        }
    }

    #[test]
    fn test_escape_bytes_mixed() {
        let escaped = escape_bytes(b"say \"hi\"\n\xff");
        assert_eq!(escaped, "say \\\"hi\\\"\\n\\255");
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape(b"n"), Some((b'\n', 1)));
        assert_eq!(unescape(b"\""), Some((b'"', 1)));
        assert_eq!(unescape(b"200rest"), Some((200, 3)));
        assert_eq!(unescape(b"999"), None);
        assert_eq!(unescape(b""), None);
        // Fewer than three digits is not a decimal escape
        assert_eq!(unescape(b"12"), Some((b'1', 1)));
        // Unknown escapes map to the character itself
        assert_eq!(unescape(b"q"), Some((b'q', 1)));
    }

    #[test]
    fn test_unescape_bytes_rejects_trailing_backslash() {
        assert_eq!(unescape_bytes(b"abc\\"), None);
        assert_eq!(unescape_bytes(b"a\\tb"), Some(b"a\tb".to_vec()));
    }

    #[test]
    fn test_every_byte_round_trips() {
        for byte in 0..=255u8 {
            let escaped = escape(byte);
            let decoded = unescape_bytes(escaped).unwrap();
            assert_eq!(decoded, vec![byte], "byte {}", byte);
        }
    }
}
