//! Byte stuffing that keeps `\n` free for use as the record delimiter.
//!
//! | raw    | escaped      |
//! |--------|--------------|
//! | `0x1B` | `0x1B 0x01`  |
//! | `0x0A` | `0x1B 0x02`  |
//! | `0x0D` | `0x1B 0x03`  |

pub(crate) const ESCAPE: u8 = 0x1B;
pub(crate) const NEWLINE: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

const ESCAPED_ESCAPE: u8 = 0x01;
const ESCAPED_NEWLINE: u8 = 0x02;
const ESCAPED_CARRIAGE_RETURN: u8 = 0x03;

#[must_use]
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(data.len() + data.len() / 16);
    escape_into(data, &mut escaped);
    escaped
}

/// Appends the escaped form of `data` to `out`.
pub fn escape_into(data: &[u8], out: &mut Vec<u8>) {
    for byte in data.iter().copied() {
        match byte {
            ESCAPE => out.extend_from_slice(&[ESCAPE, ESCAPED_ESCAPE]),
            NEWLINE => out.extend_from_slice(&[ESCAPE, ESCAPED_NEWLINE]),
            CARRIAGE_RETURN => out.extend_from_slice(&[ESCAPE, ESCAPED_CARRIAGE_RETURN]),
            other => out.push(other),
        }
    }
}

/// Inverse of [`escape`]. An escape byte that is not followed by one of the
/// three known codes is kept as is.
#[must_use]
pub fn unescape(data: &[u8]) -> Vec<u8> {
    let mut unescaped = Vec::with_capacity(data.len());
    let mut bytes = data.iter().copied().peekable();
    while let Some(byte) = bytes.next() {
        if byte != ESCAPE {
            unescaped.push(byte);
            continue;
        }

        let restored = match bytes.peek() {
            Some(&ESCAPED_ESCAPE) => ESCAPE,
            Some(&ESCAPED_NEWLINE) => NEWLINE,
            Some(&ESCAPED_CARRIAGE_RETURN) => CARRIAGE_RETURN,
            Some(_) | None => {
                unescaped.push(ESCAPE);
                continue;
            }
        };
        bytes.next();
        unescaped.push(restored);
    }
    unescaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bytes_are_replaced() {
        assert_eq!(escape(b"a\nb"), b"a\x1b\x02b");
        assert_eq!(escape(b"\r"), b"\x1b\x03");
        assert_eq!(escape(b"\x1b\x02"), b"\x1b\x01\x02");
    }

    #[test]
    fn escaped_data_has_no_line_ends() {
        let data: Vec<u8> = (0..=u8::MAX).collect();
        let escaped = escape(&data);
        assert!(!escaped.contains(&NEWLINE));
        assert!(!escaped.contains(&CARRIAGE_RETURN));
        assert_eq!(unescape(&escaped), data);
    }

    #[test]
    fn lone_escape_byte_survives_unescape() {
        assert_eq!(unescape(b"\x1b"), b"\x1b");
        assert_eq!(unescape(b"\x1b\x1b\x02"), b"\x1b\n");
        assert_eq!(unescape(b"\x1b\x07"), b"\x1b\x07");
    }
}
