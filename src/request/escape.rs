use crate::{Result, StormError};
use bytes::{BufMut, Bytes, BytesMut};

/// Decodes the escape notation accepted on the command line
///
/// Supported sequences are `\r`, `\n`, `\t`, `\0`, `\\` and `\xNN`. Any other
/// backslash sequence is rejected so typos do not end up on the wire.
pub fn decode_escapes(input: &str) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut utf8 = [0u8; 4];
            out.put_slice(ch.encode_utf8(&mut utf8).as_bytes());
            continue;
        }

        match chars.next() {
            Some('r') => out.put_u8(b'\r'),
            Some('n') => out.put_u8(b'\n'),
            Some('t') => out.put_u8(b'\t'),
            Some('0') => out.put_u8(0),
            Some('\\') => out.put_u8(b'\\'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return Err(StormError::Config(format!(
                        "truncated \\x escape in '{input}'"
                    )));
                }
                let byte = u8::from_str_radix(&hex, 16).map_err(|_| {
                    StormError::Config(format!("invalid \\x{hex} escape in '{input}'"))
                })?;
                out.put_u8(byte);
            }
            Some(other) => {
                return Err(StormError::Config(format!(
                    "unknown escape \\{other} in '{input}'"
                )));
            }
            None => {
                return Err(StormError::Config(format!(
                    "dangling backslash at end of '{input}'"
                )));
            }
        }
    }

    Ok(out.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_line() {
        let decoded = decode_escapes(r"GET / HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(&decoded[..], b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");
    }

    #[test]
    fn test_hex_and_backslash() {
        let decoded = decode_escapes(r"a\x41\\b\t\0").unwrap();
        assert_eq!(&decoded[..], b"aA\\b\t\0");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let decoded = decode_escapes("STOP ü").unwrap();
        assert_eq!(&decoded[..], "STOP ü".as_bytes());
    }

    #[test]
    fn test_malformed_escapes_rejected() {
        assert!(decode_escapes(r"\q").is_err());
        assert!(decode_escapes("tail\\").is_err());
        assert!(decode_escapes(r"\x4").is_err());
        assert!(decode_escapes(r"\xZZ").is_err());
    }
}
