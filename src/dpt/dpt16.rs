//! DPT 16.000 - ASCII string
//!
//! Up to [`MAX_STRING_LEN`] printable ASCII characters (0x20-0x7E) followed
//! by a NUL terminator, so the encoding never exceeds the 14-byte payload.
//! Non-printable characters are skipped on both encode and decode.

use crate::dpt::{ensure_capacity, DptDecode, DptEncode};
use crate::error::Result;

/// Maximum number of characters carried by one string telegram
pub const MAX_STRING_LEN: usize = 13;

/// Decoded string value
pub type DptString = heapless::String<MAX_STRING_LEN>;

#[inline]
const fn is_printable(b: u8) -> bool {
    matches!(b, 0x20..=0x7E)
}

/// DPT 16.xxx string types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt16 {
    /// DPT 16.000 - ASCII string
    Ascii,
}

impl Dpt16 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "16.000"
    }
}

impl DptEncode<&str> for Dpt16 {
    /// Writes the printable characters (at most 13) and a trailing NUL.
    fn encode(&self, value: &str, buf: &mut [u8]) -> Result<usize> {
        let mut len = 0;
        for b in value.bytes().filter(|b| is_printable(*b)).take(MAX_STRING_LEN) {
            ensure_capacity(buf, len + 2)?;
            buf[len] = b;
            len += 1;
        }
        ensure_capacity(buf, len + 1)?;
        buf[len] = 0;
        Ok(len + 1)
    }
}

impl DptDecode<DptString> for Dpt16 {
    /// Reads up to the first NUL or the end of the payload.
    fn decode(&self, data: &[u8]) -> Result<DptString> {
        let mut text = DptString::new();
        for b in data.iter().copied().take_while(|b| *b != 0).filter(|b| is_printable(*b)) {
            if text.push(char::from(b)).is_err() {
                break;
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_appends_nul() {
        let mut buf = [0xFFu8; 14];
        let len = Dpt16::Ascii.encode("KNX", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"KNX\0");
    }

    #[test]
    fn test_encode_truncates() {
        let mut buf = [0u8; 14];
        let len = Dpt16::Ascii.encode("abcdefghijklmnopqrstuvwxyz", &mut buf).unwrap();
        assert_eq!(len, 14);
        assert_eq!(&buf[..len], b"abcdefghijklm\0");
    }

    #[test]
    fn test_encode_skips_non_printable() {
        let mut buf = [0u8; 14];
        let len = Dpt16::Ascii.encode("a\tb\u{e9}c", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"abc\0");
    }

    #[test]
    fn test_encode_small_buffer() {
        let mut buf = [0u8; 3];
        assert!(Dpt16::Ascii.encode("abc", &mut buf).is_err());
        assert!(Dpt16::Ascii.encode("ab", &mut buf).is_ok());
    }

    #[test]
    fn test_decode() {
        assert_eq!(Dpt16::Ascii.decode(b"Hello\0junk").unwrap(), "Hello");
        // No terminator: read to the end
        assert_eq!(Dpt16::Ascii.decode(b"Hello").unwrap(), "Hello");
        assert_eq!(Dpt16::Ascii.decode(&[]).unwrap(), "");
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 14];
        for s in ["", "a", "Living room", "0123456789abc"] {
            let len = Dpt16::Ascii.encode(s, &mut buf).unwrap();
            assert_eq!(Dpt16::Ascii.decode(&buf[..len]).unwrap(), s);
        }
    }
}
