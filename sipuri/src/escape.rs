//! Percent encoding for the components of a SIP URI.
//!
//! The sets of bytes left unescaped differ from a generic URL encoder: the
//! host keeps the characters its grammar allows, the user-info escapes the
//! `:` that separates user from password, and parameters and headers escape
//! everything but letters, digits and marks. A space always becomes `%20`.

use std::borrow::Cow;
use std::str;

use crate::error::EscapeError;
use crate::macros::lookup_table;

/// Alphanumeric bytes are never escaped.
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Unreserved marks.
const MARK: &[u8] = b"-_.~";
/// Extra characters legal in the host production.
const HOST: &[u8] = b"!$&'()*+,;=:[]<>\"";
/// Reserved characters allowed in the user-info. `:` is left out because it
/// splits the user from the password.
const USER_INFO: &[u8] = b";&=+$,";

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

lookup_table!(HOST_TAB => ALPHANUMERIC, MARK, HOST);
lookup_table!(USER_INFO_TAB => ALPHANUMERIC, MARK, USER_INFO);
lookup_table!(QUERY_TAB => ALPHANUMERIC, MARK);

/// The component of the URI being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// The host, including an optional port or bracketed IPv6 literal.
    Host,
    /// The user or password.
    UserInfo,
    /// A parameter or header name or value.
    QueryComponent,
}

impl Encoding {
    #[inline]
    fn table(self) -> &'static [bool; 256] {
        match self {
            Encoding::Host => &HOST_TAB,
            Encoding::UserInfo => &USER_INFO_TAB,
            Encoding::QueryComponent => &QUERY_TAB,
        }
    }
}

/// Returns `true` if `c` must be percent encoded in the given `mode`.
#[inline]
pub fn should_escape(c: u8, mode: Encoding) -> bool {
    !mode.table()[c as usize]
}

/// Percent encodes every byte of `s` that is not allowed in `mode`.
///
/// Returns the input unchanged when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use sipuri::escape::{escape, Encoding};
///
/// assert_eq!(escape("project x", Encoding::QueryComponent), "project%20x");
/// assert_eq!(escape("j@s0n", Encoding::UserInfo), "j%40s0n");
/// assert_eq!(escape("[::1]:5060", Encoding::Host), "[::1]:5060");
/// ```
pub fn escape(s: &str, mode: Encoding) -> Cow<'_, str> {
    let hex_count = s.bytes().filter(|&c| should_escape(c, mode)).count();
    if hex_count == 0 {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 2 * hex_count);
    for c in s.bytes() {
        if should_escape(c, mode) {
            escaped.push('%');
            escaped.push(UPPER_HEX[(c >> 4) as usize] as char);
            escaped.push(UPPER_HEX[(c & 15) as usize] as char);
        } else {
            escaped.push(c as char);
        }
    }

    Cow::Owned(escaped)
}

/// Decodes every `%XY` triplet in `s`.
///
/// Triplets are decoded byte by byte, so the escaped bytes of a multi-byte
/// UTF-8 sequence reassemble into the original character. A `%` not followed
/// by two hex digits, or escaped bytes that are not valid UTF-8, fail with an
/// [`EscapeError`] naming the offending triplet.
///
/// # Examples
///
/// ```
/// use sipuri::escape::unescape;
///
/// assert_eq!(unescape("j%40s0n").unwrap(), "j@s0n");
/// assert_eq!(unescape("%CE%94").unwrap(), "\u{394}");
/// assert_eq!(unescape("%xx").unwrap_err().fragment(), "%xx");
/// ```
pub fn unescape(s: &str) -> Result<Cow<'_, str>, EscapeError> {
    if !s.contains('%') {
        return Ok(Cow::Borrowed(s));
    }

    let mut decoded = Vec::with_capacity(s.len());
    for item in Unescaper::new(s) {
        let (_, byte) = item?;
        decoded.push(byte);
    }

    match String::from_utf8(decoded) {
        Ok(decoded) => Ok(Cow::Owned(decoded)),
        Err(err) => {
            let at = source_offset(s, err.utf8_error().valid_up_to());
            Err(EscapeError::at(s, at))
        }
    }
}

/// Validates `s` as [`unescape`] would, without allocating the result.
///
/// Reports the same error `unescape` would return for the same input.
pub fn check_unescape(s: &str) -> Result<(), EscapeError> {
    if !s.contains('%') {
        return Ok(());
    }

    for item in Unescaper::new(s) {
        item?;
    }

    // All triplets are well formed, check that the decoded bytes are UTF-8.
    let mut bytes = Unescaper::new(s).flatten();
    let mut buf = [0u8; 4];
    while let Some((start, lead)) = bytes.next() {
        let width = utf8_width(lead);
        if width == 0 {
            return Err(EscapeError::at(s, start));
        }
        buf[0] = lead;
        for slot in buf.iter_mut().take(width).skip(1) {
            match bytes.next() {
                Some((_, byte)) => *slot = byte,
                None => return Err(EscapeError::at(s, start)),
            }
        }
        if str::from_utf8(&buf[..width]).is_err() {
            return Err(EscapeError::at(s, start));
        }
    }

    Ok(())
}

/// Yields each decoded byte along with the offset in the source where it
/// starts. Stops after the first malformed triplet.
struct Unescaper<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Unescaper<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl Iterator for Unescaper<'_> {
    type Item = Result<(usize, u8), EscapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let &c = bytes.get(start)?;

        if c != b'%' {
            self.pos += 1;
            return Some(Ok((start, c)));
        }

        let hi = bytes.get(start + 1).copied().and_then(from_hex);
        let lo = bytes.get(start + 2).copied().and_then(from_hex);
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                self.pos += 3;
                Some(Ok((start, hi << 4 | lo)))
            }
            _ => {
                self.pos = bytes.len();
                Some(Err(EscapeError::at(self.src, start)))
            }
        }
    }
}

#[inline]
fn from_hex(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Width of the UTF-8 sequence introduced by `lead`, or 0 if it cannot start one.
#[inline]
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

/// Maps the number of decoded bytes back to an offset in the source.
fn source_offset(src: &str, decoded: usize) -> usize {
    Unescaper::new(src)
        .flatten()
        .nth(decoded)
        .map_or(src.len(), |(start, _)| start)
}
