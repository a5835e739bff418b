//! Wire encoding helpers
//!
//! Everything here writes into a caller-supplied [`fmt::Write`] sink, which
//! may be a `String`, a `fmt::Formatter` or a [`BytesMut`] through
//! [`BytesSink`].

use bytes::{BufMut, BytesMut};
use std::fmt::{self, Write};

use crate::config::DisplayNameQuoting;
use crate::parser::cursor::Cursor;

// Characters allowed in an unquoted display-name token besides alphanumerics.
const SAFE_DISPLAY_NAME_CHARS: &[u8] = b"-.!%*_+`'~";

/// Whether a display name has to be written as a quoted-string.
///
/// An empty name needs no quotes. A name that is already a properly closed
/// quoted-string (nothing but whitespace after the closing quote) needs
/// none either, while one with an unbalanced leading quote does. Otherwise
/// quoting is required as soon as one whitespace-separated word holds a
/// character outside alphanumerics and ``- . ! % * _ + ` ' ~``.
pub fn must_quote_display_name(name: &str) -> bool {
    let mut cursor = Cursor::new(name.as_bytes(), "DisplayName");
    cursor.skip_whitespace();
    if cursor.eof() {
        return false;
    }

    if cursor.at(b'"') {
        cursor.advance();
        if cursor.skip_to_end_quote(b'"').is_err() {
            return true;
        }
        cursor.advance();
        cursor.skip_whitespace();
        return !cursor.eof();
    }

    while !cursor.eof() {
        let start = cursor.mark();
        cursor.skip_non_whitespace();
        let word = cursor.slice(start);
        if word
            .iter()
            .any(|&c| !c.is_ascii_alphanumeric() && !SAFE_DISPLAY_NAME_CHARS.contains(&c))
        {
            return true;
        }
        cursor.skip_whitespace();
    }
    false
}

/// Write `text` as a quoted-string, escaping `"` and `\`.
pub fn write_quoted<W: Write + ?Sized>(out: &mut W, text: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    out.write_char('"')
}

/// Write a stored (unescaped) display name according to `quoting`. Writes
/// nothing for an empty name.
///
/// A stored name holding `"` or `\` is always written as an escaped
/// quoted-string, so that parsing the output yields the same name.
pub fn write_display_name<W: Write + ?Sized>(
    out: &mut W,
    name: &str,
    quoting: DisplayNameQuoting,
) -> fmt::Result {
    if name.is_empty() {
        return Ok(());
    }
    match quoting {
        DisplayNameQuoting::Always => write_quoted(out, name),
        DisplayNameQuoting::WhenRequired
            if name.contains(['"', '\\']) || must_quote_display_name(name) =>
        {
            write_quoted(out, name)
        }
        DisplayNameQuoting::WhenRequired => out.write_str(name),
    }
}

/// Adapts a [`BytesMut`] to [`fmt::Write`].
///
/// ```rust
/// use bytes::BytesMut;
/// use rvoip_sip_header::encode::BytesSink;
/// use rvoip_sip_header::NameAddr;
///
/// let na = NameAddr::from_raw("Bob <sip:bob@biloxi.com>;tag=a6c85cf");
/// let mut buf = BytesMut::new();
/// na.encode(&mut BytesSink(&mut buf)).unwrap();
/// assert_eq!(&buf[..], b"Bob <sip:bob@biloxi.com>;tag=a6c85cf");
/// ```
pub struct BytesSink<'a>(pub &'a mut BytesMut);

impl Write for BytesSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.put_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_quote_display_name() {
        assert!(!must_quote_display_name(""));
        assert!(!must_quote_display_name("   "));
        assert!(!must_quote_display_name("Bob"));
        assert!(!must_quote_display_name("John Smith"));
        assert!(!must_quote_display_name("a.b-c!d%e*f_g+h`i'j~k"));
        assert!(!must_quote_display_name("\"Already Quoted\""));
        assert!(!must_quote_display_name("\"Esc \\\" aped\"  "));

        assert!(must_quote_display_name("\"unterminated"));
        assert!(must_quote_display_name("\"closed\" trailing"));
        assert!(must_quote_display_name("Smith, John"));
        assert!(must_quote_display_name("a<b"));
        assert!(must_quote_display_name("Zoë"));
    }

    #[test]
    fn test_write_quoted_escapes() {
        let mut out = String::new();
        write_quoted(&mut out, r#"say "hi" \o/"#).unwrap();
        assert_eq!(out, r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn test_write_display_name_policies() {
        let cases = [
            ("Bob", DisplayNameQuoting::Always, "\"Bob\""),
            ("Bob", DisplayNameQuoting::WhenRequired, "Bob"),
            ("\"Bob\"", DisplayNameQuoting::Always, r#""\"Bob\"""#),
            ("\"Bob\"", DisplayNameQuoting::WhenRequired, r#""\"Bob\"""#),
            ("a\\b", DisplayNameQuoting::WhenRequired, r#""a\\b""#),
            (" ", DisplayNameQuoting::Always, "\" \""),
            ("Smith, John", DisplayNameQuoting::WhenRequired, "\"Smith, John\""),
            ("", DisplayNameQuoting::Always, ""),
        ];
        for (name, quoting, expected) in cases {
            let mut out = String::new();
            write_display_name(&mut out, name, quoting).unwrap();
            assert_eq!(out, expected, "name {:?} with {:?}", name, quoting);
        }
    }

    #[test]
    fn test_bytes_sink() {
        let mut buf = BytesMut::new();
        write!(BytesSink(&mut buf), "a{}c", "b").unwrap();
        assert_eq!(&buf[..], b"abc");
    }
}
