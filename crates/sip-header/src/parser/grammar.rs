// Lexical productions from RFC 3261 section 25.1, as nom parsers.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::digit1,
    combinator::{map, map_res, not, opt, recognize},
    sequence::{delimited, pair, preceded, terminated, tuple},
};
use std::net::IpAddr;
use std::str;

use crate::parser::ParseResult;
use crate::types::param::QValue;
use crate::types::uri::Host;

/// token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
pub fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~')
}

pub fn token(input: &[u8]) -> ParseResult<'_, &[u8]> {
    take_while1(is_token_char)(input)
}

/// True if `text` is a non-empty token.
pub fn is_token(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(is_token_char)
}

// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
pub fn scheme(input: &[u8]) -> ParseResult<'_, &[u8]> {
    recognize(pair(
        take_while_m_n(1, 1, |c: u8| c.is_ascii_alphabetic()),
        opt(take_while1(|c: u8| c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.'))),
    ))(input)
}

fn is_hostname_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_')
}

// hostname = *( domainlabel "." ) toplabel [ "." ]
// Labels are taken as one run and validated afterwards.
pub fn hostname(input: &[u8]) -> ParseResult<'_, Host> {
    map_res(take_while1(is_hostname_char), |bytes: &[u8]| {
        let valid = bytes[0] != b'.'
            && bytes[0] != b'-'
            && !bytes.windows(2).any(|w| w == b"..");
        if !valid {
            return Err("malformed hostname");
        }
        str::from_utf8(bytes)
            .map(|s| Host::Domain(s.to_string()))
            .map_err(|_| "hostname is not UTF-8")
    })(input)
}

// IPv4address = 1*3DIGIT "." 1*3DIGIT "." 1*3DIGIT "." 1*3DIGIT
pub fn ipv4_address(input: &[u8]) -> ParseResult<'_, Host> {
    map_res(
        recognize(tuple((
            take_while_m_n(1, 3, |c: u8| c.is_ascii_digit()),
            tag(b"."),
            take_while_m_n(1, 3, |c: u8| c.is_ascii_digit()),
            tag(b"."),
            take_while_m_n(1, 3, |c: u8| c.is_ascii_digit()),
            tag(b"."),
            take_while_m_n(1, 3, |c: u8| c.is_ascii_digit()),
        ))),
        |bytes: &[u8]| {
            str::from_utf8(bytes)
                .map_err(|_| "address is not UTF-8")
                .and_then(|s| s.parse::<IpAddr>().map_err(|_| "invalid IPv4 address"))
                .map(Host::Address)
        },
    )(input)
}

// IPv6reference = "[" IPv6address "]"
pub fn ipv6_reference(input: &[u8]) -> ParseResult<'_, Host> {
    map_res(
        delimited(
            tag(b"["),
            take_while1(|c: u8| c.is_ascii_hexdigit() || c == b':' || c == b'.'),
            tag(b"]"),
        ),
        |bytes: &[u8]| {
            str::from_utf8(bytes)
                .map_err(|_| "address is not UTF-8")
                .and_then(|s| s.parse::<IpAddr>().map_err(|_| "invalid IPv6 address"))
                .map(Host::Address)
        },
    )(input)
}

// host = hostname / IPv4address / IPv6reference
// An IPv4 match must not run on into hostname characters ("10.0.0.1a" is a hostname).
pub fn host(input: &[u8]) -> ParseResult<'_, Host> {
    alt((
        ipv6_reference,
        terminated(ipv4_address, not(take_while1(is_hostname_char))),
        hostname,
    ))(input)
}

// port = 1*DIGIT
pub fn port(input: &[u8]) -> ParseResult<'_, u16> {
    map_res(digit1, |bytes: &[u8]| {
        str::from_utf8(bytes)
            .map_err(|_| "port is not UTF-8")
            .and_then(|s| s.parse::<u16>().map_err(|_| "port out of range"))
    })(input)
}

// Unsigned 32-bit decimal, as used by expires, reg-id and ttl.
pub fn uint32(input: &[u8]) -> ParseResult<'_, u32> {
    map_res(digit1, |bytes: &[u8]| {
        str::from_utf8(bytes)
            .map_err(|_| "value is not UTF-8")
            .and_then(|s| s.parse::<u32>().map_err(|_| "value out of range"))
    })(input)
}

fn fraction_thousandths(digits: &[u8]) -> u16 {
    let mut value = 0u16;
    for i in 0..3 {
        let d = digits.get(i).map(|c| (c - b'0') as u16).unwrap_or(0);
        value = value * 10 + d;
    }
    value
}

// qvalue = ( "0" [ "." 0*3DIGIT ] ) / ( "1" [ "." 0*3("0") ] )
pub fn qvalue(input: &[u8]) -> ParseResult<'_, QValue> {
    alt((
        map(
            preceded(tag(b"1"), opt(preceded(tag(b"."), take_while_m_n(0, 3, |c: u8| c == b'0')))),
            |_| QValue::ONE,
        ),
        map(
            preceded(
                tag(b"0"),
                opt(preceded(tag(b"."), take_while_m_n(0, 3, |c: u8| c.is_ascii_digit()))),
            ),
            |frac: Option<&[u8]>| QValue::from_thousandths_unchecked(fraction_thousandths(frac.unwrap_or(b""))),
        ),
    ))(input)
}

/// Remove the backslash from each quoted-pair.
pub fn unescape_quoted(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Decodes URI percent-encoding (%HH).
pub fn unescape_uri_component(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let value = u8::from_str_radix(str::from_utf8(hex).ok()?, 16).ok()?;
            out.push(value);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
