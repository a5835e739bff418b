// SIP-URI / SIPS-URI / tel URI (RFC 3261 section 25.1, RFC 3966).
//
// The URI ends at `>`, whitespace or the end of input; parameters and
// headers may not contain any of those unescaped.
//
// Userinfo is present when an `@` occurs anywhere before that end, even
// after a `;` or `?`. That keeps `sip:+1;npdi@gw` as user `+1;npdi`, at the
// cost of reading `sip:example.com;x=a@b` as user `example.com;x=a` on
// host `b`. An `@` inside a URI parameter must be escaped as `%40`.

use crate::error::Result;
use crate::parser::cursor::Cursor;
use crate::parser::grammar::{self, unescape_uri_component};
use crate::parser::{parse_one_param, URI_PARAM_TERMINATORS};
use crate::registry::ParamRegistry;
use crate::types::uri::{Host, Scheme, Uri};

const URI_END: &[u8] = b"> \t\r\n";

fn decode(cursor: &Cursor<'_>, raw: &str, what: &str) -> Result<String> {
    unescape_uri_component(raw)
        .ok_or_else(|| cursor.fail(format!("Invalid escape in {}", what)).into())
}

fn parse_userinfo(cursor: &mut Cursor<'_>, uri: &mut Uri) -> Result<()> {
    let rest = cursor.remaining();
    let end = rest.iter().position(|b| URI_END.contains(b)).unwrap_or(rest.len());
    let Some(at) = rest[..end].iter().position(|&b| b == b'@') else {
        return Ok(());
    };

    let start = cursor.mark();
    cursor.skip_to_char(b'@');
    debug_assert_eq!(cursor.position() - start.offset(), at);
    let userinfo = cursor.as_str(start)?;
    let (user, password) = match userinfo.split_once(':') {
        Some((user, password)) => (user, Some(password)),
        None => (userinfo, None),
    };
    if user.is_empty() {
        return Err(cursor.fail_at(start.offset(), "Empty user part").into());
    }
    uri.user = Some(decode(cursor, user, "user part")?);
    uri.password = password.map(|p| decode(cursor, p, "password")).transpose()?;
    cursor.skip_char(b'@')?;
    Ok(())
}

fn parse_headers(cursor: &mut Cursor<'_>, uri: &mut Uri) -> Result<()> {
    loop {
        let start = cursor.mark();
        cursor.skip_to_one_of(b"=&> \t\r\n");
        let name = decode(cursor, cursor.as_str(start)?, "URI header name")?;
        if name.is_empty() {
            return Err(cursor.fail("Empty URI header name").into());
        }
        cursor.skip_char(b'=')?;
        let start = cursor.mark();
        cursor.skip_to_one_of(b"&> \t\r\n");
        let value = decode(cursor, cursor.as_str(start)?, "URI header value")?;
        uri.headers.push((name, value));
        if !cursor.at(b'&') {
            return Ok(());
        }
        cursor.advance();
    }
}

fn parse_uri_inner(cursor: &mut Cursor<'_>, registry: &ParamRegistry) -> Result<Uri> {
    let scheme = cursor.parse_with(grammar::scheme, "URI scheme")?;
    let scheme_start = cursor.position() - scheme.len();
    let scheme: Scheme = std::str::from_utf8(scheme)
        .map_err(|_| cursor.fail_at(scheme_start, "Invalid URI scheme"))?
        .parse()?;
    cursor.skip_char(b':')?;

    let mut uri = Uri::new(scheme, Host::default());
    match scheme {
        Scheme::Tel => {
            let start = cursor.mark();
            cursor.skip_to_one_of(URI_PARAM_TERMINATORS);
            let number = cursor.extract(start)?;
            if number.is_empty() {
                return Err(cursor.fail("Empty telephone number").into());
            }
            uri.host = Host::Domain(number);
        }
        Scheme::Sip | Scheme::Sips => {
            parse_userinfo(cursor, &mut uri)?;
            uri.host = cursor.parse_with(grammar::host, "host")?;
            if cursor.at(b':') {
                cursor.advance();
                uri.port = Some(cursor.parse_with(grammar::port, "port")?);
            }
        }
    }

    while cursor.at(b';') {
        cursor.advance();
        let param = parse_one_param(cursor, registry, URI_PARAM_TERMINATORS)?;
        uri.parameters.push(param);
    }

    if cursor.at(b'?') {
        cursor.advance();
        parse_headers(cursor, &mut uri)?;
    }

    match cursor.peek() {
        None => Ok(uri),
        Some(c) if URI_END.contains(&c) => Ok(uri),
        Some(_) => Err(cursor.fail("Unexpected character in URI").into()),
    }
}

/// Parse a URI at the cursor, stopping on `>`, whitespace or the end.
/// URI parameters go through `registry`; unregistered names are kept as
/// unknown parameters on the URI.
pub fn parse_uri(cursor: &mut Cursor<'_>, registry: &ParamRegistry) -> Result<Uri> {
    let previous = cursor.set_component("Uri");
    let result = parse_uri_inner(cursor, registry);
    cursor.set_component(previous);
    result
}
