//! # SIP URI
//!
//! Structured `sip:`, `sips:` and `tel:` URIs as found inside name-addr
//! values.
//!
//! ```text
//! sip:user:password@host:port;uri-parameters?headers
//! ```
//!
//! URI parameters are recognized through the URI
//! [`ParamRegistry`](crate::registry::ParamRegistry), so `transport`,
//! `lr`, `maddr` and friends come back typed while anything else is kept
//! verbatim as an unknown parameter.
//!
//! ```rust
//! use rvoip_sip_header::prelude::*;
//!
//! let uri: Uri = "sip:alice@example.com:5060;transport=udp?subject=meeting".parse().unwrap();
//! assert_eq!(uri.scheme, Scheme::Sip);
//! assert_eq!(uri.username(), Some("alice"));
//! assert_eq!(uri.port, Some(5060));
//! assert_eq!(uri.transport(), Some("udp"));
//! assert_eq!(uri.aor(), "alice@example.com:5060");
//!
//! let uri = Uri::sip("example.com").with_user("bob").with_port(5062);
//! assert_eq!(uri.to_string(), "sip:bob@example.com:5062");
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::context::HeaderContext;
use crate::error::{Error, GrammarError, Result};
use crate::parser::{parse_uri, Cursor};
use crate::types::param::{Param, ParamType, ParamValue, UnknownParam};
use crate::types::param_list::ParamList;

/// URI scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Scheme {
    #[default]
    Sip,
    Sips,
    /// Telephone number (RFC 3966)
    Tel,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("sip") {
            Ok(Scheme::Sip)
        } else if s.eq_ignore_ascii_case("sips") {
            Ok(Scheme::Sips)
        } else if s.eq_ignore_ascii_case("tel") {
            Ok(Scheme::Tel)
        } else {
            Err(GrammarError::new("Uri", format!("Unsupported URI scheme '{}'", s)).into())
        }
    }
}

/// Host part of a URI.
///
/// A `tel:` URI keeps its number here as a `Domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Host {
    /// A domain name (e.g., "example.com").
    Domain(String),
    /// An IP address (v4 or v6).
    Address(IpAddr),
}

impl Host {
    pub fn domain(domain: impl Into<String>) -> Self {
        Host::Domain(domain.into())
    }

    /// Domains compare case-insensitively.
    pub fn eq_host(&self, other: &Host) -> bool {
        match (self, other) {
            (Host::Domain(a), Host::Domain(b)) => a.eq_ignore_ascii_case(b),
            (Host::Address(a), Host::Address(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Host::Domain(String::new())
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(domain) => f.write_str(domain),
            Host::Address(IpAddr::V4(addr)) => write!(f, "{}", addr),
            Host::Address(IpAddr::V6(addr)) => write!(f, "[{}]", addr),
        }
    }
}

impl From<IpAddr> for Host {
    fn from(addr: IpAddr) -> Self {
        Host::Address(addr)
    }
}

impl From<Ipv4Addr> for Host {
    fn from(addr: Ipv4Addr) -> Self {
        Host::Address(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for Host {
    fn from(addr: Ipv6Addr) -> Self {
        Host::Address(IpAddr::V6(addr))
    }
}

/// SIP URI components as defined in RFC 3261
///
/// `user` and `password` hold the unescaped text; percent-encoding is
/// applied again when the URI is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Uri {
    pub scheme: Scheme,
    pub user: Option<String>,
    /// Password (deprecated, kept for round-trip)
    pub password: Option<String>,
    pub host: Host,
    pub port: Option<u16>,
    /// URI parameters in wire order
    pub parameters: ParamList,
    /// URI headers (`?key=value&...`) in wire order
    pub headers: Vec<(String, String)>,
}

impl Uri {
    pub fn new(scheme: Scheme, host: Host) -> Self {
        Uri {
            scheme,
            host,
            ..Default::default()
        }
    }

    pub fn sip(host: impl Into<String>) -> Self {
        Self::new(Scheme::Sip, Host::domain(host))
    }

    pub fn sips(host: impl Into<String>) -> Self {
        Self::new(Scheme::Sips, Host::domain(host))
    }

    pub fn tel(number: impl Into<String>) -> Self {
        Self::new(Scheme::Tel, Host::domain(number))
    }

    /// Parse with a specific context's URI registry.
    pub fn parse_in(input: &str, context: &HeaderContext) -> Result<Self> {
        let mut cursor = Cursor::new(input.as_bytes(), "Uri");
        let uri = parse_uri(&mut cursor, context.uri_params())?;
        if !cursor.eof() {
            return Err(cursor.fail("Unexpected trailing characters after URI").into());
        }
        Ok(uri)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_parameter(mut self, param: Param) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Returns the host and port (if present) formatted as a string
    pub fn host_port(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.to_string(),
        }
    }

    /// Address-of-record: `user@host[:port]`, without scheme or parameters.
    pub fn aor(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host_port()),
            None => self.host_port(),
        }
    }

    /// The `transport` parameter, if present
    pub fn transport(&self) -> Option<&str> {
        match self.parameters.find(ParamType::Transport) {
            Some(ParamValue::Data(value)) => Some(&value.text),
            _ => None,
        }
    }

    /// `true` for `;user=phone`
    pub fn is_phone_number(&self) -> bool {
        matches!(
            self.parameters.find(ParamType::User),
            Some(ParamValue::Data(value)) if value.text.eq_ignore_ascii_case("phone")
        )
    }

    /// `true` for `;lr`
    pub fn is_loose_route(&self) -> bool {
        self.parameters.exists(ParamType::Lr)
    }

    /// Parameters no URI factory recognized.
    pub fn unknown_parameters(&self) -> impl Iterator<Item = &UnknownParam> {
        self.parameters.unknown()
    }

    /// Sort order: scheme, host ignoring ASCII case, port, then user.
    ///
    /// Parameters and headers are not looked at, so two URIs that compare
    /// `Equal` here may still differ under `==`.
    pub fn cmp_uri(&self, other: &Uri) -> Ordering {
        self.scheme
            .cmp(&other.scheme)
            .then_with(|| {
                let a = self.host.to_string();
                let b = other.host.to_string();
                a.bytes()
                    .map(|c| c.to_ascii_lowercase())
                    .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
            })
            .then_with(|| self.port.cmp(&other.port))
            .then_with(|| self.user.cmp(&other.user))
    }

    /// Write the wire form to any `fmt::Write` sink.
    pub fn encode<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{}:", self.scheme)?;
        if let Some(user) = &self.user {
            escape_into(out, user, is_user_char)?;
            if let Some(password) = &self.password {
                out.write_char(':')?;
                escape_into(out, password, is_password_char)?;
            }
            out.write_char('@')?;
        }
        write!(out, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(out, ":{}", port)?;
        }
        write!(out, "{}", self.parameters)?;
        for (i, (name, value)) in self.headers.iter().enumerate() {
            out.write_char(if i == 0 { '?' } else { '&' })?;
            escape_into(out, name, is_header_char)?;
            out.write_char('=')?;
            escape_into(out, value, is_header_char)?;
        }
        Ok(())
    }
}

// Equality follows RFC 3261 19.1.4 loosely: case-insensitive host,
// parameters and headers compared as sets.
impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.user == other.user
            && self.password == other.password
            && self.host.eq_host(&other.host)
            && self.port == other.port
            && self.parameters.same_set(&other.parameters)
            && self.headers.len() == other.headers.len()
            && self.headers.iter().all(|h| other.headers.contains(h))
    }
}

impl Eq for Uri {}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode(f)
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uri::parse_in(s, &HeaderContext::standard())
    }
}

fn is_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

// user = 1*( unreserved / escaped / user-unreserved )
fn is_user_char(c: u8) -> bool {
    is_unreserved(c) || matches!(c, b'&' | b'=' | b'+' | b'$' | b',' | b';' | b'?' | b'/')
}

fn is_password_char(c: u8) -> bool {
    is_unreserved(c) || matches!(c, b'&' | b'=' | b'+' | b'$' | b',')
}

// hname / hvalue = 1*( hnv-unreserved / unreserved / escaped )
fn is_header_char(c: u8) -> bool {
    is_unreserved(c) || matches!(c, b'[' | b']' | b'/' | b'?' | b':' | b'+' | b'$')
}

fn escape_into<W: Write + ?Sized>(out: &mut W, text: &str, allowed: fn(u8) -> bool) -> fmt::Result {
    for &b in text.as_bytes() {
        if allowed(b) {
            out.write_char(b as char)?;
        } else {
            write!(out, "%{:02X}", b)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::param::DataValue;

    #[test]
    fn test_display_basic() {
        let uri = Uri::sip("example.com")
            .with_user("alice")
            .with_port(5060)
            .with_parameter(Param::known(ParamType::Transport, ParamValue::Data(DataValue::new("tcp"))))
            .with_parameter(Param::known(ParamType::Lr, ParamValue::Exists));
        assert_eq!(uri.to_string(), "sip:alice@example.com:5060;transport=tcp;lr");
        assert_eq!(uri.transport(), Some("tcp"));
        assert!(uri.is_loose_route());
    }

    #[test]
    fn test_display_escapes_user() {
        let uri = Uri::sip("example.com").with_user("alice smith");
        assert_eq!(uri.to_string(), "sip:alice%20smith@example.com");

        let uri = Uri::sip("example.com").with_user("+1-212-555;phone-context=x");
        assert_eq!(uri.to_string(), "sip:+1-212-555;phone-context=x@example.com");
    }

    #[test]
    fn test_display_ipv6_and_headers() {
        let uri = Uri::new(Scheme::Sip, Ipv6Addr::LOCALHOST.into())
            .with_port(5060)
            .with_header("subject", "project x")
            .with_header("priority", "urgent");
        assert_eq!(uri.to_string(), "sip:[::1]:5060?subject=project%20x&priority=urgent");
    }

    #[test]
    fn test_aor() {
        let uri = Uri::sip("Biloxi.com").with_user("bob");
        assert_eq!(uri.aor(), "bob@Biloxi.com");
        assert_eq!(Uri::sip("biloxi.com").with_port(5061).aor(), "biloxi.com:5061");
        assert_eq!(
            Uri::sip("example.com").with_user("alice").with_port(5060).aor(),
            "alice@example.com:5060"
        );
    }

    #[test]
    fn test_equality_ignores_host_case_and_param_order() {
        let a = Uri::sip("EXAMPLE.com")
            .with_parameter(Param::known(ParamType::Lr, ParamValue::Exists))
            .with_parameter(Param::unknown("x", Some("1")));
        let b = Uri::sip("example.com")
            .with_parameter(Param::unknown("x", Some("1")))
            .with_parameter(Param::known(ParamType::Lr, ParamValue::Exists));
        assert_eq!(a, b);
        assert_ne!(a, Uri::sip("example.com"));
    }

    #[test]
    fn test_cmp_uri() {
        let a = Uri::sip("Alpha.example.com").with_user("zed");
        let b = Uri::sip("beta.example.com").with_user("amy");
        assert_eq!(a.cmp_uri(&b), Ordering::Less);
        assert_eq!(b.cmp_uri(&a), Ordering::Greater);

        // host case is ignored, then port, then user decide
        let upper = Uri::sip("ALPHA.example.com").with_user("zed");
        assert_eq!(a.cmp_uri(&upper), Ordering::Equal);
        assert_eq!(a.cmp_uri(&upper.clone().with_port(5060)), Ordering::Less);
        assert_eq!(Uri::sip("alpha.example.com").cmp_uri(&a), Ordering::Less);

        // scheme first
        assert_eq!(Uri::sips("a.com").cmp_uri(&Uri::sip("z.com")), Ordering::Greater);
        assert_eq!(Uri::tel("+1").cmp_uri(&Uri::sips("a.com")), Ordering::Greater);

        let mut uris = vec![b.clone(), Uri::sips("a.com"), a.clone()];
        uris.sort_by(Uri::cmp_uri);
        assert_eq!(uris, vec![a, b, Uri::sips("a.com")]);
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("SIPS".parse::<Scheme>().unwrap(), Scheme::Sips);
        assert!("http".parse::<Scheme>().is_err());
    }
}
