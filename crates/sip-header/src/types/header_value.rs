use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::context::HeaderContext;
use crate::types::name_addr::NameAddr;
use crate::types::raw::RawSpan;
use crate::types::uri_value::UriValue;

/// The structured value kinds this crate parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderKind {
    NameAddr,
    Uri,
}

// Headers whose value is a name-addr or addr-spec, with compact forms.
const NAME_ADDR_HEADERS: &[&str] = &[
    "To",
    "t",
    "From",
    "f",
    "Contact",
    "m",
    "Reply-To",
    "Refer-To",
    "r",
    "Referred-By",
    "b",
    "Route",
    "Record-Route",
    "Path",
    "Service-Route",
    "P-Asserted-Identity",
    "P-Preferred-Identity",
    "P-Called-Party-ID",
];

impl HeaderKind {
    /// Value kind for a header name, ignoring ASCII case.
    pub fn for_header_name(name: &str) -> Option<HeaderKind> {
        let name = name.trim();
        NAME_ADDR_HEADERS
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
            .then_some(HeaderKind::NameAddr)
    }
}

/// A structured header value of any supported kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    NameAddr(NameAddr),
    Uri(UriValue),
}

impl HeaderValue {
    /// Lazily parsed value of `kind` in the standard context.
    pub fn from_raw(kind: HeaderKind, raw: impl Into<RawSpan>) -> Self {
        Self::from_raw_in(kind, raw, HeaderContext::standard())
    }

    pub fn from_raw_in(kind: HeaderKind, raw: impl Into<RawSpan>, context: Arc<HeaderContext>) -> Self {
        match kind {
            HeaderKind::NameAddr => HeaderValue::NameAddr(NameAddr::from_raw_in(raw, context)),
            HeaderKind::Uri => HeaderValue::Uri(UriValue::from_raw_in(raw, context)),
        }
    }

    pub fn kind(&self) -> HeaderKind {
        match self {
            HeaderValue::NameAddr(_) => HeaderKind::NameAddr,
            HeaderValue::Uri(_) => HeaderKind::Uri,
        }
    }

    pub fn is_parsed(&self) -> bool {
        match self {
            HeaderValue::NameAddr(v) => v.is_parsed(),
            HeaderValue::Uri(v) => v.is_parsed(),
        }
    }

    pub fn as_name_addr_mut(&mut self) -> Option<&mut NameAddr> {
        match self {
            HeaderValue::NameAddr(v) => Some(v),
            HeaderValue::Uri(_) => None,
        }
    }

    pub fn as_uri_mut(&mut self) -> Option<&mut UriValue> {
        match self {
            HeaderValue::Uri(v) => Some(v),
            HeaderValue::NameAddr(_) => None,
        }
    }

    pub fn encode<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        match self {
            HeaderValue::NameAddr(v) => v.encode(out),
            HeaderValue::Uri(v) => v.encode(out),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode(f)
    }
}

impl From<NameAddr> for HeaderValue {
    fn from(value: NameAddr) -> Self {
        HeaderValue::NameAddr(value)
    }
}

impl From<UriValue> for HeaderValue {
    fn from(value: UriValue) -> Self {
        HeaderValue::Uri(value)
    }
}
