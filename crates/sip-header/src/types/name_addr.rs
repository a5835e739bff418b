//! # Name-addr header values
//!
//! The value form shared by `To`, `From`, `Contact`, `Route`,
//! `Record-Route`, `Reply-To`, `Refer-To` and similar headers: an optional
//! display name, a URI in angle brackets (or bare), and header parameters.
//! `Contact: *` is represented as the all-contacts wildcard.
//!
//! Values are created straight from the wire text and only parsed when a
//! structured accessor is first called. Until then [`Display`](fmt::Display)
//! writes the original bytes back unchanged.
//!
//! ```rust
//! use rvoip_sip_header::{params, NameAddr};
//!
//! let mut to = NameAddr::from_raw("Bob <sip:bob@biloxi.com>;tag=a6c85cf");
//! assert!(!to.is_parsed());
//! assert_eq!(to.to_string(), "Bob <sip:bob@biloxi.com>;tag=a6c85cf");
//!
//! assert_eq!(to.display_name().unwrap(), "Bob");
//! assert_eq!(to.param(params::Tag).unwrap(), "a6c85cf");
//! assert!(to.is_parsed());
//!
//! // Once parsed the value is written canonically
//! assert_eq!(to.to_string(), "\"Bob\" <sip:bob@biloxi.com>;tag=a6c85cf");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use crate::context::HeaderContext;
use crate::encode::write_display_name;
use crate::error::{Error, Result};
use crate::params::ParamSpec;
use crate::parser::cursor::Cursor;
use crate::parser::parse_name_addr;
use crate::types::lazy::{HeaderGrammar, ParsedValue};
use crate::types::param::{ParamType, UnknownParam};
use crate::types::param_list::ParamList;
use crate::types::raw::RawSpan;
use crate::types::uri::Uri;

/// Structured part of a name-addr, without its header parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameAddrFields {
    /// Unescaped display name; empty when absent
    pub display_name: String,
    pub uri: Uri,
    /// `*`; display name and URI are then not written
    pub all_contacts: bool,
}

impl HeaderGrammar for NameAddrFields {
    const COMPONENT: &'static str = "NameAddr";

    fn parse(cursor: &mut Cursor<'_>, context: &HeaderContext, params: &mut ParamList) -> Result<Self> {
        parse_name_addr(cursor, context, params)
    }

    fn encode<W: Write + ?Sized>(
        &self,
        params: &ParamList,
        context: &HeaderContext,
        out: &mut W,
    ) -> fmt::Result {
        if self.all_contacts {
            out.write_char('*')?;
        } else {
            if !self.display_name.is_empty() {
                write_display_name(out, &self.display_name, context.config().display_name_quoting)?;
                out.write_char(' ')?;
            }
            out.write_char('<')?;
            self.uri.encode(out)?;
            out.write_char('>')?;
        }
        write!(out, "{}", params)
    }
}

/// A lazily parsed name-addr header value.
#[derive(Debug, Clone)]
pub struct NameAddr {
    inner: ParsedValue<NameAddrFields>,
}

impl NameAddr {
    /// Wrap raw wire text; nothing is parsed yet.
    pub fn from_raw(raw: impl Into<RawSpan>) -> Self {
        Self::from_raw_in(raw, HeaderContext::standard())
    }

    pub fn from_raw_in(raw: impl Into<RawSpan>, context: Arc<HeaderContext>) -> Self {
        Self {
            inner: ParsedValue::from_raw(raw, context),
        }
    }

    /// An already parsed value around `uri`, no display name.
    pub fn from_uri(uri: Uri) -> Self {
        Self::from_uri_in(uri, HeaderContext::standard())
    }

    pub fn from_uri_in(uri: Uri, context: Arc<HeaderContext>) -> Self {
        Self::from_fields(
            NameAddrFields {
                uri,
                ..Default::default()
            },
            context,
        )
    }

    pub fn new(display_name: impl Into<String>, uri: Uri) -> Self {
        Self::from_fields(
            NameAddrFields {
                display_name: display_name.into(),
                uri,
                all_contacts: false,
            },
            HeaderContext::standard(),
        )
    }

    /// `Contact: *`
    pub fn wildcard() -> Self {
        Self::from_fields(
            NameAddrFields {
                all_contacts: true,
                ..Default::default()
            },
            HeaderContext::standard(),
        )
    }

    fn from_fields(fields: NameAddrFields, context: Arc<HeaderContext>) -> Self {
        Self {
            inner: ParsedValue::from_parsed(fields, ParamList::new(), context),
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.inner.is_parsed()
    }

    /// Parse now, reporting any grammar error.
    pub fn check_parsed(&mut self) -> Result<()> {
        self.inner.check_parsed().map(|_| ())
    }

    /// The lazy value underneath.
    pub fn as_parsed_value(&self) -> &ParsedValue<NameAddrFields> {
        &self.inner
    }

    pub fn raw(&self) -> Option<&RawSpan> {
        self.inner.raw()
    }

    pub fn context(&self) -> &Arc<HeaderContext> {
        self.inner.context()
    }

    pub fn fields(&mut self) -> Result<&NameAddrFields> {
        self.inner.value()
    }

    pub fn uri(&mut self) -> Result<&Uri> {
        Ok(&self.inner.value()?.uri)
    }

    pub fn uri_mut(&mut self) -> Result<&mut Uri> {
        Ok(&mut self.inner.value_mut()?.uri)
    }

    pub fn display_name(&mut self) -> Result<&str> {
        Ok(&self.inner.value()?.display_name)
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.value_mut()?.display_name = name.into();
        Ok(())
    }

    pub fn is_all_contacts(&mut self) -> Result<bool> {
        Ok(self.inner.value()?.all_contacts)
    }

    /// Turn this value into the `*` wildcard.
    pub fn set_all_contacts(&mut self) -> Result<()> {
        self.inner.value_mut()?.all_contacts = true;
        Ok(())
    }

    pub fn params(&mut self) -> Result<&ParamList> {
        self.inner.params()
    }

    pub fn params_mut(&mut self) -> Result<&mut ParamList> {
        self.inner.params_mut()
    }

    pub fn exists(&mut self, kind: ParamType) -> Result<bool> {
        self.inner.exists(kind)
    }

    pub fn remove(&mut self, kind: ParamType) -> Result<bool> {
        self.inner.remove(kind)
    }

    pub fn set_flag(&mut self, kind: ParamType) -> Result<()> {
        self.inner.set_flag(kind)
    }

    /// Typed header parameter; [`Error::MissingParameter`] when absent.
    pub fn param<P: ParamSpec>(&mut self, spec: P) -> Result<&P::Value> {
        self.inner.param(spec)
    }

    pub fn get_param<P: ParamSpec>(&mut self, spec: P) -> Result<Option<&P::Value>> {
        self.inner.get_param(spec)
    }

    /// Typed header parameter, created with its default on first write.
    pub fn param_mut<P: ParamSpec>(&mut self, spec: P) -> Result<&mut P::Value> {
        self.inner.param_mut(spec)
    }

    pub fn set_param<P: ParamSpec>(&mut self, spec: P, value: P::Value) -> Result<()> {
        self.inner.set_param(spec, value)
    }

    pub fn unknown_param(&mut self, name: &str) -> Result<Option<&UnknownParam>> {
        self.inner.unknown_param(name)
    }

    pub fn add_unknown_param(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.inner.add_unknown_param(name, value)
    }

    /// Compare by URI only, using [`Uri::cmp_uri`]. Neither value changes
    /// state; a value that fails to parse yields its grammar error.
    ///
    /// `NameAddr` is not `Ord` because `==` also looks at the display name.
    pub fn cmp_uri(&self, other: &NameAddr) -> Result<Ordering> {
        let a = self.inner.snapshot()?;
        let b = other.inner.snapshot()?;
        Ok(a.value.uri.cmp_uri(&b.value.uri))
    }

    /// Write the value into any `fmt::Write` sink.
    pub fn encode<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        self.inner.encode(out)
    }
}

// Two name-addrs are equal when URI and display name match; parameters are
// not compared. Values that fail to parse only equal identical raw text.
impl PartialEq for NameAddr {
    fn eq(&self, other: &Self) -> bool {
        match (self.inner.snapshot(), other.inner.snapshot()) {
            (Ok(a), Ok(b)) => a.value.uri == b.value.uri && a.value.display_name == b.value.display_name,
            _ => self.raw().is_some() && self.raw() == other.raw(),
        }
    }
}

impl Eq for NameAddr {}

impl fmt::Display for NameAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode(f)
    }
}

impl FromStr for NameAddr {
    type Err = Error;

    /// Parses eagerly, so malformed text is rejected here.
    fn from_str(s: &str) -> Result<Self> {
        let mut name_addr = NameAddr::from_raw(s.to_string());
        name_addr.check_parsed()?;
        Ok(name_addr)
    }
}

impl From<Uri> for NameAddr {
    fn from(uri: Uri) -> Self {
        NameAddr::from_uri(uri)
    }
}

impl Serialize for NameAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NameAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(NameAddr::from_raw(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_lazy_until_accessed() {
        let mut na = NameAddr::from_raw("<sip:alice@atlanta.com>;tag=1928301774");
        assert!(!na.is_parsed());
        assert!(na.raw().is_some());
        assert_eq!(na.uri().unwrap().host.to_string(), "atlanta.com");
        assert!(na.is_parsed());
        assert!(na.raw().is_none());
    }

    #[test]
    fn test_failed_parse_stays_unparsed() {
        let mut na = NameAddr::from_raw("<sip:alice@atlanta.com");
        assert!(na.uri().is_err());
        assert!(!na.is_parsed());
        assert_eq!(na.to_string(), "<sip:alice@atlanta.com");
    }

    #[test]
    fn test_from_uri_and_new() {
        let na = NameAddr::from_uri(Uri::sip("biloxi.com").with_user("bob"));
        assert!(na.is_parsed());
        assert_eq!(na.to_string(), "<sip:bob@biloxi.com>");

        let na = NameAddr::new("Bob", Uri::sip("biloxi.com").with_user("bob"));
        assert_eq!(na.to_string(), "\"Bob\" <sip:bob@biloxi.com>");
    }

    #[test]
    fn test_wildcard() {
        let mut na = NameAddr::wildcard();
        assert!(na.is_all_contacts().unwrap());
        na.set_param(params::Expires, 0).unwrap();
        assert_eq!(na.to_string(), "*;expires=0");
    }

    #[test]
    fn test_equality_ignores_params() {
        let a = NameAddr::from_raw("Bob <sip:bob@biloxi.com>;tag=1");
        let b = NameAddr::from_raw("Bob <sip:bob@BILOXI.com>;tag=2");
        let c = NameAddr::from_raw("Robert <sip:bob@biloxi.com>");
        assert_eq!(a, b);
        assert_ne!(a, c);
        // comparing does not change state
        assert!(!a.is_parsed());
    }

    #[test]
    fn test_unparseable_equality() {
        let a = NameAddr::from_raw("<broken");
        let b = NameAddr::from_raw("<broken");
        assert_eq!(a, b);
        assert_ne!(a, NameAddr::from_raw("<other"));
    }

    #[test]
    fn test_cmp_uri() {
        let alice = NameAddr::from_raw("Zed <sip:alice@atlanta.com>;tag=1");
        let bob = NameAddr::from_raw("\"Amy\" <sip:bob@BILOXI.com>");
        assert_eq!(alice.cmp_uri(&bob).unwrap(), Ordering::Less);
        assert_eq!(bob.cmp_uri(&alice).unwrap(), Ordering::Greater);
        assert_eq!(bob.cmp_uri(&NameAddr::from_raw("<sip:bob@biloxi.com>")).unwrap(), Ordering::Equal);
        assert!(!alice.is_parsed());
        assert!(!bob.is_parsed());

        let broken = NameAddr::from_raw("<sip:bob@biloxi.com");
        assert!(matches!(alice.cmp_uri(&broken), Err(Error::Grammar(_))));
        assert!(broken.cmp_uri(&alice).is_err());
    }

    #[test]
    fn test_from_str_is_eager() {
        assert!("<sip:a@b".parse::<NameAddr>().is_err());
        let na: NameAddr = "sip:a@b".parse().unwrap();
        assert!(na.is_parsed());
    }
}
