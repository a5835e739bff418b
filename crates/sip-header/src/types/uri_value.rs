use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use crate::context::HeaderContext;
use crate::error::{Error, Result};
use crate::params::ParamSpec;
use crate::parser::cursor::Cursor;
use crate::parser::parse_uri;
use crate::types::lazy::{missing_parameter, HeaderGrammar, ParsedValue};
use crate::types::param::ParamType;
use crate::types::param_list::ParamList;
use crate::types::raw::RawSpan;
use crate::types::uri::Uri;

// A bare URI has no header parameters of its own; everything after `;`
// belongs to the URI.
impl HeaderGrammar for Uri {
    const COMPONENT: &'static str = "Uri";

    fn parse(cursor: &mut Cursor<'_>, context: &HeaderContext, _params: &mut ParamList) -> Result<Self> {
        cursor.skip_whitespace();
        parse_uri(cursor, context.uri_params())
    }

    fn encode<W: Write + ?Sized>(
        &self,
        _params: &ParamList,
        _context: &HeaderContext,
        out: &mut W,
    ) -> fmt::Result {
        Uri::encode(self, out)
    }
}

/// A lazily parsed stand-alone URI, such as a Request-URI.
///
/// Parameter accessors work on the URI's own parameters.
#[derive(Debug, Clone)]
pub struct UriValue {
    inner: ParsedValue<Uri>,
}

impl UriValue {
    pub fn from_raw(raw: impl Into<RawSpan>) -> Self {
        Self::from_raw_in(raw, HeaderContext::standard())
    }

    pub fn from_raw_in(raw: impl Into<RawSpan>, context: Arc<HeaderContext>) -> Self {
        Self {
            inner: ParsedValue::from_raw(raw, context),
        }
    }

    pub fn from_uri(uri: Uri) -> Self {
        Self {
            inner: ParsedValue::from_parsed(uri, ParamList::new(), HeaderContext::standard()),
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.inner.is_parsed()
    }

    pub fn check_parsed(&mut self) -> Result<()> {
        self.inner.check_parsed().map(|_| ())
    }

    pub fn raw(&self) -> Option<&RawSpan> {
        self.inner.raw()
    }

    pub fn uri(&mut self) -> Result<&Uri> {
        self.inner.value()
    }

    pub fn uri_mut(&mut self) -> Result<&mut Uri> {
        self.inner.value_mut()
    }

    pub fn into_uri(self) -> Result<Uri> {
        Ok(self.inner.into_parsed()?.value)
    }

    fn uri_params(&mut self) -> Result<&mut ParamList> {
        Ok(&mut self.inner.value_mut()?.parameters)
    }

    pub fn exists(&mut self, kind: ParamType) -> Result<bool> {
        Ok(self.uri_params()?.exists(kind))
    }

    pub fn remove(&mut self, kind: ParamType) -> Result<bool> {
        Ok(self.uri_params()?.remove(kind))
    }

    pub fn set_flag(&mut self, kind: ParamType) -> Result<()> {
        self.uri_params()?.set_flag(kind);
        Ok(())
    }

    /// Typed URI parameter; [`Error::MissingParameter`] when absent.
    pub fn param<P: ParamSpec>(&mut self, _: P) -> Result<&P::Value> {
        match self.uri_params()?.typed::<P>() {
            Some(value) => Ok(value),
            None => Err(missing_parameter::<P>(Uri::COMPONENT)),
        }
    }

    pub fn get_param<P: ParamSpec>(&mut self, _: P) -> Result<Option<&P::Value>> {
        Ok(self.uri_params()?.typed::<P>())
    }

    pub fn param_mut<P: ParamSpec>(&mut self, _: P) -> Result<&mut P::Value> {
        self.uri_params()?
            .typed_mut::<P>()
            .ok_or_else(|| missing_parameter::<P>(Uri::COMPONENT))
    }

    pub fn set_param<P: ParamSpec>(&mut self, _: P, value: P::Value) -> Result<()> {
        self.uri_params()?.set_typed::<P>(value);
        Ok(())
    }

    pub fn encode<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        self.inner.encode(out)
    }
}

impl PartialEq for UriValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.inner.snapshot(), other.inner.snapshot()) {
            (Ok(a), Ok(b)) => a.value == b.value,
            _ => self.raw().is_some() && self.raw() == other.raw(),
        }
    }
}

impl Eq for UriValue {}

impl fmt::Display for UriValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode(f)
    }
}

impl FromStr for UriValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut value = UriValue::from_raw(s.to_string());
        value.check_parsed()?;
        Ok(value)
    }
}

impl From<Uri> for UriValue {
    fn from(uri: Uri) -> Self {
        UriValue::from_uri(uri)
    }
}

impl Serialize for UriValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UriValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(UriValue::from_raw(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_lazy_uri_value() {
        let mut value = UriValue::from_raw("sip:proxy.example.com;lr;transport=tcp");
        assert!(!value.is_parsed());
        assert!(value.exists(ParamType::Lr).unwrap());
        assert_eq!(value.param(params::Transport).unwrap(), "tcp");
        assert!(value.is_parsed());
    }

    #[test]
    fn test_missing_uri_param() {
        let mut value = UriValue::from_raw("sip:proxy.example.com");
        let err = value.param(params::Ttl).unwrap_err();
        assert_eq!(err, Error::MissingParameter { component: "Uri", name: "ttl" });

        *value.param_mut(params::Ttl).unwrap() = 5;
        assert_eq!(value.to_string(), "sip:proxy.example.com;ttl=5");
    }

    #[test]
    fn test_rejects_trailing_text() {
        assert!("sip:a@b c".parse::<UriValue>().is_err());
        assert!("<sip:a@b>".parse::<UriValue>().is_err());
    }
}
