// Lazily parsed header values.
//
// A value starts either Unparsed (holding the raw span) or Parsed. The first
// accessor that needs structure runs the grammar once and replaces the state;
// nothing ever moves back to Unparsed. A failed parse leaves the value
// Unparsed and reports the GrammarError to the caller.

use std::borrow::Cow;
use std::fmt::{self, Write};
use std::sync::Arc;
use tracing::{info, trace};

use crate::context::HeaderContext;
use crate::error::{Error, GrammarError, Result};
use crate::params::ParamSpec;
use crate::parser::cursor::Cursor;
use crate::types::param::{Param, ParamType, UnknownParam};
use crate::types::param_list::ParamList;
use crate::types::raw::RawSpan;

/// Grammar of one structured value kind.
pub trait HeaderGrammar: Clone + Sized {
    /// Name used in errors and logs
    const COMPONENT: &'static str;

    /// Parse the value, appending trailing header parameters to `params`.
    /// Whatever the implementation leaves unconsumed (after whitespace) is
    /// rejected by the caller.
    fn parse(cursor: &mut Cursor<'_>, context: &HeaderContext, params: &mut ParamList) -> Result<Self>;

    fn encode<W: Write + ?Sized>(
        &self,
        params: &ParamList,
        context: &HeaderContext,
        out: &mut W,
    ) -> fmt::Result;
}

/// Structure of a parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub params: ParamList,
}

#[derive(Debug, Clone)]
pub enum ParseState<T> {
    Unparsed(RawSpan),
    Parsed(Parsed<T>),
}

/// A header value that is parsed on first structured access.
#[derive(Debug, Clone)]
pub struct ParsedValue<T> {
    state: ParseState<T>,
    context: Arc<HeaderContext>,
}

impl<T: HeaderGrammar> ParsedValue<T> {
    pub fn from_raw(raw: impl Into<RawSpan>, context: Arc<HeaderContext>) -> Self {
        Self {
            state: ParseState::Unparsed(raw.into()),
            context,
        }
    }

    pub fn from_parsed(value: T, params: ParamList, context: Arc<HeaderContext>) -> Self {
        Self {
            state: ParseState::Parsed(Parsed { value, params }),
            context,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self.state, ParseState::Parsed(_))
    }

    pub fn state(&self) -> &ParseState<T> {
        &self.state
    }

    /// The raw span, while the value is still unparsed.
    pub fn raw(&self) -> Option<&RawSpan> {
        match &self.state {
            ParseState::Unparsed(raw) => Some(raw),
            ParseState::Parsed(_) => None,
        }
    }

    pub fn context(&self) -> &Arc<HeaderContext> {
        &self.context
    }

    /// Run the grammar over `raw` without touching any value.
    pub fn parse_raw(raw: &RawSpan, context: &HeaderContext) -> Result<Parsed<T>> {
        let limit = context.config().max_value_len;
        if raw.len() > limit {
            return Err(GrammarError::new(
                T::COMPONENT,
                format!("Value of {} bytes exceeds the limit of {}", raw.len(), limit),
            )
            .into());
        }

        let mut cursor = Cursor::new(raw.as_bytes(), T::COMPONENT);
        let mut params = ParamList::new();
        let value = T::parse(&mut cursor, context, &mut params)?;
        cursor.skip_whitespace();
        if !cursor.eof() {
            return Err(cursor.fail("Unexpected trailing characters").into());
        }
        Ok(Parsed { value, params })
    }

    /// Parse now if still unparsed.
    pub fn check_parsed(&mut self) -> Result<&mut Parsed<T>> {
        if let ParseState::Unparsed(raw) = &self.state {
            trace!(component = T::COMPONENT, len = raw.len(), "Parsing header value on first access");
            let parsed = Self::parse_raw(raw, &self.context)?;
            self.state = ParseState::Parsed(parsed);
        }
        match &mut self.state {
            ParseState::Parsed(parsed) => Ok(parsed),
            ParseState::Unparsed(_) => {
                Err(GrammarError::new(T::COMPONENT, "Value left unparsed").into())
            }
        }
    }

    /// The parsed structure without changing state; an unparsed value is
    /// parsed into a temporary copy.
    pub fn snapshot(&self) -> Result<Cow<'_, Parsed<T>>> {
        match &self.state {
            ParseState::Parsed(parsed) => Ok(Cow::Borrowed(parsed)),
            ParseState::Unparsed(raw) => Self::parse_raw(raw, &self.context).map(Cow::Owned),
        }
    }

    pub fn into_parsed(mut self) -> Result<Parsed<T>> {
        self.check_parsed()?;
        match self.state {
            ParseState::Parsed(parsed) => Ok(parsed),
            ParseState::Unparsed(_) => {
                Err(GrammarError::new(T::COMPONENT, "Value left unparsed").into())
            }
        }
    }

    pub fn value(&mut self) -> Result<&T> {
        Ok(&self.check_parsed()?.value)
    }

    pub fn value_mut(&mut self) -> Result<&mut T> {
        Ok(&mut self.check_parsed()?.value)
    }

    pub fn params(&mut self) -> Result<&ParamList> {
        Ok(&self.check_parsed()?.params)
    }

    pub fn params_mut(&mut self) -> Result<&mut ParamList> {
        Ok(&mut self.check_parsed()?.params)
    }

    pub fn exists(&mut self, kind: ParamType) -> Result<bool> {
        Ok(self.check_parsed()?.params.exists(kind))
    }

    /// Remove every parameter of `kind`; `true` if any was present.
    pub fn remove(&mut self, kind: ParamType) -> Result<bool> {
        Ok(self.check_parsed()?.params.remove(kind))
    }

    /// Add a flag parameter unless it is already there.
    pub fn set_flag(&mut self, kind: ParamType) -> Result<()> {
        self.check_parsed()?.params.set_flag(kind);
        Ok(())
    }

    /// Typed value of a parameter the caller requires.
    pub fn param<P: ParamSpec>(&mut self, _: P) -> Result<&P::Value> {
        let parsed = self.check_parsed()?;
        match parsed.params.typed::<P>() {
            Some(value) => Ok(value),
            None => Err(missing_parameter::<P>(T::COMPONENT)),
        }
    }

    pub fn get_param<P: ParamSpec>(&mut self, _: P) -> Result<Option<&P::Value>> {
        Ok(self.check_parsed()?.params.typed::<P>())
    }

    /// Mutable typed value, inserted with its default on first write.
    pub fn param_mut<P: ParamSpec>(&mut self, _: P) -> Result<&mut P::Value> {
        self.check_parsed()?
            .params
            .typed_mut::<P>()
            .ok_or_else(|| missing_parameter::<P>(T::COMPONENT))
    }

    pub fn set_param<P: ParamSpec>(&mut self, _: P, value: P::Value) -> Result<()> {
        self.check_parsed()?.params.set_typed::<P>(value);
        Ok(())
    }

    pub fn unknown_param(&mut self, name: &str) -> Result<Option<&UnknownParam>> {
        Ok(self.check_parsed()?.params.find_unknown(name))
    }

    /// Append an unrecognized parameter as given.
    pub fn add_unknown_param(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.check_parsed()?.params.push(Param::unknown(name, value));
        Ok(())
    }

    /// Exact wire text while unparsed, canonical text afterwards.
    pub fn encode<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        match &self.state {
            ParseState::Unparsed(raw) => out.write_str(&raw.to_string_lossy()),
            ParseState::Parsed(parsed) => parsed.value.encode(&parsed.params, &self.context, out),
        }
    }
}

pub(crate) fn missing_parameter<P: ParamSpec>(component: &'static str) -> Error {
    info!(component, param = P::KIND.name(), "Missing parameter");
    Error::MissingParameter {
        component,
        name: P::KIND.name(),
    }
}

impl<T: HeaderGrammar> fmt::Display for ParsedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode(f)
    }
}
