//! Parameter factory registries
//!
//! Each value family (name-addr header parameters, URI parameters) has its
//! own [`ParamRegistry`] mapping a [`ParamType`] to the factory that parses
//! its value. Registries are built once and shared read-only, usually
//! through a [`HeaderContext`](crate::context::HeaderContext).
//!
//! A new parameter kind plugs in without touching the parser:
//!
//! ```rust
//! use rvoip_sip_header::prelude::*;
//! use rvoip_sip_header::parser::common_params;
//!
//! // Treat `lr` as a header-level flag as well
//! let registry = ParamRegistry::name_addr().register(ParamType::Lr, common_params::exists);
//! assert!(registry.is_registered(ParamType::Lr));
//! ```

use std::collections::HashMap;
use std::fmt;
use tracing::trace;

use crate::error::Result;
use crate::parser::cursor::Cursor;
use crate::parser::common_params as params;
use crate::types::param::{Param, ParamType};

/// Parses the value of one parameter. Entered with the cursor just past the
/// name; `terminators` are the bytes that end an unquoted value.
pub type ParamFactory = fn(ParamType, &mut Cursor<'_>, &[u8]) -> Result<Param>;

#[derive(Clone)]
pub struct ParamRegistry {
    family: &'static str,
    factories: HashMap<ParamType, ParamFactory>,
}

impl ParamRegistry {
    /// An empty registry; every parameter parses as unknown.
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            factories: HashMap::new(),
        }
    }

    /// Add or replace the factory for `kind`.
    pub fn register(mut self, kind: ParamType, factory: ParamFactory) -> Self {
        self.factories.insert(kind, factory);
        self
    }

    /// Header parameters recognized on name-addr values.
    pub fn name_addr() -> Self {
        use ParamType::*;

        let mut registry = Self::new("NameAddr");
        for kind in [Data, Control, Application, Video, IsFocus] {
            registry = registry.register(kind, params::exists);
        }
        for kind in [
            Mobility, Description, Events, Priority, Methods, Schemes, Language, Type, Actor,
            Extensions, Instance, PubGruu, TempGruu,
        ] {
            registry = registry.register(kind, params::quoted_data);
        }
        registry
            .register(Text, params::exists_or_data)
            .register(RegId, params::uint32)
            .register(Expires, params::uint32)
            .register(Q, params::qvalue)
            .register(Tag, params::data)
    }

    /// Parameters recognized inside SIP URIs.
    pub fn uri() -> Self {
        use ParamType::*;

        Self::new("Uri")
            .register(Transport, params::data)
            .register(User, params::data)
            .register(Method, params::data)
            .register(Ttl, params::uint32)
            .register(Maddr, params::data)
            .register(Lr, params::exists)
            .register(Comp, params::data)
            .register(Gr, params::exists_or_data)
            .register(Ob, params::exists)
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn is_registered(&self, kind: ParamType) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Run the factory for `kind`, or `None` when there is none and the
    /// caller should keep the parameter as unknown.
    pub fn create(
        &self,
        kind: ParamType,
        cursor: &mut Cursor<'_>,
        terminators: &[u8],
    ) -> Option<Result<Param>> {
        let factory = self.factories.get(&kind)?;
        trace!(family = self.family, param = kind.name(), "Creating parameter");
        Some(factory(kind, cursor, terminators))
    }
}

impl fmt::Debug for ParamRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().map(|k| k.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("ParamRegistry")
            .field("family", &self.family)
            .field("kinds", &kinds)
            .finish()
    }
}
