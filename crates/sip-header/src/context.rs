//! Shared parsing context
//!
//! A [`HeaderContext`] bundles the parameter registries and the
//! [`ParserConfig`] that every value created from it uses. It is immutable
//! once built and shared through `Arc`, so values parsed on different
//! threads can use the same context without locking.
//!
//! ```rust
//! use std::sync::Arc;
//! use rvoip_sip_header::prelude::*;
//!
//! let config = ParserConfig::default().with_display_name_quoting(DisplayNameQuoting::WhenRequired);
//! let context = Arc::new(HeaderContext::new(config).unwrap());
//!
//! let mut to = context.name_addr("Bob <sip:bob@biloxi.com>");
//! to.set_display_name("Robert").unwrap();
//! assert_eq!(to.to_string(), "Robert <sip:bob@biloxi.com>");
//! ```

use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::registry::ParamRegistry;
use crate::types::header_value::{HeaderKind, HeaderValue};
use crate::types::name_addr::NameAddr;
use crate::types::raw::RawSpan;
use crate::types::uri_value::UriValue;

static STANDARD: OnceLock<Arc<HeaderContext>> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct HeaderContext {
    name_addr_params: ParamRegistry,
    uri_params: ParamRegistry,
    config: ParserConfig,
}

impl HeaderContext {
    /// Standard registries with the given configuration.
    pub fn new(config: ParserConfig) -> Result<Self> {
        Self::with_registries(ParamRegistry::name_addr(), ParamRegistry::uri(), config)
    }

    pub fn with_registries(
        name_addr_params: ParamRegistry,
        uri_params: ParamRegistry,
        config: ParserConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name_addr_params,
            uri_params,
            config,
        })
    }

    /// The process-wide default context, built on first use.
    pub fn standard() -> Arc<HeaderContext> {
        STANDARD
            .get_or_init(|| {
                debug!("Initializing standard header context");
                Arc::new(HeaderContext {
                    name_addr_params: ParamRegistry::name_addr(),
                    uri_params: ParamRegistry::uri(),
                    config: ParserConfig::default(),
                })
            })
            .clone()
    }

    pub fn name_addr_params(&self) -> &ParamRegistry {
        &self.name_addr_params
    }

    pub fn uri_params(&self) -> &ParamRegistry {
        &self.uri_params
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Lazily parsed name-addr bound to this context.
    pub fn name_addr(self: &Arc<Self>, raw: impl Into<RawSpan>) -> NameAddr {
        NameAddr::from_raw_in(raw, Arc::clone(self))
    }

    /// Lazily parsed bare URI bound to this context.
    pub fn uri_value(self: &Arc<Self>, raw: impl Into<RawSpan>) -> UriValue {
        UriValue::from_raw_in(raw, Arc::clone(self))
    }

    pub fn header_value(self: &Arc<Self>, kind: HeaderKind, raw: impl Into<RawSpan>) -> HeaderValue {
        HeaderValue::from_raw_in(kind, raw, Arc::clone(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_standard_is_shared() {
        let a = HeaderContext::standard();
        let b = HeaderContext::standard();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.config(), &ParserConfig::default());
        assert_eq!(a.name_addr_params().family(), "NameAddr");
        assert_eq!(a.uri_params().family(), "Uri");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = HeaderContext::new(ParserConfig::default().with_max_value_len(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
