//! Structured SIP header values for rvoip
//!
//! This crate parses the name-addr family of header values (`To`, `From`,
//! `Contact`, `Route`, ...) and their embedded SIP URIs, with typed
//! parameters, lazy parsing and canonical re-encoding.
//!
//! ```rust
//! use rvoip_sip_header::prelude::*;
//! use rvoip_sip_header::params;
//!
//! let mut contact = NameAddr::from_raw("<sip:alice@pc33.atlanta.com>;q=0.7;expires=3600");
//! assert_eq!(contact.param(params::Q).unwrap().thousandths(), 700);
//! assert!(!contact.exists(ParamType::Tag).unwrap());
//! ```

pub mod config;
pub mod context;
pub mod encode;
pub mod error;
pub mod params;
pub mod parser;
pub mod prelude;
pub mod registry;
pub mod types;

// Re-export key public items
pub use config::{DisplayNameQuoting, ParserConfig};
pub use context::HeaderContext;
pub use error::{Error, GrammarError, Result};
pub use registry::{ParamFactory, ParamRegistry};
pub use types::{
    header_value::{HeaderKind, HeaderValue},
    lazy::{HeaderGrammar, ParseState, Parsed, ParsedValue},
    name_addr::{NameAddr, NameAddrFields},
    param::{DataValue, Param, ParamType, ParamValue, QValue, UnknownParam},
    param_list::ParamList,
    raw::RawSpan,
    uri::{Host, Scheme, Uri},
    uri_value::UriValue,
};
