//! # Prelude
//!
//! The most common types and traits, imported with
//! `use rvoip_sip_header::prelude::*;`

pub use crate::config::{DisplayNameQuoting, ParserConfig};
pub use crate::context::HeaderContext;
pub use crate::error::{Error, GrammarError, Result};
pub use crate::params::ParamSpec;
pub use crate::registry::ParamRegistry;
pub use crate::types::header_value::{HeaderKind, HeaderValue};
pub use crate::types::name_addr::NameAddr;
pub use crate::types::param::{Param, ParamType, ParamValue, QValue};
pub use crate::types::param_list::ParamList;
pub use crate::types::raw::RawSpan;
pub use crate::types::uri::{Host, Scheme, Uri};
pub use crate::types::uri_value::UriValue;
