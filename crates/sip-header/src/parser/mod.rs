//! Header value parsers
//!
//! Structure (display name, angle brackets, parameter lists) is scanned
//! with a backtracking [`Cursor`]; lexical productions such as tokens,
//! hosts, ports and q-values are nom combinators in [`grammar`] that the
//! cursor runs through [`Cursor::parse_with`].

pub mod cursor;
pub mod grammar;
pub mod name_addr;
pub mod common_params;
pub mod uri;

pub use cursor::{Cursor, Mark};
pub use name_addr::parse_name_addr;
pub use common_params::{parse_one_param, parse_parameters, parse_unknown_param};
pub use uri::parse_uri;

// Type alias for parser result
pub type ParseResult<'a, O> = nom::IResult<&'a [u8], O>;

/// Bytes that end a header-level parameter value.
pub const HEADER_PARAM_TERMINATORS: &[u8] = b"; \t\r\n";

/// Bytes that end a URI parameter value.
pub const URI_PARAM_TERMINATORS: &[u8] = b";?> \t\r\n";
