//! Configuration for header parsing and encoding
//!
//! ```rust
//! use rvoip_sip_header::config::{DisplayNameQuoting, ParserConfig};
//!
//! let config = ParserConfig::default()
//!     .with_display_name_quoting(DisplayNameQuoting::WhenRequired)
//!     .with_max_value_len(1024);
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default upper bound on the length of a single raw header value.
pub const DEFAULT_MAX_VALUE_LEN: usize = 8192;

/// How the encoder writes a non-empty display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayNameQuoting {
    /// Always emit a quoted-string, escaping `"` and `\`.
    #[default]
    Always,
    /// Emit the bare token form unless the name contains characters that
    /// force quoting.
    WhenRequired,
}

/// Parser and encoder settings shared by every value created from one
/// [`HeaderContext`](crate::context::HeaderContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Display-name quoting policy used when encoding
    pub display_name_quoting: DisplayNameQuoting,

    /// Raw values longer than this are rejected before scanning
    pub max_value_len: usize,

    /// Tolerate text between a quoted display name and the `<`
    pub lenient_display_name: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            display_name_quoting: DisplayNameQuoting::Always,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            lenient_display_name: false,
        }
    }
}

impl ParserConfig {
    /// Set the display-name quoting policy
    pub fn with_display_name_quoting(mut self, quoting: DisplayNameQuoting) -> Self {
        self.display_name_quoting = quoting;
        self
    }

    /// Set the maximum accepted raw value length
    pub fn with_max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = max;
        self
    }

    /// Skip anything between a quoted display name and the `<` instead of
    /// rejecting it
    pub fn with_lenient_display_name(mut self) -> Self {
        self.lenient_display_name = true;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_value_len == 0 {
            return Err(Error::InvalidConfig(
                "max_value_len must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
