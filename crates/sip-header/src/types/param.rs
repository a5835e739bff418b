use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::encode::write_quoted;
use crate::error::{Error, GrammarError, Result};
use crate::parser::grammar::{self, is_token};

macro_rules! param_types {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, )*) => {
        /// Every parameter name with a typed representation.
        ///
        /// Whether a name is recognized on a given value depends on the
        /// [`ParamRegistry`](crate::registry::ParamRegistry) in use.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ParamType {
            $( $(#[$meta])* $variant, )*
        }

        impl ParamType {
            pub const ALL: &'static [ParamType] = &[$( ParamType::$variant, )*];

            /// Wire name of the parameter
            pub fn name(self) -> &'static str {
                match self {
                    $( ParamType::$variant => $name, )*
                }
            }

            /// Looks up a parameter by wire name, ignoring ASCII case.
            pub fn from_name(name: &str) -> Option<ParamType> {
                $(
                    if name.eq_ignore_ascii_case($name) {
                        return Some(ParamType::$variant);
                    }
                )*
                None
            }
        }
    };
}

param_types! {
    // RFC 3840 feature tags
    Data => "data",
    Control => "control",
    Mobility => "mobility",
    Description => "description",
    Events => "events",
    Priority => "priority",
    Methods => "methods",
    Schemes => "schemes",
    Application => "application",
    Video => "video",
    Language => "language",
    Type => "type",
    IsFocus => "isfocus",
    Actor => "actor",
    Text => "text",
    Extensions => "extensions",
    // RFC 5626 / RFC 5627
    Instance => "+sip.instance",
    RegId => "reg-id",
    PubGruu => "pub-gruu",
    TempGruu => "temp-gruu",
    Expires => "expires",
    Q => "q",
    Tag => "tag",
    // URI parameters
    Transport => "transport",
    User => "user",
    Method => "method",
    Ttl => "ttl",
    Maddr => "maddr",
    Lr => "lr",
    Comp => "comp",
    Gr => "gr",
    Ob => "ob",
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A q-value in thousandths, `0.000` to `1.000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct QValue(u16);

impl QValue {
    pub const ZERO: QValue = QValue(0);
    pub const ONE: QValue = QValue(1000);

    /// Range-checked constructor
    #[track_caller]
    pub fn from_thousandths(value: u16) -> Result<Self> {
        if value > 1000 {
            return Err(GrammarError::new("QValue", format!("q-value {} is out of range", value)).into());
        }
        Ok(QValue(value))
    }

    pub(crate) fn from_thousandths_unchecked(value: u16) -> Self {
        QValue(value.min(1000))
    }

    /// Rounds `value` to three decimals.
    #[track_caller]
    pub fn new(value: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(GrammarError::new("QValue", format!("q-value {} is out of range", value)).into());
        }
        Ok(QValue((value * 1000.0).round() as u16))
    }

    pub fn thousandths(self) -> u16 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

impl TryFrom<u16> for QValue {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        QValue::from_thousandths(value)
    }
}

impl From<QValue> for u16 {
    fn from(q: QValue) -> u16 {
        q.0
    }
}

impl Default for QValue {
    fn default() -> Self {
        QValue::ONE
    }
}

impl fmt::Display for QValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

impl FromStr for QValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match grammar::qvalue(s.as_bytes()) {
            Ok((rest, q)) if rest.is_empty() => Ok(q),
            _ => Err(GrammarError::new("QValue", format!("Invalid q-value '{}'", s)).into()),
        }
    }
}

/// Text value of a data parameter, remembering whether it arrived quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataValue {
    /// Unescaped text
    pub text: String,
    pub quoted: bool,
}

impl DataValue {
    /// Quoted only if the text is not a token.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let quoted = !is_token(&text);
        Self { text, quoted }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self { text: text.into(), quoted: true }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Text edited through an accessor may no longer be a token.
        if self.quoted || !is_token(&self.text) {
            write_quoted(f, &self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Value of a recognized parameter; the variant is the parameter's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamValue {
    /// Flag parameter, no value
    Exists,
    /// Token or quoted-string
    Data(DataValue),
    /// Always written as a quoted-string
    QuotedData(String),
    /// Flag that may carry a quoted value, as in `;text` or `;text="x"`
    ExistsOrData(Option<String>),
    UInt32(u32),
    QValue(QValue),
}

/// A parameter whose name no registry recognized, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnknownParam {
    pub name: String,
    pub value: Option<DataValue>,
}

impl UnknownParam {
    pub fn new(name: impl Into<String>, value: Option<DataValue>) -> Self {
        Self { name: name.into(), value }
    }
}

/// One `;name[=value]` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Param {
    Known { kind: ParamType, value: ParamValue },
    Unknown(UnknownParam),
}

impl Param {
    pub fn known(kind: ParamType, value: ParamValue) -> Self {
        Param::Known { kind, value }
    }

    pub fn unknown(name: impl Into<String>, value: Option<&str>) -> Self {
        Param::Unknown(UnknownParam::new(name, value.map(DataValue::new)))
    }

    /// Wire name, as received for unknown parameters
    pub fn name(&self) -> &str {
        match self {
            Param::Known { kind, .. } => kind.name(),
            Param::Unknown(u) => &u.name,
        }
    }

    pub fn kind(&self) -> Option<ParamType> {
        match self {
            Param::Known { kind, .. } => Some(*kind),
            Param::Unknown(_) => None,
        }
    }

    /// True if this parameter answers to `name`, ignoring ASCII case.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Known { kind, value } => {
                f.write_str(kind.name())?;
                match value {
                    ParamValue::Exists | ParamValue::ExistsOrData(None) => Ok(()),
                    ParamValue::Data(data) => write!(f, "={}", data),
                    ParamValue::QuotedData(text) | ParamValue::ExistsOrData(Some(text)) => {
                        f.write_str("=")?;
                        write_quoted(f, text)
                    }
                    ParamValue::UInt32(n) => write!(f, "={}", n),
                    ParamValue::QValue(q) => write!(f, "={}", q),
                }
            }
            Param::Unknown(u) => match &u.value {
                Some(value) => write!(f, "{}={}", u.name, value),
                None => f.write_str(&u.name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_names() {
        assert_eq!(ParamType::from_name("TAG"), Some(ParamType::Tag));
        assert_eq!(ParamType::from_name("+sip.instance"), Some(ParamType::Instance));
        assert_eq!(ParamType::from_name("reg-id"), Some(ParamType::RegId));
        assert_eq!(ParamType::from_name("x-custom"), None);
        for kind in ParamType::ALL {
            assert_eq!(ParamType::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn test_qvalue_range() {
        assert!(QValue::from_thousandths(1000).is_ok());
        assert!(QValue::from_thousandths(1001).is_err());
        assert!(QValue::new(1.5).is_err());
        assert!(QValue::new(-0.1).is_err());
        assert!(QValue::new(f32::NAN).is_err());
        assert_eq!(QValue::new(0.7).unwrap().thousandths(), 700);
    }

    #[test]
    fn test_qvalue_display() {
        assert_eq!(QValue::ONE.to_string(), "1.000");
        assert_eq!(QValue::ZERO.to_string(), "0.000");
        assert_eq!(QValue::from_thousandths(500).unwrap().to_string(), "0.500");
        assert_eq!(QValue::from_thousandths(25).unwrap().to_string(), "0.025");
        assert_eq!("0.25".parse::<QValue>().unwrap().thousandths(), 250);
        assert!("1.5".parse::<QValue>().is_err());
    }

    #[test]
    fn test_param_display() {
        let tag = Param::known(ParamType::Tag, ParamValue::Data(DataValue::new("abc")));
        assert_eq!(tag.to_string(), "tag=abc");

        let lr = Param::known(ParamType::Lr, ParamValue::Exists);
        assert_eq!(lr.to_string(), "lr");

        let instance = Param::known(
            ParamType::Instance,
            ParamValue::QuotedData("<urn:uuid:f81d4fae>".to_string()),
        );
        assert_eq!(instance.to_string(), "+sip.instance=\"<urn:uuid:f81d4fae>\"");

        let q = Param::known(ParamType::Q, ParamValue::QValue(QValue::from_thousandths(800).unwrap()));
        assert_eq!(q.to_string(), "q=0.800");

        let unknown = Param::unknown("x-foo", Some("bar"));
        assert_eq!(unknown.to_string(), "x-foo=bar");
        assert!(unknown.matches_name("X-FOO"));
    }

    #[test]
    fn test_data_value_requotes_non_token() {
        let mut value = DataValue::new("abc");
        assert!(!value.quoted);
        value.text = "a b".to_string();
        assert_eq!(value.to_string(), "\"a b\"");
    }
}
