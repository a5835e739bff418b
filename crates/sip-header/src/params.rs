//! Typed parameter accessors
//!
//! Each marker type names one parameter and the Rust type of its value, so
//! that accessors on [`NameAddr`](crate::NameAddr) and
//! [`UriValue`](crate::UriValue) are checked at compile time:
//!
//! ```rust
//! use rvoip_sip_header::{params, NameAddr};
//!
//! let mut contact = NameAddr::from_raw("<sip:alice@pc33.atlanta.com>;expires=3600");
//! assert_eq!(*contact.param(params::Expires).unwrap(), 3600);
//!
//! *contact.param_mut(params::Expires).unwrap() = 60;
//! contact.set_param(params::Tag, "1928301774".to_string()).unwrap();
//! assert_eq!(contact.to_string(), "<sip:alice@pc33.atlanta.com>;expires=60;tag=1928301774");
//! ```
//!
//! Flag parameters (`lr`, `video`, `isfocus`, ...) carry no value and are
//! handled with `exists`, `set_flag` and `remove`.

use crate::types::param::{DataValue, ParamType, ParamValue, QValue};

/// A parameter with a typed value.
pub trait ParamSpec {
    type Value: Default;

    const KIND: ParamType;

    /// The typed value, if `value` has this parameter's shape.
    fn get(value: &ParamValue) -> Option<&Self::Value>;

    fn get_mut(value: &mut ParamValue) -> Option<&mut Self::Value>;

    fn wrap(value: Self::Value) -> ParamValue;
}

macro_rules! typed_param {
    ($(#[$meta:meta])* $marker:ident, data) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl ParamSpec for $marker {
            type Value = String;
            const KIND: ParamType = ParamType::$marker;

            fn get(value: &ParamValue) -> Option<&String> {
                match value {
                    ParamValue::Data(data) => Some(&data.text),
                    _ => None,
                }
            }

            fn get_mut(value: &mut ParamValue) -> Option<&mut String> {
                match value {
                    ParamValue::Data(data) => Some(&mut data.text),
                    _ => None,
                }
            }

            fn wrap(value: String) -> ParamValue {
                ParamValue::Data(DataValue::new(value))
            }
        }
    };
    ($(#[$meta:meta])* $marker:ident, quoted) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl ParamSpec for $marker {
            type Value = String;
            const KIND: ParamType = ParamType::$marker;

            fn get(value: &ParamValue) -> Option<&String> {
                match value {
                    ParamValue::QuotedData(text) => Some(text),
                    _ => None,
                }
            }

            fn get_mut(value: &mut ParamValue) -> Option<&mut String> {
                match value {
                    ParamValue::QuotedData(text) => Some(text),
                    _ => None,
                }
            }

            fn wrap(value: String) -> ParamValue {
                ParamValue::QuotedData(value)
            }
        }
    };
    ($(#[$meta:meta])* $marker:ident, exists_or_data) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl ParamSpec for $marker {
            type Value = Option<String>;
            const KIND: ParamType = ParamType::$marker;

            fn get(value: &ParamValue) -> Option<&Option<String>> {
                match value {
                    ParamValue::ExistsOrData(text) => Some(text),
                    _ => None,
                }
            }

            fn get_mut(value: &mut ParamValue) -> Option<&mut Option<String>> {
                match value {
                    ParamValue::ExistsOrData(text) => Some(text),
                    _ => None,
                }
            }

            fn wrap(value: Option<String>) -> ParamValue {
                ParamValue::ExistsOrData(value)
            }
        }
    };
    ($(#[$meta:meta])* $marker:ident, uint32) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl ParamSpec for $marker {
            type Value = u32;
            const KIND: ParamType = ParamType::$marker;

            fn get(value: &ParamValue) -> Option<&u32> {
                match value {
                    ParamValue::UInt32(n) => Some(n),
                    _ => None,
                }
            }

            fn get_mut(value: &mut ParamValue) -> Option<&mut u32> {
                match value {
                    ParamValue::UInt32(n) => Some(n),
                    _ => None,
                }
            }

            fn wrap(value: u32) -> ParamValue {
                ParamValue::UInt32(value)
            }
        }
    };
    ($(#[$meta:meta])* $marker:ident, qvalue) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl ParamSpec for $marker {
            type Value = QValue;
            const KIND: ParamType = ParamType::$marker;

            fn get(value: &ParamValue) -> Option<&QValue> {
                match value {
                    ParamValue::QValue(q) => Some(q),
                    _ => None,
                }
            }

            fn get_mut(value: &mut ParamValue) -> Option<&mut QValue> {
                match value {
                    ParamValue::QValue(q) => Some(q),
                    _ => None,
                }
            }

            fn wrap(value: QValue) -> ParamValue {
                ParamValue::QValue(value)
            }
        }
    };
}

// Name-addr header parameters
typed_param!(Mobility, quoted);
typed_param!(Description, quoted);
typed_param!(Events, quoted);
typed_param!(Priority, quoted);
typed_param!(Methods, quoted);
typed_param!(Schemes, quoted);
typed_param!(Language, quoted);
typed_param!(Type, quoted);
typed_param!(Actor, quoted);
typed_param!(Extensions, quoted);
typed_param!(
    /// `+sip.instance`
    Instance,
    quoted
);
typed_param!(PubGruu, quoted);
typed_param!(TempGruu, quoted);
typed_param!(Text, exists_or_data);
typed_param!(
    /// `reg-id`
    RegId,
    uint32
);
typed_param!(Expires, uint32);
typed_param!(Q, qvalue);
typed_param!(Tag, data);

// URI parameters
typed_param!(Transport, data);
typed_param!(User, data);
typed_param!(Method, data);
typed_param!(Ttl, uint32);
typed_param!(Maddr, data);
typed_param!(Comp, data);
typed_param!(Gr, exists_or_data);
