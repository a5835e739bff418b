// Parameter registry and typed parameter tests
mod common;

use std::sync::Arc;

use common::{assert_parse_fails, lazy_name_addr};
use rvoip_sip_header::parser::{common_params, Cursor};
use rvoip_sip_header::prelude::*;
use rvoip_sip_header::{params, DataValue};

// Stores the tag upper-cased, to show that a registered factory is used.
fn upper_tag(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    cursor.skip_char(b'=')?;
    let start = cursor.mark();
    cursor.skip_to_one_of(terminators);
    let text = cursor.extract(start)?;
    Ok(Param::known(kind, ParamValue::Data(DataValue::new(text.to_ascii_uppercase()))))
}

#[test]
fn test_custom_factory_is_used() {
    let registry = ParamRegistry::name_addr().register(ParamType::Tag, upper_tag);
    let context = Arc::new(
        HeaderContext::with_registries(registry, ParamRegistry::uri(), ParserConfig::default()).unwrap(),
    );
    let mut na = context.name_addr("<sip:a@b.com>;tag=abc123");
    assert_eq!(na.param(params::Tag).unwrap(), "ABC123");
}

#[test]
fn test_registering_a_new_header_param() {
    // `lr` is only a URI parameter by default
    let mut plain = lazy_name_addr("<sip:a@b.com>;lr");
    assert!(!plain.exists(ParamType::Lr).unwrap());
    assert!(plain.unknown_param("lr").unwrap().is_some());

    let registry = ParamRegistry::name_addr().register(ParamType::Lr, common_params::exists);
    let context = Arc::new(
        HeaderContext::with_registries(registry, ParamRegistry::uri(), ParserConfig::default()).unwrap(),
    );
    let mut extended = context.name_addr("<sip:a@b.com>;lr");
    assert!(extended.exists(ParamType::Lr).unwrap());
    assert!(extended.unknown_param("lr").unwrap().is_none());
}

#[test]
fn test_empty_registry_keeps_everything_unknown() {
    let context = Arc::new(
        HeaderContext::with_registries(
            ParamRegistry::new("NameAddr"),
            ParamRegistry::uri(),
            ParserConfig::default(),
        )
        .unwrap(),
    );
    let mut na = context.name_addr("<sip:a@b.com>;expires=never;q=2");
    assert!(!na.exists(ParamType::Expires).unwrap());
    assert_eq!(na.params().unwrap().unknown().count(), 2);
    assert_eq!(na.to_string(), "<sip:a@b.com>;expires=never;q=2");
}

#[test]
fn test_standard_registries() {
    let name_addr = ParamRegistry::name_addr();
    for kind in [ParamType::Tag, ParamType::Expires, ParamType::Q, ParamType::Instance, ParamType::Video] {
        assert!(name_addr.is_registered(kind), "{} should be a header parameter", kind);
    }
    assert!(!name_addr.is_registered(ParamType::Transport));

    let uri = ParamRegistry::uri();
    for kind in [ParamType::Transport, ParamType::Lr, ParamType::Maddr, ParamType::Ttl, ParamType::Gr] {
        assert!(uri.is_registered(kind), "{} should be a URI parameter", kind);
    }
    assert!(!uri.is_registered(ParamType::Tag));
}

#[test]
fn test_out_of_range_values() {
    assert_parse_fails::<NameAddr>("<sip:a@b.com>;q=1.5");
    assert_parse_fails::<NameAddr>("<sip:a@b.com>;q=0.1234");
    assert_parse_fails::<NameAddr>("<sip:a@b.com>;expires=4294967296");
    assert_parse_fails::<NameAddr>("<sip:a@b.com>;expires=-1");
    assert_parse_fails::<NameAddr>("<sip:a@b.com>;reg-id=");
    assert_parse_fails::<NameAddr>("<sip:a@b.com>;tag");

    let mut max = lazy_name_addr("<sip:a@b.com>;expires=4294967295;q=1");
    assert_eq!(*max.param(params::Expires).unwrap(), u32::MAX);
    assert_eq!(*max.param(params::Q).unwrap(), QValue::ONE);
}

#[test]
fn test_qvalue_forms() {
    for (text, thousandths) in [("0", 0), ("0.", 0), ("0.5", 500), ("0.05", 50), ("0.123", 123), ("1.0", 1000), ("1.000", 1000)] {
        let mut na = NameAddr::from_raw(format!("<sip:a@b.com>;q={}", text));
        assert_eq!(na.param(params::Q).unwrap().thousandths(), thousandths, "q={}", text);
    }
}

#[test]
fn test_param_names_case_insensitive() {
    let mut na = lazy_name_addr("<sip:a@b.com>;TAG=x;Expires=5;+SIP.INSTANCE=\"<urn:x>\"");
    assert_eq!(na.param(params::Tag).unwrap(), "x");
    assert_eq!(*na.param(params::Expires).unwrap(), 5);
    assert_eq!(na.param(params::Instance).unwrap(), "<urn:x>");
    // recognized names are written in canonical form
    assert_eq!(na.to_string(), "<sip:a@b.com>;tag=x;expires=5;+sip.instance=\"<urn:x>\"");
}

#[test]
fn test_whitespace_around_params() {
    let mut na = lazy_name_addr("<sip:a@b.com> ; tag = x ;expires= 60");
    assert_eq!(na.param(params::Tag).unwrap(), "x");
    assert_eq!(*na.param(params::Expires).unwrap(), 60);
}

#[test]
fn test_flag_params() {
    let mut na = lazy_name_addr("<sip:a@b.com>;isfocus;automata");
    assert!(na.exists(ParamType::IsFocus).unwrap());
    assert!(na.unknown_param("automata").unwrap().is_some());

    na.set_flag(ParamType::IsFocus).unwrap();
    na.set_flag(ParamType::Data).unwrap();
    assert_eq!(na.to_string(), "<sip:a@b.com>;isfocus;automata;data");
}

#[test]
fn test_param_list_typed_access() {
    let mut list = ParamList::new();
    list.set_typed::<params::Tag>("a".to_string());
    list.set_typed::<params::Expires>(30);
    assert_eq!(list.typed::<params::Tag>().map(String::as_str), Some("a"));
    *list.typed_mut::<params::Expires>().unwrap() = 60;
    assert_eq!(list.to_string(), ";tag=a;expires=60");
    assert!(list.typed::<params::Q>().is_none());
}
