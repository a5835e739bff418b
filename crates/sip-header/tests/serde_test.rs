// Serialization tests
mod common;

use common::uri;
use rvoip_sip_header::prelude::*;
use rvoip_sip_header::{params, UnknownParam};

#[test]
fn test_name_addr_serializes_as_wire_text() -> anyhow::Result<()> {
    let na = NameAddr::from_raw("Bob <sip:bob@biloxi.com>;tag=a6c85cf");
    assert_eq!(serde_json::to_string(&na)?, "\"Bob <sip:bob@biloxi.com>;tag=a6c85cf\"");

    let mut back: NameAddr = serde_json::from_str("\"<sip:alice@atlanta.com>;expires=60\"")?;
    assert!(!back.is_parsed());
    assert_eq!(*back.param(params::Expires)?, 60);
    Ok(())
}

#[test]
fn test_parsed_name_addr_serializes_canonically() -> anyhow::Result<()> {
    let mut na = NameAddr::from_raw("Bob <sip:bob@biloxi.com>");
    na.set_param(params::Tag, "1".to_string())?;
    assert_eq!(serde_json::to_string(&na)?, r#""\"Bob\" <sip:bob@biloxi.com>;tag=1""#);
    Ok(())
}

#[test]
fn test_uri_value_serde() -> anyhow::Result<()> {
    let value: UriValue = serde_json::from_str("\"sip:proxy.example.com;lr\"")?;
    assert_eq!(serde_json::to_string(&value)?, "\"sip:proxy.example.com;lr\"");
    Ok(())
}

#[test]
fn test_uri_structure_roundtrip() -> anyhow::Result<()> {
    let original = uri("sip:alice:pw@[2001:db8::1]:5060;transport=tcp;x-key=\"a b\"?subject=hi");
    let json = serde_json::to_value(&original)?;
    assert_eq!(json["port"], 5060);
    let back: Uri = serde_json::from_value(json)?;
    assert_eq!(back, original);
    assert_eq!(back.unknown_parameters().collect::<Vec<&UnknownParam>>().len(), 1);
    Ok(())
}

#[test]
fn test_qvalue_serde_range_checked() {
    let q = QValue::from_thousandths(500).unwrap();
    assert_eq!(serde_json::to_string(&q).unwrap(), "500");
    assert_eq!(serde_json::from_str::<QValue>("1000").unwrap(), QValue::ONE);
    assert!(serde_json::from_str::<QValue>("1500").is_err());
}

#[test]
fn test_config_defaults_fill_in() -> anyhow::Result<()> {
    let config: ParserConfig = serde_json::from_str(r#"{"display_name_quoting":"WhenRequired"}"#)?;
    assert_eq!(config.display_name_quoting, DisplayNameQuoting::WhenRequired);
    assert_eq!(config.max_value_len, ParserConfig::default().max_value_len);
    assert!(!config.lenient_display_name);
    config.validate()?;
    Ok(())
}
