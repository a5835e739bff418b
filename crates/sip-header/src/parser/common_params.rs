// Parameter list parsing and the standard value factories.
//
// A factory is entered with the cursor just past the parameter name and
// must leave it on the byte that ends the value.

use tracing::debug;

use crate::error::Result;
use crate::parser::cursor::Cursor;
use crate::parser::grammar::{self, is_token_char, unescape_quoted};
use crate::registry::ParamRegistry;
use crate::types::param::{DataValue, Param, ParamType, ParamValue, UnknownParam};
use crate::types::param_list::ParamList;

// Consume `SWS "=" SWS` if present; otherwise leave the cursor where it was.
fn value_start(cursor: &mut Cursor<'_>) -> bool {
    let mark = cursor.mark();
    cursor.skip_whitespace();
    if cursor.at(b'=') {
        cursor.advance();
        cursor.skip_whitespace();
        true
    } else {
        cursor.reset(mark);
        false
    }
}

// Token run up to a terminator, or a quoted-string.
fn read_value(cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<DataValue> {
    if cursor.at(b'"') {
        cursor.advance();
        let start = cursor.mark();
        cursor.skip_to_end_quote(b'"')?;
        let text = unescape_quoted(cursor.as_str(start)?);
        cursor.skip_char(b'"')?;
        Ok(DataValue::quoted(text))
    } else {
        let start = cursor.mark();
        cursor.skip_to_one_of(terminators);
        Ok(DataValue {
            text: cursor.extract(start)?,
            quoted: false,
        })
    }
}

fn required_value(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<DataValue> {
    if !value_start(cursor) {
        return Err(cursor
            .fail(format!("Parameter '{}' requires a value", kind))
            .into());
    }
    let value = read_value(cursor, terminators)?;
    if value.text.is_empty() && !value.quoted {
        return Err(cursor.fail(format!("Empty value for parameter '{}'", kind)).into());
    }
    Ok(value)
}

fn expect_end(kind: ParamType, cursor: &Cursor<'_>, terminators: &[u8]) -> Result<()> {
    match cursor.peek() {
        None => Ok(()),
        Some(c) if terminators.contains(&c) => Ok(()),
        Some(_) => Err(cursor
            .fail(format!("Trailing characters in value of '{}'", kind))
            .into()),
    }
}

/// Name only. A stray `=value` is skipped.
pub fn exists(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    if value_start(cursor) {
        let ignored = read_value(cursor, terminators)?;
        debug!(param = kind.name(), value = %ignored.text, "Ignoring value on flag parameter");
    }
    Ok(Param::known(kind, ParamValue::Exists))
}

/// Token or quoted-string; quoting is remembered.
pub fn data(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    let value = required_value(kind, cursor, terminators)?;
    Ok(Param::known(kind, ParamValue::Data(value)))
}

/// Quoted-string; a bare token is accepted and written back quoted.
pub fn quoted_data(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    let value = required_value(kind, cursor, terminators)?;
    Ok(Param::known(kind, ParamValue::QuotedData(value.text)))
}

/// Flag with an optional value.
pub fn exists_or_data(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    let value = if value_start(cursor) {
        Some(read_value(cursor, terminators)?.text)
    } else {
        None
    };
    Ok(Param::known(kind, ParamValue::ExistsOrData(value)))
}

/// Unsigned 32-bit decimal.
pub fn uint32(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    if !value_start(cursor) {
        return Err(cursor
            .fail(format!("Parameter '{}' requires a value", kind))
            .into());
    }
    let value = cursor.parse_with(grammar::uint32, "unsigned integer")?;
    expect_end(kind, cursor, terminators)?;
    Ok(Param::known(kind, ParamValue::UInt32(value)))
}

/// Quality value between 0.000 and 1.000.
pub fn qvalue(kind: ParamType, cursor: &mut Cursor<'_>, terminators: &[u8]) -> Result<Param> {
    if !value_start(cursor) {
        return Err(cursor
            .fail(format!("Parameter '{}' requires a value", kind))
            .into());
    }
    let value = cursor.parse_with(grammar::qvalue, "q-value")?;
    expect_end(kind, cursor, terminators)?;
    Ok(Param::known(kind, ParamValue::QValue(value)))
}

/// Keep an unrecognized parameter verbatim. `;foo=` keeps an empty value.
pub fn parse_unknown_param(
    name: &str,
    cursor: &mut Cursor<'_>,
    terminators: &[u8],
) -> Result<UnknownParam> {
    let value = if value_start(cursor) {
        Some(read_value(cursor, terminators)?)
    } else {
        None
    };
    Ok(UnknownParam::new(name, value))
}

/// Parse one `name[=value]` with the cursor on the first byte of the name.
pub fn parse_one_param(
    cursor: &mut Cursor<'_>,
    registry: &ParamRegistry,
    terminators: &[u8],
) -> Result<Param> {
    let start = cursor.mark();
    cursor.skip_while(is_token_char);
    let name = cursor.as_str(start)?;
    if name.is_empty() {
        return Err(cursor.fail("Empty parameter name").into());
    }

    if let Some(result) = ParamType::from_name(name)
        .and_then(|kind| registry.create(kind, cursor, terminators))
    {
        return result;
    }
    Ok(Param::Unknown(parse_unknown_param(name, cursor, terminators)?))
}

/// Parse `*( SWS ";" SWS param )` to the end of the input.
pub fn parse_parameters(
    cursor: &mut Cursor<'_>,
    registry: &ParamRegistry,
    terminators: &[u8],
    params: &mut ParamList,
) -> Result<()> {
    let previous = cursor.set_component("Param");
    let result = (|| -> Result<()> {
        loop {
            cursor.skip_whitespace();
            if cursor.eof() {
                return Ok(());
            }
            cursor.skip_char(b';')?;
            cursor.skip_whitespace();
            let param = parse_one_param(cursor, registry, terminators)?;
            params.push(param);
        }
    })();
    cursor.set_component(previous);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HEADER_PARAM_TERMINATORS;
    use crate::types::param::QValue;

    fn parse(input: &str) -> Result<ParamList> {
        let mut cursor = Cursor::new(input.as_bytes(), "Test");
        let mut params = ParamList::new();
        parse_parameters(
            &mut cursor,
            &ParamRegistry::name_addr(),
            HEADER_PARAM_TERMINATORS,
            &mut params,
        )?;
        Ok(params)
    }

    #[test]
    fn test_typed_params() {
        let params = parse(";tag=abc ; expires = 3600;q=0.7;+sip.instance=\"<urn:x>\"").unwrap();
        assert_eq!(params.len(), 4);
        assert!(matches!(params.find(ParamType::Tag), Some(ParamValue::Data(v)) if v.text == "abc"));
        assert_eq!(params.find(ParamType::Expires), Some(&ParamValue::UInt32(3600)));
        assert_eq!(
            params.find(ParamType::Q),
            Some(&ParamValue::QValue(QValue::from_thousandths(700).unwrap()))
        );
        assert_eq!(
            params.find(ParamType::Instance),
            Some(&ParamValue::QuotedData("<urn:x>".to_string()))
        );
    }

    #[test]
    fn test_flags_and_exists_or_data() {
        let params = parse(";video;isfocus;text;control").unwrap();
        assert!(params.exists(ParamType::Video));
        assert!(params.exists(ParamType::IsFocus));
        assert_eq!(params.find(ParamType::Text), Some(&ParamValue::ExistsOrData(None)));

        let params = parse(";text=\"hello world\";video=1").unwrap();
        assert_eq!(
            params.find(ParamType::Text),
            Some(&ParamValue::ExistsOrData(Some("hello world".to_string())))
        );
        assert_eq!(params.find(ParamType::Video), Some(&ParamValue::Exists));
    }

    #[test]
    fn test_unknown_params_kept_verbatim() {
        let params = parse(";x-foo=bar;flag;x-q=\"a b\"").unwrap();
        let unknown: Vec<_> = params.unknown().collect();
        assert_eq!(unknown.len(), 3);
        assert_eq!(unknown[0].value.as_ref().map(|v| v.text.as_str()), Some("bar"));
        assert!(unknown[1].value.is_none());
        assert!(unknown[2].value.as_ref().is_some_and(|v| v.quoted));
        assert_eq!(params.to_string(), ";x-foo=bar;flag;x-q=\"a b\"");
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(parse(";expires=abc").is_err());
        assert!(parse(";expires=99999999999").is_err());
        assert!(parse(";expires=12x").is_err());
        assert!(parse(";q=1.5").is_err());
        assert!(parse(";q=2").is_err());
        assert!(parse(";tag").is_err());
        assert!(parse(";tag=\"open").is_err());
    }

    #[test]
    fn test_structural_errors() {
        let err = parse(";tag=a x").unwrap_err();
        let grammar = err.as_grammar().unwrap();
        assert_eq!(grammar.component(), "Param");
        assert_eq!(grammar.offset(), Some(7));

        assert!(parse(";").is_err());
        assert!(parse(";=x").is_err());
    }

    #[test]
    fn test_unregistered_kind_is_unknown() {
        // lr is a URI parameter; as a header parameter it stays opaque
        let params = parse(";lr").unwrap();
        assert!(!params.exists(ParamType::Lr));
        assert!(params.find_unknown("lr").is_some());
    }
}
