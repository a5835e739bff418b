// name-addr / addr-spec with trailing header parameters (RFC 3261 section 20.10)
//
//   contact-param = ( name-addr / addr-spec ) *( SEMI param )
//   name-addr     = [ display-name ] LAQUOT addr-spec RAQUOT
//
// In the bare addr-spec form a `;param` after the URI is grammatically a URI
// parameter, yet senders mean header parameters such as `tag`. URI
// parameters the URI registry does not know are therefore moved to the
// header level and parsed again there.

use tracing::debug;

use crate::context::HeaderContext;
use crate::error::Result;
use crate::parser::cursor::Cursor;
use crate::parser::grammar::unescape_quoted;
use crate::parser::{parse_one_param, parse_parameters, parse_uri, HEADER_PARAM_TERMINATORS};
use crate::registry::ParamRegistry;
use crate::types::name_addr::NameAddrFields;
use crate::types::param::Param;
use crate::types::param_list::ParamList;
use crate::types::uri::Uri;

fn reassign_unknown_uri_params(uri: &mut Uri, registry: &ParamRegistry, params: &mut ParamList) {
    for unknown in uri.parameters.take_unknown() {
        let text = Param::Unknown(unknown.clone()).to_string();
        let mut cursor = Cursor::new(text.as_bytes(), "Param");
        match parse_one_param(&mut cursor, registry, HEADER_PARAM_TERMINATORS) {
            Ok(param) if cursor.eof() => {
                debug!(param = %text, "Moved parameter from bare URI to header");
                params.push(param);
            }
            _ => {
                debug!(param = %text, "Parameter from bare URI kept as unknown header parameter");
                params.push(Param::Unknown(unknown));
            }
        }
    }
}

/// Parse a name-addr, addr-spec or `*` value with its header parameters.
pub fn parse_name_addr(
    cursor: &mut Cursor<'_>,
    context: &HeaderContext,
    params: &mut ParamList,
) -> Result<NameAddrFields> {
    let header_params = context.name_addr_params();
    let mut fields = NameAddrFields::default();

    cursor.skip_whitespace();
    let start = cursor.mark();

    if cursor.at(b'*') {
        cursor.advance();
        cursor.skip_whitespace();
        if cursor.eof() || cursor.at(b';') {
            fields.all_contacts = true;
            parse_parameters(cursor, header_params, HEADER_PARAM_TERMINATORS, params)?;
            return Ok(fields);
        }
        cursor.reset(start);
    }

    let angle = if cursor.at(b'"') {
        cursor.advance();
        let name_start = cursor.mark();
        cursor.skip_to_end_quote(b'"')?;
        fields.display_name = unescape_quoted(cursor.as_str(name_start)?);
        cursor.advance();
        if context.config().lenient_display_name {
            cursor.skip_to_char(b'<');
        } else {
            cursor.skip_whitespace();
        }
        if !cursor.at(b'<') {
            return Err(cursor.fail("Expected '<' after quoted display name").into());
        }
        cursor.advance();
        true
    } else if cursor.at(b'<') {
        cursor.advance();
        true
    } else {
        cursor.skip_to_char(b'<');
        if cursor.eof() {
            cursor.reset(start);
            false
        } else {
            let laquot = cursor.mark();
            cursor.skip_back_whitespace();
            fields.display_name = cursor.extract(start)?;
            cursor.reset(laquot);
            cursor.advance();
            true
        }
    };

    cursor.skip_whitespace();
    fields.uri = parse_uri(cursor, context.uri_params())?;

    if angle {
        cursor.skip_whitespace();
        cursor.skip_char(b'>')?;
    } else {
        reassign_unknown_uri_params(&mut fields.uri, header_params, params);
    }

    parse_parameters(cursor, header_params, HEADER_PARAM_TERMINATORS, params)?;
    Ok(fields)
}
