//! Markup parsing.
//!
//! Prepares the raw markup string (trim, DOCTYPE removal, optional void-tag
//! auto-closing), wraps it under a synthetic `<root>` element and parses it
//! with oxc. The arena tree is lowered into the owned AST before returning,
//! so nothing borrowed from the allocator escapes this module.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Statement};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::{Captures, Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::debug;

use crate::ast::Expr;
use crate::error::Fault;
use crate::jsx_lowerer::Lowerer;
use crate::tags::VOID_ELEMENTS;

pub const ROOT_TAG: &str = "root";

lazy_static! {
    static ref DOCTYPE_RE: Regex = Regex::new(r"<!DOCTYPE([^>]*)>").unwrap();

    static ref VOID_TAG_RE: Regex = {
        let names: Vec<&str> = {
            let mut names: Vec<&str> = VOID_ELEMENTS.iter().copied().collect();
            names.sort_unstable();
            names
        };
        RegexBuilder::new(&format!(r"<({})\b([^<>]*?)\s*/?>", names.join("|")))
            .case_insensitive(true)
            .build()
            .unwrap()
    };

    static ref ENTITY_RE: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap();

    /// Named character references recognized in markup text and attribute strings.
    static ref NAMED_ENTITIES: HashMap<&'static str, char> = {
        let mut m = HashMap::new();
        m.insert("quot", '"');
        m.insert("amp", '&');
        m.insert("apos", '\'');
        m.insert("lt", '<');
        m.insert("gt", '>');
        m.insert("nbsp", '\u{00A0}');
        m.insert("iexcl", '¡');
        m.insert("cent", '¢');
        m.insert("pound", '£');
        m.insert("curren", '¤');
        m.insert("yen", '¥');
        m.insert("brvbar", '¦');
        m.insert("sect", '§');
        m.insert("uml", '¨');
        m.insert("copy", '©');
        m.insert("ordf", 'ª');
        m.insert("laquo", '«');
        m.insert("not", '¬');
        m.insert("shy", '\u{00AD}');
        m.insert("reg", '®');
        m.insert("macr", '¯');
        m.insert("deg", '°');
        m.insert("plusmn", '±');
        m.insert("sup2", '²');
        m.insert("sup3", '³');
        m.insert("acute", '´');
        m.insert("micro", 'µ');
        m.insert("para", '¶');
        m.insert("middot", '·');
        m.insert("cedil", '¸');
        m.insert("sup1", '¹');
        m.insert("ordm", 'º');
        m.insert("raquo", '»');
        m.insert("frac14", '¼');
        m.insert("frac12", '½');
        m.insert("frac34", '¾');
        m.insert("iquest", '¿');
        m.insert("times", '×');
        m.insert("divide", '÷');
        m.insert("Agrave", 'À');
        m.insert("Aacute", 'Á');
        m.insert("Auml", 'Ä');
        m.insert("Ccedil", 'Ç');
        m.insert("Eacute", 'É');
        m.insert("Ntilde", 'Ñ');
        m.insert("Ouml", 'Ö');
        m.insert("Uuml", 'Ü');
        m.insert("szlig", 'ß');
        m.insert("agrave", 'à');
        m.insert("aacute", 'á');
        m.insert("auml", 'ä');
        m.insert("ccedil", 'ç');
        m.insert("egrave", 'è');
        m.insert("eacute", 'é');
        m.insert("ntilde", 'ñ');
        m.insert("ouml", 'ö');
        m.insert("uuml", 'ü');
        m.insert("ensp", '\u{2002}');
        m.insert("emsp", '\u{2003}');
        m.insert("thinsp", '\u{2009}');
        m.insert("zwnj", '\u{200C}');
        m.insert("zwj", '\u{200D}');
        m.insert("lrm", '\u{200E}');
        m.insert("rlm", '\u{200F}');
        m.insert("ndash", '–');
        m.insert("mdash", '—');
        m.insert("lsquo", '‘');
        m.insert("rsquo", '’');
        m.insert("sbquo", '‚');
        m.insert("ldquo", '“');
        m.insert("rdquo", '”');
        m.insert("bdquo", '„');
        m.insert("dagger", '†');
        m.insert("Dagger", '‡');
        m.insert("bull", '•');
        m.insert("hellip", '…');
        m.insert("permil", '‰');
        m.insert("prime", '′');
        m.insert("lsaquo", '‹');
        m.insert("rsaquo", '›');
        m.insert("euro", '€');
        m.insert("trade", '™');
        m.insert("larr", '←');
        m.insert("uarr", '↑');
        m.insert("rarr", '→');
        m.insert("darr", '↓');
        m.insert("harr", '↔');
        m.insert("minus", '−');
        m.insert("infin", '∞');
        m.insert("ne", '≠');
        m.insert("le", '≤');
        m.insert("ge", '≥');
        m.insert("hearts", '♥');
        m
    };
}

/// Trims the markup and drops every `<!DOCTYPE …>` declaration.
pub fn prepare_markup(markup: &str) -> String {
    DOCTYPE_RE.replace_all(markup.trim(), "").into_owned()
}

/// Rewrites `<img …>` style void tags into their self-closing form.
pub fn close_void_elements(markup: &str) -> String {
    VOID_TAG_RE
        .replace_all(markup, |caps: &Captures| {
            let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            format!("<{}{} />", &caps[1], attrs)
        })
        .into_owned()
}

/// Decodes named and numeric character references. Unknown names are kept.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                NAMED_ENTITIES.get(body).copied()
            };
            match decoded {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Parses prepared markup into the children of the synthetic root.
///
/// Malformed input yields [`Fault::Syntax`] with offsets into the wrapped
/// source (`<root>` + markup + `</root>`).
pub fn parse_markup(markup: &str, auto_close_void_elements: bool) -> Result<Vec<Expr>, Fault> {
    let body = if auto_close_void_elements {
        close_void_elements(markup)
    } else {
        markup.to_string()
    };
    let wrapped = format!("<{}>{}</{}>", ROOT_TAG, body, ROOT_TAG);

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &wrapped, SourceType::jsx()).parse();

    if let Some(diagnostic) = ret.errors.first() {
        let (start, end) = diagnostic
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| (label.offset(), label.offset() + label.len()))
            .unwrap_or((0, wrapped.len()));
        return Err(Fault::Syntax {
            message: diagnostic.to_string(),
            start: start as u32,
            end: end as u32,
        });
    }

    let root = match ret.program.body.first() {
        Some(Statement::ExpressionStatement(stmt)) if ret.program.body.len() == 1 => {
            match &stmt.expression {
                Expression::JSXElement(element) => Some(element),
                _ => None,
            }
        }
        _ => None,
    };
    let Some(root) = root else {
        return Err(Fault::Syntax {
            message: "Markup must form a single tree under the synthetic root".to_string(),
            start: 0,
            end: wrapped.len() as u32,
        });
    };

    let lowerer = Lowerer::new(&wrapped);
    let children: Vec<Expr> = root
        .children
        .iter()
        .map(|child| lowerer.lower_child(child))
        .collect();
    debug!(
        source_len = wrapped.len(),
        top_level = children.len(),
        "parsed markup"
    );
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_strips_doctype_and_trims() {
        assert_eq!(
            prepare_markup("  <!DOCTYPE html><html></html>\n"),
            "<html></html>"
        );
    }

    #[test]
    fn test_close_void_elements() {
        assert_eq!(
            close_void_elements(r#"<img src="/foo.png"><div>Foo</div>"#),
            r#"<img src="/foo.png" /><div>Foo</div>"#
        );
        assert_eq!(close_void_elements("<br/><br />"), "<br /><br />");
        assert_eq!(close_void_elements("<brand>x</brand>"), "<brand>x</brand>");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_entities("a&#160;b"), "a\u{00A0}b");
        assert_eq!(decode_entities("a&#8239;b"), "a\u{202F}b");
        assert_eq!(decode_entities("&lt;tag&gt; &amp;"), "<tag> &");
        assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
    }
}
