#[cfg(test)]
mod tests {
    use crate::ast::ExprKind;
    use crate::error::Fault;
    use crate::html::to_static_markup;
    use crate::options::ParserOptions;
    use crate::parse::parse_markup;
    use crate::render::JsxParser;
    use crate::value::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quiet(markup: &str) -> ParserOptions {
        let mut options = ParserOptions::new(markup);
        options.disable_key_generation = true;
        options.render_in_wrapper = false;
        options
    }

    #[test]
    fn test_lowers_top_level_nodes() {
        let nodes = parse_markup("<p>a</p> text {x}", false).unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[0].kind, ExprKind::Element(_)));
        assert!(matches!(&nodes[1].kind, ExprKind::Text(t) if t == " text "));
        assert!(matches!(nodes[2].kind, ExprKind::ExpressionContainer(Some(_))));
    }

    #[test]
    fn test_empty_containers_and_comments() {
        let nodes = parse_markup("{}{/* note */}", false).unwrap();
        assert!(nodes
            .iter()
            .all(|node| matches!(node.kind, ExprKind::ExpressionContainer(None))));
    }

    #[test]
    fn test_syntax_errors_carry_offsets() {
        let err = parse_markup("<div>", false).unwrap_err();
        match err {
            Fault::Syntax { start, end, .. } => assert!(start <= end),
            other => panic!("unexpected fault {:?}", other),
        }
    }

    #[test]
    fn test_syntax_errors_null_the_output() {
        let faults = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&faults);
        let options = quiet("<h2>unclosed")
            .with_on_error(move |fault: &Fault| sink.borrow_mut().push(fault.clone()));
        assert_eq!(JsxParser::new(options).parse_children(), Value::Null);
        assert!(matches!(&faults.borrow()[..], [Fault::Syntax { .. }]));
    }

    #[test]
    fn test_syntax_errors_use_render_error() {
        let options = quiet("<h2>unclosed")
            .with_render_error(|message| Value::from(format!("error: {}", !message.is_empty())));
        assert_eq!(JsxParser::new(options).parse_children(), Value::from("error: true"));
    }

    #[test]
    fn test_void_elements_require_closing_by_default() {
        let options = quiet(r#"<img src="/foo.png"><div>Foo</div>"#);
        assert_eq!(JsxParser::new(options).parse_children(), Value::Null);
    }

    #[test]
    fn test_auto_close_void_elements() {
        let mut options = quiet(r#"<img src="/foo.png"><div>Foo</div>"#);
        options.auto_close_void_elements = true;
        let rendered = to_static_markup(&JsxParser::new(options).render());
        assert_eq!(rendered, r#"<img src="/foo.png"/><div>Foo</div>"#);
    }

    #[test]
    fn test_html_entities_are_decoded() {
        let options = quiet(r#"<p title="a&amp;b">&lt;tag&gt;&nbsp;&#160;&#x202F;</p>"#);
        let tree = JsxParser::new(options).parse_children();
        let p = tree.as_array().unwrap()[0].as_element().unwrap().clone();
        assert_eq!(p.prop("title"), Some(&Value::from("a&b")));
        assert_eq!(
            to_static_markup(&p.children.to_value()),
            "&lt;tag&gt;\u{a0}\u{a0}\u{202f}"
        );
    }

    #[test]
    fn test_doctype_is_skipped() {
        let options = quiet("<!DOCTYPE html><div>Hi</div>");
        assert_eq!(to_static_markup(&JsxParser::new(options).render()), "<div>Hi</div>");
    }
}
