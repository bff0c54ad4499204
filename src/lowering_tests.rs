#[cfg(test)]
mod tests {
    use crate::ast::{
        ArrowBody, Expr, ExprKind, MarkupAttribute, ObjectProperty, Pattern, PropertyKey, Stmt,
    };
    use crate::parse::parse_markup;

    /// Lowers `{source}` and returns the contained expression.
    fn lower(source: &str) -> Expr {
        let mut nodes = parse_markup(&format!("{{{}}}", source), false).unwrap();
        match nodes.remove(0).kind {
            ExprKind::ExpressionContainer(Some(expr)) => *expr,
            other => panic!("expected an expression container, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_chains_mark_each_link() {
        let expr = lower("a?.b.c");
        let ExprKind::Member { object, property: PropertyKey::Static(c), optional } = expr.kind else {
            panic!("expected member");
        };
        assert_eq!(c, "c");
        assert!(!optional);
        assert!(matches!(object.kind, ExprKind::Member { optional: true, .. }));
    }

    #[test]
    fn test_computed_keys_stay_expressions() {
        let expr = lower("a[b + 1]");
        assert!(matches!(
            expr.kind,
            ExprKind::Member { property: PropertyKey::Computed(_), .. }
        ));
        let expr = lower("({ 'quoted': 1, [key]: 2 })");
        let ExprKind::Object(properties) = expr.kind else {
            panic!("expected object");
        };
        assert!(matches!(
            &properties[0],
            ObjectProperty::Property { key: PropertyKey::Static(key), .. } if key == "quoted"
        ));
        assert!(matches!(
            &properties[1],
            ObjectProperty::Property { key: PropertyKey::Computed(_), .. }
        ));
    }

    #[test]
    fn test_calls_keep_callee_source() {
        let expr = lower("items.filter(Boolean)");
        assert!(matches!(
            expr.kind,
            ExprKind::Call { ref callee_source, optional: false, .. } if callee_source == "items.filter"
        ));
    }

    #[test]
    fn test_arrow_parameters() {
        let expr = lower("(a, [b, ...c], { d: e = 1, ...f }, ...g) => a");
        let ExprKind::Arrow(arrow) = expr.kind else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params.len(), 3);
        assert!(matches!(arrow.params[0], Pattern::Identifier(ref n) if n == "a"));
        assert!(matches!(arrow.params[1], Pattern::Array { ref rest, .. } if rest.is_some()));
        match &arrow.params[2] {
            Pattern::Object { properties, rest } => {
                assert!(rest.is_some());
                assert!(matches!(properties[0], (PropertyKey::Static(ref k), Pattern::Default { .. }) if k == "d"));
            }
            other => panic!("unexpected pattern {:?}", other),
        }
        assert!(matches!(arrow.rest, Some(Pattern::Identifier(ref n)) if n == "g"));
        assert!(matches!(arrow.body, ArrowBody::Expression(_)));
    }

    #[test]
    fn test_block_bodies_lower_statements() {
        let expr = lower("() => { const { a } = this; if (a) return a; while (a) {} }");
        let ExprKind::Arrow(arrow) = expr.kind else {
            panic!("expected arrow");
        };
        let ArrowBody::Block(statements) = &arrow.body else {
            panic!("expected block body");
        };
        assert!(matches!(statements[0], Stmt::Declaration(_)));
        assert!(matches!(statements[1], Stmt::If { alternate: None, .. }));
        assert!(matches!(statements[2], Stmt::Unsupported(ref kind) if kind == "loop"));
    }

    #[test]
    fn test_markup_attributes() {
        let nodes = parse_markup(r#"<Lib.Item a="x&amp;y" b {...rest} c={1} />"#, false).unwrap();
        let ExprKind::Element(element) = &nodes[0].kind else {
            panic!("expected element");
        };
        assert_eq!(element.name.as_deref(), Some("Lib.Item"));
        assert!(matches!(
            &element.attributes[0],
            MarkupAttribute::Attribute { name, value: Some(_) } if name == "a"
        ));
        assert!(matches!(
            &element.attributes[1],
            MarkupAttribute::Attribute { name, value: None } if name == "b"
        ));
        assert!(matches!(&element.attributes[2], MarkupAttribute::Spread(_)));
    }

    #[test]
    fn test_unsupported_expressions() {
        for source in ["x = 1", "i++", "(a, b)", "/re/", "function () {}"] {
            assert!(
                matches!(lower(source).kind, ExprKind::Unsupported(_)),
                "{} should be unsupported",
                source
            );
        }
    }
}
