#[cfg(test)]
mod tests {
    use crate::component::ComponentRef;
    use crate::error::Fault;
    use crate::function::Function;
    use crate::html::to_static_markup;
    use crate::key::SequentialKeys;
    use crate::options::ParserOptions;
    use crate::render::JsxParser;
    use crate::value::{Object, Value};
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn options(markup: &str) -> ParserOptions {
        let mut options = ParserOptions::new(markup).with_key_source(SequentialKeys::new());
        options.render_in_wrapper = false;
        options
    }

    fn collecting(options: ParserOptions) -> (ParserOptions, Rc<RefCell<Vec<Fault>>>) {
        let faults = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&faults);
        let options = options.with_on_error(move |fault: &Fault| sink.borrow_mut().push(fault.clone()));
        (options, faults)
    }

    fn html(options: ParserOptions) -> String {
        to_static_markup(&JsxParser::new(options).render())
    }

    fn numbers(values: &[i32]) -> Value {
        Value::from(values.iter().map(|n| Value::from(*n)).collect::<Vec<_>>())
    }

    /// Renders children as-is, the way a plain wrapper component would.
    fn custom() -> ComponentRef {
        ComponentRef::with_render("Custom", |props: &Object| {
            let text = props.get("text").cloned().unwrap_or_default();
            let children = props.get("children").cloned().unwrap_or_default();
            Ok(Value::from(vec![text, children]))
        })
    }

    #[test]
    fn test_nested_markup_inside_arrow_functions() {
        let options = options("{items.map(item => <Custom><p>{item}</p></Custom>)}")
            .with_component("Custom", custom())
            .with_binding("items", numbers(&[1, 2]));
        assert_eq!(html(options), "<p>1</p><p>2</p>");
    }

    #[test]
    fn test_markup_expressions_inside_arrow_functions() {
        let mut item = Object::new();
        item.insert("name".to_string(), Value::from("Megeara"));
        item.insert("title".to_string(), Value::from("Fury"));
        let options = options("{items.map(item => <Custom text={item.title}><p>{item.name}</p></Custom>)}")
            .with_component("Custom", custom())
            .with_binding("items", Value::from(vec![Value::from(item)]));
        assert_eq!(html(options), "Fury<p>Megeara</p>");
    }

    #[test]
    fn test_statements_inside_block_bodies() {
        let options = options("{(() => { const {a, b} = this; return a + b; })()}")
            .with_binding("a", 1)
            .with_binding("b", 2);
        assert_eq!(html(options), "3");
    }

    #[test]
    fn test_invocation_context_cascades() {
        let get_c = Function::native("getC", |this, _| Ok(this.get("c").cloned().unwrap_or_default()));
        let options = options("{(() => { const {a, b} = this; return a + b + this.getC(); })()}")
            .with_binding("a", 1)
            .with_binding("b", 2)
            .with_binding("c", 3)
            .with_binding("getC", get_c);
        assert_eq!(html(options), "6");
    }

    #[test]
    fn test_standard_library_inside_block_bodies() {
        let options = options("{(() => { const {a, b, c} = this; return Math.max(a, b, c); })()}")
            .with_binding("a", 1)
            .with_binding("b", 2)
            .with_binding("c", 3);
        assert_eq!(html(options), "3");
    }

    #[test]
    fn test_block_bodies_passed_to_components_see_bindings() {
        let prop_test = ComponentRef::with_render("PropTest", |props: &Object| {
            let input = props.get("inputFunction").and_then(Value::as_function).cloned();
            match input {
                Some(function) => function.call(&Value::Undefined, &[Value::from(3)]),
                None => Ok(Value::Undefined),
            }
        });
        let options = options("<PropTest inputFunction={(c) => { const { a, b } = this; return a + b + c; }} />")
            .with_component("PropTest", prop_test)
            .with_binding("a", 1)
            .with_binding("b", 2);
        assert_eq!(html(options), "6");
    }

    #[test]
    fn test_local_scope_is_exposed_to_block_bodies() {
        let options = options("{items.map(item => <span>{(() => { return this.item; })()}</span>)}")
            .with_binding("items", numbers(&[1, 2]));
        assert_eq!(html(options), "<span>1</span><span>2</span>");
    }

    #[test]
    fn test_local_bindings_shadow_outer_bindings() {
        let options = options("{[10].map(item => item + 1)}").with_binding("item", 100);
        assert_eq!(html(options), "11");
    }

    #[test]
    fn test_errors_inside_block_bodies_are_reported() {
        let (options, faults) =
            collecting(options("{(() => { const error = this.doesNotExist.willThrowError; return error; })()}"));
        assert_eq!(html(options), "");
        let faults = faults.borrow();
        assert_eq!(faults.len(), 1);
        assert!(matches!(&faults[0], Fault::MemberResolution { root, .. } if root == "this"));
    }

    #[test]
    fn test_render_props() {
        let container = ComponentRef::with_render("PropTest", |props: &Object| {
            let mut data = Object::new();
            data.insert("name".to_string(), Value::from("from-container"));
            match props.get("children") {
                Some(Value::Function(render)) => render.call(&Value::Undefined, &[Value::from(data)]),
                _ => Ok(Value::Null),
            }
        });
        let options = options("{<PropTest>{(data) => <p>{data.name}</p>}</PropTest>}")
            .with_component("PropTest", container);
        assert_eq!(html(options), "<p>from-container</p>");
    }

    #[test]
    fn test_spread_attributes_reach_components() {
        let prop_test = ComponentRef::with_render("PropTest", |props: &Object| {
            Ok(Value::from(serde_json::to_string(&Value::from(props.clone()).to_json()).unwrap_or_default()))
        });
        let mut item = Object::new();
        item.insert("name".to_string(), Value::from("Megeara"));
        item.insert("friend".to_string(), Value::Bool(true));
        let options = options("{items.map(item => <PropTest {...item} />)}")
            .with_component("PropTest", prop_test)
            .with_binding("items", Value::from(vec![Value::from(item)]));
        assert_eq!(html(options), r#"{&quot;name&quot;:&quot;Megeara&quot;,&quot;friend&quot;:true}"#);
    }

    #[test]
    fn test_constructor_calls() {
        let options = options("<p>{new Date(2001, 5, 1).getFullYear()}</p>");
        assert_eq!(html(options), "<p>2001</p>");
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PARAMETER PATTERNS: expression and block bodies agree
    // ═══════════════════════════════════════════════════════════════════════════

    #[rstest]
    #[case("(a, b = 2) => a + b", "(a, b = 2) => { return a + b; }", "f(1)", "3")]
    #[case("(a, ...rest) => rest.length", "(a, ...rest) => { return rest.length; }", "f(1, 2, 3)", "2")]
    #[case("([x, , z]) => x + z", "([x, , z]) => { return x + z; }", "f([1, 2, 3])", "4")]
    #[case("([x, ...xs]) => xs.join()", "([x, ...xs]) => { return xs.join(); }", "f([1, 2, 3])", "2,3")]
    #[case("({ a, b: alias }) => a + alias", "({ a, b: alias }) => { return a + alias; }", "f({ a: 1, b: 2 })", "3")]
    #[case("({ a = 5 }) => a", "({ a = 5 }) => { return a; }", "f({})", "5")]
    #[case("({ a, ...others }) => Object.keys(others).join()", "({ a, ...others }) => { return Object.keys(others).join(); }", "f({ a: 1, b: 2, c: 3 })", "b,c")]
    fn test_expression_and_block_bodies_agree(
        #[case] expression_body: &str,
        #[case] block_body: &str,
        #[case] call: &str,
        #[case] expected: &str,
    ) {
        for function in [expression_body, block_body] {
            let markup = format!("{{(f => {})({})}}", call, function);
            assert_eq!(html(options(&markup)), expected, "{}", function);
        }
    }

    #[test]
    fn test_defaults_are_evaluated_against_the_outer_scope() {
        let options = options("{[1].map(x => ((y = x * 2) => y + x)())}");
        assert_eq!(html(options), "3");
    }

    #[test]
    fn test_block_body_control_flow() {
        let markup = "{[1, 2, 3].map(n => { if (n % 2) { const label = 'odd'; return label; } else return 'even'; })}";
        assert_eq!(html(options(markup)), "oddevenodd");
    }

    #[test]
    fn test_function_methods() {
        let options = options("{((a, b) => { return this.x + a + b; }).call({ x: 1 }, 2, 3)}");
        assert_eq!(html(options), "6");
        let options = self::options("{((a, b) => a * b).apply(null, [4, 5])}");
        assert_eq!(html(options), "20");
        let options = self::options("{((a, b) => a - b).bind(null, 10)(4)}");
        assert_eq!(html(options), "6");
    }

    #[test]
    fn test_async_arrows_are_rejected() {
        let (options, faults) = collecting(options("{(async () => 1)}"));
        assert_eq!(html(options), "");
        let faults = faults.borrow();
        assert!(matches!(&faults[..], [Fault::UnsupportedFunction { message }] if message.contains("Async")));
    }

    #[test]
    fn test_unsupported_statements_are_reported_on_call() {
        let (options, faults) = collecting(options("{(() => { for (;;) {} })()}"));
        assert_eq!(html(options), "");
        let faults = faults.borrow();
        assert!(matches!(&faults[..], [Fault::UnsupportedFunction { message }] if message.contains("loop")));
    }
}
