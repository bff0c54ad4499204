#[cfg(test)]
mod tests {
    use crate::context::RenderContext;
    use crate::error::Fault;
    use crate::evaluate::Evaluator;
    use crate::function::Function;
    use crate::options::ParserOptions;
    use crate::parse::parse_markup;
    use crate::value::{Object, Value};
    use rstest::rstest;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Evaluates `{source}` and returns the value plus every reported fault.
    fn evaluate_with(source: &str, options: ParserOptions) -> (Value, Vec<Fault>) {
        let faults = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&faults);
        let options = options.with_on_error(move |fault: &Fault| sink.borrow_mut().push(fault.clone()));
        let ctx = RenderContext::from_options(&options);
        let nodes = parse_markup(&format!("{{{}}}", source), false).unwrap();
        let value = Evaluator::new(ctx).evaluate(&nodes[0], None);
        let faults = faults.borrow().clone();
        (value, faults)
    }

    fn evaluate(source: &str) -> Value {
        evaluate_with(source, ParserOptions::default()).0
    }

    fn numbers(values: &[f64]) -> Value {
        Value::from(values.iter().map(|n| Value::from(*n)).collect::<Vec<_>>())
    }

    #[rstest]
    #[case("1 + 2*4/8 - 1", 1.0)]
    #[case("2 ** 4", 16.0)]
    #[case("27 % 14", 13.0)]
    #[case("-(3 - 5)", 2.0)]
    #[case("+'42'", 42.0)]
    #[case("10 / 4", 2.5)]
    fn test_arithmetic(#[case] source: &str, #[case] expected: f64) {
        assert_eq!(evaluate(source), Value::from(expected));
    }

    #[rstest]
    #[case("1 < 2", true)]
    #[case("2 <= 2", true)]
    #[case("3 > 4", false)]
    #[case("4 >= 5", false)]
    #[case("'a' < 'b'", true)]
    #[case("1 == '1'", true)]
    #[case("1 === '1'", false)]
    #[case("null == undefined", true)]
    #[case("null === undefined", false)]
    #[case("1 != 2", true)]
    #[case("!0", true)]
    #[case("!'text'", false)]
    fn test_comparison_and_logic(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(evaluate(source), Value::Bool(expected));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(evaluate("'a' + 1 + 2"), Value::from("a12"));
        assert_eq!(evaluate("1 + 2 + 'a'"), Value::from("3a"));
        assert_eq!(evaluate("typeof 'x'"), Value::from("string"));
        assert_eq!(evaluate("void 0"), Value::Undefined);
    }

    #[test]
    fn test_exponent_edge_cases() {
        assert!(evaluate("1 ** NaN").to_number().is_nan());
        assert!(evaluate("(-1) ** Infinity").to_number().is_nan());
        assert_eq!(evaluate("2 ** -1"), Value::from(0.5));
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let options = ParserOptions::default().with_binding(
            "sideEffect",
            Function::native("sideEffect", move |_, _| {
                counter.set(counter.get() + 1);
                Ok(Value::from("ran"))
            }),
        );

        for source in ["true || sideEffect()", "false && sideEffect()", "'set' ?? sideEffect()"] {
            evaluate_with(source, options.clone());
        }
        assert_eq!(calls.get(), 0);

        let (value, _) = evaluate_with("0 ?? sideEffect()", options.clone());
        assert_eq!(value, Value::from(0));
        let (value, _) = evaluate_with("null ?? sideEffect()", options);
        assert_eq!(value, Value::from("ran"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_conditional_evaluates_one_branch() {
        let options = ParserOptions::default()
            .with_binding("flag", true)
            .with_binding("boom", Function::native("boom", |_, _| panic!("untaken branch evaluated")));
        let (value, _) = evaluate_with("flag ? 'yes' : boom()", options);
        assert_eq!(value, Value::from("yes"));
    }

    #[test]
    fn test_array_spread_preserves_order() {
        let options = ParserOptions::default()
            .with_binding("head", numbers(&[1.0, 2.0, 3.0]))
            .with_binding("tail", numbers(&[5.0, 6.0, 7.0]));
        let (value, faults) = evaluate_with("[...head, 4, ...tail]", options);
        assert_eq!(value, numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        assert!(faults.is_empty());
    }

    #[test]
    fn test_spreading_a_non_iterable_reports() {
        let options = ParserOptions::default().with_binding("count", 3);
        let (value, faults) = evaluate_with("[...count, 1]", options);
        assert_eq!(value, numbers(&[1.0]));
        assert!(matches!(&faults[..], [Fault::NotIterable { expression }] if expression == "count"));
    }

    #[test]
    fn test_object_spread_overwrites_in_place() {
        let value = evaluate("{ ...{ a: 1, b: 2 }, c: 3, a: 4, ...{ b: 5 } }");
        let object = value.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(object.get("a"), Some(&Value::from(4)));
        assert_eq!(object.get("b"), Some(&Value::from(5)));
    }

    #[test]
    fn test_template_literals() {
        let options = ParserOptions::default().with_binding("name", "Ada").with_binding("n", 2);
        let (value, _) = evaluate_with("`Hello ${name}, ${n * 2} times`", options);
        assert_eq!(value, Value::from("Hello Ada, 4 times"));
    }

    fn nested() -> Object {
        let mut inner = Object::new();
        inner.insert("c".to_string(), Value::from("deep"));
        inner.insert("b1".to_string(), Value::from("joined"));
        let mut outer = Object::new();
        outer.insert("b".to_string(), Value::from(inner));
        outer.insert(
            "list".to_string(),
            Value::from(vec![Value::from_iter([("b", "first")])]),
        );
        outer.insert(
            "withAFunction".to_string(),
            Value::from(Function::native("withAFunction", |_, _| Ok(Value::from("called")))),
        );
        outer
    }

    #[rstest]
    #[case("a.b.c", Value::from("deep"))]
    #[case("a?.b?.c", Value::from("deep"))]
    #[case("a['b'].c", Value::from("deep"))]
    #[case("a?.['b'].c", Value::from("deep"))]
    #[case("a.b['c' + '']", Value::from("deep"))]
    #[case("a[key].c", Value::from("deep"))]
    #[case("a.list[0].b", Value::from("first"))]
    #[case("a.list[1 - 1].b", Value::from("first"))]
    #[case("a.b['b' + 1]", Value::from("joined"))]
    #[case("a?.withAFunction?.()", Value::from("called"))]
    #[case("missing?.b.c", Value::Undefined)]
    #[case("a.nothing?.c", Value::Undefined)]
    #[case("a?.nothing?.()", Value::Undefined)]
    fn test_member_access(#[case] source: &str, #[case] expected: Value) {
        let options = ParserOptions::default()
            .with_binding("a", nested())
            .with_binding("key", "b");
        let (value, faults) = evaluate_with(source, options);
        assert_eq!(value, expected);
        assert!(faults.is_empty(), "unexpected faults: {:?}", faults);
    }

    #[test]
    fn test_this_member_access() {
        let options = ParserOptions::default()
            .with_binding("object", nested())
            .with_binding("fieldName", "b");
        let (value, _) = evaluate_with("this.object[fieldName].c", options.clone());
        assert_eq!(value, Value::from("deep"));
        let (value, _) = evaluate_with("this?.object?.[fieldName]?.c", options);
        assert_eq!(value, Value::from("deep"));
    }

    #[test]
    fn test_missing_member_path_reports_once() {
        let options = ParserOptions::default().with_binding("a", Object::new());
        let (value, faults) = evaluate_with("a.bad.binding", options);
        assert_eq!(value, Value::Undefined);
        assert_eq!(faults.len(), 1);
        match &faults[0] {
            Fault::MemberResolution { root, path } => {
                assert_eq!(root, "a");
                assert_eq!(path, &vec!["bad".to_string(), "binding".to_string()]);
            }
            other => panic!("unexpected fault {:?}", other),
        }
        assert_eq!(faults[0].to_string(), r#"Unable to parse a["bad"]["binding"]"#);
    }

    #[test]
    fn test_unresolved_callee_is_soft() {
        let (value, faults) = evaluate_with("nope(1, 2)", ParserOptions::default());
        assert_eq!(value, Value::Undefined);
        assert!(matches!(&faults[..], [Fault::UnresolvedCallee { callee }] if callee == "nope"));
    }

    #[test]
    fn test_host_failures_become_invocation_faults() {
        let options = ParserOptions::default().with_binding("items", Value::from(Vec::<Value>::new()));
        let (value, faults) = evaluate_with("items.reduce((a, b) => a + b)", options);
        assert_eq!(value, Value::Undefined);
        assert!(matches!(&faults[..], [Fault::Invocation { callee, .. }] if callee == "items.reduce"));
    }

    #[rstest]
    #[case("'ab'.repeat(2 ** 63)")]
    #[case("'a'.padStart(2 ** 70)")]
    fn test_oversized_strings_report_invocation_faults(#[case] source: &str) {
        let (value, faults) = evaluate_with(source, ParserOptions::default());
        assert_eq!(value, Value::Undefined);
        assert!(matches!(&faults[..], [Fault::Invocation { .. }]));
    }

    #[test]
    fn test_random_comparators_and_far_dates_do_not_fault() {
        let options = ParserOptions::default()
            .with_binding("items", Value::from((0..200i32).map(Value::from).collect::<Vec<_>>()));
        let (value, faults) = evaluate_with("items.sort(() => Math.random() - 0.5).length", options);
        assert_eq!(value, Value::from(200));
        assert!(faults.is_empty());

        let (value, faults) = evaluate_with("new Date(1e20, 0).getTime()", ParserOptions::default());
        assert!(value.to_number().is_nan());
        assert!(faults.is_empty());
    }

    #[test]
    fn test_literal_instance_methods() {
        assert_eq!(evaluate("(100.123).toFixed(2)"), Value::from("100.12"));
        assert_eq!(evaluate("'fooBar'.search('Bar')"), Value::from(3));
        assert_eq!(evaluate("'a-b-c'.split('-').join('+')"), Value::from("a+b+c"));
        assert_eq!(evaluate("[3, 1, 2].sort().reverse()[0]"), Value::from(3));
        assert_eq!(evaluate("'abc'.toUpperCase().length"), Value::from(3));
    }

    #[test]
    fn test_bound_property_instance_methods() {
        let options = ParserOptions::default().with_binding("foo", "bar");
        let (value, _) = evaluate_with("foo.substr(1, 2)", options);
        assert_eq!(value, Value::from("ar"));
    }

    #[test]
    fn test_methods_read_from_objects_keep_their_receiver() {
        let mut counter = Object::new();
        counter.insert("count".to_string(), Value::from(7));
        counter.insert(
            "read".to_string(),
            Value::from(Function::native("read", |this, _| {
                Ok(this.get("count").cloned().unwrap_or_default())
            })),
        );
        let options = ParserOptions::default().with_binding("counter", counter);
        let (value, _) = evaluate_with("counter.read()", options);
        assert_eq!(value, Value::from(7));
    }

    #[test]
    fn test_globals() {
        assert_eq!(evaluate("Math.max(1, 5, 3)"), Value::from(5));
        assert_eq!(evaluate("parseInt('42px')"), Value::from(42));
        assert_eq!(evaluate("JSON.stringify({ a: 1 })"), Value::from(r#"{"a":1}"#));
        assert_eq!(evaluate("new Date(2020, 0, 15).getFullYear()"), Value::from(2020));
        assert_eq!(evaluate("Object.keys({ x: 1, y: 2 }).length"), Value::from(2));
    }

    #[test]
    fn test_globals_can_be_disabled() {
        let mut options = ParserOptions::default();
        options.allow_globals = false;
        let (value, _) = evaluate_with("typeof Math", options);
        assert_eq!(value, Value::from("undefined"));
    }

    #[test]
    fn test_bindings_shadow_globals() {
        let options = ParserOptions::default().with_binding("Math", "mine");
        let (value, _) = evaluate_with("Math", options);
        assert_eq!(value, Value::from("mine"));
    }

    #[test]
    fn test_unsupported_syntax_reports() {
        let (value, faults) = evaluate_with("x = 1", ParserOptions::default());
        assert_eq!(value, Value::Undefined);
        assert!(matches!(&faults[..], [Fault::UnsupportedSyntax { .. }]));
    }
}
