//! JSX/Expression lowering
//!
//! Converts oxc's arena AST into the owned [`crate::ast`] tree the evaluator
//! walks. Markup text and string attributes get their character references
//! decoded here, since the parser leaves them verbatim.

use oxc_ast::ast::*;
use oxc_span::GetSpan;
use std::rc::Rc;

use crate::ast;
use crate::parse::decode_entities;
use crate::value::number_to_string;

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Lowerer<'s> {
    source: &'s str,
}

impl<'s> Lowerer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source }
    }

    fn source_text(&self, span: oxc_span::Span) -> String {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
            .to_string()
    }

    fn unsupported(&self, kind: &str, span: oxc_span::Span) -> ast::Expr {
        ast::Expr::new(ast::ExprKind::Unsupported(kind.to_string()), span)
    }

    pub fn lower_expression(&self, expr: &Expression<'_>) -> ast::Expr {
        let span = expr.span();
        let kind = match expr {
            Expression::BooleanLiteral(lit) => ast::ExprKind::Literal(ast::Literal::Bool(lit.value)),
            Expression::NullLiteral(_) => ast::ExprKind::Literal(ast::Literal::Null),
            Expression::NumericLiteral(lit) => ast::ExprKind::Literal(ast::Literal::Number(lit.value)),
            Expression::StringLiteral(lit) => {
                ast::ExprKind::Literal(ast::Literal::String(lit.value.to_string()))
            }
            Expression::TemplateLiteral(template) => self.lower_template(template),
            Expression::Identifier(ident) => ast::ExprKind::Identifier(ident.name.to_string()),
            Expression::ThisExpression(_) => ast::ExprKind::This,
            Expression::ParenthesizedExpression(paren) => {
                return self.lower_expression(&paren.expression);
            }
            Expression::ArrayExpression(array) => ast::ExprKind::Array(
                array
                    .elements
                    .iter()
                    .map(|element| self.lower_array_element(element))
                    .collect(),
            ),
            Expression::ObjectExpression(object) => ast::ExprKind::Object(
                object
                    .properties
                    .iter()
                    .map(|property| self.lower_object_property(property))
                    .collect(),
            ),
            Expression::ArrowFunctionExpression(arrow) => {
                ast::ExprKind::Arrow(Rc::new(self.lower_arrow(arrow)))
            }
            Expression::BinaryExpression(binary) => ast::ExprKind::Binary {
                operator: binary.operator,
                left: Box::new(self.lower_expression(&binary.left)),
                right: Box::new(self.lower_expression(&binary.right)),
            },
            Expression::LogicalExpression(logical) => ast::ExprKind::Logical {
                operator: logical.operator,
                left: Box::new(self.lower_expression(&logical.left)),
                right: Box::new(self.lower_expression(&logical.right)),
            },
            Expression::UnaryExpression(unary) => ast::ExprKind::Unary {
                operator: unary.operator,
                argument: Box::new(self.lower_expression(&unary.argument)),
            },
            Expression::ConditionalExpression(cond) => ast::ExprKind::Conditional {
                test: Box::new(self.lower_expression(&cond.test)),
                consequent: Box::new(self.lower_expression(&cond.consequent)),
                alternate: Box::new(self.lower_expression(&cond.alternate)),
            },
            Expression::CallExpression(call) => self.lower_call(call),
            Expression::NewExpression(new_expr) => ast::ExprKind::New {
                callee: Box::new(self.lower_expression(&new_expr.callee)),
                arguments: new_expr
                    .arguments
                    .iter()
                    .map(|arg| self.lower_argument(arg))
                    .collect(),
            },
            Expression::StaticMemberExpression(member) => self.lower_static_member(member),
            Expression::ComputedMemberExpression(member) => self.lower_computed_member(member),
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::CallExpression(call) => self.lower_call(call),
                ChainElement::StaticMemberExpression(member) => self.lower_static_member(member),
                ChainElement::ComputedMemberExpression(member) => {
                    self.lower_computed_member(member)
                }
                ChainElement::TSNonNullExpression(non_null) => {
                    return self.lower_expression(&non_null.expression);
                }
                ChainElement::PrivateFieldExpression(_) => {
                    return self.unsupported("private field", span);
                }
            },
            Expression::JSXElement(element) => {
                ast::ExprKind::Element(Box::new(self.lower_element(element)))
            }
            Expression::JSXFragment(fragment) => {
                ast::ExprKind::Element(Box::new(self.lower_fragment(fragment)))
            }
            Expression::BigIntLiteral(_) => return self.unsupported("BigInt literal", span),
            Expression::RegExpLiteral(_) => return self.unsupported("regular expression", span),
            Expression::AssignmentExpression(_) => return self.unsupported("assignment", span),
            Expression::UpdateExpression(_) => return self.unsupported("update", span),
            Expression::SequenceExpression(_) => return self.unsupported("sequence", span),
            Expression::AwaitExpression(_) => return self.unsupported("await", span),
            Expression::YieldExpression(_) => return self.unsupported("yield", span),
            Expression::FunctionExpression(_) => {
                return self.unsupported("function expression", span);
            }
            Expression::ClassExpression(_) => return self.unsupported("class", span),
            Expression::TaggedTemplateExpression(_) => {
                return self.unsupported("tagged template", span);
            }
            _ => return self.unsupported("expression", span),
        };
        ast::Expr::new(kind, span)
    }

    fn lower_template(&self, template: &TemplateLiteral<'_>) -> ast::ExprKind {
        ast::ExprKind::Template {
            quasis: template
                .quasis
                .iter()
                .map(|quasi| match &quasi.value.cooked {
                    Some(cooked) => cooked.to_string(),
                    None => quasi.value.raw.to_string(),
                })
                .collect(),
            expressions: template
                .expressions
                .iter()
                .map(|expr| self.lower_expression(expr))
                .collect(),
        }
    }

    fn lower_call(&self, call: &CallExpression<'_>) -> ast::ExprKind {
        ast::ExprKind::Call {
            callee: Box::new(self.lower_expression(&call.callee)),
            arguments: call
                .arguments
                .iter()
                .map(|arg| self.lower_argument(arg))
                .collect(),
            optional: call.optional,
            callee_source: self.source_text(call.callee.span()),
        }
    }

    fn lower_static_member(&self, member: &StaticMemberExpression<'_>) -> ast::ExprKind {
        ast::ExprKind::Member {
            object: Box::new(self.lower_expression(&member.object)),
            property: ast::PropertyKey::Static(member.property.name.to_string()),
            optional: member.optional,
        }
    }

    fn lower_computed_member(&self, member: &ComputedMemberExpression<'_>) -> ast::ExprKind {
        ast::ExprKind::Member {
            object: Box::new(self.lower_expression(&member.object)),
            property: ast::PropertyKey::Computed(Box::new(self.lower_expression(&member.expression))),
            optional: member.optional,
        }
    }

    fn lower_argument(&self, arg: &Argument<'_>) -> ast::Expr {
        match arg {
            Argument::SpreadElement(spread) => ast::Expr::new(
                ast::ExprKind::Spread(Box::new(self.lower_expression(&spread.argument))),
                spread.span,
            ),
            _ => match arg.as_expression() {
                Some(expr) => self.lower_expression(expr),
                None => self.unsupported("argument", arg.span()),
            },
        }
    }

    fn lower_array_element(&self, element: &ArrayExpressionElement<'_>) -> ast::Expr {
        match element {
            ArrayExpressionElement::SpreadElement(spread) => ast::Expr::new(
                ast::ExprKind::Spread(Box::new(self.lower_expression(&spread.argument))),
                spread.span,
            ),
            // `[a, , b]`
            ArrayExpressionElement::Elision(elision) => {
                ast::Expr::new(ast::ExprKind::Identifier("undefined".to_string()), elision.span)
            }
            _ => match element.as_expression() {
                Some(expr) => self.lower_expression(expr),
                None => self.unsupported("array element", element.span()),
            },
        }
    }

    fn lower_object_property(&self, property: &ObjectPropertyKind<'_>) -> ast::ObjectProperty {
        match property {
            ObjectPropertyKind::ObjectProperty(prop) => ast::ObjectProperty::Property {
                key: self.lower_property_key(&prop.key, prop.computed),
                value: self.lower_expression(&prop.value),
            },
            ObjectPropertyKind::SpreadProperty(spread) => {
                ast::ObjectProperty::Spread(self.lower_expression(&spread.argument))
            }
        }
    }

    fn lower_property_key(&self, key: &PropertyKey<'_>, computed: bool) -> ast::PropertyKey {
        match key {
            PropertyKey::StaticIdentifier(ident) => ast::PropertyKey::Static(ident.name.to_string()),
            PropertyKey::PrivateIdentifier(ident) => {
                ast::PropertyKey::Static(format!("#{}", ident.name))
            }
            _ => match key.as_expression() {
                Some(Expression::StringLiteral(lit)) if !computed => {
                    ast::PropertyKey::Static(lit.value.to_string())
                }
                Some(Expression::NumericLiteral(lit)) if !computed => {
                    ast::PropertyKey::Static(number_to_string(lit.value))
                }
                Some(expr) => ast::PropertyKey::Computed(Box::new(self.lower_expression(expr))),
                None => ast::PropertyKey::Static(String::new()),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FUNCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    fn lower_arrow(&self, arrow: &ArrowFunctionExpression<'_>) -> ast::ArrowFunction {
        let params = arrow
            .params
            .items
            .iter()
            .map(|param| {
                let pattern = self.lower_binding_pattern(&param.pattern);
                match &param.initializer {
                    Some(default) => ast::Pattern::Default {
                        target: Box::new(pattern),
                        default: Box::new(self.lower_expression(default)),
                    },
                    None => pattern,
                }
            })
            .collect();
        let rest = arrow
            .params
            .rest
            .as_ref()
            .map(|rest| self.lower_binding_pattern(&rest.rest.argument));

        let body = if arrow.expression {
            match arrow.body.statements.first() {
                Some(Statement::ExpressionStatement(stmt)) => {
                    ast::ArrowBody::Expression(self.lower_expression(&stmt.expression))
                }
                _ => ast::ArrowBody::Block(Vec::new()),
            }
        } else {
            ast::ArrowBody::Block(
                arrow
                    .body
                    .statements
                    .iter()
                    .map(|stmt| self.lower_statement(stmt))
                    .collect(),
            )
        };

        ast::ArrowFunction {
            params,
            rest,
            body,
            is_async: arrow.r#async,
            span: arrow.span,
        }
    }

    fn lower_binding_pattern(&self, pattern: &BindingPattern<'_>) -> ast::Pattern {
        match pattern {
            BindingPattern::BindingIdentifier(ident) => ast::Pattern::Identifier(ident.name.to_string()),
            BindingPattern::ObjectPattern(object) => ast::Pattern::Object {
                properties: object
                    .properties
                    .iter()
                    .map(|prop| {
                        (
                            self.lower_property_key(&prop.key, prop.computed),
                            self.lower_binding_pattern(&prop.value),
                        )
                    })
                    .collect(),
                rest: object
                    .rest
                    .as_ref()
                    .map(|rest| Box::new(self.lower_binding_pattern(&rest.argument))),
            },
            BindingPattern::ArrayPattern(array) => ast::Pattern::Array {
                elements: array
                    .elements
                    .iter()
                    .map(|element| element.as_ref().map(|p| self.lower_binding_pattern(p)))
                    .collect(),
                rest: array
                    .rest
                    .as_ref()
                    .map(|rest| Box::new(self.lower_binding_pattern(&rest.argument))),
            },
            BindingPattern::AssignmentPattern(assign) => ast::Pattern::Default {
                target: Box::new(self.lower_binding_pattern(&assign.left)),
                default: Box::new(self.lower_expression(&assign.right)),
            },
        }
    }

    fn lower_statement(&self, stmt: &Statement<'_>) -> ast::Stmt {
        match stmt {
            Statement::VariableDeclaration(decl) => ast::Stmt::Declaration(
                decl.declarations
                    .iter()
                    .map(|declarator| {
                        (
                            self.lower_binding_pattern(&declarator.id),
                            declarator.init.as_ref().map(|init| self.lower_expression(init)),
                        )
                    })
                    .collect(),
            ),
            Statement::ReturnStatement(ret) => {
                ast::Stmt::Return(ret.argument.as_ref().map(|arg| self.lower_expression(arg)))
            }
            Statement::ExpressionStatement(expr) => {
                ast::Stmt::Expression(self.lower_expression(&expr.expression))
            }
            Statement::IfStatement(if_stmt) => ast::Stmt::If {
                test: self.lower_expression(&if_stmt.test),
                consequent: Box::new(self.lower_statement(&if_stmt.consequent)),
                alternate: if_stmt
                    .alternate
                    .as_ref()
                    .map(|alt| Box::new(self.lower_statement(alt))),
            },
            Statement::BlockStatement(block) => ast::Stmt::Block(
                block.body.iter().map(|s| self.lower_statement(s)).collect(),
            ),
            Statement::EmptyStatement(_) => ast::Stmt::Empty,
            Statement::ForStatement(_)
            | Statement::ForInStatement(_)
            | Statement::ForOfStatement(_)
            | Statement::WhileStatement(_)
            | Statement::DoWhileStatement(_) => ast::Stmt::Unsupported("loop".to_string()),
            Statement::FunctionDeclaration(_) => {
                ast::Stmt::Unsupported("function declaration".to_string())
            }
            Statement::ThrowStatement(_) => ast::Stmt::Unsupported("throw".to_string()),
            Statement::TryStatement(_) => ast::Stmt::Unsupported("try".to_string()),
            Statement::SwitchStatement(_) => ast::Stmt::Unsupported("switch".to_string()),
            _ => ast::Stmt::Unsupported("statement".to_string()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MARKUP
    // ═══════════════════════════════════════════════════════════════════════════

    fn lower_element(&self, element: &JSXElement<'_>) -> ast::MarkupElement {
        let opening = &element.opening_element;
        ast::MarkupElement {
            name: Some(self.get_tag_name(&opening.name)),
            attributes: opening
                .attributes
                .iter()
                .map(|item| self.lower_attribute(item))
                .collect(),
            children: element
                .children
                .iter()
                .map(|child| self.lower_child(child))
                .collect(),
            span: element.span,
        }
    }

    fn lower_fragment(&self, fragment: &JSXFragment<'_>) -> ast::MarkupElement {
        ast::MarkupElement {
            name: None,
            attributes: Vec::new(),
            children: fragment
                .children
                .iter()
                .map(|child| self.lower_child(child))
                .collect(),
            span: fragment.span,
        }
    }

    fn lower_attribute(&self, item: &JSXAttributeItem<'_>) -> ast::MarkupAttribute {
        match item {
            JSXAttributeItem::Attribute(attr) => {
                let name = match &attr.name {
                    JSXAttributeName::Identifier(id) => id.name.to_string(),
                    JSXAttributeName::NamespacedName(ns) => {
                        format!("{}:{}", ns.namespace.name, ns.name.name)
                    }
                };
                let value = attr.value.as_ref().map(|value| match value {
                    JSXAttributeValue::StringLiteral(s) => ast::Expr::new(
                        ast::ExprKind::Literal(ast::Literal::String(decode_entities(&s.value))),
                        s.span,
                    ),
                    JSXAttributeValue::ExpressionContainer(container) => {
                        self.lower_jsx_expression(&container.expression, container.span)
                    }
                    JSXAttributeValue::Element(el) => ast::Expr::new(
                        ast::ExprKind::Element(Box::new(self.lower_element(el))),
                        el.span,
                    ),
                    JSXAttributeValue::Fragment(frag) => ast::Expr::new(
                        ast::ExprKind::Element(Box::new(self.lower_fragment(frag))),
                        frag.span,
                    ),
                });
                ast::MarkupAttribute::Attribute { name, value }
            }
            JSXAttributeItem::SpreadAttribute(spread) => {
                ast::MarkupAttribute::Spread(self.lower_expression(&spread.argument))
            }
        }
    }

    pub fn lower_child(&self, child: &JSXChild<'_>) -> ast::Expr {
        match child {
            JSXChild::Text(text) => ast::Expr::new(
                ast::ExprKind::Text(decode_entities(&text.value)),
                text.span,
            ),
            JSXChild::Element(el) => ast::Expr::new(
                ast::ExprKind::Element(Box::new(self.lower_element(el))),
                el.span,
            ),
            JSXChild::Fragment(frag) => ast::Expr::new(
                ast::ExprKind::Element(Box::new(self.lower_fragment(frag))),
                frag.span,
            ),
            JSXChild::ExpressionContainer(container) => {
                let inner = self.lower_jsx_expression(&container.expression, container.span);
                ast::Expr::new(
                    ast::ExprKind::ExpressionContainer(match inner.kind {
                        ast::ExprKind::ExpressionContainer(None) => None,
                        _ => Some(Box::new(inner)),
                    }),
                    container.span,
                )
            }
            JSXChild::Spread(spread) => ast::Expr::new(
                ast::ExprKind::Spread(Box::new(self.lower_expression(&spread.expression))),
                spread.span,
            ),
        }
    }

    /// `{expr}` → the lowered expression; `{}` → an empty container.
    fn lower_jsx_expression(&self, jsx_expr: &JSXExpression<'_>, span: oxc_span::Span) -> ast::Expr {
        match jsx_expr.as_expression() {
            Some(expr) => self.lower_expression(expr),
            None => ast::Expr::new(ast::ExprKind::ExpressionContainer(None), span),
        }
    }

    fn get_tag_name(&self, name: &JSXElementName<'_>) -> String {
        match name {
            JSXElementName::Identifier(id) => id.name.to_string(),
            JSXElementName::IdentifierReference(id) => id.name.to_string(),
            JSXElementName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
            JSXElementName::MemberExpression(me) => self.get_member_name(me),
            JSXElementName::ThisExpression(_) => "this".to_string(),
        }
    }

    fn get_member_name(&self, me: &JSXMemberExpression<'_>) -> String {
        let object = match &me.object {
            JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
            JSXMemberExpressionObject::MemberExpression(inner) => self.get_member_name(inner),
            JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
        };
        format!("{}.{}", object, me.property.name)
    }
}
