use expect_test::{expect, Expect};

use super::{literal_value, parse_expression, ExprItem, Expression, Op, Width};
use crate::buffer::TokenBuffer;
use crate::lex::Lexer;
use crate::Interner;

fn render(expr: &Expression, si: &Interner) -> String {
    let items: Vec<String> = expr
        .items
        .iter()
        .map(|item| match item {
            ExprItem::Value(value) => value.to_string(),
            ExprItem::Ref(name) => si.resolve(*name).unwrap().to_string(),
            ExprItem::Op(Op::Identity) => "id".to_string(),
            ExprItem::Op(Op::Negation) => "neg".to_string(),
            ExprItem::Op(Op::Add) => "+".to_string(),
            ExprItem::Op(Op::Sub) => "-".to_string(),
            ExprItem::Op(Op::Mul) => "*".to_string(),
            ExprItem::Op(Op::Div) => "/".to_string(),
        })
        .collect();
    format!("[{}]", items.join(" "))
}

fn check(src: &str, expect: Expect) {
    let mut tokens = TokenBuffer::new(Lexer::new(src));
    let mut si = Interner::default();
    let rendered = match parse_expression(&mut tokens, &mut si, Width::Any) {
        Some(expr) => render(&expr, &si),
        None => "no match".to_string(),
    };
    let next = tokens.stage();
    expect.assert_eq(&format!("{rendered}\nnext: {:?} {:?}", next.kind, next.text));
}

#[test]
fn single_value() {
    check(
        "10",
        expect![[r#"
            [10]
            next: Eof """#]],
    );
    check(
        "$10",
        expect![[r#"
            [16]
            next: Eof """#]],
    );
    check(
        "%10",
        expect![[r#"
            [2]
            next: Eof """#]],
    );
}

#[test]
fn single_reference() {
    check(
        "COUNT",
        expect![[r#"
            [COUNT]
            next: Eof """#]],
    );
}

#[test]
fn same_precedence_keeps_order() {
    check(
        "A+B-C",
        expect![[r#"
            [A B C - +]
            next: Eof """#]],
    );
}

#[test]
fn multiplication_binds_tighter() {
    check(
        "A+B*C+D",
        expect![[r#"
            [A B C * D + +]
            next: Eof """#]],
    );
    check(
        "A/B+C",
        expect![[r#"
            [A B / C +]
            next: Eof """#]],
    );
}

#[test]
fn parentheses_group() {
    check(
        "(A+B)*(C+D)",
        expect![[r#"
            [A B + C D + *]
            next: Eof """#]],
    );
    check(
        "A*(B+C)*D",
        expect![[r#"
            [A B C + D * *]
            next: Eof """#]],
    );
}

#[test]
fn unary_operators() {
    check(
        "-A",
        expect![[r#"
            [A neg]
            next: Eof """#]],
    );
    check(
        "+A",
        expect![[r#"
            [A id]
            next: Eof """#]],
    );
    check(
        "A + -B",
        expect![[r#"
            [A B neg +]
            next: Eof """#]],
    );
}

#[test]
fn foreign_close_paren_left_behind() {
    check(
        "A)",
        expect![[r#"
            [A]
            next: Symbol ")""#]],
    );
}

#[test]
fn rejects_leading_binary_op() {
    check(
        "*A",
        expect![[r#"
            no match
            next: Symbol "*""#]],
    );
}

#[test]
fn rejects_trailing_op() {
    check(
        "A+",
        expect![[r#"
            no match
            next: Ident "A""#]],
    );
}

#[test]
fn rejects_unclosed_paren() {
    check(
        "(",
        expect![[r#"
            no match
            next: Symbol "(""#]],
    );
    check(
        "(A",
        expect![[r#"
            no match
            next: Symbol "(""#]],
    );
}

#[test]
fn rejects_bare_close_paren() {
    check(
        ")",
        expect![[r#"
            no match
            next: Symbol ")""#]],
    );
}

#[test]
fn rejects_empty() {
    check(
        "",
        expect![[r#"
            no match
            next: Eof """#]],
    );
}

#[test]
fn chained_expressions() {
    let mut tokens = TokenBuffer::new(Lexer::new("A, B"));
    let mut si = Interner::default();
    let first = parse_expression(&mut tokens, &mut si, Width::Any).unwrap();
    assert!(first.reference().is_some());
    assert!(tokens.stage().is_symbol(","));
    let second = parse_expression(&mut tokens, &mut si, Width::Any).unwrap();
    assert!(second.reference().is_some());
    assert_ne!(first.reference(), second.reference());
}

#[test]
fn width_carried() {
    let mut tokens = TokenBuffer::new(Lexer::new("$10"));
    let mut si = Interner::default();
    let expr = parse_expression(&mut tokens, &mut si, Width::U8).unwrap();
    assert_eq!(expr.width, Width::U8);
    assert_eq!(expr.value(), Some(16));
}

#[test]
fn width_bounds() {
    assert!(Width::Any.holds(i32::MIN));
    assert!(Width::Any.holds(i32::MAX));
    assert!(Width::U8.holds(0));
    assert!(Width::U8.holds(255));
    assert!(!Width::U8.holds(256));
    assert!(!Width::U8.holds(-1));
    assert!(Width::U16.holds(0xFFFF));
    assert!(!Width::U16.holds(0x10000));
    assert!(Width::I8.holds(-128));
    assert!(Width::I8.holds(127));
    assert!(!Width::I8.holds(128));
    assert!(Width::I16.holds(-0x8000));
    assert!(!Width::I16.holds(0x8000));
    assert!(Width::U24.holds(0xFF_FFFF));
    assert!(!Width::U24.holds(0x100_0000));
    assert!(Width::U32.holds(i32::MAX));
    assert!(!Width::U32.holds(-1));
    assert!(Width::I32.holds(i32::MIN));
}

#[test]
fn literal_values() {
    assert_eq!(literal_value("10"), 10);
    assert_eq!(literal_value("$10"), 16);
    assert_eq!(literal_value("$1a2B"), 0x1a2b);
    assert_eq!(literal_value("%10"), 2);
    assert_eq!(literal_value("$"), 0);
    assert_eq!(literal_value("$FFFFFFFF"), 0);
}

#[test]
fn expression_shape() {
    let mut tokens = TokenBuffer::new(Lexer::new("A+B"));
    let mut si = Interner::default();
    let expr = parse_expression(&mut tokens, &mut si, Width::Any).unwrap();
    assert!(expr.is_compound());
    assert_eq!(expr.value(), None);
    assert_eq!(expr.reference(), None);

    let mut single = Expression {
        items: vec![ExprItem::Value(4)],
        width: Width::Any,
    };
    assert!(!single.is_compound());
    assert_eq!(single.value(), Some(4));
    single.negate();
    assert_eq!(single.value(), None);
    assert_eq!(single.items.last(), Some(&ExprItem::Op(Op::Negation)));
}
