#[cfg(test)]
mod test;

use crate::buffer::TokenBuffer;
use crate::lex::{Token, TokenKind};
use crate::{Interner, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Identity,
    Negation,
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Lower binds tighter for this grammar.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Identity | Op::Negation => 0,
            Op::Mul | Op::Div => 1,
            Op::Add | Op::Sub => 2,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Op::Identity | Op::Negation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprItem {
    Value(i32),
    Ref(Symbol),
    Op(Op),
}

/// Declared operand width. `Any` is left for a later symbol-resolution
/// pass to pin down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Width {
    #[default]
    Any,
    U8,
    U16,
    U24,
    U32,
    I8,
    I16,
    I24,
    I32,
}

impl Width {
    pub fn holds(self, x: i32) -> bool {
        match self {
            Width::Any => true,
            Width::U8 => (0..=0xFF).contains(&x),
            Width::U16 => (0..=0xFFFF).contains(&x),
            Width::U24 => (0..=0xFF_FFFF).contains(&x),
            Width::U32 => x >= 0,
            Width::I8 => (-0x80..=0x7F).contains(&x),
            Width::I16 => (-0x8000..=0x7FFF).contains(&x),
            Width::I24 => (-0x80_0000..=0x7F_FFFF).contains(&x),
            Width::I32 => true,
        }
    }
}

/// Items in postfix (output) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub items: Vec<ExprItem>,
    pub width: Width,
}

impl Expression {
    pub fn value(&self) -> Option<i32> {
        match *self.items.as_slice() {
            [ExprItem::Value(value)] => Some(value),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<Symbol> {
        match *self.items.as_slice() {
            [ExprItem::Ref(name)] => Some(name),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.items.len() > 1
    }

    /// Applies a leading sign parsed outside the expression itself.
    pub fn negate(&mut self) {
        self.items.push(ExprItem::Op(Op::Negation));
    }
}

// Each value/reference pushes one operand, each binary operation nets
// one away. The running count must stay positive and finish at one.
fn balanced(items: &[ExprItem]) -> bool {
    let mut depth = 0i32;
    for item in items {
        match item {
            ExprItem::Value(_) | ExprItem::Ref(_) => depth += 1,
            ExprItem::Op(op) => {
                if !op.is_unary() {
                    depth -= 1;
                }
            }
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 1
}

// Operator stack entry; the open-parenthesis marker never reaches the
// output.
enum StackOp {
    Marker,
    Op(Op),
}

fn operator(token: Token, allow_unary: bool) -> Option<Op> {
    if !token.is(TokenKind::Symbol) {
        return None;
    }
    match token.text {
        "+" if allow_unary => Some(Op::Identity),
        "+" => Some(Op::Add),
        "-" if allow_unary => Some(Op::Negation),
        "-" => Some(Op::Sub),
        "*" => Some(Op::Mul),
        "/" => Some(Op::Div),
        _ => None,
    }
}

// Out-of-range (and digit-less, e.g. a bare `$`) literals collapse to 0.
fn literal_value(text: &str) -> i32 {
    let (digits, radix) = match text.as_bytes().first() {
        Some(b'$') => (&text[1..], 16),
        Some(b'%') => (&text[1..], 2),
        _ => (text, 10),
    };
    i32::from_str_radix(digits, radix).unwrap_or(0)
}

/// Shunting-yard over the token buffer. The whole parse is one scope:
/// on failure the cursor is fully restored and nothing partial leaks.
pub fn parse_expression(
    tokens: &mut TokenBuffer,
    si: &mut Interner,
    width: Width,
) -> Option<Expression> {
    tokens.push_scope();
    let mut output = Vec::new();
    let mut stack: Vec<StackOp> = Vec::new();
    let mut allow_unary = true;

    'parse: loop {
        let token = tokens.stage();
        if token.is_symbol("(") {
            stack.push(StackOp::Marker);
            allow_unary = true;
        } else if token.is_symbol(")") {
            allow_unary = false;
            loop {
                match stack.pop() {
                    Some(StackOp::Marker) => break,
                    Some(StackOp::Op(op)) => output.push(ExprItem::Op(op)),
                    None => {
                        // Not ours: a `)` belonging to an enclosing
                        // addressing grammar, e.g. `(EXPR,X)`.
                        tokens.unstage();
                        break 'parse;
                    }
                }
            }
        } else if let Some(op) = operator(token, allow_unary) {
            while let Some(&StackOp::Op(head)) = stack.last() {
                if head.precedence() >= op.precedence() {
                    break;
                }
                stack.pop();
                output.push(ExprItem::Op(head));
            }
            stack.push(StackOp::Op(op));
            allow_unary = true;
        } else if token.is(TokenKind::Ident) {
            output.push(ExprItem::Ref(si.get_or_intern(token.text)));
            allow_unary = false;
        } else if token.is(TokenKind::Literal) {
            output.push(ExprItem::Value(literal_value(token.text)));
            allow_unary = false;
        } else {
            // Anything else ends the expression; drain operators down to
            // a marker, if any, which then fails the parse below.
            while let Some(&StackOp::Op(head)) = stack.last() {
                stack.pop();
                output.push(ExprItem::Op(head));
            }
            tokens.unstage();
            break;
        }
    }

    if stack.is_empty() && !output.is_empty() && balanced(&output) {
        tokens.accept_scope();
        Some(Expression {
            items: output,
            width,
        })
    } else {
        tokens.cancel_scope();
        None
    }
}
