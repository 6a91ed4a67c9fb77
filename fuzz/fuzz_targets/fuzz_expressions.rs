#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

use infix::{Expression, MapParameters, Value};

/// Structured expression pieces rendered to source text
#[derive(Debug, Arbitrary)]
enum Operand {
    Int(u16),
    Float(u16, u8),
    Hex(u16),
    Bool(bool),
    Str(String),
    Var,
    Bracketed,
}

impl Operand {
    fn source(&self) -> String {
        match self {
            Operand::Int(n) => format!("{}", n),
            Operand::Float(whole, frac) => format!("{}.{}", whole, frac),
            Operand::Hex(n) => format!("0x{:X}", n),
            Operand::Bool(b) => format!("{}", b),
            Operand::Str(s) => format!("'{}'", s.replace('\\', "").replace('\'', "")),
            Operand::Var => "v".to_string(),
            Operand::Bracketed => "[p 1]".to_string(),
        }
    }
}

#[derive(Debug, Arbitrary)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    And,
    Or,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Coalesce,
}

impl BinaryOp {
    fn source(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Coalesce => "??",
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Expr {
    Leaf(Operand),
    Unary(u8, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    Paren(Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn source(&self, out: &mut String) {
        match self {
            Expr::Leaf(operand) => out.push_str(&operand.source()),
            Expr::Unary(op, inner) => {
                out.push(match op % 3 {
                    0 => '-',
                    1 => '!',
                    _ => '~',
                });
                out.push('(');
                inner.source(out);
                out.push(')');
            }
            Expr::Binary(left, op, right) => {
                left.source(out);
                out.push(' ');
                out.push_str(op.source());
                out.push(' ');
                right.source(out);
            }
            Expr::Paren(inner) => {
                out.push('(');
                inner.source(out);
                out.push(')');
            }
            Expr::Ternary(cond, then, otherwise) => {
                out.push('(');
                cond.source(out);
                out.push_str(") ? (");
                then.source(out);
                out.push_str(") : (");
                otherwise.source(out);
                out.push(')');
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    // half the corpus drives structured generation, half raw text; both
    // must never panic, whatever errors they produce
    if unstructured.arbitrary::<bool>().unwrap_or(false) {
        if let Ok(expr) = Expr::arbitrary(&mut unstructured) {
            let mut source = String::new();
            expr.source(&mut source);
            exercise(&source);
        }
    } else if let Ok(text) = std::str::from_utf8(data) {
        exercise(text);
    }
});

fn exercise(source: &str) {
    let compiled = match Expression::new(source) {
        Ok(compiled) => compiled,
        Err(_) => return,
    };

    let mut params = MapParameters::new();
    params
        .insert("v", 42)
        .insert("p 1", Value::Null);

    // evaluation must be deterministic across calls
    let first = compiled.evaluate(&params);
    let second = compiled.evaluate(&params);
    assert_eq!(first, second);
}
