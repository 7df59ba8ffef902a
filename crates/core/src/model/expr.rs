//! Expression syntax handed over by the parser front-end.

use super::TypeReference;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(SmolStr),
    /// `target.name`
    MemberSelect { target: Box<Expr>, name: SmolStr },
    /// `target(arguments)`; the target is an identifier or a member select.
    MethodInvocation { target: Box<Expr>, arguments: Vec<Expr> },
    ArrayAccess { array: Box<Expr>, index: Box<Expr> },
    Literal(Literal),
    Parenthesized(Box<Expr>),
    Cast { ty: TypeReference, expr: Box<Expr> },
    NewClass { ty: TypeReference, arguments: Vec<Expr> },
    /// `new T[n][m]` where `element` is `T` and `dimensions` is 2.
    NewArray { element: TypeReference, dimensions: usize },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    /// Whatever the front-end could not recover.
    Erroneous,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int,
    Long,
    Float,
    Double,
    Char,
    Boolean,
    String,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    Not,
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    InstanceOf,
}

impl BinaryOp {
    pub fn yields_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::InstanceOf
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr)
    }
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Identifier(SmolStr::new(name))
    }

    pub fn select(target: Expr, name: &str) -> Self {
        Expr::MemberSelect {
            target: Box::new(target),
            name: SmolStr::new(name),
        }
    }

    pub fn call(target: Expr, arguments: Vec<Expr>) -> Self {
        Expr::MethodInvocation {
            target: Box::new(target),
            arguments,
        }
    }

    pub fn index(array: Expr, index: Expr) -> Self {
        Expr::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build `a.b.c` from its dotted text.
    pub fn path(dotted: &str) -> Self {
        let mut segments = dotted.split('.');
        let first = Expr::ident(segments.next().unwrap_or_default());
        segments.fold(first, Expr::select)
    }
}
