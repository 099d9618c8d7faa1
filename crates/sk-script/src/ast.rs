//! Syntax tree of a compiled passage template.

/// A compiled template: a sequence of statements whose output, concatenated,
/// is the processed passage text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
}

/// A template statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Literal text, copied to the output.
    Text(String),
    /// An interpolation; `escape` selects HTML escaping.
    Emit {
        /// The interpolated expression.
        expr: Expr,
        /// Whether the value is HTML-escaped.
        escape: bool,
    },
    /// `let name = value`.
    Let {
        /// Local variable name.
        name: String,
        /// Initial value.
        value: Expr,
    },
    /// Assignment to a local or a host property.
    Assign {
        /// Identifier or member expression being assigned.
        target: Expr,
        /// `=`, `+=` or `-=`.
        op: AssignOp,
        /// Assigned value.
        value: Expr,
    },
    /// `if (cond) { … } else { … }`.
    If {
        /// The condition.
        cond: Expr,
        /// Statements run when the condition is truthy.
        then: Vec<Stmt>,
        /// Statements run otherwise (empty without `else`).
        otherwise: Vec<Stmt>,
    },
    /// An expression evaluated for its side effects.
    Expr(Expr),
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `+=`
    Add,
    /// `-=`
    Sub,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `&&`
    And,
    /// `||`
    Or,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal.
    Number(f64),
    /// String literal.
    Str(String),
    /// Variable or global object reference.
    Ident(String),
    /// `object.property`
    Member {
        /// The object being accessed.
        object: Box<Expr>,
        /// Property name.
        property: String,
    },
    /// `callee(args…)`
    Call {
        /// An identifier (function) or member expression (method).
        callee: Box<Expr>,
        /// Call arguments.
        args: Vec<Expr>,
    },
    /// Prefix operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        expr: Box<Expr>,
    },
    /// Infix operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub(crate) fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Returns true if the expression can appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Ident(_) | Self::Member { .. })
    }
}
