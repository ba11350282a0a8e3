//! Formula data model: tokens, the arithmetic AST, and errors.

/// A lexical token of an arithmetic expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    /// Short human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
        }
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Evaluates with IEEE-754 semantics; division by zero yields infinity or NaN.
    pub fn eval(&self) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.eval(),
            Expr::Binary { op, lhs, rhs } => {
                let (l, r) = (lhs.eval(), rhs.eval());
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                }
            }
        }
    }
}

/// Errors that can occur while checking, parsing or propagating formulas.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error("character '{ch}' is not allowed in a formula")]
    DisallowedCharacter { ch: char },

    /// No formula text at all, as on a field just marked derived.
    #[error("no formula given")]
    MissingFormula,

    #[error("formula is empty")]
    Empty,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {found} at token {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("formula nests deeper than {0} levels")]
    TooDeep(usize),

    #[error("cycle detected among derived fields: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    #[error("derived fields did not settle after {passes} passes")]
    Unstable { passes: usize },
}

impl FormulaError {
    /// Returns `true` if the formula was refused before any evaluation.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::DisallowedCharacter { .. } | Self::MissingFormula)
    }
}
