//! Expressions evaluated against a group [`Scope`].
//!
//! Parsing is left to front ends; the engine only needs something implementing [`Expression`].
//! [`Expr`] is a small vectorized AST covering the common aggregation functions, and
//! [`FnExpression`] wraps a closure for front ends that compile to native code.
use crate::error::ExprError;
use crate::functions;
use crate::scope::Scope;
use frame_columnar::{DefaultPromotion, Table, TypePromotion, Value, Vector};
use std::fmt;
use std::sync::Arc;

pub type ExprResult<T> = Result<T, ExprError>;

/// An opaque computation over the names bound in a [`Scope`].
pub trait Expression: fmt::Debug + Send + Sync {
    fn evaluate(&self, scope: &Scope) -> ExprResult<Datum>;

    /// Source-like text for the expression, used as the auto-derived entry name.
    fn label(&self) -> String;
}

/// Anything an expression can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    /// No result at all.
    Null,
    Vector(Vector),
    /// Several named columns at once.
    Frame(Table),
    /// A function value. Never a valid summary result.
    Function(String),
}

impl Datum {
    /// Short description of the kind of result, used in error messages.
    pub fn kind(&self) -> String {
        match self {
            Datum::Null => "NULL".to_string(),
            Datum::Vector(v) => format!("<{}>", v.data_type()),
            Datum::Frame(_) => "a data frame".to_string(),
            Datum::Function(_) => "a function".to_string(),
        }
    }
}

impl From<Vector> for Datum {
    fn from(value: Vector) -> Self {
        Datum::Vector(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Column(String),
    /// The empty result.
    Null,
    /// `c(...)`: concatenate vectors, skipping empty results.
    Combine(Vec<Expr>),
    Call {
        name: String,
        args: Vec<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Scalar conditional; only the selected branch is evaluated.
    If {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Sub-table constructor. Fields are recycled to a common size.
    Tibble(Vec<(String, Expr)>),
    /// A function value (evaluates to [`Datum::Function`]).
    Function(String),
}

impl Expr {
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::UnaryOp {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn if_else(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn tibble<N: Into<String>>(fields: impl IntoIterator<Item = (N, Expr)>) -> Self {
        Expr::Tibble(fields.into_iter().map(|(n, e)| (n.into(), e)).collect())
    }

    fn eval(&self, scope: &Scope) -> ExprResult<Datum> {
        match self {
            Expr::Literal(value) => Ok(Vector::from_value(value.clone()).into()),
            Expr::Column(name) => scope
                .get(name)
                .cloned()
                .map(Datum::Vector)
                .ok_or_else(|| ExprError::UnknownName(name.clone())),
            Expr::Null => Ok(Datum::Null),
            Expr::Combine(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match item.eval(scope)? {
                        Datum::Null => {}
                        Datum::Vector(v) => parts.push(v),
                        other => {
                            return Err(ExprError::Type(format!(
                                "can't combine {} in `c()`",
                                other.kind()
                            )))
                        }
                    }
                }
                if parts.is_empty() {
                    return Ok(Datum::Null);
                }
                let mut types = parts.iter().map(Vector::data_type);
                let data_type = DefaultPromotion.common_type_of(&mut types).ok_or_else(|| {
                    ExprError::Type("can't combine incompatible types in `c()`".into())
                })?;
                Ok(Vector::concat(data_type, &parts)?.into())
            }
            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval_vector(scope)?);
                }
                Ok(functions::call(name, values, scope)?.into())
            }
            Expr::UnaryOp { op, expr } => {
                let value = expr.eval_vector(scope)?;
                Ok(functions::unary(*op, &value)?.into())
            }
            Expr::BinaryOp { op, left, right } => {
                let left = left.eval_vector(scope)?;
                let right = right.eval_vector(scope)?;
                Ok(functions::binary(*op, &left, &right)?.into())
            }
            Expr::If {
                condition,
                then,
                otherwise,
            } => {
                let condition = condition.eval_vector(scope)?;
                if functions::scalar_truth(&condition)? {
                    then.eval(scope)
                } else {
                    otherwise.eval(scope)
                }
            }
            Expr::Tibble(fields) => {
                let mut columns = Vec::with_capacity(fields.len());
                for (name, expr) in fields {
                    columns.push((name.clone(), expr.eval_vector(scope)?));
                }
                let size = functions::common_size(columns.iter().map(|(_, v)| v.len()))?;
                let mut table = Table::with_rows(size);
                for (name, column) in columns {
                    table.add_column(name, column.broadcast(size)?)?;
                }
                Ok(Datum::Frame(table))
            }
            Expr::Function(name) => Ok(Datum::Function(name.clone())),
        }
    }

    fn eval_vector(&self, scope: &Scope) -> ExprResult<Vector> {
        match self.eval(scope)? {
            Datum::Vector(v) => Ok(v),
            other => Err(ExprError::Type(format!(
                "`{self}` must be a vector, not {}",
                other.kind()
            ))),
        }
    }
}

impl Expression for Expr {
    fn evaluate(&self, scope: &Scope) -> ExprResult<Datum> {
        self.eval(scope)
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => f.write_str(&value.to_literal()),
            Expr::Column(name) => write_name(f, name),
            Expr::Null => f.write_str("NULL"),
            Expr::Combine(items) => {
                f.write_str("c(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::UnaryOp { op, expr } => {
                let symbol = match op {
                    UnaryOp::Negate => "-",
                    UnaryOp::Not => "!",
                };
                f.write_str(symbol)?;
                write_operand(f, expr)
            }
            Expr::BinaryOp { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
            Expr::If {
                condition,
                then,
                otherwise,
            } => write!(f, "if ({condition}) {then} else {otherwise}"),
            Expr::Tibble(fields) => {
                f.write_str("tibble(")?;
                for (idx, (name, expr)) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write_name(f, name)?;
                    write!(f, " = {expr}")?;
                }
                f.write_str(")")
            }
            Expr::Function(name) => f.write_str(name),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::BinaryOp { .. } | Expr::If { .. } => write!(f, "({expr})"),
        _ => write!(f, "{expr}"),
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let syntactic = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '.')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if syntactic {
        f.write_str(name)
    } else {
        write!(f, "`{name}`")
    }
}

type ExprFn = dyn Fn(&Scope) -> ExprResult<Datum> + Send + Sync;

/// An expression backed by a native closure.
#[derive(Clone)]
pub struct FnExpression {
    label: String,
    func: Arc<ExprFn>,
}

impl FnExpression {
    pub fn new(
        label: impl Into<String>,
        func: impl Fn(&Scope) -> ExprResult<Datum> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for FnExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExpression")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Expression for FnExpression {
    fn evaluate(&self, scope: &Scope) -> ExprResult<Datum> {
        (self.func)(scope)
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}
