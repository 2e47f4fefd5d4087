//! Built-in vectorized functions and operators used by [`crate::Expr`].
use crate::error::ExprError;
use crate::expr::{BinaryOp, ExprResult, UnaryOp};
use crate::scope::Scope;
use frame_columnar::{DataType, Value, Vector};
use std::cmp::Ordering;
use std::collections::HashSet;

pub(crate) fn call(name: &str, args: Vec<Vector>, scope: &Scope) -> ExprResult<Vector> {
    match name {
        "n" => {
            expect_args(name, &args, 0)?;
            Ok(Vector::from(vec![scope.group_size() as i64]))
        }
        "cur_group_id" => {
            expect_args(name, &args, 0)?;
            Ok(Vector::from(vec![scope.group_index() as i64 + 1]))
        }
        "sum" => sum(single(name, &args)?),
        "mean" => mean(single(name, &args)?),
        "min" => extreme(name, single(name, &args)?, Ordering::Less),
        "max" => extreme(name, single(name, &args)?, Ordering::Greater),
        "range" => {
            let x = single(name, &args)?;
            let lo = extreme(name, x, Ordering::Less)?;
            let hi = extreme(name, x, Ordering::Greater)?;
            let data_type = lo.data_type().max(hi.data_type());
            Ok(Vector::concat(data_type, &[lo, hi])?)
        }
        "length" => Ok(Vector::from(vec![single(name, &args)?.len() as i64])),
        "first" => {
            let x = single(name, &args)?;
            Ok(x.take(&[0]))
        }
        "last" => {
            let x = single(name, &args)?;
            Ok(x.take(&[x.len().wrapping_sub(1)]))
        }
        "unique" => {
            let x = single(name, &args)?;
            let mut seen = HashSet::new();
            let keep: Vec<usize> = (0..x.len())
                .filter(|&idx| x.get(idx).is_some_and(|v| seen.insert(v)))
                .collect();
            Ok(x.take(&keep))
        }
        "rev" => {
            let x = single(name, &args)?;
            let order: Vec<usize> = (0..x.len()).rev().collect();
            Ok(x.take(&order))
        }
        "n_distinct" => {
            let x = single(name, &args)?;
            let distinct: HashSet<Value> = x.iter().collect();
            Ok(Vector::from(vec![distinct.len() as i64]))
        }
        "is_na" => {
            let x = single(name, &args)?;
            Ok(Vector::from(
                (0..x.len()).map(|idx| x.is_missing(idx)).collect::<Vec<_>>(),
            ))
        }
        "sqrt" => {
            let x = doubles(name, single(name, &args)?)?;
            Ok(Vector::Double(
                x.into_iter().map(|v| v.map(f64::sqrt)).collect(),
            ))
        }
        "seq_len" => {
            let n = scalar_count(name, single(name, &args)?)?;
            Ok(Vector::from((1..=n as i64).collect::<Vec<_>>()))
        }
        "head" => {
            expect_args(name, &args, 2)?;
            let n = scalar_count(name, &args[1])?;
            Ok(args[0].slice(0, n))
        }
        "as_text" => Ok(single(name, &args)?.to_text()),
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

pub(crate) fn unary(op: UnaryOp, value: &Vector) -> ExprResult<Vector> {
    match op {
        UnaryOp::Negate => match value.data_type() {
            DataType::Double => Ok(Vector::Double(
                doubles("-", value)?.into_iter().map(|v| v.map(|v| -v)).collect(),
            )),
            DataType::Text => Err(ExprError::Type(
                "invalid argument to unary operator `-`".into(),
            )),
            _ => Ok(Vector::Integer(
                integers("-", value)?
                    .into_iter()
                    .map(|v| v.and_then(i64::checked_neg))
                    .collect(),
            )),
        },
        UnaryOp::Not => Ok(Vector::Boolean(
            booleans("!", value)?.into_iter().map(|v| v.map(|b| !b)).collect(),
        )),
    }
}

pub(crate) fn binary(op: BinaryOp, left: &Vector, right: &Vector) -> ExprResult<Vector> {
    let size = if left.is_empty() || right.is_empty() {
        0
    } else {
        common_size([left.len(), right.len()])?
    };
    let (left, right) = if size == 0 {
        (left.take(&[]), right.take(&[]))
    } else {
        (left.broadcast(size)?, right.broadcast(size)?)
    };
    let symbol = op.symbol();

    match op {
        BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
            let wide = left.data_type().max(right.data_type());
            if !wide.is_numeric() && wide != DataType::Null {
                return Err(ExprError::Type(format!(
                    "non-numeric argument to binary operator `{symbol}`"
                )));
            }
            if op == BinaryOp::Divide || wide == DataType::Double {
                let l = doubles(symbol, &left)?;
                let r = doubles(symbol, &right)?;
                let out = l
                    .into_iter()
                    .zip(r)
                    .map(|(a, b)| {
                        let (a, b) = (a?, b?);
                        Some(match op {
                            BinaryOp::Add => a + b,
                            BinaryOp::Subtract => a - b,
                            BinaryOp::Multiply => a * b,
                            BinaryOp::Divide => a / b,
                            _ => unreachable!(),
                        })
                    })
                    .collect();
                Ok(Vector::Double(out))
            } else {
                let l = integers(symbol, &left)?;
                let r = integers(symbol, &right)?;
                let out = l
                    .into_iter()
                    .zip(r)
                    .map(|(a, b)| {
                        let (a, b) = (a?, b?);
                        match op {
                            BinaryOp::Add => a.checked_add(b),
                            BinaryOp::Subtract => a.checked_sub(b),
                            BinaryOp::Multiply => a.checked_mul(b),
                            _ => unreachable!(),
                        }
                    })
                    .collect();
                Ok(Vector::Integer(out))
            }
        }
        BinaryOp::Equals
        | BinaryOp::NotEquals
        | BinaryOp::Less
        | BinaryOp::LessEquals
        | BinaryOp::Greater
        | BinaryOp::GreaterEquals => {
            let mut out = Vec::with_capacity(size);
            for idx in 0..size {
                let a = left.get(idx).unwrap_or(Value::Null);
                let b = right.get(idx).unwrap_or(Value::Null);
                out.push(compare(symbol, &a, &b)?.map(|ord| match op {
                    BinaryOp::Equals => ord == Ordering::Equal,
                    BinaryOp::NotEquals => ord != Ordering::Equal,
                    BinaryOp::Less => ord == Ordering::Less,
                    BinaryOp::LessEquals => ord != Ordering::Greater,
                    BinaryOp::Greater => ord == Ordering::Greater,
                    BinaryOp::GreaterEquals => ord != Ordering::Less,
                    _ => unreachable!(),
                }));
            }
            Ok(Vector::Boolean(out))
        }
        BinaryOp::And | BinaryOp::Or => {
            let l = booleans(symbol, &left)?;
            let r = booleans(symbol, &right)?;
            let out = l
                .into_iter()
                .zip(r)
                .map(|(a, b)| match (op, a, b) {
                    (BinaryOp::And, Some(false), _) | (BinaryOp::And, _, Some(false)) => {
                        Some(false)
                    }
                    (BinaryOp::Or, Some(true), _) | (BinaryOp::Or, _, Some(true)) => Some(true),
                    (BinaryOp::And, Some(a), Some(b)) => Some(a && b),
                    (_, Some(a), Some(b)) => Some(a || b),
                    _ => None,
                })
                .collect();
            Ok(Vector::Boolean(out))
        }
    }
}

/// Interpret a length-1 condition. Missing or multi-valued conditions are errors.
pub(crate) fn scalar_truth(condition: &Vector) -> ExprResult<bool> {
    if condition.len() != 1 {
        return Err(ExprError::Eval(format!(
            "the condition has length {}, expected 1",
            condition.len()
        )));
    }
    match booleans("if", condition)?.first().copied().flatten() {
        Some(b) => Ok(b),
        None => Err(ExprError::Eval(
            "missing value where TRUE/FALSE needed".into(),
        )),
    }
}

/// Common size of several vectors under length-1 recycling.
pub(crate) fn common_size(sizes: impl IntoIterator<Item = usize>) -> ExprResult<usize> {
    let mut target: Option<usize> = None;
    let mut saw_one = false;
    for size in sizes {
        match (size, target) {
            (1, _) => saw_one = true,
            (size, None) => target = Some(size),
            (size, Some(t)) if size == t => {}
            (size, Some(t)) => {
                return Err(ExprError::Eval(format!(
                    "can't recycle input of size {size} to size {t}"
                )))
            }
        }
    }
    Ok(target.unwrap_or(if saw_one { 1 } else { 0 }))
}

fn expect_args(name: &str, args: &[Vector], expected: usize) -> ExprResult<()> {
    if args.len() != expected {
        return Err(ExprError::Arity {
            function: name.to_string(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

fn single<'a>(name: &str, args: &'a [Vector]) -> ExprResult<&'a Vector> {
    expect_args(name, args, 1)?;
    Ok(&args[0])
}

fn doubles(name: &str, x: &Vector) -> ExprResult<Vec<Option<f64>>> {
    match x.cast(DataType::Double) {
        Ok(Vector::Double(v)) => Ok(v),
        _ => Err(ExprError::Type(format!(
            "`{name}` needs a numeric argument, not <{}>",
            x.data_type()
        ))),
    }
}

fn integers(name: &str, x: &Vector) -> ExprResult<Vec<Option<i64>>> {
    match x.cast(DataType::Integer) {
        Ok(Vector::Integer(v)) => Ok(v),
        _ => Err(ExprError::Type(format!(
            "`{name}` needs an integer argument, not <{}>",
            x.data_type()
        ))),
    }
}

fn booleans(name: &str, x: &Vector) -> ExprResult<Vec<Option<bool>>> {
    match x {
        Vector::Boolean(v) => Ok(v.clone()),
        Vector::Null(n) => Ok(vec![None; *n]),
        Vector::Integer(v) => Ok(v.iter().map(|i| i.map(|i| i != 0)).collect()),
        Vector::Double(v) => Ok(v.iter().map(|d| d.map(|d| d != 0.0)).collect()),
        Vector::Text(_) => Err(ExprError::Type(format!(
            "`{name}` needs a logical argument, not <text>"
        ))),
    }
}

fn scalar_count(name: &str, x: &Vector) -> ExprResult<usize> {
    let n = match doubles(name, x)?.as_slice() {
        [Some(n)] => *n,
        _ => {
            return Err(ExprError::Eval(format!(
                "`{name}()` needs a single non-missing count"
            )))
        }
    };
    if !(n >= 0.0 && n.fract() == 0.0) {
        return Err(ExprError::Eval(format!(
            "`{name}()` needs a non-negative whole count, got {n}"
        )));
    }
    Ok(n as usize)
}

fn sum(x: &Vector) -> ExprResult<Vector> {
    match x.data_type() {
        DataType::Double => {
            let total: Option<f64> = doubles("sum", x)?.into_iter().sum();
            Ok(Vector::Double(vec![total]))
        }
        DataType::Text => Err(ExprError::Type(
            "`sum` needs a numeric argument, not <text>".into(),
        )),
        _ => {
            let mut total = 0i64;
            for v in integers("sum", x)? {
                let Some(v) = v else {
                    return Ok(Vector::Integer(vec![None]));
                };
                total = total
                    .checked_add(v)
                    .ok_or_else(|| ExprError::Eval("integer overflow in `sum()`".into()))?;
            }
            Ok(Vector::from(vec![total]))
        }
    }
}

fn mean(x: &Vector) -> ExprResult<Vector> {
    let values = doubles("mean", x)?;
    let n = values.len();
    let total: Option<f64> = values.into_iter().sum();
    Ok(Vector::Double(vec![total.map(|t| t / n as f64)]))
}

/// `min`/`max`: the value that wins under `wanted`, missing if any input is missing.
fn extreme(name: &str, x: &Vector, wanted: Ordering) -> ExprResult<Vector> {
    if x.is_empty() {
        return match x.data_type() {
            DataType::Text => Err(ExprError::Eval(format!(
                "`{name}()` of an empty text vector"
            ))),
            _ => {
                let inf = if wanted == Ordering::Less {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                };
                Ok(Vector::from(vec![inf]))
            }
        };
    }
    if x.null_count() > 0 {
        return Ok(Vector::missing(x.data_type(), 1));
    }
    let mut best = 0;
    for idx in 1..x.len() {
        let candidate = x.get(idx).unwrap_or(Value::Null);
        let current = x.get(best).unwrap_or(Value::Null);
        if candidate.cmp(&current) == wanted {
            best = idx;
        }
    }
    Ok(x.take(&[best]))
}

fn compare(symbol: &str, a: &Value, b: &Value) -> ExprResult<Option<Ordering>> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => Ok(None),
        (Value::Text(a), Value::Text(b)) => Ok(Some(a.as_ref().cmp(b.as_ref()))),
        (Value::Text(_), _) | (_, Value::Text(_)) => Err(ExprError::Type(format!(
            "can't compare text with a number using `{symbol}`"
        ))),
        (a, b) => Ok(number(a).partial_cmp(&number(b))),
    }
}

fn number(value: &Value) -> f64 {
    match value {
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::Integer(i) => *i as f64,
        Value::Double(d) => d.0,
        Value::Null | Value::Text(_) => f64::NAN,
    }
}
