//! Constant resolution: builds the file scope and computes the value of
//! every file-level constant.
//!
//! Follows Go's constant rules where they matter for enum-like groups:
//!
//! - `iota` is the index of the spec within its `const` declaration
//! - a spec without an expression list repeats the previous list
//! - constants may reference each other in any order
//!
//! Arithmetic is done on `i128` with checked operations. Anything that
//! cannot be computed from the file alone (floats, other packages,
//! overflow, cycles) becomes [`ConstValue::Unresolved`].

use std::collections::HashMap;

use tracing::debug;

use super::ast::*;
use crate::value::ConstValue;

/// Intermediate evaluation result. Booleans exist only so comparisons
/// can feed `&&`/`||`; they surface as unresolved.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Int(i128),
    Str(String),
    Bool(bool),
}

impl From<Option<Operand>> for ConstValue {
    fn from(op: Option<Operand>) -> Self {
        match op {
            Some(Operand::Int(v)) => ConstValue::Int(v),
            Some(Operand::Str(s)) => ConstValue::Str(s),
            Some(Operand::Bool(_)) | None => ConstValue::Unresolved,
        }
    }
}

/// One named constant awaiting evaluation.
struct ConstEntry<'a> {
    name: &'a str,
    expr: Option<&'a Expr>,
    iota: i128,
}

#[derive(Clone)]
enum Slot {
    Pending,
    Active,
    Done(Option<Operand>),
}

struct Evaluator<'a> {
    entries: Vec<ConstEntry<'a>>,
    by_name: HashMap<&'a str, usize>,
    slots: Vec<Slot>,
}

/// Build the file-level scope of `file`, resolving constant values.
pub fn resolve_scope(file: &GoFile) -> Scope {
    let mut scope = Scope::default();
    let mut entries: Vec<ConstEntry<'_>> = Vec::new();
    // (scope index, entry index) for every constant object
    let mut const_slots: Vec<(usize, usize)> = Vec::new();

    for decl in &file.decls {
        match decl {
            Decl::Gen(g) => match g.keyword {
                DeclKeyword::Const => {
                    let mut inherited: &[Expr] = &[];
                    for (index, spec) in g.specs.iter().enumerate() {
                        let Spec::Value(v) = spec else { continue };
                        if !v.values.is_empty() {
                            inherited = &v.values;
                        }
                        for (pos, ident) in v.names.iter().enumerate() {
                            if ident.is_blank() {
                                continue;
                            }
                            const_slots.push((scope.len(), entries.len()));
                            entries.push(ConstEntry {
                                name: &ident.name,
                                expr: inherited.get(pos),
                                iota: index as i128,
                            });
                            scope.insert(ident.name.clone(), ObjectKind::Const, ConstValue::Unresolved);
                        }
                    }
                }
                DeclKeyword::Var => {
                    for spec in &g.specs {
                        if let Spec::Value(v) = spec {
                            for ident in v.names.iter().filter(|i| !i.is_blank()) {
                                scope.insert(ident.name.clone(), ObjectKind::Var, ConstValue::Unresolved);
                            }
                        }
                    }
                }
                DeclKeyword::Type => {
                    for spec in &g.specs {
                        if let Spec::Type(t) = spec {
                            if !t.name.is_blank() {
                                scope.insert(t.name.name.clone(), ObjectKind::Type, ConstValue::Unresolved);
                            }
                        }
                    }
                }
                DeclKeyword::Import => {}
            },
            Decl::Func(f) => {
                if f.receiver.is_none() && f.name != "init" && f.name != "_" {
                    scope.insert(f.name.clone(), ObjectKind::Func, ConstValue::Unresolved);
                }
            }
        }
    }

    let mut eval = Evaluator::new(entries);
    for (scope_index, entry_index) in const_slots {
        let value = ConstValue::from(eval.entry(entry_index));
        if !value.is_resolved() {
            debug!(
                file = %file.path.display(),
                constant = %scope.objects[scope_index].name,
                "constant value could not be resolved"
            );
        }
        scope.objects[scope_index].value = value;
    }
    scope
}

impl<'a> Evaluator<'a> {
    fn new(entries: Vec<ConstEntry<'a>>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            by_name.entry(e.name).or_insert(i);
        }
        let slots = vec![Slot::Pending; entries.len()];
        Self {
            entries,
            by_name,
            slots,
        }
    }

    fn entry(&mut self, index: usize) -> Option<Operand> {
        match &self.slots[index] {
            Slot::Done(v) => return v.clone(),
            // reference cycle
            Slot::Active => return None,
            Slot::Pending => {}
        }
        self.slots[index] = Slot::Active;
        let (expr, iota) = (self.entries[index].expr, self.entries[index].iota);
        let value = expr.and_then(|e| self.eval(e, iota));
        self.slots[index] = Slot::Done(value.clone());
        value
    }

    fn eval(&mut self, expr: &Expr, iota: i128) -> Option<Operand> {
        match expr {
            Expr::Int(text) => parse_int_literal(text).map(Operand::Int),
            Expr::Float(_) => None,
            Expr::Str(s) => Some(Operand::Str(s.clone())),
            Expr::Rune(c) => Some(Operand::Int(i128::from(*c))),
            Expr::Ident(name) => self.ident(name, iota),
            Expr::Selector { .. } => None,
            Expr::Paren(inner) => self.eval(inner, iota),
            Expr::Unary { op, operand } => {
                let v = self.eval(operand, iota)?;
                unary(*op, v)
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = self.eval(lhs, iota)?;
                let r = self.eval(rhs, iota)?;
                binary(*op, l, r)
            }
            Expr::Call { func, args } => self.call(func, args, iota),
        }
    }

    fn ident(&mut self, name: &str, iota: i128) -> Option<Operand> {
        if let Some(&index) = self.by_name.get(name) {
            return self.entry(index);
        }
        match name {
            "iota" => Some(Operand::Int(iota)),
            "true" => Some(Operand::Bool(true)),
            "false" => Some(Operand::Bool(false)),
            _ => None,
        }
    }

    fn call(&mut self, func: &Expr, args: &[Expr], iota: i128) -> Option<Operand> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, iota)?);
        }

        let name = match func {
            Expr::Ident(n) if !self.by_name.contains_key(n.as_str()) => n.as_str(),
            // Qualified conversion such as `time.Duration(5)`
            Expr::Selector { .. } | Expr::Paren(_) => {
                return single(values);
            }
            _ => return None,
        };

        match name {
            "len" => match single(values)? {
                Operand::Str(s) => Some(Operand::Int(s.len() as i128)),
                _ => None,
            },
            "min" | "max" => fold_min_max(name == "min", values),
            "string" => match single(values)? {
                Operand::Int(cp) => {
                    let ch = u32::try_from(cp)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    Some(Operand::Str(ch.to_string()))
                }
                s @ Operand::Str(_) => Some(s),
                Operand::Bool(_) => None,
            },
            "cap" | "real" | "imag" | "complex" | "new" | "make" | "append" => None,
            // Conversion to a named or basic type keeps the value.
            _ => single(values),
        }
    }
}

fn single(mut values: Vec<Operand>) -> Option<Operand> {
    if values.len() == 1 {
        values.pop()
    } else {
        None
    }
}

fn fold_min_max(is_min: bool, values: Vec<Operand>) -> Option<Operand> {
    let mut iter = values.into_iter();
    let mut best = iter.next()?;
    for v in iter {
        let replace = match (&best, &v) {
            (Operand::Int(a), Operand::Int(b)) => (b < a) == is_min && b != a,
            (Operand::Str(a), Operand::Str(b)) => (b < a) == is_min && b != a,
            _ => return None,
        };
        if replace {
            best = v;
        }
    }
    Some(best)
}

fn unary(op: UnaryOp, v: Operand) -> Option<Operand> {
    match (op, v) {
        (UnaryOp::Plus, v @ Operand::Int(_)) => Some(v),
        (UnaryOp::Neg, Operand::Int(x)) => x.checked_neg().map(Operand::Int),
        (UnaryOp::Complement, Operand::Int(x)) => Some(Operand::Int(!x)),
        (UnaryOp::Not, Operand::Bool(b)) => Some(Operand::Bool(!b)),
        _ => None,
    }
}

fn binary(op: BinaryOp, l: Operand, r: Operand) -> Option<Operand> {
    use Operand::{Bool, Int, Str};
    match (l, r) {
        (Int(a), Int(b)) => int_binary(op, a, b),
        (Str(a), Str(b)) => match op {
            BinaryOp::Add => Some(Str(a + &b)),
            _ => compare(op, &a, &b).map(Bool),
        },
        (Bool(a), Bool(b)) => match op {
            BinaryOp::LogicalAnd => Some(Bool(a && b)),
            BinaryOp::LogicalOr => Some(Bool(a || b)),
            BinaryOp::Eq => Some(Bool(a == b)),
            BinaryOp::NotEq => Some(Bool(a != b)),
            _ => None,
        },
        _ => None,
    }
}

fn int_binary(op: BinaryOp, a: i128, b: i128) -> Option<Operand> {
    let v = match op {
        BinaryOp::Add => a.checked_add(b)?,
        BinaryOp::Sub => a.checked_sub(b)?,
        BinaryOp::Mul => a.checked_mul(b)?,
        BinaryOp::Div => a.checked_div(b)?,
        BinaryOp::Rem => a.checked_rem(b)?,
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::AndNot => a & !b,
        BinaryOp::Shl => {
            let n = u32::try_from(b).ok()?;
            if a == 0 {
                0
            } else if n >= 127 {
                return None;
            } else {
                a.checked_mul(1i128 << n)?
            }
        }
        BinaryOp::Shr => {
            let n = u32::try_from(b).ok()?;
            if n >= 127 {
                if a < 0 {
                    -1
                } else {
                    0
                }
            } else {
                a >> n
            }
        }
        _ => return compare(op, &a, &b).map(Operand::Bool),
    };
    Some(Operand::Int(v))
}

fn compare<T: PartialOrd + ?Sized>(op: BinaryOp, a: &T, b: &T) -> Option<bool> {
    Some(match op {
        BinaryOp::Eq => a == b,
        BinaryOp::NotEq => a != b,
        BinaryOp::Less => a < b,
        BinaryOp::LessEq => a <= b,
        BinaryOp::Greater => a > b,
        BinaryOp::GreaterEq => a >= b,
        _ => return None,
    })
}

/// Parse a Go integer literal (`42`, `0x2A`, `0o52`, `052`, `0b101010`, `1_000`).
pub fn parse_int_literal(text: &str) -> Option<i128> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0o") | Some("0O") => (8, &digits[2..]),
        Some("0b") | Some("0B") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits.as_str()),
    };
    i128::from_str_radix(body, radix).ok()
}

/// Resolve a single file's scope and log a summary.
pub(crate) fn resolve_file(file: &mut GoFile) {
    file.scope = resolve_scope(file);
    debug!(
        file = %file.path.display(),
        objects = file.scope.len(),
        "resolved file scope"
    );
}
