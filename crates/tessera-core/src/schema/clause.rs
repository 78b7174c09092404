use crate::stmt::{CmpOp, Value};
use std::fmt;

/// Check constraint expression over the columns of one table.
///
/// Column references are by name; literal values are in storage form.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `column <op> value`
    Compare {
        column: String,
        op: CmpOp,
        value: Value,
    },

    /// Character length of a text column, inclusive bounds
    Length {
        column: String,
        min: Option<u64>,
        max: Option<u64>,
    },

    /// `column [NOT] IN (values)`
    InList {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },

    /// `column IS [NOT] NULL`
    IsNull { column: String, negated: bool },

    /// `column <op> other`
    CrossField {
        column: String,
        op: CmpOp,
        other: String,
    },

    And(Vec<Clause>),

    Or(Vec<Clause>),

    Not(Box<Clause>),
}

impl Clause {
    pub fn and(clauses: impl IntoIterator<Item = Clause>) -> Clause {
        let mut clauses: Vec<_> = clauses.into_iter().collect();
        if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Clause::And(clauses)
        }
    }

    /// Evaluates the clause with SQL three-valued logic.
    ///
    /// `lookup` returns a column's value, or `None` when it is not known.
    /// Unknown or NULL operands make a comparison unknown (`None`). A check
    /// constraint is violated only when this returns `Some(false)`.
    pub fn evaluate(&self, lookup: &dyn Fn(&str) -> Option<Value>) -> Option<bool> {
        let known = |column: &str| lookup(column).filter(|value| !value.is_null());

        match self {
            Clause::Compare { column, op, value } => {
                let ordering = known(column)?.compare(value)?;
                Some(op.eval(ordering))
            }
            Clause::Length { column, min, max } => {
                let value = known(column)?;
                let len = value.as_str()?.chars().count() as u64;
                Some(min.map_or(true, |min| len >= min) && max.map_or(true, |max| len <= max))
            }
            Clause::InList {
                column,
                values,
                negated,
            } => {
                let value = known(column)?;
                let found = values.iter().any(|candidate| *candidate == value);
                Some(found != *negated)
            }
            Clause::IsNull { column, negated } => {
                let is_null = lookup(column).map_or(true, |value| value.is_null());
                Some(is_null != *negated)
            }
            Clause::CrossField { column, op, other } => {
                let ordering = known(column)?.compare(&known(other)?)?;
                Some(op.eval(ordering))
            }
            Clause::And(clauses) => {
                let mut result = Some(true);
                for clause in clauses {
                    match clause.evaluate(lookup) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Clause::Or(clauses) => {
                let mut result = Some(false);
                for clause in clauses {
                    match clause.evaluate(lookup) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            Clause::Not(clause) => clause.evaluate(lookup).map(|value| !value),
        }
    }

    /// True unless the clause definitely rejects the row.
    pub fn admits(&self, lookup: &dyn Fn(&str) -> Option<Value>) -> bool {
        self.evaluate(lookup) != Some(false)
    }

    /// Columns the clause reads.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![];
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, columns: &mut Vec<&'a str>) {
        match self {
            Clause::Compare { column, .. }
            | Clause::Length { column, .. }
            | Clause::InList { column, .. }
            | Clause::IsNull { column, .. } => columns.push(column),
            Clause::CrossField { column, other, .. } => {
                columns.push(column);
                columns.push(other);
            }
            Clause::And(clauses) | Clause::Or(clauses) => {
                for clause in clauses {
                    clause.collect_columns(columns);
                }
            }
            Clause::Not(clause) => clause.collect_columns(columns),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Compare { column, op, value } => write!(f, "{column} {op} {value}"),
            Clause::Length { column, min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(f, "LENGTH({column}) BETWEEN {min} AND {max}"),
                (Some(min), None) => write!(f, "LENGTH({column}) >= {min}"),
                (None, Some(max)) => write!(f, "LENGTH({column}) <= {max}"),
                (None, None) => f.write_str("TRUE"),
            },
            Clause::InList {
                column,
                values,
                negated,
            } => {
                write!(f, "{column} ")?;
                if *negated {
                    f.write_str("NOT ")?;
                }
                f.write_str("IN (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Clause::IsNull { column, negated } => {
                if *negated {
                    write!(f, "{column} IS NOT NULL")
                } else {
                    write!(f, "{column} IS NULL")
                }
            }
            Clause::CrossField { column, op, other } => write!(f, "{column} {op} {other}"),
            Clause::And(clauses) => write_joined(f, clauses, " AND "),
            Clause::Or(clauses) => write_joined(f, clauses, " OR "),
            Clause::Not(clause) => write!(f, "NOT ({clause})"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, clauses: &[Clause], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{clause}")?;
    }
    f.write_str(")")
}
