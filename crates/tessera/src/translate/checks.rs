use std::{cmp::Ordering, ops::Bound};
use tessera_core::{
    meta::{Check, Sign},
    schema::{Clause, Conversion},
    stmt::{CmpOp, Type, Value},
    Error, Location, Reason, Result,
};

/// Checks that a constraint applies to a field of effective type `ty` and
/// that its arguments describe a satisfiable condition.
pub(super) fn validate(check: &Check, ty: &Type, at: &Location) -> Result<()> {
    let inapplicable = |message: &str| {
        Err(Error::translation(
            Reason::InapplicableAnnotation,
            at.clone(),
            message,
        ))
    };
    let invalid = |message: String| {
        Err(Error::translation(
            Reason::InvalidConstraintArguments,
            at.clone(),
            message,
        ))
    };
    let unsatisfiable = |message: String| {
        Err(Error::translation(
            Reason::UnsatisfiableConstraint,
            at.clone(),
            message,
        ))
    };

    match check {
        Check::Sign(sign) => {
            if !ty.is_numeric() {
                return inapplicable("sign checks require a numeric field");
            }
            if ty.is_unsigned() && *sign == Sign::Negative {
                return unsatisfiable(format!("a {ty} field is never negative"));
            }
        }
        Check::Length { min, max } => {
            if !ty.is_string() {
                return inapplicable("length checks require a text field");
            }
            match (min, max) {
                (None, None) => {
                    return invalid("a length check needs a minimum or a maximum".into())
                }
                (Some(min), Some(max)) if min > max => {
                    return unsatisfiable(format!(
                        "minimum length {min} exceeds maximum length {max}"
                    ))
                }
                _ => {}
            }
        }
        Check::Range { lower, upper } => {
            if !ty.is_ordered() {
                return inapplicable("range checks require a numeric or temporal field");
            }

            for bound in [lower, upper] {
                if let Bound::Included(value) | Bound::Excluded(value) = bound {
                    if value.is_null() || !value.is_a(ty) {
                        return invalid(format!("range bound {value} is not a {ty}"));
                    }
                }
            }

            match (lower, upper) {
                (Bound::Unbounded, Bound::Unbounded) => {
                    return invalid("a range check needs at least one bound".into())
                }
                (
                    Bound::Included(low) | Bound::Excluded(low),
                    Bound::Included(high) | Bound::Excluded(high),
                ) => {
                    let inclusive =
                        matches!(lower, Bound::Included(_)) && matches!(upper, Bound::Included(_));

                    match low.compare(high) {
                        Some(Ordering::Greater) => {
                            return unsatisfiable(format!(
                                "lower bound {low} exceeds upper bound {high}"
                            ))
                        }
                        Some(Ordering::Equal) if !inclusive => {
                            return unsatisfiable(format!("the range around {low} is empty"))
                        }
                        None => {
                            return invalid(format!("range bounds {low} and {high} are unordered"))
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        Check::OneOf(values) | Check::NoneOf(values) => {
            if values.is_empty() {
                return match check {
                    Check::OneOf(_) => unsatisfiable("an empty list admits no value".into()),
                    _ => invalid("an exclusion list needs at least one value".into()),
                };
            }

            if let Some(value) = values.iter().find(|value| value.is_null() || !value.is_a(ty)) {
                return invalid(format!("{value} is not a {ty}"));
            }
        }
        Check::Compare { op, other } => {
            if other.is_empty() {
                return invalid("a comparison needs another field".into());
            }
            if !op.is_equality() && !(ty.is_ordered() || ty.is_string()) {
                return inapplicable("ordering comparisons require an ordered field");
            }
        }
    }

    Ok(())
}

/// The clause of a single-field check, with literal values in storage form.
///
/// Returns `None` for cross-field comparisons, which are resolved once every
/// column of the table is known.
pub(super) fn clause(
    check: &Check,
    column: &str,
    ty: &Type,
    conversion: &Conversion,
) -> Option<Clause> {
    let stored = |value: &Value| conversion.effective_to_storage(value.clone());
    let compare = |op: CmpOp, value: Value| Clause::Compare {
        column: column.to_string(),
        op,
        value,
    };

    Some(match check {
        Check::Sign(sign) => {
            let zero = stored(&Value::zero(ty)?);
            let op = match sign {
                Sign::Positive => CmpOp::Gt,
                Sign::NonNegative => CmpOp::Ge,
                Sign::Negative => CmpOp::Lt,
                Sign::NonPositive => CmpOp::Le,
                Sign::NonZero => CmpOp::Ne,
            };
            compare(op, zero)
        }
        Check::Length { min, max } => Clause::Length {
            column: column.to_string(),
            min: *min,
            max: *max,
        },
        Check::Range { lower, upper } => {
            let mut parts = vec![];
            match lower {
                Bound::Included(value) => parts.push(compare(CmpOp::Ge, stored(value))),
                Bound::Excluded(value) => parts.push(compare(CmpOp::Gt, stored(value))),
                Bound::Unbounded => {}
            }
            match upper {
                Bound::Included(value) => parts.push(compare(CmpOp::Le, stored(value))),
                Bound::Excluded(value) => parts.push(compare(CmpOp::Lt, stored(value))),
                Bound::Unbounded => {}
            }
            Clause::and(parts)
        }
        Check::OneOf(values) => Clause::InList {
            column: column.to_string(),
            values: values.iter().map(stored).collect(),
            negated: false,
        },
        Check::NoneOf(values) => Clause::InList {
            column: column.to_string(),
            values: values.iter().map(stored).collect(),
            negated: true,
        },
        Check::Compare { .. } => return None,
    })
}

/// The tightest maximum length the checks impose.
pub(super) fn max_length<'a>(checks: impl Iterator<Item = &'a Check>) -> Option<u64> {
    checks
        .filter_map(|check| match check {
            Check::Length { max, .. } => *max,
            _ => None,
        })
        .min()
}
