use tessera_core::schema::Clause;
use tessera_core::stmt::{CmpOp, Value};

fn row<'a>(values: &'a [(&'a str, Value)]) -> impl Fn(&str) -> Option<Value> + 'a {
    move |column| {
        values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.clone())
    }
}

fn positive(column: &str) -> Clause {
    Clause::Compare {
        column: column.into(),
        op: CmpOp::Gt,
        value: Value::I32(0),
    }
}

#[test]
fn compare_against_literal() {
    let clause = positive("Qty");
    assert_eq!(clause.evaluate(&row(&[("Qty", Value::I32(3))])), Some(true));
    assert_eq!(clause.evaluate(&row(&[("Qty", Value::I32(0))])), Some(false));
}

#[test]
fn null_operand_is_unknown_and_admitted() {
    let clause = positive("Qty");
    let lookup = row(&[("Qty", Value::Null)]);
    assert_eq!(clause.evaluate(&lookup), None);
    assert!(clause.admits(&lookup));
}

#[test]
fn missing_column_is_unknown() {
    assert_eq!(positive("Qty").evaluate(&row(&[])), None);
}

#[test]
fn length_bounds_are_inclusive() {
    let clause = Clause::Length {
        column: "Code".into(),
        min: Some(2),
        max: Some(3),
    };

    assert_eq!(clause.evaluate(&row(&[("Code", "ab".into())])), Some(true));
    assert_eq!(clause.evaluate(&row(&[("Code", "abc".into())])), Some(true));
    assert_eq!(clause.evaluate(&row(&[("Code", "abcd".into())])), Some(false));
    assert_eq!(clause.evaluate(&row(&[("Code", "a".into())])), Some(false));
}

#[test]
fn in_list_and_negation() {
    let one_of = Clause::InList {
        column: "Color".into(),
        values: vec!["red".into(), "green".into()],
        negated: false,
    };
    let none_of = Clause::InList {
        column: "Color".into(),
        values: vec!["red".into()],
        negated: true,
    };

    let binding = [("Color", "red".into())];
    let lookup = row(&binding);
    assert_eq!(one_of.evaluate(&lookup), Some(true));
    assert_eq!(none_of.evaluate(&lookup), Some(false));
}

#[test]
fn cross_field_comparison() {
    let clause = Clause::CrossField {
        column: "Start".into(),
        op: CmpOp::Le,
        other: "End".into(),
    };

    let ok = [("Start", Value::I64(1)), ("End", Value::I64(5))];
    let bad = [("Start", Value::I64(6)), ("End", Value::I64(5))];
    assert_eq!(clause.evaluate(&row(&ok)), Some(true));
    assert_eq!(clause.evaluate(&row(&bad)), Some(false));
    assert_eq!(clause.evaluate(&row(&ok[..1])), None);
}

#[test]
fn and_or_three_valued() {
    let unknown = positive("Missing");
    let yes = positive("Qty");
    let no = Clause::Not(Box::new(positive("Qty")));
    let lookup = row(&[("Qty", Value::I32(1))]);

    assert_eq!(
        Clause::And(vec![yes.clone(), unknown.clone()]).evaluate(&lookup),
        None
    );
    assert_eq!(
        Clause::And(vec![no.clone(), unknown.clone()]).evaluate(&lookup),
        Some(false)
    );
    assert_eq!(
        Clause::Or(vec![yes.clone(), unknown.clone()]).evaluate(&lookup),
        Some(true)
    );
    assert_eq!(Clause::Or(vec![no, unknown]).evaluate(&lookup), None);
}

#[test]
fn is_null() {
    let clause = Clause::IsNull {
        column: "Note".into(),
        negated: true,
    };
    assert_eq!(clause.evaluate(&row(&[("Note", Value::Null)])), Some(false));
    assert_eq!(clause.evaluate(&row(&[("Note", "x".into())])), Some(true));
}

#[test]
fn display_renders_sql_like_text() {
    let clause = Clause::And(vec![
        positive("Qty"),
        Clause::Length {
            column: "Code".into(),
            min: None,
            max: Some(8),
        },
    ]);
    assert_eq!(clause.to_string(), "(Qty > 0 AND LENGTH(Code) <= 8)");
    assert_eq!(clause.columns(), vec!["Qty", "Code"]);
}
