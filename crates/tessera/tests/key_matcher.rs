use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tessera::object::Record;
use tessera::schema::Conversion;
use tessera::stmt::Value;
use tessera::{Domains, Generator, KeyMatcher, Reason};

fn user(id: i64) -> Arc<Record> {
    Arc::new(Record::new("User").with("UserId", id).with("Name", format!("user {id}")))
}

fn matcher(generator: Generator) -> KeyMatcher {
    KeyMatcher::new(
        "User",
        vec![vec!["UserId".to_string()]],
        vec![Conversion::default()],
        generator,
    )
}

/// Every user, counting how often the domain is enumerated.
fn counted(calls: Arc<AtomicUsize>) -> Generator {
    let domains = Domains::new().with("User", move || {
        calls.fetch_add(1, Ordering::SeqCst);
        (0..).map(user)
    });
    domains.get("User").unwrap().clone()
}

#[test]
fn pulls_candidates_lazily() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut matcher = matcher(counted(calls.clone()));
    assert_eq!(matcher.materialized(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let found = matcher.lookup(&[Value::I64(10)]).unwrap();
    assert_eq!(found.get("UserId").and_then(|id| id.as_value()), Some(&Value::I64(10)));
    assert_eq!(matcher.materialized(), 11);
}

#[test]
fn each_candidate_is_materialized_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut matcher = matcher(counted(calls.clone()));

    let first = matcher.lookup(&[Value::I64(4)]).unwrap();
    let earlier = matcher.lookup(&[Value::I64(2)]).unwrap();
    let again = matcher.lookup(&[Value::I64(4)]).unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(earlier.get("Name").and_then(|name| name.as_value()), Some(&Value::from("user 2")));
    assert_eq!(matcher.materialized(), 5);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn exhausted_domain() {
    let domains = Domains::new().with_instances("User", vec![user(1), user(2)]);
    let mut matcher = matcher(domains.get("User").unwrap().clone());

    let err = matcher.lookup(&[Value::I64(3)]).unwrap_err();
    assert_eq!(err.reason(), Some(Reason::KeyLookupExhausted));
    assert!(err.is_internal());
    assert_eq!(matcher.materialized(), 2);

    // Candidates pulled before exhaustion stay available.
    assert!(matcher.lookup(&[Value::I64(2)]).is_ok());
}

#[test]
fn limit_bounds_infinite_domains() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut matcher = matcher(counted(calls)).limit(Some(5));

    let err = matcher.lookup(&[Value::I64(100)]).unwrap_err();
    assert_eq!(err.reason(), Some(Reason::CandidateLimitExceeded));
    assert_eq!(matcher.materialized(), 5);

    assert!(matcher.lookup(&[Value::I64(4)]).is_ok());
}

#[test]
fn first_candidate_wins_on_duplicate_keys() {
    let original = user(1);
    let duplicate = Arc::new(Record::new("User").with("UserId", 1_i64).with("Name", "impostor"));
    let domains = Domains::new().with_instances("User", vec![original.clone(), user(2), duplicate]);
    let mut matcher = matcher(domains.get("User").unwrap().clone());

    assert!(matcher.lookup(&[Value::I64(2)]).is_ok());
    let _ = matcher.lookup(&[Value::I64(3)]);

    let found = matcher.lookup(&[Value::I64(1)]).unwrap();
    assert!(Arc::ptr_eq(&found, &original));
}

#[test]
fn composite_keys_follow_paths() {
    let shipment = |carrier: &str, number: i64| {
        Arc::new(
            Record::new("Shipment").with(
                "Key",
                Record::new("ShipmentKey")
                    .with("Carrier", carrier)
                    .with("Number", number),
            ),
        )
    };
    let domains = Domains::new().with_instances(
        "Shipment",
        vec![shipment("ups", 1), shipment("dhl", 1), shipment("ups", 2)],
    );

    let mut matcher = KeyMatcher::new(
        "Shipment",
        vec![
            vec!["Key".to_string(), "Carrier".to_string()],
            vec!["Key".to_string(), "Number".to_string()],
        ],
        vec![Conversion::default(), Conversion::default()],
        domains.get("Shipment").unwrap().clone(),
    );

    let found = matcher
        .lookup(&[Value::from("dhl"), Value::I64(1)])
        .unwrap();
    assert_eq!(matcher.target(), "Shipment");
    assert_eq!(
        found.get("Key").and_then(|key| key.get_path(&["Carrier"])),
        Some(&tessera::Object::from("dhl"))
    );
}

#[test]
fn domains_by_type_name() {
    let domains = Domains::new()
        .with_instances("User", vec![user(1)])
        .with("Group", Vec::<Arc<Record>>::new);

    assert!(domains.contains("User"));
    assert!(domains.contains("Group"));
    assert!(!domains.contains("Badge"));
    assert_eq!(format!("{domains:?}"), r#"{"User", "Group"}"#);
}
