use std::sync::Arc;
use std::thread;
use tessera::meta::{Property, TypeDescriptor};
use tessera::object::Record;
use tessera::stmt::{Type, Value};
use tessera::{Builder, Catalog, Domains, Reason, Registry};

fn catalog() -> Catalog {
    Catalog::new()
        .with_type(TypeDescriptor::entity("User").property(Property::scalar("UserId", Type::I64)))
        .with_type(
            TypeDescriptor::entity("Badge")
                .property(Property::scalar("BadgeId", Type::I32))
                .property(Property::reference("Holder", "User")),
        )
        .with_type(TypeDescriptor::entity("Broken").property(Property::scalar("Name", Type::String)))
}

#[test]
fn pipelines_are_built_once() {
    let registry = Builder::new().build(catalog());
    assert!(registry.cached().is_empty());

    let first = registry.pipeline("Badge").unwrap();
    let second = registry.pipeline("Badge").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    registry.pipeline("User").unwrap();
    assert_eq!(registry.cached(), ["Badge", "User"]);
}

#[test]
fn clones_share_the_cache() {
    let registry = Builder::new().build(catalog());
    let clone = registry.clone();

    let pipeline = clone.pipeline("User").unwrap();
    assert!(Arc::ptr_eq(&pipeline, &registry.pipeline("User").unwrap()));
}

#[test]
fn concurrent_requests_agree() {
    let registry = Builder::new().build(catalog());

    let pipelines: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.pipeline("Badge").unwrap()))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    let cached = registry.pipeline("Badge").unwrap();
    assert!(pipelines.iter().all(|pipeline| Arc::ptr_eq(pipeline, &cached)));
}

#[test]
fn failures_are_not_cached() {
    let registry = Builder::new().build(catalog());

    let err = registry.pipeline("Broken").unwrap_err();
    assert_eq!(err.reason(), Some(Reason::CannotDeducePrimaryKey));
    assert!(registry.cached().is_empty());

    let err = registry.pipeline("Missing").unwrap_err();
    assert_eq!(err.reason(), Some(Reason::UnknownType));
}

#[test]
fn translate_does_not_cache() {
    let registry = Builder::new().build(catalog());

    let table = registry.translate("Badge").unwrap();
    assert_eq!(table.column_names(), ["BadgeId", "Holder_UserId"]);
    assert!(registry.cached().is_empty());
}

#[test]
fn pipeline_exposes_its_table() {
    let registry = Builder::new().build(catalog());
    let pipeline = registry.pipeline("Badge").unwrap();

    assert_eq!(pipeline.table().name, "Badge");
    assert_eq!(pipeline.reconstitution().ty(), "Badge");
    assert_eq!(pipeline.reconstitution().width(), 2);
    assert_eq!(registry.catalog().types().len(), 3);
}

#[test]
fn candidate_limit_applies_to_reconstitution() {
    let registry = Registry::builder().max_key_candidates(3).build(catalog());
    assert_eq!(registry.config().max_key_candidates, Some(3));

    let pipeline = registry.pipeline("Badge").unwrap();
    let domains = Domains::new().with("User", || {
        (0..).map(|id: i64| Arc::new(Record::new("User").with("UserId", id)))
    });
    let reconstitutor = pipeline.reconstitutor(&domains).unwrap();

    assert!(reconstitutor.execute(&[Value::I32(1), Value::I64(2)]).is_ok());
    assert_eq!(reconstitutor.materialized("User"), Some(3));

    let err = reconstitutor
        .execute(&[Value::I32(2), Value::I64(50)])
        .unwrap_err();
    assert_eq!(err.reason(), Some(Reason::CandidateLimitExceeded));
    assert_eq!(reconstitutor.materialized("User"), Some(3));
}
