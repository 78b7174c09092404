use pretty_assertions::assert_eq;
use std::sync::Arc;
use tessera::meta::{AnnotationKind, Property, PropertyTy, TypeDescriptor};
use tessera::object::{Element, Localized, Record};
use tessera::schema::EnumStorage;
use tessera::stmt::{Type, TypeEnum, Value};
use tessera::{Builder, Catalog, Object, Registry};
use uuid::Uuid;

fn people() -> Registry {
    Builder::new().build(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Person")
                    .property(Property::scalar("Id", Type::I32).annotate(AnnotationKind::PrimaryKey))
                    .property(Property::scalar("Name", Type::String))
                    .property(Property::aggregate("Address", "Address").nullable()),
            )
            .with_type(
                TypeDescriptor::aggregate("Address")
                    .property(Property::scalar("Street", Type::String))
                    .property(Property::scalar("City", Type::String)),
            ),
    )
}

fn person(address: impl Into<Object>) -> Object {
    Record::new("Person")
        .with("Id", 1)
        .with("Name", "Ada")
        .with("Address", address)
        .into()
}

#[test]
fn flattens_aggregates_in_column_order() {
    let pipeline = people().pipeline("Person").unwrap();
    let address = Record::new("Address")
        .with("Street", "Main")
        .with("City", "Paris");

    let extracted = pipeline.extract(&person(address));
    assert_eq!(
        extracted.values,
        [
            Value::I32(1),
            Value::from("Ada"),
            Value::from("Main"),
            Value::from("Paris")
        ]
    );
    assert!(extracted.relations.is_empty());
}

#[test]
fn null_aggregate_extracts_nulls() {
    let pipeline = people().pipeline("Person").unwrap();

    let extracted = pipeline.extract(&person(Object::Null));
    assert_eq!(
        extracted.values,
        [Value::I32(1), Value::from("Ada"), Value::Null, Value::Null]
    );
}

#[test]
fn missing_properties_extract_as_null() {
    let pipeline = people().pipeline("Person").unwrap();

    let extracted = pipeline.extract(&Record::new("Person").with("Id", 3).into());
    assert_eq!(
        extracted.values,
        [Value::I32(3), Value::Null, Value::Null, Value::Null]
    );
}

#[test]
fn null_instance_extracts_nulls() {
    let pipeline = people().pipeline("Person").unwrap();

    let extracted = pipeline.extract(&Object::Null);
    assert_eq!(extracted.values, vec![Value::Null; 4]);
    assert_eq!(pipeline.extraction().width(), 4);
}

#[test]
fn ill_typed_members_extract_as_null() {
    let pipeline = people().pipeline("Person").unwrap();
    let instance = Record::new("Person")
        .with("Id", 1)
        .with("Name", Record::new("Name"))
        .with("Address", "not an address");

    let extracted = pipeline.extract(&instance.into());
    assert_eq!(
        extracted.values,
        [Value::I32(1), Value::Null, Value::Null, Value::Null]
    );
}

#[test]
fn relation_rows_are_partitioned_by_status() {
    let registry = Builder::new().build(
        Catalog::new().with_type(
            TypeDescriptor::entity("Order")
                .property(Property::scalar("OrderId", Type::I32))
                .property(Property::relation("Tags", PropertyTy::Scalar(Type::String))),
        ),
    );
    let pipeline = registry.pipeline("Order").unwrap();

    let order = Record::new("Order").with("OrderId", 9).with(
        "Tags",
        vec![
            Element::new("new"),
            Element::saved("saved"),
            Element::modified("modified"),
            Element::deleted("deleted"),
        ],
    );

    let extracted = pipeline.extract(&order.into());
    assert_eq!(extracted.values, [Value::I32(9)]);

    let tags = &extracted.relations["Tags"];
    assert_eq!(tags.insertions, [vec![Value::I32(9), Value::from("new")]]);
    assert_eq!(tags.modifications, [vec![Value::I32(9), Value::from("modified")]]);
    assert_eq!(tags.deletions, [vec![Value::I32(9), Value::from("deleted")]]);

    assert_eq!(
        extracted.child_rows()["Tags"],
        [
            vec![Value::I32(9), Value::from("new")],
            vec![Value::I32(9), Value::from("modified")]
        ]
    );
}

#[test]
fn localization_rows() {
    let registry = Builder::new().build(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Product")
                    .property(Property::scalar("ProductId", Type::I32))
                    .property(Property::localization("Title", "Text")),
            )
            .with_type(TypeDescriptor::aggregate("Text").property(Property::scalar("Caption", Type::String))),
    );
    let pipeline = registry.pipeline("Product").unwrap();

    let key = Uuid::from_u128(42);
    let title = Localized::new(key)
        .with("en", Record::new("Text").with("Caption", "Hello"))
        .with("fr", Record::new("Text").with("Caption", "Bonjour"));
    let product = Record::new("Product").with("ProductId", 7).with("Title", title);

    let extracted = pipeline.extract(&product.into());
    assert_eq!(extracted.values, [Value::I32(7), Value::Uuid(key)]);
    assert_eq!(
        extracted.localizations["Title"],
        [
            vec![Value::Uuid(key), Value::from("en"), Value::from("Hello")],
            vec![Value::Uuid(key), Value::from("fr"), Value::from("Bonjour")]
        ]
    );
}

#[test]
fn references_extract_the_target_key() {
    let registry = Builder::new().build(
        Catalog::new()
            .with_type(TypeDescriptor::entity("User").property(Property::scalar("UserId", Type::I64)))
            .with_type(
                TypeDescriptor::entity("Badge")
                    .property(Property::scalar("BadgeId", Type::I32))
                    .property(Property::reference("Holder", "User").nullable()),
            ),
    );
    let pipeline = registry.pipeline("Badge").unwrap();

    let user = Arc::new(Record::new("User").with("UserId", 5_i64));
    let held = Record::new("Badge").with("BadgeId", 1).with("Holder", user);
    assert_eq!(pipeline.extract(&held.into()).values, [Value::I32(1), Value::I64(5)]);

    let unheld = Record::new("Badge").with("BadgeId", 2).with("Holder", Object::Null);
    assert_eq!(pipeline.extract(&unheld.into()).values, [Value::I32(2), Value::Null]);
}

#[test]
fn calculated_properties_are_recomputed() {
    let registry = Builder::new().build(
        Catalog::new().with_type(
            TypeDescriptor::entity("Person")
                .property(Property::scalar("PersonId", Type::I32))
                .property(Property::scalar("Name", Type::String))
                .property(Property::scalar("Shout", Type::String).computed(|record| {
                    match record.get("Name").and_then(Object::as_value).and_then(Value::as_str) {
                        Some(name) => name.to_uppercase().into(),
                        None => Object::Null,
                    }
                })),
        ),
    );
    let pipeline = registry.pipeline("Person").unwrap();

    let instance = Record::new("Person")
        .with("PersonId", 1)
        .with("Name", "ada")
        .with("Shout", "stale");

    assert_eq!(
        pipeline.extract(&instance.into()).values,
        [Value::I32(1), Value::from("ada"), Value::from("ADA")]
    );
}

#[test]
fn conversions_apply_on_the_way_out() {
    let registry = Builder::new().build(
        Catalog::new()
            .with_enum(TypeEnum::new("Color", ["Red", "Green", "Blue"]))
            .with_type(
                TypeDescriptor::entity("Pen")
                    .property(Property::scalar("PenId", Type::I32))
                    .property(
                        Property::enumeration("Ink", "Color")
                            .annotate(AnnotationKind::EnumStorage(EnumStorage::Integer)),
                    )
                    .property(
                        Property::scalar("Capped", Type::Bool)
                            .annotate(AnnotationKind::converter("bool_as_integer", Vec::<Value>::new())),
                    ),
            ),
    );
    let pipeline = registry.pipeline("Pen").unwrap();

    let pen = Record::new("Pen")
        .with("PenId", 1)
        .with("Ink", Value::enumeration("Blue"))
        .with("Capped", true);

    assert_eq!(
        pipeline.extract(&pen.into()).values,
        [Value::I32(1), Value::I64(2), Value::I32(1)]
    );
}
