use std::sync::Arc;
use tessera_core::object::{Element, Localized, Object, Record, Status};
use tessera_core::stmt::Value;
use uuid::Uuid;

#[test]
fn record_builder_and_lookup() {
    let person = Record::new("Person").with("Id", 1).with("Name", "Ann");

    assert_eq!(person.ty, "Person");
    assert_eq!(person.get("Id"), Some(&Object::Value(Value::I32(1))));
    assert_eq!(person.get("Missing"), None);
    assert_eq!(person.len(), 2);
}

#[test]
fn null_value_becomes_null_object() {
    assert_eq!(Object::from(Value::Null), Object::Null);
    assert_eq!(Object::from(None::<i32>), Object::Null);
    assert!(Object::Value(Value::Null).is_null());
}

#[test]
fn get_path_walks_records_and_entities() {
    let address = Record::new("Address").with("City", "Springfield");
    let customer = Arc::new(Record::new("Customer").with("Address", address));
    let order = Object::from(Record::new("Order").with("Customer", customer));

    assert_eq!(
        order.get_path(&["Customer", "Address", "City"]),
        Some(&Object::from("Springfield"))
    );
    assert_eq!(order.get_path(&["Customer", "Phone"]), None);
}

#[test]
fn element_statuses() {
    assert_eq!(Element::new(1).status, Status::New);
    assert_eq!(Element::saved(1).status, Status::Saved);
    assert_eq!(Element::modified(1).status, Status::Modified);
    assert_eq!(Element::deleted(1).status, Status::Deleted);
}

#[test]
fn localized_entries() {
    let key = Uuid::nil();
    let title = Localized::new(key)
        .with("en", Record::new("Title").with("Text", "Hello"))
        .with("fr", Record::new("Title").with("Text", "Bonjour"));

    assert_eq!(title.entries.len(), 2);
    assert_eq!(
        title.get("fr").and_then(|r| r.get("Text")),
        Some(&Object::from("Bonjour"))
    );
}
