use pretty_assertions::assert_eq;
use tessera::meta::{AnnotationKind, Property, TypeDescriptor};
use tessera::schema::{StorageType, TableKind};
use tessera::stmt::Type;
use tessera::{Builder, Catalog, Error, Reason, Registry};

fn person() -> TypeDescriptor {
    TypeDescriptor::entity("Person")
        .property(Property::scalar("Id", Type::I32).annotate(AnnotationKind::PrimaryKey))
        .property(Property::scalar("Name", Type::String))
        .property(Property::aggregate("Address", "Address").nullable())
}

fn address() -> TypeDescriptor {
    TypeDescriptor::aggregate("Address")
        .property(Property::scalar("Street", Type::String))
        .property(Property::scalar("City", Type::String))
}

fn registry(catalog: Catalog) -> Registry {
    Builder::new().build(catalog)
}

fn column_names(registry: &Registry, ty: &str) -> Result<Vec<String>, Error> {
    let table = registry.translate(ty)?;
    Ok(table
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect())
}

#[test]
fn flattens_nullable_aggregate() {
    let registry = registry(Catalog::new().with_type(person()).with_type(address()));
    let table = registry.translate("Person").unwrap();

    assert_eq!(table.name, "Person");
    assert_eq!(table.kind, TableKind::Entity);
    assert_eq!(
        table.column_names(),
        ["Id", "Name", "Address_Street", "Address_City"]
    );
    assert_eq!(table.primary_key, [0]);

    let nullable: Vec<_> = table.descriptors().iter().map(|field| field.nullable).collect();
    assert_eq!(nullable, [false, false, true, true]);

    let columns: Vec<_> = table.descriptors().iter().map(|field| field.column).collect();
    assert_eq!(columns, [0, 1, 2, 3]);
}

#[test]
fn storage_types_follow_logical_types() {
    let registry = registry(Catalog::new().with_type(person()).with_type(address()));
    let table = registry.translate("Person").unwrap();

    assert_eq!(table.column(0).unwrap().storage_ty, StorageType::Integer(4));
    assert_eq!(table.column(1).unwrap().storage_ty, StorageType::Text);
}

#[test]
fn deduces_primary_key_from_type_name() {
    let registry = registry(
        Catalog::new().with_type(
            TypeDescriptor::entity("Customer")
                .property(Property::scalar("Name", Type::String))
                .property(Property::scalar("CustomerId", Type::I64)),
        ),
    );

    let table = registry.translate("Customer").unwrap();
    assert_eq!(table.primary_key, [1]);
}

#[test]
fn key_suffixes_are_configurable() {
    let catalog = Catalog::new().with_type(
        TypeDescriptor::entity("Customer").property(Property::scalar("CustomerKey", Type::I64)),
    );

    let registry = Builder::new().key_suffixes(["Key"]).build(catalog);
    let table = registry.translate("Customer").unwrap();
    assert_eq!(table.primary_key_columns()[0].name, "CustomerKey");
}

#[test]
fn nullable_candidate_is_not_a_deduced_key() {
    let registry = registry(
        Catalog::new().with_type(
            TypeDescriptor::entity("Customer")
                .property(Property::scalar("CustomerID", Type::I64).nullable()),
        ),
    );

    let err = registry.translate("Customer").unwrap_err();
    assert_eq!(err.reason(), Some(Reason::CannotDeducePrimaryKey));
    assert!(err.is_structural());
}

#[test]
fn table_name_prefix_and_separator() {
    let catalog = Catalog::new().with_type(person()).with_type(address());
    let registry = Builder::new()
        .table_name_prefix("app_")
        .name_separator("__")
        .build(catalog);

    let table = registry.translate("Person").unwrap();
    assert_eq!(table.name, "app_Person");
    assert_eq!(table.column_names()[2], "Address__Street");
}

#[test]
fn table_name_override() {
    let registry = registry(
        Catalog::new()
            .with_type(person().table("people"))
            .with_type(address()),
    );

    assert_eq!(registry.translate("Person").unwrap().name, "people");
}

#[test]
fn explicit_column_positions() {
    let registry = registry(
        Catalog::new().with_type(
            TypeDescriptor::entity("Tag")
                .property(
                    Property::scalar("Id", Type::I32)
                        .annotate(AnnotationKind::PrimaryKey)
                        .annotate(AnnotationKind::Column(1)),
                )
                .property(Property::scalar("Label", Type::String).annotate(AnnotationKind::Column(0))),
        ),
    );

    assert_eq!(column_names(&registry, "Tag").unwrap(), ["Label", "Id"]);
    assert_eq!(registry.translate("Tag").unwrap().primary_key, [1]);
}

#[test]
fn unannotated_fields_fill_gaps() {
    let registry = registry(
        Catalog::new().with_type(
            TypeDescriptor::entity("Tag")
                .property(Property::scalar("TagId", Type::I32))
                .property(Property::scalar("Label", Type::String).annotate(AnnotationKind::Column(0)))
                .property(Property::scalar("Color", Type::String)),
        ),
    );

    assert_eq!(
        column_names(&registry, "Tag").unwrap(),
        ["Label", "TagId", "Color"]
    );
}

#[test]
fn renamed_fields_and_aggregates() {
    let registry = registry(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Person")
                    .property(Property::scalar("Id", Type::I32).annotate(AnnotationKind::PrimaryKey))
                    .property(
                        Property::aggregate("Address", "Address")
                            .annotate(AnnotationKind::Name("Home".into())),
                    ),
            )
            .with_type(address()),
    );

    assert_eq!(
        column_names(&registry, "Person").unwrap(),
        ["Id", "Home_Street", "Home_City"]
    );
}

#[test]
fn outermost_annotation_wins() {
    let registry = registry(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Person")
                    .property(Property::scalar("Id", Type::I32).annotate(AnnotationKind::PrimaryKey))
                    .property(
                        Property::aggregate("Address", "Address")
                            .annotate_at("City", AnnotationKind::Name("Ville".into())),
                    ),
            )
            .with_type(
                TypeDescriptor::aggregate("Address")
                    .property(Property::scalar("Street", Type::String))
                    .property(
                        Property::scalar("City", Type::String)
                            .annotate(AnnotationKind::Name("Town".into())),
                    ),
            ),
    );

    assert_eq!(
        column_names(&registry, "Person").unwrap(),
        ["Id", "Address_Street", "Address_Ville"]
    );
}

#[test]
fn nested_aggregates_prefix_every_level() {
    let registry = registry(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Site")
                    .property(Property::scalar("SiteId", Type::I32))
                    .property(Property::aggregate("Location", "Location")),
            )
            .with_type(
                TypeDescriptor::aggregate("Location")
                    .property(Property::aggregate("Address", "Address"))
                    .property(Property::scalar("Floor", Type::I16)),
            )
            .with_type(address()),
    );

    assert_eq!(
        column_names(&registry, "Site").unwrap(),
        [
            "SiteId",
            "Location_Address_Street",
            "Location_Address_City",
            "Location_Floor"
        ]
    );
}

#[test]
fn self_reference_uses_key_columns() {
    let registry = registry(
        Catalog::new().with_type(
            TypeDescriptor::entity("Employee")
                .property(Property::scalar("EmployeeID", Type::I32))
                .property(Property::reference("Manager", "Employee").nullable()),
        ),
    );

    let table = registry.translate("Employee").unwrap();
    assert_eq!(table.column_names(), ["EmployeeID", "Manager_EmployeeID"]);
    assert_eq!(table.primary_key, [0]);

    let manager = table.column(1).unwrap();
    assert!(manager.nullable);
    assert_eq!(manager.ty, Type::I32);
}

#[test]
fn composite_key_from_aggregate() {
    let registry = registry(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Shipment")
                    .property(
                        Property::aggregate("Key", "ShipmentKey")
                            .annotate(AnnotationKind::PrimaryKey),
                    )
                    .property(Property::scalar("Weight", Type::F64)),
            )
            .with_type(
                TypeDescriptor::aggregate("ShipmentKey")
                    .property(Property::scalar("Carrier", Type::String))
                    .property(Property::scalar("Number", Type::I64)),
            )
            .with_type(
                TypeDescriptor::entity("Parcel")
                    .property(Property::scalar("ParcelId", Type::I32))
                    .property(Property::reference("Shipment", "Shipment")),
            ),
    );

    let shipment = registry.translate("Shipment").unwrap();
    assert_eq!(shipment.primary_key, [0, 1]);

    let parcel = registry.translate("Parcel").unwrap();
    assert_eq!(
        parcel.column_names(),
        ["ParcelId", "Shipment_Key_Carrier", "Shipment_Key_Number"]
    );
}
