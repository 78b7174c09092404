use pretty_assertions::assert_eq;
use tessera::meta::{AnnotationKind, Check, Property, PropertyTy, TypeDescriptor};
use tessera::schema::{StorageType, Table, TableKind};
use tessera::stmt::Type;
use tessera::{Builder, Catalog};

fn order() -> TypeDescriptor {
    TypeDescriptor::entity("Order").property(Property::scalar("OrderId", Type::I32))
}

fn line() -> TypeDescriptor {
    TypeDescriptor::aggregate("Line")
        .property(Property::scalar("Product", Type::String))
        .property(Property::scalar("Qty", Type::I32))
}

fn translate(catalog: Catalog, ty: &str) -> Table {
    Builder::new().build(catalog).translate(ty).unwrap()
}

fn relation<'t>(table: &'t Table, path: &str) -> &'t Table {
    table
        .relations()
        .into_iter()
        .find(|(candidate, _)| candidate == path)
        .map(|(_, table)| table)
        .unwrap()
}

#[test]
fn scalar_relation_table() {
    let table = translate(
        Catalog::new().with_type(
            order().property(Property::relation("Tags", PropertyTy::Scalar(Type::String))),
        ),
        "Order",
    );

    assert_eq!(table.column_names(), ["OrderId"]);

    let tags = relation(&table, "Tags");
    assert_eq!(tags.name, "Order_Tags");
    assert_eq!(tags.kind, TableKind::Relation);
    assert_eq!(tags.column_names(), ["Order_OrderId", "Item"]);
    assert_eq!(tags.primary_key, [0, 1]);
    assert!(tags.descriptors().iter().all(|field| !field.nullable));
}

#[test]
fn aggregate_elements_are_not_prefixed() {
    let table = translate(
        Catalog::new()
            .with_type(order().property(Property::relation(
                "Lines",
                PropertyTy::Aggregate("Line".into()),
            )))
            .with_type(line()),
        "Order",
    );

    let lines = relation(&table, "Lines");
    assert_eq!(lines.column_names(), ["Order_OrderId", "Product", "Qty"]);
    assert_eq!(lines.primary_key, [0, 1, 2]);
}

#[test]
fn element_keys_follow_owner_key() {
    let table = translate(
        Catalog::new()
            .with_type(
                order().property(
                    Property::relation("Lines", PropertyTy::Aggregate("Line".into()))
                        .annotate_at("Product", AnnotationKind::PrimaryKey),
                ),
            )
            .with_type(line()),
        "Order",
    );

    assert_eq!(relation(&table, "Lines").primary_key, [0, 1]);
}

#[test]
fn reference_elements_keep_the_item_prefix() {
    let table = translate(
        Catalog::new()
            .with_type(TypeDescriptor::entity("User").property(Property::scalar("UserId", Type::I64)))
            .with_type(order().property(Property::relation(
                "Watchers",
                PropertyTy::Reference("User".into()),
            ))),
        "Order",
    );

    let watchers = relation(&table, "Watchers");
    assert_eq!(watchers.column_names(), ["Order_OrderId", "Item_UserId"]);
    assert_eq!(watchers.column(1).unwrap().ty, Type::I64);
}

#[test]
fn relation_name_and_element_checks() {
    let table = translate(
        Catalog::new().with_type(
            order().property(
                Property::relation("Tags", PropertyTy::Scalar(Type::String))
                    .annotate(AnnotationKind::Name("Labels".into()))
                    .annotate(AnnotationKind::Check(Check::Length {
                        min: None,
                        max: Some(20),
                    })),
            ),
        ),
        "Order",
    );

    let labels = relation(&table, "Tags");
    assert_eq!(labels.name, "Order_Labels");

    let item = labels.column_named("Item").unwrap();
    assert_eq!(item.storage_ty, StorageType::VarChar(20));
    assert_eq!(item.constraints[0].name, "CK_Order_Labels_Item_1");
}

#[test]
fn relations_inside_aggregates_use_dotted_paths() {
    let table = translate(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Person")
                    .property(Property::scalar("PersonId", Type::I32))
                    .property(Property::aggregate("Contact", "Contact")),
            )
            .with_type(
                TypeDescriptor::aggregate("Contact")
                    .property(Property::relation("Phones", PropertyTy::Scalar(Type::String)))
                    .property(Property::scalar("Email", Type::String)),
            ),
        "Person",
    );

    assert_eq!(table.column_names(), ["PersonId", "Contact_Email"]);

    let phones = relation(&table, "Contact.Phones");
    assert_eq!(phones.name, "Person_Phones");
    assert_eq!(phones.column_names(), ["Person_PersonId", "Item"]);
}

#[test]
fn child_tables_share_the_table_prefix() {
    let catalog = Catalog::new().with_type(
        order().property(Property::relation("Tags", PropertyTy::Scalar(Type::String))),
    );
    let table = Builder::new()
        .table_name_prefix("app_")
        .build(catalog)
        .translate("Order")
        .unwrap();

    assert_eq!(relation(&table, "Tags").name, "app_Order_Tags");
}

#[test]
fn localization_table() {
    let table = translate(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Product")
                    .property(Property::scalar("ProductId", Type::I32))
                    .property(Property::localization("Title", "Text")),
            )
            .with_type(
                TypeDescriptor::aggregate("Text")
                    .property(Property::scalar("Caption", Type::String))
                    .property(Property::scalar("Body", Type::String).nullable()),
            ),
        "Product",
    );

    assert_eq!(table.column_names(), ["ProductId", "Title"]);
    assert_eq!(table.column(1).unwrap().storage_ty, StorageType::Uuid);
    assert!(table.relations().is_empty());

    let (path, title) = table.localizations().into_iter().next().unwrap();
    assert_eq!(path, "Title");
    assert_eq!(title.name, "Product_Title");
    assert_eq!(title.kind, TableKind::Localization);
    assert_eq!(title.column_names(), ["Key", "Locale", "Caption", "Body"]);
    assert_eq!(title.primary_key, [0, 1]);

    let nullable: Vec<_> = title.descriptors().iter().map(|field| field.nullable).collect();
    assert_eq!(nullable, [false, false, false, true]);
}

#[test]
fn nullable_localization_key() {
    let table = translate(
        Catalog::new()
            .with_type(
                TypeDescriptor::entity("Product")
                    .property(Property::scalar("ProductId", Type::I32))
                    .property(Property::localization("Title", "Text").nullable()),
            )
            .with_type(TypeDescriptor::aggregate("Text").property(Property::scalar("Caption", Type::String))),
        "Product",
    );

    assert!(table.column_named("Title").unwrap().nullable);
}
