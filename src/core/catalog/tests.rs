//! Unit tests for the catalog operations

use std::collections::BTreeSet;

use super::*;
use crate::core::error::ErrorKind;
use crate::core::identity::new_id;
use crate::core::links::{link_exists, links_of};
use crate::core::store::Store;
use crate::entities::{
    Category, CategoryUpdate, ImageUpdate, NewProduct, Product, ProductUpdate, Supplier,
    SupplierUpdate,
};

fn store() -> Store {
    Store::open_in_memory().unwrap()
}

fn new_product(store: &mut Store, name: &str) -> String {
    let input = NewProduct::new(name, "desc", 10, 2.5);
    create_product(store.conn_mut(), &input).unwrap()
}

fn widget(store: &mut Store) -> String {
    new_product(store, "Widget")
}

fn acme(store: &mut Store) -> String {
    create_supplier(store.conn_mut(), "Acme", "a@acme.com", None).unwrap()
}

fn product(store: &Store, id: &str) -> Product {
    read_product(store.conn(), id).unwrap()
}

fn supplier(store: &Store, id: &str) -> Supplier {
    read_supplier(store.conn(), id).unwrap()
}

fn category(store: &Store, id: &str) -> Category {
    read_category(store.conn(), id).unwrap()
}

/// Every row of every catalog table, in a stable order
fn dump(store: &Store) -> Vec<String> {
    let queries = [
        "SELECT 'p', id, name, description, quantity, price FROM products ORDER BY id",
        "SELECT 's', id, name, contact_email, '', '' FROM suppliers ORDER BY id",
        "SELECT 'c', id, name, description, '', '' FROM categories ORDER BY id",
        "SELECT 'i', id, product_id, url, '', '' FROM images ORDER BY id",
        "SELECT 'ps', product_id, supplier_id, '', '', '' FROM product_suppliers ORDER BY 2, 3",
        "SELECT 'pc', product_id, category_id, '', '', '' FROM product_categories ORDER BY 2, 3",
    ];

    let mut out = Vec::new();
    for sql in queries {
        let mut stmt = store.conn().prepare(sql).unwrap();
        let rows = stmt
            .query_map([], |row| {
                let mut cols = Vec::new();
                for i in 0..6 {
                    let v: rusqlite::types::Value = row.get(i)?;
                    cols.push(format!("{:?}", v));
                }
                Ok(cols.join("|"))
            })
            .unwrap();
        out.extend(rows.map(|r| r.unwrap()));
    }
    out
}

#[test]
fn test_create_and_read_supplier() {
    let mut store = store();
    let id = acme(&mut store);

    let supplier = read_supplier(store.conn(), &id).unwrap();
    assert_eq!(supplier.name, "Acme");
    assert_eq!(supplier.contact, "a@acme.com");
    assert!(supplier.product_ids.is_empty());
}

#[test]
fn test_create_supplier_with_given_id() {
    let mut store = store();
    let given = "F47AC10B-58CC-4372-A567-0E02B2C3D479";
    let id = create_supplier(store.conn_mut(), "Acme", "a@acme.com", Some(given)).unwrap();
    assert_eq!(id, given.to_lowercase());

    // Lookups are case-insensitive
    assert_eq!(supplier(&store, given).id, id);

    let taken = Some(id.as_str());
    let err = create_supplier(store.conn_mut(), "Other", "o@other.com", taken).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(list_suppliers(store.conn()).unwrap().len(), 1);
}

#[test]
fn test_create_supplier_validation() {
    let mut store = store();
    for (name, contact) in [("", "a@acme.com"), ("Acme", "nope")] {
        let err = create_supplier(store.conn_mut(), name, contact, None).unwrap_err();
        assert!(err.is_validation());
    }
    let err = create_supplier(store.conn_mut(), "Acme", "a@acme.com", Some("xyz")).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.statistics().unwrap().suppliers, 0);
}

#[test]
fn test_read_missing_vs_malformed() {
    let store = store();
    assert_eq!(
        read_supplier(store.conn(), &new_id()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    let err = read_supplier(store.conn(), "not-a-uuid").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_link_symmetry() {
    let mut store = store();
    let p = widget(&mut store);
    let s = acme(&mut store);

    add_product_to_supplier(store.conn_mut(), &s, &p).unwrap();
    assert!(links_of(store.conn(), EntityKind::Supplier, &s, EntityKind::Product)
        .unwrap()
        .contains(&p));
    assert!(links_of(store.conn(), EntityKind::Product, &p, EntityKind::Supplier)
        .unwrap()
        .contains(&s));
    assert!(product(&store, &p).supplier_ids.contains(&s));

    remove_product_from_supplier(store.conn_mut(), &s, &p).unwrap();
    let linked = link_exists(
        store.conn(),
        EntityKind::Supplier,
        &s,
        EntityKind::Product,
        &p,
    );
    assert!(!linked.unwrap());
    assert!(product(&store, &p).supplier_ids.is_empty());
    assert!(supplier(&store, &s).product_ids.is_empty());
}

#[test]
fn test_link_idempotence() {
    let mut store = store();
    let p = widget(&mut store);
    let s = acme(&mut store);

    add_product_to_supplier(store.conn_mut(), &s, &p).unwrap();
    let once = supplier(&store, &s);
    add_product_to_supplier(store.conn_mut(), &s, &p).unwrap();
    let twice = supplier(&store, &s);
    assert_eq!(once, twice);

    remove_product_from_supplier(store.conn_mut(), &s, &p).unwrap();
    let before = dump(&store);
    remove_product_from_supplier(store.conn_mut(), &s, &p).unwrap();
    assert_eq!(before, dump(&store));
}

#[test]
fn test_malformed_id_rejection() {
    let mut store = store();
    let err = add_product_to_supplier(store.conn_mut(), "not-a-uuid", "also-not").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = add_product_to_supplier(store.conn_mut(), &new_id(), &new_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_supplier_cascade() {
    let mut store = store();
    let p1 = widget(&mut store);
    let p2 = new_product(&mut store, "Gadget");
    let s = acme(&mut store);
    let other = create_supplier(store.conn_mut(), "Other", "o@other.com", None).unwrap();

    for p in [&p1, &p2] {
        add_product_to_supplier(store.conn_mut(), &s, p).unwrap();
        add_product_to_supplier(store.conn_mut(), &other, p).unwrap();
    }

    delete_supplier(store.conn_mut(), &s).unwrap();

    for p in [&p1, &p2] {
        let suppliers = product(&store, p).supplier_ids;
        assert!(!suppliers.contains(&s));
        assert!(suppliers.contains(&other));
    }
    assert!(read_supplier(store.conn(), &s).unwrap_err().is_not_found());
    let err = delete_supplier(store.conn_mut(), &s).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_update_supplier_is_all_or_nothing() {
    let mut store = store();
    let s = acme(&mut store);

    let update = SupplierUpdate::default().name("ok").contact("not-an-email");
    let err = update_supplier(store.conn_mut(), &s, &update).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(supplier(&store, &s).name, "Acme");

    let update = SupplierUpdate::default().contact("sales@acme.com");
    update_supplier(store.conn_mut(), &s, &update).unwrap();
    let updated = supplier(&store, &s);
    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.contact, "sales@acme.com");

    let update = SupplierUpdate::default().name("x");
    let err = update_supplier(store.conn_mut(), &new_id(), &update).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_end_to_end_scenario() {
    let mut store = store();
    let s1 = create_supplier(store.conn_mut(), "Acme", "a@acme.com", None).unwrap();
    let p1 = widget(&mut store);

    add_product_to_supplier(store.conn_mut(), &s1, &p1).unwrap();
    let products = supplier(&store, &s1).product_ids;
    assert_eq!(products, BTreeSet::from([p1.clone()]));

    delete_product(store.conn_mut(), &p1).unwrap();
    assert!(supplier(&store, &s1).product_ids.is_empty());
}

#[test]
fn test_delete_product_cascade() {
    let mut store = store();
    let p = widget(&mut store);
    let keep = new_product(&mut store, "Keep");
    let s = acme(&mut store);
    let c = create_category(store.conn_mut(), "Tools", "", None).unwrap();

    add_product_to_supplier(store.conn_mut(), &s, &p).unwrap();
    add_product_to_category(store.conn_mut(), &c, &p).unwrap();
    add_product_to_category(store.conn_mut(), &c, &keep).unwrap();
    let img = create_image(store.conn_mut(), &p, "https://cdn/x.png", None).unwrap();
    let kept_img = create_image(store.conn_mut(), &keep, "https://cdn/k.png", None).unwrap();

    delete_product(store.conn_mut(), &p).unwrap();

    assert!(read_product(store.conn(), &p).unwrap_err().is_not_found());
    assert!(read_image(store.conn(), &img).unwrap_err().is_not_found());
    assert!(read_image(store.conn(), &kept_img).is_ok());
    assert!(supplier(&store, &s).product_ids.is_empty());
    assert_eq!(category(&store, &c).product_ids, BTreeSet::from([keep]));
}

#[test]
fn test_delete_product_clears_category_that_becomes_empty() {
    let mut store = store();
    let p = widget(&mut store);
    let c = create_category(store.conn_mut(), "Tools", "", None).unwrap();
    add_product_to_category(store.conn_mut(), &c, &p).unwrap();

    delete_product(store.conn_mut(), &p).unwrap();

    assert!(category(&store, &c).product_ids.is_empty());
    assert_eq!(store.statistics().unwrap().category_links, 0);
}

#[test]
fn test_delete_product_rolls_back_on_failure() {
    let mut store = store();
    let p = widget(&mut store);
    let s1 = create_supplier(
        store.conn_mut(),
        "First",
        "first@example.com",
        Some("00000000-0000-4000-8000-000000000001"),
    )
    .unwrap();
    let s2 = create_supplier(
        store.conn_mut(),
        "Second",
        "second@example.com",
        Some("00000000-0000-4000-8000-000000000002"),
    )
    .unwrap();
    let c = create_category(store.conn_mut(), "Tools", "", None).unwrap();
    add_product_to_supplier(store.conn_mut(), &s1, &p).unwrap();
    add_product_to_supplier(store.conn_mut(), &s2, &p).unwrap();
    add_product_to_category(store.conn_mut(), &c, &p).unwrap();
    create_image(store.conn_mut(), &p, "https://cdn/x.png", None).unwrap();

    // Fail after the first supplier link has been removed
    store
        .conn()
        .execute_batch(&format!(
            "CREATE TRIGGER fail_second_unlink BEFORE DELETE ON product_suppliers
             WHEN OLD.supplier_id = '{}'
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
            s2
        ))
        .unwrap();

    let before = dump(&store);
    let err = delete_product(store.conn_mut(), &p).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(before, dump(&store));

    let intact = product(&store, &p);
    assert_eq!(intact.supplier_ids, BTreeSet::from([s1, s2]));
    assert_eq!(intact.category_ids, BTreeSet::from([c]));
    assert_eq!(intact.image_ids.len(), 1);
}

#[test]
fn test_create_product_with_links() {
    let mut store = store();
    let s = acme(&mut store);
    let c = create_category(store.conn_mut(), "Tools", "", None).unwrap();

    let p = create_product(
        store.conn_mut(),
        &NewProduct::new("Widget", "desc", 10, 2.5)
            .with_suppliers([s.clone()])
            .with_categories([c.clone()]),
    )
    .unwrap();

    let created = product(&store, &p);
    assert_eq!(created.supplier_ids, BTreeSet::from([s.clone()]));
    assert_eq!(created.category_ids, BTreeSet::from([c.clone()]));
    assert!(supplier(&store, &s).product_ids.contains(&p));
    assert!(category(&store, &c).product_ids.contains(&p));
}

#[test]
fn test_create_product_with_missing_supplier_writes_nothing() {
    let mut store = store();
    let c = create_category(store.conn_mut(), "Tools", "", None).unwrap();

    let err = create_product(
        store.conn_mut(),
        &NewProduct::new("Widget", "desc", 10, 2.5)
            .with_categories([c])
            .with_suppliers([new_id()]),
    )
    .unwrap_err();
    assert!(err.is_not_found());

    let stats = store.statistics().unwrap();
    assert_eq!(stats.products, 0);
    assert_eq!(stats.category_links, 0);
}

#[test]
fn test_update_product() {
    let mut store = store();
    let p = widget(&mut store);

    update_product(
        store.conn_mut(),
        &p,
        &ProductUpdate::default().quantity(0).price(3.75),
    )
    .unwrap();
    let updated = product(&store, &p);
    assert_eq!(updated.quantity, 0);
    assert_eq!(updated.price, 3.75);
    assert_eq!(updated.name, "Widget");

    let err = update_product(
        store.conn_mut(),
        &p,
        &ProductUpdate::default().name("Renamed").quantity(-5),
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(product(&store, &p).name, "Widget");
}

#[test]
fn test_snapshots_are_detached() {
    let mut store = store();
    let s = acme(&mut store);
    let p = widget(&mut store);

    let mut snapshot = supplier(&store, &s);
    snapshot.name = "Changed".to_string();
    snapshot.product_ids.insert(p.clone());

    let fresh = supplier(&store, &s);
    assert_eq!(fresh.name, "Acme");
    assert!(fresh.product_ids.is_empty());
}

#[test]
fn test_category_lifecycle() {
    let mut store = store();
    let p = widget(&mut store);
    let c = create_category(store.conn_mut(), "Tools", "Hand tools", None).unwrap();

    add_product_to_category(store.conn_mut(), &c, &p).unwrap();
    add_product_to_category(store.conn_mut(), &c, &p).unwrap();
    assert_eq!(product(&store, &p).category_ids.len(), 1);

    let rename = CategoryUpdate::default().name("Power tools");
    update_category(store.conn_mut(), &c, &rename).unwrap();
    assert_eq!(category(&store, &c).name, "Power tools");

    delete_category(store.conn_mut(), &c).unwrap();
    assert!(product(&store, &p).category_ids.is_empty());
    assert!(read_category(store.conn(), &c).unwrap_err().is_not_found());
}

#[test]
fn test_remove_product_from_category() {
    let mut store = store();
    let p = widget(&mut store);
    let c = create_category(store.conn_mut(), "Tools", "", None).unwrap();
    add_product_to_category(store.conn_mut(), &c, &p).unwrap();

    remove_product_from_category(store.conn_mut(), &c, &p).unwrap();
    remove_product_from_category(store.conn_mut(), &c, &p).unwrap();
    assert!(category(&store, &c).product_ids.is_empty());
}

#[test]
fn test_image_lifecycle() {
    let mut store = store();
    let p1 = widget(&mut store);
    let p2 = new_product(&mut store, "Gadget");

    let err = create_image(store.conn_mut(), &new_id(), "https://cdn/x.png", None);
    assert!(err.unwrap_err().is_not_found());

    let img = create_image(store.conn_mut(), &p1, "https://cdn/x.png", None).unwrap();
    let images = product(&store, &p1).image_ids;
    assert_eq!(images, BTreeSet::from([img.clone()]));

    let moved = ImageUpdate::default()
        .product_id(p2.clone())
        .url("https://cdn/y.png");
    update_image(store.conn_mut(), &img, &moved).unwrap();
    let image = read_image(store.conn(), &img).unwrap();
    assert_eq!(image.product_id, p2);
    assert_eq!(image.url, "https://cdn/y.png");
    assert!(product(&store, &p1).image_ids.is_empty());
    assert_eq!(images_of_product(store.conn(), &p2).unwrap().len(), 1);

    // Moving to a missing product changes nothing
    let orphaned = ImageUpdate::default()
        .product_id(new_id())
        .url("https://cdn/z.png");
    let err = update_image(store.conn_mut(), &img, &orphaned).unwrap_err();
    assert!(err.is_not_found());
    let unchanged = read_image(store.conn(), &img).unwrap();
    assert_eq!(unchanged.url, "https://cdn/y.png");

    delete_image(store.conn_mut(), &img).unwrap();
    assert!(list_images(store.conn()).unwrap().is_empty());
}

#[test]
fn test_listings_are_sorted_by_name() {
    let mut store = store();
    for name in ["Zeta", "Alpha", "Mid"] {
        create_supplier(store.conn_mut(), name, "x@example.com", None).unwrap();
    }
    let names: Vec<_> = list_suppliers(store.conn())
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
}
