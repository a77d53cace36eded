//! Library API tests against real stores

use std::collections::BTreeSet;

use invcat::core::catalog::*;
use invcat::core::{check_links, links_of, EntityKind, ErrorKind, Store};
use invcat::entities::{ImageUpdate, NewProduct, SupplierUpdate};
use tempfile::TempDir;

#[test]
fn test_catalog_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("catalog.db");

    let (p, s) = {
        let mut store = Store::open(&path).unwrap();
        let s = create_supplier(store.conn_mut(), "Acme", "a@acme.com", None).unwrap();
        let p = create_product(
            store.conn_mut(),
            &NewProduct::new("Widget", "desc", 10, 2.5).with_suppliers([s.clone()]),
        )
        .unwrap();
        (p, s)
    };

    let store = Store::open(&path).unwrap();
    let product = read_product(store.conn(), &p).unwrap();
    assert_eq!(product.supplier_ids, BTreeSet::from([s.clone()]));
    assert_eq!(
        read_supplier(store.conn(), &s).unwrap().product_ids,
        BTreeSet::from([p])
    );
}

#[test]
fn test_full_catalog_walkthrough() {
    let mut store = Store::open_in_memory().unwrap();

    let acme = create_supplier(store.conn_mut(), "Acme", "sales@acme.com", None).unwrap();
    let bolt = create_supplier(store.conn_mut(), "Bolt & Co", "hi@bolt.co.uk", None).unwrap();
    let tools = create_category(store.conn_mut(), "Tools", "Hand tools", None).unwrap();
    let spare = create_category(store.conn_mut(), "Spares", "", None).unwrap();

    let hammer = create_product(
        store.conn_mut(),
        &NewProduct::new("Hammer", "Claw hammer", 5, 12.0)
            .with_suppliers([acme.clone(), bolt.clone()])
            .with_categories([tools.clone()]),
    )
    .unwrap();
    let nail = create_product(store.conn_mut(), &NewProduct::new("Nail", "", 1000, 0.01)).unwrap();

    add_product_to_supplier(store.conn_mut(), &acme, &nail).unwrap();
    add_product_to_category(store.conn_mut(), &spare, &nail).unwrap();
    add_product_to_category(store.conn_mut(), &tools, &nail).unwrap();
    let photo = create_image(store.conn_mut(), &hammer, "https://cdn/hammer.png", None).unwrap();

    assert_eq!(
        read_supplier(store.conn(), &acme).unwrap().product_ids,
        BTreeSet::from([hammer.clone(), nail.clone()])
    );
    assert_eq!(
        links_of(
            store.conn(),
            EntityKind::Category,
            &tools,
            EntityKind::Product,
        )
        .unwrap(),
        BTreeSet::from([hammer.clone(), nail.clone()])
    );

    // Supplier removal cascades to both products
    delete_supplier(store.conn_mut(), &acme).unwrap();
    assert_eq!(
        read_product(store.conn(), &hammer).unwrap().supplier_ids,
        BTreeSet::from([bolt.clone()])
    );
    let nail_now = read_product(store.conn(), &nail).unwrap();
    assert!(nail_now.supplier_ids.is_empty());

    // Product removal cascades to categories, supplier and images
    delete_product(store.conn_mut(), &hammer).unwrap();
    let bolt_now = read_supplier(store.conn(), &bolt).unwrap();
    assert!(bolt_now.product_ids.is_empty());
    assert_eq!(
        read_category(store.conn(), &tools).unwrap().product_ids,
        BTreeSet::from([nail.clone()])
    );
    assert_eq!(
        read_image(store.conn(), &photo).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let stats = store.statistics().unwrap();
    assert_eq!(stats.products, 1);
    assert_eq!(stats.suppliers, 1);
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.images, 0);
    assert_eq!(stats.supplier_links, 0);
    assert_eq!(stats.category_links, 2);
    assert!(check_links(store.conn()).unwrap().is_empty());
}

#[test]
fn test_error_kinds() {
    let mut store = Store::open_in_memory().unwrap();
    let s = create_supplier(store.conn_mut(), "Acme", "a@acme.com", None).unwrap();

    let blank = SupplierUpdate::default().name("  ");
    let err = update_supplier(store.conn_mut(), &s, &blank).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = read_product(store.conn(), "f47ac10b-58cc-4372-a567-0e02b2c3d479").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("product not found"));

    let err = update_image(
        store.conn_mut(),
        "f47ac10b-58cc-4372-a567-0e02b2c3d479",
        &ImageUpdate::default().url("https://x"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = create_image(store.conn_mut(), "bad", "https://x", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_listings_are_ordered() {
    let mut store = Store::open_in_memory().unwrap();
    for name in ["pear", "Apple", "banana"] {
        create_product(store.conn_mut(), &NewProduct::new(name, "", 1, 1.0)).unwrap();
    }
    let names: Vec<String> = list_products(store.conn())
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    // SQLite's default collation is binary: uppercase sorts first
    assert_eq!(names, vec!["Apple", "banana", "pear"]);
}
