use pushkind_common::repository::errors::RepositoryError;
use pushkind_storefront::domain::collection::{CollectionListQuery, NewCollection};
use pushkind_storefront::domain::product::{InventoryFilter, NewProduct, ProductListQuery};
use pushkind_storefront::domain::promotion::PromotionListQuery;
use pushkind_storefront::repository::{
    CollectionReader, CollectionWriter, ProductReader, ProductWriter, PromotionReader,
    PromotionWriter,
};

mod common;

#[test]
fn test_product_repository_filters() {
    let test_db = common::TestDb::new("test_product_repository_filters.db");
    let repo = test_db.repo();

    let teas = repo
        .create_collection(&NewCollection::new(1, "Teas"))
        .unwrap();

    let green = repo
        .create_product(
            &NewProduct::new(1, "Green tea", 1_250, "USD")
                .with_inventory(3)
                .with_collection_id(teas.id),
        )
        .unwrap();
    repo.create_product(&NewProduct::new(1, "Black tea", 990, "USD").with_inventory(150))
        .unwrap();
    repo.create_product(&NewProduct::new(1, "Mug", 700, "USD").with_inventory(40))
        .unwrap();
    repo.create_product(&NewProduct::new(2, "Foreign tea", 100, "USD"))
        .unwrap();

    let (total, items) = repo.list_products(ProductListQuery::new(1)).unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.len(), 3);

    let (total, items) = repo
        .list_products(ProductListQuery::new(1).search("tea"))
        .unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|product| product.hub_id == 1));

    let (_, low) = repo
        .list_products(ProductListQuery::new(1).inventory(InventoryFilter::Low))
        .unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, green.id);

    let (_, high) = repo
        .list_products(ProductListQuery::new(1).inventory(InventoryFilter::High))
        .unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].name, "Black tea");

    let (_, in_collection) = repo
        .list_products(ProductListQuery::new(1).collection(teas.id))
        .unwrap();
    assert_eq!(in_collection.len(), 1);
    assert_eq!(in_collection[0].id, green.id);

    let (total, page) = repo
        .list_products(ProductListQuery::new(1).paginate(2, 2))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);

    let (_, by_ids) = repo
        .list_products(ProductListQuery::new(1).ids(vec![green.id, 9_999]))
        .unwrap();
    assert_eq!(by_ids.len(), 1);

    assert!(repo.get_product_by_id(green.id, 2).unwrap().is_none());
    let fetched = repo.get_product_by_id(green.id, 1).unwrap().unwrap();
    assert_eq!(fetched.price_cents, 1_250);
    assert_eq!(fetched.collection_id, Some(teas.id));
    assert!(fetched.promotion_ids.is_empty());
}

#[test]
fn test_clear_inventory_is_hub_scoped() {
    let test_db = common::TestDb::new("test_clear_inventory_is_hub_scoped.db");
    let repo = test_db.repo();

    let a = repo
        .create_product(&NewProduct::new(1, "A", 100, "USD").with_inventory(5))
        .unwrap();
    let b = repo
        .create_product(&NewProduct::new(1, "B", 100, "USD").with_inventory(7))
        .unwrap();
    let foreign = repo
        .create_product(&NewProduct::new(2, "C", 100, "USD").with_inventory(9))
        .unwrap();

    let cleared = repo.clear_inventory(1, &[a.id, b.id, foreign.id]).unwrap();
    assert_eq!(cleared, 2);

    assert_eq!(repo.get_product_by_id(a.id, 1).unwrap().unwrap().inventory, 0);
    assert_eq!(repo.get_product_by_id(b.id, 1).unwrap().unwrap().inventory, 0);
    assert_eq!(
        repo.get_product_by_id(foreign.id, 2)
            .unwrap()
            .unwrap()
            .inventory,
        9
    );
    assert_eq!(repo.clear_inventory(1, &[]).unwrap(), 0);
}

#[test]
fn test_update_product_price_is_hub_scoped() {
    let test_db = common::TestDb::new("test_update_product_price_is_hub_scoped.db");
    let repo = test_db.repo();

    let product = common::product(&repo, 1, "Kettle", 4_500);
    let promotion = common::promotion(&repo, 1, "Autumn", 1_000);
    repo.apply_promotion_to_products(&promotion, &[product.id])
        .unwrap();

    let updated = repo.update_product_price(product.id, 1, 5_000).unwrap();
    assert_eq!(updated.price_cents, 5_000);
    assert_eq!(updated.promotion_ids, vec![promotion.id]);

    let err = repo
        .update_product_price(product.id, 2, 1)
        .expect_err("expected hub-scoped update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    assert!(repo.update_product_price(product.id, 1, 1_000_000_000_000).is_err());
    assert_eq!(
        repo.get_product_by_id(product.id, 1)
            .unwrap()
            .unwrap()
            .price_cents,
        5_000
    );
}

#[test]
fn test_promotion_repository_crud() {
    let test_db = common::TestDb::new("test_promotion_repository_crud.db");
    let repo = test_db.repo();

    let spring = common::promotion(&repo, 1, "Spring sale", 2_000);
    let winter = common::promotion(&repo, 1, "Winter sale", 500);
    common::promotion(&repo, 2, "Other hub", 100);

    let (total, items) = repo.list_promotions(PromotionListQuery::new(1)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].description, "Spring sale");

    let (total, _) = repo
        .list_promotions(PromotionListQuery::new(1).search("Winter"))
        .unwrap();
    assert_eq!(total, 1);

    let product = common::product(&repo, 1, "Kettle", 10_000);
    repo.apply_promotion_to_products(&spring, &[product.id])
        .unwrap();

    let fetched = repo.get_promotion_by_id(spring.id, 1).unwrap().unwrap();
    assert_eq!(fetched.discount_bps, 2_000);
    assert_eq!(fetched.product_count, 1);
    assert!(repo.get_promotion_by_id(spring.id, 2).unwrap().is_none());

    assert_eq!(
        repo.linked_product_ids(spring.id, &[product.id, 9_999])
            .unwrap(),
        vec![product.id]
    );
    assert!(
        repo.linked_product_ids(winter.id, &[product.id])
            .unwrap()
            .is_empty()
    );

    let err = repo
        .delete_promotion(spring.id, 2)
        .expect_err("expected hub-scoped delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    repo.delete_promotion(spring.id, 1).unwrap();
    assert!(repo.get_promotion_by_id(spring.id, 1).unwrap().is_none());

    let kept = repo.get_product_by_id(product.id, 1).unwrap().unwrap();
    assert!(kept.promotion_ids.is_empty());
    assert_eq!(kept.price_cents, 8_000);
}

#[test]
fn test_apply_promotion_ignores_unknown_and_foreign_products() {
    let test_db = common::TestDb::new("test_apply_promotion_ignores_unknown.db");
    let repo = test_db.repo();

    let promotion = common::promotion(&repo, 1, "Spring sale", 2_000);
    let own = common::product(&repo, 1, "Own", 1_000);
    let foreign = common::product(&repo, 2, "Foreign", 1_000);

    let outcome = repo
        .apply_promotion_to_products(&promotion, &[own.id, foreign.id, 9_999, own.id])
        .unwrap();

    assert_eq!(outcome.promotion_id, promotion.id);
    assert_eq!(outcome.linked_count, 1);
    assert_eq!(outcome.skipped_count, 0);
    assert_eq!(outcome.missing_count, 2);

    let foreign_after = repo.get_product_by_id(foreign.id, 2).unwrap().unwrap();
    assert_eq!(foreign_after.price_cents, 1_000);
    assert!(foreign_after.promotion_ids.is_empty());

    let own_after = repo.get_product_by_id(own.id, 1).unwrap().unwrap();
    assert_eq!(own_after.price_cents, 800);
    assert_eq!(own_after.promotion_ids, vec![promotion.id]);
}

#[test]
fn test_collection_repository_counts_products() {
    let test_db = common::TestDb::new("test_collection_repository_counts.db");
    let repo = test_db.repo();

    let teas = repo
        .create_collection(&NewCollection::new(1, "Teas"))
        .unwrap();
    let mugs = repo
        .create_collection(&NewCollection::new(1, "Mugs"))
        .unwrap();
    repo.create_collection(&NewCollection::new(2, "Teas"))
        .unwrap();

    for name in ["Green", "Black"] {
        repo.create_product(&NewProduct::new(1, name, 100, "USD").with_collection_id(teas.id))
            .unwrap();
    }

    let duplicate = repo.create_collection(&NewCollection::new(1, "Teas"));
    assert!(duplicate.is_err());

    let collections = repo.list_collections(CollectionListQuery::new(1)).unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0].id, mugs.id);
    assert_eq!(collections[0].product_count, 0);
    assert_eq!(collections[1].id, teas.id);
    assert_eq!(collections[1].product_count, 2);

    let found = repo
        .list_collections(CollectionListQuery::new(1).search("Te"))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, teas.id);
    assert_eq!(found[0].product_count, 2);

    assert!(
        repo.list_collections(CollectionListQuery::new(1).search("Plates"))
            .unwrap()
            .is_empty()
    );
}
