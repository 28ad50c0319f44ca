use std::sync::Barrier;
use std::thread;

use pushkind_storefront::domain::pricing::{MAX_PRICE_CENTS, discounted_price_cents};
use pushkind_storefront::forms::promotions::ApplyPromotionForm;
use pushkind_storefront::repository::{DieselRepository, ProductReader, PromotionReader};
use pushkind_storefront::services::{ServiceError, promotions};

mod common;

const HUB: i32 = 1;

fn apply_form(product_ids: &[i32], promotion_id: i32) -> ApplyPromotionForm {
    ApplyPromotionForm {
        product_ids: product_ids.to_vec(),
        promotion_id: Some(promotion_id.to_string()),
        apply: Some("1".to_string()),
    }
}

fn price_of(repo: &DieselRepository, product_id: i32) -> i64 {
    repo.get_product_by_id(product_id, HUB)
        .expect("load product")
        .expect("product exists")
        .price_cents
}

fn links_of(repo: &DieselRepository, promotion_id: i32, product_ids: &[i32]) -> Vec<i32> {
    let mut linked = repo
        .linked_product_ids(promotion_id, product_ids)
        .expect("load links");
    linked.sort_unstable();
    linked
}

#[test]
fn applying_twice_is_idempotent() {
    let test_db = common::TestDb::new("service_apply_twice_is_idempotent.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let promotion = common::promotion(&repo, HUB, "Spring sale", 1_500);
    let ids: Vec<i32> = [1_999, 4_250, 10_000]
        .iter()
        .enumerate()
        .map(|(index, price)| common::product(&repo, HUB, &format!("P{index}"), *price).id)
        .collect();

    let first = promotions::apply_promotion(&repo, &user, apply_form(&ids, promotion.id))
        .expect("first application");
    assert_eq!(first.linked_count, 3);
    assert_eq!(first.skipped_count, 0);

    let prices_after_first: Vec<i64> = ids.iter().map(|id| price_of(&repo, *id)).collect();
    assert_eq!(prices_after_first, vec![1_699, 3_612, 8_500]);

    for _ in 0..2 {
        let again = promotions::apply_promotion(&repo, &user, apply_form(&ids, promotion.id))
            .expect("repeated application");
        assert_eq!(again.linked_count, 0);
        assert_eq!(again.skipped_count, 3);

        let prices: Vec<i64> = ids.iter().map(|id| price_of(&repo, *id)).collect();
        assert_eq!(prices, prices_after_first);
    }

    assert_eq!(links_of(&repo, promotion.id, &ids), ids);
}

#[test]
fn twenty_percent_off_one_hundred_is_exactly_eighty() {
    let test_db = common::TestDb::new("service_twenty_percent_off.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let promotion = common::promotion(&repo, HUB, "Twenty off", 2_000);
    let product = common::product(&repo, HUB, "Lamp", 10_000);

    promotions::apply_promotion(&repo, &user, apply_form(&[product.id], promotion.id))
        .expect("application");

    let stored = repo
        .get_product_by_id(product.id, HUB)
        .expect("load product")
        .expect("product exists");
    assert_eq!(stored.price_cents, 8_000);
    assert_eq!(stored.unit_price().to_string(), "80.00");
}

#[test]
fn largest_price_is_discounted_exactly() {
    let test_db = common::TestDb::new("service_largest_price_discount.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let promotion = common::promotion(&repo, HUB, "Twenty off", 2_000);
    let product = common::product(&repo, HUB, "Yacht", MAX_PRICE_CENTS);

    promotions::apply_promotion(&repo, &user, apply_form(&[product.id], promotion.id))
        .expect("application");

    assert_eq!(
        Some(price_of(&repo, product.id)),
        discounted_price_cents(MAX_PRICE_CENTS, 2_000)
    );
    assert_eq!(price_of(&repo, product.id), 799_999_999_999);
}

#[test]
fn partial_overlap_skips_linked_products() {
    let test_db = common::TestDb::new("service_partial_overlap.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let promotion = common::promotion(&repo, HUB, "Spring sale", 2_000);
    let a = common::product(&repo, HUB, "A", 1_000);
    let b = common::product(&repo, HUB, "B", 2_000);
    let c = common::product(&repo, HUB, "C", 3_000);

    promotions::apply_promotion(&repo, &user, apply_form(&[b.id], promotion.id))
        .expect("link B");
    let b_price = price_of(&repo, b.id);
    assert_eq!(b_price, 1_600);

    let outcome =
        promotions::apply_promotion(&repo, &user, apply_form(&[a.id, b.id, c.id], promotion.id))
            .expect("apply to selection");

    assert_eq!(outcome.promotion_id, promotion.id);
    assert_eq!(outcome.linked_count, 2);
    assert_eq!(outcome.skipped_count, 1);
    assert_eq!(price_of(&repo, a.id), 800);
    assert_eq!(price_of(&repo, b.id), b_price);
    assert_eq!(price_of(&repo, c.id), 2_400);
    assert_eq!(
        links_of(&repo, promotion.id, &[a.id, b.id, c.id]),
        vec![a.id, b.id, c.id]
    );
}

#[test]
fn failed_link_insert_leaves_prices_untouched() {
    let test_db = common::TestDb::new("service_failed_link_insert.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let promotion = common::promotion(&repo, HUB, "Spring sale", 2_000);
    let a = common::product(&repo, HUB, "A", 1_000);
    let b = common::product(&repo, HUB, "B", 2_000);

    test_db.execute(
        "CREATE TRIGGER fail_links BEFORE INSERT ON product_promotions \
         BEGIN SELECT RAISE(ABORT, 'injected link failure'); END;",
    );

    let result = promotions::apply_promotion(&repo, &user, apply_form(&[a.id, b.id], promotion.id));

    assert!(result.is_err());
    assert_eq!(price_of(&repo, a.id), 1_000);
    assert_eq!(price_of(&repo, b.id), 2_000);
    assert!(links_of(&repo, promotion.id, &[a.id, b.id]).is_empty());
}

#[test]
fn failed_price_update_rolls_back_links() {
    let test_db = common::TestDb::new("service_failed_price_update.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let promotion = common::promotion(&repo, HUB, "Spring sale", 2_000);
    let a = common::product(&repo, HUB, "A", 1_000);
    let b = common::product(&repo, HUB, "B", 2_000);

    test_db.execute(
        "CREATE TRIGGER fail_prices BEFORE UPDATE OF price_cents ON products \
         BEGIN SELECT RAISE(ABORT, 'injected price failure'); END;",
    );

    let result = promotions::apply_promotion(&repo, &user, apply_form(&[a.id, b.id], promotion.id));

    assert!(result.is_err());
    assert_eq!(price_of(&repo, a.id), 1_000);
    assert_eq!(price_of(&repo, b.id), 2_000);
    assert!(links_of(&repo, promotion.id, &[a.id, b.id]).is_empty());

    test_db.execute("DROP TRIGGER fail_prices;");

    let retried = promotions::apply_promotion(&repo, &user, apply_form(&[a.id, b.id], promotion.id))
        .expect("retry after failure");
    assert_eq!(retried.linked_count, 2);
    assert_eq!(price_of(&repo, a.id), 800);
}

#[test]
fn unknown_promotion_is_not_found_and_changes_nothing() {
    let test_db = common::TestDb::new("service_unknown_promotion.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    let product = common::product(&repo, HUB, "Lamp", 10_000);
    let foreign = common::promotion(&repo, 2, "Other hub", 2_000);

    let missing = promotions::apply_promotion(&repo, &user, apply_form(&[product.id], 9_999));
    assert!(matches!(missing, Err(ServiceError::NotFound)));

    let other_hub =
        promotions::apply_promotion(&repo, &user, apply_form(&[product.id], foreign.id));
    assert!(matches!(other_hub, Err(ServiceError::NotFound)));

    let stored = repo
        .get_product_by_id(product.id, HUB)
        .expect("load product")
        .expect("product exists");
    assert_eq!(stored.price_cents, 10_000);
    assert!(stored.promotion_ids.is_empty());
}

#[test]
fn empty_selection_is_rejected_before_lookup() {
    let test_db = common::TestDb::new("service_empty_selection.db");
    let repo = test_db.repo();
    let user = common::admin(HUB);

    // The promotion does not exist either; validation must win.
    let result = promotions::apply_promotion(&repo, &user, apply_form(&[], 9_999));
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let promotion = common::promotion(&repo, HUB, "Spring sale", 2_000);
    let result = promotions::apply_promotion(&repo, &user, apply_form(&[0, -3], promotion.id));
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let stored = repo
        .get_promotion_by_id(promotion.id, HUB)
        .expect("load promotion")
        .expect("promotion exists");
    assert_eq!(stored.product_count, 0);
}

#[test]
fn concurrent_applications_discount_once() {
    let test_db = common::TestDb::new("service_concurrent_applications.db");
    let repo = test_db.repo();

    let promotion = common::promotion(&repo, HUB, "Flash sale", 2_000);
    let product = common::product(&repo, HUB, "Lamp", 10_000);

    let callers = 4;
    let barrier = Barrier::new(callers);

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..callers)
            .map(|_| {
                let repo = repo.clone();
                let user = common::admin(HUB);
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    promotions::apply_promotion(
                        &repo,
                        &user,
                        apply_form(&[product.id], promotion.id),
                    )
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("caller panicked"))
            .collect()
    });

    let mut succeeded = 0;
    let mut linked = 0;
    for outcome in &outcomes {
        match outcome {
            Ok(application) => {
                assert_eq!(application.promotion_id, promotion.id);
                assert_eq!(application.linked_count + application.skipped_count, 1);
                assert_eq!(application.missing_count, 0);
                succeeded += 1;
                linked += application.linked_count;
            }
            // A caller that times out on the write lock reports a storage error.
            Err(err) => assert!(
                !matches!(
                    err,
                    ServiceError::Unauthorized | ServiceError::Form(_) | ServiceError::NotFound
                ),
                "unexpected error: {err}"
            ),
        }
    }
    assert!(succeeded >= 1);
    assert_eq!(linked, 1);

    assert_eq!(links_of(&repo, promotion.id, &[product.id]), vec![product.id]);
    assert_eq!(price_of(&repo, product.id), 8_000);
}
