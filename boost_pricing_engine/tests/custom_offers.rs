//! Integration tests for the custom offer flow: submission, visibility, claims, payment conversion and the
//! catalog backfill that completed off-catalog titles leave behind.
use boost_pricing_engine::{
    db_types::{CompensationMode, LoyaltyTier, NewContractor, NewCustomOfferRequest, OrderStatus, PaymentStatus, RequestStatus, ServiceType},
    events::EventProducers,
    order_objects::{ClaimOutcome, ClaimRejection, OfferPaymentOutcome, StatusActor, StatusChangeOutcome},
    pricing::PricingConfig,
    ContractorManagement,
    MarketplaceDatabase,
    MarketplaceError,
    OrderFlowApi,
    OrderManagement,
    PriceBookManagement,
    SqliteDatabase,
};
use bpe_common::Money;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::support::{
    prepare_env::{prepare_test_env, random_db_path},
    seed::{approved_contractor, new_customer, seed_catalog, specialist_contractor, GAME},
};

mod support;

async fn setup() -> OrderFlowApi<SqliteDatabase> {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    OrderFlowApi::new(db, PricingConfig::default(), EventProducers::default())
}

async fn tear_down(api: OrderFlowApi<SqliteDatabase>) {
    api.db().close().await;
    Sqlite::drop_database(api.db().url()).await.unwrap();
}

#[tokio::test]
async fn custom_offer_lifecycle_converts_on_payment() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let customer = new_customer(api.db(), "13900000001").await;
    let worker = approved_contractor(api.db(), "offer_taker", CompensationMode::Percentage { rate: 80.0 }).await;

    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(30));
    let request = api.submit_custom_offer(request).await.unwrap();
    assert!(request.request_no.starts_with("REQ"));
    assert_eq!(request.status, RequestStatus::Open);
    assert!(!request.uncataloged);

    let open = api.open_offers_for_contractor(worker.id).await.unwrap();
    assert_eq!(open.len(), 1);

    let claimed = api
        .claim_custom_offer(request.id, worker.id)
        .await
        .unwrap()
        .claimed()
        .expect("Expected the claim to land");
    assert_eq!(claimed.status, RequestStatus::Claimed);
    assert_eq!(claimed.contractor_id, Some(worker.id));
    // A claimed request leaves the open pool.
    assert!(api.open_offers_for_contractor(worker.id).await.unwrap().is_empty());

    let outcome = api.confirm_offer_payment(request.id).await.unwrap();
    let OfferPaymentOutcome::Converted { order, reward } = outcome else {
        panic!("Expected the offer to convert");
    };
    assert_eq!(reward, Money::from_yuan(24));
    assert!(order.is_custom_offer);
    assert_eq!(order.status, OrderStatus::InProgress);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.paid_at.is_some());
    assert_eq!(order.customer_id, Some(customer.id));
    assert_eq!(order.contractor_id, Some(worker.id));
    assert_eq!(order.customer_price, Money::from_yuan(30));
    assert_eq!(order.contractor_reward, Money::from_yuan(24));

    // The request is now paid and linked to the order it became.
    let stored = api.db().fetch_custom_offer(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Paid);
    assert_eq!(stored.order_id, Some(order.id));
    let linked = api.db().fetch_custom_offer_by_order(order.id).await.unwrap().unwrap();
    assert_eq!(linked.id, request.id);

    // Paying a paid request writes nothing.
    let outcome = api.confirm_offer_payment(request.id).await.unwrap();
    assert!(matches!(outcome, OfferPaymentOutcome::NotClaimed));
    tear_down(api).await;
}

#[tokio::test]
async fn fixed_mode_claimants_convert_at_their_quote_or_zero() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let customer = new_customer(api.db(), "13900000002").await;
    let quoted = approved_contractor(api.db(), "quoted_taker", CompensationMode::Fixed).await;

    // No quote on file: the offer still converts, at a zero reward for an admin to fix up.
    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(30));
    let request = api.submit_custom_offer(request).await.unwrap();
    api.claim_custom_offer(request.id, quoted.id).await.unwrap().claimed().expect("Expected the claim to land");
    let order = api
        .confirm_offer_payment(request.id)
        .await
        .unwrap()
        .converted()
        .expect("Expected the offer to convert");
    assert_eq!(order.contractor_reward, Money::zero());

    // With a quote on file, the quote is the reward, whatever the customer offered.
    api.db()
        .upsert_quote(quoted.id, GAME, "Weekly boss runs", ServiceType::Boosting, Money::from_yuan(22))
        .await
        .unwrap();
    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(30));
    let request = api.submit_custom_offer(request).await.unwrap();
    api.claim_custom_offer(request.id, quoted.id).await.unwrap().claimed().expect("Expected the claim to land");
    let order = api
        .confirm_offer_payment(request.id)
        .await
        .unwrap()
        .converted()
        .expect("Expected the offer to convert");
    assert_eq!(order.contractor_reward, Money::from_yuan(22));
    tear_down(api).await;
}

#[tokio::test]
async fn only_approved_contractors_may_claim_offers() {
    let api = setup().await;
    let customer = new_customer(api.db(), "13900000003").await;
    let worker = approved_contractor(api.db(), "first_claimer", CompensationMode::Percentage { rate: 80.0 }).await;
    let rival = approved_contractor(api.db(), "second_claimer", CompensationMode::Percentage { rate: 80.0 }).await;
    let idler = api.db().insert_contractor(NewContractor::new("waiting_room")).await.unwrap();

    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(30));
    let request = api.submit_custom_offer(request).await.unwrap();

    let refused = api.claim_custom_offer(request.id, idler.id).await.unwrap();
    assert!(matches!(refused, ClaimOutcome::Rejected(ClaimRejection::NotApproved)));

    api.claim_custom_offer(request.id, worker.id).await.unwrap().claimed().expect("Expected the claim to land");
    // The race loser gets a rejection, not an error.
    let refused = api.claim_custom_offer(request.id, rival.id).await.unwrap();
    assert!(matches!(refused, ClaimOutcome::Rejected(ClaimRejection::NotAvailable)));
    tear_down(api).await;
}

#[tokio::test]
async fn uncataloged_offers_are_only_visible_to_specialists() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let customer = new_customer(api.db(), "13900000004").await;
    let generalist = approved_contractor(api.db(), "genshin_main", CompensationMode::Percentage { rate: 80.0 }).await;
    let specialist = specialist_contractor(
        api.db(),
        "azur_ace",
        CompensationMode::Percentage { rate: 80.0 },
        "Azur Lane, Blue Archive",
    )
    .await;

    let cataloged = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(30));
    api.submit_custom_offer(cataloged).await.unwrap();
    let uncataloged =
        NewCustomOfferRequest::new(customer.id, "Azur Lane", "Operation Siren full clear", Money::from_yuan(50))
            .uncataloged();
    api.submit_custom_offer(uncataloged).await.unwrap();

    // Everyone sees the cataloged request; only the specialist sees the off-catalog title.
    let open = api.open_offers_for_contractor(generalist.id).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].game, GAME);
    let open = api.open_offers_for_contractor(specialist.id).await.unwrap();
    assert_eq!(open.len(), 2);
    tear_down(api).await;
}

#[tokio::test]
async fn completed_uncataloged_offers_backfill_the_catalog() {
    let api = setup().await;
    let customer = new_customer(api.db(), "13900000005").await;
    let specialist = specialist_contractor(
        api.db(),
        "azur_ace",
        CompensationMode::Percentage { rate: 80.0 },
        "Azur Lane",
    )
    .await;

    let request =
        NewCustomOfferRequest::new(customer.id, "Azur Lane", "Operation Siren full clear", Money::from_yuan(100))
            .uncataloged()
            .with_notes("weekend evenings only");
    let request = api.submit_custom_offer(request).await.unwrap();
    api.claim_custom_offer(request.id, specialist.id).await.unwrap().claimed().expect("Expected the claim to land");

    // Off-catalog titles pay the offered price less the flat commission, whatever the contractor's mode.
    let outcome = api.confirm_offer_payment(request.id).await.unwrap();
    let OfferPaymentOutcome::Converted { order, reward } = outcome else {
        panic!("Expected the offer to convert");
    };
    assert_eq!(reward, Money::from_yuan(80));
    assert_eq!(order.notes.as_deref(), Some("weekend evenings only"));

    // The catalog knows nothing of the title until the work is done.
    assert!(api.db().fetch_price_entry("Azur Lane", "Operation Siren full clear").await.unwrap().is_none());

    let outcome = api.update_status(order.id, OrderStatus::Completed, StatusActor::Admin).await.unwrap();
    assert!(outcome.changed().is_some());
    let entry = api
        .db()
        .fetch_price_entry("Azur Lane", "Operation Siren full clear")
        .await
        .unwrap()
        .expect("Expected the completion to backfill the catalog");
    // Offered price plus the 20% markup.
    assert_eq!(entry.price, Money::from_yuan(120));
    assert_eq!(entry.service_type, ServiceType::Boosting);

    let customer = api.loyalty_status(customer.id).await.unwrap();
    assert_eq!(customer.total_spent, Money::from_yuan(100));
    assert_eq!(customer.tier, LoyaltyTier::Bronze);

    // Completing again neither settles nor writes a second catalog row.
    let outcome = api.update_status(order.id, OrderStatus::Completed, StatusActor::Admin).await.unwrap();
    assert!(matches!(outcome, StatusChangeOutcome::Unchanged));
    assert_eq!(api.db().entries_for_game("Azur Lane").await.unwrap().len(), 1);
    assert_eq!(api.loyalty_status(customer.id).await.unwrap().total_spent, Money::from_yuan(100));
    tear_down(api).await;
}

#[tokio::test]
async fn offer_payment_requires_a_claim() {
    let api = setup().await;
    let customer = new_customer(api.db(), "13900000006").await;
    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(30));
    let request = api.submit_custom_offer(request).await.unwrap();

    let outcome = api.confirm_offer_payment(request.id).await.unwrap();
    assert!(matches!(outcome, OfferPaymentOutcome::NotClaimed));
    let stored = api.db().fetch_custom_offer(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Open);
    assert!(stored.order_id.is_none());
    tear_down(api).await;
}

#[tokio::test]
async fn non_positive_offer_prices_are_refused() {
    let api = setup().await;
    let customer = new_customer(api.db(), "13900000007").await;

    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::zero());
    let result = api.submit_custom_offer(request).await;
    assert!(matches!(result, Err(MarketplaceError::QueryError(_))));

    let request = NewCustomOfferRequest::new(customer.id, GAME, "Weekly boss runs", Money::from_yuan(-5));
    let result = api.submit_custom_offer(request).await;
    assert!(matches!(result, Err(MarketplaceError::QueryError(_))));
    tear_down(api).await;
}
