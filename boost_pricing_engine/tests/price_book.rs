//! Integration tests for the price book: catalog maintenance, label resolution, contractor quotes, bulk
//! quote imports and the task addition review queue.
use boost_pricing_engine::{
    book_objects::{ApprovalOutcome, QuoteOutcome, TaskSubmissionOutcome},
    db_types::{CompensationMode, NewPriceEntry, NewTaskAdditionRequest, TaskRequestStatus},
    helpers::parse_price_rows,
    pricing::PricingConfig,
    MarketplaceDatabase,
    MarketplaceError,
    PriceBookApi,
    PriceBookManagement,
    SqliteDatabase,
};
use bpe_common::Money;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::support::{
    prepare_env::{prepare_test_env, random_db_path},
    seed::{approved_contractor, seed_catalog, GAME},
};

mod support;

async fn setup() -> PriceBookApi<SqliteDatabase> {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    PriceBookApi::new(db, PricingConfig::default())
}

async fn tear_down(api: PriceBookApi<SqliteDatabase>) {
    api.db().close().await;
    Sqlite::drop_database(api.db().url()).await.unwrap();
}

#[tokio::test]
async fn loose_labels_resolve_against_the_catalog() {
    let api = setup().await;
    seed_catalog(api.db()).await;

    // Containment in either direction, spaces ignored.
    let hit = api.fuzzy_match(GAME, "12F full").await.unwrap().expect("Expected a catalog hit");
    assert_eq!(hit.task_type, "Spiral Abyss 12F full stars");
    let hit =
        api.fuzzy_match(GAME, "Weekly boss runs for all three bosses").await.unwrap().expect("Expected a catalog hit");
    assert_eq!(hit.task_type, "Weekly boss runs");
    // The dash-stripped pass catches hyphenated spellings.
    let hit = api.fuzzy_match(GAME, "Weekly-boss-runs").await.unwrap().expect("Expected a catalog hit");
    assert_eq!(hit.task_type, "Weekly boss runs");

    assert!(api.fuzzy_match(GAME, "   ").await.unwrap().is_none());
    assert!(api.fuzzy_match(GAME, "Artifact hunting").await.unwrap().is_none());
    assert!(api.fuzzy_match("Unknown Game", "Weekly boss runs").await.unwrap().is_none());

    let exact = api.price_for(GAME, "Weekly boss runs").await.unwrap().expect("Expected the exact entry");
    assert_eq!(exact.price, Money::from_yuan(20));
    assert!(api.price_for(GAME, "Weekly boss").await.unwrap().is_none());
    assert_eq!(api.catalog().await.unwrap().len(), 3);
    tear_down(api).await;
}

#[tokio::test]
async fn quotes_are_stored_under_catalog_labels() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let worker = approved_contractor(api.db(), "sharp_pencil", CompensationMode::Percentage { rate: 80.0 }).await;

    let quote = api
        .save_quote(worker.id, GAME, "Weekly boss runs", Money::from_yuan(18))
        .await
        .unwrap()
        .saved()
        .expect("Expected the quote to save");
    assert_eq!(quote.task_type, "Weekly boss runs");
    assert_eq!(quote.price, Money::from_yuan(18));

    // Requoting replaces, never duplicates.
    api.save_quote(worker.id, GAME, "Weekly boss runs", Money::from_yuan(16)).await.unwrap();
    let quotes = api.quotes_for_contractor(worker.id).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].price, Money::from_yuan(16));

    // A loose label is bounced back with the entry it resolves to, and nothing is written.
    let outcome = api.save_quote(worker.id, GAME, "Weekly boss", Money::from_yuan(15)).await.unwrap();
    let QuoteOutcome::DuplicateOf(entry) = outcome else {
        panic!("Expected the loose label to resolve to an existing entry");
    };
    assert_eq!(entry.task_type, "Weekly boss runs");
    let quotes = api.quotes_for_contractor(worker.id).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].price, Money::from_yuan(16));

    let outcome = api.save_quote(worker.id, GAME, "Totally new mode", Money::from_yuan(15)).await.unwrap();
    assert!(matches!(outcome, QuoteOutcome::UnknownTask));

    let result = api.save_quote(worker.id, GAME, "Weekly boss runs", Money::zero()).await;
    assert!(matches!(result, Err(MarketplaceError::QueryError(_))));
    tear_down(api).await;
}

#[tokio::test]
async fn pasted_price_sheets_reconcile_against_the_catalog() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let worker = approved_contractor(api.db(), "sheet_paster", CompensationMode::Percentage { rate: 80.0 }).await;

    let sheet = "Weekly boss runs 18元\nSpiral Abyss 12F 88r\nMystery dungeon 10元\n微信 boost_pro_2024";
    let rows = parse_price_rows(sheet);
    assert_eq!(rows.len(), 3);

    let summary = api.apply_import_rows(worker.id, GAME, &rows).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(format!("{summary}"), "matched 2 of 3 rows");

    // Matched rows land under the catalog's own labels, not the sheet's spelling.
    let quotes = api.quotes_for_contractor(worker.id).await.unwrap();
    assert_eq!(quotes.len(), 2);
    assert!(quotes.iter().any(|q| q.task_type == "Spiral Abyss 12F full stars" && q.price == Money::from_yuan(88)));
    assert!(quotes.iter().any(|q| q.task_type == "Weekly boss runs" && q.price == Money::from_yuan(18)));

    // A second paste refreshes prices in place.
    let rows = parse_price_rows("Weekly boss runs 20元");
    let summary = api.apply_import_rows(worker.id, GAME, &rows).await.unwrap();
    assert_eq!(summary.matched, 1);
    let quotes = api.quotes_for_contractor(worker.id).await.unwrap();
    assert_eq!(quotes.len(), 2);
    assert!(quotes.iter().any(|q| q.task_type == "Weekly boss runs" && q.price == Money::from_yuan(20)));
    tear_down(api).await;
}

#[tokio::test]
async fn task_requests_walk_the_review_queue() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let bidder = approved_contractor(api.db(), "fixed_bidder", CompensationMode::Fixed).await;

    let request = NewTaskAdditionRequest::new(bidder.id, GAME, "Artifact farming routes", Money::from_yuan(60));
    let request = api.submit_task_request(request).await.unwrap().submitted().expect("Expected the request to file");
    assert_eq!(request.status, TaskRequestStatus::Pending);
    assert_eq!(api.pending_task_requests().await.unwrap().len(), 1);

    let outcome = api.approve_task_request(request.id).await.unwrap();
    let ApprovalOutcome::Approved { request, entry } = outcome else {
        panic!("Expected the request to be approved");
    };
    // A fixed-mode bidder is priced by the flat formula: 60 / (1 - 0.2).
    assert_eq!(entry.price, Money::from_yuan(75));
    assert_eq!(entry.game, GAME);
    assert_eq!(entry.task_type, "Artifact farming routes");
    assert_eq!(request.status, TaskRequestStatus::Approved);
    assert!(request.reviewed_at.is_some());

    // The submitter's own quote is on file at their asking price.
    let quote = api.db().fetch_quote(bidder.id, GAME, "Artifact farming routes").await.unwrap().unwrap();
    assert_eq!(quote.price, Money::from_yuan(60));

    assert!(api.pending_task_requests().await.unwrap().is_empty());
    let outcome = api.approve_task_request(request.id).await.unwrap();
    assert!(matches!(outcome, ApprovalOutcome::AlreadyDecided));
    tear_down(api).await;
}

#[tokio::test]
async fn duplicate_task_requests_are_turned_away() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let bidder = approved_contractor(api.db(), "eager_bidder", CompensationMode::Percentage { rate: 80.0 }).await;

    // A label that already resolves to the catalog never reaches the queue.
    let request = NewTaskAdditionRequest::new(bidder.id, GAME, "Weekly boss", Money::from_yuan(15));
    let outcome = api.submit_task_request(request).await.unwrap();
    let TaskSubmissionOutcome::DuplicateOf(existing) = outcome else {
        panic!("Expected the submission to be refused as a duplicate");
    };
    assert_eq!(existing.task_type, "Weekly boss runs");
    assert!(api.pending_task_requests().await.unwrap().is_empty());

    // The catalog can catch up while a request waits; approval then auto-rejects it.
    let request = NewTaskAdditionRequest::new(bidder.id, GAME, "Palace of the damned full run", Money::from_yuan(40));
    let request = api.submit_task_request(request).await.unwrap().submitted().expect("Expected the request to file");
    api.add_price_entry(NewPriceEntry::new(GAME, "Palace of the damned full run", Money::from_yuan(55)))
        .await
        .unwrap();
    let outcome = api.approve_task_request(request.id).await.unwrap();
    let ApprovalOutcome::RejectedDuplicate { request, existing } = outcome else {
        panic!("Expected the stale request to be rejected");
    };
    assert_eq!(existing.task_type, "Palace of the damned full run");
    assert_eq!(request.status, TaskRequestStatus::Rejected);
    assert_eq!(request.review_note.as_deref(), Some("Duplicate of catalog entry 'Palace of the damned full run'"));
    assert!(request.reviewed_at.is_some());
    tear_down(api).await;
}

#[tokio::test]
async fn approval_prices_by_the_bidder_profile() {
    let api = setup().await;
    seed_catalog(api.db()).await;

    // Percentage 50: the entry must be asking / 0.5 for the bidder to take home what they asked.
    let half = approved_contractor(api.db(), "half_share", CompensationMode::Percentage { rate: 50.0 }).await;
    let request = NewTaskAdditionRequest::new(half.id, GAME, "Oculi full-map collection", Money::from_yuan(30));
    let request = api.submit_task_request(request).await.unwrap().submitted().expect("Expected the request to file");
    let entry = api
        .approve_task_request(request.id)
        .await
        .unwrap()
        .approved_entry()
        .expect("Expected the request to be approved");
    assert_eq!(entry.price, Money::from_yuan(60));

    // Tiered bidders are priced at the 75% schedule floor.
    let climber = approved_contractor(api.db(), "ladder_pro", CompensationMode::Tiered).await;
    let request = NewTaskAdditionRequest::new(climber.id, GAME, "Hundred-floor tower climb", Money::from_yuan(75));
    let request = api.submit_task_request(request).await.unwrap().submitted().expect("Expected the request to file");
    let entry = api
        .approve_task_request(request.id)
        .await
        .unwrap()
        .approved_entry()
        .expect("Expected the request to be approved");
    assert_eq!(entry.price, Money::from_yuan(100));
    tear_down(api).await;
}

#[tokio::test]
async fn rejection_records_the_review_note() {
    let api = setup().await;
    seed_catalog(api.db()).await;
    let bidder = approved_contractor(api.db(), "hopeful_bidder", CompensationMode::Percentage { rate: 80.0 }).await;

    let request = NewTaskAdditionRequest::new(bidder.id, GAME, "Reputation grind weekly", Money::from_yuan(25));
    let request = api.submit_task_request(request).await.unwrap().submitted().expect("Expected the request to file");

    let rejected = api
        .reject_task_request(request.id, Some("Out of scope this season"))
        .await
        .unwrap()
        .expect("Expected the rejection to land");
    assert_eq!(rejected.status, TaskRequestStatus::Rejected);
    assert_eq!(rejected.review_note.as_deref(), Some("Out of scope this season"));
    assert!(rejected.reviewed_at.is_some());

    // Decided is decided, for rejecting and approving alike.
    assert!(api.reject_task_request(request.id, None).await.unwrap().is_none());
    let outcome = api.approve_task_request(request.id).await.unwrap();
    assert!(matches!(outcome, ApprovalOutcome::AlreadyDecided));
    tear_down(api).await;
}

#[tokio::test]
async fn catalog_prices_must_be_positive() {
    let api = setup().await;
    let result = api.add_price_entry(NewPriceEntry::new(GAME, "Free errand", Money::zero())).await;
    assert!(matches!(result, Err(MarketplaceError::QueryError(_))));

    let entry = api.add_price_entry(NewPriceEntry::new(GAME, "Event shop clearing", Money::from_yuan(12))).await.unwrap();
    let repriced = api.update_price(entry.id, Money::from_yuan(15)).await.unwrap();
    assert_eq!(repriced.price, Money::from_yuan(15));

    let result = api.update_price(entry.id, Money::from_yuan(-1)).await;
    assert!(matches!(result, Err(MarketplaceError::QueryError(_))));
    let result = api.update_price(9999, Money::from_yuan(10)).await;
    assert!(matches!(result, Err(MarketplaceError::PriceEntryNotFound(9999))));
    tear_down(api).await;
}
