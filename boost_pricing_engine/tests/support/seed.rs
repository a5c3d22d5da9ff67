use boost_pricing_engine::{
    db_types::{CompensationMode, Contractor, Customer, NewContractor, NewCustomer, NewPriceEntry, PriceEntry},
    ContractorManagement,
    CustomerManagement,
    PriceBookManagement,
    SqliteDatabase,
};
use bpe_common::Money;

pub const GAME: &str = "Genshin Impact";

/// Three catalog rows for [`GAME`], in insertion order.
pub async fn seed_catalog(db: &SqliteDatabase) -> Vec<PriceEntry> {
    let rows = [
        ("Spiral Abyss 12F full stars", Money::from_yuan(100)),
        ("Weekly boss runs", Money::from_yuan(20)),
        ("Character ascension farming", Money::from_yuan(35)),
    ];
    let mut entries = Vec::with_capacity(rows.len());
    for (task, price) in rows {
        let entry = db
            .insert_price_entry(NewPriceEntry::new(GAME, task, price))
            .await
            .expect("Error seeding the catalog");
        entries.push(entry);
    }
    entries
}

pub async fn approved_contractor(db: &SqliteDatabase, handle: &str, mode: CompensationMode) -> Contractor {
    let contractor = db
        .insert_contractor(NewContractor::new(handle).with_mode(mode))
        .await
        .expect("Error seeding a contractor");
    db.set_contractor_approval(contractor.id, true).await.expect("Error approving the contractor")
}

pub async fn specialist_contractor(
    db: &SqliteDatabase,
    handle: &str,
    mode: CompensationMode,
    specialties: &str,
) -> Contractor {
    let contractor = db
        .insert_contractor(NewContractor::new(handle).with_mode(mode).with_specialties(specialties))
        .await
        .expect("Error seeding a contractor");
    db.set_contractor_approval(contractor.id, true).await.expect("Error approving the contractor")
}

pub async fn new_customer(db: &SqliteDatabase, phone: &str) -> Customer {
    db.insert_customer(NewCustomer::new(phone)).await.expect("Error seeding a customer")
}
