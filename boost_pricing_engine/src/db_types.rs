use std::{fmt::Display, str::FromStr};

use bpe_common::Money;
use chrono::{DateTime, Utc};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The percentage-mode rate used when a contractor's stored rate data is missing or malformed.
pub const DEFAULT_PERCENTAGE_RATE: f64 = 80.0;

/// The unit label attached to catalog entries created by the engine itself (request approvals, settlement backfill).
pub const DEFAULT_PRICE_UNIT: &str = "per run";

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------       OrderId        ---------------------------------------------------------
/// A lightweight wrapper around the human-facing order number (e.g. `ORD20240801123000421`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     OrderStatus      ---------------------------------------------------------
/// The work axis of an order. Payment progress is tracked separately in [`PaymentStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order is waiting in the assignable pool. Orders start here.
    AwaitingAssignment,
    /// A contractor has the order and is working on it.
    InProgress,
    /// The contractor has finished and the customer must accept the work.
    AwaitingAcceptance,
    /// The order is done. Reaching this state triggers settlement exactly once.
    Completed,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::AwaitingAssignment => write!(f, "AwaitingAssignment"),
            OrderStatus::InProgress => write!(f, "InProgress"),
            OrderStatus::AwaitingAcceptance => write!(f, "AwaitingAcceptance"),
            OrderStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AwaitingAssignment" => Ok(Self::AwaitingAssignment),
            "InProgress" => Ok(Self::InProgress),
            "AwaitingAcceptance" => Ok(Self::AwaitingAcceptance),
            "Completed" => Ok(Self::Completed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("📦️ Invalid order status: {value}. Defaulting to AwaitingAssignment");
            OrderStatus::AwaitingAssignment
        })
    }
}

//--------------------------------------    PaymentStatus     ---------------------------------------------------------
/// The payment axis of an order. Independent of [`OrderStatus`]; an order must be `Paid` before it enters the
/// assignable pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "Unpaid"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("📦️ Invalid payment status: {value}. Defaulting to Unpaid");
            PaymentStatus::Unpaid
        })
    }
}

//--------------------------------------     ServiceType      ---------------------------------------------------------
/// How the task is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum ServiceType {
    /// The contractor plays the customer's account for them.
    Boosting,
    /// The contractor plays alongside the customer.
    Companion,
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Boosting => write!(f, "Boosting"),
            ServiceType::Companion => write!(f, "Companion"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Boosting" => Ok(Self::Boosting),
            "Companion" => Ok(Self::Companion),
            s => Err(ConversionError(format!("Invalid service type: {s}"))),
        }
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("📋️ Invalid service type: {value}. Defaulting to Boosting");
            ServiceType::Boosting
        })
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        Self::Boosting
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_no: OrderId,
    pub game: String,
    pub task_type: String,
    pub service_type: ServiceType,
    /// What the customer pays for the order.
    pub customer_price: Money,
    /// What the assigned contractor earns. Zero until a reward has been determined.
    pub contractor_reward: Money,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub customer_id: Option<i64>,
    pub contractor_id: Option<i64>,
    pub notes: Option<String>,
    /// True when the order was converted from a custom offer request.
    pub is_custom_offer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The platform margin on this order, given the reward recorded on it.
    pub fn profit(&self) -> Money {
        self.customer_price - self.contractor_reward
    }

    pub fn is_assignable(&self) -> bool {
        self.contractor_id.is_none() && self.status == OrderStatus::AwaitingAssignment
    }
}

//--------------------------------------       NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// The human-facing order number. Upstream surfaces assign it, or use [`crate::helpers::new_order_no`].
    pub order_no: OrderId,
    pub game: String,
    pub task_type: String,
    pub service_type: ServiceType,
    pub customer_price: Money,
    pub customer_id: Option<i64>,
    pub notes: Option<String>,
    pub is_custom_offer: bool,
}

impl NewOrder {
    pub fn new<S1: Into<String>, S2: Into<String>>(order_no: OrderId, game: S1, task_type: S2, price: Money) -> Self {
        Self {
            order_no,
            game: game.into(),
            task_type: task_type.into(),
            service_type: ServiceType::default(),
            customer_price: price,
            customer_id: None,
            notes: None,
            is_custom_offer: false,
        }
    }

    pub fn with_customer(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = service_type;
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Marks the order as having been converted from a custom offer request.
    pub fn custom_offer(mut self) -> Self {
        self.is_custom_offer = true;
        self
    }

    pub fn is_equivalent(&self, order: &Order) -> bool {
        self.order_no == order.order_no
            && self.game == order.game
            && self.task_type == order.task_type
            && self.service_type == order.service_type
            && self.customer_price == order.customer_price
            && self.customer_id == order.customer_id
    }
}

//--------------------------------------  CompensationMode    ---------------------------------------------------------
/// How a contractor is paid. Stored as a mode string plus a JSON rate blob; [`CompensationProfile::from_parts`] is
/// the only place that interprets the raw data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CompensationMode {
    /// The contractor's own quote for the task applies. No formula.
    Fixed,
    /// A stored percentage of the customer price, clamped to [1, 100].
    Percentage { rate: f64 },
    /// The percentage follows the monthly completion tier schedule (75 / 80 / 85).
    Tiered,
}

impl CompensationMode {
    /// The `(mode, rate_data)` column pair this mode is stored as.
    pub fn as_parts(&self) -> (&'static str, Option<String>) {
        match self {
            CompensationMode::Fixed => ("fixed", None),
            CompensationMode::Percentage { rate } => {
                ("percentage", Some(serde_json::json!({ "rate": rate }).to_string()))
            },
            CompensationMode::Tiered => ("tiered", None),
        }
    }
}

impl Display for CompensationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationMode::Fixed => write!(f, "fixed"),
            CompensationMode::Percentage { rate } => write!(f, "percentage ({rate}%)"),
            CompensationMode::Tiered => write!(f, "tiered"),
        }
    }
}

/// Whether a parsed rate came from the contractor's stored data or from the engine default. Kept on the profile so
/// callers (and tests) can tell a stored 80 from a defaulted 80.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateOrigin {
    Stored,
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompensationProfile {
    pub mode: CompensationMode,
    pub rate_origin: RateOrigin,
}

impl CompensationProfile {
    /// Interprets the stored `(mode, rate_data)` column pair. Never fails: unknown modes fall back to `Fixed` and
    /// unusable percentage rate data falls back to [`DEFAULT_PERCENTAGE_RATE`], both logged.
    pub fn from_parts(mode: &str, rate_data: Option<&str>) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "" | "fixed" => Self { mode: CompensationMode::Fixed, rate_origin: RateOrigin::Stored },
            "tiered" => Self { mode: CompensationMode::Tiered, rate_origin: RateOrigin::Stored },
            "percentage" => {
                let (rate, rate_origin) = parse_percentage_rate(rate_data);
                Self { mode: CompensationMode::Percentage { rate }, rate_origin }
            },
            other => {
                error!("🧑️ Unknown compensation mode '{other}'. Defaulting to fixed");
                Self { mode: CompensationMode::Fixed, rate_origin: RateOrigin::Defaulted }
            },
        }
    }
}

fn parse_percentage_rate(rate_data: Option<&str>) -> (f64, RateOrigin) {
    let Some(raw) = rate_data else {
        return (DEFAULT_PERCENTAGE_RATE, RateOrigin::Defaulted);
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => match value.get("rate").and_then(|r| r.as_f64()) {
            Some(rate) => (rate.clamp(1.0, 100.0), RateOrigin::Stored),
            None => {
                warn!("🧑️ Rate data '{raw}' has no usable 'rate' field. Using the default rate");
                (DEFAULT_PERCENTAGE_RATE, RateOrigin::Defaulted)
            },
        },
        Err(e) => {
            warn!("🧑️ Could not parse percentage rate data: {e}. Using the default rate");
            (DEFAULT_PERCENTAGE_RATE, RateOrigin::Defaulted)
        },
    }
}

//--------------------------------------      Contractor      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contractor {
    pub id: i64,
    pub handle: String,
    pub display_name: Option<String>,
    /// Only approved contractors are eligible for assignment and claims.
    pub is_approved: bool,
    /// Raw compensation mode string. Use [`Contractor::profile`] instead of reading this directly.
    pub comp_mode: String,
    /// Raw JSON rate blob. Use [`Contractor::profile`] instead of reading this directly.
    pub rate_data: Option<String>,
    /// Comma-separated list of games the contractor covers. Gates visibility of uncataloged requests.
    pub specialties: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contractor {
    pub fn profile(&self) -> CompensationProfile {
        CompensationProfile::from_parts(&self.comp_mode, self.rate_data.as_deref())
    }

    pub fn has_specialty(&self, game: &str) -> bool {
        let game = game.trim();
        self.specialties
            .as_deref()
            .map(|s| s.split(',').any(|g| g.trim() == game))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContractor {
    pub handle: String,
    pub display_name: Option<String>,
    pub comp_mode: CompensationMode,
    pub specialties: Option<String>,
}

impl NewContractor {
    pub fn new<S: Into<String>>(handle: S) -> Self {
        Self {
            handle: handle.into(),
            display_name: None,
            comp_mode: CompensationMode::Percentage { rate: DEFAULT_PERCENTAGE_RATE },
            specialties: None,
        }
    }

    pub fn with_mode(mut self, mode: CompensationMode) -> Self {
        self.comp_mode = mode;
        self
    }

    pub fn with_specialties<S: Into<String>>(mut self, specialties: S) -> Self {
        self.specialties = Some(specialties.into());
        self
    }
}

//--------------------------------------     LoyaltyTier      ---------------------------------------------------------
/// Customer loyalty tiers, derived from cumulative spend. The rule table is evaluated top-down, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Diamond,
    Gold,
    Silver,
    Bronze,
}

/// (spend floor in cents, tier). ¥10,000 / ¥5,000 / ¥1,000 thresholds.
const LOYALTY_RULES: [(i64, LoyaltyTier); 4] = [
    (1_000_000, LoyaltyTier::Diamond),
    (500_000, LoyaltyTier::Gold),
    (100_000, LoyaltyTier::Silver),
    (0, LoyaltyTier::Bronze),
];

impl LoyaltyTier {
    pub fn for_total_spent(total_spent: Money) -> Self {
        LOYALTY_RULES
            .iter()
            .find(|(floor, _)| total_spent.value() >= *floor)
            .map(|(_, tier)| *tier)
            .unwrap_or(LoyaltyTier::Bronze)
    }

    /// Percentage taken off the customer's next orders.
    pub fn discount_percent(&self) -> i64 {
        match self {
            LoyaltyTier::Diamond => 10,
            LoyaltyTier::Gold => 5,
            LoyaltyTier::Silver => 2,
            LoyaltyTier::Bronze => 0,
        }
    }
}

impl Display for LoyaltyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoyaltyTier::Diamond => write!(f, "Diamond"),
            LoyaltyTier::Gold => write!(f, "Gold"),
            LoyaltyTier::Silver => write!(f, "Silver"),
            LoyaltyTier::Bronze => write!(f, "Bronze"),
        }
    }
}

impl FromStr for LoyaltyTier {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Diamond" => Ok(Self::Diamond),
            "Gold" => Ok(Self::Gold),
            "Silver" => Ok(Self::Silver),
            "Bronze" => Ok(Self::Bronze),
            s => Err(ConversionError(format!("Invalid loyalty tier: {s}"))),
        }
    }
}

impl From<String> for LoyaltyTier {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("🧑️ Invalid loyalty tier: {value}. Defaulting to Bronze");
            LoyaltyTier::Bronze
        })
    }
}

//--------------------------------------       Customer       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub phone: String,
    pub name: Option<String>,
    pub total_spent: Money,
    pub tier: LoyaltyTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub phone: String,
    pub name: Option<String>,
}

impl NewCustomer {
    pub fn new<S: Into<String>>(phone: S) -> Self {
        Self { phone: phone.into(), name: None }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

//--------------------------------------      PriceEntry      ---------------------------------------------------------
/// A canonical catalog row. The customer-facing price for one task of one game.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: i64,
    pub game: String,
    pub task_type: String,
    pub service_type: ServiceType,
    pub price: Money,
    pub unit: String,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPriceEntry {
    pub game: String,
    pub task_type: String,
    pub service_type: ServiceType,
    pub price: Money,
    pub unit: String,
    pub remark: Option<String>,
}

impl NewPriceEntry {
    pub fn new<S1: Into<String>, S2: Into<String>>(game: S1, task_type: S2, price: Money) -> Self {
        Self {
            game: game.into(),
            task_type: task_type.into(),
            service_type: ServiceType::default(),
            price,
            unit: DEFAULT_PRICE_UNIT.to_string(),
            remark: None,
        }
    }

    pub fn with_unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_remark<S: Into<String>>(mut self, remark: S) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn with_service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = service_type;
        self
    }
}

//--------------------------------------   ContractorQuote    ---------------------------------------------------------
/// A contractor's asking price for one `(game, task_type)`. One row per contractor and task.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContractorQuote {
    pub id: i64,
    pub contractor_id: i64,
    pub game: String,
    pub task_type: String,
    pub service_type: ServiceType,
    pub price: Money,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    RequestStatus     ---------------------------------------------------------
/// Lifecycle of a custom offer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Waiting for a contractor to claim it.
    Open,
    /// A contractor holds the request; waiting for the customer to pay.
    Claimed,
    /// Paid and converted into a live order.
    Paid,
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Open => write!(f, "Open"),
            RequestStatus::Claimed => write!(f, "Claimed"),
            RequestStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "Claimed" => Ok(Self::Claimed),
            "Paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid request status: {s}"))),
        }
    }
}

impl From<String> for RequestStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("📨️ Invalid request status: {value}. Defaulting to Open");
            RequestStatus::Open
        })
    }
}

//-------------------------------------- CustomOfferRequest   ---------------------------------------------------------
/// A customer-proposed task at an offered price. Once claimed and paid it becomes a real order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomOfferRequest {
    pub id: i64,
    pub request_no: String,
    pub customer_id: i64,
    pub game: String,
    pub task_type: String,
    pub notes: Option<String>,
    pub offered_price: Money,
    pub status: RequestStatus,
    /// Off-catalog titles are only shown to contractors whose specialties cover the game, and their completion
    /// backfills the catalog at a markup.
    pub uncataloged: bool,
    pub contractor_id: Option<i64>,
    pub order_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomOfferRequest {
    pub customer_id: i64,
    pub game: String,
    pub task_type: String,
    pub notes: Option<String>,
    pub offered_price: Money,
    pub uncataloged: bool,
}

impl NewCustomOfferRequest {
    pub fn new<S1: Into<String>, S2: Into<String>>(customer_id: i64, game: S1, task_type: S2, offered: Money) -> Self {
        Self {
            customer_id,
            game: game.into(),
            task_type: task_type.into(),
            notes: None,
            offered_price: offered,
            uncataloged: false,
        }
    }

    pub fn uncataloged(mut self) -> Self {
        self.uncataloged = true;
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

//--------------------------------------  TaskRequestStatus   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum TaskRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl Display for TaskRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskRequestStatus::Pending => write!(f, "Pending"),
            TaskRequestStatus::Approved => write!(f, "Approved"),
            TaskRequestStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for TaskRequestStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            s => Err(ConversionError(format!("Invalid task request status: {s}"))),
        }
    }
}

impl From<String> for TaskRequestStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("📨️ Invalid task request status: {value}. Defaulting to Pending");
            TaskRequestStatus::Pending
        })
    }
}

//-------------------------------------- TaskAdditionRequest  ---------------------------------------------------------
/// A contractor-proposed catalog row: a new task with their asking price, pending admin review.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TaskAdditionRequest {
    pub id: i64,
    pub contractor_id: i64,
    pub game: String,
    pub task_type: String,
    /// What the contractor asks for the task. The catalog price is inferred from this on approval.
    pub contractor_price: Money,
    pub note: Option<String>,
    pub status: TaskRequestStatus,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskAdditionRequest {
    pub contractor_id: i64,
    pub game: String,
    pub task_type: String,
    pub contractor_price: Money,
    pub note: Option<String>,
}

impl NewTaskAdditionRequest {
    pub fn new<S1: Into<String>, S2: Into<String>>(contractor_id: i64, game: S1, task_type: S2, price: Money) -> Self {
        Self { contractor_id, game: game.into(), task_type: task_type.into(), contractor_price: price, note: None }
    }
}
