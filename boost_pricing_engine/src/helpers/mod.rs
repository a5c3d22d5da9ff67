pub mod price_rows;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rand::Rng;

use crate::db_types::OrderId;

pub use price_rows::{parse_price_rows, PriceRow};

/// Midnight UTC on the first day of the month containing `now`. Tiered compensation counts a contractor's
/// completions from here.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0).single().unwrap_or(now)
}

/// A fresh human-facing order number: `ORD`, a UTC timestamp, and a random 3-digit suffix.
pub fn new_order_no() -> OrderId {
    OrderId(format!("ORD{}{:03}", Utc::now().format("%Y%m%d%H%M%S"), rand::thread_rng().gen_range(0..1000)))
}

/// A fresh custom offer request number, shaped like [`new_order_no`] but with a `REQ` prefix.
pub fn new_request_no() -> String {
    format!("REQ{}{:03}", Utc::now().format("%Y%m%d%H%M%S"), rand::thread_rng().gen_range(0..1000))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn month_start_truncates_to_first_midnight() {
        let now = "2024-03-15T10:30:45Z".parse::<DateTime<Utc>>().unwrap();
        let start = month_start(now);
        assert_eq!(start, "2024-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        // Already at the boundary.
        assert_eq!(month_start(start), start);
    }

    #[test]
    fn order_numbers_have_the_expected_shape() {
        let order_no = new_order_no();
        assert!(order_no.as_str().starts_with("ORD"));
        assert_eq!(order_no.as_str().len(), "ORD".len() + 14 + 3);
        let request_no = new_request_no();
        assert!(request_no.starts_with("REQ"));
        assert_eq!(request_no.len(), "REQ".len() + 14 + 3);
    }
}
