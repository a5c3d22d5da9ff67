//! Price-sheet row extraction.
//!
//! Contractors paste their price sheets as plain text. Lines look like `深渊12层满星 40r/号` or
//! `周本素材 50元`, usually with contact details and section headers mixed in. [`parse_price_rows`] pulls
//! the `(task label, price)` pairs out of such text; matching the labels against the catalog is
//! [`crate::PriceBookApi::apply_import_rows`]'s job.

use bpe_common::Money;
use regex::Regex;

/// One `(task, price)` row extracted from a pasted price sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub task_type: String,
    pub price: Money,
}

/// Leading junk price sheets commonly put before the task label.
const LABEL_PREFIXES: [&str; 14] =
    ["V/Q", "QQ", "微信", "全职业", "一.", "二.", "三.", "四.", "五.", "六.", "七.", "1.", "2.", "3."];

const LABEL_MAX_CHARS: usize = 50;

/// Stands in for labels that boil down to nothing once the price token and junk are removed.
const FALLBACK_LABEL: &str = "Boosting service";

/// Extracts price rows from pasted price-sheet text, one candidate row per line.
///
/// A line yields a row when it carries a price token (`40r`, `50元`, `140/图`, `3/天`, ...). The last
/// price token on the line wins and everything before it becomes the task label. Prices outside
/// (0, 99999] are dropped. Labels are capped at 50 characters.
pub fn parse_price_rows(text: &str) -> Vec<PriceRow> {
    let price_token = Regex::new(r"(\d+(?:\.\d+)?)\s*(?:r|元|R|/号|/图|/天)").unwrap();
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.chars().count() < 2 {
            continue;
        }
        let Some(caps) = price_token.captures_iter(line).last() else {
            continue;
        };
        let Ok(price) = caps[1].parse::<f64>() else {
            continue;
        };
        if price <= 0.0 || price > 99_999.0 {
            continue;
        }
        let Ok(price) = Money::try_from(price) else {
            continue;
        };
        let Some(token) = caps.get(0) else {
            continue;
        };
        let task_type = tidy_label(&line[..token.start()]);
        rows.push(PriceRow { task_type, price });
    }
    rows
}

fn tidy_label(raw: &str) -> String {
    let mut label = raw.trim();
    for prefix in LABEL_PREFIXES {
        if let Some(stripped) = label.strip_prefix(prefix) {
            label = stripped.trim();
        }
    }
    if label.chars().count() < 2 {
        return FALLBACK_LABEL.to_string();
    }
    label.chars().take(LABEL_MAX_CHARS).collect::<String>().trim().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_rows_from_sheet_lines() {
        let text = "深渊12层满星 40r/号\n1.周本素材 50元\n联系方式见置顶\n刷体力 12.5元\n";
        let rows = parse_price_rows(text);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], PriceRow { task_type: "深渊12层满星".to_string(), price: Money::from_yuan(40) });
        assert_eq!(rows[1], PriceRow { task_type: "周本素材".to_string(), price: Money::from_yuan(50) });
        assert_eq!(rows[2], PriceRow { task_type: "刷体力".to_string(), price: Money::from(1250) });
    }

    #[test]
    fn last_price_token_on_the_line_wins() {
        let rows = parse_price_rows("深渊 40r 满星加急 60r");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_type, "深渊 40r 满星加急");
        assert_eq!(rows[0].price, Money::from_yuan(60));
    }

    #[test]
    fn out_of_bounds_prices_are_dropped() {
        let rows = parse_price_rows("天价开荒 100000元\n免费活动 0r\n正常项目 99999元");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_type, "正常项目");
        assert_eq!(rows[0].price, Money::from_yuan(99_999));
    }

    #[test]
    fn bare_prices_get_the_fallback_label() {
        let rows = parse_price_rows("40r\nQQ 60元");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].task_type, FALLBACK_LABEL);
        assert_eq!(rows[1].task_type, FALLBACK_LABEL);
    }

    #[test]
    fn lines_without_price_tokens_are_skipped() {
        let rows = parse_price_rows("全职业代练 欢迎咨询\n微信 boost123\n\nx");
        assert!(rows.is_empty());
    }

    #[test]
    fn long_labels_are_capped() {
        let label = "深".repeat(80);
        let rows = parse_price_rows(&format!("{label} 25元"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_type.chars().count(), 50);
    }
}
