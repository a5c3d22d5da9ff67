use crate::db_types::PriceEntry;

/// Task labels are truncated to this many characters during normalization.
pub const MAX_TASK_LABEL_LEN: usize = 50;

/// The canonical form of a task label used for fuzzy comparison: trimmed, ASCII and ideographic spaces removed,
/// full-width hyphen / en dash / em dash unified to `-`, truncated to [`MAX_TASK_LABEL_LEN`] characters.
pub fn normalize_task_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{3000}')
        .map(|c| match c {
            '－' | '–' | '—' => '-',
            c => c,
        })
        .take(MAX_TASK_LABEL_LEN)
        .collect()
}

/// Finds the catalog entry a free-text task label refers to, among the entries of one game.
///
/// `entries` must be in catalog (insertion) order; the first match wins. An exact scan on the trimmed
/// label runs first. Failing that, a single fuzzy scan compares the normalized label against each entry
/// in turn: the entry matches if either normalized string contains the other, or the dash-stripped
/// forms satisfy the same containment relation.
///
/// Blank labels and blank catalog rows never match anything.
pub fn find_catalog_match<'a>(task_label: &str, entries: &'a [PriceEntry]) -> Option<&'a PriceEntry> {
    let trimmed = task_label.trim();
    if trimmed.is_empty() || entries.is_empty() {
        return None;
    }
    if let Some(hit) = entries.iter().find(|e| e.task_type.trim() == trimmed) {
        return Some(hit);
    }
    let wanted = normalize_task_label(task_label);
    if wanted.is_empty() {
        return None;
    }
    let wanted_no_dash = wanted.replace('-', "");
    entries.iter().find(|e| {
        let t = normalize_task_label(&e.task_type);
        if t.is_empty() {
            return false;
        }
        if t.contains(wanted.as_str()) || wanted.contains(t.as_str()) {
            return true;
        }
        // `str::contains` is true for an empty needle, so dash-only labels must not reach it
        let t = t.replace('-', "");
        !t.is_empty()
            && !wanted_no_dash.is_empty()
            && (t.contains(wanted_no_dash.as_str()) || wanted_no_dash.contains(t.as_str()))
    })
}

#[cfg(test)]
mod test {
    use bpe_common::Money;
    use chrono::Utc;

    use super::*;
    use crate::db_types::ServiceType;

    fn entry(id: i64, task_type: &str) -> PriceEntry {
        PriceEntry {
            id,
            game: "原神".to_string(),
            task_type: task_type.to_string(),
            service_type: ServiceType::Boosting,
            price: Money::from_yuan(40),
            unit: "per run".to_string(),
            remark: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_task_label("  主线 任务  "), "主线任务");
        assert_eq!(normalize_task_label("深渊　满星"), "深渊满星");
        assert_eq!(normalize_task_label("日常－委托"), "日常-委托");
        assert_eq!(normalize_task_label("日常–委托"), "日常-委托");
        assert_eq!(normalize_task_label("日常—委托"), "日常-委托");
        let long = "a".repeat(80);
        assert_eq!(normalize_task_label(&long).chars().count(), MAX_TASK_LABEL_LEN);
    }

    #[test]
    fn exact_match_beats_fuzzy() {
        let entries = vec![entry(1, "主线任务代打"), entry(2, "主线任务")];
        let hit = find_catalog_match("主线任务", &entries).unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn containment_matches_both_directions() {
        let entries = vec![entry(1, "主线任务")];
        // query contains the catalog label
        assert_eq!(find_catalog_match("主线任务代打", &entries).unwrap().id, 1);
        // catalog label contains the query
        assert_eq!(find_catalog_match("主线", &entries).unwrap().id, 1);
        // spaces are ignored on either side
        assert_eq!(find_catalog_match("主线 任务", &entries).unwrap().id, 1);
        let spaced = vec![entry(7, "主线 任务")];
        assert_eq!(find_catalog_match("主线任务", &spaced).unwrap().id, 7);
    }

    #[test]
    fn dash_variants_unify() {
        let entries = vec![entry(1, "日常-委托")];
        assert_eq!(find_catalog_match("日常—委托", &entries).unwrap().id, 1);
        assert_eq!(find_catalog_match("日常－委托", &entries).unwrap().id, 1);
        // no dash at all in the query, only the dash-stripped forms agree
        assert_eq!(find_catalog_match("日常委托", &entries).unwrap().id, 1);
    }

    #[test]
    fn first_match_wins_in_catalog_order() {
        let entries = vec![entry(1, "深渊"), entry(2, "深渊满星")];
        assert_eq!(find_catalog_match("深渊满星速通", &entries).unwrap().id, 1);
    }

    #[test]
    fn dash_stripped_hit_on_an_earlier_entry_wins() {
        // entry 1 only matches once dashes are stripped, entry 2 by plain containment;
        // catalog order decides, not the kind of comparison
        let entries = vec![entry(1, "每日-任务"), entry(2, "每日任务打满")];
        assert_eq!(find_catalog_match("每日任务", &entries).unwrap().id, 1);
    }

    #[test]
    fn blank_labels_never_match() {
        let entries = vec![entry(1, "主线任务")];
        assert!(find_catalog_match("", &entries).is_none());
        assert!(find_catalog_match("   ", &entries).is_none());
        assert!(find_catalog_match("主线", &[]).is_none());
        // a blank catalog row cannot be matched by containment
        let blanks = vec![entry(1, "  "), entry(2, "-")];
        assert!(find_catalog_match("主线", &blanks).is_none());
    }

    #[test]
    fn long_labels_compare_truncated() {
        let stored = format!("{}尾巴", "长".repeat(49));
        let entries = vec![entry(1, &stored)];
        let query = format!("{}尾巴不同", "长".repeat(49));
        // both normalize to the same 50-character prefix
        assert_eq!(find_catalog_match(&query, &entries).unwrap().id, 1);
    }
}
