//! Ordered, first-match-wins rules that classify free-text transaction labels.


use crate::models::{ActionKind, RawRow};

struct ActionRule {
    needles: &'static [&'static str],
    action: ActionKind
}

const INVEST_ACTION_RULES: [ActionRule; 4] = [
    ActionRule { needles: &["buy", "stock split"], action: ActionKind::Buy },
    ActionRule { needles: &["sell"], action: ActionKind::Sell },
    ActionRule { needles: &["dividend"], action: ActionKind::Dividend },
    ActionRule { needles: &["fee"], action: ActionKind::Fee }
];

const IGNORED_LABELS: [&str; 6] = [
    "transfer from",
    "withdrawal",
    "top-up",
    "stake",
    "send",
    "receive"
];

/// Maps an invest-export type label (e.g. `"BUY - MARKET"`, `"CUSTODY FEE"`) to an action.
///
/// Returns `None` when no rule matches.
pub fn map_invest_action(label: &str) -> Option<ActionKind> {
    let label = label.to_lowercase();

    INVEST_ACTION_RULES.iter()
        .find(|rule| rule.needles.iter().any(|needle| label.contains(needle)))
        .map(|rule| rule.action)
}

/// Maps a crypto-export type label. Only exact buys and sells are trades, anything else
/// is booked as a dividend.
pub fn map_crypto_action(label: &str) -> ActionKind {
    let label = label.trim();

    if label.eq_ignore_ascii_case("buy") {
        ActionKind::Buy
    } else if label.eq_ignore_ascii_case("sell") {
        ActionKind::Sell
    } else {
        ActionKind::Dividend
    }
}

/// Whether a row is a cash movement or transfer that has no place in the export.
///
/// Checked against the original label, before any cell is coerced or any action mapped.
pub fn is_ignored_record(row: &RawRow) -> bool {
    is_ignored_label(row.label())
}

fn is_ignored_label(label: &str) -> bool {
    let label = label.to_lowercase();

    IGNORED_LABELS.iter().any(|needle| label.contains(needle))
}
