use once_cell::sync::Lazy;
use regex::Regex;

/// Ghostfolio's code for prices quoted in pence sterling.
pub const PENCE_STERLING: &str = "GBp";

const DEFAULT_CURRENCY: &str = "EUR";

static NUMERIC_RUNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9.,'+\-]+").expect("numeric run pattern is valid")
});

/// Normalizes an invest-export currency cell, rewriting `GBX` to [`PENCE_STERLING`].
pub fn alias_currency(value: &str) -> String {
    let value = value.trim();

    if value == "GBX" {
        PENCE_STERLING.to_string()
    } else {
        value.to_string()
    }
}

/// Detects the currency of a symbol-decorated monetary string such as `"€100"` or `"100 SEK"`.
///
/// Unrecognised or missing symbols fall back to EUR.
pub fn detect_currency(value: &str) -> &'static str {
    let symbol = NUMERIC_RUNS.replace_all(value, "");

    match symbol.trim().to_uppercase().as_str() {
        "€" => "EUR",
        "$" => "USD",
        "£" => "GBP",
        "SEK" => "SEK",
        //NOTE: Unknown symbols (including plain numbers) are assumed to be euros, which will be wrong for other currencies
        _ => DEFAULT_CURRENCY
    }
}
