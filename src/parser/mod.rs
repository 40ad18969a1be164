mod normalize;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::models::{CryptoRecord, ExportError, InvestRecord, ParsedRow, RawRow, Schema};
use crate::rules::is_ignored_record;

const CRYPTO_FIELD_COUNT: usize = 7;

impl Schema {
    /// Picks the layout from the number of comma separated fields on the header line.
    pub fn detect(contents: &str) -> Self {
        let header = contents.lines().next().unwrap_or_default();

        if header.split(',').count() == CRYPTO_FIELD_COUNT {
            Schema::Crypto
        } else {
            Schema::Invest
        }
    }
}

/// Tokenizes the export and coerces every data row into a
/// [`NormalizedRow`](crate::models::NormalizedRow).
///
/// Rows matched by the ignore rules are kept as [`ParsedRow::Ignored`] without touching
/// their cells. The first malformed record or cell of any other row aborts parsing.
pub fn parse_rows(contents: &str, schema: Schema) -> Result<Vec<ParsedRow>, ExportError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers: StringRecord = reader.headers()
        .map_err(ExportError::parse)?
        .iter()
        .map(normalize_header)
        .collect();

    debug!("Parsing {schema:?} export with columns {headers:?}");

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(ExportError::parse)?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();

        let raw = match schema {
            Schema::Invest => RawRow::Invest(record.deserialize::<InvestRecord>(Some(&headers)).map_err(ExportError::parse)?),
            Schema::Crypto => RawRow::Crypto(record.deserialize::<CryptoRecord>(Some(&headers)).map_err(ExportError::parse)?)
        };

        if is_ignored_record(&raw) {
            rows.push(ParsedRow::Ignored { line, label: raw.label().to_string() });
            continue;
        }

        rows.push(ParsedRow::Normalized(raw.normalize(line)?));
    }

    Ok(rows)
}

/// Turns a header such as `"Price per share"` into the key `"pricePerShare"`.
/// Headers already in camelCase are kept as they are.
fn normalize_header(header: &str) -> String {
    header.split(|character: char| !character.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(index, word)| {
            let word = if word.chars().all(|character| !character.is_lowercase()) {
                word.to_lowercase()
            } else {
                word.to_string()
            };

            let mut characters = word.chars();

            match characters.next() {
                Some(first) if index == 0 => first.to_lowercase().chain(characters).collect::<String>(),
                Some(first) => first.to_uppercase().chain(characters).collect::<String>(),
                None => String::new()
            }
        })
        .collect()
}
