pub mod currency;
mod errors;
mod numeric;
mod timestamp;

pub use currency::{alias_currency, detect_currency};
pub use errors::CoercionError;
pub use numeric::{parse_amount, parse_leading_number, parse_quantity};
pub use timestamp::{format_timestamp, parse_timestamp};
