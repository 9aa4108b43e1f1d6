use time::macros::format_description;
use time::{Date, Weekday};

/// Parse a `DD-Mon-YYYY` date such as `05-Nov-2014`.
///
/// The month token is the English three-letter abbreviation and is matched
/// case-sensitively. The day must be two digits and the year exactly four,
/// with no sign.
pub fn parse_trade_date(input: &str) -> Option<Date> {
    let (_, year) = input.rsplit_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Date::parse(input, format_description!("[day]-[month repr:short]-[year]")).ok()
}

/// Monday through Friday.
pub fn is_business_day(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}
