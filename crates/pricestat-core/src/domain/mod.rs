mod observation;
mod trade_date;

pub use observation::{InstrumentSeries, PriceObservation, SeriesByInstrument};
pub use trade_date::{is_business_day, parse_trade_date};
