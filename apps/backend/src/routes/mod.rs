pub mod entries;
pub mod metrics;
pub mod settings;

use chrono::{Local, NaiveDate, NaiveDateTime};
use sleep_core::parse_date;

use crate::error::Result;

/// Local wall-clock time of the request.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse an optional `YYYY-MM-DD` parameter.
pub(crate) fn optional_date(date: Option<&str>) -> Result<Option<NaiveDate>> {
    Ok(date.map(parse_date).transpose()?)
}
