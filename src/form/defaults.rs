//! Initial form values.

use chrono::{Datelike, Local, Months, NaiveDate};

use super::money::format_amount;
use crate::config::FormSettings;

/// Date format the backend expects.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Values the form starts out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDefaults {
    pub start_date: String,
    pub end_date: String,
    pub initial_investment: String,
    pub monthly_investment: String,
    pub tickers: Vec<String>,
}

impl FormDefaults {
    /// Defaults relative to `today`.
    ///
    /// The range ends on the first of the current month and starts
    /// `history_years` before that.
    pub fn new(settings: &FormSettings, today: NaiveDate) -> Self {
        let (start, end) = date_range(today, settings.history_years);
        Self {
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            initial_investment: amount(settings.initial_investment),
            monthly_investment: amount(settings.monthly_investment),
            tickers: settings.default_tickers.clone(),
        }
    }

    /// Defaults relative to the local date.
    pub fn for_today(settings: &FormSettings) -> Self {
        Self::new(settings, Local::now().date_naive())
    }
}

fn amount(value: u64) -> String {
    let digits = value.to_string();
    format_amount(&digits).unwrap_or(digits)
}

/// First of `today`'s month, and the same day `years` earlier.
pub fn date_range(today: NaiveDate, years: u32) -> (NaiveDate, NaiveDate) {
    let end = today.with_day(1).unwrap_or(today);
    let start = end
        .checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(end);
    (start, end)
}
