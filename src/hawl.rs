//! # Hawl (Lunar Year) Tracker
//!
//! Wealth must be held for one full lunar year before Zakat becomes
//! obligatory. The lunar year is approximately 354 days long.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days in one lunar year, rounded down.
pub const LUNAR_YEAR_DAYS: i64 = 354;

/// Tracks the holding period of wealth to determine the Hawl condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HawlTracker {
    /// The date the wealth was acquired or first reached the Nisab.
    pub acquisition_date: Option<NaiveDate>,
    /// The date Zakat is being calculated for.
    pub calculation_date: NaiveDate,
}

impl HawlTracker {
    pub fn new(calculation_date: NaiveDate) -> Self {
        Self {
            acquisition_date: None,
            calculation_date,
        }
    }

    /// Sets the acquisition date.
    pub fn acquired_on(mut self, date: NaiveDate) -> Self {
        self.acquisition_date = Some(date);
        self
    }

    /// Days held so far; zero when the acquisition date is unknown or in the future.
    pub fn days_elapsed(&self) -> i64 {
        match self.acquisition_date {
            Some(start) => (self.calculation_date - start).num_days().max(0),
            None => 0,
        }
    }

    /// `true` once an acquisition date is known and a lunar year has passed.
    pub fn is_satisfied(&self) -> bool {
        self.acquisition_date.is_some() && self.days_elapsed() >= LUNAR_YEAR_DAYS
    }
}
