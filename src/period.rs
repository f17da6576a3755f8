//! Turns untrusted `year` and `month` query parameters into a valid reporting period.
//!
//! Malformed, missing and out of range values never cause an error. Each field
//! independently falls back to the current year or month.

use std::ops::RangeInclusive;

use serde::Deserialize;
use time::{Date, Month};

/// How many years before the current year may be requested.
pub const MAX_YEARS_BEFORE_TODAY: i32 = 100;
/// How many years after the current year may be requested.
pub const MAX_YEARS_AFTER_TODAY: i32 = 1;

/// Every month of the year in calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The raw period query parameters, e.g. `?year=2025&month=1`.
///
/// The fields are kept as strings so that malformed values survive
/// deserialization and can be replaced with defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PeriodQuery {
    /// The requested year, e.g. "2025".
    pub year: Option<String>,
    /// The requested month, 1-indexed, e.g. "1" for January.
    pub month: Option<String>,
}

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    /// The year the month belongs to.
    pub year: i32,
    /// The month of the year.
    pub month: Month,
}

impl MonthPeriod {
    /// The month period that contains `date`.
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The half-open date range `[start, end)` covering the month, as
    /// `yyyy-MM-dd` strings.
    ///
    /// Dates are stored in SQLite as `yyyy-MM-dd` text, so comparing against
    /// these strings selects exactly the dates in the month.
    pub fn date_bounds(&self) -> (String, String) {
        let (end_year, end_month) = match self.month {
            Month::December => (self.year + 1, Month::January),
            month => (self.year, month.next()),
        };

        (
            first_of_month(self.year, self.month),
            first_of_month(end_year, end_month),
        )
    }
}

/// The half-open date range `[start, end)` covering `year`, as `yyyy-MM-dd` strings.
pub fn year_date_bounds(year: i32) -> (String, String) {
    (
        first_of_month(year, Month::January),
        first_of_month(year + 1, Month::January),
    )
}

fn first_of_month(year: i32, month: Month) -> String {
    format!("{year:04}-{:02}-01", month as u8)
}

/// The earliest and latest years that have at least one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearsRange {
    /// The year of the oldest transaction.
    pub min_year: i32,
    /// The year of the newest transaction.
    pub max_year: i32,
}

/// The years to offer in a year filter, newest first.
///
/// The list always includes `selected` so the filter can show the year being
/// viewed even when it has no transactions.
pub fn year_options(years_range: Option<YearsRange>, selected: i32) -> Vec<i32> {
    let (min_year, max_year) = match years_range {
        Some(range) => (range.min_year.min(selected), range.max_year.max(selected)),
        None => (selected, selected),
    };

    (min_year..=max_year).rev().collect()
}

/// Parse `year`, falling back to the year of `today` if it is missing, not an
/// integer, or outside the supported range.
pub fn normalize_year(year: Option<&str>, today: Date) -> i32 {
    year.and_then(|year| year.trim().parse::<i32>().ok())
        .filter(|year| supported_years(today).contains(year))
        .unwrap_or(today.year())
}

/// The years that can be viewed relative to `today`, e.g. 1925 to 2026 when
/// `today` is in 2025.
pub fn supported_years(today: Date) -> RangeInclusive<i32> {
    let current_year = today.year();

    (current_year - MAX_YEARS_BEFORE_TODAY)..=(current_year + MAX_YEARS_AFTER_TODAY)
}

/// Parse a 1-indexed `month`, falling back to the month of `today` if it is
/// missing, not an integer, or not between 1 and 12.
pub fn normalize_month(month: Option<&str>, today: Date) -> Month {
    month
        .and_then(|month| month.trim().parse::<u8>().ok())
        .and_then(|month| Month::try_from(month).ok())
        .unwrap_or(today.month())
}

/// Build a valid [MonthPeriod] from the query parameters.
pub fn normalize_month_period(query: &PeriodQuery, today: Date) -> MonthPeriod {
    MonthPeriod {
        year: normalize_year(query.year.as_deref(), today),
        month: normalize_month(query.month.as_deref(), today),
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::{
        MonthPeriod, PeriodQuery, YearsRange, normalize_month, normalize_month_period,
        normalize_year, year_date_bounds, year_options,
    };

    fn query(year: Option<&str>, month: Option<&str>) -> PeriodQuery {
        PeriodQuery {
            year: year.map(str::to_owned),
            month: month.map(str::to_owned),
        }
    }

    #[test]
    fn valid_period_is_kept() {
        let today = date!(2025 - 06 - 15);

        let got = normalize_month_period(&query(Some("2024"), Some("3")), today);

        assert_eq!(
            got,
            MonthPeriod {
                year: 2024,
                month: Month::March
            }
        );
    }

    #[test]
    fn malformed_period_falls_back_to_today() {
        let today = date!(2025 - 06 - 15);

        let got = normalize_month_period(&query(Some("abc"), Some("13")), today);

        assert_eq!(
            got,
            MonthPeriod {
                year: 2025,
                month: Month::June
            }
        );
    }

    #[test]
    fn missing_period_falls_back_to_today() {
        let today = date!(2025 - 06 - 15);

        let got = normalize_month_period(&PeriodQuery::default(), today);

        assert_eq!(got, MonthPeriod::containing(today));
    }

    #[test]
    fn fields_fall_back_independently() {
        let today = date!(2025 - 06 - 15);

        assert_eq!(
            normalize_month_period(&query(Some("2024"), Some("13")), today),
            MonthPeriod {
                year: 2024,
                month: Month::June
            }
        );
        assert_eq!(
            normalize_month_period(&query(Some("1800"), Some("2")), today),
            MonthPeriod {
                year: 2025,
                month: Month::February
            }
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let today = date!(2025 - 06 - 15);

        assert_eq!(normalize_year(Some("1925"), today), 1925);
        assert_eq!(normalize_year(Some("2026"), today), 2026);
        assert_eq!(normalize_year(Some("1924"), today), 2025);
        assert_eq!(normalize_year(Some("2027"), today), 2025);
        assert_eq!(normalize_year(Some(" 2020 "), today), 2020);
    }

    #[test]
    fn normalized_values_are_always_in_range() {
        let today = date!(2025 - 06 - 15);
        let inputs = [
            None,
            Some(""),
            Some(" "),
            Some("-1"),
            Some("0"),
            Some("1.5"),
            Some("12abc"),
            Some("99999999999999999999"),
            Some("NaN"),
        ];

        for input in inputs {
            let year = normalize_year(input, today);
            let month = normalize_month(input, today);

            assert!(
                (1925..=2026).contains(&year),
                "year {year} out of range for {input:?}"
            );
            assert_eq!(month, Month::June, "month for {input:?}");
        }
    }

    #[test]
    fn month_bounds_cover_exactly_one_month() {
        let march = MonthPeriod {
            year: 2024,
            month: Month::March,
        };
        let december = MonthPeriod {
            year: 2024,
            month: Month::December,
        };

        assert_eq!(
            march.date_bounds(),
            ("2024-03-01".to_owned(), "2024-04-01".to_owned())
        );
        assert_eq!(
            december.date_bounds(),
            ("2024-12-01".to_owned(), "2025-01-01".to_owned())
        );
        assert!(march.contains(date!(2024 - 03 - 31)));
        assert!(!march.contains(date!(2024 - 04 - 01)));
        assert!(!march.contains(date!(2023 - 03 - 15)));
    }

    #[test]
    fn year_bounds_cover_exactly_one_year() {
        assert_eq!(
            year_date_bounds(2024),
            ("2024-01-01".to_owned(), "2025-01-01".to_owned())
        );
    }

    #[test]
    fn year_options_include_selected_year() {
        let range = Some(YearsRange {
            min_year: 2022,
            max_year: 2024,
        });

        assert_eq!(year_options(range, 2023), vec![2024, 2023, 2022]);
        assert_eq!(year_options(range, 2026), vec![2026, 2025, 2024, 2023, 2022]);
        assert_eq!(year_options(None, 2025), vec![2025]);
    }
}
