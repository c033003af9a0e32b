use chrono::NaiveDate;
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;

/// Paid leave days granted per year, per type. Injected from `Config`.
#[derive(Debug, Copy, Clone)]
pub struct LeaveEntitlements {
    pub annual: i64,
    pub sick: i64,
}

impl Default for LeaveEntitlements {
    fn default() -> Self {
        Self { annual: 15, sick: 10 }
    }
}

#[derive(Debug, Display, Eq, PartialEq)]
pub enum LeaveError {
    #[display(fmt = "start_date cannot be after end_date")]
    InvertedRange,
}

/// Inclusive day count: a request covering a single date is 1 day.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Result<i64, LeaveError> {
    if start > end {
        return Err(LeaveError::InvertedRange);
    }
    Ok((end - start).num_days() + 1)
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct TypeBalance {
    pub total: i64,
    pub used: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct LeaveBalance {
    pub annual: TypeBalance,
    pub sick: TypeBalance,
}

/// remaining = entitlement - approved days used this year. Overdrawn
/// balances go negative rather than clamping, so HR can see the deficit.
pub fn balance(entitlements: &LeaveEntitlements, annual_used: i64, sick_used: i64) -> LeaveBalance {
    LeaveBalance {
        annual: TypeBalance {
            total: entitlements.annual,
            used: annual_used,
            remaining: entitlements.annual - annual_used,
        },
        sick: TypeBalance {
            total: entitlements.sick,
            used: sick_used,
            remaining: entitlements.sick - sick_used,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn christmas_to_dec_27_is_three_days() {
        assert_eq!(inclusive_days(d(2024, 12, 25), d(2024, 12, 27)), Ok(3));
    }

    #[test]
    fn single_day_counts_as_one() {
        assert_eq!(inclusive_days(d(2024, 6, 1), d(2024, 6, 1)), Ok(1));
    }

    #[test]
    fn range_spanning_year_boundary() {
        assert_eq!(inclusive_days(d(2024, 12, 30), d(2025, 1, 2)), Ok(4));
    }

    #[test]
    fn inverted_range_is_an_error() {
        assert_eq!(
            inclusive_days(d(2024, 6, 2), d(2024, 6, 1)),
            Err(LeaveError::InvertedRange)
        );
    }

    #[test]
    fn balance_after_one_approved_three_day_annual_leave() {
        let b = balance(&LeaveEntitlements::default(), 3, 0);
        assert_eq!(b.annual.remaining, 12);
        assert_eq!(b.annual.used, 3);
        assert_eq!(b.sick.remaining, 10);
    }

    #[test]
    fn overdrawn_balance_goes_negative() {
        let b = balance(&LeaveEntitlements { annual: 15, sick: 10 }, 17, 0);
        assert_eq!(b.annual.remaining, -2);
    }
}
