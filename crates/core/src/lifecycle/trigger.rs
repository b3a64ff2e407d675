//! Date and day trigger resolution for expiration and transition actions

use jiff::civil::Date;

use crate::error::{Error, Result};

/// Fixed calendar format accepted for trigger dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Action category a trigger belongs to, used to name flags in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Expiry,
    Transition,
}

impl TriggerKind {
    fn date_flag(self) -> &'static str {
        match self {
            TriggerKind::Expiry => "expiry-date",
            TriggerKind::Transition => "transition-date",
        }
    }

    fn days_flag(self) -> &'static str {
        match self {
            TriggerKind::Expiry => "expiry-days",
            TriggerKind::Transition => "transition-days",
        }
    }
}

/// Exactly one of an absolute date or a relative day count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Date(Date),
    Days(u32),
}

impl Trigger {
    /// Split into the `(date, days)` pair stored on a rule; the unused side is `None`
    pub fn into_fields(self) -> (Option<Date>, Option<u32>) {
        match self {
            Trigger::Date(date) => (Some(date), None),
            Trigger::Days(days) => (None, Some(days)),
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(flag: &str, input: &str) -> Result<Date> {
    Date::strptime(DATE_FORMAT, input.trim()).map_err(|e| {
        Error::Parse(format!("{flag} '{input}' is not a valid YYYY-MM-DD date: {e}"))
    })
}

/// Parse a non-negative whole number of days
pub fn parse_days(flag: &str, input: &str) -> Result<u32> {
    input.trim().parse::<u32>().map_err(|_| {
        Error::Parse(format!("{flag} '{input}' is not a valid number of days"))
    })
}

/// Resolve the date/day pair of one action category
///
/// Returns `None` when neither is given.
pub fn resolve_trigger(
    kind: TriggerKind,
    date: Option<&str>,
    days: Option<&str>,
) -> Result<Option<Trigger>> {
    match (date, days) {
        (Some(_), Some(_)) => Err(Error::Conflict(format!(
            "only one of {} and {} can be used in a single rule",
            kind.date_flag(),
            kind.days_flag()
        ))),
        (Some(date), None) => Ok(Some(Trigger::Date(parse_date(kind.date_flag(), date)?))),
        (None, Some(days)) => Ok(Some(Trigger::Days(parse_days(kind.days_flag(), days)?))),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_resolve_date() {
        let trigger = resolve_trigger(TriggerKind::Expiry, Some("2030-01-01"), None).unwrap();
        assert_eq!(trigger, Some(Trigger::Date(date(2030, 1, 1))));
        assert_eq!(
            trigger.unwrap().into_fields(),
            (Some(date(2030, 1, 1)), None)
        );
    }

    #[test]
    fn test_resolve_days() {
        let trigger = resolve_trigger(TriggerKind::Transition, None, Some("30")).unwrap();
        assert_eq!(trigger, Some(Trigger::Days(30)));
        assert_eq!(trigger.unwrap().into_fields(), (None, Some(30)));
    }

    #[test]
    fn test_resolve_zero_days() {
        let trigger = resolve_trigger(TriggerKind::Transition, None, Some("0")).unwrap();
        assert_eq!(trigger, Some(Trigger::Days(0)));
    }

    #[test]
    fn test_resolve_none() {
        assert_eq!(resolve_trigger(TriggerKind::Expiry, None, None).unwrap(), None);
    }

    #[test]
    fn test_resolve_both_conflict() {
        let err = resolve_trigger(TriggerKind::Expiry, Some("2030-01-01"), Some("5")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(err.to_string().contains("expiry-date"));
        assert!(err.to_string().contains("expiry-days"));
    }

    #[test]
    fn test_invalid_date() {
        for input in ["2030/01/01", "2030-13-01", "2030-02-30", "tomorrow"] {
            let err = resolve_trigger(TriggerKind::Transition, Some(input), None).unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "input {input:?}");
            assert!(err.to_string().contains("transition-date"));
        }
    }

    #[test]
    fn test_composite_duration_rejected() {
        for input in ["7d10h", "-1", "1.5", ""] {
            let err = resolve_trigger(TriggerKind::Expiry, None, Some(input)).unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "input {input:?}");
        }
    }
}
