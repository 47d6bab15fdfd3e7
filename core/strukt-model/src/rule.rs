//! Date rules stored in `rule-builder` fields.
//!
//! A rule is a small JSON tree describing which calendar days it applies to,
//! e.g. "weekdays in June, except the 24th":
//!
//! ```json
//! {"type": "all", "rules": [
//!   {"type": "weekdays", "days": [1, 2, 3, 4, 5]},
//!   {"type": "range", "from": "2024-06-01", "to": "2024-06-30"},
//!   {"type": "not", "rule": {"type": "date", "date": "2024-06-24"}}
//! ]}
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a date rule.
#[derive(Debug, Error)]
pub enum RuleParseError {
    /// The input was empty.
    #[error("empty rule")]
    Empty,

    /// Malformed JSON or an unknown rule kind.
    #[error("malformed rule: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A weekday outside 1 (Monday) ..= 7 (Sunday).
    #[error("invalid weekday: {0}")]
    InvalidWeekday(u8),

    /// A yearly rule with an impossible month/day.
    #[error("invalid day of year: {month}-{day}")]
    InvalidDayOfYear { month: u32, day: u32 },
}

/// A rule matching a set of calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DateRule {
    /// Exactly one day.
    Date { date: NaiveDate },
    /// An inclusive range; an open end is unbounded.
    Range {
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
    /// ISO weekdays, 1 = Monday through 7 = Sunday.
    Weekdays { days: Vec<u8> },
    /// The same month/day every year.
    Yearly { month: u32, day: u32 },
    /// Every child rule matches.
    All { rules: Vec<DateRule> },
    /// At least one child rule matches.
    Any { rules: Vec<DateRule> },
    /// The child rule does not match.
    Not { rule: Box<DateRule> },
}

impl DateRule {
    /// Parses and validates a rule from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, RuleParseError> {
        if json.trim().is_empty() {
            return Err(RuleParseError::Empty);
        }
        let rule: Self = serde_json::from_str(json)?;
        rule.validate()?;
        Ok(rule)
    }

    /// Serializes the rule to its JSON form.
    pub fn to_json(&self) -> String {
        // A tree of plain enums, dates and integers always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Returns true if the rule applies to `day`.
    pub fn matches(&self, day: NaiveDate) -> bool {
        match self {
            Self::Date { date } => *date == day,
            Self::Range { from, to } => {
                from.is_none_or(|from| day >= from) && to.is_none_or(|to| day <= to)
            }
            Self::Weekdays { days } => {
                let weekday = day.weekday().number_from_monday() as u8;
                days.contains(&weekday)
            }
            Self::Yearly { month, day: dom } => day.month() == *month && day.day() == *dom,
            Self::All { rules } => rules.iter().all(|r| r.matches(day)),
            Self::Any { rules } => rules.iter().any(|r| r.matches(day)),
            Self::Not { rule } => !rule.matches(day),
        }
    }

    fn validate(&self) -> Result<(), RuleParseError> {
        match self {
            Self::Weekdays { days } => {
                if let Some(bad) = days.iter().find(|d| !(1..=7).contains(*d)) {
                    return Err(RuleParseError::InvalidWeekday(*bad));
                }
                Ok(())
            }
            Self::Yearly { month, day } => {
                // 2000 is a leap year, so Feb 29 is accepted.
                if NaiveDate::from_ymd_opt(2000, *month, *day).is_none() {
                    return Err(RuleParseError::InvalidDayOfYear {
                        month: *month,
                        day: *day,
                    });
                }
                Ok(())
            }
            Self::All { rules } | Self::Any { rules } => {
                rules.iter().try_for_each(DateRule::validate)
            }
            Self::Not { rule } => rule.validate(),
            Self::Date { .. } | Self::Range { .. } => Ok(()),
        }
    }
}
