//! Day / month / year date fields.

use jiff::civil::Date;

/// The three text boxes of a date field, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDate {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl RawDate {
    pub fn new(day: &str, month: &str, year: &str) -> Self {
        Self {
            day: day.to_string(),
            month: month.to_string(),
            year: year.to_string(),
        }
    }

    /// Parse `DD/MM/YYYY` (also accepts `-` or `.` separators).
    pub fn parse_compact(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(['/', '-', '.']);
        let day = parts.next()?;
        let month = parts.next()?;
        let year = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(day, month, year))
    }

    fn is_blank(&self) -> bool {
        [&self.day, &self.month, &self.year]
            .iter()
            .all(|p| p.trim().is_empty())
    }

    /// A real calendar date, or `None`.
    pub fn to_date(&self) -> Option<Date> {
        let day: i8 = self.day.trim().parse().ok()?;
        let month: i8 = self.month.trim().parse().ok()?;
        let year: i16 = self.year.trim().parse().ok()?;
        if year < 1 {
            return None;
        }
        Date::new(year, month, day).ok()
    }
}

/// How a date relates to today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    /// Strictly before today.
    Past { message: &'static str },
    /// Today or earlier.
    PastOrToday { message: &'static str },
}

/// The rule set of one date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRules {
    /// `None` makes the field optional.
    pub required: Option<&'static str>,
    pub invalid: &'static str,
    pub bound: DateBound,
    /// Earliest accepted date, inclusive.
    pub earliest: Option<(Date, &'static str)>,
}

impl DateRules {
    /// Rules apply in order: required, real date, bound against today, earliest.
    pub fn check(&self, raw: Option<&RawDate>, today: Date) -> Result<Option<Date>, String> {
        let raw = match raw {
            Some(r) if !r.is_blank() => r,
            _ => {
                return match self.required {
                    Some(message) => Err(message.to_string()),
                    None => Ok(None),
                };
            }
        };

        let date = raw.to_date().ok_or_else(|| self.invalid.to_string())?;

        match self.bound {
            DateBound::Past { message } if date >= today => return Err(message.to_string()),
            DateBound::PastOrToday { message } if date > today => {
                return Err(message.to_string());
            }
            _ => {}
        }

        if let Some((earliest, message)) = self.earliest {
            if date < earliest {
                return Err(message.to_string());
            }
        }

        Ok(Some(date))
    }
}
