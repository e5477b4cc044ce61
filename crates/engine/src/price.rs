use std::{fmt, str::FromStr};

use crate::EngineError;

/// Dish price represented as **integer cents**.
///
/// A price is always strictly positive and fits in eight digits
/// (`999999.99` at most), so it never needs floating point.
///
/// # Examples
///
/// ```rust
/// use engine::Price;
///
/// let price: Price = "4200".parse().unwrap();
/// assert_eq!(price.cents(), 420_000);
/// assert_eq!(price.to_string(), "4200.00");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals, zero and negative values):
///
/// ```rust
/// use engine::Price;
///
/// assert_eq!("10,5".parse::<Price>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Price>().is_err());
/// assert!("0".parse::<Price>().is_err());
/// assert!("-3".parse::<Price>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Price(i64);

impl Price {
    /// Largest accepted price, in cents.
    pub const MAX_CENTS: i64 = 99_999_999;

    /// Creates a price from integer cents.
    pub fn new(cents: i64) -> Result<Self, EngineError> {
        if cents <= 0 {
            return Err(EngineError::InvalidPrice(
                "price must be greater than zero".to_string(),
            ));
        }
        if cents > Self::MAX_CENTS {
            return Err(EngineError::InvalidPrice(
                "price cannot have more than 8 digits".to_string(),
            ));
        }
        Ok(Self(cents))
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<i64> for Price {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for i64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl FromStr for Price {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - no sign, the value must be > 0
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPrice("invalid price format".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidPrice("empty price".to_string()));
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidPrice(
                "price must be greater than zero".to_string(),
            ));
        }
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).replace(',', ".");

        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        // Leading zeros do not count as digits.
        let significant = units_str.trim_start_matches('0');
        if significant.len() > 6 {
            return Err(EngineError::InvalidPrice(
                "price cannot have more than 8 digits".to_string(),
            ));
        }
        let units: i64 = if significant.is_empty() {
            0
        } else {
            significant.parse().map_err(|_| invalid())?
        };

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::InvalidPrice(
                            "too many decimals".to_string(),
                        ));
                    }
                }
            }
        };

        Self::new(units * 100 + cents)
    }
}
