use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed-point unsigned money amount with two decimal digits.
///
/// Can store values no greater than u64::MAX / 100, which is far beyond
/// any shipping rate this program deals in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Builds a price from its total number of cents. Lets rate tables be
    /// written down as plain numbers instead of going through the string
    /// parser.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }

    pub fn checked_sub(self, other: Price) -> Option<Price> {
        self.0.checked_sub(other.0).map(Price)
    }

    /// Subtraction that bottoms out at zero instead of failing.
    pub fn saturating_sub(self, other: Price) -> Price {
        Price(self.0.saturating_sub(other.0))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Always write out both decimal digits, even if they are zero.
        // Charged prices and discounts are quoted in whole cents.
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PriceParseError {
    #[error("invalid format")]
    InvalidFormat,
    #[error("value too large")]
    TooLarge,
}

impl TryFrom<&str> for Price {
    type Error = PriceParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)(?:\.([0-9]{1,2}))?$").unwrap());
        let captures = RE.captures(s).ok_or(PriceParseError::InvalidFormat)?;

        // If the regex matched, the captures are guaranteed to be integers.
        // The only thing that can go wrong is that the integer is too large
        // to fit in a u64. Anything else is a developer error, so we panic.
        let units = captures
            .get(1)
            .unwrap()
            .as_str()
            .parse::<u64>()
            .map_err(|e| match e.kind() {
                std::num::IntErrorKind::PosOverflow => PriceParseError::TooLarge,
                _ => panic!("unexpected error: {:?}", e),
            })?;
        let cents = captures
            .get(2)
            .map(|s| parse_cents(s.as_str()))
            .unwrap_or(0);

        units
            .checked_mul(100)
            .and_then(|units| units.checked_add(cents))
            .map(Price)
            .ok_or(PriceParseError::TooLarge)
    }
}

/// Parse an up to two digit fractional part into a u64 between 0 and 99.
/// For example, parse "5" into 50 and "05" into 5.
fn parse_cents(s: &str) -> u64 {
    assert!(s.len() <= 2);
    // We don't need to worry about overflow in the cast or a negative
    // exponent because we know 0 <= s.len() <= 2.
    s.parse::<u64>().unwrap() * (10u64.pow(2 - s.len() as u32))
}
