use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// A courier a package can be shipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    LaPoste,
    MondialRelay,
}

impl TryFrom<&str> for Provider {
    type Error = ShipmentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "LP" => Ok(Provider::LaPoste),
            "MR" => Ok(Provider::MondialRelay),
            _ => Err(ShipmentError::UnknownProvider),
        }
    }
}

/// Package size bracket. Both the single-letter codes and the spelled-out
/// forms are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl TryFrom<&str> for Size {
    type Error = ShipmentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "S" | "Small" => Ok(Size::Small),
            "M" | "Medium" => Ok(Size::Medium),
            "L" | "Large" => Ok(Size::Large),
            _ => Err(ShipmentError::UnknownSize),
        }
    }
}

/// Why a line was rejected. The display strings double as the markers
/// written next to `Ignored` in the output.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShipmentError {
    #[error("malformed line")]
    MalformedLine,
    #[error("bad date format")]
    BadDateFormat,
    #[error("invalid date")]
    InvalidDate,
    #[error("unknown provider")]
    UnknownProvider,
    #[error("unknown size")]
    UnknownSize,
}

/// The three whitespace-separated fields of an input line, before any
/// semantic checks. The tokens stay borrowed from the line so the driver
/// can echo them back exactly as they were written.
#[derive(Debug, PartialEq, Eq)]
pub struct RawShipment<'a> {
    pub date: &'a str,
    pub size: &'a str,
    pub provider: &'a str,
}

impl<'a> RawShipment<'a> {
    /// Structural check only: the line must carry exactly three fields, in
    /// the order date, size, provider.
    pub fn split(line: &'a str) -> Result<Self, ShipmentError> {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(date), Some(size), Some(provider), None) => Ok(Self {
                date,
                size,
                provider,
            }),
            _ => Err(ShipmentError::MalformedLine),
        }
    }

    /// Semantic checks, short-circuiting on the first failure: the date is
    /// checked first, then the provider, then the size.
    pub fn validate(&self) -> Result<Shipment, ShipmentError> {
        let date = parse_date(self.date)?;
        let provider = Provider::try_from(self.provider)?;
        let size = Size::try_from(self.size)?;
        Ok(Shipment {
            date,
            size,
            provider,
        })
    }
}

/// A validated shipment, ready for pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shipment {
    pub date: NaiveDate,
    pub size: Size,
    pub provider: Provider,
}

/// Dates must be written exactly as `YYYY-MM-DD` and denote a real
/// calendar day. The two requirements are reported as distinct failures:
/// `2023-1-5` has a bad shape, `2023-02-30` is not a day that exists.
fn parse_date(s: &str) -> Result<NaiveDate, ShipmentError> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
    if !RE.is_match(s) {
        return Err(ShipmentError::BadDateFormat);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ShipmentError::InvalidDate)
}
