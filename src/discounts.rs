use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::price::Price;
use crate::rates::RateTable;
use crate::shipment::{Provider, Shipment, Size};

/// Total discount the rules may hand out within one calendar month.
const MONTHLY_CAP: Price = Price::from_cents(1_000);

/// Which large La Poste shipment of the month ships for free. The rule
/// fires on exactly this occurrence; the 6th, 9th and so on pay in full.
const FREE_LARGE_OCCURRENCE: u32 = 3;

/// A year and month, identifying which monthly budget a shipment draws
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Discount bookkeeping for a single calendar month. Only shipments that
/// passed validation are recorded here.
#[derive(Debug, Default)]
struct MonthLedger {
    large_via_la_poste: u32,
    spent: Price,
}

impl MonthLedger {
    /// Records another large La Poste shipment and returns its position
    /// within the month, counting from one.
    fn count_large_la_poste(&mut self) -> u32 {
        self.large_via_la_poste += 1;
        self.large_via_la_poste
    }

    /// Grants as much of `wanted` as the monthly cap still allows and
    /// returns the granted amount.
    fn grant(&mut self, wanted: Price) -> Price {
        let granted = wanted.min(MONTHLY_CAP.saturating_sub(self.spent));
        // granted keeps spent at or below the cap, so this can't overflow.
        self.spent = self.spent.checked_add(granted).unwrap();
        granted
    }
}

/// The price actually charged for a shipment and the discount that was
/// taken off its base rate.
#[derive(Debug, PartialEq, Eq)]
pub struct Quote {
    pub charged: Price,
    pub discount: Price,
}

/// Applies the discount rules, keeping per-month state across calls.
///
/// Shipments must be fed in file order: the quote for a shipment depends
/// on how much of its month's budget earlier shipments have used, and on
/// how many large La Poste shipments came before it.
pub struct Discounts {
    months: HashMap<MonthKey, MonthLedger>,
}

impl Discounts {
    pub fn new() -> Self {
        Self {
            months: HashMap::new(),
        }
    }

    /// Prices a single validated shipment and updates its month's ledger.
    pub fn quote(&mut self, rates: &RateTable, shipment: &Shipment) -> Quote {
        let base = rates.price_for(shipment.provider, shipment.size);
        let ledger = self.months.entry(MonthKey::of(shipment.date)).or_default();

        let wanted = match (shipment.size, shipment.provider) {
            // Small packages are matched to the cheapest small rate on the
            // market, whichever carrier was picked.
            (Size::Small, _) => {
                // cheapest_small is the minimum over all small rates, so
                // it can't exceed this carrier's small rate.
                base.checked_sub(rates.cheapest_small()).unwrap()
            }
            (Size::Large, Provider::LaPoste) => {
                if ledger.count_large_la_poste() == FREE_LARGE_OCCURRENCE {
                    base
                } else {
                    Price::ZERO
                }
            }
            _ => Price::ZERO,
        };

        let discount = ledger.grant(wanted);
        Quote {
            // discount <= wanted <= base.
            charged: base.checked_sub(discount).unwrap(),
            discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn shipment(date: &str, size: Size, provider: Provider) -> Shipment {
        Shipment {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            size,
            provider,
        }
    }

    fn price(s: &str) -> Price {
        Price::try_from(s).unwrap()
    }

    fn quote(discounts: &mut Discounts, date: &str, size: Size, provider: Provider) -> Quote {
        discounts.quote(&RateTable::standard(), &shipment(date, size, provider))
    }

    #[test]
    fn test_small_price_matched_to_cheapest_rate() {
        let mut discounts = Discounts::new();
        assert_eq!(
            quote(&mut discounts, "2023-01-05", Size::Small, Provider::MondialRelay),
            Quote {
                charged: price("1.50"),
                discount: price("0.50"),
            }
        );
    }

    #[test]
    fn test_small_via_cheapest_carrier_pays_full_rate() {
        let mut discounts = Discounts::new();
        assert_eq!(
            quote(&mut discounts, "2023-01-05", Size::Small, Provider::LaPoste),
            Quote {
                charged: price("1.50"),
                discount: Price::ZERO,
            }
        );
    }

    #[test_case(Size::Medium, Provider::LaPoste, "4.90")]
    #[test_case(Size::Medium, Provider::MondialRelay, "3.00")]
    #[test_case(Size::Large, Provider::MondialRelay, "4.00")]
    fn test_undiscounted_shipments_pay_base_price(size: Size, provider: Provider, expected: &str) {
        let mut discounts = Discounts::new();
        assert_eq!(
            quote(&mut discounts, "2023-01-05", size, provider),
            Quote {
                charged: price(expected),
                discount: Price::ZERO,
            }
        );
    }

    #[test]
    fn test_third_large_la_poste_of_month_is_free() {
        let mut discounts = Discounts::new();
        for day in ["2023-01-05", "2023-01-10"] {
            assert_eq!(
                quote(&mut discounts, day, Size::Large, Provider::LaPoste),
                Quote {
                    charged: price("6.90"),
                    discount: Price::ZERO,
                }
            );
        }
        assert_eq!(
            quote(&mut discounts, "2023-01-15", Size::Large, Provider::LaPoste),
            Quote {
                charged: price("0.00"),
                discount: price("6.90"),
            }
        );
    }

    #[test]
    fn test_free_large_fires_once_per_month() {
        let mut discounts = Discounts::new();
        // Shipments four through six pay in full; in particular the sixth
        // gets no second freebie.
        for _ in 0..3 {
            quote(&mut discounts, "2023-01-05", Size::Large, Provider::LaPoste);
        }
        for _ in 0..3 {
            assert_eq!(
                quote(&mut discounts, "2023-01-20", Size::Large, Provider::LaPoste),
                Quote {
                    charged: price("6.90"),
                    discount: Price::ZERO,
                }
            );
        }
    }

    #[test]
    fn test_large_counter_is_per_month() {
        let mut discounts = Discounts::new();
        quote(&mut discounts, "2023-01-30", Size::Large, Provider::LaPoste);
        quote(&mut discounts, "2023-01-31", Size::Large, Provider::LaPoste);
        // The count does not carry over into February.
        assert_eq!(
            quote(&mut discounts, "2023-02-01", Size::Large, Provider::LaPoste),
            Quote {
                charged: price("6.90"),
                discount: Price::ZERO,
            }
        );
        quote(&mut discounts, "2023-02-02", Size::Large, Provider::LaPoste);
        assert_eq!(
            quote(&mut discounts, "2023-02-03", Size::Large, Provider::LaPoste),
            Quote {
                charged: price("0.00"),
                discount: price("6.90"),
            }
        );
    }

    #[test]
    fn test_large_mondial_relay_never_counts() {
        let mut discounts = Discounts::new();
        for _ in 0..2 {
            quote(&mut discounts, "2023-01-05", Size::Large, Provider::MondialRelay);
        }
        // Two large Mondial Relay shipments must not advance the La Poste
        // counter: this is only the first large La Poste shipment.
        assert_eq!(
            quote(&mut discounts, "2023-01-06", Size::Large, Provider::LaPoste),
            Quote {
                charged: price("6.90"),
                discount: Price::ZERO,
            }
        );
    }

    #[test]
    fn test_cap_clamps_small_discount() {
        let mut discounts = Discounts::new();
        // One freebie (6.90) plus six price-matched small shipments
        // (6 x 0.50) leave 0.10 of the month's budget.
        for _ in 0..3 {
            quote(&mut discounts, "2023-01-05", Size::Large, Provider::LaPoste);
        }
        for _ in 0..6 {
            quote(&mut discounts, "2023-01-10", Size::Small, Provider::MondialRelay);
        }
        assert_eq!(
            quote(&mut discounts, "2023-01-15", Size::Small, Provider::MondialRelay),
            Quote {
                charged: price("1.90"),
                discount: price("0.10"),
            }
        );
        // The budget is now gone entirely.
        assert_eq!(
            quote(&mut discounts, "2023-01-16", Size::Small, Provider::MondialRelay),
            Quote {
                charged: price("2.00"),
                discount: Price::ZERO,
            }
        );
    }

    #[test]
    fn test_cap_clamps_free_large_shipment() {
        let mut discounts = Discounts::new();
        // Sixteen price-matched small shipments use 8.00 of the budget,
        // leaving 2.00 for the free-large rule.
        for _ in 0..16 {
            quote(&mut discounts, "2023-01-05", Size::Small, Provider::MondialRelay);
        }
        for _ in 0..2 {
            quote(&mut discounts, "2023-01-10", Size::Large, Provider::LaPoste);
        }
        assert_eq!(
            quote(&mut discounts, "2023-01-15", Size::Large, Provider::LaPoste),
            Quote {
                charged: price("4.90"),
                discount: price("2.00"),
            }
        );
    }

    #[test]
    fn test_budget_is_per_month() {
        let mut discounts = Discounts::new();
        for _ in 0..20 {
            quote(&mut discounts, "2023-01-05", Size::Small, Provider::MondialRelay);
        }
        // January's budget is exhausted; February starts fresh.
        assert_eq!(
            quote(&mut discounts, "2023-01-20", Size::Small, Provider::MondialRelay),
            Quote {
                charged: price("2.00"),
                discount: Price::ZERO,
            }
        );
        assert_eq!(
            quote(&mut discounts, "2023-02-01", Size::Small, Provider::MondialRelay),
            Quote {
                charged: price("1.50"),
                discount: price("0.50"),
            }
        );
    }
}
