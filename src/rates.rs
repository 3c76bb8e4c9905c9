use crate::price::Price;
use crate::shipment::{Provider, Size};

/// One carrier's price list, one price per size bracket.
#[derive(Debug, Clone, Copy)]
struct CarrierRates {
    small: Price,
    medium: Price,
    large: Price,
}

impl CarrierRates {
    fn price_for(&self, size: Size) -> Price {
        match size {
            Size::Small => self.small,
            Size::Medium => self.medium,
            Size::Large => self.large,
        }
    }
}

/// The fixed carrier/size price matrix. The cheapest small-package rate is
/// precomputed at construction since every small shipment is matched
/// against it.
#[derive(Debug)]
pub struct RateTable {
    la_poste: CarrierRates,
    mondial_relay: CarrierRates,
    cheapest_small: Price,
}

impl RateTable {
    /// The published rates.
    pub fn standard() -> Self {
        Self::new(
            CarrierRates {
                small: Price::from_cents(150),
                medium: Price::from_cents(490),
                large: Price::from_cents(690),
            },
            CarrierRates {
                small: Price::from_cents(200),
                medium: Price::from_cents(300),
                large: Price::from_cents(400),
            },
        )
    }

    fn new(la_poste: CarrierRates, mondial_relay: CarrierRates) -> Self {
        let cheapest_small = la_poste.small.min(mondial_relay.small);
        Self {
            la_poste,
            mondial_relay,
            cheapest_small,
        }
    }

    /// Base price for a shipment, before any discount.
    pub fn price_for(&self, provider: Provider, size: Size) -> Price {
        match provider {
            Provider::LaPoste => self.la_poste.price_for(size),
            Provider::MondialRelay => self.mondial_relay.price_for(size),
        }
    }

    /// The lowest small-package price across all carriers.
    pub fn cheapest_small(&self) -> Price {
        self.cheapest_small
    }
}
