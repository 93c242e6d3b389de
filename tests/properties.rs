//! Property tests for the quote engine.
//!
//! These run the engine directly against the shipped default rates with
//! generated moves and check the invariants every quote must satisfy.

use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use quote_engine::calculation::quote;
use quote_engine::config::{ConfigLoader, RateConfiguration};
use quote_engine::models::{Leg, LineItemKind, MoveFacts, PriceRange, Service};

fn default_rates(date: NaiveDate) -> &'static RateConfiguration {
    static LOADER: OnceLock<ConfigLoader> = OnceLock::new();
    LOADER
        .get_or_init(|| ConfigLoader::load("./config").expect("Failed to load config"))
        .rate_configuration("default", date)
        .expect("default tenant has rates")
}

fn first_rate_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn volume() -> impl Strategy<Value = Decimal> {
    (0i64..20_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn leg() -> impl Strategy<Value = Leg> {
    (0i32..9, any::<bool>()).prop_map(|(floor, has_elevator)| Leg {
        floor,
        has_elevator,
        postal_code: None,
    })
}

prop_compose! {
    fn move_facts()(
        volume_m3 in volume(),
        distance in 0i64..1_000,
        travel_tenths in 0i64..100,
        origin in leg(),
        destination in leg(),
        day in 0u64..730,
        hvz in any::<bool>(),
        packing in any::<bool>(),
        lift in any::<bool>(),
    ) -> MoveFacts {
        let mut services = Vec::new();
        if hvz {
            services.push(Service::HvzPermit);
        }
        if packing {
            services.push(Service::Packing);
        }
        if lift {
            services.push(Service::ExternalLift);
        }
        MoveFacts {
            volume_m3,
            distance_km: Decimal::from(distance),
            base_travel_hours: Decimal::new(travel_tenths, 1),
            origin,
            destination,
            move_date: first_rate_day().checked_add_days(Days::new(day)),
            services,
            ..MoveFacts::default()
        }
    }
}

fn is_ordered(range: &PriceRange) -> bool {
    range.min <= range.max
}

proptest! {
    #[test]
    fn test_larger_volume_never_costs_less(
        facts in move_facts(),
        extra in volume(),
    ) {
        let config = default_rates(facts.move_date.unwrap());
        let larger = MoveFacts { volume_m3: facts.volume_m3 + extra, ..facts.clone() };

        let small = quote(&facts, config).unwrap();
        let large = quote(&larger, config).unwrap();

        for kind in [LineItemKind::Volume, LineItemKind::Labor] {
            let a = small.line_items.total_for(kind);
            let b = large.line_items.total_for(kind);
            prop_assert!(a.min <= b.min && a.max <= b.max, "{:?}: {:?} > {:?}", kind, a, b);
        }
        prop_assert!(small.duration.man_hours <= large.duration.man_hours);
        prop_assert!(small.price.net.min <= large.price.net.min);
        prop_assert!(small.price.net.max <= large.price.net.max);
    }

    #[test]
    fn test_every_range_is_ordered(facts in move_facts()) {
        let result = quote(&facts, default_rates(facts.move_date.unwrap())).unwrap();

        for item in result.line_items.items() {
            prop_assert!(is_ordered(&item.amount), "{:?}", item);
        }
        prop_assert!(is_ordered(&result.price.net));
        prop_assert!(is_ordered(&result.price.vat));
        prop_assert!(is_ordered(&result.price.gross));
    }

    #[test]
    fn test_quote_is_deterministic(facts in move_facts()) {
        let config = default_rates(facts.move_date.unwrap());

        let first = serde_json::to_string(&quote(&facts, config).unwrap()).unwrap();
        let second = serde_json::to_string(&quote(&facts, config).unwrap()).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_line_items_sum_exactly(facts in move_facts()) {
        let result = quote(&facts, default_rates(facts.move_date.unwrap())).unwrap();

        let sum: PriceRange = result.line_items.items().iter().map(|item| item.amount).sum();
        prop_assert_eq!(sum, result.price.line_items_total);
        prop_assert_eq!(sum, result.line_items.total());
    }

    #[test]
    fn test_gross_is_net_plus_vat_within_a_cent(facts in move_facts()) {
        let price = quote(&facts, default_rates(facts.move_date.unwrap())).unwrap().price;
        let cent = Decimal::new(1, 2);

        prop_assert!((price.net.min + price.vat.min - price.gross.min).abs() <= cent);
        prop_assert!((price.net.max + price.vat.max - price.gross.max).abs() <= cent);
    }

    #[test]
    fn test_duration_totals_add_up(facts in move_facts()) {
        let duration = quote(&facts, default_rates(facts.move_date.unwrap())).unwrap().duration;

        prop_assert!(duration.man_hours >= Decimal::from(4));
        prop_assert_eq!(duration.total_hours, duration.loading_hours + duration.travel_hours);
        prop_assert_eq!(
            duration.loading_hours,
            duration.man_hours / Decimal::from(duration.crew_size)
        );
    }
}
