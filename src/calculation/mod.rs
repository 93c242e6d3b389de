//! Calculation logic for the quote engine.
//!
//! This module contains all the calculation functions for quoting a move,
//! including the labor-duration estimate, volume, distance and labor cost,
//! floor surcharges, add-on service and heavy-item surcharges, calendar
//! classification, regional/seasonal/weekend multipliers, currency rounding
//! and the final price aggregation.

mod arithmetic;
mod calendar;
mod distance_cost;
mod duration;
mod floor_surcharge;
mod heavy_items;
mod labor_cost;
mod line_items;
mod multipliers;
mod quote;
mod rounding;
mod services;
mod volume_cost;

pub use calendar::{
    DayCategory, GERMAN_PUBLIC_HOLIDAYS, day_category, german_holiday, is_weekend,
};
pub use distance_cost::{
    DISTANCE_BAND_LOWER, DISTANCE_BAND_UPPER, DistanceCostResult, calculate_distance_cost,
};
pub use duration::{
    DurationResult, MIN_MAN_HOURS, MAN_HOURS_PER_M3, MANDATORY_BREAK_HOURS,
    MANDATORY_BREAK_THRESHOLD_HOURS, TRUCK_TRAVEL_FACTOR, calculate_duration,
    crew_size_for_volume,
};
pub use floor_surcharge::{
    FLOOR_SURCHARGE_FREE_FLOORS, FloorSurchargeResult, calculate_floor_surcharge,
    surcharged_floors,
};
pub use heavy_items::{
    HEAVY_ITEM_KEYWORDS, HeavyItemResult, calculate_heavy_item_surcharges, classify_item,
};
pub use labor_cost::{LaborCostResult, calculate_labor_cost};
pub use line_items::{
    EXTERNAL_LIFT_SUGGESTION_FLOOR, LARGE_MOVE_LIFT_SUGGESTION_FLOOR,
    LARGE_MOVE_LIFT_SUGGESTION_VOLUME, LineItemsResult, calculate_line_items,
    should_suggest_external_lift,
};
pub use multipliers::{
    MultiplierResult, RegionalMatch, calendar_multiplier, match_region, regional_multiplier,
    resolve_multipliers, seasonal_multiplier,
};
pub use quote::{PriceAggregationResult, aggregate_price, quote};
pub use rounding::{CURRENCY_DECIMAL_PLACES, round_currency, round_range};
pub use services::{
    LONG_CARRY_FREE_METERS, LONG_CARRY_INCREMENT_METERS, ServiceSurchargeResult,
    calculate_service_surcharges, insurance_price, long_carry_increments,
};
pub use volume_cost::{VolumeCostResult, calculate_volume_cost};
