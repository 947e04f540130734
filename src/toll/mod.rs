/*!
# Tolls

Per-vehicle tolls on top of unrolled distance rows.

[`calculate_toll_rate`] multiplies the distance of every unrolled row with the rate of each
vehicle class ([`VehicleRates`]). [`calculate_time_based_toll_rates`] then rescales those tolls
by a factor depending on the weekday and time of day a trip starts ([`DiscountSchedule`]).
*/

mod discount;
mod rates;

use crate::{error::invalid_input_unless, id::check_distance, prelude::*};

pub use discount::*;
pub use rates::*;
