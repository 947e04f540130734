use std::fmt;

use log::debug;

use super::*;

/// The vehicle classes of the toll tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vehicle {
    Moto,
    Car,
    Rv,
    Bus,
    Truck,
}

impl Vehicle {
    /// All vehicle classes in column order
    pub const ALL: [Vehicle; 5] = [
        Vehicle::Moto,
        Vehicle::Car,
        Vehicle::Rv,
        Vehicle::Bus,
        Vehicle::Truck,
    ];

    /// Column name of the vehicle class
    pub fn name(&self) -> &'static str {
        match self {
            Vehicle::Moto => "moto",
            Vehicle::Car => "car",
            Vehicle::Rv => "rv",
            Vehicle::Bus => "bus",
            Vehicle::Truck => "truck",
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `f64` per vehicle class.
/// Used both for rate coefficients ([`VehicleRates`]) and for computed tolls ([`VehicleTolls`]).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerVehicle {
    pub moto: f64,
    pub car: f64,
    pub rv: f64,
    pub bus: f64,
    pub truck: f64,
}

/// Toll coefficients per distance unit
pub type VehicleRates = PerVehicle;

/// Tolls of a single route segment
pub type VehicleTolls = PerVehicle;

impl Default for PerVehicle {
    /// The rates of the toll dataset: moto `0.8`, car `1.2`, rv `1.5`, bus `2.2`, truck `3.6`
    fn default() -> Self {
        Self {
            moto: 0.8,
            car: 1.2,
            rv: 1.5,
            bus: 2.2,
            truck: 3.6,
        }
    }
}

impl PerVehicle {
    /// Creates the default rates
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the same value for every vehicle class
    pub fn uniform(x: f64) -> Self {
        Self {
            moto: x,
            car: x,
            rv: x,
            bus: x,
            truck: x,
        }
    }

    /// Updates the value of a single vehicle class
    pub fn rate(mut self, vehicle: Vehicle, x: f64) -> Self {
        *self.get_mut(vehicle) = x;
        self
    }

    /// Returns the value of a vehicle class
    pub fn get(&self, vehicle: Vehicle) -> f64 {
        match vehicle {
            Vehicle::Moto => self.moto,
            Vehicle::Car => self.car,
            Vehicle::Rv => self.rv,
            Vehicle::Bus => self.bus,
            Vehicle::Truck => self.truck,
        }
    }

    fn get_mut(&mut self, vehicle: Vehicle) -> &mut f64 {
        match vehicle {
            Vehicle::Moto => &mut self.moto,
            Vehicle::Car => &mut self.car,
            Vehicle::Rv => &mut self.rv,
            Vehicle::Bus => &mut self.bus,
            Vehicle::Truck => &mut self.truck,
        }
    }

    /// Returns an iterator over `(vehicle, value)` in column order
    pub fn iter(&self) -> impl Iterator<Item = (Vehicle, f64)> + '_ {
        Vehicle::ALL.into_iter().map(|v| (v, self.get(v)))
    }

    /// Multiplies every value by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            moto: self.moto * factor,
            car: self.car * factor,
            rv: self.rv * factor,
            bus: self.bus * factor,
            truck: self.truck * factor,
        }
    }

    /// Returns `Err(Error::InvalidInput)` if a value is negative or not finite
    pub fn validate(&self) -> Result<()> {
        for (vehicle, x) in self.iter() {
            invalid_input_unless!(
                x.is_finite() && x >= 0.0,
                "Value {x} of {vehicle} is not a finite non-negative number"
            );
        }
        Ok(())
    }
}

/// An unrolled row together with the tolls of every vehicle class
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TollRow<I = Id> {
    pub id_start: I,
    pub id_end: I,
    pub distance: Distance,
    pub tolls: VehicleTolls,
}

/// Computes `distance * rate` for every vehicle class and row.
///
/// Rows without a direct edge (`distance: None`) carry no toll and are skipped; all other rows
/// keep their order.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if a rate or a distance is negative or not finite.
///
/// # Example
/// ```
/// use tollgraph::{prelude::*, toll::*};
///
/// let rows = vec![
///     UnrolledEdge::new(1u64, 2, Some(10.0)),
///     UnrolledEdge::new(1, 3, None),
/// ];
///
/// let tolls = calculate_toll_rate(&rows, &VehicleRates::default()).unwrap();
/// assert_eq!(tolls.len(), 1);
/// assert_eq!(tolls[0].tolls.car, 12.0);
/// ```
pub fn calculate_toll_rate<I: Identifier>(
    rows: &[UnrolledEdge<I>],
    rates: &VehicleRates,
) -> Result<Vec<TollRow<I>>> {
    rates.validate()?;

    let mut tolls = Vec::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        let Some(d) = row.distance else {
            continue;
        };
        let distance = check_distance(d, || format!("row #{pos}"))?;

        tolls.push(TollRow {
            id_start: row.id_start.clone(),
            id_end: row.id_end.clone(),
            distance,
            tolls: rates.scaled(distance),
        });
    }

    debug!(
        "Computed tolls for {} of {} rows",
        tolls.len(),
        rows.len()
    );
    Ok(tolls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates() {
        let rates = VehicleRates::default();
        assert_eq!(rates.get(Vehicle::Moto), 0.8);
        assert_eq!(rates.get(Vehicle::Truck), 3.6);
        assert_eq!(
            rates.iter().map(|(v, _)| v.name()).collect::<Vec<_>>(),
            vec!["moto", "car", "rv", "bus", "truck"]
        );

        let rates = rates.rate(Vehicle::Bus, 3.0);
        assert_eq!(rates.bus, 3.0);
        assert!(rates.validate().is_ok());

        assert!(rates.rate(Vehicle::Rv, -1.0).validate().is_err());
        assert!(VehicleRates::uniform(f64::NAN).validate().is_err());
    }

    #[test]
    fn tolls() {
        let rows = vec![
            UnrolledEdge::new(1001400u64, 1001402, Some(10.0)),
            UnrolledEdge::new(1001400, 1001404, None),
            UnrolledEdge::new(1001402, 1001400, Some(10.0)),
            UnrolledEdge::new(1001402, 1001404, Some(0.0)),
        ];

        let tolls = calculate_toll_rate(&rows, &VehicleRates::uniform(2.0)).unwrap();
        assert_eq!(tolls.len(), 3);
        assert_eq!(
            tolls.iter().map(|t| (t.id_start, t.id_end)).collect::<Vec<_>>(),
            vec![(1001400, 1001402), (1001402, 1001400), (1001402, 1001404)]
        );
        assert_eq!(tolls[0].tolls, VehicleTolls::uniform(20.0));
        assert_eq!(tolls[2].tolls, VehicleTolls::uniform(0.0));
        assert_eq!(tolls[1].distance, 10.0);
    }

    #[test]
    fn toll_errors() {
        let rows = vec![UnrolledEdge::new(1u64, 2, Some(-1.0))];
        assert!(matches!(
            calculate_toll_rate(&rows, &VehicleRates::default()),
            Err(Error::InvalidInput(_))
        ));

        let rows = vec![UnrolledEdge::new(1u64, 2, Some(1.0))];
        assert!(matches!(
            calculate_toll_rate(&rows, &VehicleRates::uniform(f64::INFINITY)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn from_matrix() {
        use crate::algo::Unroll;

        let matrix = DistanceMatrix::from_edges([(1u64, 2, 5.0), (2, 3, 2.5)]).unwrap();
        let tolls = calculate_toll_rate(&matrix.unrolled(), &VehicleRates::default()).unwrap();

        // (1,3) and (3,1) have no direct edge
        assert_eq!(tolls.len(), 4);
        assert_eq!(tolls[0].tolls.car, 6.0);
        assert_eq!(tolls[3].tolls.truck, 9.0);
    }
}
