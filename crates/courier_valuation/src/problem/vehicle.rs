use serde::Serialize;

use crate::{
    define_index_newtype,
    problem::{error::ConfigurationError, time_window::TimeWindow},
};

define_index_newtype!(VehicleIdx);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    shift: TimeWindow,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn shift(&self) -> &TimeWindow {
        &self.shift
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    shift: Option<TimeWindow>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, external_id: impl Into<String>) -> &mut VehicleBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_shift(&mut self, shift: TimeWindow) -> &mut VehicleBuilder {
        self.shift = Some(shift);
        self
    }

    pub fn build(self) -> Result<Vehicle, ConfigurationError> {
        Ok(Vehicle {
            external_id: self
                .external_id
                .ok_or(ConfigurationError::MissingField("vehicle.id"))?,
            shift: self.shift.unwrap_or_default(),
        })
    }
}
