use crate::problem::error::ConfigurationError;

use super::vehicle_value_term::{TermBreakdown, TermContext, VehicleValueTerm};

/// Charges the vehicle initialization cost once the route visits a stop.
#[derive(Debug, Clone, Default)]
pub struct UsageCostTerm;

impl VehicleValueTerm for UsageCostTerm {
    fn accumulate(
        &self,
        context: &TermContext,
        breakdown: &mut TermBreakdown,
    ) -> Result<(), ConfigurationError> {
        if context.route.is_empty() {
            return Ok(());
        }

        let cost = context
            .problem
            .initialization_cost(context.route.vehicle_id())?;
        breakdown.usage = breakdown.usage.saturating_add(cost);

        Ok(())
    }
}
