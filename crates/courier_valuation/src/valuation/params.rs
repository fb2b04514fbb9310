use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{constraint_set::ConstraintSet, vehicle_constraint::ConstraintKind};

use super::{
    plan_aggregator::PlanAggregator,
    terms::{
        duration_cost_term::DurationCostTerm,
        time_window_penalty_term::TimeWindowPenaltyTerm,
        usage_cost_term::UsageCostTerm,
        utilization_term::{DEFAULT_UTILIZATION_SCALE, UtilizationTerm},
        vehicle_value_term::{TermKind, VehicleValueTermType},
    },
    unassigned_penalty::UnassignedPenalty,
    value::Value,
    vehicle_evaluator::VehicleEvaluator,
};

/// Preset configurations, one per known deployment.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValuationTemplate {
    /// No vehicle terms, no constraints, per-stop unassigned weights.
    #[default]
    Default,
    /// Route duration and time-window penalties, LIFO adherence reported.
    CustomizedValue,
    /// Balanced route lengths and at most one large stop per route.
    SizeClassification,
    /// Vehicle usage and duration, one package type per route.
    PackageType,
    /// Vehicle usage and capacity utilization.
    Utilization,
}

impl ValuationTemplate {
    pub fn params(&self) -> ValuationParams {
        let base = ValuationParams {
            terms: vec![],
            constraints: vec![],
            imbalance_weight: 0,
            unassigned_penalty: UnassignedPenalty::PerStop,
            utilization_scale: DEFAULT_UTILIZATION_SCALE,
        };

        match self {
            ValuationTemplate::Default => base,
            ValuationTemplate::CustomizedValue => ValuationParams {
                terms: vec![TermKind::DurationCost, TermKind::TimeWindowPenalty],
                constraints: vec![ConstraintKind::LifoAdherence],
                ..base
            },
            ValuationTemplate::SizeClassification => ValuationParams {
                constraints: vec![ConstraintKind::SingleLargeStop],
                imbalance_weight: 1,
                unassigned_penalty: UnassignedPenalty::Uniform(1),
                ..base
            },
            ValuationTemplate::PackageType => ValuationParams {
                terms: vec![TermKind::UsageCost, TermKind::DurationCost],
                constraints: vec![ConstraintKind::TypeHomogeneity],
                ..base
            },
            ValuationTemplate::Utilization => ValuationParams {
                terms: vec![TermKind::UsageCost, TermKind::Utilization],
                ..base
            },
        }
    }
}

/// Everything needed to assemble the evaluator, the aggregator and the
/// constraint set of an engine.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ValuationParams {
    /// Vehicle value terms; none means every vehicle is worth zero.
    pub terms: Vec<TermKind>,
    pub constraints: Vec<ConstraintKind>,
    /// Charged per unit of difference between the longest and the shortest route.
    pub imbalance_weight: Value,
    pub unassigned_penalty: UnassignedPenalty,
    pub utilization_scale: f64,
}

impl Default for ValuationParams {
    fn default() -> Self {
        ValuationTemplate::Default.params()
    }
}

impl ValuationParams {
    pub fn vehicle_evaluator(&self) -> VehicleEvaluator {
        if self.terms.is_empty() {
            return VehicleEvaluator::Null;
        }

        VehicleEvaluator::Terms(
            self.terms
                .iter()
                .map(|kind| match kind {
                    TermKind::UsageCost => VehicleValueTermType::UsageCost(UsageCostTerm),
                    TermKind::DurationCost => VehicleValueTermType::DurationCost(DurationCostTerm),
                    TermKind::TimeWindowPenalty => {
                        VehicleValueTermType::TimeWindowPenalty(TimeWindowPenaltyTerm)
                    }
                    TermKind::Utilization => VehicleValueTermType::Utilization(
                        UtilizationTerm::new(self.utilization_scale),
                    ),
                })
                .collect(),
        )
    }

    pub fn plan_aggregator(&self) -> PlanAggregator {
        PlanAggregator::new(self.imbalance_weight, self.unassigned_penalty)
    }

    pub fn constraint_set(&self) -> ConstraintSet {
        ConstraintSet::from_kinds(&self.constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null_evaluator() {
        let params = ValuationParams::default();

        assert!(matches!(params.vehicle_evaluator(), VehicleEvaluator::Null));
        assert!(params.constraint_set().is_empty());
        assert_eq!(params.unassigned_penalty, UnassignedPenalty::PerStop);
    }

    #[test]
    fn test_customized_value_template() {
        let params = ValuationTemplate::CustomizedValue.params();
        let evaluator = params.vehicle_evaluator();

        assert_eq!(
            evaluator
                .terms()
                .iter()
                .map(VehicleValueTermType::kind)
                .collect::<Vec<_>>(),
            vec![TermKind::DurationCost, TermKind::TimeWindowPenalty]
        );
        assert_eq!(
            params.constraint_set().constraints()[0].kind(),
            ConstraintKind::LifoAdherence
        );
    }

    #[test]
    fn test_utilization_scale_reaches_term() {
        let params = ValuationParams {
            utilization_scale: 250.0,
            ..ValuationTemplate::Utilization.params()
        };

        let scales = params
            .vehicle_evaluator()
            .terms()
            .iter()
            .filter_map(|term| match term {
                VehicleValueTermType::Utilization(term) => Some(term.scale()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(scales, vec![250.0]);
    }

    #[test]
    fn test_partial_params_fill_defaults() {
        let params: ValuationParams = serde_json::from_str(
            r#"{
                "terms": ["usage_cost"],
                "imbalance_weight": 15,
                "unassigned_penalty": { "policy": "uniform", "weight": 3 }
            }"#,
        )
        .unwrap();

        assert_eq!(params.terms, vec![TermKind::UsageCost]);
        assert!(params.constraints.is_empty());
        assert_eq!(params.imbalance_weight, 15);
        assert_eq!(params.unassigned_penalty, UnassignedPenalty::Uniform(3));
        assert_eq!(params.utilization_scale, DEFAULT_UTILIZATION_SCALE);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ValuationParams>(r#"{"weights": 1}"#).is_err());
    }

    #[test]
    fn test_template_names() {
        let template: ValuationTemplate = serde_json::from_str(r#""size_classification""#).unwrap();
        assert_eq!(template, ValuationTemplate::SizeClassification);
    }
}
