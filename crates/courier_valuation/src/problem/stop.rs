use geo::Point;
use serde::Serialize;

use crate::{define_index_newtype, problem::error::ConfigurationError};

define_index_newtype!(StopIdx);

const LARGE_CLASSIFICATION: &str = "large";

#[derive(Serialize, Debug, Clone)]
pub struct Stop {
    external_id: String,
    position: Point,
    classification: Option<String>,
    lifo: bool,
    precedence_partner: Option<StopIdx>,
}

impl Stop {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    /// Case-insensitive match against the "large" classification.
    pub fn is_large(&self) -> bool {
        self.classification
            .as_deref()
            .is_some_and(|label| label.eq_ignore_ascii_case(LARGE_CLASSIFICATION))
    }

    /// Whether the stop has to be unloaded last-in-first-out.
    pub fn is_lifo(&self) -> bool {
        self.lifo
    }

    /// The drop-off paired with this stop, if any.
    pub fn precedence_partner(&self) -> Option<StopIdx> {
        self.precedence_partner
    }

    pub(crate) fn set_precedence_partner(&mut self, partner: StopIdx) {
        self.precedence_partner = Some(partner);
    }
}

#[derive(Default)]
pub struct StopBuilder {
    external_id: Option<String>,
    position: Option<Point>,
    classification: Option<String>,
    lifo: bool,
}

impl StopBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut StopBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_position(&mut self, lon: f64, lat: f64) -> &mut StopBuilder {
        self.position = Some(Point::new(lon, lat));
        self
    }

    pub fn set_classification(&mut self, classification: impl Into<String>) -> &mut StopBuilder {
        self.classification = Some(classification.into());
        self
    }

    pub fn set_lifo(&mut self, lifo: bool) -> &mut StopBuilder {
        self.lifo = lifo;
        self
    }

    pub fn build(self) -> Result<Stop, ConfigurationError> {
        Ok(Stop {
            external_id: self
                .external_id
                .ok_or(ConfigurationError::MissingField("stop.id"))?,
            position: self.position.unwrap_or_else(|| Point::new(0.0, 0.0)),
            classification: self.classification,
            lifo: self.lifo,
            precedence_partner: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_with(classification: &str) -> Stop {
        let mut builder = StopBuilder::default();
        builder
            .set_external_id("s")
            .set_classification(classification);
        builder.build().unwrap()
    }

    #[test]
    fn test_is_large_ignores_case() {
        assert!(stop_with("large").is_large());
        assert!(stop_with("Large").is_large());
        assert!(stop_with("LARGE").is_large());
        assert!(!stop_with("small").is_large());
        assert!(!stop_with("larger").is_large());
    }

    #[test]
    fn test_missing_id() {
        let builder = StopBuilder::default();
        assert_eq!(
            builder.build().unwrap_err(),
            ConfigurationError::MissingField("stop.id")
        );
    }
}
