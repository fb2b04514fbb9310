use schemars::schema_for;

use crate::json::types;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonValuationInput))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_input() {
        let schema: serde_json::Value =
            serde_json::from_str(&generate_json_schema().unwrap()).unwrap();

        assert_eq!(schema["title"], "ValuationInput");
        assert!(schema["properties"]["stops"].is_object());
        assert!(schema["properties"]["plan"].is_object());
    }
}
