use courier_valuation::valuation::params::ValuationTemplate;

/// Accepts template names in snake or kebab case, e.g. `size-classification`.
pub fn parse_template(input: &str) -> Result<ValuationTemplate, String> {
    serde_json::from_value(serde_json::Value::String(input.replace('-', "_")))
        .map_err(|_| format!("Invalid template {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        assert_eq!(
            parse_template("customized_value"),
            Ok(ValuationTemplate::CustomizedValue)
        );
        assert_eq!(
            parse_template("package-type"),
            Ok(ValuationTemplate::PackageType)
        );
        assert!(parse_template("fastest").is_err());
    }
}
