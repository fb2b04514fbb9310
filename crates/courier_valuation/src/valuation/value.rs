/// Objective contributions are integers; lower is better.
pub type Value = i64;

/// Truncates a floating point term toward zero.
///
/// Saturates at the `Value` range and maps NaN to zero, which is how an `as`
/// cast behaves.
pub fn truncate(value: f64) -> Value {
    value.trunc() as Value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_toward_zero() {
        assert_eq!(truncate(2.9), 2);
        assert_eq!(truncate(-2.9), -2);
        assert_eq!(truncate(0.0), 0);
        assert_eq!(truncate(f64::NAN), 0);
    }
}
