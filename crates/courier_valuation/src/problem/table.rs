use serde::Serialize;

use super::error::ConfigurationError;

/// How much of the stop (or vehicle) range a [`Table`] is expected to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    /// Every index has an entry, a lookup past the end is a configuration error.
    Required,
    /// Trailing indices may be left out, a lookup past the end means "not configured".
    Sparse,
}

/// A read-only attribute column indexed by stop or vehicle position.
#[derive(Debug, Clone, Serialize)]
pub struct Table<T> {
    name: &'static str,
    coverage: Coverage,
    values: Vec<T>,
}

impl<T> Table<T> {
    pub fn required(name: &'static str, values: Vec<T>) -> Self {
        Table {
            name,
            coverage: Coverage::Required,
            values,
        }
    }

    pub fn sparse(name: &'static str, values: Vec<T>) -> Self {
        Table {
            name,
            coverage: Coverage::Sparse,
            values,
        }
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up `index`, honouring the table coverage.
    ///
    /// `Ok(None)` is only ever returned by sparse tables.
    pub fn lookup(&self, index: usize) -> Result<Option<&T>, ConfigurationError> {
        match (self.values.get(index), self.coverage) {
            (Some(value), _) => Ok(Some(value)),
            (None, Coverage::Sparse) => Ok(None),
            (None, Coverage::Required) => Err(self.out_of_bounds(index)),
        }
    }

    /// Looks up `index` in a table that must have the entry, whatever its coverage.
    pub fn require(&self, index: usize) -> Result<&T, ConfigurationError> {
        self.values
            .get(index)
            .ok_or_else(|| self.out_of_bounds(index))
    }

    fn out_of_bounds(&self, index: usize) -> ConfigurationError {
        ConfigurationError::IndexOutOfBounds {
            table: self.name,
            index,
            len: self.values.len(),
        }
    }
}

impl<T: Copy> Table<T> {
    pub fn get(&self, index: usize) -> Result<Option<T>, ConfigurationError> {
        self.lookup(index).map(|value| value.copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_table_out_of_bounds_is_an_error() {
        let table = Table::required("quantities", vec![1, 2, 3]);

        assert_eq!(table.get(2), Ok(Some(3)));
        assert_eq!(
            table.get(3),
            Err(ConfigurationError::IndexOutOfBounds {
                table: "quantities",
                index: 3,
                len: 3
            })
        );
    }

    #[test]
    fn test_sparse_table_out_of_bounds_is_absent() {
        let table = Table::sparse("target_times", vec![10_i64]);

        assert_eq!(table.get(0), Ok(Some(10)));
        assert_eq!(table.get(5), Ok(None));
    }

    #[test]
    fn test_require_ignores_coverage() {
        let table = Table::sparse("target_times", vec![10_i64]);

        assert!(table.require(0).is_ok());
        assert!(matches!(
            table.require(1),
            Err(ConfigurationError::IndexOutOfBounds { index: 1, .. })
        ));
    }
}
