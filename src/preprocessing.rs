use crate::Matrix;
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Expands categorical columns into indicator columns, row count preserved.
pub trait CategoricalEncoder {
    /// Fits on `data` and returns its encoded form.
    fn encode(&self, data: &Matrix) -> Result<Matrix>;
}

/// One indicator column per distinct value of each input column.
///
/// Categories are the sorted distinct values seen during `fit`; a value not
/// seen then is rejected by `transform`.
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    categories: Option<Vec<Vec<f64>>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self { categories: None }
    }

    pub fn categories(&self) -> Option<&[Vec<f64>]> {
        self.categories.as_deref()
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::Collaborator(
                "one-hot encoder needs at least one sample and one feature".to_string(),
            ));
        }

        let mut categories = Vec::with_capacity(data.ncols());
        for column in data.columns() {
            if column.iter().any(|v| v.is_nan()) {
                return Err(Error::Collaborator(
                    "one-hot encoder cannot encode NaN values".to_string(),
                ));
            }
            let mut values: Vec<f64> = column.to_vec();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            values.dedup();
            categories.push(values);
        }

        self.categories = Some(categories);
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let categories = self.categories.as_ref().ok_or_else(|| {
            Error::Collaborator("encoder not fitted. Call fit() first.".to_string())
        })?;

        if data.ncols() != categories.len() {
            return Err(Error::Collaborator(format!(
                "Number of features in X ({}) doesn't match training data ({})",
                data.ncols(),
                categories.len()
            )));
        }

        let width: usize = categories.iter().map(Vec::len).sum();
        let mut encoded = Matrix::zeros((data.nrows(), width));

        let mut offset = 0;
        for (j, values) in categories.iter().enumerate() {
            for (i, &value) in data.column(j).iter().enumerate() {
                let slot = values
                    .binary_search_by(|known| known.partial_cmp(&value).unwrap_or(Ordering::Less))
                    .map_err(|_| {
                        Error::Collaborator(format!(
                            "unknown category {} in column {}",
                            value, j
                        ))
                    })?;
                encoded[[i, offset + slot]] = 1.0;
            }
            offset += values.len();
        }

        Ok(encoded)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }
}

impl CategoricalEncoder for OneHotEncoder {
    fn encode(&self, data: &Matrix) -> Result<Matrix> {
        OneHotEncoder::new().fit_transform(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_one_hot_expands_columns() {
        let data = array![[0.0, 2.0], [1.0, 3.0], [2.0, 2.0]];
        let mut encoder = OneHotEncoder::new();

        let encoded = encoder.fit_transform(&data).unwrap();
        assert_eq!(encoded.shape(), &[3, 5]);
        assert_eq!(encoded.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(encoded.row(1).to_vec(), vec![0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(encoded.row(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_rows_sum_to_column_count() {
        let data = array![[5.0, 1.0, 9.0], [4.0, 1.0, 8.0], [5.0, 0.0, 7.0], [3.0, 0.0, 9.0]];
        let mut encoder = OneHotEncoder::new();

        let encoded = encoder.fit_transform(&data).unwrap();
        for row in encoded.rows() {
            assert_eq!(row.sum(), 3.0);
        }
    }

    #[test]
    fn test_encode_preserves_rows() {
        let data = array![[1.0, 0.0], [2.0, 0.0], [1.0, 1.0], [3.0, 1.0]];

        let encoded = OneHotEncoder::new().encode(&data).unwrap();
        assert_eq!(encoded.nrows(), data.nrows());
        assert!(encoded.ncols() > data.ncols());
    }

    #[test]
    fn test_one_hot_unknown_category() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&array![[0.0], [1.0]]).unwrap();

        assert!(encoder.transform(&array![[2.0]]).is_err());
    }

    #[test]
    fn test_one_hot_transform_without_fit() {
        let encoder = OneHotEncoder::new();
        assert!(encoder.transform(&array![[0.0]]).is_err());
    }
}
