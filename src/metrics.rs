use crate::Vector;
use crate::error::{Error, Result};

/// Area under the ROC curve for binary labels in {0, 1}.
///
/// Computed from the rank sum of the positive class, tied scores sharing
/// their average rank.
pub fn roc_auc_score(y_true: &Vector, y_score: &Vector) -> Result<f64> {
    if y_true.len() != y_score.len() {
        return Err(Error::Collaborator(
            "y_true and y_score must have the same length".to_string(),
        ));
    }

    for &label in y_true.iter() {
        if label != 0.0 && label != 1.0 {
            return Err(Error::Collaborator(
                "Labels must be 0 or 1 for ROC AUC".to_string(),
            ));
        }
    }

    let n_pos = y_true.iter().filter(|&&y| y == 1.0).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(Error::Collaborator(
            "ROC AUC is undefined when only one class is present".to_string(),
        ));
    }

    if y_score.iter().any(|s| !s.is_finite()) {
        return Err(Error::Collaborator("non-finite decision score".to_string()));
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    let mut ranks = vec![0.0; order.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && y_score[order[end]] == y_score[order[start]] {
            end += 1;
        }
        // ranks are 1-based; a tie group gets the mean of its positions
        let average = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average;
        }
        start = end;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(y, _)| **y == 1.0)
        .map(|(_, r)| r)
        .sum();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_roc_auc_perfect() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_score = array![0.1, 0.2, 0.8, 0.9];

        let auc = roc_auc_score(&y_true, &y_score).unwrap();
        assert!((auc - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_roc_auc_inverted() {
        let y_true = array![1.0, 1.0, 0.0, 0.0];
        let y_score = array![0.1, 0.2, 0.8, 0.9];

        let auc = roc_auc_score(&y_true, &y_score).unwrap();
        assert!(auc.abs() < 1e-10);
    }

    #[test]
    fn test_roc_auc_known_value() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_score = array![0.1, 0.4, 0.35, 0.8];

        let auc = roc_auc_score(&y_true, &y_score).unwrap();
        assert!((auc - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_roc_auc_ties_count_half() {
        let y_true = array![0.0, 1.0];
        let y_score = array![0.5, 0.5];

        let auc = roc_auc_score(&y_true, &y_score).unwrap();
        assert!((auc - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_roc_auc_single_class() {
        let y_true = array![1.0, 1.0];
        let y_score = array![0.3, 0.7];

        assert!(roc_auc_score(&y_true, &y_score).is_err());
    }

    #[test]
    fn test_roc_auc_length_mismatch() {
        let y_true = array![0.0, 1.0];
        let y_score = array![0.3];

        assert!(roc_auc_score(&y_true, &y_score).is_err());
    }

    #[test]
    fn test_roc_auc_rejects_nan_scores() {
        let y_true = Vector::from_shape_fn(100, |i| (i % 2) as f64);
        let y_score = Vector::from_shape_fn(100, |i| if i % 3 == 0 { f64::NAN } else { i as f64 });

        let err = roc_auc_score(&y_true, &y_score).unwrap_err();
        assert!(matches!(err, Error::Collaborator(_)));
    }

    #[test]
    fn test_roc_auc_rejects_infinite_scores() {
        let y_true = array![0.0, 1.0, 0.0, 1.0];
        let y_score = array![0.1, f64::INFINITY, 0.2, 0.9];

        assert!(roc_auc_score(&y_true, &y_score).is_err());
    }
}
