use crate::math::matrix::Matrix;

/// Numerically stable softmax: shifts by the largest component before
/// exponentiating, then normalizes by the sum of exponentials.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Row-wise softmax over a batch: each row is one sample and is normalized
/// independently against its own maximum.
pub fn softmax_rows(batch: &Matrix) -> Matrix {
    Matrix {
        rows: batch.rows,
        cols: batch.cols,
        data: batch.data.iter().map(|row| softmax(row)).collect(),
    }
}
