use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::ops::{Index, IndexMut};

use crate::error::{NetworkError, Result};

/// Dense row-major matrix. A weight matrix for the crossing into layer `l`
/// has `rows = shape[l]` and `cols = shape[l - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples every entry uniformly from `[-bound, +bound]`.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, bound: f64, rng: &mut R) -> Matrix {
        let dist = Uniform::new_inclusive(-bound, bound);
        let mut res = Matrix::zeros(rows, cols);

        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                *value = dist.sample(rng);
            }
        }

        res
    }

    /// Builds a matrix from row vectors. Rows must be non-empty and of equal length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        if data.is_empty() || cols == 0 {
            return Err(NetworkError::Configuration("matrix must have at least one row and column".into()));
        }
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NetworkError::mismatch("matrix row", cols, bad.len()));
        }

        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    pub fn fill(&mut self, value: f64) {
        for row in self.data.iter_mut() {
            row.iter_mut().for_each(|x| *x = value);
        }
    }

    /// `self · v`. The caller guarantees `v.len() == self.cols`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        self.data.iter()
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// `selfᵀ · v` without materializing the transpose.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows);
        let mut res = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(v) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += w * scale;
            }
        }
        res
    }

    /// Accumulates the outer product `col · rowᵀ` into `self`.
    pub fn add_outer(&mut self, col: &[f64], row: &[f64]) {
        debug_assert_eq!(col.len(), self.rows);
        debug_assert_eq!(row.len(), self.cols);
        for (dst, &c) in self.data.iter_mut().zip(col) {
            for (d, r) in dst.iter_mut().zip(row) {
                *d += c * r;
            }
        }
    }

    /// `self -= scale * other`, element-wise.
    pub fn scaled_sub_assign(&mut self, other: &Matrix, scale: f64) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (dst, src) in self.data.iter_mut().zip(&other.data) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d -= scale * s;
            }
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i][j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i][j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Matrix {
        Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn mul_vec_and_transpose_mul_vec() {
        let m = sample();
        assert_eq!(m.mul_vec(&[1.0, 0.0, -1.0]), vec![-2.0, -2.0]);
        assert_eq!(m.transpose_mul_vec(&[1.0, 1.0]), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn add_outer_accumulates() {
        let mut m = Matrix::zeros(2, 2);
        m.add_outer(&[1.0, 2.0], &[3.0, 4.0]);
        m.add_outer(&[1.0, 0.0], &[1.0, 1.0]);
        assert_eq!(m.data, vec![vec![4.0, 5.0], vec![6.0, 8.0]]);
    }

    #[test]
    fn scaled_sub_assign_applies_step() {
        let mut m = sample();
        let g = Matrix::from_data(vec![vec![10.0; 3], vec![20.0; 3]]).unwrap();
        m.scaled_sub_assign(&g, 0.1);
        assert_eq!(m[(0, 0)], 0.0);
        assert_eq!(m[(1, 2)], 4.0);
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, NetworkError::mismatch("matrix row", 2, 1));
        assert!(Matrix::from_data(vec![]).is_err());
    }

    #[test]
    fn uniform_respects_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        let m = Matrix::uniform(20, 30, 0.25, &mut rng);
        assert!(m.data.iter().flatten().all(|x| x.abs() <= 0.25));
        assert!(m.data.iter().flatten().any(|x| *x != 0.0));
    }
}
