use crate::error::{NetworkError, Result};
use crate::network::shape::LayerShape;

/// Training and test samples as supplied by a data source.
///
/// Inputs are flat vectors scaled to [0, 1] (not centered); labels are
/// one-hot vectors. Each split keeps its inputs and labels aligned by index.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train_inputs: Vec<Vec<f64>>,
    pub train_labels: Vec<Vec<f64>>,
    pub test_inputs:  Vec<Vec<f64>>,
    pub test_labels:  Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(
        train_inputs: Vec<Vec<f64>>,
        train_labels: Vec<Vec<f64>>,
        test_inputs: Vec<Vec<f64>>,
        test_labels: Vec<Vec<f64>>,
    ) -> Result<Dataset> {
        if train_inputs.is_empty() || test_inputs.is_empty() {
            return Err(NetworkError::InvalidData("training and test sets must be non-empty".into()));
        }
        if train_inputs.len() != train_labels.len() {
            return Err(NetworkError::InvalidData(format!(
                "{} training inputs but {} training labels",
                train_inputs.len(),
                train_labels.len()
            )));
        }
        if test_inputs.len() != test_labels.len() {
            return Err(NetworkError::InvalidData(format!(
                "{} test inputs but {} test labels",
                test_inputs.len(),
                test_labels.len()
            )));
        }

        Ok(Dataset { train_inputs, train_labels, test_inputs, test_labels })
    }

    /// Number of training samples, `N`.
    pub fn train_len(&self) -> usize {
        self.train_inputs.len()
    }

    pub fn test_len(&self) -> usize {
        self.test_inputs.len()
    }

    /// Checks that every input matches the input layer and every label the
    /// output layer of `shape`.
    pub fn check_shape(&self, shape: &LayerShape) -> Result<()> {
        let mut inputs = self.train_inputs.iter().chain(&self.test_inputs);
        if let Some(x) = inputs.find(|x| x.len() != shape.input_size()) {
            return Err(NetworkError::mismatch("dataset input", shape.input_size(), x.len()));
        }
        let mut labels = self.train_labels.iter().chain(&self.test_labels);
        if let Some(y) = labels.find(|y| y.len() != shape.output_size()) {
            return Err(NetworkError::mismatch("dataset label", shape.output_size(), y.len()));
        }
        Ok(())
    }
}

/// Scales raw 8-bit pixel intensities from [0, 255] to [0.0, 1.0].
pub fn scale_pixels(raw: &[u8]) -> Vec<f64> {
    raw.iter().map(|&p| p as f64 / 255.0).collect()
}

/// One-hot encodes `label` over `classes` outputs.
pub fn one_hot(label: usize, classes: usize) -> Result<Vec<f64>> {
    if label >= classes {
        return Err(NetworkError::InvalidData(format!(
            "label {label} out of range for {classes} classes"
        )));
    }
    let mut v = vec![0.0; classes];
    v[label] = 1.0;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_misaligned_splits() {
        let x = vec![vec![0.0; 2]; 3];
        let y = vec![vec![1.0, 0.0]; 2];
        assert!(matches!(
            Dataset::new(x.clone(), y.clone(), vec![], vec![]),
            Err(NetworkError::InvalidData(_))
        ));
        assert!(matches!(
            Dataset::new(vec![], vec![], x, y),
            Err(NetworkError::InvalidData(_))
        ));
    }

    #[test]
    fn check_shape_reports_first_bad_sample() {
        let shape = LayerShape::new(vec![2, 3, 2]).unwrap();
        let data = Dataset::new(
            vec![vec![0.0, 1.0]],
            vec![vec![1.0, 0.0]],
            vec![vec![0.0, 1.0, 0.5]],
            vec![vec![0.0, 1.0]],
        ).unwrap();
        assert_eq!((data.train_len(), data.test_len()), (1, 1));
        assert_eq!(
            data.check_shape(&shape),
            Err(NetworkError::mismatch("dataset input", 2, 3))
        );
    }

    #[test]
    fn pixel_and_label_helpers() {
        assert_eq!(scale_pixels(&[0, 255, 51]), vec![0.0, 1.0, 0.2]);
        assert_eq!(one_hot(2, 4).unwrap(), vec![0.0, 0.0, 1.0, 0.0]);
        assert!(one_hot(4, 4).is_err());
    }
}
