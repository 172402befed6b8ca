use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use backprop_nn::{ActivationFunction, LayerShape, Matrix, Network, NetworkError};

fn random_input(len: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..len).map(|_| rng.gen::<f64>()).collect()
}

fn tiny_network() -> Network {
    let shape = LayerShape::new(vec![2, 2]).unwrap();
    let weights = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    Network::from_parameters(shape, ActivationFunction::Identity, vec![weights], vec![vec![0.5, -0.5]])
        .unwrap()
}

#[test]
fn forward_output_is_a_probability_distribution() {
    let shapes = [vec![784, 20, 20, 10], vec![5, 3], vec![8, 16, 4, 3]];
    for activation in [ActivationFunction::ReLU, ActivationFunction::Sigmoid] {
        for (seed, sizes) in shapes.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(seed as u64);
            let shape = LayerShape::new(sizes.clone()).unwrap();
            let mut network = Network::new(shape.clone(), activation, &mut rng).unwrap();

            for _ in 0..5 {
                let x = random_input(shape.input_size(), &mut rng);
                let out = network.forward(&x).unwrap();
                assert_eq!(out.len(), shape.output_size());
                assert!(out.iter().all(|&p| p >= 0.0));
                assert_abs_diff_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn forward_centers_input_and_applies_parameters() {
    let mut network = tiny_network();
    let out = network.forward(&[1.0, 0.5]).unwrap().to_vec();

    assert_eq!(network.activations(0), &[0.5, 0.0]);
    assert_eq!(network.preactivations(1), &[1.0, 1.0]);
    assert_abs_diff_eq!(out[0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(out[1], 0.5, epsilon = 1e-12);
}

#[test]
fn forward_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut network = Network::new(LayerShape::default(), ActivationFunction::ReLU, &mut rng).unwrap();
    let x = random_input(784, &mut rng);

    let first = network.forward(&x).unwrap().to_vec();
    let first_layers: Vec<Vec<f64>> = (0..4).map(|l| network.activations(l).to_vec()).collect();
    let second = network.forward(&x).unwrap().to_vec();

    assert_eq!(first, second);
    for (l, a) in first_layers.iter().enumerate() {
        assert_eq!(network.activations(l), a.as_slice());
    }
}

#[test]
fn predict_and_confidence_read_the_last_forward_pass() {
    let mut rng = StdRng::seed_from_u64(2);
    let shape = LayerShape::new(vec![6, 5, 4]).unwrap();
    let mut network = Network::new(shape, ActivationFunction::ReLU, &mut rng).unwrap();
    assert_eq!(network.predict_confidence(0), None);

    let x = random_input(6, &mut rng);
    let class = network.predict(&x).unwrap();
    let out = network.output().to_vec();

    assert!(out.iter().all(|&p| p <= out[class]));
    assert_eq!(network.predict_confidence(class), Some(out[class]));
    assert_eq!(network.predict_confidence(4), None);
}

#[test]
fn wrong_input_or_label_length_is_reported() {
    let mut network = tiny_network();

    assert_eq!(
        network.forward(&[0.1, 0.2, 0.3]).unwrap_err(),
        NetworkError::DimensionMismatch { context: "forward input", expected: 2, actual: 3 }
    );
    assert_eq!(network.backward(&[0.0, 1.0]).unwrap_err(), NetworkError::NoForwardPass);

    network.forward(&[0.1, 0.2]).unwrap();
    assert_eq!(
        network.backward(&[1.0]).unwrap_err(),
        NetworkError::DimensionMismatch { context: "backward label", expected: 2, actual: 1 }
    );
}

#[test]
fn inconsistent_parameters_are_a_configuration_error() {
    let shape = LayerShape::new(vec![3, 2]).unwrap();
    let wrong_cols = Matrix::zeros(2, 4);
    let err = Network::from_parameters(shape.clone(), ActivationFunction::ReLU, vec![wrong_cols], vec![vec![0.0; 2]])
        .unwrap_err();
    assert!(matches!(err, NetworkError::Configuration(_)));

    let short_bias = Network::from_parameters(shape.clone(), ActivationFunction::ReLU, vec![Matrix::zeros(2, 3)], vec![vec![0.0]]);
    assert!(matches!(short_bias, Err(NetworkError::Configuration(_))));

    let missing = Network::from_parameters(shape, ActivationFunction::ReLU, vec![], vec![]);
    assert!(matches!(missing, Err(NetworkError::Configuration(_))));
}

#[test]
fn initialization_follows_fan_in_and_layer_sizes() {
    let mut rng = StdRng::seed_from_u64(8);
    let network = Network::new(LayerShape::default(), ActivationFunction::ReLU, &mut rng).unwrap();

    for (l, (fan_in, size)) in network.shape().crossings().enumerate().map(|(i, c)| (i + 1, c)) {
        let w = network.weights(l);
        assert_eq!((w.rows, w.cols), (size, fan_in));
        let bound = 1.0 / (fan_in as f64).sqrt();
        assert!(w.data.iter().flatten().all(|v| v.abs() <= bound));
        assert_eq!(network.biases(l).len(), size);
        assert!(network.weight_gradient(l).data.iter().flatten().all(|&g| g == 0.0));
    }
}
