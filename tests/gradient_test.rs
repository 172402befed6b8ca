use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use backprop_nn::{ActivationFunction, LayerShape, Matrix, Network};

const STEP: f64 = 1e-5;
const TOLERANCE: f64 = 1e-4;

fn random_sample(shape: &LayerShape, rng: &mut StdRng) -> (Vec<f64>, Vec<f64>) {
    let x = (0..shape.input_size()).map(|_| rng.gen::<f64>()).collect();
    let mut y = vec![0.0; shape.output_size()];
    y[rng.gen_range(0..shape.output_size())] = 1.0;
    (x, y)
}

fn sample_loss(network: &mut Network, x: &[f64], y: &[f64]) -> f64 {
    let out = network.forward(x).unwrap().to_vec();
    Network::loss(&out, y)
}

/// Compares backprop gradients of every parameter against central differences.
fn check_gradients(network: &mut Network, x: &[f64], y: &[f64]) {
    network.zero_gradients();
    network.forward(x).unwrap();
    network.backward(y).unwrap();

    for l in 1..network.shape().len() {
        let analytic_w = network.weight_gradient(l).clone();
        let analytic_b = network.bias_gradient(l).to_vec();

        for i in 0..analytic_w.rows {
            for j in 0..analytic_w.cols {
                let original = network.weights(l)[(i, j)];
                network.weights_mut(l)[(i, j)] = original + STEP;
                let plus = sample_loss(network, x, y);
                network.weights_mut(l)[(i, j)] = original - STEP;
                let minus = sample_loss(network, x, y);
                network.weights_mut(l)[(i, j)] = original;

                let numeric = (plus - minus) / (2.0 * STEP);
                assert_abs_diff_eq!(analytic_w[(i, j)], numeric, epsilon = TOLERANCE);
            }

            let original = network.biases(l)[i];
            network.biases_mut(l)[i] = original + STEP;
            let plus = sample_loss(network, x, y);
            network.biases_mut(l)[i] = original - STEP;
            let minus = sample_loss(network, x, y);
            network.biases_mut(l)[i] = original;

            let numeric = (plus - minus) / (2.0 * STEP);
            assert_abs_diff_eq!(analytic_b[i], numeric, epsilon = TOLERANCE);
        }
    }
}

#[test]
fn single_linear_layer_matches_finite_differences() {
    let mut rng = StdRng::seed_from_u64(1234);
    let shape = LayerShape::new(vec![6, 4]).unwrap();
    let mut network = Network::new(shape.clone(), ActivationFunction::Identity, &mut rng).unwrap();

    for _ in 0..5 {
        let (x, y) = random_sample(&shape, &mut rng);
        check_gradients(&mut network, &x, &y);
    }
}

#[test]
fn stacked_linear_layers_match_finite_differences() {
    let mut rng = StdRng::seed_from_u64(99);
    let shape = LayerShape::new(vec![5, 4, 3]).unwrap();
    let mut network = Network::new(shape.clone(), ActivationFunction::Identity, &mut rng).unwrap();

    for _ in 0..5 {
        let (x, y) = random_sample(&shape, &mut rng);
        check_gradients(&mut network, &x, &y);
    }
}

#[test]
fn output_delta_is_prediction_minus_label() {
    let mut rng = StdRng::seed_from_u64(5);
    let shape = LayerShape::new(vec![4, 3, 3]).unwrap();
    let mut network = Network::new(shape.clone(), ActivationFunction::ReLU, &mut rng).unwrap();
    let (x, y) = random_sample(&shape, &mut rng);

    let out = network.forward(&x).unwrap().to_vec();
    network.backward(&y).unwrap();

    for ((d, p), t) in network.delta(2).iter().zip(&out).zip(&y) {
        assert_abs_diff_eq!(*d, p - t, epsilon = 1e-15);
    }
    // Dead ReLU units pass no error back.
    for (d, z) in network.delta(1).iter().zip(network.preactivations(1)) {
        if *z <= 0.0 {
            assert_eq!(*d, 0.0);
        }
    }
}

#[test]
fn hidden_deltas_use_the_derivative_at_the_preactivation() {
    let mut rng = StdRng::seed_from_u64(21);
    let shape = LayerShape::new(vec![5, 4, 3, 2]).unwrap();
    let mut network = Network::new(shape.clone(), ActivationFunction::Sigmoid, &mut rng).unwrap();

    for _ in 0..3 {
        let (x, y) = random_sample(&shape, &mut rng);
        network.forward(&x).unwrap();
        network.backward(&y).unwrap();

        for l in (1..shape.len() - 1).rev() {
            let back = network.weights(l + 1).transpose_mul_vec(network.delta(l + 1));
            let expected: Vec<f64> = back
                .iter()
                .zip(network.preactivations(l))
                .map(|(b, z)| b * ActivationFunction::Sigmoid.derivative(*z))
                .collect();
            for (d, e) in network.delta(l).iter().zip(&expected) {
                assert_abs_diff_eq!(*d, *e, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn gradients_accumulate_across_a_batch() {
    let mut rng = StdRng::seed_from_u64(77);
    let shape = LayerShape::new(vec![6, 5, 3]).unwrap();
    let mut network = Network::new(shape.clone(), ActivationFunction::ReLU, &mut rng).unwrap();
    let samples: Vec<(Vec<f64>, Vec<f64>)> = (0..4).map(|_| random_sample(&shape, &mut rng)).collect();

    let mut expected_w: Vec<Matrix> = (1..3)
        .map(|l| Matrix::zeros(network.weights(l).rows, network.weights(l).cols))
        .collect();
    let mut expected_b: Vec<Vec<f64>> = (1..3).map(|l| vec![0.0; shape[l]]).collect();

    for (x, y) in &samples {
        network.zero_gradients();
        network.forward(x).unwrap();
        network.backward(y).unwrap();
        for l in 1..3 {
            // Each contribution is the outer product of delta and the layer input.
            let g = network.weight_gradient(l);
            assert_abs_diff_eq!(
                g[(1, 2)],
                network.delta(l)[1] * network.activations(l - 1)[2],
                epsilon = 1e-15
            );
            for (dst, src) in expected_w[l - 1].data.iter_mut().zip(&g.data) {
                dst.iter_mut().zip(src).for_each(|(e, v)| *e += v);
            }
            for (e, b) in expected_b[l - 1].iter_mut().zip(network.bias_gradient(l)) {
                *e += b;
            }
        }
    }

    network.zero_gradients();
    for (x, y) in &samples {
        network.forward(x).unwrap();
        network.backward(y).unwrap();
    }

    for l in 1..3 {
        let got = network.weight_gradient(l);
        for i in 0..got.rows {
            for j in 0..got.cols {
                assert_abs_diff_eq!(got[(i, j)], expected_w[l - 1][(i, j)], epsilon = 1e-12);
            }
        }
        for (g, e) in network.bias_gradient(l).iter().zip(&expected_b[l - 1]) {
            assert_abs_diff_eq!(*g, *e, epsilon = 1e-12);
        }
    }
}
