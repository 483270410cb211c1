//! Compares the gradients left behind by one backward step with central differences.

use approx::assert_abs_diff_eq;
use rand::{SeedableRng, rngs::StdRng};
use snn::Network;

const EPSILON: f64 = 1e-5;
const TOLERANCE: f64 = 1e-4;

/// `½ Σ (a - y)²`, whose gradient with respect to `a` is the `a - y` seed of back propagation.
fn half_squared_error(nn: &Network, x: &[f64], y: &[f64]) -> f64 {
    let a = nn.predict(x).unwrap();
    0.5 * std::iter::zip(a, y).map(|(a_k, y_k)| (a_k - y_k).powi(2)).sum::<f64>()
}

fn set_weight(nn: &mut Network, u: usize, g: usize, k: usize, value: f64) {
    let (mut w, _) = nn.params_layer_mut(u).unwrap();
    w[(g, k)] = value;
}

fn set_bias(nn: &mut Network, u: usize, k: usize, value: f64) {
    let (_, mut b) = nn.params_layer_mut(u).unwrap();
    b[(0, k)] = value;
}

fn numeric_weight_grad(nn: &mut Network, u: usize, g: usize, k: usize, x: &[f64], y: &[f64]) -> f64 {
    let original = nn.layers()[u].weight()[(g, k)];
    set_weight(nn, u, g, k, original + EPSILON);
    let plus = half_squared_error(nn, x, y);
    set_weight(nn, u, g, k, original - EPSILON);
    let minus = half_squared_error(nn, x, y);
    set_weight(nn, u, g, k, original);
    (plus - minus) / (2.0 * EPSILON)
}

fn numeric_bias_grad(nn: &mut Network, u: usize, k: usize, x: &[f64], y: &[f64]) -> f64 {
    let original = nn.layers()[u].bias()[(0, k)];
    set_bias(nn, u, k, original + EPSILON);
    let plus = half_squared_error(nn, x, y);
    set_bias(nn, u, k, original - EPSILON);
    let minus = half_squared_error(nn, x, y);
    set_bias(nn, u, k, original);
    (plus - minus) / (2.0 * EPSILON)
}

fn check_gradients(sizes: &[usize], activations: &[&str], x: &[f64], y: &[f64], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut nn = Network::construct(sizes, activations, 1, 0.1, &mut rng).unwrap();
    let mut stepped = nn.clone();
    stepped.backward_sample(x, y).unwrap();
    for u in 0..nn.n_layers() {
        let analytic = &stepped.layers()[u];
        for k in 0..analytic.n_outputs() {
            for g in 0..analytic.n_inputs() {
                let numeric = numeric_weight_grad(&mut nn, u, g, k, x, y);
                assert_abs_diff_eq!(analytic.weight_grad()[(g, k)], numeric, epsilon = TOLERANCE);
            }
            let numeric = numeric_bias_grad(&mut nn, u, k, x, y);
            assert_abs_diff_eq!(analytic.bias_grad()[(0, k)], numeric, epsilon = TOLERANCE);
        }
    }
}

#[test]
fn sigmoid_2_3_1() {
    for seed in 0..5 {
        check_gradients(&[2, 3, 1], &["sigmoid", "sigmoid"], &[0.7, -0.3], &[1.0], seed);
    }
}

#[test]
fn tanh_deeper() {
    check_gradients(
        &[3, 4, 3, 2],
        &["tanh", "tanh", "sigmoid"],
        &[0.2, -0.5, 0.9],
        &[0.0, 1.0],
        17,
    );
}

#[test]
fn leaky_and_relu() {
    // Inputs away from the kinks, where central differences are well defined.
    check_gradients(&[2, 3, 2], &["leaky", "relu"], &[0.4, 0.8], &[0.5, -0.5], 23);
}
