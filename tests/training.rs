use approx::assert_abs_diff_eq;
use rand::{SeedableRng, rngs::StdRng};
use snn::{Error, Gym, Network, ShapeError};

const XOR_INPUTS: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const XOR_TARGETS: [[f64; 1]; 4] = [[0.0], [1.0], [1.0], [0.0]];

fn squared_error(nn: &mut Network, x: &[f64], y: &[f64]) -> f64 {
    let a = nn.forward_sample(x).unwrap();
    std::iter::zip(a, y).map(|(a_k, y_k)| (a_k - y_k).powi(2)).sum()
}

#[test]
fn one_step_decreases_sample_error() {
    let mut n_failures = 0;
    let n_seeds = 100;
    for seed in 0..n_seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut nn =
            Network::construct(&[3, 5, 2], &["tanh", "sigmoid"], 1, 0.01, &mut rng).unwrap();
        let x = [0.3, -0.6, 0.9];
        let y = [0.2, 0.8];
        let before = squared_error(&mut nn, &x, &y);
        let reported = nn.backward_sample(&x, &y).unwrap();
        assert_abs_diff_eq!(reported, before, epsilon = 1e-12);
        let after = squared_error(&mut nn, &x, &y);
        if after >= before {
            n_failures += 1;
        }
    }
    assert!(n_failures <= 3, "{n_failures} of {n_seeds} steps did not decrease the error");
}

#[test]
fn xor_improves() {
    let n_seeds = 5;
    let mut n_improved = 0;
    for seed in 0..n_seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut nn =
            Network::construct(&[2, 2, 1], &["tanh", "sigmoid"], 3000, 0.1, &mut rng).unwrap();
        let initial = nn.loss(&XOR_INPUTS, &XOR_TARGETS).unwrap();
        let records = Gym::new(&mut nn)
            .train(&XOR_INPUTS, &XOR_TARGETS)
            .unwrap();
        assert_eq!(records.len(), 3000);
        let last = nn.loss(&XOR_INPUTS, &XOR_TARGETS).unwrap();
        if last < initial {
            n_improved += 1;
        }
    }
    assert!(n_improved >= n_seeds - 1);
}

#[test]
fn backward_is_online() {
    // Two identical samples in one call: the second sees the parameters updated by the first.
    let mut rng = StdRng::seed_from_u64(8);
    let mut batched =
        Network::construct(&[2, 3, 1], &["tanh", "sigmoid"], 1, 0.5, &mut rng).unwrap();
    let mut stepwise = batched.clone();
    let x = [1.0, 0.5];
    let y = [0.0];
    batched.backward(&[x, x], &[y, y]).unwrap();
    stepwise.backward_sample(&x, &y).unwrap();
    stepwise.backward_sample(&x, &y).unwrap();
    for (a, b) in std::iter::zip(batched.layers(), stepwise.layers()) {
        assert_eq!(a.weight().to_owned(), b.weight().to_owned());
        assert_eq!(a.bias().to_owned(), b.bias().to_owned());
    }
}

#[test]
fn epoch_loss_averages_summed_sample_errors() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut nn = Network::construct(&[2, 3, 2], &["tanh", "sigmoid"], 1, 0.2, &mut rng).unwrap();
    let inputs = [[0.5, -1.0], [1.0, 0.25], [-0.5, 0.75]];
    let targets = [[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]];
    let mut stepwise = nn.clone();
    let expected = std::iter::zip(&inputs, &targets)
        .map(|(x, y)| stepwise.backward_sample(x, y).unwrap())
        .sum::<f64>()
        / inputs.len() as f64;
    let loss = Gym::new(&mut nn).train_epoch(&inputs, &targets).unwrap();
    assert_abs_diff_eq!(loss, expected, epsilon = 1e-12);
}

#[test]
fn gym_rejects_bad_dataset() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut nn = Network::construct(&[2, 2, 1], &["tanh", "sigmoid"], 10, 0.1, &mut rng).unwrap();
    let before = nn.layers()[0].weight().to_owned();
    let err = Gym::new(&mut nn)
        .train_epoch(&XOR_INPUTS, &[[0.0, 1.0]; 4])
        .unwrap_err();
    assert!(matches!(err, Error::Shape(ShapeError::WidthMismatch { .. })));
    assert_eq!(nn.layers()[0].weight().to_owned(), before);
}

#[test]
fn minimal_invocation() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut nn = Network::construct(
        &[50, 30, 20, 10],
        &["tanh", "tanh", "tanh"],
        10,
        0.05,
        &mut rng,
    )
    .unwrap();
    let x = vec![0.0; 50];
    let y = vec![0.0; 10];
    let a = nn.forward(&[&x[..]]).unwrap();
    assert_eq!(a[0].len(), 10);
    assert!(a[0].iter().all(|a_k| (-1.0..=1.0).contains(a_k)));
    nn.backward(&[&x[..]], &[&y[..]]).unwrap();
    let err = nn.forward(&[vec![0.0; 5]]).unwrap_err();
    assert_eq!(
        err,
        Error::Shape(ShapeError::WidthMismatch {
            what: "input",
            expected: 50,
            actual: 5,
        })
    );
}
