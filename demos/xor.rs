use std::{error::Error, fs, path::PathBuf, time::Instant};

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use snn::{Gym, Network, NetworkConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Trains a small network to be an XOR gate.
#[derive(Debug, Parser)]
struct Args {
    /// JSON network description; overrides the flags below.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 5000)]
    epochs: usize,
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,
    /// Seed for parameter initialization; random if omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Print every layer's parameters after training.
    #[arg(long)]
    print_params: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => NetworkConfig {
            layer_sizes: vec![2, 2, 1],
            activations: vec!["tanh".into(), "sigmoid".into()],
            epochs: args.epochs,
            learning_rate: args.learning_rate,
        },
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut nn: Network = config.build(&mut rng)?;

    let inputs: &[[f64; 2]] = &[[0., 0.], [0., 1.], [1., 0.], [1., 1.]];
    let targets: &[[f64; 1]] = &[[0.], [1.], [1.], [0.]];

    info!("initial loss = {}", nn.loss(inputs, targets)?);

    let before = Instant::now();
    Gym::new(&mut nn).train(inputs, targets)?;
    info!("training took {:?}", before.elapsed());

    info!("final loss = {}", nn.loss(inputs, targets)?);

    if args.print_params {
        for (i_layer, layer) in nn.layers().iter().enumerate() {
            println!("=== Layer #{i_layer} ===\n\n{}\n", layer.pretty_print_params(i_layer));
        }
    }

    println!("[Results]");
    for (x, y) in std::iter::zip(inputs, targets) {
        let a = nn.predict(x)?;
        println!("{} xor {} = {:.4} (expected {})", x[0], x[1], a[0], y[0]);
    }
    Ok(())
}
