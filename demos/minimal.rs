use rand::{SeedableRng, rngs::StdRng};
use snn::Network;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), snn::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::from_os_rng();
    let mut nn = Network::construct(
        &[50, 30, 20, 10],         // layer sizes
        &["tanh", "tanh", "tanh"], // activations
        10,                        // epochs
        0.05,                      // learning rate
        &mut rng,
    )?;

    let x = vec![0.0; 50];
    let y = vec![0.0; 10];

    let a = nn.forward(&[&x[..]])?;

    nn.backward(&[&x[..]], &[&y[..]])?;

    println!("{:?}", a[0]);
    Ok(())
}
