use tracing::{debug, info, warn};

use crate::{Network, Result};

/// Training loop around a network: repeats online gradient descent over a dataset for the
/// network's configured number of epochs.
pub struct Gym<'a> {
    nn: &'a mut Network,
    n_logs: usize,
}

impl<'a> Gym<'a> {
    pub fn new(nn: &'a mut Network) -> Self {
        Self { nn, n_logs: 20 }
    }

    /// How many progress lines `train` logs at `info` level.
    pub fn with_n_logs(mut self, n_logs: usize) -> Self {
        self.n_logs = n_logs;
        self
    }

    pub fn nn(&mut self) -> &mut Network {
        self.nn
    }

    /// One pass of `Network::backward` over the dataset.
    ///
    /// Returns each sample's squared error `Σ(output - target)²`, measured right before its
    /// update, averaged over the samples.
    pub fn train_epoch(
        &mut self,
        inputs: &[impl AsRef<[f64]>],
        targets: &[impl AsRef<[f64]>],
    ) -> Result<f64> {
        self.nn.check_samples(inputs, targets)?;
        let mut loss = 0.0f64;
        for (x_i, y_i) in std::iter::zip(inputs, targets) {
            loss += self.nn.backward_sample(x_i.as_ref(), y_i.as_ref())?;
        }
        Ok(loss / inputs.len().max(1) as f64)
    }

    /// Runs `epochs` epochs and returns the loss of each.
    pub fn train(
        &mut self,
        inputs: &[impl AsRef<[f64]>],
        targets: &[impl AsRef<[f64]>],
    ) -> Result<Vec<f64>> {
        let n_epochs = self.nn.epochs();
        let log_every = n_epochs / n_epochs.min(self.n_logs.max(1));
        let mut records = Vec::with_capacity(n_epochs);
        for i_epoch in 0..n_epochs {
            let loss = self.train_epoch(inputs, targets)?;
            if !loss.is_finite() {
                warn!(epoch = i_epoch, loss, "loss is no longer finite");
            }
            if i_epoch % log_every == 0 || i_epoch + 1 == n_epochs {
                let percentage = (i_epoch as f64) / (n_epochs as f64) * 100.0;
                info!("[{percentage:.0}%] epoch {i_epoch}: L = {loss:.6}");
            } else {
                debug!(epoch = i_epoch, loss, "epoch done");
            }
            records.push(loss);
        }
        Ok(records)
    }
}
