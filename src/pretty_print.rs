use std::fmt::{self, Debug, Display};

use faer::prelude::*;

use crate::core::Layer;

/// Displays a layer's parameters as `a_u = phi([W]ᵗ a_{u-1} + [b])`, one neuron per line.
pub struct PrettyPrintParams<'a> {
    i_layer: usize,
    layer: &'a Layer,
}

impl<'a> PrettyPrintParams<'a> {
    pub fn new(i_layer: usize, layer: &'a Layer) -> Self {
        Self { i_layer, layer }
    }
}

impl Debug for PrettyPrintParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for PrettyPrintParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_layer(
            f,
            self.i_layer,
            self.layer.activation().name(),
            self.layer.weight(),
            self.layer.bias(),
            4,
        )
    }
}

/// Displays a layer's latest gradients in the same layout as `PrettyPrintParams`.
pub struct PrettyPrintDerivs<'a> {
    i_layer: usize,
    layer: &'a Layer,
}

impl<'a> PrettyPrintDerivs<'a> {
    pub fn new(i_layer: usize, layer: &'a Layer) -> Self {
        Self { i_layer, layer }
    }
}

impl Debug for PrettyPrintDerivs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for PrettyPrintDerivs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_layer(
            f,
            self.i_layer,
            "d",
            self.layer.weight_grad(),
            self.layer.bias_grad(),
            12,
        )
    }
}

fn n_digits(u: usize) -> usize {
    match u {
        0 => 1,
        u => u.ilog10() as usize + 1,
    }
}

fn write_element(f: &mut fmt::Formatter, x: f64, precision: usize) -> fmt::Result {
    if x.is_sign_positive() {
        write!(f, " {x:.precision$}")
    } else {
        write!(f, "{x:.precision$}")
    }
}

fn fmt_layer(
    f: &mut fmt::Formatter,
    i_layer: usize,
    label: &str,
    w: MatRef<'_, f64>,
    b: MatRef<'_, f64>,
    precision: usize,
) -> fmt::Result {
    let n = w.ncols();
    let n_previous = w.nrows();
    let center_line = n / 2;
    let i_layer_length = n_digits(i_layer);
    let i_previous_layer_length = match i_layer.checked_sub(1) {
        None => 1, // "x"
        Some(i_previous) => n_digits(i_previous),
    };
    for k in 0..n {
        if k == center_line {
            write!(f, "a_{i_layer} = {label}(")?;
        } else {
            let indent = "a_ = (".len() + label.len() + i_layer_length;
            write!(f, "{:indent$}", "")?;
        }
        write!(f, "[")?;
        for g in 0..n_previous {
            write_element(f, w[(g, k)], precision)?;
            if g + 1 != n_previous {
                write!(f, " ")?;
            }
        }
        write!(f, "]")?;
        if k == center_line {
            match i_layer.checked_sub(1) {
                None => write!(f, " x + ")?,
                Some(i_previous) => write!(f, " a_{i_previous} + ")?,
            }
        } else {
            let indent = "  + ".len() + "a_".len() * (i_layer != 0) as usize + i_previous_layer_length;
            write!(f, "{:indent$}", "")?;
        }
        write!(f, "[")?;
        write_element(f, b[(0, k)], precision)?;
        write!(f, "]")?;
        if k == center_line {
            write!(f, ")")?;
        }
        if k + 1 != n {
            writeln!(f)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::Network;

    #[test]
    fn params_one_line_per_neuron() {
        let mut rng = StdRng::seed_from_u64(0);
        let nn = Network::construct(&[2, 3, 1], &["tanh", "sigmoid"], 1, 0.1, &mut rng).unwrap();
        let params = nn.layers()[0].pretty_print_params(0).to_string();
        assert_eq!(params.lines().count(), 3);
        assert!(params.lines().nth(1).unwrap().starts_with("a_0 = tanh(["));
        assert!(params.contains(" x + "));
        let derivs = nn.layers()[1].pretty_print_derivs(1).to_string();
        assert_eq!(derivs.lines().count(), 1);
        assert!(derivs.starts_with("a_1 = d(["));
        assert!(derivs.contains(" a_0 + "));
    }

    #[test]
    fn digit_counts() {
        assert_eq!(super::n_digits(0), 1);
        assert_eq!(super::n_digits(9), 1);
        assert_eq!(super::n_digits(10), 2);
        assert_eq!(super::n_digits(999_999_999), 9);
        assert_eq!(super::n_digits(1_000_000_000), 10);
        assert_eq!(super::n_digits(usize::MAX), usize::MAX.to_string().len());
    }
}
