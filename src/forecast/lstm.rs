//! Inference-only LSTM evaluated from weights exported by the training pipeline

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Weights of a single LSTM layer.
///
/// Gate layout follows the usual input/forget/cell/output convention:
/// `w_i*` multiplies the layer input, `w_h*` the previous hidden state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmLayer {
    pub w_ii: Array2<f64>,
    pub w_hi: Array2<f64>,
    pub b_i: Array1<f64>,
    pub w_if: Array2<f64>,
    pub w_hf: Array2<f64>,
    pub b_f: Array1<f64>,
    pub w_ig: Array2<f64>,
    pub w_hg: Array2<f64>,
    pub b_g: Array1<f64>,
    pub w_io: Array2<f64>,
    pub w_ho: Array2<f64>,
    pub b_o: Array1<f64>,
}

impl LstmLayer {
    fn hidden_size(&self) -> usize {
        self.b_i.len()
    }

    fn init_state(&self) -> (Array1<f64>, Array1<f64>) {
        let hidden = self.hidden_size();
        (Array1::zeros(hidden), Array1::zeros(hidden))
    }

    /// Advance the layer by one timestep, returning the new hidden and cell
    /// states.
    fn step(
        &self,
        input: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let i = (self.w_ii.dot(input) + self.w_hi.dot(h_prev) + &self.b_i).mapv(sigmoid);
        let f = (self.w_if.dot(input) + self.w_hf.dot(h_prev) + &self.b_f).mapv(sigmoid);
        let g = (self.w_ig.dot(input) + self.w_hg.dot(h_prev) + &self.b_g).mapv(f64::tanh);
        let o = (self.w_io.dot(input) + self.w_ho.dot(h_prev) + &self.b_o).mapv(sigmoid);

        let c = &f * c_prev + &i * &g;
        let h = &o * c.mapv(f64::tanh);

        (h, c)
    }

    /// Check gate shapes against the expected input and hidden widths.
    fn validate(&self, input_size: usize, hidden_size: usize) -> Result<(), String> {
        let gates = [
            ("i", &self.w_ii, &self.w_hi, &self.b_i),
            ("f", &self.w_if, &self.w_hf, &self.b_f),
            ("g", &self.w_ig, &self.w_hg, &self.b_g),
            ("o", &self.w_io, &self.w_ho, &self.b_o),
        ];

        for (name, w_input, w_hidden, bias) in gates {
            if w_input.dim() != (hidden_size, input_size) {
                return Err(format!(
                    "gate {} input weights are {:?}, expected ({}, {})",
                    name,
                    w_input.dim(),
                    hidden_size,
                    input_size
                ));
            }
            if w_hidden.dim() != (hidden_size, hidden_size) {
                return Err(format!(
                    "gate {} hidden weights are {:?}, expected ({}, {})",
                    name,
                    w_hidden.dim(),
                    hidden_size,
                    hidden_size
                ));
            }
            if bias.len() != hidden_size {
                return Err(format!(
                    "gate {} bias has {} entries, expected {}",
                    name,
                    bias.len(),
                    hidden_size
                ));
            }
        }

        Ok(())
    }
}

/// Linear readout from the final hidden state to the forecast value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

impl DenseLayer {
    fn forward(&self, hidden: &Array1<f64>) -> Array1<f64> {
        self.weights.dot(hidden) + &self.bias
    }
}

/// Stacked LSTM with a dense readout, deserialized from a JSON artifact.
///
/// Holds weights only. Training happens in the offline pipeline; this type
/// just replays the forward pass over a normalized price window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmModel {
    pub input_size: usize,
    pub hidden_size: usize,
    pub layers: Vec<LstmLayer>,
    pub dense: DenseLayer,
}

impl LstmModel {
    /// Run the forward pass over a `[timesteps, input_size]` window and
    /// return the readout for the last timestep.
    ///
    /// Callers must validate shapes first; `forward` assumes a model that
    /// passed [`LstmModel::validate`].
    pub fn forward(&self, window: &Array2<f64>) -> f64 {
        let mut states: Vec<(Array1<f64>, Array1<f64>)> =
            self.layers.iter().map(LstmLayer::init_state).collect();

        for row in window.rows() {
            let mut layer_input = row.to_owned();
            for (idx, layer) in self.layers.iter().enumerate() {
                let (h_prev, c_prev) = &states[idx];
                let (h, c) = layer.step(&layer_input, h_prev, c_prev);
                layer_input = h.clone();
                states[idx] = (h, c);
            }
        }

        let (final_hidden, _) = &states[self.layers.len() - 1];
        self.dense.forward(final_hidden)[0]
    }

    /// Check that every layer and the readout agree on the declared widths.
    pub fn validate(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("model has no LSTM layers".to_string());
        }

        let mut layer_input = self.input_size;
        for (idx, layer) in self.layers.iter().enumerate() {
            layer
                .validate(layer_input, self.hidden_size)
                .map_err(|e| format!("layer {}: {}", idx, e))?;
            layer_input = self.hidden_size;
        }

        if self.dense.weights.dim() != (1, self.hidden_size) {
            return Err(format!(
                "dense weights are {:?}, expected (1, {})",
                self.dense.weights.dim(),
                self.hidden_size
            ));
        }
        if self.dense.bias.len() != 1 {
            return Err(format!(
                "dense bias has {} entries, expected 1",
                self.dense.bias.len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::testutil::{constant_model, zero_layer};

    fn stacked_model(output: f64) -> LstmModel {
        let mut model = constant_model(output);
        model.layers.push(zero_layer(4, 4));
        model
    }

    #[test]
    fn test_zero_weight_model_outputs_bias() {
        let model = stacked_model(0.5);
        model.validate().expect("model should be well formed");

        let window = Array2::from_shape_vec((60, 1), vec![0.25; 60]).expect("window shape");
        assert_eq!(model.forward(&window), 0.5);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut model = constant_model(0.0);
        model.layers[0].w_ii[[0, 0]] = 0.8;
        model.layers[0].b_g[1] = 0.3;
        model.dense.weights[[0, 0]] = 1.5;
        model.dense.weights[[0, 1]] = -0.7;

        let values: Vec<f64> = (0..60).map(|t| (t as f64) / 60.0).collect();
        let window = Array2::from_shape_vec((60, 1), values).expect("window shape");

        let first = model.forward(&window);
        let second = model.forward(&window);
        assert_eq!(first, second);
        assert!(first.is_finite());
    }

    #[test]
    fn test_validate_rejects_empty_stack() {
        let mut model = constant_model(0.0);
        model.layers.clear();

        let err = model.validate().expect_err("empty stack should fail");
        assert!(err.contains("no LSTM layers"));
    }

    #[test]
    fn test_validate_rejects_mismatched_gate() {
        let mut model = stacked_model(0.0);
        model.layers[1].w_hf = Array2::zeros((4, 3));

        let err = model.validate().expect_err("bad gate should fail");
        assert!(err.contains("layer 1"), "unexpected message: {}", err);
        assert!(err.contains("gate f"), "unexpected message: {}", err);
    }

    #[test]
    fn test_validate_rejects_wide_readout() {
        let mut model = constant_model(0.0);
        model.dense.weights = Array2::zeros((2, 4));
        model.dense.bias = Array1::zeros(2);

        let err = model.validate().expect_err("wide readout should fail");
        assert!(err.contains("dense weights"), "unexpected message: {}", err);
    }
}
