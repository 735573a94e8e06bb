//! Single-layer LSTM regressor over a univariate window.
//!
//! Input batches are `(batch, window, 1)`. Only the last hidden state feeds
//! the linear output unit. Gates follow candle's `[input, forget, cell,
//! output]` layout.

use candle_core::{DType, Device, Error, Result, Tensor, Var};
use candle_nn::rnn::{LSTM, LSTMConfig, RNN, lstm};
use candle_nn::{Linear, Module, VarBuilder, VarMap, linear};
use rand::Rng;

fn glorot_limit(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in + fan_out) as f64).sqrt()
}

/// Gate biases with the forget block set to 1.0
fn forget_bias(len: usize, hidden: usize) -> Vec<f32> {
    (0..len)
        .map(|i| if (hidden..2 * hidden).contains(&i) { 1.0 } else { 0.0 })
        .collect()
}

pub struct LstmNetwork {
    hidden: usize,
    lstm: LSTM,
    output: Linear,
    varmap: VarMap,
    device: Device,
}

impl LstmNetwork {
    /// Glorot-uniform kernels drawn from `rng`, zero biases except the
    /// forget gate at 1.0
    pub fn new<R: Rng>(hidden: usize, rng: &mut R) -> Result<Self> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);

        let lstm = lstm(1, hidden, LSTMConfig::default(), vs.pp("lstm"))?;
        let output = linear(hidden, 1, vs.pp("output"))?;

        let network = Self {
            hidden,
            lstm,
            output,
            varmap,
            device,
        };
        network.initialize(rng)?;
        Ok(network)
    }

    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<()> {
        let data = self
            .varmap
            .data()
            .lock()
            .map_err(|_| Error::Msg("variable map lock poisoned".to_string()))?;

        // Sorted so a seeded rng always fills the same variables in the same order
        let mut names: Vec<&String> = data.keys().collect();
        names.sort();

        for name in names {
            let var = &data[name];
            let dims = var.dims().to_vec();
            let values: Vec<f32> = match dims.as_slice() {
                [rows, cols] => {
                    let limit = glorot_limit(*cols, *rows);
                    (0..rows * cols)
                        .map(|_| rng.random_range(-limit..limit) as f32)
                        .collect()
                }
                [len] if name.contains("bias_ih") => forget_bias(*len, self.hidden),
                [len] => vec![0.0; *len],
                _ => continue,
            };
            var.set(&Tensor::from_vec(values, dims.as_slice(), &self.device)?)?;
        }
        Ok(())
    }

    pub fn hidden_units(&self) -> usize {
        self.hidden
    }

    pub fn vars(&self) -> Vec<Var> {
        self.varmap.all_vars()
    }

    pub fn parameter_count(&self) -> usize {
        self.vars().iter().map(|v| v.elem_count()).sum()
    }

    /// Stack windows into a `(batch, window, 1)` tensor
    pub fn batch<'a, I>(&self, windows: I, window_size: usize) -> Result<Tensor>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let values: Vec<f32> = windows
            .into_iter()
            .flat_map(|w| w.iter().map(|&v| v as f32))
            .collect();
        let batch = values.len() / window_size.max(1);
        Tensor::from_vec(values, (batch, window_size, 1), &self.device)
    }

    pub fn targets(&self, targets: &[f64]) -> Result<Tensor> {
        let values: Vec<f32> = targets.iter().map(|&t| t as f32).collect();
        Tensor::from_vec(values, (targets.len(), 1), &self.device)
    }

    pub fn forward(&self, batch: &Tensor) -> Result<Tensor> {
        let states = self.lstm.seq(batch)?;
        let last = states
            .last()
            .ok_or_else(|| Error::Msg("empty input window".to_string()))?;
        self.output.forward(last.h())
    }

    /// Mean squared error of the batch
    pub fn loss(&self, batch: &Tensor, targets: &Tensor) -> Result<Tensor> {
        let predictions = self.forward(batch)?;
        candle_nn::loss::mse(&predictions, targets)
    }

    /// Run one window through the network
    pub fn predict(&self, window: &[f64]) -> Result<f64> {
        let input = self.batch([window], window.len())?;
        let output = self.forward(&input)?.reshape(())?.to_scalar::<f32>()?;
        Ok(output as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn network(hidden: usize, seed: u64) -> LstmNetwork {
        let mut rng = StdRng::seed_from_u64(seed);
        LstmNetwork::new(hidden, &mut rng).unwrap()
    }

    #[test]
    fn test_parameter_count() {
        let net = network(50, 42);
        // two kernels, two bias vectors, output weight and bias
        assert_eq!(net.parameter_count(), 200 + 200 * 50 + 200 + 200 + 50 + 1);
        assert_eq!(net.hidden_units(), 50);
    }

    #[test]
    fn test_forget_gate_bias_starts_at_one() {
        let net = network(4, 42);
        let data = net.varmap.data().lock().unwrap();
        let bias = data["lstm.bias_ih_l0"].flatten_all().unwrap().to_vec1::<f32>().unwrap();

        assert_eq!(bias.len(), 16);
        assert!(bias[4..8].iter().all(|&b| b == 1.0));
        assert!(bias[0..4].iter().all(|&b| b == 0.0));
        assert!(bias[8..].iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let window = [0.0, 0.25, 0.5, 0.75, 1.0];
        let a = network(8, 7).predict(&window).unwrap();
        let b = network(8, 7).predict(&window).unwrap();
        let c = network(8, 8).predict(&window).unwrap();

        assert!(a.is_finite());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_batch_forward_shape() {
        let net = network(6, 1);
        let windows: Vec<Vec<f64>> = (0..3).map(|i| vec![i as f64 * 0.1; 5]).collect();
        let batch = net.batch(windows.iter().map(Vec::as_slice), 5).unwrap();
        assert_eq!(batch.dims(), &[3, 5, 1]);

        let out = net.forward(&batch).unwrap();
        assert_eq!(out.dims(), &[3, 1]);

        let loss = net.loss(&batch, &net.targets(&[0.0, 0.5, 1.0]).unwrap()).unwrap();
        assert!(loss.to_scalar::<f32>().unwrap().is_finite());
    }
}
