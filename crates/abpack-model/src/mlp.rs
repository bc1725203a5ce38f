//! A small feed-forward network over the encoded feature rows.
//!
//! One hidden relu layer and a single linear output, trained with AdamW on
//! mean squared error. Everything runs in `f64` on the CPU; the tables this
//! fits are a few hundred rows of a few dozen columns, so there is nothing
//! for a GPU to do.

use crate::regressor::AngleRegressor;
use anyhow::{anyhow, bail};
use candle_core::{DType, Device, Tensor};
use candle_nn::{self as nn, AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Network and training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Width of the single hidden layer.
    pub hidden_units: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Seeds both weight initialization and the per-epoch shuffle.
    pub seed: u64,
    /// Upper bound; the whole table is one batch when it is smaller.
    pub batch_size: usize,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_units: 15,
            epochs: 12_000,
            learning_rate: 1e-3,
            seed: 100,
            batch_size: 200,
        }
    }
}

struct Mlp {
    hidden: nn::Linear,
    output: nn::Linear,
}

impl Mlp {
    fn load(vb: VarBuilder, in_dim: usize, hidden_units: usize) -> candle_core::Result<Self> {
        let hidden = nn::linear(in_dim, hidden_units, vb.pp("hidden"))?;
        let output = nn::linear(hidden_units, 1, vb.pp("output"))?;
        Ok(Self { hidden, output })
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        self.output.forward(&self.hidden.forward(xs)?.relu()?)
    }
}

pub struct MlpRegressor {
    varmap: VarMap,
    net: Mlp,
    config: MlpConfig,
    in_dim: usize,
    device: Device,
}

impl MlpRegressor {
    /// Builds the network with seeded initial weights. The CPU device has no
    /// seedable generator, so the initial values are drawn from [`StdRng`]
    /// and written over the freshly created vars.
    pub fn new(in_dim: usize, config: MlpConfig) -> anyhow::Result<Self> {
        if in_dim == 0 {
            bail!("regressor needs at least one feature column");
        }
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F64, &device);
        let net = Mlp::load(vb, in_dim, config.hidden_units)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let shapes: [(&str, usize, Vec<usize>); 4] = [
            ("hidden.weight", in_dim, vec![config.hidden_units, in_dim]),
            ("hidden.bias", in_dim, vec![config.hidden_units]),
            ("output.weight", config.hidden_units, vec![1, config.hidden_units]),
            ("output.bias", config.hidden_units, vec![1]),
        ];
        let vars = varmap.data().lock().unwrap();
        for (name, fan_in, shape) in shapes {
            let bound = 1.0 / (fan_in as f64).sqrt();
            let len: usize = shape.iter().product();
            let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-bound..bound)).collect();
            let var = vars
                .get(name)
                .ok_or_else(|| anyhow!("var '{name}' missing from the network"))?;
            var.set(&Tensor::from_vec(values, shape, &device)?)?;
        }
        drop(vars);

        Ok(Self {
            varmap,
            net,
            config,
            in_dim,
            device,
        })
    }

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    pub(crate) fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub(crate) fn varmap_mut(&mut self) -> &mut VarMap {
        &mut self.varmap
    }

    fn batch(&self, x: &ArrayView2<f64>, y: &ArrayView1<f64>, idx: &[usize]) -> candle_core::Result<(Tensor, Tensor)> {
        let mut flat = Vec::with_capacity(idx.len() * self.in_dim);
        let mut target = Vec::with_capacity(idx.len());
        for &i in idx {
            flat.extend(x.row(i).iter().copied());
            target.push(y[i]);
        }
        let xs = Tensor::from_vec(flat, (idx.len(), self.in_dim), &self.device)?;
        let ys = Tensor::from_vec(target, (idx.len(), 1), &self.device)?;
        Ok((xs, ys))
    }
}

impl AngleRegressor for MlpRegressor {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> anyhow::Result<()> {
        let n = x.nrows();
        if n == 0 {
            bail!("empty training table");
        }
        if x.ncols() != self.in_dim {
            bail!("training matrix has {} columns, network expects {}", x.ncols(), self.in_dim);
        }
        if y.len() != n {
            bail!("{} angles against {} rows", y.len(), n);
        }

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(self.varmap.all_vars(), params)?;
        let batch_size = self.config.batch_size.min(n).max(1);
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut indices: Vec<usize> = (0..n).collect();

        let mut last_loss = f64::NAN;
        for epoch in 0..self.config.epochs {
            indices.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            let mut batches = 0;
            for idx in indices.chunks(batch_size) {
                let (xs, ys) = self.batch(&x, &y, idx)?;
                let predictions = self.net.forward(&xs)?;
                let loss = nn::loss::mse(&predictions, &ys)?;
                optimizer.backward_step(&loss)?;
                epoch_loss += loss.to_scalar::<f64>()?;
                batches += 1;
            }
            last_loss = epoch_loss / batches as f64;
            if epoch % 1000 == 0 {
                debug!(epoch, loss = last_loss, "fitting");
            }
        }
        info!(
            rows = n,
            epochs = self.config.epochs,
            loss = last_loss,
            "fit complete"
        );
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> anyhow::Result<Array1<f64>> {
        if x.ncols() != self.in_dim {
            bail!("matrix has {} columns, network expects {}", x.ncols(), self.in_dim);
        }
        let flat: Vec<f64> = x.iter().copied().collect();
        let xs = Tensor::from_vec(flat, (x.nrows(), self.in_dim), &self.device)?;
        let out = self.net.forward(&xs)?.squeeze(1)?.to_vec1::<f64>()?;
        Ok(Array1::from_vec(out))
    }
}
