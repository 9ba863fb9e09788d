// ============================================================
// Layer 5 — Sentiment Model
// ============================================================
// The trainer only needs one thing from a model:
//
//   features [batch, fix_length, dim]  →  logits [batch, num_classes]
//
// That contract is the SentimentModel trait. Any Burn module
// implementing it (for both the autodiff backend and its inner
// backend) can be trained.
//
// BagOfEmbeddings is the baseline shipped with the CLI:
//
//   features ─ mean over sequence ─ Linear ─ ReLU ─ Dropout ─ Linear ─ logits
//
// Padding rows take part in the mean, so shorter sentences are
// pulled towards the <pad> vector.
//
// Reference: Burn Book §3 (Building Blocks)
//            Iyyer et al. (2015) Deep Unordered Composition

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

/// Anything that maps embedded sequences to class logits
pub trait SentimentModel<B: Backend> {
    fn forward(&self, features: Tensor<B, 3>) -> Tensor<B, 2>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct BagOfEmbeddingsConfig {
    pub embedding_dim: usize,
    pub hidden_size:   usize,
    pub num_classes:   usize,
    #[config(default = 0.1)]
    pub dropout:       f64,
}

impl BagOfEmbeddingsConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BagOfEmbeddings<B> {
        BagOfEmbeddings {
            hidden:  LinearConfig::new(self.embedding_dim, self.hidden_size).init(device),
            output:  LinearConfig::new(self.hidden_size, self.num_classes).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct BagOfEmbeddings<B: Backend> {
    pub hidden:  Linear<B>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> SentimentModel<B> for BagOfEmbeddings<B> {
    fn forward(&self, features: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, _, dim] = features.dims();

        // mean_dim keeps the reduced axis: [batch, 1, dim] → [batch, dim]
        let pooled = features.mean_dim(1).reshape([batch_size, dim]);

        let x = relu(self.hidden.forward(pooled));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }
}
