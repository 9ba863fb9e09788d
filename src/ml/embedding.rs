// ============================================================
// Layer 5 — Word Embedding
// ============================================================
// The lookup table that turns token indices into vectors.
//
//   tokens   [batch, fix_length]           Int
//      │  embedding.forward
//      ▼
//   features [batch, fix_length, dim]      Float
//
// The table is a Burn module owned by the trainer, so it is
// stepped by its own optimiser and saved next to the model.
// Its initial weights come from the environment's VectorTable.
// A frozen embedding is marked `no_grad` and never stepped.
//
// Reference: Burn Book §3 (Embedding)

use burn::{
    module::Param,
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
    tensor::TensorData,
};

use crate::data::vocab::VectorTable;

#[derive(Module, Debug)]
pub struct WordEmbedding<B: Backend> {
    pub embedding: Embedding<B>,
}

impl<B: Backend> WordEmbedding<B> {
    /// Build the layer with `table` as its weights
    pub fn from_table(table: &VectorTable, device: &B::Device) -> Self {
        let mut embedding = EmbeddingConfig::new(table.rows(), table.dim()).init(device);

        let weights = Tensor::<B, 2>::from_data(
            TensorData::new(table.as_slice().to_vec(), [table.rows(), table.dim()]),
            device,
        );
        embedding.weight = Param::from_tensor(weights);

        Self { embedding }
    }

    /// [batch, len] token indices → [batch, len, dim] features
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.embedding.forward(tokens)
    }

    /// [vocab_len, dim]
    pub fn dims(&self) -> [usize; 2] {
        self.embedding.weight.val().dims()
    }
}
