use burn::{
    nn::{
        attention::{generate_autoregressive_mask, MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

use crate::data::batcher::ModelInput;
use crate::ml::seq2seq::Seq2SeqModel;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    pub source_vocab_size: usize,
    pub target_vocab_size: usize,
    /// Longest sequence either side will ever see (position table size)
    pub max_seq_len:       usize,
    pub d_model:           usize,
    pub num_heads:         usize,
    pub num_layers:        usize,
    pub d_ff:              usize,
    pub dropout:           f64,
    pub batch_size:        usize,
}

impl Seq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerSeq2Seq<B> {
        let source_embedding   = EmbeddingConfig::new(self.source_vocab_size, self.d_model).init(device);
        let target_embedding   = EmbeddingConfig::new(self.target_vocab_size, self.d_model).init(device);
        let source_position    = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let target_position    = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let encoder: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let decoder: Vec<DecoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_decoder_block(device))
            .collect();
        let output  = LinearConfig::new(self.d_model, self.target_vocab_size).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        TransformerSeq2Seq {
            source_embedding, target_embedding,
            source_position, target_position,
            encoder, decoder, output, dropout,
            batch_size: self.batch_size,
        }
    }

    fn attention<B: Backend>(&self, device: &B::Device) -> MultiHeadAttention<B> {
        MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device)
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        EncoderBlock {
            self_attn:   self.attention(device),
            ffn_linear1: LinearConfig::new(self.d_model, self.d_ff).init(device),
            ffn_linear2: LinearConfig::new(self.d_ff, self.d_model).init(device),
            norm1:       LayerNormConfig::new(self.d_model).init(device),
            norm2:       LayerNormConfig::new(self.d_model).init(device),
            dropout:     DropoutConfig::new(self.dropout).init(),
        }
    }

    fn build_decoder_block<B: Backend>(&self, device: &B::Device) -> DecoderBlock<B> {
        DecoderBlock {
            self_attn:   self.attention(device),
            cross_attn:  self.attention(device),
            ffn_linear1: LinearConfig::new(self.d_model, self.d_ff).init(device),
            ffn_linear2: LinearConfig::new(self.d_ff, self.d_model).init(device),
            norm1:       LayerNormConfig::new(self.d_model).init(device),
            norm2:       LayerNormConfig::new(self.d_model).init(device),
            norm3:       LayerNormConfig::new(self.d_model).init(device),
            dropout:     DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attn_output = self.self_attn.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub cross_attn:  MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub norm3:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> DecoderBlock<B> {
    /// x: [batch, target_len, d_model], memory: [batch, source_len, d_model]
    pub fn forward(&self, x: Tensor<B, 3>, memory: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch_size, seq_len, _] = x.dims();

        // Position t may only attend to positions <= t, otherwise teacher
        // forcing would let the decoder read the token it must predict.
        let causal = generate_autoregressive_mask::<B>(batch_size, seq_len, &x.device());
        let attn_output = self.self_attn
            .forward(MhaInput::self_attn(x.clone()).mask_attn(causal))
            .context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));

        let cross_output = self.cross_attn
            .forward(MhaInput::new(x.clone(), memory.clone(), memory))
            .context;
        let x = self.norm2.forward(x + self.dropout.forward(cross_output));

        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm3.forward(x + self.dropout.forward(ffn_out))
    }
}

/// Character-level encoder/decoder transformer.
///
/// Encoder reads the padded password ids, decoder reads the
/// teacher-forced label window, output head scores every target
/// vocabulary id at every decoder position.
#[derive(Module, Debug)]
pub struct TransformerSeq2Seq<B: Backend> {
    pub source_embedding: Embedding<B>,
    pub target_embedding: Embedding<B>,
    pub source_position:  Embedding<B>,
    pub target_position:  Embedding<B>,
    pub encoder:          Vec<EncoderBlock<B>>,
    pub decoder:          Vec<DecoderBlock<B>>,
    pub output:           Linear<B>,
    pub dropout:          Dropout,
    pub batch_size:       usize,
}

impl<B: Backend> TransformerSeq2Seq<B> {
    fn embed(
        &self,
        ids:      Tensor<B, 2, Int>,
        tokens:   &Embedding<B>,
        position: &Embedding<B>,
    ) -> Tensor<B, 3> {
        let [batch_size, seq_len] = ids.dims();
        let tok_emb = tokens.forward(ids);

        // Attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = position.forward(positions);

        self.dropout.forward(tok_emb + pos_emb)
    }

    /// source: [batch, source_len] → memory: [batch, source_len, d_model]
    pub fn encode(&self, source: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let mut x = self.embed(source, &self.source_embedding, &self.source_position);
        for block in &self.encoder {
            x = block.forward(x);
        }
        x
    }

    /// decoder_input: [batch, positions] → logits: [batch, positions, target_vocab]
    pub fn decode(&self, decoder_input: Tensor<B, 2, Int>, memory: Tensor<B, 3>) -> Tensor<B, 3> {
        let mut x = self.embed(decoder_input, &self.target_embedding, &self.target_position);
        for block in &self.decoder {
            x = block.forward(x, memory.clone());
        }
        self.output.forward(x)
    }
}

impl<B: Backend> Seq2SeqModel<B> for TransformerSeq2Seq<B> {
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn forward(&self, input: ModelInput<B>) -> Tensor<B, 3> {
        let memory = self.encode(input.source);
        self.decode(input.decoder_input, memory)
    }
}
