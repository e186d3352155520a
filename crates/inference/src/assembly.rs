//! Synthetic decoder inputs.
//!
//! Three `[1, 3]` int64 tensors (token ids, position ids, attention mask) are
//! followed by one empty past key/value cache tensor per remaining model
//! input. Binding is positional against the model's declared input order.

use {
    crate::error::{InferError, Result},
    half::f16,
    onnx::ElementType,
};

pub const SEQUENCE_LENGTH: usize = 3;

/// Inputs every decoder model must declare before its cache slots.
pub const REQUIRED_INPUTS: usize = 3;

pub const TOKEN_SHAPE: [usize; 2] = [1, SEQUENCE_LENGTH];

/// `[batch, heads, past_sequence_length, head_dim]`; the past length is 0.
pub const PAST_SHAPE: [usize; 4] = [1, 32, 0, 96];

/// Borrowed tensor contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TensorData<'a> {
    Int64(&'a [i64]),
    Float16(&'a [f16]),
}

impl TensorData<'_> {
    pub fn len(&self) -> usize {
        match self {
            TensorData::Int64(data) => data.len(),
            TensorData::Float16(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TensorData::Int64(_) => ElementType::Int64,
            TensorData::Float16(_) => ElementType::Float16,
        }
    }

    /// Address of the backing buffer, used to check that views share storage.
    pub fn as_ptr(&self) -> *const u8 {
        match self {
            TensorData::Int64(data) => data.as_ptr() as *const u8,
            TensorData::Float16(data) => data.as_ptr() as *const u8,
        }
    }
}

/// Non-owning tensor: a shape over a caller-owned buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TensorView<'a> {
    shape: &'a [usize],
    data: TensorData<'a>,
}

impl<'a> TensorView<'a> {
    /// Fails if `data` does not hold exactly `product(shape)` elements.
    pub fn new(shape: &'a [usize], data: TensorData<'a>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(InferError::Shape {
                shape: shape.to_vec(),
                expected,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    pub fn data(&self) -> TensorData<'a> {
        self.data
    }

    pub fn element_count(&self) -> usize {
        self.data.len()
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }
}

/// Owns the buffers behind every bound input.
#[derive(Debug, Clone)]
pub struct DecoderInputs {
    input_ids: [i64; SEQUENCE_LENGTH],
    position_ids: [i64; SEQUENCE_LENGTH],
    attention_mask: [i64; SEQUENCE_LENGTH],
    // shared by every cache slot
    past: Vec<f16>,
}

impl Default for DecoderInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderInputs {
    pub fn new() -> Self {
        Self {
            input_ids: [1, 2, 3],
            position_ids: [0, 1, 2],
            attention_mask: [1, 1, 1],
            past: Vec::new(),
        }
    }

    /// Pair each declared input name with its tensor, in declaration order.
    ///
    /// The first three names get token ids, position ids and attention mask;
    /// every further name gets an empty `[1, 32, 0, 96]` f16 view over the same
    /// buffer.
    pub fn bind<'a>(&'a self, input_names: &'a [String]) -> Result<Vec<(&'a str, TensorView<'a>)>> {
        if input_names.len() < REQUIRED_INPUTS {
            return Err(InferError::Signature {
                expected: REQUIRED_INPUTS,
                found: input_names.len(),
            });
        }

        let leading = [
            TensorData::Int64(&self.input_ids),
            TensorData::Int64(&self.position_ids),
            TensorData::Int64(&self.attention_mask),
        ];
        let mut bindings = Vec::with_capacity(input_names.len());
        for (name, data) in input_names.iter().zip(leading) {
            bindings.push((name.as_str(), TensorView::new(&TOKEN_SHAPE, data)?));
        }
        for name in &input_names[REQUIRED_INPUTS..] {
            let view = TensorView::new(&PAST_SHAPE, TensorData::Float16(&self.past))?;
            bindings.push((name.as_str(), view));
        }
        Ok(bindings)
    }
}
