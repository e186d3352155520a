pub mod assembly;
pub mod config;
pub mod error;
mod inference;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod runtime;

pub use {
    assembly::{DecoderInputs, PAST_SHAPE, REQUIRED_INPUTS, TOKEN_SHAPE, TensorData, TensorView},
    config::{RunConfig, model_path_from_args},
    error::{InferError, Result},
    inference::{Inference, run_with_onnx},
    pipeline::{EXIT_FAILURE, EXIT_SUCCESS, exit_code, run_pipeline},
    provider::Provider,
    report::{OutputReport, REPORTED_VALUES, summarize},
    runtime::{ModelSession, OutputTensor, Runtime, SessionConfig},
};
