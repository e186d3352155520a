//! Thin safe wrapper over the ONNX Runtime C API.
//!
//! The shared library is loaded at runtime ([`dl`]), the versioned `OrtApi`
//! table is resolved once into [`Onnx`], and every status object coming back
//! from the runtime is converted to [`OnnxError`].

pub mod dl;
pub mod error;
pub mod ffi;
mod onnx;
mod options;
mod session;
mod value;

pub use error::{OnnxError, Result};
pub use ffi::{
    ExecutionMode, ONNXTensorElementDataType as ElementType, OrtErrorCode as ErrorCode,
    OrtLoggingLevel as LoggingLevel,
};
pub use onnx::Onnx;
pub use options::SessionOptions;
pub use session::Session;
pub use value::{TensorElement, Value};
