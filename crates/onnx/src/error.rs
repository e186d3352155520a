use {
    crate::ffi::{self, OrtApi, OrtErrorCode, OrtStatus},
    std::ffi::CStr,
    thiserror::Error,
};

/// Error type for ONNX operations
///
/// Every non-null `OrtStatus` returned by the runtime is turned into one of
/// these at the call site, so callers only ever see `Result`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ONNX error ({code:?}): {message}")]
pub struct OnnxError {
    code: OrtErrorCode,
    message: String,
}

impl OnnxError {
    pub fn new(code: OrtErrorCode, message: impl Into<String>) -> Self {
        OnnxError {
            code,
            message: message.into(),
        }
    }

    /// Create a runtime error with a message
    pub fn runtime_error(msg: impl Into<String>) -> Self {
        Self::new(OrtErrorCode::RuntimeException, msg)
    }

    /// Create an error from an OrtStatus pointer, releasing the status.
    ///
    /// # Safety
    /// - status must be a valid non-null OrtStatus pointer
    /// - api must be a valid OrtApi pointer
    pub(crate) unsafe fn from_status(api: *const OrtApi, status: *mut OrtStatus) -> Self {
        unsafe {
            let api_ref = &*api;

            let get_error_code: ffi::GetErrorCodeFn = api_ref.get_fn(ffi::IDX_GET_ERROR_CODE);
            let code = OrtErrorCode::try_from(get_error_code(status)).unwrap_or(OrtErrorCode::Fail);

            let get_error_message: ffi::GetErrorMessageFn =
                api_ref.get_fn(ffi::IDX_GET_ERROR_MESSAGE);
            let msg_ptr = get_error_message(status);
            let message = if msg_ptr.is_null() {
                String::from("Unknown error")
            } else {
                CStr::from_ptr(msg_ptr).to_string_lossy().into_owned()
            };

            let release_status: ffi::ReleaseStatusFn = api_ref.get_fn(ffi::IDX_RELEASE_STATUS);
            release_status(status);

            OnnxError { code, message }
        }
    }

    pub fn code(&self) -> OrtErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for ONNX operations
pub type Result<T> = std::result::Result<T, OnnxError>;

/// Convert an OrtStatus into a Result, yielding `value` on success.
///
/// # Safety
/// - status can be null (indicates success)
/// - if non-null, status must be a valid OrtStatus pointer
/// - api must be a valid OrtApi pointer
pub(crate) unsafe fn check_status<T>(
    api: *const OrtApi,
    status: *mut OrtStatus,
    value: T,
) -> Result<T> {
    if status.is_null() {
        Ok(value)
    } else {
        unsafe { Err(OnnxError::from_status(api, status)) }
    }
}
