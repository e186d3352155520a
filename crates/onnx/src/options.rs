use {
    crate::{error::check_status, *},
    std::{ffi::c_void, sync::Arc},
};

/// Session configuration, mutated before the session is created.
///
/// Every setter reports failure through the runtime's status object, converted
/// to [`OnnxError`]; nothing here panics.
pub struct SessionOptions {
    pub(crate) onnx: Arc<Onnx>,
    pub(crate) options: *mut ffi::OrtSessionOptions,
}

unsafe impl Send for SessionOptions {}

impl SessionOptions {
    pub(crate) fn as_ptr(&self) -> *const ffi::OrtSessionOptions {
        self.options
    }

    pub fn set_execution_mode(&mut self, mode: ffi::ExecutionMode) -> Result<()> {
        let status = unsafe { (self.onnx.set_session_execution_mode)(self.options, mode) };
        unsafe { check_status(self.onnx.api, status, ()) }
    }

    pub fn disable_mem_pattern(&mut self) -> Result<()> {
        let status = unsafe { (self.onnx.disable_mem_pattern)(self.options) };
        unsafe { check_status(self.onnx.api, status, ()) }
    }

    /// Append the CUDA execution provider for `device_id` (0 = first GPU).
    pub fn append_cuda(&mut self, device_id: i32) -> Result<()> {
        let append = self.onnx.append_cuda.ok_or_else(|| {
            OnnxError::new(
                ffi::OrtErrorCode::EpFail,
                "CUDA execution provider is not available in this onnxruntime build",
            )
        })?;
        let status = unsafe { append(self.options, device_id) };
        unsafe { check_status(self.onnx.api, status, ()) }
    }

    /// Look up the DirectML provider table and append the provider for
    /// `device_id` (0 = first adapter).
    ///
    /// DirectML cannot run overlapping work on the GPU: callers must also set
    /// [`ffi::ExecutionMode::Sequential`] and disable the memory pattern.
    pub fn append_directml(&mut self, device_id: i32) -> Result<()> {
        let mut dml_api: *const c_void = std::ptr::null();
        let status = unsafe {
            (self.onnx.get_execution_provider_api)(
                c"DML".as_ptr(),
                ffi::ORT_API_VERSION,
                &mut dml_api as *mut _,
            )
        };
        unsafe { check_status(self.onnx.api, status, ())? };
        if dml_api.is_null() {
            return Err(OnnxError::new(
                ffi::OrtErrorCode::EpFail,
                "DirectML API table not returned by the runtime",
            ));
        }

        let dml_api = unsafe { &*(dml_api as *const ffi::OrtDmlApi) };
        let status =
            unsafe { (dml_api.SessionOptionsAppendExecutionProvider_DML)(self.options, device_id) };
        unsafe { check_status(self.onnx.api, status, ()) }
    }
}

impl Drop for SessionOptions {
    fn drop(&mut self) {
        if !self.options.is_null() {
            unsafe { (self.onnx.release_session_options)(self.options) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_options_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SessionOptions>();
    }
}
