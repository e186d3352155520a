use {
    crate::{error::check_status, *},
    std::{
        ffi::{CStr, CString, c_char, c_void},
        sync::Arc,
    },
};

/// ONNX Runtime session
pub struct Session {
    pub onnx: Arc<Onnx>,
    pub(crate) session: *mut ffi::OrtSession,
}

// Session is Send because OrtSession is thread-safe with external synchronization
unsafe impl Send for Session {}

impl Session {
    /// Get the number of model inputs
    pub fn input_count(&self) -> Result<usize> {
        let mut count: usize = 0;
        let status = unsafe { (self.onnx.session_get_input_count)(self.session, &mut count) };
        unsafe { check_status(self.onnx.api, status, count) }
    }

    /// Get the number of model outputs
    pub fn output_count(&self) -> Result<usize> {
        let mut count: usize = 0;
        let status = unsafe { (self.onnx.session_get_output_count)(self.session, &mut count) };
        unsafe { check_status(self.onnx.api, status, count) }
    }

    /// Get the name of an input by index
    ///
    /// # Errors
    /// Returns an error if the index is invalid or the operation fails
    pub fn input_name(&self, index: usize) -> Result<String> {
        self.name_at(self.onnx.session_get_input_name, index)
    }

    /// Get the name of an output by index
    ///
    /// # Errors
    /// Returns an error if the index is invalid or the operation fails
    pub fn output_name(&self, index: usize) -> Result<String> {
        self.name_at(self.onnx.session_get_output_name, index)
    }

    /// All input names in declaration order.
    pub fn input_names(&self) -> Result<Vec<String>> {
        (0..self.input_count()?).map(|i| self.input_name(i)).collect()
    }

    /// All output names in declaration order.
    pub fn output_names(&self) -> Result<Vec<String>> {
        (0..self.output_count()?).map(|i| self.output_name(i)).collect()
    }

    fn name_at(&self, get_name: ffi::SessionGetNameFn, index: usize) -> Result<String> {
        let mut name_ptr: *mut c_char = std::ptr::null_mut();
        let status =
            unsafe { get_name(self.session, index, self.onnx.allocator, &mut name_ptr as *mut _) };
        unsafe { check_status(self.onnx.api, status, ())? };

        let name = unsafe { CStr::from_ptr(name_ptr) }
            .to_str()
            .map(str::to_string)
            .map_err(|_| OnnxError::runtime_error("Invalid UTF-8 in tensor name"));

        // the name was allocated by the runtime's default allocator
        let status =
            unsafe { (self.onnx.allocator_free)(self.onnx.allocator, name_ptr as *mut c_void) };
        unsafe { check_status(self.onnx.api, status, ())? };

        name
    }

    /// Run the model with named inputs, returning the requested outputs in order.
    ///
    /// # Errors
    /// Returns an error if inference fails
    pub fn run(&mut self, inputs: &[(&str, &Value)], output_names: &[&str]) -> Result<Vec<Value>> {
        let input_name_cstrings = inputs
            .iter()
            .map(|(name, _)| {
                CString::new(*name).map_err(|_| OnnxError::runtime_error("Null byte in input name"))
            })
            .collect::<Result<Vec<_>>>()?;
        let input_name_ptrs: Vec<_> = input_name_cstrings.iter().map(|s| s.as_ptr()).collect();
        let input_value_ptrs: Vec<_> = inputs.iter().map(|(_, value)| value.as_ptr()).collect();

        let output_name_cstrings = output_names
            .iter()
            .map(|name| {
                CString::new(*name).map_err(|_| OnnxError::runtime_error("Null byte in output name"))
            })
            .collect::<Result<Vec<_>>>()?;
        let output_name_ptrs: Vec<_> = output_name_cstrings.iter().map(|s| s.as_ptr()).collect();

        let mut output_value_ptrs: Vec<*mut ffi::OrtValue> =
            vec![std::ptr::null_mut(); output_names.len()];

        let status = unsafe {
            (self.onnx.run)(
                self.session,
                std::ptr::null(), // default run options
                input_name_ptrs.as_ptr(),
                input_value_ptrs.as_ptr(),
                inputs.len(),
                output_name_ptrs.as_ptr(),
                output_names.len(),
                output_value_ptrs.as_mut_ptr(),
            )
        };

        if !status.is_null() {
            for &output_ptr in &output_value_ptrs {
                if !output_ptr.is_null() {
                    unsafe { (self.onnx.release_value)(output_ptr) };
                }
            }
            return Err(unsafe { OnnxError::from_status(self.onnx.api, status) });
        }

        Ok(output_value_ptrs
            .into_iter()
            .map(|value_ptr| unsafe { Value::from_raw(&self.onnx, value_ptr) })
            .collect())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.session.is_null() {
            unsafe { (self.onnx.release_session)(self.session) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Session>();
    }
}
