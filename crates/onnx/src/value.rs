use {
    crate::{error::check_status, *},
    half::f16,
    std::{
        ffi::{c_int, c_void},
        sync::Arc,
    },
};

/// Sealed trait for types that can be used as tensor elements
mod sealed {
    pub trait Sealed {}
}

/// Types that can be used as tensor elements
pub trait TensorElement: sealed::Sealed + Sized + Copy {
    fn element_type() -> ffi::ONNXTensorElementDataType;
}

macro_rules! tensor_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl TensorElement for $ty {
                fn element_type() -> ffi::ONNXTensorElementDataType {
                    ffi::ONNXTensorElementDataType::$variant
                }
            }
        )*
    };
}

tensor_element! {
    f32 => Float,
    f64 => Double,
    f16 => Float16,
    i64 => Int64,
    i32 => Int32,
    bool => Bool,
}

/// ONNX Runtime value (tensor)
pub struct Value {
    onnx: Arc<Onnx>,
    value: *mut ffi::OrtValue,
    // Own the data buffer to ensure it lives as long as the Value
    _data: Box<[u8]>,
}

unsafe impl Send for Value {}

impl Value {
    /// Create a CPU tensor of `shape` holding a copy of `data`.
    ///
    /// A shape containing a zero dimension takes an empty `data` slice; the
    /// resulting tensor has no elements.
    pub fn from_slice<T: TensorElement>(
        onnx: &Arc<Onnx>,
        shape: &[usize],
        data: &[T],
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(OnnxError::runtime_error(format!(
                "Data length {} doesn't match shape {:?} (expected {})",
                data.len(),
                shape,
                expected_len
            )));
        }

        let byte_len = std::mem::size_of_val(data);
        let mut buffer = vec![0u8; byte_len].into_boxed_slice();
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr() as *const u8, buffer.as_mut_ptr(), byte_len)
        };

        let mut memory_info: *mut ffi::OrtMemoryInfo = std::ptr::null_mut();
        let status = unsafe {
            (onnx.create_memory_info)(
                ffi::OrtAllocatorType::Device,
                ffi::OrtMemType::CpuOutput,
                &mut memory_info as *mut _,
            )
        };
        unsafe { check_status(onnx.api, status, ())? };

        let shape_i64: Vec<i64> = shape.iter().map(|&s| s as i64).collect();

        let mut value: *mut ffi::OrtValue = std::ptr::null_mut();
        let status = unsafe {
            (onnx.create_tensor)(
                memory_info,
                buffer.as_mut_ptr() as *mut c_void,
                byte_len,
                shape_i64.as_ptr(),
                shape_i64.len(),
                T::element_type(),
                &mut value as *mut _,
            )
        };
        unsafe { (onnx.release_memory_info)(memory_info) };
        unsafe { check_status(onnx.api, status, ())? };

        Ok(Value {
            onnx: Arc::clone(onnx),
            value,
            _data: buffer,
        })
    }

    /// Whether this value is a dense tensor (as opposed to a map, sequence,
    /// sparse tensor or missing optional).
    pub fn is_tensor(&self) -> Result<bool> {
        if self.value.is_null() {
            return Ok(false);
        }
        let mut out: i32 = 0;
        let status = unsafe { (self.onnx.is_tensor)(self.value, &mut out) };
        unsafe { check_status(self.onnx.api, status, out != 0) }
    }

    /// Run `f` against this tensor's type-and-shape info, releasing it afterwards.
    fn with_type_info<R>(
        &self,
        f: impl FnOnce(*const ffi::OrtTensorTypeAndShapeInfo) -> Result<R>,
    ) -> Result<R> {
        let mut type_info: *mut ffi::OrtTensorTypeAndShapeInfo = std::ptr::null_mut();
        let status =
            unsafe { (self.onnx.get_tensor_type_and_shape)(self.value, &mut type_info as *mut _) };
        unsafe { check_status(self.onnx.api, status, ())? };
        let result = f(type_info);
        unsafe { (self.onnx.release_tensor_type_and_shape_info)(type_info) };
        result
    }

    pub fn tensor_element_type(&self) -> Result<ffi::ONNXTensorElementDataType> {
        self.with_type_info(|info| {
            let mut raw: c_int = 0;
            let status = unsafe { (self.onnx.get_tensor_element_type)(info, &mut raw) };
            unsafe { check_status(self.onnx.api, status, ())? };
            Ok(ffi::ONNXTensorElementDataType::try_from(raw)
                .unwrap_or(ffi::ONNXTensorElementDataType::Undefined))
        })
    }

    pub fn tensor_shape(&self) -> Result<Vec<i64>> {
        self.with_type_info(|info| {
            let mut dim_count: usize = 0;
            let status = unsafe { (self.onnx.get_dimensions_count)(info, &mut dim_count) };
            unsafe { check_status(self.onnx.api, status, ())? };

            let mut dims = vec![0i64; dim_count];
            let status = unsafe { (self.onnx.get_dimensions)(info, dims.as_mut_ptr(), dim_count) };
            unsafe { check_status(self.onnx.api, status, dims) }
        })
    }

    /// Total number of elements (product of the shape).
    pub fn element_count(&self) -> Result<usize> {
        self.with_type_info(|info| {
            let mut count: usize = 0;
            let status = unsafe { (self.onnx.get_tensor_shape_element_count)(info, &mut count) };
            unsafe { check_status(self.onnx.api, status, count) }
        })
    }

    /// Borrow the tensor's buffer as `T`. Fails unless the element type is exactly `T`.
    pub fn extract_tensor<T: TensorElement>(&self) -> Result<&[T]> {
        let element_type = self.tensor_element_type()?;
        if element_type != T::element_type() {
            return Err(OnnxError::runtime_error(format!(
                "Element type mismatch: expected {:?}, got {:?}",
                T::element_type(),
                element_type
            )));
        }

        let elem_count = self.element_count()?;
        // empty tensors may carry a null data pointer
        if elem_count == 0 {
            return Ok(&[]);
        }

        let mut data_ptr: *mut c_void = std::ptr::null_mut();
        let status = unsafe { (self.onnx.get_tensor_mutable_data)(self.value, &mut data_ptr) };
        unsafe { check_status(self.onnx.api, status, ())? };
        if data_ptr.is_null() {
            return Err(OnnxError::runtime_error("Tensor has no data buffer"));
        }

        Ok(unsafe { std::slice::from_raw_parts(data_ptr as *const T, elem_count) })
    }

    /// Copy at most `limit` leading elements as `f32`, widening `f16` data.
    pub fn extract_as_f32(&self, limit: usize) -> Result<Vec<f32>> {
        match self.tensor_element_type()? {
            ffi::ONNXTensorElementDataType::Float => {
                let data = self.extract_tensor::<f32>()?;
                Ok(data.iter().take(limit).copied().collect())
            }
            ffi::ONNXTensorElementDataType::Float16 => {
                let data = self.extract_tensor::<f16>()?;
                Ok(data.iter().take(limit).map(|h| h.to_f32()).collect())
            }
            other => Err(OnnxError::runtime_error(format!(
                "extract_as_f32: unsupported element type {:?}",
                other
            ))),
        }
    }

    pub(crate) fn as_ptr(&self) -> *const ffi::OrtValue {
        self.value
    }

    /// Wrap a value produced by the runtime (e.g. a `Run` output).
    ///
    /// # Safety
    /// `value` must be null or an OrtValue owned by the caller, created by `onnx`.
    pub(crate) unsafe fn from_raw(onnx: &Arc<Onnx>, value: *mut ffi::OrtValue) -> Self {
        Value {
            onnx: Arc::clone(onnx),
            value,
            _data: Box::new([]),
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        if !self.value.is_null() {
            unsafe { (self.onnx.release_value)(self.value) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Value>();
    }

    #[test]
    fn test_tensor_element_types() {
        assert_eq!(f32::element_type(), ffi::ONNXTensorElementDataType::Float);
        assert_eq!(f64::element_type(), ffi::ONNXTensorElementDataType::Double);
        assert_eq!(f16::element_type(), ffi::ONNXTensorElementDataType::Float16);
        assert_eq!(i64::element_type(), ffi::ONNXTensorElementDataType::Int64);
        assert_eq!(i32::element_type(), ffi::ONNXTensorElementDataType::Int32);
        assert_eq!(bool::element_type(), ffi::ONNXTensorElementDataType::Bool);
    }
}
