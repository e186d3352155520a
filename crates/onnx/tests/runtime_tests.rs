// These tests need libonnxruntime at runtime. Without it they only check that
// loading fails cleanly.

use {
    half::f16,
    onnx::{ElementType, LoggingLevel, Onnx},
    std::sync::Arc,
};

fn runtime() -> Option<Arc<Onnx>> {
    match Onnx::new(LoggingLevel::Warning, "onnx-tests") {
        Ok(onnx) => Some(onnx),
        Err(error) => {
            eprintln!("onnxruntime not available, skipping: {}", error);
            None
        }
    }
}

#[test]
fn test_missing_model_fails_to_load() {
    let Some(onnx) = runtime() else { return };
    let options = onnx.session_options().unwrap();
    let result = onnx.create_session(options, "/nonexistent/model.onnx");
    assert!(result.is_err(), "Should error for non-existent file");
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let Some(onnx) = runtime() else { return };
    let result = onnx::Value::from_slice::<i64>(&onnx, &[1, 3], &[1, 2]);
    assert!(result.is_err());
}

#[test]
fn test_int64_tensor_contents() {
    let Some(onnx) = runtime() else { return };
    let value = onnx::Value::from_slice::<i64>(&onnx, &[1, 3], &[1, 2, 3]).unwrap();
    assert!(value.is_tensor().unwrap());
    assert_eq!(value.tensor_shape().unwrap(), vec![1, 3]);
    assert_eq!(value.tensor_element_type().unwrap(), ElementType::Int64);
    assert_eq!(value.extract_tensor::<i64>().unwrap(), &[1, 2, 3]);
}

#[test]
fn test_empty_past_tensor() {
    let Some(onnx) = runtime() else { return };
    let empty: Vec<f16> = Vec::new();
    let value = onnx::Value::from_slice::<f16>(&onnx, &[1, 32, 0, 96], &empty).unwrap();
    assert_eq!(value.tensor_shape().unwrap(), vec![1, 32, 0, 96]);
    assert_eq!(value.element_count().unwrap(), 0);
    assert_eq!(value.tensor_element_type().unwrap(), ElementType::Float16);
    assert!(value.extract_tensor::<f16>().unwrap().is_empty());
}

#[test]
fn test_extract_as_f32_widens_and_truncates() {
    let Some(onnx) = runtime() else { return };
    let halves: Vec<f16> = [0.5f32, 1.0, -2.0].iter().map(|&v| f16::from_f32(v)).collect();
    let value = onnx::Value::from_slice::<f16>(&onnx, &[3], &halves).unwrap();
    assert_eq!(value.extract_as_f32(2).unwrap(), vec![0.5, 1.0]);
    assert_eq!(value.extract_as_f32(10).unwrap(), vec![0.5, 1.0, -2.0]);
}

#[test]
fn test_wrong_element_type_is_rejected() {
    let Some(onnx) = runtime() else { return };
    let value = onnx::Value::from_slice::<i64>(&onnx, &[2], &[4, 5]).unwrap();
    assert!(value.extract_tensor::<f32>().is_err());
    assert!(value.extract_as_f32(2).is_err());
}

#[test]
fn test_directml_lookup_reports_status() {
    let Some(onnx) = runtime() else { return };
    let mut options = onnx.session_options().unwrap();
    // DirectML only exists in Windows builds; elsewhere this must be an error, not a crash.
    if !cfg!(windows) {
        assert!(options.append_directml(0).is_err());
    }
}
