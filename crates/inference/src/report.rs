use {
    crate::{
        error::{InferError, Result},
        runtime::OutputTensor,
    },
    base::log_warn,
    std::io::Write,
};

/// Number of leading values printed from the first output.
pub const REPORTED_VALUES: usize = 10;

/// What the run produced, as far as the report is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputReport {
    /// Leading values of the first output and its total element count.
    Logits { values: Vec<f32>, total: usize },
    /// No outputs, or the first one is not a dense tensor.
    NoOutput,
}

impl OutputReport {
    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            OutputReport::Logits { values, .. } => {
                writeln!(out, "Logits output, first few values:")?;
                for value in values {
                    writeln!(out, "  {}", value)?;
                }
            }
            OutputReport::NoOutput => writeln!(out, "No logits output tensor found.")?,
        }
        Ok(())
    }
}

/// Summarize the first output, reading at most `count` values.
///
/// The buffer is only touched once the first output is known to be a dense
/// tensor. Outputs shorter than `count` are reported in full with a warning.
pub fn summarize<O: OutputTensor>(outputs: &[O], count: usize) -> Result<OutputReport> {
    let Some(first) = outputs.first() else {
        return Ok(OutputReport::NoOutput);
    };
    if !first.is_tensor().map_err(InferError::Output)? {
        return Ok(OutputReport::NoOutput);
    }

    let total = first.element_count().map_err(InferError::Output)?;
    if total < count {
        log_warn!(
            "first output has {} elements, fewer than the {} requested; reporting all of them",
            total,
            count
        );
    }
    let values = first
        .leading_f32(count.min(total))
        .map_err(InferError::Output)?;
    Ok(OutputReport::Logits { values, total })
}
