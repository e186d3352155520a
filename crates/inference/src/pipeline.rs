//! The single inference request, from session configuration to report.

use {
    crate::{
        assembly::DecoderInputs,
        config::RunConfig,
        error::{InferError, Result},
        provider::Provider,
        report::{OutputReport, summarize},
        runtime::{ModelSession, Runtime},
    },
    base::{log_debug, log_info},
    std::io::Write,
};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = -1;

/// Process exit status for a finished run.
pub fn exit_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// Configure the provider, load the model, feed it synthetic decoder inputs
/// and report the leading values of the first output.
///
/// Progress lines go to `out`. Any failure stops the run at its stage; no
/// later stage is attempted.
pub fn run_pipeline<R, W>(
    runtime: &R,
    provider: &Provider,
    config: &RunConfig,
    out: &mut W,
) -> Result<OutputReport>
where
    R: Runtime,
    W: Write,
{
    let mut session_config = runtime.session_config().map_err(InferError::Environment)?;
    provider.configure(&mut session_config)?;
    provider.append(&mut session_config)?;
    writeln!(out, "{}", provider.banner())?;

    let mut session = runtime
        .load_session(session_config, &config.model_path)
        .map_err(|source| InferError::ModelLoad {
            path: config.model_path.clone(),
            source,
        })?;
    log_info!("loaded {} on {}", config.model_path.display(), provider);

    let input_names = session.input_names().map_err(InferError::Session)?;
    writeln!(out, "Input Names:")?;
    for name in &input_names {
        writeln!(out, "  {}", name)?;
    }

    let inputs = DecoderInputs::new();
    let bindings = inputs.bind(&input_names)?;

    let output_names = session.output_names().map_err(InferError::Session)?;
    let output_refs: Vec<&str> = output_names.iter().map(String::as_str).collect();
    log_debug!(
        "running with {} inputs, {} outputs",
        bindings.len(),
        output_refs.len()
    );

    let outputs = session
        .run(&bindings, &output_refs)
        .map_err(InferError::Run)?;

    let report = summarize(&outputs, config.reported_values)?;
    report.write_to(out)?;
    Ok(report)
}
