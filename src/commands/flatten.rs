use std::path::PathBuf;
use std::process::ExitCode;

use dcc_lib::engine::{flatten, validate_design_tree};
use dcc_lib::output::{FlattenOutput, DCC_OUTPUT_VERSION};
use dcc_lib::{Config, DccError, DccOutput};

use crate::cli::FlattenArgs;
use crate::formatting::{render_error, write_output};
use crate::pipeline::design_source;
use crate::settings::{load_config, log_effective_config};

/// Run the flatten command.
pub async fn run_flatten(config_path: Option<PathBuf>, args: FlattenArgs) -> ExitCode {
    let format = args.format;
    let output = args.output.clone();

    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    log_effective_config(&config, config_path.as_deref());

    match execute(&config, &args).await {
        Ok(body) => {
            if let Err(err) = write_output(&DccOutput::Flatten(body), format, output) {
                eprintln!("Failed to write output: {err}");
                return ExitCode::from(2);
            }
            ExitCode::SUCCESS
        }
        Err(err) => render_error(err, format, output),
    }
}

async fn execute(config: &Config, args: &FlattenArgs) -> Result<FlattenOutput, DccError> {
    let source = design_source(&args.design, args.node_id.as_deref(), config)?;
    let design = source.fetch().await?;
    validate_design_tree(&design)?;
    let nodes = flatten(&design).into_iter().map(|n| n.detached()).collect();

    Ok(FlattenOutput {
        version: DCC_OUTPUT_VERSION.to_string(),
        design: source.describe(),
        total_nodes: design.node_count(),
        nodes,
    })
}
