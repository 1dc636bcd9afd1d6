//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CubeError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &CubeError) -> String {
    match e {
        CubeError::ExternalTool(tool) if tool.status.is_none() => format!(
            "{}\nIs `{}` installed and on PATH? Set repository.git_program to override.",
            e, tool.program
        ),
        _ => e.to_string(),
    }
}
