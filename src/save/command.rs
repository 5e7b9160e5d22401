use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::info;

use crate::save::request::{ResultsSaver, SaveRequest};
use crate::table::UploadTable;

/// Default name of the external upload program, looked up on PATH
pub static SAVE_RESULTS_BIN: &str = "save_results_epi";

/// Uploads results by running an external program
///
/// The program receives one flag per request field and must print the upload result table as CSV
/// on stdout. Leading arguments are passed before the request flags, which makes it possible to
/// run an interpreter with a script (e.g. `python save.py`).
pub struct CommandSaver {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSaver {
    pub fn new(program: PathBuf, args: Vec<String>) -> CommandSaver {
        CommandSaver { program, args }
    }

    fn command(&self, request: &SaveRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--modelable_entity_id").arg(request.modelable_entity_id.to_string())
            .arg("--description").arg(&request.description)
            .arg("--input_dir").arg(&request.input_dir)
            .arg("--input_file_pattern").arg(&request.input_file_pattern);

        if !request.measure_id.is_empty() {
            cmd.arg("--measure_id").args(request.measure_id.iter().map(|id| id.to_string()));
        }
        if !request.year_id.is_empty() {
            cmd.arg("--year_id").args(request.year_id.iter().map(|id| id.to_string()));
        }
        if let Some(round) = request.gbd_round_id {
            cmd.arg("--gbd_round_id").arg(round.to_string());
        }
        if request.mark_best {
            cmd.arg("--mark_best");
        }
        cmd
    }
}

impl ResultsSaver for CommandSaver {
    fn save(&self, request: &SaveRequest) -> Result<UploadTable> {
        let mut cmd = self.command(request);
        info!("Running {} process", self.program.display());
        info!("{:?}", &cmd);

        let output = cmd.output()
            .with_context(|| format!("Failed to execute {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} exited with {}: {}", self.program.display(), output.status, stderr.trim());
        }

        UploadTable::from_reader(output.stdout.as_slice())
            .context("Parsing upload result table")
    }
}
