use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;

use crate::db::open::open_db;
use crate::db::upload::load::get_upload_record;
use crate::db::upload::model_type::ModelType;
use crate::save::command::{CommandSaver, SAVE_RESULTS_BIN};
use crate::save::worker::{run_paf, run_split};

mod db;
mod save;
mod table;

#[derive(Debug, Parser)]
#[command(name = "epi-save")]
#[command(version = "0.1.0")]
#[command(about = "Upload epi model results and keep a record of successful uploads")]
struct Args {
    /// Directory for the upload database and marker files
    #[arg(long, env = "EPI_SAVE_WORK_DIR", default_value = ".")]
    work_dir: PathBuf,
    /// External program that performs the upload and prints its result table as CSV
    #[arg(long, env = "EPI_SAVE_RESULTS_BIN", default_value = SAVE_RESULTS_BIN)]
    saver: PathBuf,
    /// Argument passed to the upload program before the request flags (repeatable)
    #[arg(long, allow_hyphen_values = true)]
    saver_arg: Vec<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload split model results and mark them best
    Split(SplitArgs),
    /// Upload PAF results for GBD round 5 and mark them best
    Paf(PafArgs),
}

#[derive(Debug, ClapArgs)]
pub struct SplitArgs {
    /// The modelable_entity id number
    #[arg(long = "meid")]
    pub meid: i64,
    /// The description
    #[arg(long = "desc")]
    pub desc: String,
    /// Directory containing the .h5 files created by the split
    #[arg(long = "indir")]
    pub indir: PathBuf,
    /// The measure_id(s) being uploaded
    #[arg(long = "meas_id", num_args = 0..)]
    pub meas_id: Vec<i64>,
    /// Run id of the model that is being split
    #[arg(long = "cnf_run_id")]
    pub cnf_run_id: Option<i64>,
}

#[derive(Debug, ClapArgs)]
pub struct PafArgs {
    /// me_id to upload to
    #[arg(long = "me_id")]
    pub me_id: i64,
    /// year_id(s) in data, whitespace separated
    #[arg(long = "year_id", value_parser = parse_year_ids)]
    pub year_id: Option<YearIds>,
    /// measure_id in data
    #[arg(long = "measure_id")]
    pub measure_id: i64,
    /// Description of estimates
    #[arg(long = "description")]
    pub description: String,
    /// Directory where files are saved
    #[arg(long = "input_dir")]
    pub input_dir: PathBuf,
}

/// Year ids given as a single whitespace separated argument, e.g. `--year_id "1990 1995 2000"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearIds(pub Vec<i64>);

fn parse_year_ids(value: &str) -> Result<YearIds, String> {
    value.split_whitespace()
        .map(|year| year.parse::<i64>().map_err(|err| format!("{year:?} is not a year id: {err}")))
        .collect::<Result<Vec<i64>, String>>()
        .map(YearIds)
}

/// Root of everything written locally: the upload database and marker files
pub struct WorkingDirectory {
    pub path: PathBuf,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("epi-save starting up");

    let args = Args::parse();
    let saver = CommandSaver::new(args.saver, args.saver_arg);

    match args.command {
        Command::Split(split) => {
            fs::create_dir_all(&args.work_dir)
                .with_context(|| format!("Creating working directory {}", args.work_dir.display()))?;
            let wd = WorkingDirectory { path: args.work_dir };
            let conn = open_db(&wd)?;

            match run_split(&saver, &conn, &wd, &split)? {
                true => {
                    if let Some(record) = get_upload_record(&conn, split.meid, split.cnf_run_id, ModelType::SplitCustomEpi)? {
                        info!("Recorded {} model version {} for {} (run {:?}) at {}", record.model_type, record.model_version_id,
                              record.modelable_entity_id, record.run_id, record.uploaded_at);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                false => Ok(ExitCode::FAILURE)
            }
        }
        Command::Paf(paf) => {
            run_paf(&saver, &paf)?;
            info!("Upload of {} complete", paf.me_id);
            Ok(ExitCode::SUCCESS)
        }
    }
}
