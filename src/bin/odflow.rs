//! `odflow` command-line front-end.
//!
//! * `odflow run <input_dir>` – batch over every matching file of a directory.
//! * `odflow file <csv>` – single file, outputs next to it unless `--output-prefix` is given.
use anyhow::{bail, Context};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use odflow::{
    batch::{output_prefix, run_batch},
    od_matrix::writer::OutputPaths,
    BatchParams, OdSession, ReaderParams,
};

#[derive(Parser, Debug)]
#[command(name = "odflow", version)]
#[command(about = "Vehicle trajectories and origin-destination matrices from sensor detection logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process every matching detection file of a directory
    Run {
        input_dir: Utf8PathBuf,

        /// Output directory [default: <input_dir>/output]
        #[arg(long)]
        output_dir: Option<Utf8PathBuf>,

        /// Regex matched against file names
        #[arg(long, default_value = odflow::params::DEFAULT_FILE_PATTERN)]
        pattern: String,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Process a single detection file
    File {
        csv: Utf8PathBuf,

        /// Prefix of the output files [default: <csv dir>/<csv stem>_]
        #[arg(long)]
        output_prefix: Option<Utf8PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Field separator of the detection records
    #[arg(long, default_value_t = ';')]
    separator: char,

    /// Do not write the max travel time matrix
    #[arg(long)]
    no_max_time: bool,
}

impl CommonArgs {
    fn reader_params(&self) -> anyhow::Result<ReaderParams> {
        let Ok(separator) = u8::try_from(self.separator) else {
            bail!("separator {:?} is not a single-byte character", self.separator);
        };
        Ok(ReaderParams::builder().separator(separator).build()?)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input_dir,
            output_dir,
            pattern,
            common,
        } => {
            let mut builder = BatchParams::builder(&input_dir)
                .file_pattern(pattern)
                .write_max_time(!common.no_max_time)
                .reader(common.reader_params()?);
            if let Some(dir) = output_dir {
                builder = builder.output_dir(dir);
            }
            let params = builder.build()?;

            let report = run_batch(&params)
                .with_context(|| format!("batch over {input_dir} failed"))?;
            if !report.is_success() {
                bail!(
                    "{} of {} files failed",
                    report.failed.len(),
                    report.file_count()
                );
            }
        }
        Commands::File {
            csv,
            output_prefix: prefix,
            common,
        } => {
            let prefix = match prefix {
                Some(p) => p,
                None => output_prefix(csv.parent().unwrap_or(Utf8Path::new(".")), &csv),
            };
            let paths = OutputPaths::from_prefix(&prefix);

            let mut session = OdSession::new(common.reader_params()?);
            session
                .ingest_file(&csv, true)
                .with_context(|| format!("cannot ingest {csv}"))?;
            session.generate_od_matrix()?;
            session.save_trajectories(&paths)?;
            session.save_od_matrix(&paths, !common.no_max_time)?;
            info!(prefix = %prefix, "outputs written");
        }
    }

    Ok(())
}
