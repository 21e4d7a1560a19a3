//! Command-line driver for the IMU to OpenSense conversion.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{error, info};

use imu_opensense::pipeline::load_trial_table;
use imu_opensense::{
    export_sensor_files, export_sensor_files_lenient, run_motion_export, ConversionConfig,
    SensorMapping,
};

#[derive(Parser, Debug)]
#[command(name = "imu-opensense", version)]
#[command(about = "Convert IMU recordings to OpenSense text files and OpenSim motion files")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one Xsens-style orientation file per sensor
    Sensors {
        #[command(flatten)]
        common: CommonArgs,

        /// Sensors to export (default: the full FDA dataset list)
        #[arg(long, value_delimiter = ',')]
        sensors: Vec<String>,

        /// Skip sensors that fail instead of aborting
        #[arg(long, default_value_t = false)]
        keep_going: bool,
    },
    /// Write one OpenSim quaternion motion file for the trial
    Motion {
        #[command(flatten)]
        common: CommonArgs,

        /// JSON file overriding the sensor to OpenSim IMU mapping
        #[arg(long, value_name = "FILE")]
        mapping: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory holding the recordings
    #[arg(long, value_name = "DIR")]
    input_dir: PathBuf,

    /// Subject label
    #[arg(long)]
    subject: String,

    /// Trial label
    #[arg(long)]
    trial: String,

    /// Output directory (default: <INPUT_DIR>/OpenSense/<SUBJECT>)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Nominal sample rate in Hz
    #[arg(long, default_value_t = imu_opensense::DEFAULT_SAMPLE_RATE)]
    sample_rate: f64,
}

impl CommonArgs {
    fn config(&self) -> ConversionConfig {
        let output_dir = self.output_dir.clone().unwrap_or_else(|| {
            ConversionConfig::default_output_dir(&self.input_dir, &self.subject)
        });
        ConversionConfig::new(&self.subject, &self.trial, output_dir)
            .with_sample_rate(self.sample_rate)
    }
}

fn run(cli: Cli) -> imu_opensense::Result<()> {
    match cli.command {
        Command::Sensors {
            common,
            sensors,
            keep_going,
        } => {
            let mut config = common.config();
            if !sensors.is_empty() {
                config = config.with_sensors(sensors);
            }
            config.validate()?;

            let table = load_trial_table(&common.input_dir, &config)?;
            if keep_going {
                let report = export_sensor_files_lenient(&table, &config)?;
                info!(
                    "Wrote {} files, {} sensors failed",
                    report.written.len(),
                    report.failed.len()
                );
            } else {
                let written = export_sensor_files(&table, &config)?;
                info!("Wrote {} files", written.len());
            }
        }
        Command::Motion { common, mapping } => {
            let mut config = common.config();
            if let Some(path) = mapping {
                config = config.with_mapping(SensorMapping::from_json_file(path)?);
            }
            config.validate()?;

            let path = run_motion_export(&common.input_dir, &config)?;
            info!("Motion file ready: {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
