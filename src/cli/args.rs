use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::processors::DegenerateRangePolicy;

#[derive(Parser)]
#[command(name = "timemap")]
#[command(about = "Weekly air-quality time maps from London monitoring-site data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: timemap.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build time-map layers for one or more pollutants
    Generate {
        #[arg(short, long, help = "Directory of <SITE>_data.csv measurement tables")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "Monitoring-site catalog JSON")]
        sites_file: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output directory [default: output/timemap-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(
            short,
            long = "pollutant",
            help = "Pollutant code (NO2, O3, PM10, SO2, PM25, CO); repeatable [default: all]"
        )]
        pollutants: Vec<String>,

        #[arg(long, help = "Also write the grey site-location layer")]
        with_sites: bool,

        #[arg(long, help = "Also write heat-map frames")]
        heatmap: bool,

        #[arg(long, help = "Outlier fence multiplier applied to the IQR")]
        iqr_multiplier: Option<f64>,

        #[arg(long, help = "midpoint, exclude-all or fail")]
        degenerate_policy: Option<DegenerateRangePolicy>,

        #[arg(long, help = "Pretty-print JSON output")]
        pretty: bool,

        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// List the catalog sites that monitor a pollutant
    Sites {
        #[arg(short, long, help = "Monitoring-site catalog JSON")]
        sites_file: Option<PathBuf>,

        #[arg(short, long = "pollutant")]
        pollutant: String,
    },

    /// Display information about a generated time-map file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },
}
