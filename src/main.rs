use clap::Parser;
use log::error;
use std::process::ExitCode;

use cvmigrate::{
    run_migration, Args, CustomVisionClient, ExportTarget, HttpDownloader, MigrationStats, Mode,
    Result, Target,
};

fn run(args: &Args) -> Result<MigrationStats> {
    let source = CustomVisionClient::new(&args.source_training_key, &args.source_endpoint)?;

    match args.target() {
        Target::Remote {
            training_key,
            endpoint,
        } => {
            let destination = CustomVisionClient::new(&training_key, &endpoint)?;
            run_migration(&source, &args.project_id, Mode::Migrate(&destination))
        }
        Target::Export {
            dir,
            include_background,
        } => {
            let downloader = HttpDownloader::new()?;
            let target = ExportTarget {
                dir,
                downloader: &downloader,
                include_background,
            };
            run_migration(&source, &args.project_id, Mode::Export(target))
        }
    }
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(stats) => {
            stats.print_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
