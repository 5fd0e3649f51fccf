/*!
 * Command-line interface for files-to-xml
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::ThreadPoolBuilder;

use files_to_xml::config::{Args, Config};
use files_to_xml::pretty::pretty_print;
use files_to_xml::report::{ReportFormat, Reporter, ScanReport};
use files_to_xml::scanner::Scanner;
use files_to_xml::writer::XmlWriter;
use files_to_xml::Result;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "files-to-xml", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    info!("Starting files-to-xml...");

    let config = Config::from_args(args)?;
    config.validate()?;
    debug!("source: {}", config.target_dir.display());
    debug!("output: {}", config.output_file.display());

    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {pos}/{len} ({percent}%) {elapsed_precise}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📄 Reading");

    let start_time = Instant::now();

    let scanner = Scanner::new(config.clone(), Arc::new(progress.clone()));
    let tree = scanner.scan()?;
    progress.finish_and_clear();

    debug!("tree\n{}", pretty_print(&tree));

    let writer = XmlWriter::new(config.clone());
    let lines_written = writer.write(&tree)?;

    if !config.quiet {
        let report = ScanReport::from_tree(
            &tree,
            config.output_file.display().to_string(),
            start_time.elapsed(),
            lines_written,
        );
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
