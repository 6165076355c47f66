use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use arka_report::{ReportOptions, generate_report};

/// Render the Arka drive analysis report to PDF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Where to write the PDF
    #[arg(short, long, default_value = "Arka_Drive_Analysis_Report.pdf")]
    output: PathBuf,

    /// PNG or JPEG used for the cover page and the page watermark
    #[arg(long, default_value = "bg.png")]
    cover: PathBuf,

    /// Scan and deletion data as JSON
    #[arg(long)]
    input: Option<PathBuf>,

    /// Render at most this many deletion log rows
    #[arg(long)]
    max_deletion_rows: Option<usize>,

    /// Title printed in the page header
    #[arg(long)]
    title: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut options = ReportOptions {
        background: cli.cover,
        deletion_row_limit: cli.max_deletion_rows,
        ..ReportOptions::default()
    };
    if let Some(title) = cli.title {
        options.title = title;
    }

    match generate_report(&cli.output, cli.input.as_deref(), &options) {
        Ok(()) => {
            println!("Report generated successfully: {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to generate report: {e}");
            ExitCode::FAILURE
        }
    }
}
