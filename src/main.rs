use bandcurve::{CurveConfig, CurveReport, RenderStatus, Renderer};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "bandcurve")]
#[command(author, version, about = "Render frequency-response curves from band energy reports")]
struct Args {
    /// Report JSON file, or directory searched recursively for *.json
    path: PathBuf,

    /// Output file (.json or .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "bandcurve-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate a report file
    #[arg(long)]
    no_report: bool,

    /// Points in the dense curve
    #[arg(long, default_value = "151")]
    points: usize,

    /// Lowest curve frequency in Hz
    #[arg(long, default_value = "20")]
    min_freq: f64,

    /// Highest curve frequency in Hz
    #[arg(long, default_value = "20000")]
    max_freq: f64,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Show measured band levels per file
    #[arg(short, long)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match CurveConfig::new(args.points, args.min_freq, args.max_freq) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid curve settings: {}", e);
            std::process::exit(1);
        }
    };

    // Set up thread pool
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    // Collect report files
    let files: Vec<PathBuf> = if args.path.is_dir() {
        WalkDir::new(&args.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    } else {
        vec![args.path.clone()]
    };

    if files.is_empty() {
        eprintln!("No report files found (expected *.json)");
        std::process::exit(1);
    }

    if !args.quiet {
        eprintln!("\x1b[1mBandcurve - Spectral Curve Renderer\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Found {} report file(s)\n", files.len());
    }

    let pb = if !args.quiet && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        Some(pb)
    } else {
        None
    };

    let renderer = Renderer::new().with_config(config);

    let results: Vec<CurveReport> = files
        .par_iter()
        .map(|path| {
            let result = renderer.render_file(path);
            if let Some(ref pb) = pb {
                pb.inc(1);
                pb.set_message(result.file_name.clone());
            }
            result
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !args.quiet {
        for r in &results {
            print_result(r, args.verbose);
        }
    }

    let rendered = results.iter().filter(|r| r.status == RenderStatus::Rendered).count();
    let empty = results.iter().filter(|r| r.status == RenderStatus::Empty).count();
    let errors = results.iter().filter(|r| r.status == RenderStatus::Error).count();

    if !args.quiet {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!("\x1b[1mSummary:\x1b[0m");
        eprintln!("  \x1b[32m✓ Rendered:\x1b[0m {}", rendered);
        eprintln!("  \x1b[33m- Empty:\x1b[0m    {}", empty);
        if errors > 0 {
            eprintln!("  \x1b[31m✗ Errors:\x1b[0m   {}", errors);
        }
    }

    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        match bandcurve::report::auto_path(&args.report_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                eprintln!(
                    "Failed to create report directory {}: {}",
                    args.report_dir.display(),
                    e
                );
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    if let Some(ref output_path) = report_path {
        if let Err(e) = bandcurve::report::generate(output_path, &results) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }
    }

    if errors > 0 {
        std::process::exit(1);
    }
}

fn print_result(r: &CurveReport, verbose: bool) {
    let color = match r.status {
        RenderStatus::Rendered => "\x1b[32m", // Green
        RenderStatus::Empty => "\x1b[33m",    // Yellow
        RenderStatus::Error => "\x1b[31m",    // Red
    };
    let reset = "\x1b[0m";

    let bands = if r.status == RenderStatus::Error {
        "-".to_string()
    } else {
        format!("{}/6 bands", r.band_count())
    };
    let reference = if r.reference.is_some() { "+ref" } else { "" };

    println!(
        "{}{:<8}{} {:<10} {:<5} {}",
        color,
        format!("[{}]", r.status),
        reset,
        bands,
        reference,
        truncate(&r.file_name, 50)
    );

    if let Some(ref e) = r.error {
        eprintln!("    \x1b[90m{}\x1b[0m", e);
    }

    if verbose {
        if let Some(ref main) = r.main {
            let levels: Vec<String> = main
                .measured
                .iter()
                .map(|p| format!("{}={:.1}dB", p.band_name, p.level_db))
                .collect();
            eprintln!("    Bands: {}", levels.join(" "));
        }
        if let Some(ref diff) = r.difference {
            let max_dev = diff.iter().map(|p| p.level_db.abs()).fold(0.0, f64::max);
            eprintln!("    Max deviation from reference: {:.1}dB", max_dev);
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
