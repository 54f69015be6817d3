//! Metadata Fuzzer CLI Application
//!
//! Diagnostic front end for the meta-fuzzer library:
//! - Locates the default ObjectMeta fuzzer in the upstream registry
//! - Builds the safe (or plain merged) function list and describes it
//! - Generates ObjectMeta records and checks they round-trip

use anyhow::Result;
use clap::Parser;
use meta_fuzzer::{
    describe_all, index_of_object_meta_fuzzer, merge_fuzzer_funcs, metafuzzer, safe_fuzzer_funcs,
    Fuzzer, ObjectMeta,
};
use std::path::PathBuf;

mod check;
mod config;
mod report;

use config::{AppConfig, OutputFormat};
use report::{Report, RunSummary};

/// Metadata Fuzzer - inspect and exercise ObjectMeta fuzzer functions
#[derive(Parser, Debug)]
#[command(name = "meta-fuzzer-cli")]
#[command(about = "Inspect and exercise ObjectMeta fuzzer functions", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Number of ObjectMeta records to generate (overrides the config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    iterations: Option<usize>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Inspect the plain merged functions instead of the safe combination
    #[arg(long = "unsafe")]
    unsafe_funcs: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Metadata Fuzzer CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using meta-fuzzer library v{}", meta_fuzzer::VERSION);

    let config = resolve_config(&args)?;
    let report = run(&config)?;

    let rendered = match config.output.format {
        OutputFormat::Text => report::render_text(&report)?,
        OutputFormat::Json => report::render_json(&report)?,
    };
    if !args.quiet {
        println!("{}", rendered);
    }

    if !report.run.passed() {
        anyhow::bail!(
            "{} of {} generated records violate round-trip invariants",
            report.run.failed_records,
            report.run.iterations
        );
    }
    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.fuzzer.seed = Some(seed);
    }
    if let Some(iterations) = args.iterations {
        config.output.iterations = iterations;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    config.output.unsafe_funcs |= args.unsafe_funcs;

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Inspect the registry and run the fuzzing loop
fn run(config: &AppConfig) -> Result<Report> {
    let codecs = &config.codecs;

    let upstream = metafuzzer::funcs()(codecs);
    let default_index = index_of_object_meta_fuzzer(&upstream);
    log::info!(
        "Upstream registry: {} functions, ObjectMeta fuzzer at {:?}",
        upstream.len(),
        default_index
    );

    let funcs = if config.output.unsafe_funcs {
        merge_fuzzer_funcs(vec![Some(metafuzzer::funcs())])
    } else {
        safe_fuzzer_funcs(vec![Some(metafuzzer::funcs())])
    };
    let described = describe_all(&funcs(codecs));

    let mut fuzzer = Fuzzer::new(&config.fuzzer)?.with_funcs(codecs, &funcs);
    let mut summary = RunSummary::default();
    for _ in 0..config.output.iterations {
        let meta: ObjectMeta = fuzzer.generate();
        let violations = check::check_object_meta(&meta);
        for violation in &violations {
            log::debug!("Violation: {}", violation);
        }
        summary.record(&meta, violations);
    }
    log::info!(
        "Generated {} records, {} with violations",
        summary.iterations,
        summary.failed_records
    );

    Ok(Report {
        generated_at: chrono::Utc::now(),
        scheme: codecs.scheme.clone(),
        default_object_meta_index: default_index,
        safe: !config.output.unsafe_funcs,
        funcs: described,
        run: summary,
    })
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(unsafe_funcs: bool) -> AppConfig {
        let mut config = AppConfig::default();
        config.fuzzer.seed = Some(17);
        config.output.iterations = 50;
        config.output.unsafe_funcs = unsafe_funcs;
        config
    }

    #[test]
    fn test_safe_run_passes() {
        let report = run(&config(false)).unwrap();
        assert_eq!(report.default_object_meta_index, Some(2));
        assert!(report.funcs.last().unwrap().canonical);
        assert_eq!(report.funcs.iter().filter(|f| f.canonical).count(), 1);
        assert!(report.run.passed(), "{:?}", report.run.violations);
    }

    #[test]
    fn test_unsafe_run_reports_server_fields() {
        let report = run(&config(true)).unwrap();
        assert!(!report.safe);
        assert!(!report.run.passed());
        assert!(report.run.violations.iter().any(|v| v.contains("selfLink")));
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from(["meta-fuzzer-cli", "--seed", "3", "-n", "5", "--format", "json", "--unsafe"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.fuzzer.seed, Some(3));
        assert_eq!(config.output.iterations, 5);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.unsafe_funcs);
    }
}
