//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::console_report::format_scan_result;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::config_validation::validate_scan_config;
use crate::domain::error::ScannerError;
use crate::domain::fundamentals::FundamentalsTable;
use crate::domain::index::{INDICES, find_index};
use crate::domain::scan::{ScanConfig, ScanOverrides, run_scan};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::fundamentals_port::FundamentalsPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "momentum-scanner",
    about = "Momentum scanner for Indian stock indices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan an index and rank its constituents by momentum
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Index name, symbol or slug (e.g. "Nifty Bank", ^NSEBANK, nifty_bank)
        #[arg(short, long)]
        index: Option<String>,
        #[arg(long)]
        roe_threshold: Option<f64>,
        #[arg(long = "de-threshold")]
        de_threshold: Option<f64>,
        #[arg(long)]
        top: Option<usize>,
        /// Write an HTML report with charts
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Read prices from CSV files in this directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List the selectable indices
    ListIndices,
    /// Show data range for the index and its constituents
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        index: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            index,
            roe_threshold,
            de_threshold,
            top,
            output,
            data_dir,
        } => {
            let overrides = ScanOverrides {
                index,
                roe_threshold,
                debt_to_equity_threshold: de_threshold,
                top_n: top,
            };
            run_scan_command(
                config.as_ref(),
                &overrides,
                output.as_ref(),
                data_dir.as_ref(),
            )
        }
        Command::ListIndices => run_list_indices(),
        Command::Info {
            config,
            index,
            data_dir,
        } => run_info(config.as_ref(), index.as_deref(), data_dir.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

fn fail(err: &ScannerError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScannerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            log::info!("Loading config from {}", p.display());
            load_config(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub type SharedDataPort = Arc<dyn DataPort + Send + Sync>;
pub type SharedFundamentalsPort = Arc<dyn FundamentalsPort + Send + Sync>;

/// Picks the price source from `[data] source` (or `--data-dir`, which
/// forces CSV) and assembles the fundamentals table.
///
/// Fundamentals from `[fundamentals]` take precedence over `fundamentals.csv`.
pub fn build_sources(
    config: &dyn ConfigPort,
    data_dir_override: Option<&PathBuf>,
) -> Result<(SharedDataPort, SharedFundamentalsPort), ScannerError> {
    let source = if data_dir_override.is_some() {
        "csv".to_string()
    } else {
        config
            .get_string("data", "source")
            .unwrap_or_else(|| "yahoo".to_string())
            .to_lowercase()
    };

    match source.as_str() {
        "csv" => {
            let dir = match data_dir_override {
                Some(d) => d.clone(),
                None => config
                    .get_string("data", "data_dir")
                    .map(PathBuf::from)
                    .ok_or_else(|| ScannerError::ConfigMissing {
                        section: "data".to_string(),
                        key: "data_dir".to_string(),
                    })?,
            };
            log::info!("Reading prices from {}", dir.display());
            let adapter = CsvAdapter::new(dir);
            let configured = FundamentalsTable::from_config(config)?;
            let fundamentals: SharedFundamentalsPort =
                Arc::new(adapter.load_fundamentals()?.merge(configured));
            let data: SharedDataPort = Arc::new(adapter);
            Ok((data, fundamentals))
        }
        "yahoo" => {
            #[cfg(feature = "yahoo")]
            {
                let fundamentals: SharedFundamentalsPort =
                    Arc::new(FundamentalsTable::from_config(config)?);
                let data: SharedDataPort =
                    Arc::new(crate::adapters::yahoo_adapter::YahooAdapter::new()?);
                Ok((data, fundamentals))
            }

            #[cfg(not(feature = "yahoo"))]
            {
                Err(ScannerError::feature_disabled("yahoo", "source = yahoo"))
            }
        }
        other => Err(ScannerError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source '{}'", other),
        }),
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_scan_command(
    config_path: Option<&PathBuf>,
    overrides: &ScanOverrides,
    output_path: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_scan_config(&adapter) {
        return fail(&e);
    }

    // Stage 2: Build ScanConfig
    let scan_config = match ScanConfig::from_config(&adapter, overrides, today()) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    // Stage 3: Data sources
    let (data_port, fundamentals_port) = match build_sources(&adapter, data_dir) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    run_scan_pipeline(&*data_port, &*fundamentals_port, &scan_config, output_path)
}

/// Runs the scan, prints the tables to stdout and optionally writes the HTML
/// report.
pub fn run_scan_pipeline(
    data_port: &dyn DataPort,
    fundamentals_port: &dyn FundamentalsPort,
    scan_config: &ScanConfig,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let result = match run_scan(data_port, fundamentals_port, scan_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    println!("{}", format_scan_result(&result));

    if let Some(path) = output_path {
        let report = HtmlReportAdapter::new();
        if let Err(e) = report.write(&result, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Report written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_list_indices() -> ExitCode {
    println!("{:<20} {:<14} {}", "Index", "Symbol", "Config key");
    for idx in &INDICES {
        println!("{:<20} {:<14} {}", idx.name, idx.symbol, idx.slug());
    }
    ExitCode::SUCCESS
}

fn run_info(
    config_path: Option<&PathBuf>,
    index: Option<&str>,
    data_dir: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_scan_config(&adapter) {
        return fail(&e);
    }

    let overrides = ScanOverrides {
        index: index.map(str::to_string),
        ..Default::default()
    };
    let scan_config = match ScanConfig::from_config(&adapter, &overrides, today()) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let (data_port, _) = match build_sources(&adapter, data_dir) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    print_data_ranges(&*data_port, &scan_config);
    ExitCode::SUCCESS
}

pub fn print_data_ranges(data_port: &dyn DataPort, scan_config: &ScanConfig) {
    let mut tickers = vec![scan_config.index.symbol.to_string()];
    tickers.extend(
        scan_config
            .constituents
            .iter()
            .filter(|t| t.as_str() != scan_config.index.symbol)
            .cloned(),
    );

    for ticker in &tickers {
        match data_port.get_data_range(ticker, scan_config.start_date, scan_config.end_date) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", ticker, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", ticker),
            Err(e) => eprintln!("error querying {}: {}", ticker, e),
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        return fail(&e);
    }

    let scan_config = match ScanConfig::from_config(&adapter, &ScanOverrides::default(), today())
    {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "\nIndex:       {} ({})",
        scan_config.index.name, scan_config.index.symbol
    );
    eprintln!(
        "Filter:      ROE > {}, Debt/Equity < {}",
        scan_config.filter.roe_threshold, scan_config.filter.debt_to_equity_threshold
    );
    eprintln!("Top N:       {}", scan_config.top_n);
    eprintln!(
        "Window:      {} to {}",
        scan_config.start_date, scan_config.end_date
    );
    eprintln!("Tickers:     {}", scan_config.constituents.join(", "));

    let configured = adapter.section_entries("universe");
    if !configured.is_empty() {
        eprintln!("\nUniverse:");
        for (slug, tickers) in &configured {
            let name = find_index(slug).map(|i| i.name).unwrap_or("?");
            eprintln!("  {}: {}", name, tickers);
        }
    }
    eprintln!(
        "Fundamentals: {} configured",
        adapter.section_entries("fundamentals").len()
    );

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;

        log::info!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        if let Err(e) = validate_scan_config(&config) {
            return fail(&e);
        }

        let (data_port, fundamentals_port) = match build_sources(&config, None) {
            Ok(s) => s,
            Err(e) => return fail(&e),
        };

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(_) => {
                return fail(&ScannerError::ConfigInvalid {
                    section: "web".to_string(),
                    key: "listen".to_string(),
                    reason: format!("'{}' is not a socket address", listen),
                });
            }
        };

        let state = AppState {
            data_port,
            fundamentals_port,
            config: Arc::new(config),
        };
        let router = build_router(state);

        let served = tokio::runtime::Runtime::new().and_then(|rt| {
            rt.block_on(async {
                let listener = tokio::net::TcpListener::bind(addr).await?;
                log::info!("Dashboard on http://{}", addr);
                axum::serve(listener, router).await
            })
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&ScannerError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        fail(&ScannerError::feature_disabled("web", "serve"))
    }
}
