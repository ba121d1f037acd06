//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDisplay;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_adapter::HtmlDisplay;
use crate::adapters::socrata_adapter::SocrataAdapter;
use crate::adapters::terminal_adapter::TerminalDisplay;
use crate::domain::config::CotConfig;
use crate::domain::error::CotError;
use crate::domain::loader::load_latest_report;
use crate::domain::presenter::{render, PageMeta};
use crate::domain::report::ReportSnapshot;
use crate::ports::data_port::DatasetPort;

#[derive(Parser, Debug)]
#[command(
    name = "cotboard",
    about = "Non-commercial positioning from the latest Commitments of Traders report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the latest report and display it
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        no_color: bool,
    },
    /// List the instruments the report is restricted to
    Instruments {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate configuration and print the effective settings
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Html,
    Csv,
    Json,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Show {
            config,
            format,
            output,
            no_color,
        } => run_show(config.as_deref(), format, output.as_deref(), no_color),
        Command::Instruments { config } => run_instruments(config.as_deref()),
        Command::Check { config } => run_check(config.as_deref()),
        Command::Serve { config } => run_serve(config.as_deref()),
    }
}

/// Built-in settings, overridden by the INI file when one is given.
pub fn load_config(path: Option<&Path>) -> Result<CotConfig, CotError> {
    let Some(path) = path else {
        return Ok(CotConfig::default());
    };
    info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| CotError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    CotConfig::from_config_port(&adapter)
}

fn fail(err: &CotError) -> ExitCode {
    error!("{err}");
    err.into()
}

fn run_show(
    config_path: Option<&Path>,
    format: Format,
    output: Option<&Path>,
    no_color: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let port = match SocrataAdapter::from_config(&config) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let color = config.color && !no_color && output.is_none() && io::stdout().is_terminal();

    match show_report(&port, &config, format, output, color) {
        Ok(snapshot) => {
            info!(
                "Report {} rendered ({} rows)",
                snapshot.report_date,
                snapshot.table.len()
            );
            if let Some(path) = output {
                info!("Report written to: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// One fetch-render cycle. Nothing is written if the load fails.
pub fn show_report(
    port: &dyn DatasetPort,
    config: &CotConfig,
    format: Format,
    output: Option<&Path>,
    color: bool,
) -> Result<ReportSnapshot, CotError> {
    let snapshot = load_latest_report(port, config)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = BufWriter::new(File::create(path)?);
            write_report(&snapshot, config, format, color, &mut file)?;
            file.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_report(&snapshot, config, format, color, &mut lock)?;
        }
    }
    Ok(snapshot)
}

pub fn write_report(
    snapshot: &ReportSnapshot,
    config: &CotConfig,
    format: Format,
    color: bool,
    out: &mut dyn Write,
) -> Result<(), CotError> {
    let meta = PageMeta::wide(config.page_title.clone());
    match format {
        Format::Table => {
            let mut display = TerminalDisplay::new(out, color);
            render(snapshot, &meta, &mut display)
        }
        Format::Html => {
            let mut display = HtmlDisplay::new();
            render(snapshot, &meta, &mut display)?;
            out.write_all(display.into_html()?.as_bytes())?;
            out.flush()?;
            Ok(())
        }
        Format::Csv => {
            let mut display = CsvDisplay::new(out);
            render(snapshot, &meta, &mut display)
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, snapshot)
                .map_err(|e| CotError::Io(std::io::Error::other(e.to_string())))?;
            writeln!(out)?;
            out.flush()?;
            Ok(())
        }
    }
}

fn run_instruments(config_path: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    for name in config.instruments.names() {
        println!("{name}");
    }
    info!("{} instruments configured", config.instruments.len());
    ExitCode::SUCCESS
}

pub fn describe_config(config: &CotConfig) -> String {
    let mut lines = vec![
        format!("source:      {}/resource/{}.json", config.base_url(), config.dataset),
        format!("timeout:     {}s", config.request_timeout.as_secs()),
        format!("cache ttl:   {}s", config.cache_ttl.as_secs()),
        format!("title:       {}", config.page_title),
        format!("listen:      {}", config.listen),
        format!("color:       {}", config.color),
        format!("instruments: {}", config.instruments.len()),
    ];
    lines.extend(config.instruments.names().iter().map(|n| format!("  {n}")));
    lines.join("\n")
}

fn run_check(config_path: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    println!("{}", describe_config(&config));
    info!("Configuration is valid");
    ExitCode::SUCCESS
}

fn run_serve(config_path: Option<&Path>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use crate::domain::cache::CachedLoader;
        use std::net::SocketAddr;
        use std::sync::Arc;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return fail(&e),
        };

        let addr: SocketAddr = match config.listen.parse() {
            Ok(a) => a,
            Err(_) => {
                return fail(&CotError::config_invalid(
                    "web",
                    "listen",
                    format!("not a socket address: {}", config.listen),
                ));
            }
        };

        // The blocking HTTP client has to be built outside the async runtime.
        let port = match SocrataAdapter::from_config(&config) {
            Ok(p) => Arc::new(p) as Arc<dyn DatasetPort + Send + Sync>,
            Err(e) => return fail(&e),
        };
        let loader = Arc::new(CachedLoader::new(port, Arc::new(config)));
        let router = build_router(AppState { loader });

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(&CotError::Io(e)),
        };

        info!("Starting web server on {}", addr);
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await?;
            Ok::<(), std::io::Error>(())
        });
        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&CotError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        error!("web feature is required for serve");
        ExitCode::from(1)
    }
}
