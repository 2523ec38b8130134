use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use repograph::config::{RepographConfig, DEFAULT_CONFIG_FILE};
use repograph::core::CodebaseAnalyzer;
use repograph::formatters::JsonGraphFormatter;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "repograph",
    version,
    author = "repograph developers",
    about = "Source-dependency graph builder for JavaScript and TypeScript projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Fallback local root, overrides the configured one
    #[arg(short, long, value_name = "PATH", global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Build the graph for one project and print it as JSON
    Analyze {
        /// Project identifier
        #[arg(short, long, value_name = "ID")]
        project: Option<String>,

        /// Write the JSON here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Serve the graph API over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, default_value_t = 7878)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repograph={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        config,
        root,
        verbose: _,
    } = cli;

    let mut config = RepographConfig::load(&config)?;
    if let Some(root) = root {
        config.local_root = Some(root);
    }
    let analyzer = Arc::new(CodebaseAnalyzer::new(config));

    match command {
        Command::Analyze { project, output } => analyze(&analyzer, project, output).await,
        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            repograph::server::serve(analyzer, addr).await
        }
    }
}

async fn analyze(
    analyzer: &CodebaseAnalyzer,
    project: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let start_time = Instant::now();
    let formatter = JsonGraphFormatter::new().with_pretty(true);

    let result = match analyzer.analyze(project.as_deref()).await {
        Ok(result) => result,
        Err(err) => {
            let body = err.describe(!analyzer.config().is_production());
            println!("{}", formatter.format_error(&body)?);
            std::process::exit(1);
        }
    };

    if let Some(warning) = &result.warning {
        eprintln!("Warning: {warning}");
    }
    eprintln!(
        "Graph: {} nodes, {} edges (showing {} / {})",
        result.total.nodes,
        result.total.edges,
        result.nodes.len(),
        result.edges.len()
    );

    match output {
        Some(path) => {
            formatter.format_to_file(&result, &path)?;
            eprintln!("JSON output: {}", path.display());
        }
        None => println!("{}", formatter.format_graph(&result)?),
    }

    eprintln!(
        "Total execution time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
