//! rcaloop - Closed-loop RCA governance tool
//!
//! Ingests incident reports, tracks remedial actions to closure, and
//! surfaces recurring incidents via text similarity.

use anyhow::Result;
use clap::Parser;
use rcaloop::cli::{self, Cli, Commands, OutputFormat};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Get workspace path
    let workspace_path = Path::new(&cli.path);

    // Execute command
    match cli.command {
        Commands::Init(args) => {
            cli::init(workspace_path, args.force)?;
        }

        Commands::Ingest(args) => {
            cli::ingest(
                workspace_path,
                &args.target,
                &args.oem,
                &args.environment,
                args.password.as_deref(),
                args.dry_run,
                cli.format,
            )?;
        }

        Commands::List(args) => {
            cli::list(
                workspace_path,
                args.oem.as_deref(),
                args.environment.as_deref(),
                args.status.as_deref(),
                args.limit,
                cli.format,
            )?;
        }

        Commands::Show(args) => {
            cli::show(workspace_path, &args.rca_id, cli.format)?;
        }

        Commands::Actions(args) => {
            cli::actions(
                workspace_path,
                args.rca.as_deref(),
                args.status.as_deref(),
                args.overdue,
                cli.format,
            )?;
        }

        Commands::Update(args) => {
            cli::update(
                workspace_path,
                &args.action_id,
                args.status.as_deref(),
                args.owner_team.as_deref(),
                args.owner_person.as_deref(),
                args.due.as_deref(),
                args.notes.as_deref(),
            )?;
        }

        Commands::Verify(args) => {
            cli::verify(workspace_path, &args.action_id, &args.by)?;
        }

        Commands::Evidence(args) => {
            cli::evidence(
                workspace_path,
                &args.action_id,
                args.add.as_deref(),
                args.url.as_deref(),
                args.by.as_deref(),
                cli.format,
            )?;
        }

        Commands::Similar(args) => {
            cli::similar(workspace_path, &args.text, args.top, cli.format)?;
        }

        Commands::Status(_args) => {
            cli::status(workspace_path, cli.format)?;
        }

        Commands::Seed(_args) => {
            cli::seed(workspace_path)?;
        }

        Commands::Watch(args) => {
            run_watch(
                workspace_path,
                Path::new(&args.inbox),
                &args.oem,
                &args.environment,
                args.password.as_deref(),
                args.debounce,
                cli.format,
            )?;
        }

        Commands::Config(args) => {
            handle_config(workspace_path, &args)?;
        }

        Commands::Tui(_args) => {
            rcaloop::tui::run(workspace_path)?;
        }
    }

    Ok(())
}

/// Watch an inbox directory and ingest new reports as they land
fn run_watch(
    workspace_path: &Path,
    inbox: &Path,
    oem: &str,
    environment: &str,
    password: Option<&str>,
    debounce_ms: u64,
    format: OutputFormat,
) -> Result<()> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc::channel;
    use std::time::Duration;

    if !inbox.is_dir() {
        anyhow::bail!("Inbox is not a directory: {:?}", inbox);
    }

    println!("Watching {:?} for new reports...", inbox);
    println!("Press Ctrl+C to stop.\n");

    let (tx, rx) = channel();

    let config = Config::default().with_poll_interval(Duration::from_millis(debounce_ms));

    let mut watcher = RecommendedWatcher::new(tx, config)?;
    watcher.watch(inbox, RecursiveMode::Recursive)?;

    let mut last_ingest = std::time::Instant::now();
    let debounce = Duration::from_millis(debounce_ms);

    loop {
        match rx.recv() {
            Ok(event) => {
                if let Ok(event) = event {
                    // Debounce
                    if last_ingest.elapsed() < debounce {
                        continue;
                    }

                    let report_paths: Vec<_> = event
                        .paths
                        .iter()
                        .filter(|p| {
                            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
                            ext.eq_ignore_ascii_case("docx") && p.is_file()
                        })
                        .collect();

                    for report in report_paths {
                        println!("\n📄 New report detected: {:?}", report);

                        match cli::ingest(
                            workspace_path,
                            &report.to_string_lossy(),
                            oem,
                            environment,
                            password,
                            false,
                            format,
                        ) {
                            Ok(()) => {}
                            Err(e) => {
                                eprintln!("Ingest error: {}", e);
                            }
                        }

                        last_ingest = std::time::Instant::now();
                    }
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Handle config command
fn handle_config(path: &Path, args: &rcaloop::cli::ConfigArgs) -> Result<()> {
    use rcaloop::workspace::Workspace;

    let workspace = Workspace::open(path)?;
    let config = workspace.config();

    if args.show || (!args.reset && args.get.is_none()) {
        println!("rcaloop Configuration");
        println!("=====================\n");

        println!("Environments:");
        for environment in &config.environments {
            println!("  - {}", environment);
        }

        println!("\nSimilarity threshold: {}", config.similarity_threshold);
        println!("Top K: {}", config.top_k);
        println!("Action due days: {}", config.action_due_days);
        println!("Default owner team: {}", config.default_owner_team);
        println!("Default verification: {}", config.default_verification);
        println!(
            "Upload password: {}",
            if config.upload_password.as_deref().unwrap_or("").is_empty() {
                "(not set — uploads ungated)"
            } else {
                "(set)"
            }
        );
    }

    if let Some(ref key) = args.get {
        match key.as_str() {
            "similarity_threshold" => println!("{}", config.similarity_threshold),
            "top_k" => println!("{}", config.top_k),
            "action_due_days" => println!("{}", config.action_due_days),
            "default_owner_team" => println!("{}", config.default_owner_team),
            _ => println!("Unknown config key: {}", key),
        }
    }

    if args.reset {
        let default_config = rcaloop::workspace::AppConfig::default();
        default_config.save(workspace.root())?;
        println!("✓ Configuration reset to defaults");
    }

    Ok(())
}
