use crate::backend::build_backend;
use crate::commands;
use crate::config::Config;
use crate::export::export_document;
use crate::log_debug;
use crate::logger::DEFAULT_LOG_FILE;
use crate::ui;
use crate::workflow::{FileSelection, NotificationLevel, Step, WorkflowApp, WorkflowEvent};
use anyhow::{Context, Result, anyhow};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use std::path::PathBuf;

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "LinguRepo: guided repository analysis",
    long_about = "LinguRepo fetches a repository's file tree from the analysis service, lets you choose files, and generates a design document for them.",
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, waiting messages, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Analysis service URL for this run
    #[arg(
        long = "backend",
        global = true,
        help = "Analysis service URL for this run (overrides the configuration)"
    )]
    pub backend: Option<String>,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List the files of a repository branch
    #[command(
        about = "List the files of a repository branch",
        long_about = "Fetch the file tree of a repository branch from the analysis service and print it."
    )]
    Files {
        #[command(flatten)]
        target: RepoArgs,
    },

    /// Analyze selected files and export the design document
    #[command(
        about = "Generate a design document for selected files",
        long_about = "Run the whole workflow: fetch the file tree, apply the selection flags, analyze, and export the design document.\n\nSelection flags apply in order: --all, then every --file, then every --exclude."
    )]
    Analyze {
        #[command(flatten)]
        target: RepoArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Where to write the document
        #[arg(short, long, help = "Where to write the document (defaults to the configured export path)")]
        output: Option<PathBuf>,

        /// Print the generated document to stdout
        #[arg(short, long, help = "Print the generated document to stdout")]
        print: bool,
    },

    /// Show or update settings
    #[command(
        about = "Configure LinguRepo settings",
        long_about = "Show the current configuration, or update the backend URL, timeout, retry policy, and export path."
    )]
    Config {
        /// Set the analysis service URL
        #[arg(long, help = "Set the analysis service URL")]
        backend_url: Option<String>,

        /// Set the request timeout in seconds
        #[arg(long, help = "Set the request timeout in seconds")]
        timeout: Option<u64>,

        /// Set how many times a failed request is retried
        #[arg(long, help = "Set how many times a transient failure is retried (0 disables)")]
        retries: Option<usize>,

        /// Set the default export path
        #[arg(long, help = "Set the default export path")]
        export_path: Option<String>,
    },
}

/// Repository coordinates
#[derive(clap::Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository as `owner/name`
    #[arg(long, help = "Repository as owner/name")]
    pub repo: String,

    /// Branch to analyze
    #[arg(long, help = "Branch to analyze")]
    pub branch: String,
}

/// File selection flags for `analyze`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Select every file
    #[arg(long, help = "Select every file in the tree")]
    pub all: bool,

    /// Select a file by path
    #[arg(long = "file", value_name = "PATH", help = "Select a file by path (repeatable)")]
    pub files: Vec<String>,

    /// Deselect a file by path
    #[arg(long = "exclude", value_name = "PATH", help = "Deselect a file by path (repeatable)")]
    pub exclude: Vec<String>,
}

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> Result<()> {
    let cli = parse_args();

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE);
        crate::logger::set_log_file(log_file)?;

        if let Ok(config) = Config::load()
            && config.verbose_logging
        {
            crate::logger::set_verbose_logging(true);
            log_debug!("Verbose logging enabled - will show HTTP client logs");
        }
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command, cli.backend).await
    } else {
        let _ = Cli::parse_from(["lingurepo", "--help"]);
        Ok(())
    }
}

pub async fn handle_command(command: Commands, backend: Option<String>) -> Result<()> {
    match command {
        Commands::Files { target } => handle_files(&target, backend).await,
        Commands::Analyze {
            target,
            selection,
            output,
            print,
        } => handle_analyze(&target, &selection, output, print, backend).await,
        Commands::Config {
            backend_url,
            timeout,
            retries,
            export_path,
        } => commands::handle_config_command(backend_url, timeout, retries, export_path),
    }
}

/// Load the configuration and apply the per-run backend override
fn load_config(backend: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = backend {
        config.backend_url = url;
    }
    config.validate()?;
    Ok(config)
}

fn new_session(config: &Config) -> Result<WorkflowApp> {
    let backend = build_backend(config).context("Failed to set up the analysis backend")?;
    Ok(WorkflowApp::new(backend))
}

/// Wait for the in-flight request with a spinner, then print notifications
async fn settle(app: &mut WorkflowApp) -> Result<Step> {
    let spinner = ui::create_spinner(app.state().step().title());
    let step = app.wait_until_settled().await;
    spinner.finish_and_clear();

    // Errors are returned to the caller and printed once by `main`.
    let notifications: Vec<_> = app
        .take_notifications()
        .into_iter()
        .filter(|n| n.level != NotificationLevel::Error)
        .collect();
    ui::print_notifications(&notifications);
    step.map_err(anyhow::Error::from)
}

/// Submit the coordinates and wait for the tree
async fn fetch_tree(app: &mut WorkflowApp, target: &RepoArgs) -> Result<()> {
    ui::print_step(app.state().step());
    let submitted = app.submit(target.repo.as_str(), target.branch.as_str());
    if let Err(err) = submitted {
        let _ = app.take_notifications();
        return Err(err.into());
    }
    // The "Fetching..." notice is replaced by the spinner.
    let _ = app.take_notifications();

    if settle(app).await? != Step::SelectingFiles {
        return Err(anyhow!(
            "{}",
            app.state()
                .last_error()
                .unwrap_or("Failed to fetch the file tree")
        ));
    }
    Ok(())
}

async fn handle_files(target: &RepoArgs, backend: Option<String>) -> Result<()> {
    let config = load_config(backend)?;
    let mut app = new_session(&config)?;

    fetch_tree(&mut app, target).await?;

    let selection = app.state().selection();
    ui::print_file_tree(selection);
    ui::print_info(&format!(
        "{} files in {}@{}",
        selection.tree().file_count(),
        app.state().repo(),
        app.state().branch()
    ));
    Ok(())
}

async fn handle_analyze(
    target: &RepoArgs,
    flags: &SelectionArgs,
    output: Option<PathBuf>,
    print: bool,
    backend: Option<String>,
) -> Result<()> {
    let config = load_config(backend)?;
    let mut app = new_session(&config)?;

    fetch_tree(&mut app, target).await?;

    ui::print_step(Step::SelectingFiles);
    let (events, unknown) = selection_events(app.state().selection(), flags);
    for path in &unknown {
        ui::print_warning(&format!("Not a file in this tree, ignored: {path}"));
    }
    for event in events {
        app.dispatch(event)?;
    }
    ui::print_file_tree(app.state().selection());

    if let Err(err) = app.analyze() {
        let _ = app.take_notifications();
        return Err(err.into());
    }
    let _ = app.take_notifications();

    if settle(&mut app).await? != Step::Complete {
        return Err(anyhow!(
            "{}",
            app.state().last_error().unwrap_or("Analysis failed")
        ));
    }

    ui::print_step(Step::Complete);
    let result = app
        .state()
        .result()
        .context("Analysis completed without a document")?;

    let path = output.unwrap_or_else(|| PathBuf::from(&config.export_path));
    let written = export_document(result, &path)?;
    ui::print_success(&format!(
        "Design document for {} files saved to {}",
        result.document_count(),
        written.display()
    ));

    if print {
        println!("{}", crate::export::render_document(result)?.trim_end());
    }

    Ok(())
}

/// Selection events for the `analyze` flags, plus `--file` paths that do not
/// name a file in the tree
///
/// `--all` applies first, then every `--file`, then every `--exclude`.
pub fn selection_events(
    selection: &FileSelection,
    flags: &SelectionArgs,
) -> (Vec<WorkflowEvent>, Vec<String>) {
    let mut events = Vec::new();
    let mut unknown = Vec::new();

    if flags.all {
        events.push(WorkflowEvent::SelectAll);
    }
    for path in &flags.files {
        if selection.tree().is_file(path) {
            events.push(WorkflowEvent::ToggleFile {
                path: path.clone(),
                included: true,
            });
        } else {
            unknown.push(path.clone());
        }
    }
    for path in &flags.exclude {
        events.push(WorkflowEvent::ToggleFile {
            path: path.clone(),
            included: false,
        });
    }

    (events, unknown)
}
