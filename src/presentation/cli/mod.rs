pub mod commands;

use clap::{Args, CommandFactory, Parser, Subcommand};
use colored::Colorize;
use console::Term;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::services::RegistryService;
use crate::domain::value_objects::git_url::is_remote_address;
use crate::infrastructure::filesystem::RegistryStore;
use crate::infrastructure::scm::GitScm;
use crate::presentation::ui::display::DisplayHelper;
use crate::presentation::ui::prompt::stdin_confirmation;
use crate::presentation::ui::status_view::{ListKey, SortKey, StatusViewOptions};

use commands::{AddCommand, CloneCommand, FetchCommand, ListCommand, StatusCommand};

/// Options accepted before the verb and by every verb except `fetch`,
/// whose arguments all belong to `git fetch`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Storage file (defaults to $XDG_DATA_HOME/gclone/register.json)
    #[arg(short, long, env = "GCLONE_INDEX", value_name = "FILE")]
    pub index: Option<PathBuf>,

    /// Maximum number of concurrent git calls (defaults to the CPU count)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl GlobalArgs {
    /// Values given after the verb win over those given before it.
    pub fn merged_with(&self, verb: &GlobalArgs) -> GlobalArgs {
        GlobalArgs {
            index: verb.index.clone().or_else(|| self.index.clone()),
            jobs: verb.jobs.or(self.jobs),
            verbose: self.verbose || verb.verbose,
            no_color: self.no_color || verb.no_color,
        }
    }
}

/// gclone - keep track of local git working copies
///
/// Without a command, a URL argument is cloned and registered, a path
/// argument is registered, and no argument shows the status.
#[derive(Parser)]
#[command(name = "gclone")]
#[command(about = "Keep a registry of local git working copies and check their status")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Repository URL to clone, or directory to add
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Clone destination (only with a URL target)
    #[arg(value_name = "DEST", requires = "target")]
    pub dest: Option<String>,
}

impl Cli {
    /// Options in effect for this invocation.
    pub fn options(&self) -> GlobalArgs {
        match &self.command {
            Some(Commands::Add { global, .. })
            | Some(Commands::Clone { global, .. })
            | Some(Commands::List { global })
            | Some(Commands::Status { global, .. }) => self.global.merged_with(global),
            Some(Commands::Fetch { .. }) | None => self.global.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register directories
    Add {
        /// Directories holding a git repository
        #[arg(required = true, value_name = "DIR")]
        directories: Vec<PathBuf>,

        #[command(flatten)]
        global: GlobalArgs,
    },

    /// Clone a repository and register it
    Clone {
        /// Repository to clone
        url: String,

        /// Target directory (defaults to the repository name)
        dest: Option<String>,

        #[command(flatten)]
        global: GlobalArgs,
    },

    /// Run `git fetch` in every registered directory
    #[command(disable_help_flag = true, disable_version_flag = true)]
    Fetch {
        /// Options passed to `git fetch` unchanged
        #[arg(
            num_args = 0..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "OPTIONS"
        )]
        options: Vec<String>,
    },

    /// List registered directories
    List {
        #[command(flatten)]
        global: GlobalArgs,
    },

    /// Show the status of every registered directory
    Status {
        /// Group lines by directory or by remote URL
        #[arg(short, long, value_enum, default_value_t = ListKey::Directory)]
        list: ListKey,

        /// Sort by key or by status
        #[arg(short, long, value_enum, default_value_t = SortKey::Key)]
        sort: SortKey,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,

        #[command(flatten)]
        global: GlobalArgs,
    },
}

/// Set up `tracing` on stderr. `RUST_LOG` overrides the level.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    options: GlobalArgs,
}

impl CliApp {
    pub fn new() -> Self {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Self {
        let options = cli.options();
        Self { cli, options }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing(self.options.verbose);

        if self.options.no_color {
            colored::control::set_override(false);
        }
        let display = DisplayHelper::new(!self.options.no_color && Term::stdout().is_term());

        match self.handle_command(&display).await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self, display: &DisplayHelper) -> anyhow::Result<()> {
        if let Some(Commands::Fetch { options }) = &self.cli.command {
            let fetch = FetchCommand::new(options.clone());
            if fetch.wants_help() {
                return print_fetch_help();
            }
        }

        let mut service = self.load_service().await?;

        match &self.cli.command {
            Some(Commands::Add { directories, .. }) => {
                AddCommand::new(directories.clone())
                    .execute(&mut service, display)
                    .await
            }
            Some(Commands::Clone { url, dest, .. }) => {
                CloneCommand::new(url.clone(), dest.clone())
                    .execute(&mut service, display)
                    .await
            }
            Some(Commands::Fetch { options }) => {
                FetchCommand::new(options.clone())
                    .execute(&service, display)
                    .await
            }
            Some(Commands::List { .. }) => ListCommand.execute(&service, display),
            Some(Commands::Status {
                list,
                sort,
                reverse,
                ..
            }) => {
                let options = StatusViewOptions {
                    list: *list,
                    sort: *sort,
                    reverse: *reverse,
                };
                self.handle_status_command(&mut service, display, options)
                    .await
            }
            None => self.handle_target(&mut service, display).await,
        }
    }

    /// Bare invocation: clone a URL, add a path, or show the status.
    async fn handle_target(
        &self,
        service: &mut RegistryService,
        display: &DisplayHelper,
    ) -> anyhow::Result<()> {
        match &self.cli.target {
            Some(target) if is_remote_address(target) => {
                CloneCommand::new(target.clone(), self.cli.dest.clone())
                    .execute(service, display)
                    .await
            }
            Some(target) => {
                if self.cli.dest.is_some() {
                    anyhow::bail!("A destination can only be given when cloning a URL");
                }
                AddCommand::new(vec![PathBuf::from(target)])
                    .execute(service, display)
                    .await
            }
            None => {
                self.handle_status_command(service, display, StatusViewOptions::default())
                    .await
            }
        }
    }

    async fn handle_status_command(
        &self,
        service: &mut RegistryService,
        display: &DisplayHelper,
        options: StatusViewOptions,
    ) -> anyhow::Result<()> {
        let mut confirmation = stdin_confirmation();
        StatusCommand::new(options, self.options.verbose)
            .execute(service, display, &mut confirmation)
            .await
    }

    async fn load_service(&self) -> anyhow::Result<RegistryService> {
        let store = RegistryStore::resolve(self.options.index.as_deref())?;
        tracing::debug!("Using storage file {}", store.path().display());
        let service = RegistryService::load(store, Arc::new(GitScm::new()))
            .await?
            .with_jobs(self.options.jobs);
        Ok(service)
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn print_fetch_help() -> anyhow::Result<()> {
    let mut command = Cli::command();
    command.build();
    match command.find_subcommand_mut("fetch") {
        Some(fetch) => fetch.print_help()?,
        None => command.print_help()?,
    }
    println!();
    Ok(())
}
