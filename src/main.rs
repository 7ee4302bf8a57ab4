use anyhow::Result;
use clap::{Parser, Subcommand};

use costlog::cli::{
    self, handle_cost_type_command, handle_delete, handle_edit, handle_export, handle_feed,
    handle_log, handle_member_command, handle_project_command, handle_report, handle_user_command,
    resolve_caller, CostTypeCommands, DeleteArgs, EditArgs, ExportArgs, FeedArgs, LogArgs,
    MemberCommands, ProjectCommands, ReportArgs, UserCommands,
};
use costlog::config::{CostlogPaths, Settings};
use costlog::error::CostlogError;
use costlog::storage::Storage;

#[derive(Parser)]
#[command(
    name = "costlog",
    version,
    about = "Project cost entry reporting from the command line",
    long_about = "costlog records cost entries against projects and issues and \
                  reports them as paged listings, feeds and CSV exports, scoped \
                  to what the acting user may see."
)]
struct Cli {
    /// Login of the acting user
    #[arg(long, global = true, env = "COSTLOG_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paged listing of cost entries
    Report(ReportArgs),

    /// Recent cost entries, newest first
    Feed(FeedArgs),

    /// Export matching cost entries as CSV
    Export(ExportArgs),

    /// Record a new cost entry
    Log(LogArgs),

    /// Edit an existing cost entry
    Edit(EditArgs),

    /// Delete a cost entry
    Delete(DeleteArgs),

    /// Project management commands
    #[command(subcommand)]
    Project(ProjectCommands),

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Cost type management commands
    #[command(subcommand, name = "cost-type")]
    CostType(CostTypeCommands),

    /// Membership management commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        let code = err
            .downcast_ref::<CostlogError>()
            .map(cli::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Initialize paths and settings
    let paths = CostlogPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Commands::Report(args) => {
            let caller = resolve_caller(&storage, cli.user.as_deref())?;
            handle_report(&storage, &settings, &paths, &caller, &args)?;
        }
        Commands::Feed(args) => {
            let caller = resolve_caller(&storage, cli.user.as_deref())?;
            handle_feed(&storage, &settings, &caller, &args)?;
        }
        Commands::Export(args) => {
            let caller = resolve_caller(&storage, cli.user.as_deref())?;
            handle_export(&storage, &settings, &paths, &caller, &args)?;
        }
        Commands::Log(args) => {
            let caller = resolve_caller(&storage, cli.user.as_deref())?;
            handle_log(&storage, &settings, &paths, &caller, &args)?;
        }
        Commands::Edit(args) => {
            let caller = resolve_caller(&storage, cli.user.as_deref())?;
            handle_edit(&storage, &settings, &paths, &caller, &args)?;
        }
        Commands::Delete(args) => {
            let caller = resolve_caller(&storage, cli.user.as_deref())?;
            handle_delete(&storage, &settings, &paths, &caller, &args)?;
        }
        Commands::Project(cmd) => handle_project_command(&storage, cmd)?,
        Commands::User(cmd) => handle_user_command(&storage, cmd)?,
        Commands::CostType(cmd) => handle_cost_type_command(&storage, cmd)?,
        Commands::Member(cmd) => handle_member_command(&storage, cmd)?,
        Commands::Init => {
            println!("Initializing costlog at: {}", paths.data_dir().display());
            costlog::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete.");
            println!();
            println!("A default 'Labor' cost type has been created.");
            println!("Run 'costlog cost-type list' to see it.");
        }
        Commands::Config => {
            println!("costlog configuration");
            println!("=====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Rows per page:      {}", settings.per_page);
            println!("  Feed limit:         {}", settings.feed_limit);
            println!("  Subprojects shown:  {}", settings.display_subprojects);
            println!("  First day of week:  {}", settings.first_day_of_week);
        }
    }

    Ok(())
}
