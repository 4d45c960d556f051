use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "torc")]
#[command(about = "Tea or Coffee order server CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> local overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show or edit the menu file
    Menu {
        /// Layered config paths used to locate the menu file
        #[arg(long = "config", global = true)]
        config_paths: Vec<String>,

        /// Menu file path; overrides config
        #[arg(long, global = true)]
        file: Option<String>,

        #[command(subcommand)]
        cmd: MenuCmd,
    },

    /// Query a running daemon's admin surface
    Status {
        /// Admin base URL
        #[arg(long, default_value = "http://127.0.0.1:9090")]
        admin_url: String,

        /// Number of popular drinks to print
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

#[derive(Subcommand)]
enum MenuCmd {
    /// Print the menu, one numbered item per line
    Show,

    /// Append an item
    Add { item: String },

    /// Remove an item (case-insensitive match)
    Remove { item: String },

    /// Rename an item (case-insensitive match on the old name)
    Rename { old: String, new: String },
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = torc_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Menu {
            config_paths,
            file,
            cmd,
        } => {
            let menu = commands::menu::open(&config_paths, file.as_deref())?;
            match cmd {
                MenuCmd::Show => commands::menu::show(&menu)?,
                MenuCmd::Add { item } => commands::menu::edit(&menu, |items| {
                    commands::menu::add_item(items, &item)
                })?,
                MenuCmd::Remove { item } => commands::menu::edit(&menu, |items| {
                    commands::menu::remove_item(items, &item)
                })?,
                MenuCmd::Rename { old, new } => commands::menu::edit(&menu, |items| {
                    commands::menu::rename_item(items, &old, &new)
                })?,
            }
        }

        Commands::Status { admin_url, top } => commands::status::run(&admin_url, top)?,
    }

    Ok(())
}
