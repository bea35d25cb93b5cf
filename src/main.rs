//! Binary entrypoint for the petkeeper CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `login <username> [--pin <pin>]` - log in (creating the user on first use)
//! - `logout` / `whoami` - end or show the current session
//! - `status`, `feed`, `play [--clicks N]`, `sleep`, `eat <item>` - pet care
//! - `shop`, `buy <item> [qty]`, `inventory`, `achievements`
//! - `friends [list|add|interact|remove]`, `companion [show|set|remove]`
//! - `run` - interactive loop with live decay and wake-up timers
//!
//! See the library crate docs for module-level details: `petkeeper::`.
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{info, warn};

use petkeeper::config::Config;
use petkeeper::game::{execute, run_interactive, Game, GameCommand, PetStore, PinHasher};

#[derive(Parser)]
#[command(name = "petkeeper")]
#[command(about = "Look after a virtual pet from your terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Log in; the account is created on first login
    Login {
        username: String,
        /// PIN (prompted without echo when omitted)
        #[arg(long)]
        pin: Option<String>,
    },
    /// Log out; your pet is kept
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show your pet's stats and cooldowns
    Status,
    /// Feed your pet
    Feed,
    /// Play a round of the click game with your pet
    Play {
        /// Clicks scored in the round; every 10 earn a coin
        #[arg(long, default_value_t = 0)]
        clicks: u32,
    },
    /// Put your pet to sleep
    Sleep,
    /// Give your pet an item from your inventory
    Eat { item: String },
    /// List foods and medicines for sale
    Shop,
    /// Buy an item from the shop
    Buy {
        item: String,
        #[arg(default_value_t = 1)]
        qty: u32,
    },
    /// Show items and coins
    Inventory,
    /// Show achievements and progress
    Achievements,
    /// Manage your pet's friends
    Friends {
        #[command(subcommand)]
        action: Option<FriendAction>,
    },
    /// Manage your pet's life companion
    Companion {
        #[command(subcommand)]
        action: Option<CompanionAction>,
    },
    /// Interactive mode with live timers
    Run,
}

#[derive(Subcommand)]
enum FriendAction {
    /// List friends and the social bonus
    List,
    /// Make a new friend (cat, dog, rabbit, bird)
    Add { kind: String },
    /// Spend time with a friend
    Interact { id: String },
    /// Say goodbye to a friend
    Remove { id: String },
}

#[derive(Subcommand)]
enum CompanionAction {
    Show,
    /// Adopt a companion (fairy, robot, princess), replacing the current one
    Set { kind: String },
    Remove,
}

impl Commands {
    /// Map a one-shot subcommand onto the shared command set.
    fn to_game_command(&self, pin: Option<String>) -> Option<GameCommand> {
        let command = match self {
            Commands::Init | Commands::Run => return None,
            Commands::Login { username, .. } => GameCommand::Login {
                username: username.clone(),
                pin: pin.unwrap_or_default(),
            },
            Commands::Logout => GameCommand::Logout,
            Commands::Whoami => GameCommand::WhoAmI,
            Commands::Status => GameCommand::Status,
            Commands::Feed => GameCommand::Feed,
            Commands::Play { clicks } => GameCommand::Play { clicks: *clicks },
            Commands::Sleep => GameCommand::Sleep,
            Commands::Eat { item } => GameCommand::Eat(item.clone()),
            Commands::Shop => GameCommand::Shop,
            Commands::Buy { item, qty } => GameCommand::Buy {
                item: item.clone(),
                qty: *qty,
            },
            Commands::Inventory => GameCommand::Inventory,
            Commands::Achievements => GameCommand::Achievements,
            Commands::Friends { action } => match action {
                None | Some(FriendAction::List) => GameCommand::Friends,
                Some(FriendAction::Add { kind }) => GameCommand::AddFriend(kind.clone()),
                Some(FriendAction::Interact { id }) => GameCommand::Interact(id.clone()),
                Some(FriendAction::Remove { id }) => GameCommand::RemoveFriend(id.clone()),
            },
            Commands::Companion { action } => match action {
                None | Some(CompanionAction::Show) => GameCommand::Companion,
                Some(CompanionAction::Set { kind }) => GameCommand::SetCompanion(kind.clone()),
                Some(CompanionAction::Remove) => GameCommand::RemoveCompanion,
            },
        };
        Some(command)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        println!("Created default configuration at {}", cli.config);
        return Ok(());
    }

    // A missing file means defaults; a file that fails to parse is an error.
    let pre_config = if Path::new(&cli.config).exists() {
        Some(Config::load(&cli.config).await?)
    } else {
        None
    };
    init_logging(&pre_config, cli.verbose);
    let config = match pre_config {
        Some(config) => config,
        None => {
            warn!(
                "No config at {}; using defaults (run `petkeeper init` to create one)",
                cli.config
            );
            Config::default()
        }
    };

    let store = PetStore::open(config.storage.store_path())?;
    let hasher = PinHasher::new(config.argon2_params());
    let game = Game::new(store, hasher, config.pet.clone(), config.social.clone());

    if let Commands::Run = cli.command {
        info!("Starting petkeeper v{}", env!("CARGO_PKG_VERSION"));
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        run_interactive(&game, stdin, |line| println!("{}", line)).await?;
        return Ok(());
    }

    let pin = match &cli.command {
        Commands::Login { pin: Some(pin), .. } => Some(pin.clone()),
        Commands::Login { pin: None, .. } => Some(rpassword::prompt_password("PIN: ")?),
        _ => None,
    };

    if let Some(command) = cli.command.to_game_command(pin) {
        for line in execute(&game, &command, Utc::now())? {
            println!("{}", line);
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from config, raised by CLI verbosity
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level_filter())
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    let opened = log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });

    if let Some(f) = opened {
        let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        let write_mutex = mutex.clone();
        // Console echo only with -v on a terminal
        let is_tty = atty::is(atty::Stream::Stderr) && verbosity > 0;

        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());

            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }

            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
