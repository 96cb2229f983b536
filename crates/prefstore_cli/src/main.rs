//! `prefstore` command-line front end.
//!
//! Every command prints one JSON envelope on stdout. Error envelopes exit
//! with status 1.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use prefstore_core::{
    AdminRequest, AdminService, CreateUserRequest, Database, DbError, Envelope,
    PreferenceAggregator, RecordKey, SqliteAdminStore, SqliteUserStore, StoreConfig,
    UpdateUserRequest, UserService, UserStore,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "prefstore")]
#[command(about = "User and admin records with temperature preferences")]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PREFSTORE_DB_PATH", default_value = "prefstore.db", global = true)]
    db: PathBuf,

    #[arg(long, env = "PREFSTORE_BUSY_TIMEOUT_MS", default_value_t = 5000, global = true)]
    busy_timeout_ms: u64,

    #[arg(long, env = "PREFSTORE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, env = "PREFSTORE_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create both tables if they are missing
    Init {
        /// Drop and recreate the users table
        #[arg(long)]
        reset: bool,
    },
    /// User records
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Admin records
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
    /// Count users per temperature preference
    Stats,
}

#[derive(Args)]
struct KeyArgs {
    /// Tried before `--id` when both are given
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    id: Option<i64>,
}

impl KeyArgs {
    fn into_key(self) -> RecordKey {
        RecordKey {
            email: self.email,
            id: self.id,
        }
    }
}

#[derive(Subcommand)]
enum UserCommands {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// neutral, gets_cold_easily or gets_hot_easily
        #[arg(long)]
        preference: Option<String>,
        #[arg(long)]
        oauth_token: Option<String>,
    },
    Exists(KeyArgs),
    Get(KeyArgs),
    List,
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        preference: Option<String>,
        #[arg(long)]
        oauth_token: Option<String>,
    },
    SetPreference {
        #[arg(long)]
        email: String,
        preference: String,
    },
    Remove {
        #[arg(long)]
        email: String,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        super_admin: bool,
    },
    Exists(KeyArgs),
    Get(KeyArgs),
    List,
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        super_admin: bool,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(dir) = cli.log_dir.as_deref() {
        let dir = match std::env::current_dir() {
            Ok(cwd) => cwd.join(dir),
            Err(_) => dir.to_path_buf(),
        };
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(prefstore_core::default_log_level());
        if let Err(err) = prefstore_core::init_logging(level, &dir.to_string_lossy()) {
            eprintln!("prefstore: logging disabled: {err}");
        }
    }

    let db = match open_database(&cli.db, cli.busy_timeout_ms) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("prefstore: {err}");
            return ExitCode::FAILURE;
        }
    };

    let users = UserService::new(SqliteUserStore::new(db.clone()));
    let admins = AdminService::new(
        SqliteAdminStore::new(db.clone()),
        PreferenceAggregator::new(db),
    );

    match cli.command {
        Commands::Init { reset } => {
            let envelope = if reset {
                Envelope::from_result(users.store().reset_table())
            } else {
                users.initialize()
            };
            if !envelope.is_success() {
                return print(&envelope, false);
            }
            let envelope = admins.initialize();
            let ok = envelope.is_success();
            print(&envelope, ok)
        }
        Commands::User { action } => run_user(&users, action),
        Commands::Admin { action } => run_admin(&admins, action),
        Commands::Stats => {
            let envelope = admins.user_preference_statistics();
            let ok = envelope.is_success();
            print(&envelope, ok)
        }
    }
}

fn open_database(path: &Path, busy_timeout_ms: u64) -> Result<Database, DbError> {
    let config =
        StoreConfig::new(path).with_busy_timeout(Duration::from_millis(busy_timeout_ms));
    Database::open(config).map_err(|err| {
        error!(
            "event=cli_open module=cli status=error error_code=db_open_failed error={}",
            err
        );
        err
    })
}

fn run_user(service: &UserService<SqliteUserStore>, action: UserCommands) -> ExitCode {
    match action {
        UserCommands::Create {
            name,
            email,
            preference,
            oauth_token,
        } => emit(service.create(CreateUserRequest {
            name,
            email,
            preference_temperature: preference,
            google_oauth_token: oauth_token,
        })),
        UserCommands::Exists(key) => emit(service.exists(&key.into_key())),
        UserCommands::Get(key) => emit(service.get(&key.into_key())),
        UserCommands::List => emit(service.get_all()),
        UserCommands::Update {
            id,
            name,
            email,
            preference,
            oauth_token,
        } => emit(service.update(UpdateUserRequest {
            id,
            name,
            email,
            preference_temperature: preference,
            google_oauth_token: oauth_token,
        })),
        UserCommands::SetPreference { email, preference } => {
            emit(service.update_preference(&email, &preference))
        }
        UserCommands::Remove { email } => emit(service.remove(&email)),
        UserCommands::Delete { id } => emit(service.delete_by_id(id)),
    }
}

fn run_admin(service: &AdminService<SqliteAdminStore>, action: AdminCommands) -> ExitCode {
    match action {
        AdminCommands::Create {
            name,
            email,
            super_admin,
        } => emit(service.create(AdminRequest {
            name,
            email,
            is_super_admin: super_admin,
        })),
        AdminCommands::Exists(key) => emit(service.exists(&key.into_key())),
        AdminCommands::Get(key) => emit(service.get(&key.into_key())),
        AdminCommands::List => emit(service.get_all()),
        AdminCommands::Update {
            id,
            name,
            email,
            super_admin,
        } => emit(service.update(
            id,
            AdminRequest {
                name,
                email,
                is_super_admin: super_admin,
            },
        )),
        AdminCommands::Delete { id } => emit(service.delete(id)),
    }
}

fn emit<T: Serialize>(envelope: Envelope<T>) -> ExitCode {
    let ok = envelope.is_success();
    print(&envelope, ok)
}

fn print<T: Serialize>(value: &T, ok: bool) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("prefstore: failed to encode response: {err}");
            return ExitCode::FAILURE;
        }
    }
    info!("event=cli_command module=cli status={}", if ok { "ok" } else { "error" });
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
