use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use scholaris::cli::{NewAccount, create_account, hash_password_command};
use scholaris_core::Role;
use scholaris_db::{PgStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "scholaris-cli")]
#[command(about = "Scholaris CLI - Administrative tools for Scholaris", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    CreateAccount {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// admin, teacher, student or parent
        #[arg(short = 'r', long, default_value = "admin")]
        role: Role,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Print the bcrypt hash of a password
    HashPassword {
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

fn prompt(label: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

fn prompt_password(value: Option<String>, confirm: bool) -> anyhow::Result<String> {
    if let Some(password) = value {
        return Ok(password);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt.interact().context("Failed to read password")
}

async fn connect() -> anyhow::Result<PgStore> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    Ok(PgStore::new(pool))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAccount {
            email,
            role,
            first_name,
            last_name,
            password,
        } => {
            let email = prompt("Email address", email)?;
            let first_name = prompt("First name", first_name)?;
            let last_name = prompt("Last name", last_name)?;
            let password = prompt_password(password, true)?;

            let store = connect().await?;
            let account = create_account(
                &store,
                NewAccount {
                    email,
                    password,
                    role,
                    first_name,
                    last_name,
                },
            )
            .await?;

            println!("✅ Account created");
            println!("   ID:    {}", account.id);
            println!("   Email: {}", account.email);
            println!("   Role:  {}", account.role);
        }
        Commands::HashPassword { password } => {
            let password = prompt_password(password, false)?;
            println!("{}", hash_password_command(&password)?);
        }
        Commands::Migrate => {
            let store = connect().await?;
            run_migrations(store.pool()).await?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
