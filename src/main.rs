//! The pocketbook command line interface.
//!
//! Plays the role the web views play in the hosted frontend: collect
//! input, validate it locally, call the API client, and render the
//! aggregated results. Each invocation is one authenticated round trip;
//! the session cookie lives only for the lifetime of the process.

use std::{process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use time::{Date, macros::format_description};
use tracing_subscriber::EnvFilter;

use pocketbook::{
    ApiClient, CategoryChoice, Config, Error, LogoutReason, NewTransaction, ProfileId, Session,
    TransactionDraft, TransactionFilter, TransactionId, TransactionKind, User, aggregate_totals,
    category_breakdown, filtered_summary, validation,
};

/// A command line client for the pocketbook finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The base URL of the backend API. Defaults to the
    /// POCKETBOOK_API_URL environment variable, then to the local
    /// development address.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new user account.
    Register {
        /// The username to register, 3 to 80 letters, digits, '_' or '-'.
        #[arg(long)]
        username: String,
        /// The email address for the account.
        #[arg(long)]
        email: String,
    },
    /// Verify a username and password against the backend.
    Login {
        /// The username to log in with.
        #[arg(long)]
        username: String,
    },
    /// Log in, then end the server-side session.
    Logout {
        /// The username to log in with.
        #[arg(long)]
        username: String,
    },
    /// Log in, then report who the server thinks you are.
    Whoami {
        /// The username to log in with.
        #[arg(long)]
        username: String,
    },
    /// List, create, and delete profiles.
    Profiles {
        /// The username to log in with.
        #[arg(long)]
        username: String,
        #[command(subcommand)]
        command: ProfilesCommand,
    },
    /// List, record, and delete transactions.
    Tx {
        /// The username to log in with.
        #[arg(long)]
        username: String,
        #[command(subcommand)]
        command: TxCommand,
    },
    /// Show income, expense, and balance totals with a category breakdown.
    Summary {
        /// The username to log in with.
        #[arg(long)]
        username: String,
        /// The profile to summarize.
        #[arg(long)]
        profile: ProfileId,
    },
}

#[derive(Subcommand, Debug)]
enum ProfilesCommand {
    /// List your profiles.
    List,
    /// Create a profile.
    Create {
        /// The profile name, at most 100 characters.
        name: String,
    },
    /// Delete a profile and everything in it.
    Delete {
        /// The ID of the profile to delete.
        id: ProfileId,
    },
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    /// List a profile's transactions, newest first.
    List {
        /// The profile to list.
        #[arg(long)]
        profile: ProfileId,
        /// Only show transactions whose category or description contains
        /// this text.
        #[arg(long)]
        search: Option<String>,
        /// Only show "income" or "expense" transactions.
        #[arg(long)]
        kind: Option<String>,
        /// Only show transactions with this exact category.
        #[arg(long)]
        category: Option<String>,
        /// Only show transactions on or after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Only show transactions on or before this date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,
    },
    /// Record a transaction.
    Add {
        /// The profile to record against.
        #[arg(long)]
        profile: ProfileId,
        /// "income" or "expense".
        #[arg(long)]
        kind: String,
        /// The positive amount of money.
        #[arg(long)]
        amount: String,
        /// The category name.
        #[arg(long)]
        category: String,
        /// The date of the transaction (YYYY-MM-DD).
        #[arg(long)]
        date: String,
        /// An optional description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction to delete.
        id: TransactionId,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] Error),

    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Input(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let cli = Cli::parse();

    let config = match &cli.api_url {
        Some(url) => Config::new(url),
        None => Config::from_env(),
    };

    let client = match ApiClient::new(config) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("Could not create the API client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let session = Arc::new(Session::new());
    Session::attach(&session, &client);
    session.subscribe(|reason| {
        if reason == LogoutReason::SessionExpired {
            eprintln!("Your session has expired. Please log in again.");
        }
    });

    match run(cli.command, &client, &session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Print a failure the way the views map the error taxonomy: structured
/// API errors show the normalized message, network errors fall back to a
/// generic hint.
fn report_error(error: &CliError) {
    match error {
        CliError::Api(Error::Network(inner)) => {
            tracing::debug!("network error: {inner}");
            eprintln!("The request failed. Check your connection and the API URL, then try again.");
        }
        other => eprintln!("{other}"),
    }
}

async fn run(command: Command, client: &ApiClient, session: &Arc<Session>) -> Result<(), CliError> {
    match command {
        Command::Register { username, email } => register(client, session, &username, &email).await,
        Command::Login { username } => {
            let user = authenticate(client, session, &username).await?;
            println!("Logged in as {} <{}>.", user.username, user.email);
            Ok(())
        }
        Command::Logout { username } => {
            authenticate(client, session, &username).await?;
            session.log_out(client).await;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami { username } => {
            authenticate(client, session, &username).await?;
            let status = client.check_auth().await?;
            match status.user {
                Some(user) => println!("You are {} <{}>.", user.username, user.email),
                None => println!("You are not logged in."),
            }
            Ok(())
        }
        Command::Profiles { username, command } => {
            authenticate(client, session, &username).await?;
            profiles(client, command).await
        }
        Command::Tx { username, command } => {
            authenticate(client, session, &username).await?;
            transactions(client, command).await
        }
        Command::Summary { username, profile } => {
            authenticate(client, session, &username).await?;
            summary(client, profile).await
        }
    }
}

/// Prompt for a password and log in, recording the user on the session.
async fn authenticate(
    client: &ApiClient,
    session: &Arc<Session>,
    username: &str,
) -> Result<User, CliError> {
    let password = rpassword::prompt_password("Password: ")?;
    let user = client.login(username, &password).await?;
    session.log_in(user.clone());
    Ok(user)
}

async fn register(
    client: &ApiClient,
    session: &Arc<Session>,
    username: &str,
    email: &str,
) -> Result<(), CliError> {
    validation::validate_username(username).map_err(|error| CliError::Input(error.to_string()))?;

    if !validation::is_valid_email(email) {
        return Err(CliError::Input(format!(
            "{email} is not a valid email address"
        )));
    }

    let password = rpassword::prompt_password("Password: ")?;
    validation::validate_password(&password).map_err(|error| CliError::Input(error.to_string()))?;

    let strength = validation::password_strength(&password);
    println!("Password strength: {}", strength.label());

    let confirmation = rpassword::prompt_password("Confirm password: ")?;
    if password != confirmation {
        return Err(CliError::Input("Passwords do not match".to_owned()));
    }

    let user = client.register(username, email, &password).await?;
    session.log_in(user.clone());
    println!("Account created for {} <{}>.", user.username, user.email);
    Ok(())
}

async fn profiles(client: &ApiClient, command: ProfilesCommand) -> Result<(), CliError> {
    match command {
        ProfilesCommand::List => {
            let profiles = client.profiles().await?;
            let rows = profiles
                .iter()
                .map(|profile| {
                    vec![
                        profile.id.to_string(),
                        profile.name.clone(),
                        profile.created_at.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["ID", "Name", "Created"], rows));
        }
        ProfilesCommand::Create { name } => {
            validation::validate_profile_name(&name)
                .map_err(|error| CliError::Input(error.to_string()))?;
            let profile = client.create_profile(&name).await?;
            println!("Created profile \"{}\" with ID {}.", profile.name, profile.id);
        }
        ProfilesCommand::Delete { id } => {
            client.delete_profile(id).await?;
            println!("Deleted profile {id}.");
        }
    }
    Ok(())
}

async fn transactions(client: &ApiClient, command: TxCommand) -> Result<(), CliError> {
    match command {
        TxCommand::List {
            profile,
            search,
            kind,
            category,
            from,
            to,
        } => {
            let filter = TransactionFilter {
                search,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                category,
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
            };

            let all = client.transactions(profile).await?;
            let filtered = filter.apply(&all);

            let rows = filtered
                .iter()
                .map(|transaction| {
                    vec![
                        transaction.id.to_string(),
                        transaction.date.to_string(),
                        transaction.kind.to_string(),
                        format!("{:.2}", transaction.amount),
                        transaction.category.clone(),
                        transaction.description.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["ID", "Date", "Type", "Amount", "Category", "Description"],
                    rows
                )
            );

            let stats = filtered_summary(&filtered);
            println!(
                "{} transactions ({} income, {} expense), income {:.2}, expenses {:.2}",
                stats.total,
                stats.income_count,
                stats.expense_count,
                stats.total_income,
                stats.total_expense
            );
        }
        TxCommand::Add {
            profile,
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let draft = TransactionDraft {
                kind,
                amount,
                category,
                date,
                description,
            };

            if let Err(errors) = validation::validate_transaction(&draft) {
                return Err(CliError::Input(errors.join("\n")));
            }

            // The draft passed validation, so the typed fields parse.
            let request = NewTransaction {
                kind: parse_kind(&draft.kind)?,
                amount: draft
                    .amount
                    .trim()
                    .parse()
                    .map_err(|_| CliError::Input("Amount must be a positive number".to_owned()))?,
                category: CategoryChoice::named(&draft.category),
                account_id: None,
                tag_ids: Vec::new(),
                description: draft.description,
                date: parse_date(&draft.date)?,
            };

            let transaction = client.create_transaction(profile, &request).await?;
            println!(
                "Recorded {} of {:.2} in \"{}\" with ID {}.",
                transaction.kind, transaction.amount, transaction.category, transaction.id
            );
        }
        TxCommand::Delete { id } => {
            client.delete_transaction(id).await?;
            println!("Deleted transaction {id}.");
        }
    }
    Ok(())
}

async fn summary(client: &ApiClient, profile: ProfileId) -> Result<(), CliError> {
    let transactions = client.transactions(profile).await?;

    let totals = aggregate_totals(&transactions);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Balance"],
            vec![vec![
                format!("{:.2}", totals.income),
                format!("{:.2}", totals.expenses),
                format!("{:.2}", totals.balance),
            ]]
        )
    );

    let breakdown = category_breakdown(&transactions);
    let rows = breakdown
        .iter()
        .map(|(category, totals)| {
            vec![
                category.clone(),
                format!("{:.2}", totals.income),
                format!("{:.2}", totals.expense),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Income", "Expense"], rows));

    Ok(())
}

fn parse_kind(kind: &str) -> Result<TransactionKind, CliError> {
    match kind {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        other => Err(CliError::Input(format!(
            "\"{other}\" is not a transaction type; use \"income\" or \"expense\""
        ))),
    }
}

fn parse_date(date: &str) -> Result<Date, CliError> {
    Date::parse(date, &format_description!("[year]-[month]-[day]"))
        .map_err(|_| CliError::Input(format!("\"{date}\" is not a date in YYYY-MM-DD format")))
}

fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.iter().map(|header| Cell::new(*header)));
    for row in rows {
        table.add_row(row.into_iter().map(Cell::new));
    }
    table
}
