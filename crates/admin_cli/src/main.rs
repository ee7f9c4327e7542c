use std::error::Error;

use clap::{Args, Parser, Subcommand};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use api_types::sync::{LineAction, RecordAction, SyncBatch};
use ledger::{
    DocumentHeader, DocumentKind, Engine, EntryAction, SyncAction, SyncChangeRecord,
    SyncEntryRecord,
};

#[derive(Parser, Debug)]
#[command(name = "coopledger_admin")]
#[command(about = "Admin utilities for Coopledger (migrations, chart of accounts, sync batches)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./coopledger.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run pending schema migrations.
    Migrate,
    Account(Account),
    Doc(Doc),
    Sync(Sync),
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Register an account code in the chart of accounts.
    Add(AccountAddArgs),
    /// List the registered chart of accounts.
    List,
}

#[derive(Args, Debug)]
struct AccountAddArgs {
    #[arg(long)]
    code: String,
    #[arg(long)]
    name: String,
    /// Mark the code as a cash/bank leg.
    #[arg(long, default_value_t = false)]
    cash_leg: bool,
}

#[derive(Args, Debug)]
struct Doc {
    #[command(subcommand)]
    command: DocCommand,
}

#[derive(Subcommand, Debug)]
enum DocCommand {
    /// Recompute and print the tally report of a stored document.
    Check(DocCheckArgs),
}

#[derive(Args, Debug)]
struct DocCheckArgs {
    /// Document kind (`loan_release`, `journal_voucher`, ...).
    #[arg(long)]
    kind: String,
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct Sync {
    #[command(subcommand)]
    command: SyncCommand,
}

#[derive(Subcommand, Debug)]
enum SyncCommand {
    /// Apply a client sync batch from a JSON file.
    Apply(SyncApplyArgs),
}

#[derive(Args, Debug)]
struct SyncApplyArgs {
    /// Path to the batch JSON (`api_types::sync::SyncBatch`).
    #[arg(long)]
    file: std::path::PathBuf,
    /// Actor recorded in the activity log.
    #[arg(long)]
    actor: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + std::marker::Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "coopledger_admin=info,ledger=info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let db: DatabaseConnection = Database::connect(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            migration::Migrator::up(&db, None).await?;
            println!("migrations applied");
        }
        Command::Account(account) => {
            let engine = Engine::builder().database(db).build().await?;
            match account.command {
                AccountCommand::Add(args) => {
                    let code = engine
                        .register_account(&args.code, &args.name, args.cash_leg)
                        .await?;
                    println!("registered account {code}");
                }
                AccountCommand::List => {
                    for account in engine.accounts().await? {
                        let flag = if account.cash_leg { " [cash]" } else { "" };
                        println!("{}  {}{flag}", account.code, account.name);
                    }
                }
            }
        }
        Command::Doc(doc) => {
            let engine = Engine::builder().database(db).build().await?;
            match doc.command {
                DocCommand::Check(args) => {
                    let kind = DocumentKind::try_from(args.kind.as_str())?;
                    let report = engine.document_tally(kind, args.id).await?;
                    println!("debit/credit balanced:     {}", report.debit_credit_balanced);
                    println!(
                        "net debit/credit balanced: {}",
                        report.net_debit_credit_balanced
                    );
                    println!("net amount balanced:       {}", report.net_amount_balanced);
                    if !report.balanced() {
                        std::process::exit(1);
                    }
                }
            }
        }
        Command::Sync(sync) => {
            let engine = Engine::builder().database(db).build().await?;
            match sync.command {
                SyncCommand::Apply(args) => {
                    let raw = std::fs::read_to_string(&args.file)?;
                    let batch: SyncBatch = serde_json::from_str(&raw)?;
                    let (kind, records) = map_batch(batch)?;
                    let count = records.len();
                    engine.reconcile_batch(kind, records, &args.actor).await?;
                    println!("applied {count} records");
                }
            }
        }
    }

    Ok(())
}

fn map_batch(
    batch: SyncBatch,
) -> Result<(DocumentKind, Vec<SyncChangeRecord>), Box<dyn Error + Send + std::marker::Sync>> {
    let kind = DocumentKind::try_from(batch.kind.as_str())?;

    let records = batch
        .records
        .into_iter()
        .map(|record| SyncChangeRecord {
            action: match record.action {
                RecordAction::Create => SyncAction::Create,
                RecordAction::Update => SyncAction::Update,
                RecordAction::Delete => SyncAction::Delete,
            },
            document_id: record.document_id,
            header: DocumentHeader {
                code: record.code,
                amount_minor: record.amount_minor,
                document_date: record.document_date,
                period_month: record.period_month,
                period_year: record.period_year,
                check_no: record.check_no,
                bank_ref: record.bank_ref,
                member_ref: record.member_ref,
                remarks: record.remarks,
                no_of_weeks: record.no_of_weeks,
            },
            entries: record
                .entries
                .into_iter()
                .map(|line| SyncEntryRecord {
                    action: match line.action {
                        LineAction::Create => EntryAction::Create,
                        LineAction::Update => EntryAction::Update,
                        LineAction::Delete => EntryAction::Delete,
                        LineAction::Retain => EntryAction::Retain,
                    },
                    id: line.id,
                    line_no: line.line_no,
                    account_code: line.account_code,
                    debit_minor: line.debit_minor,
                    credit_minor: line.credit_minor,
                    member_ref: line.member_ref,
                    due_date: line.due_date,
                    week_no: line.week_no,
                })
                .collect(),
        })
        .collect();

    Ok((kind, records))
}
