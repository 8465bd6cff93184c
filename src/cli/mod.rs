use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{Transaction, TransactionId, format_amount};

/// Tally - Personal Ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local-first personal ledger with batch archiving")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "tally.db", global = true)]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a transaction (positive = received, negative = paid)
    Add {
        /// Amount (e.g., "50.00", "-20")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Counterparty
        #[arg(short, long, default_value = "")]
        whom: String,
    },

    /// Remove an active transaction
    Remove {
        /// Transaction ID
        id: String,
    },

    /// List active transactions, most recent first
    List,

    /// List archived transactions, most recent first
    Archived,

    /// Show current and archived balances
    Balance,

    /// Move every active transaction into the archive
    Archive,

    /// Erase the ledger and the archive
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export the ledger and the archive
    Export {
        /// Format: csv, json
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut service = LedgerService::init(&self.database)
            .await
            .with_context(|| format!("Failed to open database: {}", self.database))?;

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Add { amount, whom } => {
                let transaction = service.add_transaction_input(&amount, whom).await?;
                println!(
                    "Added {} ({})",
                    format_amount(transaction.amount),
                    transaction.id
                );
                println!("Balance: {}", format_amount(service.current_balance()));
            }

            Commands::Remove { id } => {
                let id = TransactionId::from(id);
                if service.remove_transaction(&id).await? {
                    println!("Removed transaction: {}", id);
                } else {
                    println!("No active transaction with ID {}", id);
                }
            }

            Commands::List => {
                print_transactions(&service.transactions(), false);
                println!();
                println!("Balance: {}", format_amount(service.current_balance()));
            }

            Commands::Archived => {
                print_transactions(&service.archived_transactions(), true);
                println!();
                println!("Archived total: {}", format_amount(service.archived_balance()));
            }

            Commands::Balance => {
                let summary = service.summary();
                println!(
                    "Current:  {:>12}  ({} transactions)",
                    format_amount(summary.current_balance),
                    summary.active_count
                );
                println!(
                    "Archived: {:>12}  ({} transactions)",
                    format_amount(summary.archived_balance),
                    summary.archived_count
                );
            }

            Commands::Archive => {
                let result = service.archive_all().await?;
                match result.archived_at {
                    Some(at) => println!(
                        "Archived {} transaction(s) at {}",
                        result.moved.len(),
                        at.format("%Y-%m-%d %H:%M:%S")
                    ),
                    None => println!("Nothing to archive."),
                }
            }

            Commands::Reset { yes } => {
                let proceed = yes || {
                    print!("This erases every transaction, including the archive. Continue? [y/N] ");
                    std::io::stdout().flush()?;
                    confirmed(std::io::stdin().lock())?
                };

                if proceed {
                    service.reset_everything().await?;
                    println!("Everything has been reset.");
                } else {
                    println!("Aborted.");
                }
            }

            Commands::Export { format, output } => {
                run_export_command(&service, &format, output.as_deref())?;
            }
        }

        Ok(())
    }
}

fn print_transactions(transactions: &[Transaction], archived: bool) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    if archived {
        println!(
            "{:<36}  {:>12}  {:<20}  {:<16}  {:<16}",
            "ID", "AMOUNT", "WHOM", "DATE", "ARCHIVED"
        );
        println!("{}", "-".repeat(108));
    } else {
        println!(
            "{:<36}  {:>12}  {:<20}  {:<16}",
            "ID", "AMOUNT", "WHOM", "DATE"
        );
        println!("{}", "-".repeat(90));
    }

    for t in transactions {
        let date = t.created_at.format("%Y-%m-%d %H:%M").to_string();
        match t.archived_at {
            Some(at) if archived => println!(
                "{:<36}  {:>12}  {:<20}  {:<16}  {:<16}",
                t.id,
                format_amount(t.amount),
                t.whom,
                date,
                at.format("%Y-%m-%d %H:%M").to_string()
            ),
            _ => println!(
                "{:<36}  {:>12}  {:<20}  {:<16}",
                t.id,
                format_amount(t.amount),
                t.whom,
                date
            ),
        }
    }
}

/// Read a yes/no answer; anything but "y" or "yes" declines.
fn confirmed<R: BufRead>(mut input: R) -> Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn run_export_command(service: &LedgerService, format: &str, output: Option<&str>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "json" => {
            exporter.export_json(writer)?;
            if output.is_some() {
                let summary = service.summary();
                eprintln!(
                    "Exported {} active and {} archived transactions",
                    summary.active_count, summary.archived_count
                );
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed() {
        assert!(confirmed("y\n".as_bytes()).unwrap());
        assert!(confirmed("YES\n".as_bytes()).unwrap());
        assert!(!confirmed("n\n".as_bytes()).unwrap());
        assert!(!confirmed("\n".as_bytes()).unwrap());
        assert!(!confirmed("".as_bytes()).unwrap());
    }

    #[test]
    fn test_parse_negative_amount() {
        let cli = Cli::try_parse_from(["tally", "add", "-20", "--whom", "Bob"]).unwrap();
        match cli.command {
            Commands::Add { amount, whom } => {
                assert_eq!(amount, "-20");
                assert_eq!(whom, "Bob");
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_reset_defaults_to_prompt() {
        let cli = Cli::try_parse_from(["tally", "-d", "other.db", "reset"]).unwrap();
        assert_eq!(cli.database, "other.db");
        assert!(matches!(cli.command, Commands::Reset { yes: false }));
    }
}
