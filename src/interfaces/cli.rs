use crate::application::lifecycle::{CreatePaymentRequest, FilterRequest, PaymentLifecycle};
use crate::domain::page::{Page, PageRequest, Sort};
use crate::domain::payment::{DebitCode, Payment, PaymentId, PaymentStatus};
use crate::error::Result;
use crate::infrastructure::open_repository;
use crate::interfaces::csv::{Command, CommandReader, PaymentWriter};
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Payment lifecycle manager", long_about = None)]
pub struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "PAYFLOW_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `payflow=debug`
    #[arg(long, global = true, env = "PAYFLOW_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run every command in a CSV file, then print the resulting payments
    Apply {
        /// Commands CSV file
        input: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a PENDING payment
    Create {
        #[arg(long)]
        debit_code: DebitCode,
        #[arg(long)]
        tax_id: String,
        /// PIX, BOLETO, DEBITO or CREDITO
        #[arg(long)]
        method: String,
        /// Required for DEBITO and CREDITO
        #[arg(long)]
        card_number: Option<String>,
        #[arg(long)]
        amount: Decimal,
    },
    /// Move a payment to a new status
    UpdateStatus { id: u64, status: String },
    /// Soft-delete a PENDING payment
    Deactivate { id: u64 },
    /// List payments
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List payments matching every given criterion
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub debit_code: Option<DebitCode>,
    #[arg(long)]
    pub tax_id: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

impl From<FilterArgs> for FilterRequest {
    fn from(args: FilterArgs) -> Self {
        Self {
            debit_code: args.debit_code,
            tax_id: args.tax_id,
            status: args.status,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: usize,
    /// Page size
    #[arg(
        long,
        env = "PAYFLOW_PAGE_SIZE",
        default_value_t = PageRequest::DEFAULT_SIZE,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    pub size: usize,
    /// Sort as `field[,asc|desc]`, field one of id, amount, debit_code
    #[arg(long)]
    pub sort: Option<Sort>,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        let request = PageRequest::new(args.page, args.size);
        match args.sort {
            Some(sort) => request.with_sort(sort),
            None => request,
        }
    }
}

/// Executes one parsed invocation, writing payments to stdout.
pub async fn run(cli: Cli) -> Result<()> {
    let lifecycle = PaymentLifecycle::new(open_repository(cli.db_path)?);
    dispatch(&lifecycle, cli.command, io::stdout()).await
}

/// Runs `command` against `lifecycle` and writes the resulting payments to
/// `out` as CSV.
pub async fn dispatch<W: io::Write>(
    lifecycle: &PaymentLifecycle,
    command: CliCommand,
    out: W,
) -> Result<()> {
    match command {
        CliCommand::Apply {
            input,
            filter,
            page,
        } => {
            let file = File::open(&input)?;
            let (applied, rejected) = apply(lifecycle, CommandReader::new(file)).await;
            info!(input = %input.display(), applied, rejected, "batch applied");

            let page = lifecycle.filter(filter.into(), &page.into()).await?;
            write_page(out, &page)
        }
        CliCommand::Create {
            debit_code,
            tax_id,
            method,
            card_number,
            amount,
        } => {
            let payment = lifecycle
                .create(CreatePaymentRequest {
                    debit_code,
                    tax_id,
                    method,
                    card_number,
                    amount,
                    status: None,
                })
                .await?;
            write(out, &[payment])
        }
        CliCommand::UpdateStatus { id, status } => {
            let status: PaymentStatus = status.parse()?;
            let payment = lifecycle.update_status(PaymentId(id), status).await?;
            write(out, &[payment])
        }
        CliCommand::Deactivate { id } => {
            let id = PaymentId(id);
            lifecycle.deactivate(id).await?;
            let payment = lifecycle.get(id).await?;
            write(out, &[payment])
        }
        CliCommand::List { page } => {
            let page = lifecycle.list(&page.into()).await?;
            write_page(out, &page)
        }
        CliCommand::Filter { filter, page } => {
            let page = lifecycle.filter(filter.into(), &page.into()).await?;
            write_page(out, &page)
        }
    }
}

/// Runs commands in order. A failing row is logged and skipped.
///
/// Returns how many commands were applied and how many were rejected.
pub async fn apply<R: io::Read>(
    lifecycle: &PaymentLifecycle,
    reader: CommandReader<R>,
) -> (usize, usize) {
    let (mut applied, mut rejected) = (0, 0);
    for (row, command) in reader.commands().enumerate() {
        let outcome = match command {
            Ok(command) => execute(lifecycle, command).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => applied += 1,
            Err(e) if e.is_domain() => {
                warn!(row = row + 1, error = %e, "command rejected");
                rejected += 1;
            }
            Err(e) => {
                error!(row = row + 1, error = %e, "command failed");
                rejected += 1;
            }
        }
    }
    (applied, rejected)
}

async fn execute(lifecycle: &PaymentLifecycle, command: Command) -> Result<()> {
    match command {
        Command::Create(request) => lifecycle.create(request).await.map(|_| ()),
        Command::UpdateStatus { id, status } => {
            let status: PaymentStatus = status.parse()?;
            lifecycle.update_status(id, status).await.map(|_| ())
        }
        Command::Deactivate { id } => lifecycle.deactivate(id).await,
    }
}

fn write_page<W: io::Write>(out: W, page: &Page<Payment>) -> Result<()> {
    info!(
        page = page.page,
        size = page.size,
        total_elements = page.total_elements,
        total_pages = page.total_pages(),
        last = page.is_last(),
        "writing page"
    );
    write(out, &page.content)
}

fn write<W: io::Write>(out: W, payments: &[Payment]) -> Result<()> {
    PaymentWriter::new(out).write_payments(payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::InMemoryPaymentRepository;

    #[test]
    fn test_cli_parses_apply_with_filters() {
        let cli = Cli::try_parse_from([
            "payflow",
            "apply",
            "commands.csv",
            "--debit-code",
            "123",
            "--status",
            "pending",
            "--size",
            "5",
            "--sort",
            "amount,desc",
        ])
        .unwrap();

        match cli.command {
            CliCommand::Apply {
                input,
                filter,
                page,
            } => {
                assert_eq!(input, PathBuf::from("commands.csv"));
                assert_eq!(filter.debit_code, Some(DebitCode::from(123)));
                assert_eq!(filter.status.as_deref(), Some("pending"));
                let request: PageRequest = page.into();
                assert_eq!(request.size, 5);
                assert!(request.sort.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_page_size() {
        assert!(Cli::try_parse_from(["payflow", "list", "--size", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_sort() {
        assert!(Cli::try_parse_from(["payflow", "list", "--sort", "color"]).is_err());
    }

    #[tokio::test]
    async fn test_apply_counts_rejections() {
        let lifecycle = PaymentLifecycle::new(Box::new(InMemoryPaymentRepository::new()));
        let data = "command,id,debit_code,tax_id,method,card_number,amount,status\n\
                    create, , 1, 12345678900, PIX, , 100.00, \n\
                    create, , 2, 12345678900, CREDITO, , 50.00, \n\
                    update_status, 1, , , , , , SUCCEEDED\n\
                    update_status, 1, , , , , , PENDING\n\
                    deactivate, 9";

        let (applied, rejected) = apply(&lifecycle, CommandReader::new(data.as_bytes())).await;
        assert_eq!((applied, rejected), (2, 3));

        let page = lifecycle.list(&PageRequest::default()).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].status(), PaymentStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_deactivate_writes_inactive_row() {
        let lifecycle = PaymentLifecycle::new(Box::new(InMemoryPaymentRepository::new()));
        let create = Cli::try_parse_from([
            "payflow",
            "create",
            "--debit-code",
            "7",
            "--tax-id",
            "12345678900",
            "--method",
            "PIX",
            "--amount",
            "15.50",
        ])
        .unwrap();
        dispatch(&lifecycle, create.command, io::sink()).await.unwrap();

        let deactivate = Cli::try_parse_from(["payflow", "deactivate", "1"]).unwrap();
        let mut out = Vec::new();
        dispatch(&lifecycle, deactivate.command, &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        let rows: Vec<_> = output.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("1,7,12345678900,PIX,"));
        assert!(rows[1].ends_with(",INACTIVE"));
    }

    #[tokio::test]
    async fn test_deactivate_unknown_id_writes_nothing() {
        let lifecycle = PaymentLifecycle::new(Box::new(InMemoryPaymentRepository::new()));
        let deactivate = Cli::try_parse_from(["payflow", "deactivate", "3"]).unwrap();

        let mut out = Vec::new();
        let result = dispatch(&lifecycle, deactivate.command, &mut out).await;
        assert!(matches!(result, Err(PaymentError::NotFound(PaymentId(3)))));
        assert!(out.is_empty());
    }
}
