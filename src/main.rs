use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use statements_parser::reconciliation::ReconciliationPeriod;
use statements_parser::record::Field;
use statements_parser::{get_handler, Config, SqliteStore, StatementProcessor};

#[derive(Parser)]
#[command(
    name = "statements-parser",
    version,
    about = "Process pay statements from financial institutions"
)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Financial institution to process
    #[arg(short = 'i', long, default_value = "ipay")]
    institution: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract paycheck records from a folder of statement text files
    Extract {
        /// Folder of pre-extracted statement .txt files (falls back to
        /// statements.input_folder from config)
        folder: Option<PathBuf>,
    },
    /// Export stored records to a CSV file
    Export {
        /// Output file path
        #[arg(default_value = "transactions.csv")]
        output: PathBuf,
    },
    /// Reconcile stored records for a period (YYYY or MM-YYYY)
    Reconcile { period: String },
    /// Enter stored records into the external ledger
    EnterLedger,
    /// Create the database schema without processing anything
    InitDb,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.logging.level);

    let mut store = SqliteStore::open(config.database_path())
        .with_context(|| format!("failed to open database {}", config.database_path().display()))?;

    let handler = get_handler(&cli.institution, &config.institutions)?;
    let processor = StatementProcessor::new(handler, config.clone());

    match cli.command {
        Command::Extract { folder } => {
            let folder = folder
                .or_else(|| config.statements.input_folder.clone())
                .context("no input folder given and statements.input_folder is not configured")?;

            let summary = processor.extract_from_folder(&folder, &mut store)?;
            println!(
                "✓ Processed {} statement(s): {} stored, {} duplicate(s), {} skipped",
                summary.processed, summary.stored, summary.duplicates, summary.skipped
            );
        }
        Command::Export { output } => {
            let exported = processor.export_csv(&output, &store)?;
            println!("✓ Exported {} record(s) to {}", exported, output.display());
        }
        Command::Reconcile { period } => {
            let period: ReconciliationPeriod = period.parse()?;
            let report = processor.reconcile_period(period, &store)?;
            print_reconciliation_report(&report);
        }
        Command::EnterLedger => {
            let entered = processor.enter_to_ledger(&store)?;
            println!("✓ Ledger entry attempted for {entered} record(s)");
        }
        Command::InitDb => {
            println!(
                "✓ Database ready at {} ({} record(s))",
                config.database_path().display(),
                store.count()?
            );
        }
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_reconciliation_report(report: &statements_parser::ReconciliationReport) {
    println!("\nSum of Earnings YTD for {} are:", report.period);
    println!("{}", "=".repeat(50));
    print_line("Regular Pay", report.total(Field::RegularPay));
    print_line("Bonus", report.total(Field::Bonus));
    print_line("Other Income", report.total(Field::OtherIncome));
    print_line("Gross Pay (extracted)", report.stored_gross_pay);
    print_line("Gross Pay (calculated)", report.calculated_gross_pay);
    print_match(report.gross_pay_matched, report.gross_pay_difference);

    println!("\nDeductions Statutory");
    println!("{}", "-".repeat(50));
    print_deduction("Federal Income Tax", report.total(Field::FederalIncomeTax));
    print_deduction("Social Security Tax", report.total(Field::SocialSecurityTax));
    print_deduction("Medicare Tax", report.total(Field::MedicareTax));
    print_deduction("State Income Tax", report.total(Field::StateIncomeTax));
    print_deduction("Local Income Tax", report.total(Field::LocalIncomeTax));
    print_deduction("Total Statutory", report.total_statutory_deductions);

    println!("\nOther Deductions");
    println!("{}", "-".repeat(50));
    print_deduction("HSA Plan", report.total(Field::HsaPlan));
    print_deduction("Illness Plan", report.total(Field::IllnessPlan));
    print_deduction("Legal", report.total(Field::Legal));
    print_deduction("Life Insurance", report.total(Field::LifeInsurance));
    print_deduction("Pretax Dental", report.total(Field::PretaxDental));
    print_deduction("Pretax Medical", report.total(Field::PretaxMedical));
    print_deduction("Pretax Vision", report.total(Field::PretaxVision));
    print_deduction("Dep Care", report.total(Field::DepCare));
    print_deduction("Vol Acc", report.total(Field::VolAcc4020));
    print_deduction("Vol Child Life", report.total(Field::VolChildLife));
    print_deduction("Vol Spousal Life", report.total(Field::VolSpousalLife));
    print_deduction("401K Pretax", report.total(Field::K401Pretax));
    print_deduction("ESPP", report.total(Field::Espp));
    print_deduction("401K Loan Gp1", report.total(Field::K401LoanGp1));
    print_deduction("Taxable Off", report.total(Field::TaxableOff));
    print_deduction("Total Other", report.total_other_deductions);

    println!();
    print_line("Net Pay (calculated)", report.calculated_net_pay);
    print_line("Net Pay (from table)", report.stored_net_pay);
    print_match(report.net_pay_matched, report.net_pay_difference);

    println!("\n{}", "=".repeat(50));
    println!(
        "Summary: {} payslip(s) considered for {}",
        report.record_count, report.period
    );
    println!("{}", "=".repeat(50));
}

fn print_line(label: &str, amount: f64) {
    println!("{label:<30} ${amount:>15.2}");
}

fn print_deduction(label: &str, amount: f64) {
    println!("{label:<30} -${:>14.2}", amount.abs());
}

fn print_match(matched: bool, difference: f64) {
    if matched {
        println!("{:<30} {:>16}", "Matched?", "Yes");
    } else {
        println!("{:<30} {:>16}", "Matched?", "No");
        println!("{:<30} ${difference:>15.2}", "Difference");
    }
}
