//! Command-line layer - argument parsing, capability checks and text output
//!
//! Every handler receives the shared [`AppContext`], checks the acting user's
//! capability where the operation needs one, calls into `core`, and returns
//! the text to print. Errors propagate to `main`, which shows
//! [`Error::user_message`](crate::errors::Error::user_message).

/// Argument definitions
pub mod args;
/// Command handlers, one module per area
pub mod commands;

pub use args::Cli;

use crate::{
    config::school::Config,
    core::{
        access::Actor,
        period::{AcademicYear, Term, current_period},
        user::resolve_actor,
    },
    errors::Result,
};
use args::{Command, PeriodArgs};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

/// Shared data available to all command handlers.
pub struct AppContext {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Loaded school configuration
    pub config: Config,
    /// Date used for defaults and the current period
    pub today: NaiveDate,
}

impl AppContext {
    /// Creates a new `AppContext`.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: Config, today: NaiveDate) -> Self {
        Self {
            database,
            config,
            today,
        }
    }

    /// Term and year from the arguments, each falling back to the period
    /// `today` is in.
    #[must_use]
    pub fn period(&self, args: &PeriodArgs) -> (AcademicYear, Term) {
        let (year, term) = current_period(self.today);
        (args.year.unwrap_or(year), args.term.unwrap_or(term))
    }

    async fn actor(&self, username: &str) -> Result<Actor> {
        resolve_actor(&self.database, username).await
    }
}

/// Runs one parsed command and returns the text to print.
#[instrument(skip(ctx, acting_user, command))]
pub async fn execute(ctx: &AppContext, acting_user: &str, command: Command) -> Result<String> {
    if matches!(command, Command::Bootstrap) {
        return commands::admin::bootstrap(ctx).await;
    }

    let actor = ctx.actor(acting_user).await?;
    debug!("Running as {} ({})", actor.username, actor.role);

    match command {
        Command::Bootstrap => commands::admin::bootstrap(ctx).await,
        Command::User(cmd) => commands::admin::user(ctx, &actor, cmd).await,
        Command::Class(cmd) => commands::admin::class(ctx, &actor, cmd).await,
        Command::Teacher(cmd) => commands::admin::teacher(ctx, &actor, cmd).await,
        Command::Fee(cmd) => commands::fees::fee(ctx, &actor, cmd).await,
        Command::Student(cmd) => commands::students::student(ctx, &actor, cmd).await,
        Command::Payment(cmd) => commands::payments::payment(ctx, &actor, cmd).await,
        Command::Status { reg_number, period } => {
            commands::reports::status(ctx, &reg_number, &period).await
        }
        Command::Report {
            kind,
            class,
            period,
        } => commands::reports::report(ctx, &actor, kind, &class, &period).await,
        Command::Dashboard => commands::reports::dashboard(ctx, &actor).await,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{
        config::school::parse_config,
        core::{class::seed_classes, fees::seed_fee_schedule},
        errors::Error,
        test_utils::setup_test_db,
    };
    use clap::Parser;

    const CONFIG: &str = r#"
        classes = ["JSS 1", "SS 1"]

        [school]
        name = "ALFURQAN ACADEMY"
        short_name = "AAM"
        address = "Galadima Road, Mai'adua"

        [[fee_schedule]]
        class = "JSS 1"
        term = "First Term"
        academic_year = "2024/2025"
        amount = 25000.0
    "#;

    async fn context() -> Result<AppContext> {
        let config = parse_config(CONFIG)?;
        let db = setup_test_db().await?;
        seed_classes(&db, &config.classes).await?;
        seed_fee_schedule(&db, &config.fee_schedule).await?;
        let today = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap();
        Ok(AppContext::new(db, config, today))
    }

    async fn run(ctx: &AppContext, argv: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("school-ledger").chain(argv.iter().copied()))
            .unwrap();
        execute(ctx, &cli.acting_user, cli.command).await
    }

    #[tokio::test]
    async fn test_officer_registers_and_records_payments() -> Result<()> {
        let ctx = context().await?;
        run(&ctx, &["bootstrap"]).await?;
        run(&ctx, &["user", "add", "bursar", "--role", "officer"]).await?;

        let out = run(
            &ctx,
            &[
                "--as", "bursar", "student", "register", "--name", "Amina Musa", "--dob",
                "2012-03-04", "--gender", "Female", "--class", "JSS 1", "--term", "First Term",
                "--year", "2024/2025",
            ],
        )
        .await?;
        assert!(out.contains("AAM/24/0001"));

        run(&ctx, &["--as", "bursar", "payment", "record", "AAM/24/0001", "--amount", "10,000"])
            .await?;
        let status = run(&ctx, &["--as", "bursar", "status", "AAM/24/0001"]).await?;
        assert!(status.contains("First Term 2024/2025: Defaulter"));
        assert!(status.contains("Outstanding: ₦15,000.00"));

        run(&ctx, &["--as", "bursar", "payment", "record", "AAM/24/0001", "--amount", "15000"])
            .await?;
        let status = run(&ctx, &["--as", "bursar", "status", "AAM/24/0001"]).await?;
        assert!(status.contains(": Paid"));
        Ok(())
    }

    #[tokio::test]
    async fn test_capabilities_are_enforced() -> Result<()> {
        let ctx = context().await?;
        run(&ctx, &["bootstrap"]).await?;
        run(&ctx, &["user", "add", "bursar"]).await?;

        let result = run(
            &ctx,
            &[
                "--as", "bursar", "fee", "set", "--class", "SS 1", "--term", "First Term",
                "--year", "2024/2025", "--amount", "40000",
            ],
        )
        .await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let result = run(&ctx, &["--as", "bursar", "report", "unpaid", "--class", "SS 1"]).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let result = run(&ctx, &["--as", "nobody", "class", "list"]).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "User", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_report_and_receipt() -> Result<()> {
        let ctx = context().await?;
        run(&ctx, &["bootstrap"]).await?;
        for name in ["Amina Musa", "Bala Sani"] {
            run(
                &ctx,
                &[
                    "student", "register", "--name", name, "--dob", "2012-03-04", "--gender",
                    "Female", "--class", "JSS 1", "--term", "First Term", "--year", "2024/2025",
                ],
            )
            .await?;
        }
        let paid = run(&ctx, &["payment", "record", "AAM/24/0002", "--amount", "25000"]).await?;
        assert!(paid.contains("Payment ID: 1"));

        let report = run(&ctx, &["report", "unpaid", "--class", "JSS 1"]).await?;
        assert!(report.starts_with("Unpaid Students Report for JSS 1 (First Term 2024/2025)"));
        assert!(report.contains("Amina Musa"));
        assert!(!report.contains("Bala Sani"));

        let receipt = run(&ctx, &["payment", "receipt", "1"]).await?;
        assert!(receipt.contains("Bala Sani"));
        assert!(receipt.contains("Recorded By:    admin"));
        Ok(())
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() -> Result<()> {
        let ctx = context().await?;
        let first = run(&ctx, &["bootstrap"]).await?;
        let second = run(&ctx, &["bootstrap"]).await?;
        assert!(first.contains("Created administrator 'admin'"));
        assert!(second.contains("already exists"));
        Ok(())
    }
}
