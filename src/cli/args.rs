//! Command-line arguments.

use crate::core::{
    access::Role,
    money::parse_amount,
    period::{AcademicYear, Term},
    status::FeeStatus,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// School fee administration ledger.
#[derive(Debug, Parser)]
#[command(name = "school-ledger", version, about)]
pub struct Cli {
    /// Path to the school configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Username of the staff member running the command
    #[arg(long = "as", global = true, value_name = "USERNAME", default_value = "admin")]
    pub acting_user: String,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the first administrator account if none exists
    Bootstrap,
    /// Manage staff accounts
    #[command(subcommand)]
    User(UserCommand),
    /// Manage classes
    #[command(subcommand)]
    Class(ClassCommand),
    /// Manage teachers
    #[command(subcommand)]
    Teacher(TeacherCommand),
    /// Manage the fee schedule
    #[command(subcommand)]
    Fee(FeeCommand),
    /// Register, view and edit students
    #[command(subcommand)]
    Student(StudentCommand),
    /// Record payments and print receipts
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// Show a student's fee status for a period
    Status {
        /// Registration number, e.g. AAM/24/0001
        reg_number: String,
        /// Period to assess
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// List paid or unpaid students of a class
    Report {
        /// Which students to list
        #[arg(value_enum)]
        kind: ReportKindArg,
        /// Class to report on
        #[arg(long)]
        class: String,
        /// Period to report on
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Show headline figures
    Dashboard,
}

/// `user` subcommands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Add a staff account
    Add {
        /// Login name, unique
        username: String,
        /// admin, officer or user
        #[arg(long, value_parser = parse_role, default_value = "officer")]
        role: Role,
    },
    /// List staff accounts
    List,
}

/// `class` subcommands.
#[derive(Debug, Subcommand)]
pub enum ClassCommand {
    /// Add a class
    Add {
        /// Class name, e.g. "JSS 1"
        name: String,
    },
    /// List classes
    List,
}

/// `teacher` subcommands.
#[derive(Debug, Subcommand)]
pub enum TeacherCommand {
    /// Add a teacher
    Add {
        /// Full name
        name: String,
        /// Contact email, unique
        #[arg(long)]
        email: String,
        /// Class the teacher is responsible for
        #[arg(long)]
        class: Option<String>,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
    },
    /// List teachers
    List,
}

/// `fee` subcommands.
#[derive(Debug, Subcommand)]
pub enum FeeCommand {
    /// Add the fee for a class and period
    Set {
        /// Class the fee applies to
        #[arg(long)]
        class: String,
        /// First Term, Second Term or Third Term
        #[arg(long, value_parser = parse_term)]
        term: Term,
        /// Academic year, e.g. 2024/2025
        #[arg(long, value_parser = parse_year)]
        year: AcademicYear,
        /// Amount in naira, e.g. 25,000
        #[arg(long, value_parser = parse_naira)]
        amount: Decimal,
        /// Change an existing entry instead of adding one
        #[arg(long)]
        update: bool,
    },
    /// List the fee schedule
    List,
}

/// Student details shared by `register` and `edit`.
#[derive(Debug, Args)]
pub struct StudentDetails {
    /// Full name
    #[arg(long)]
    pub name: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: NaiveDate,
    /// Gender
    #[arg(long)]
    pub gender: String,
    /// Class to enroll into
    #[arg(long)]
    pub class: String,
    /// Term of enrollment
    #[arg(long, value_parser = parse_term)]
    pub term: Term,
    /// Academic year of enrollment
    #[arg(long, value_parser = parse_year)]
    pub year: AcademicYear,
    /// Home address
    #[arg(long)]
    pub address: Option<String>,
    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,
    /// Contact email
    #[arg(long)]
    pub email: Option<String>,
}

/// `student` subcommands.
#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Register a new student
    Register {
        /// Student details
        #[command(flatten)]
        details: StudentDetails,
        /// Admission date, YYYY-MM-DD; defaults to today
        #[arg(long)]
        admitted: Option<NaiveDate>,
    },
    /// Show a student's statement
    Show {
        /// Registration number
        reg_number: String,
    },
    /// Edit a student's details
    Edit {
        /// Registration number; never changes
        reg_number: String,
        /// Replacement details
        #[command(flatten)]
        details: StudentDetails,
    },
    /// List students
    List {
        /// Only this class
        #[arg(long)]
        class: Option<String>,
        /// Only students enrolled in this term
        #[arg(long, value_parser = parse_term)]
        term: Option<Term>,
        /// Substring of the name or registration number
        #[arg(long)]
        search: Option<String>,
        /// Only students with this status for the current period
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Search students by name or registration number
    Search {
        /// Text to look for
        query: String,
    },
}

/// `payment` subcommands.
#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Record a payment
    Record {
        /// Registration number of the paying student
        reg_number: String,
        /// Amount in naira, e.g. 10,000.50
        #[arg(long, value_parser = parse_naira)]
        amount: Decimal,
        /// Period the payment is for
        #[command(flatten)]
        period: PeriodArgs,
        /// Payment date, YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the receipt for a payment
    Receipt {
        /// Payment ID shown when it was recorded
        payment_id: i64,
    },
}

/// Term and academic year; each defaults to the current period.
#[derive(Debug, Args)]
pub struct PeriodArgs {
    /// First Term, Second Term or Third Term
    #[arg(long, value_parser = parse_term)]
    pub term: Option<Term>,
    /// Academic year, e.g. 2024/2025
    #[arg(long, value_parser = parse_year)]
    pub year: Option<AcademicYear>,
}

/// Report selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKindArg {
    /// Students whose fees are settled
    Paid,
    /// Defaulters
    Unpaid,
}

/// Status filter on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    /// Fees settled
    Paid,
    /// Fees outstanding
    Defaulter,
}

impl From<StatusArg> for FeeStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Paid => Self::Paid,
            StatusArg::Defaulter => Self::Defaulter,
        }
    }
}

fn parse_term(s: &str) -> Result<Term, String> {
    s.parse::<Term>().map_err(|e| e.to_string())
}

fn parse_year(s: &str) -> Result<AcademicYear, String> {
    AcademicYear::parse(s).map_err(|e| e.to_string())
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse::<Role>().map_err(|e| e.to_string())
}

fn parse_naira(s: &str) -> Result<Decimal, String> {
    parse_amount(s).map_err(|e| e.to_string())
}
