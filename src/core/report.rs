//! Report generation business logic.
//!
//! [`filter_by_status`] is the single selection routine behind both the
//! on-screen student listings and the printable reports, so the two always
//! agree on membership for the same class and period. Rendering is behind
//! the [`ReportRenderer`] trait; only a plain-text renderer ships here.

use crate::{
    config::school::SchoolConfig,
    core::{
        access::Role,
        money::format_naira,
        payment::{PaymentReceipt, total_collected},
        period::{AcademicPeriod, AcademicYear, Term, current_period},
        status::{FeeStatus, UnscheduledFeePolicy, assess_student},
        student::{StudentFilter, count_students, find_students, recent_admissions, students_in_class},
        teacher::count_teachers,
        user::count_users_with_role,
    },
    entities::student,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::fmt::Write as _;
use tracing::{debug, info, instrument};

const RECENT_ADMISSIONS: u64 = 5;

/// Students of a class whose computed status for a period is `wanted`.
///
/// Ordered by registration number.
#[instrument(skip(db))]
pub async fn filter_by_status(
    db: &DatabaseConnection,
    class_name: &str,
    term: Term,
    academic_year: AcademicYear,
    wanted: FeeStatus,
    policy: UnscheduledFeePolicy,
) -> Result<Vec<student::Model>> {
    let mut selected = Vec::new();
    for student in students_in_class(db, class_name).await? {
        let assessment = assess_student(db, &student, academic_year, term, policy).await?;
        if assessment.status == wanted {
            selected.push(student);
        }
    }
    debug!("{} students in {} are {}", selected.len(), class_name, wanted);
    Ok(selected)
}

/// A student listing row with the status for the listed period.
#[derive(Debug, Clone)]
pub struct StudentWithStatus {
    /// The student
    pub student: student::Model,
    /// Status for the listed period
    pub status: FeeStatus,
}

/// Lists students matching `filter`, each with their status for the period
/// `today` falls in, optionally keeping only one status.
pub async fn list_students_with_status(
    db: &DatabaseConnection,
    filter: &StudentFilter,
    status: Option<FeeStatus>,
    today: NaiveDate,
    policy: UnscheduledFeePolicy,
) -> Result<Vec<StudentWithStatus>> {
    let (year, term) = current_period(today);
    let mut rows = Vec::new();
    for student in find_students(db, filter).await? {
        let assessment = assess_student(db, &student, year, term, policy).await?;
        if status.is_none_or(|wanted| wanted == assessment.status) {
            rows.push(StudentWithStatus {
                student,
                status: assessment.status,
            });
        }
    }
    Ok(rows)
}

/// Which students a report lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Students whose fees are settled
    Paid,
    /// Defaulters
    Unpaid,
}

impl ReportKind {
    /// Status a student must have to appear in the report.
    #[must_use]
    pub const fn wanted_status(self) -> FeeStatus {
        match self {
            Self::Paid => FeeStatus::Paid,
            Self::Unpaid => FeeStatus::Defaulter,
        }
    }

    /// Report heading.
    #[must_use]
    pub fn title(self, class_name: &str, period: &AcademicPeriod) -> String {
        let label = match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        };
        format!(
            "{label} Students Report for {class_name} ({} {})",
            period.term, period.academic_year
        )
    }
}

/// A titled, ordered list of students ready to render.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// Heading, e.g. "Unpaid Students Report for SS 1 (First Term 2024/2025)"
    pub title: String,
    /// Matching students by registration number
    pub students: Vec<student::Model>,
}

/// Selects the students for a paid or unpaid report.
pub async fn build_report(
    db: &DatabaseConnection,
    kind: ReportKind,
    class_name: &str,
    term: Term,
    academic_year: AcademicYear,
    policy: UnscheduledFeePolicy,
) -> Result<ReportDocument> {
    let students = filter_by_status(
        db,
        class_name,
        term,
        academic_year,
        kind.wanted_status(),
        policy,
    )
    .await?;
    let title = kind.title(class_name, &AcademicPeriod::new(academic_year, term));
    info!("Built '{}' with {} students", title, students.len());
    Ok(ReportDocument { title, students })
}

/// Turns a report into a document.
pub trait ReportRenderer {
    /// Renders `report` to the bytes of a finished document.
    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>>;
}

/// Renders reports as an aligned text table.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer;

impl ReportRenderer for PlainTextRenderer {
    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>> {
        let mut out = String::new();
        writeln!(out, "{}", report.title)?;
        writeln!(out, "{}", "=".repeat(report.title.chars().count()))?;
        if report.students.is_empty() {
            writeln!(out, "No students found.")?;
            return Ok(out.into_bytes());
        }
        writeln!(out, "{:<4} {:<14} {:<30} {}", "S/N", "Reg. Number", "Name", "Class")?;
        for (i, student) in report.students.iter().enumerate() {
            writeln!(
                out,
                "{:<4} {:<14} {:<30} {}",
                i + 1,
                student.reg_number,
                student.name,
                student.class_name
            )?;
        }
        writeln!(out, "\nTotal: {}", report.students.len())?;
        Ok(out.into_bytes())
    }
}

/// Renders a payment receipt under the school's letterhead.
///
/// # Errors
/// `Fmt` if the text cannot be written.
pub fn render_receipt(school: &SchoolConfig, receipt: &PaymentReceipt) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", school.name)?;
    if !school.address.is_empty() {
        writeln!(out, "{}", school.address)?;
    }
    writeln!(out, "PAYMENT RECEIPT #{}", receipt.payment.id)?;
    writeln!(out)?;
    writeln!(out, "Student:        {}", receipt.student.name)?;
    writeln!(out, "Reg. Number:    {}", receipt.student.reg_number)?;
    writeln!(out, "Class:          {}", receipt.student.class_name)?;
    writeln!(out, "Amount Paid:    {}", format_naira(receipt.payment.amount()))?;
    writeln!(out, "Payment Date:   {}", receipt.payment.payment_date.format("%d %B %Y"))?;
    writeln!(out, "Term:           {}", receipt.payment.term)?;
    writeln!(out, "Academic Year:  {}", receipt.payment.academic_year)?;
    writeln!(out, "Recorded By:    {}", receipt.recorded_by)?;
    writeln!(out)?;
    writeln!(out, "Thank you for your payment.")?;
    Ok(out)
}

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// Enrolled students
    pub total_students: u64,
    /// Sum of every payment ever recorded
    pub total_fees_paid: Decimal,
    /// Registered teachers
    pub total_teachers: u64,
    /// Staff accounts with the officer role
    pub total_officers: u64,
    /// Newest admissions with their status for the current period
    pub recent_students: Vec<StudentWithStatus>,
}

/// Gathers the dashboard figures.
pub async fn dashboard_summary(
    db: &DatabaseConnection,
    today: NaiveDate,
    policy: UnscheduledFeePolicy,
) -> Result<DashboardSummary> {
    let (year, term) = current_period(today);
    let mut recent_students = Vec::new();
    for student in recent_admissions(db, RECENT_ADMISSIONS).await? {
        let status = assess_student(db, &student, year, term, policy).await?.status;
        recent_students.push(StudentWithStatus { student, status });
    }

    Ok(DashboardSummary {
        total_students: count_students(db).await?,
        total_fees_paid: total_collected(db).await?,
        total_teachers: count_teachers(db).await?,
        total_officers: count_users_with_role(db, Role::Officer).await?,
        recent_students,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::core::{
        fees::set_fee,
        payment::payment_receipt,
        student::register_student,
        teacher::{NewTeacher, add_teacher},
        user::create_user,
    };
    use crate::test_utils::*;

    /// Three SS 1 students for First Term 2024/2025: two paid, one short.
    async fn ss1_fixture() -> Result<(DatabaseConnection, Vec<student::Model>)> {
        let db = setup_test_db().await?;
        seed_test_classes(&db).await?;
        let recorder = create_user(&db, "bursar", Role::Officer).await?;
        set_fee(&db, "SS 1", Term::FirstTerm, year_2024(), Decimal::from(40000)).await?;

        let mut students = Vec::new();
        for (name, paid) in [("Amina Musa", 40000), ("Bala Sani", 15000), ("Chidi Obi", 45000)] {
            let student =
                register_student(&db, "AAM", new_student(name, "SS 1", year_2024()), 5).await?;
            record_test_payment(&db, &student.reg_number, recorder.id, Decimal::from(paid)).await?;
            students.push(student);
        }
        // Another class; never part of an SS 1 report.
        register_student(&db, "AAM", new_student("Dauda Ali", "JSS 1", year_2024()), 5).await?;
        Ok((db, students))
    }

    fn numbers(students: &[student::Model]) -> Vec<&str> {
        students.iter().map(|s| s.reg_number.as_str()).collect()
    }

    #[tokio::test]
    async fn test_filter_by_status_paid_and_defaulters() -> Result<()> {
        let (db, students) = ss1_fixture().await?;
        let policy = UnscheduledFeePolicy::Paid;

        let paid =
            filter_by_status(&db, "SS 1", Term::FirstTerm, year_2024(), FeeStatus::Paid, policy)
                .await?;
        assert_eq!(
            numbers(&paid),
            vec![students[0].reg_number.as_str(), students[2].reg_number.as_str()]
        );

        let defaulters = filter_by_status(
            &db,
            "SS 1",
            Term::FirstTerm,
            year_2024(),
            FeeStatus::Defaulter,
            policy,
        )
        .await?;
        assert_eq!(numbers(&defaulters), vec![students[1].reg_number.as_str()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_matches_listing() -> Result<()> {
        let (db, _) = ss1_fixture().await?;
        let policy = UnscheduledFeePolicy::Paid;

        let listing =
            filter_by_status(&db, "SS 1", Term::FirstTerm, year_2024(), FeeStatus::Paid, policy)
                .await?;
        let report =
            build_report(&db, ReportKind::Paid, "SS 1", Term::FirstTerm, year_2024(), policy)
                .await?;

        assert_eq!(report.title, "Paid Students Report for SS 1 (First Term 2024/2025)");
        assert_eq!(report.students, listing);
        Ok(())
    }

    #[tokio::test]
    async fn test_unscheduled_period_follows_policy() -> Result<()> {
        let (db, _) = ss1_fixture().await?;

        let unpaid = build_report(
            &db,
            ReportKind::Unpaid,
            "SS 1",
            Term::SecondTerm,
            year_2024(),
            UnscheduledFeePolicy::Paid,
        )
        .await?;
        assert!(unpaid.students.is_empty());

        let unpaid = build_report(
            &db,
            ReportKind::Unpaid,
            "SS 1",
            Term::SecondTerm,
            year_2024(),
            UnscheduledFeePolicy::Defaulter,
        )
        .await?;
        assert_eq!(unpaid.students.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_plain_text_rendering() -> Result<()> {
        let (db, students) = ss1_fixture().await?;
        let report = build_report(
            &db,
            ReportKind::Unpaid,
            "SS 1",
            Term::FirstTerm,
            year_2024(),
            UnscheduledFeePolicy::Paid,
        )
        .await?;

        let text = String::from_utf8(PlainTextRenderer.render(&report)?).unwrap();
        assert!(text.starts_with("Unpaid Students Report for SS 1 (First Term 2024/2025)\n"));
        assert!(text.contains(&students[1].reg_number));
        assert!(text.contains("Bala Sani"));
        assert!(!text.contains("Amina Musa"));
        assert!(text.contains("Total: 1"));
        Ok(())
    }

    #[test]
    fn test_empty_report_rendering() {
        let report = ReportDocument {
            title: "Paid Students Report for JSS 3 (Third Term 2024/2025)".to_string(),
            students: Vec::new(),
        };
        let text = String::from_utf8(PlainTextRenderer.render(&report).unwrap()).unwrap();
        assert!(text.contains("No students found."));
    }

    #[tokio::test]
    async fn test_list_students_with_status_filter() -> Result<()> {
        let (db, _) = ss1_fixture().await?;
        // 2024-10-15 falls in First Term 2024/2025.
        let today = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let filter = StudentFilter {
            class_name: Some("SS 1".to_string()),
            ..Default::default()
        };

        let all = list_students_with_status(&db, &filter, None, today, UnscheduledFeePolicy::Paid)
            .await?;
        assert_eq!(all.len(), 3);

        let defaulters = list_students_with_status(
            &db,
            &filter,
            Some(FeeStatus::Defaulter),
            today,
            UnscheduledFeePolicy::Paid,
        )
        .await?;
        assert_eq!(defaulters.len(), 1);
        assert_eq!(defaulters[0].student.name, "Bala Sani");
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_rendering() -> Result<()> {
        let (db, recorder, student) = setup_with_student("JSS 1").await?;
        let payment =
            record_test_payment(&db, &student.reg_number, recorder.id, Decimal::from(25000)).await?;
        let receipt = payment_receipt(&db, payment.id).await?;

        let school = SchoolConfig {
            name: "ALFURQAN ACADEMY".to_string(),
            short_name: "AAM".to_string(),
            address: "Galadima Road, Mai'adua".to_string(),
        };
        let text = render_receipt(&school, &receipt)?;
        assert!(text.starts_with("ALFURQAN ACADEMY\n"));
        assert!(text.contains("₦25,000.00"));
        assert!(text.contains(&student.reg_number));
        assert!(text.contains(&format!("Recorded By:    {}", recorder.username)));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_summary() -> Result<()> {
        let (db, _) = ss1_fixture().await?;
        add_teacher(
            &db,
            NewTeacher {
                name: "Aisha Bello".to_string(),
                class_taught: Some("SS 1".to_string()),
                email: "aisha@example.com".to_string(),
                phone: None,
            },
        )
        .await?;

        let today = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let summary = dashboard_summary(&db, today, UnscheduledFeePolicy::Paid).await?;

        assert_eq!(summary.total_students, 4);
        assert_eq!(summary.total_fees_paid, Decimal::from(100_000));
        assert_eq!(summary.total_teachers, 1);
        assert_eq!(summary.total_officers, 1);
        assert_eq!(summary.recent_students.len(), 4);
        Ok(())
    }
}
