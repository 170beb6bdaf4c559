//! Status, report and dashboard commands.

use crate::{
    cli::{
        AppContext,
        args::{PeriodArgs, ReportKindArg},
    },
    core::{
        access::{Actor, Capability},
        money::format_naira,
        report::{PlainTextRenderer, ReportKind, ReportRenderer, build_report, dashboard_summary},
        status::assess_student,
        student::get_student,
    },
    errors::{Error, Result},
};
use std::fmt::Write as _;

/// `status <reg_number>`
pub async fn status(ctx: &AppContext, reg_number: &str, period: &PeriodArgs) -> Result<String> {
    let (academic_year, term) = ctx.period(period);
    let student = get_student(&ctx.database, reg_number).await?;
    let assessment = assess_student(
        &ctx.database,
        &student,
        academic_year,
        term,
        ctx.config.fees.unscheduled_policy,
    )
    .await?;

    let mut out = String::new();
    writeln!(
        out,
        "{} ({}) - {}: {}",
        student.name, student.reg_number, assessment.period, assessment.status
    )?;
    match assessment.scheduled {
        Some(amount) => {
            writeln!(out, "Expected:    {}", format_naira(amount))?;
        }
        None => {
            writeln!(out, "Expected:    no fee scheduled for {}", student.class_name)?;
        }
    }
    writeln!(out, "Paid:        {}", format_naira(assessment.paid))?;
    writeln!(out, "Outstanding: {}", format_naira(assessment.outstanding()))?;
    Ok(out)
}

/// `report paid|unpaid`
pub async fn report(
    ctx: &AppContext,
    actor: &Actor,
    kind: ReportKindArg,
    class_name: &str,
    period: &PeriodArgs,
) -> Result<String> {
    actor.require(Capability::ViewReports)?;
    let (academic_year, term) = ctx.period(period);
    let kind = match kind {
        ReportKindArg::Paid => ReportKind::Paid,
        ReportKindArg::Unpaid => ReportKind::Unpaid,
    };
    let document = build_report(
        &ctx.database,
        kind,
        class_name,
        term,
        academic_year,
        ctx.config.fees.unscheduled_policy,
    )
    .await?;
    let bytes = PlainTextRenderer.render(&document)?;
    String::from_utf8(bytes).map_err(|e| Error::validation(format!("Report is not valid text: {e}")))
}

/// `dashboard`
pub async fn dashboard(ctx: &AppContext, actor: &Actor) -> Result<String> {
    actor.require(Capability::ViewReports)?;
    let summary =
        dashboard_summary(&ctx.database, ctx.today, ctx.config.fees.unscheduled_policy).await?;

    let mut out = String::new();
    writeln!(out, "{}", ctx.config.school.name)?;
    writeln!(out, "Students:        {}", summary.total_students)?;
    writeln!(out, "Fees collected:  {}", format_naira(summary.total_fees_paid))?;
    writeln!(out, "Teachers:        {}", summary.total_teachers)?;
    writeln!(out, "Officers:        {}", summary.total_officers)?;
    writeln!(out, "\nRecent admissions:")?;
    if summary.recent_students.is_empty() {
        writeln!(out, "  none")?;
    }
    for row in &summary.recent_students {
        writeln!(
            out,
            "  {:<14} {:<30} {:<8} {}",
            row.student.reg_number, row.student.name, row.student.class_name, row.status
        )?;
    }
    Ok(out)
}
