//! Student commands - registration, statements, editing and listings.

use crate::{
    cli::{
        AppContext,
        args::{StudentCommand, StudentDetails},
    },
    core::{
        access::{Actor, Capability},
        breakdown::student_statement,
        money::format_naira,
        report::list_students_with_status,
        student::{
            NewStudent, StudentFilter, StudentUpdate, register_student, search_students,
            update_student,
        },
    },
    entities::student,
    errors::Result,
};
use std::fmt::Write as _;

/// `student register|show|edit|list|search`
pub async fn student(ctx: &AppContext, actor: &Actor, cmd: StudentCommand) -> Result<String> {
    match cmd {
        StudentCommand::Register { details, admitted } => {
            actor.require(Capability::RegisterStudents)?;
            let new = NewStudent {
                name: details.name,
                date_of_birth: details.dob,
                gender: details.gender,
                address: details.address,
                phone: details.phone,
                email: details.email,
                class_name: details.class,
                term: details.term,
                academic_year: details.year,
                admission_date: admitted.unwrap_or(ctx.today),
            };
            let created = register_student(
                &ctx.database,
                &ctx.config.school.short_name,
                new,
                ctx.config.registration.max_attempts,
            )
            .await?;
            Ok(format!(
                "✅ Registered {} in {} with registration number {}",
                created.name, created.class_name, created.reg_number
            ))
        }
        StudentCommand::Show { reg_number } => show(ctx, &reg_number).await,
        StudentCommand::Edit {
            reg_number,
            details,
        } => {
            actor.require(Capability::EditStudents)?;
            let updated = update_student(&ctx.database, &reg_number, into_update(details)).await?;
            Ok(format!("✅ Updated {} ({})", updated.name, updated.reg_number))
        }
        StudentCommand::List {
            class,
            term,
            search,
            status,
        } => {
            let filter = StudentFilter {
                class_name: class,
                term,
                search,
            };
            let rows = list_students_with_status(
                &ctx.database,
                &filter,
                status.map(Into::into),
                ctx.today,
                ctx.config.fees.unscheduled_policy,
            )
            .await?;
            if rows.is_empty() {
                return Ok("No students found.".to_string());
            }
            let mut out = String::new();
            for row in rows {
                writeln!(out, "{}  {}", student_line(&row.student), row.status)?;
            }
            Ok(out)
        }
        StudentCommand::Search { query } => {
            let found = search_students(&ctx.database, &query).await?;
            if found.is_empty() {
                return Ok(format!("No students match '{}'.", query.trim()));
            }
            Ok(found
                .iter()
                .map(student_line)
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

fn into_update(details: StudentDetails) -> StudentUpdate {
    StudentUpdate {
        name: details.name,
        date_of_birth: details.dob,
        gender: details.gender,
        address: details.address,
        phone: details.phone,
        email: details.email,
        class_name: details.class,
        term: details.term,
        academic_year: details.year,
    }
}

fn student_line(s: &student::Model) -> String {
    format!("{:<14} {:<30} {:<8}", s.reg_number, s.name, s.class_name)
}

async fn show(ctx: &AppContext, reg_number: &str) -> Result<String> {
    let statement = student_statement(
        &ctx.database,
        reg_number,
        ctx.today,
        ctx.config.fees.unscheduled_policy,
    )
    .await?;
    let s = &statement.student;

    let mut out = String::new();
    writeln!(out, "{} ({})", s.name, s.reg_number)?;
    writeln!(out, "Class: {}  |  {} {}", s.class_name, s.term, s.academic_year)?;
    writeln!(out, "Born: {}  |  Gender: {}", s.date_of_birth, s.gender)?;
    writeln!(out, "Admitted: {}", s.admission_date)?;
    for (label, value) in [("Address", &s.address), ("Phone", &s.phone), ("Email", &s.email)] {
        if let Some(value) = value {
            writeln!(out, "{label}: {value}")?;
        }
    }
    writeln!(
        out,
        "\nCurrent status ({}): {}",
        statement.current.period, statement.current.status
    )?;

    writeln!(out, "\nFee breakdown:")?;
    for line in &statement.breakdown {
        writeln!(
            out,
            "  {:<24} expected {:>14}  paid {:>14}  outstanding {:>14}",
            line.period.to_string(),
            format_naira(line.expected),
            format_naira(line.paid),
            format_naira(line.outstanding)
        )?;
    }

    writeln!(out, "\nPayments:")?;
    if statement.payments.is_empty() {
        writeln!(out, "  none")?;
    }
    for p in &statement.payments {
        writeln!(
            out,
            "  #{:<5} {}  {:>14}  {} {}",
            p.id,
            p.payment_date,
            format_naira(p.amount()),
            p.term,
            p.academic_year
        )?;
    }
    Ok(out)
}
