//! Payment commands.

use crate::{
    cli::{AppContext, args::PaymentCommand},
    core::{
        access::{Actor, Capability},
        money::format_naira,
        payment::{NewPayment, payment_receipt, record_payment},
        report::render_receipt,
    },
    errors::Result,
};

/// `payment record|receipt`
pub async fn payment(ctx: &AppContext, actor: &Actor, cmd: PaymentCommand) -> Result<String> {
    match cmd {
        PaymentCommand::Record {
            reg_number,
            amount,
            period,
            date,
        } => {
            actor.require(Capability::RecordPayments)?;
            let (academic_year, term) = ctx.period(&period);
            let created = record_payment(
                &ctx.database,
                NewPayment {
                    student_reg_number: reg_number,
                    amount,
                    term,
                    academic_year,
                    payment_date: date.unwrap_or(ctx.today),
                    recorded_by: actor.user_id,
                },
            )
            .await?;
            Ok(format!(
                "✅ Recorded {} for {} ({} {}) - Payment ID: {}",
                format_naira(created.amount()),
                created.student_reg_number,
                created.term,
                created.academic_year,
                created.id
            ))
        }
        PaymentCommand::Receipt { payment_id } => {
            let receipt = payment_receipt(&ctx.database, payment_id).await?;
            render_receipt(&ctx.config.school, &receipt)
        }
    }
}
