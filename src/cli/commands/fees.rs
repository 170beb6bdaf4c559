//! Fee schedule commands.

use crate::{
    cli::{AppContext, args::FeeCommand},
    core::{
        access::{Actor, Capability},
        fees::{list_fees, set_fee, update_fee},
        money::format_naira,
    },
    errors::Result,
};
use std::fmt::Write as _;

/// `fee set|list`
pub async fn fee(ctx: &AppContext, actor: &Actor, cmd: FeeCommand) -> Result<String> {
    match cmd {
        FeeCommand::Set {
            class,
            term,
            year,
            amount,
            update,
        } => {
            actor.require(Capability::ManageFees)?;
            let entry = if update {
                update_fee(&ctx.database, &class, term, year, amount).await?
            } else {
                set_fee(&ctx.database, &class, term, year, amount).await?
            };
            Ok(format!(
                "✅ Fee for {} {} {} is {}",
                entry.class_name,
                entry.term,
                entry.academic_year,
                format_naira(entry.amount())
            ))
        }
        FeeCommand::List => {
            let fees = list_fees(&ctx.database).await?;
            if fees.is_empty() {
                return Ok("No fees scheduled.".to_string());
            }
            let mut out = String::new();
            for f in fees {
                writeln!(
                    out,
                    "{:<10} {:<10} {:<12} {:>14}",
                    f.academic_year,
                    f.class_name,
                    f.term,
                    format_naira(f.amount())
                )?;
            }
            Ok(out)
        }
    }
}
