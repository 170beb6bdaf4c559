//! Administrative commands - bootstrap, staff accounts, classes and teachers.

use crate::{
    cli::{
        AppContext,
        args::{ClassCommand, TeacherCommand, UserCommand},
    },
    core::{
        access::{Actor, Capability},
        class::{add_class, list_classes},
        teacher::{NewTeacher, add_teacher, list_teachers},
        user::{bootstrap_admin, create_user, list_users},
    },
    errors::Result,
};
use std::fmt::Write as _;

/// Creates the first administrator if there is none.
pub async fn bootstrap(ctx: &AppContext) -> Result<String> {
    Ok(match bootstrap_admin(&ctx.database).await? {
        Some(admin) => format!("✅ Created administrator '{}'", admin.username),
        None => "An administrator already exists; nothing to do.".to_string(),
    })
}

/// `user add|list`
pub async fn user(ctx: &AppContext, actor: &Actor, cmd: UserCommand) -> Result<String> {
    actor.require(Capability::ManageUsers)?;
    match cmd {
        UserCommand::Add { username, role } => {
            let created = create_user(&ctx.database, &username, role).await?;
            Ok(format!("✅ Added {} '{}' (ID: {})", role, created.username, created.id))
        }
        UserCommand::List => {
            let users = list_users(&ctx.database).await?;
            let mut out = String::new();
            for user in users {
                writeln!(out, "{:<4} {:<20} {}", user.id, user.username, user.role)?;
            }
            Ok(out)
        }
    }
}

/// `class add|list`
pub async fn class(ctx: &AppContext, actor: &Actor, cmd: ClassCommand) -> Result<String> {
    match cmd {
        ClassCommand::Add { name } => {
            actor.require(Capability::ManageClasses)?;
            let created = add_class(&ctx.database, &name).await?;
            Ok(format!("✅ Added class '{}'", created.name))
        }
        ClassCommand::List => {
            let classes = list_classes(&ctx.database).await?;
            if classes.is_empty() {
                return Ok("No classes yet.".to_string());
            }
            Ok(classes
                .into_iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

/// `teacher add|list`
pub async fn teacher(ctx: &AppContext, actor: &Actor, cmd: TeacherCommand) -> Result<String> {
    match cmd {
        TeacherCommand::Add {
            name,
            email,
            class,
            phone,
        } => {
            actor.require(Capability::ManageTeachers)?;
            let created = add_teacher(
                &ctx.database,
                NewTeacher {
                    name,
                    class_taught: class,
                    email,
                    phone,
                },
            )
            .await?;
            Ok(format!("✅ Added teacher '{}' <{}>", created.name, created.email))
        }
        TeacherCommand::List => {
            let teachers = list_teachers(&ctx.database).await?;
            if teachers.is_empty() {
                return Ok("No teachers yet.".to_string());
            }
            let mut out = String::new();
            for t in teachers {
                writeln!(
                    out,
                    "{:<25} {:<10} {:<30} {}",
                    t.name,
                    t.class_taught.as_deref().unwrap_or("-"),
                    t.email,
                    t.phone.as_deref().unwrap_or("-")
                )?;
            }
            Ok(out)
        }
    }
}
