//! Roles and capabilities.
//!
//! The ledger's engines never check permissions themselves. Callers resolve
//! an [`Actor`] for the person acting and call [`Actor::require`] before
//! invoking an operation.

use crate::entities::user;
use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Staff role stored on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full control over the school's records
    Admin,
    /// Bursary staff: registers students and records payments
    Officer,
    /// Read-only access
    User,
}

impl Role {
    /// Name stored in the `users.role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Officer => "officer",
            Self::User => "user",
        }
    }

    /// Whether this role holds `capability`.
    #[must_use]
    pub const fn allows(self, capability: Capability) -> bool {
        match self {
            Self::Admin => true,
            Self::Officer => matches!(
                capability,
                Capability::RegisterStudents | Capability::RecordPayments
            ),
            Self::User => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "officer" => Ok(Self::Officer),
            "user" => Ok(Self::User),
            other => Err(Error::validation(format!(
                "Unknown role '{other}'; expected admin, officer or user"
            ))),
        }
    }
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Enroll new students
    RegisterStudents,
    /// Change an enrolled student's details
    EditStudents,
    /// Record fee payments
    RecordPayments,
    /// Add or change fee schedule entries
    ManageFees,
    /// Add classes
    ManageClasses,
    /// Add teachers
    ManageTeachers,
    /// Create staff accounts
    ManageUsers,
    /// Paid/unpaid reports and the dashboard
    ViewReports,
}

impl Capability {
    const fn describe(self) -> &'static str {
        match self {
            Self::RegisterStudents => "register students",
            Self::EditStudents => "edit students",
            Self::RecordPayments => "record payments",
            Self::ManageFees => "manage fees",
            Self::ManageClasses => "manage classes",
            Self::ManageTeachers => "manage teachers",
            Self::ManageUsers => "manage users",
            Self::ViewReports => "view reports",
        }
    }
}

/// The user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User ID, used for `recorded_by`
    pub user_id: i64,
    /// Login name
    pub username: String,
    /// Parsed role
    pub role: Role,
}

impl Actor {
    /// Builds an actor from a stored user.
    ///
    /// # Errors
    /// Returns `Error::Validation` if the stored role is not recognised.
    pub fn from_user(user: &user::Model) -> Result<Self> {
        Ok(Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.parse()?,
        })
    }

    /// Fails with `Error::Forbidden` unless the actor's role holds `capability`.
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(Error::Forbidden {
                action: format!(
                    "{} ({}) cannot {}",
                    self.username,
                    self.role,
                    capability.describe()
                ),
            })
        }
    }
}
