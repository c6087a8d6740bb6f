//! User command implementation.
//!
//! Profiles are created by booking; these subcommands read and correct
//! them.

use crate::error::CliError;
use crate::output::print_listing;
use crate::utils::{GlobalOptions, Session};
use busbook::repository::UserRepository;
use busbook::user::UserField;
use busbook::{Error, Role, UserPatch, UserProfile};
use clap::{Args, Subcommand};

const COLUMN_HEADERS: [&str; 5] = [
    "email",
    "full_name",
    "phone_number",
    "enrollment_number",
    "role",
];

/// Show, update and list passenger profiles.
#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub action: UserAction,
}

/// Profile subcommands.
#[derive(Subcommand)]
pub enum UserAction {
    /// Show one passenger's profile
    Show {
        /// Passenger email
        #[arg(long, value_name = "EMAIL")]
        email: String,
    },

    /// Update fields of a profile
    Patch {
        /// Passenger email
        #[arg(long, value_name = "EMAIL")]
        email: String,

        /// New full name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// New phone number
        #[arg(long, value_name = "PHONE")]
        phone: Option<String>,

        /// New enrollment or staff number
        #[arg(long, value_name = "NUMBER")]
        enrollment: Option<String>,

        /// New role: student or lecturer
        #[arg(long, value_name = "ROLE")]
        role: Option<Role>,
    },

    /// List profiles
    List {
        /// Only list passengers with this role
        #[arg(long, value_name = "ROLE")]
        role: Option<Role>,
    },
}

impl UserCommand {
    /// Execute the user command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let session = Session::open(global)?;
        let format = session.format(global);
        let conn = session.db.connection();

        let profiles = match self.action {
            UserAction::Show { email } => {
                let profile = conn.get_user(&email)?.ok_or_else(|| Error::NotFound {
                    resource: format!("user {email}"),
                })?;
                vec![profile]
            }
            UserAction::Patch {
                email,
                name,
                phone,
                enrollment,
                role,
            } => {
                let patch = UserPatch {
                    full_name: name,
                    phone_number: phone,
                    enrollment_number: enrollment,
                    role,
                };
                vec![conn.update_user(&email, &patch)?]
            }
            UserAction::List { role } => match role {
                Some(role) => conn.query_users(&UserField::Role(role))?,
                None => conn.list_users()?,
            },
        };

        let rows: Vec<Vec<String>> = profiles.iter().map(profile_row).collect();
        let json = serde_json::to_value(&profiles)
            .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        print_listing(format, &COLUMN_HEADERS, &rows, &json)
    }
}

fn profile_row(p: &UserProfile) -> Vec<String> {
    vec![
        p.email().to_string(),
        p.full_name().to_string(),
        p.phone_number().to_string(),
        p.enrollment_number().to_string(),
        p.role().to_string(),
    ]
}
