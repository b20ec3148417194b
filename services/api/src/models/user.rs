use chrono::{DateTime, Utc};
use common::{
    error::FieldErrors,
    role::Role,
    validation::{normalize_email, validate_email, validate_fullname, validate_password, validate_phone},
};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::multipart::FormData;

/// User as listed in the admin panel, joined with its profile
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    #[sqlx(skip)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated user form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub fullname: String,
    pub email: String,
    /// Plain text; `None` on update keeps the stored hash
    pub password: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UserInput {
    pub fn from_form(form: &FormData, password_required: bool) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let fullname = form.text("fullname").unwrap_or_default().to_string();
        if let Err(msg) = validate_fullname(&fullname) {
            errors.add("fullname", msg);
        }

        let email = normalize_email(form.text("email").unwrap_or_default());
        if let Err(msg) = validate_email(&email) {
            errors.add("email", msg);
        }

        let password = form.text("password").map(str::to_string);
        match &password {
            Some(password) => {
                if let Err(msg) = validate_password(password) {
                    errors.add("password", msg);
                }
            }
            None if password_required => errors.add("password", "Password is required"),
            None => {}
        }

        let role = match form.text("role") {
            Some(value) => value.parse::<Role>().unwrap_or_else(|_| {
                errors.add("role", "Role must be user or admin");
                Role::User
            }),
            None => Role::User,
        };

        let phone = form.text("phone").map(str::to_string);
        if let Some(phone) = &phone {
            if let Err(msg) = validate_phone(phone) {
                errors.add("phone", msg);
            }
        }
        let address = form.text("address").map(str::to_string);

        errors.into_result()?;

        Ok(Self {
            fullname,
            email,
            password,
            role,
            phone,
            address,
        })
    }
}
