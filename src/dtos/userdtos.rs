use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::{User, UserRole};
use crate::service::status_rules;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    pub role: RegisterRole,
}

/// Admin accounts are provisioned out of band, not self-registered.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RegisterRole {
    #[default]
    Worker,
    Employer,
}

impl From<RegisterRole> for UserRole {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::Worker => UserRole::Worker,
            RegisterRole::Employer => UserRole::Employer,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub worker_status: Option<String>,
    pub rating: f64,
    pub designation: Option<String>,
    pub completed_tasks: i32,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            worker_status: (user.role == UserRole::Worker).then(|| {
                status_rules::descriptor_or_default(user.worker_status)
                    .status
                    .to_str()
                    .to_string()
            }),
            rating: user.rating.unwrap_or(1.0),
            designation: user.designation.map(|d| d.to_str().to_string()),
            completed_tasks: user.completed_tasks.unwrap_or(0),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

//Response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct UpsertBankDetailsDto {
    #[validate(length(min = 1, message = "Account holder name is required"))]
    pub account_holder_name: String,

    #[validate(length(min = 6, max = 18, message = "Account number must be 6 to 18 digits"))]
    pub account_number: String,

    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,

    #[validate(length(min = 4, max = 16, message = "IFSC code is invalid"))]
    pub ifsc_code: String,
}
