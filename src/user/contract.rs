//! Requests and responses exchanged with the [`UserService`](super::UserService).

use serde::{Deserialize, Serialize};

/// Credentials used to create an account or log in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePasswordRequest {
    pub name: String,
    pub password: String,
}

/// Request authenticated by a token only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateNameRequest {
    pub token: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameResponse {
    pub name: String,
}

/// Both tokens returned after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: bool,
}
