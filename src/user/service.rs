//! User service port and its placeholder implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, ServerError};
use crate::token::{TokenInformation, TokenManager};
use crate::user::{
    LoginResponse, NamePasswordRequest, NameResponse, RefreshResponse,
    StatusResponse, TokenRequest, UpdateNameRequest, UpdatePasswordRequest,
};

/// Inbound port for account operations.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account and return its refresh token.
    async fn create(&self, request: NamePasswordRequest) -> Result<RefreshResponse>;

    /// Delete the account owning the token.
    async fn delete(&self, request: TokenRequest) -> Result<StatusResponse>;

    /// Name of the token's owner.
    async fn get_name(&self, request: TokenRequest) -> Result<NameResponse>;

    async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<StatusResponse>;

    async fn update_name(&self, request: UpdateNameRequest) -> Result<StatusResponse>;

    /// Log in and return both access and refresh tokens.
    async fn login(&self, request: NamePasswordRequest) -> Result<LoginResponse>;
}

/// [`UserService`] authenticating requests without any account backend yet.
///
/// Token-bearing requests are verified first, so token failures surface as
/// such; every operation then reports [`ServerError::NotImplemented`].
#[derive(Debug, Clone)]
pub struct UserSvc {
    tokens: Arc<TokenManager>,
}

impl UserSvc {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self { tokens }
    }

    fn authenticate(&self, token: &str) -> Result<TokenInformation> {
        Ok(self.tokens.verify(token)?)
    }

    fn not_implemented<T>(&self, operation: &str, user_id: Option<&str>) -> Result<T> {
        tracing::debug!(operation, user_id, "user operation is not implemented");
        Err(ServerError::NotImplemented)
    }
}

#[async_trait]
impl UserService for UserSvc {
    async fn create(&self, _request: NamePasswordRequest) -> Result<RefreshResponse> {
        self.not_implemented("create", None)
    }

    async fn delete(&self, request: TokenRequest) -> Result<StatusResponse> {
        let info = self.authenticate(&request.token)?;
        self.not_implemented("delete", Some(info.id()))
    }

    async fn get_name(&self, request: TokenRequest) -> Result<NameResponse> {
        let info = self.authenticate(&request.token)?;
        self.not_implemented("get_name", Some(info.id()))
    }

    async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<StatusResponse> {
        let info = self.authenticate(&request.token)?;
        self.not_implemented("update_password", Some(info.id()))
    }

    async fn update_name(&self, request: UpdateNameRequest) -> Result<StatusResponse> {
        let info = self.authenticate(&request.token)?;
        self.not_implemented("update_name", Some(info.id()))
    }

    async fn login(&self, _request: NamePasswordRequest) -> Result<LoginResponse> {
        self.not_implemented("login", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenError;
    use crate::rule::Rule;
    use crate::token::JwtImplementation;

    fn service() -> (UserSvc, Arc<TokenManager>) {
        let mut tokens = TokenManager::new(
            Arc::new(JwtImplementation::new()),
            Rule::any(),
            Rule::any(),
            Rule::any(),
        );
        tokens.set_access_expire(5);
        tokens.set_sign_key("s3cr3t");

        let tokens = Arc::new(tokens);
        (UserSvc::new(Arc::clone(&tokens)), tokens)
    }

    #[tokio::test]
    async fn test_valid_token_reaches_operation() {
        let (service, tokens) = service();
        let token = tokens.new_access_token("user-42").unwrap();

        let result = service.get_name(TokenRequest { token }).await;
        assert!(matches!(result, Err(ServerError::NotImplemented)));
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected_first() {
        let (service, _) = service();

        let result = service
            .update_name(UpdateNameRequest {
                token: "not a token".into(),
                name: "bob".into(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ServerError::Token(TokenError::Malformed))
        ));
    }

    #[tokio::test]
    async fn test_credentials_operations() {
        let (service, _) = service();
        let request = NamePasswordRequest {
            name: "alice".into(),
            password: "hunter2".into(),
        };

        assert!(matches!(
            service.create(request.clone()).await,
            Err(ServerError::NotImplemented)
        ));
        assert!(matches!(
            service.login(request).await,
            Err(ServerError::NotImplemented)
        ));
    }
}
