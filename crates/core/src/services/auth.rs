//! Token issuance, verification and request authorization.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use phinex_common::{AppError, AppResult, config::AuthConfig};
use phinex_db::{
    entities::{RoleName, user},
    repositories::{RoleRepository, UserRepository},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::password::verify_password;

/// Claim layout version this service issues and accepts.
pub const TOKEN_VERSION: u8 = 1;

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Missing on tokens minted before versioning, which then fail the version check.
    #[serde(default)]
    pub ver: u8,
    pub user_id: String,
    pub email: String,
    pub is_authenticated: bool,
    pub roles: Vec<RoleName>,
    pub iat: i64,
    pub exp: i64,
}

/// The caller a request runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<RoleName>,
    pub is_authenticated: bool,
}

impl CurrentUser {
    /// The pseudo-user attached to requests without credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user_id: String::new(),
            email: String::new(),
            full_name: String::new(),
            roles: vec![RoleName::Anonymous],
            is_authenticated: false,
        }
    }

    /// Build the caller from a stored user and its granted roles.
    #[must_use]
    pub fn from_user(user: &user::Model, roles: Vec<RoleName>) -> Self {
        Self {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            roles,
            is_authenticated: true,
        }
    }

    /// Whether any granted role satisfies `required`.
    #[must_use]
    pub fn has_role(&self, required: RoleName) -> bool {
        self.roles.iter().any(|role| role.satisfies(required))
    }

    /// The caller's ID when signed in.
    #[must_use]
    pub fn viewer_id(&self) -> Option<&str> {
        self.is_authenticated.then_some(self.user_id.as_str())
    }

    /// Value recorded in `created_by` / `updated_by`.
    #[must_use]
    pub fn audit_id(&self) -> String {
        self.viewer_id().unwrap_or("anonymous").to_string()
    }

    /// Owners and Admin-or-higher may modify a resource.
    #[must_use]
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.is_authenticated && (self.user_id == owner_id || self.has_role(RoleName::Admin))
    }

    /// [`CurrentUser::can_manage`] as a `Forbidden` error.
    pub fn ensure_can_manage(&self, owner_id: &str, resource: &str) -> AppResult<()> {
        if self.can_manage(owner_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "You are not allowed to modify this {resource}"
            )))
        }
    }
}

/// Input for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct GetTokenInput {
    #[validate(email)]
    pub email: String,
}

/// Input for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Issued token together with the user it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
    pub user: user::Model,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    role_repo: RoleRepository,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &AuthConfig) -> Self {
        Self {
            user_repo: UserRepository::new(db.clone()),
            role_repo: RoleRepository::new(db),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Issue a token for a verified user identified by email.
    pub async fn get_token_by_email(&self, input: GetTokenInput) -> AppResult<TokenResponse> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.verified {
            return Err(AppError::Unauthorized("User is not verified".to_string()));
        }

        self.token_response(user).await
    }

    /// Issue a token after checking the password.
    pub async fn login(&self, input: LoginInput) -> AppResult<TokenResponse> {
        input.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&input.password, &user.password)? {
            return Err(invalid());
        }

        self.token_response(user).await
    }

    async fn token_response(&self, user: user::Model) -> AppResult<TokenResponse> {
        let roles = self.role_repo.role_names_for_user(&user.user_id).await?;
        let token = self.issue(&user, roles)?;

        tracing::info!(user_id = %user.user_id, "Token issued");

        Ok(TokenResponse {
            message: "Token generated successfully".to_string(),
            token,
            user,
        })
    }

    /// Sign a token for `user` carrying `roles`.
    pub fn issue(&self, user: &user::Model, roles: Vec<RoleName>) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            ver: TOKEN_VERSION,
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            is_authenticated: true,
            roles,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify signature, expiry and claim version.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let invalid = || AppError::Unauthorized("Invalid or expired token".to_string());

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            invalid()
        })?;

        if data.claims.ver != TOKEN_VERSION {
            return Err(invalid());
        }
        Ok(data.claims)
    }

    /// Load a user and its role names.
    pub async fn resolve(&self, user_id: &str) -> AppResult<Option<(user::Model, Vec<RoleName>)>> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let roles = self.role_repo.role_names_for_user(user_id).await?;
        Ok(Some((user, roles)))
    }

    /// Resolve the `Authorization` header into a caller holding at least `required`.
    ///
    /// Every call re-reads the user and its roles, so bans and role changes apply to
    /// tokens that are already issued.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        required: RoleName,
    ) -> AppResult<CurrentUser> {
        let Some(header) = authorization else {
            if required == RoleName::Anonymous {
                return Ok(CurrentUser::anonymous());
            }
            return Err(AppError::Unauthorized(
                "Authorization token is required".to_string(),
            ));
        };

        let token = bearer_token(header)?;
        let claims = self.decode(token)?;

        let (user, roles) = self
            .resolve(&claims.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        if user.status.is_restricted() {
            return Err(AppError::Forbidden(format!(
                "Your account is {}",
                user.status.as_str()
            )));
        }

        let current = CurrentUser::from_user(&user, roles);
        if required != RoleName::Anonymous && !current.has_role(required) {
            tracing::debug!(user_id = %current.user_id, required = %required, "Role check failed");
            return Err(AppError::Forbidden("Forbidden: insufficient role".to_string()));
        }

        Ok(current)
    }
}

/// Extract the token from `Bearer <token>`.
fn bearer_token(header: &str) -> AppResult<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::Unauthorized("Invalid token format".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phinex_db::entities::{UserStatus, role};
    use phinex_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        }
    }

    fn service(db: MockDatabase) -> AuthService {
        AuthService::new(Arc::new(db.into_connection()), &auth_config())
    }

    fn roles(names: &[RoleName]) -> Vec<role::Model> {
        names.iter().copied().map(fixtures::role).collect()
    }

    #[test]
    fn test_issue_then_decode() {
        let auth = service(MockDatabase::new(DatabaseBackend::Postgres));
        let user = fixtures::user("phi1", "Ada");

        let token = auth.issue(&user, vec![RoleName::Authenticated]).unwrap();
        let claims = auth.decode(&token).unwrap();

        assert_eq!(claims.ver, TOKEN_VERSION);
        assert_eq!(claims.user_id, "phi1");
        assert_eq!(claims.roles, vec![RoleName::Authenticated]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_decode_rejects_other_secret() {
        let auth = service(MockDatabase::new(DatabaseBackend::Postgres));
        let other = AuthService::new(
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            &AuthConfig {
                jwt_secret: "another".to_string(),
                token_ttl_hours: 1,
            },
        );
        let token = other
            .issue(&fixtures::user("phi1", "Ada"), vec![])
            .unwrap();

        let err = auth.decode(&token).unwrap_err();
        assert_eq!(err.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_decode_rejects_unversioned_claims() {
        let auth = service(MockDatabase::new(DatabaseBackend::Postgres));
        let now = Utc::now().timestamp();
        let legacy = serde_json::json!({
            "userId": "phi1",
            "email": "phi1@example.com",
            "isAuthenticated": true,
            "roles": ["Authenticated"],
            "iat": now,
            "exp": now + 3600,
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &legacy,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(auth.decode(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_bearer_token_format() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert!(bearer_token("Bearer").is_err());
        assert!(bearer_token("Token abc").is_err());
        assert!(bearer_token("Bearer a b").is_err());
    }

    #[tokio::test]
    async fn test_authorize_without_header() {
        let auth = service(MockDatabase::new(DatabaseBackend::Postgres));

        let anonymous = auth.authorize(None, RoleName::Anonymous).await.unwrap();
        assert!(!anonymous.is_authenticated);
        assert_eq!(anonymous.roles, vec![RoleName::Anonymous]);

        let err = auth
            .authorize(None, RoleName::Authenticated)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Authorization token is required");
    }

    #[tokio::test]
    async fn test_authorize_rejects_insufficient_role() {
        let issuer = service(MockDatabase::new(DatabaseBackend::Postgres));
        let user = fixtures::user("phi1", "Ada");
        let token = issuer.issue(&user, vec![RoleName::Authenticated]).unwrap();

        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_query_results([roles(&[RoleName::Authenticated])]),
        );

        let err = auth
            .authorize(Some(&format!("Bearer {token}")), RoleName::Admin)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: insufficient role");
    }

    #[tokio::test]
    async fn test_authorize_uses_stored_roles_not_claims() {
        let issuer = service(MockDatabase::new(DatabaseBackend::Postgres));
        let user = fixtures::user("phi1", "Ada");
        // The token predates the Admin grant.
        let token = issuer.issue(&user, vec![RoleName::Authenticated]).unwrap();

        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_query_results([roles(&[RoleName::Authenticated, RoleName::Admin])]),
        );

        let current = auth
            .authorize(Some(&format!("Bearer {token}")), RoleName::Admin)
            .await
            .unwrap();
        assert!(current.is_authenticated);
        assert!(current.has_role(RoleName::Admin));
    }

    #[tokio::test]
    async fn test_authorize_rejects_banned_user() {
        let issuer = service(MockDatabase::new(DatabaseBackend::Postgres));
        let mut user = fixtures::user("phi1", "Ada");
        user.status = UserStatus::Banned;
        let token = issuer.issue(&user, vec![RoleName::Authenticated]).unwrap();

        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_query_results([roles(&[RoleName::Authenticated])]),
        );

        let err = auth
            .authorize(Some(&format!("Bearer {token}")), RoleName::Authenticated)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "Your account is banned");
    }

    #[tokio::test]
    async fn test_authorize_unknown_user() {
        let issuer = service(MockDatabase::new(DatabaseBackend::Postgres));
        let token = issuer
            .issue(&fixtures::user("phigone", "Gone"), vec![])
            .unwrap();

        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let err = auth
            .authorize(Some(&format!("Bearer {token}")), RoleName::Anonymous)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[tokio::test]
    async fn test_get_token_requires_verified_user() {
        let mut user = fixtures::user("phi1", "Ada");
        user.verified = false;
        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]),
        );

        let err = auth
            .get_token_by_email(GetTokenInput {
                email: "phi1@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User is not verified");
    }

    #[tokio::test]
    async fn test_get_token_by_email() {
        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_query_results([roles(&[RoleName::Authenticated])]),
        );

        let response = auth
            .get_token_by_email(GetTokenInput {
                email: "phi1@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.message, "Token generated successfully");
        let claims = auth.decode(&response.token).unwrap();
        assert_eq!(claims.email, "phi1@example.com");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut user = fixtures::user("phi1", "Ada");
        user.password = crate::services::password::hash_password("right-password").unwrap();
        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]),
        );

        let err = auth
            .login(LoginInput {
                email: "phi1@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}
