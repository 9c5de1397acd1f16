//! Request extractors.

use std::marker::PhantomData;
use std::ops::Deref;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use phinex_common::{AppError, Pagination};
use phinex_core::CurrentUser;
use phinex_db::entities::RoleName;
use phinex_db::repositories::BlogOrder;
use serde::Deserialize;

use crate::middleware::AppState;

/// Minimum role a [`Guard`] demands.
pub trait MinRole: Send + Sync + 'static {
    /// The required role.
    const ROLE: RoleName;
}

macro_rules! min_role {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl MinRole for $name {
                const ROLE: RoleName = RoleName::$name;
            }
        )*
    };
}

min_role!(
    /// Open to everyone; a present header must still be valid.
    Anonymous,
    /// Any signed-in user.
    Authenticated,
    BusinessOwner,
    PaymentAgent,
    Admin,
    SuperAdmin,
);

/// Caller resolved from the `Authorization` header, holding at least `R`.
///
/// The token is re-verified and the user re-read on every request.
#[derive(Debug, Clone)]
pub struct Guard<R: MinRole> {
    pub user: CurrentUser,
    _role: PhantomData<fn() -> R>,
}

impl<R: MinRole> Deref for Guard<R> {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<R: MinRole> FromRequestParts<AppState> for Guard<R> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AppError::Unauthorized("Invalid token format".to_string()))
            })
            .transpose()?;

        let user = state.auth_service.authorize(header, R::ROLE).await?;
        Ok(Self {
            user,
            _role: PhantomData,
        })
    }
}

/// `?page&limit&order` for the public blog feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub order: BlogOrder,
}

impl BlogListQuery {
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// `?page&limit&search` for user listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl UserListQuery {
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}
