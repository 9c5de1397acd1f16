//! Role entity and the role ordering used by authorization.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of role names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RoleName {
    #[sea_orm(string_value = "Anonymous")]
    Anonymous,
    #[sea_orm(string_value = "Authenticated")]
    Authenticated,
    #[sea_orm(string_value = "BusinessOwner")]
    BusinessOwner,
    #[sea_orm(string_value = "PaymentAgent")]
    PaymentAgent,
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "SuperAdmin")]
    SuperAdmin,
}

impl RoleName {
    /// Every role, weakest first.
    pub const ALL: [Self; 6] = [
        Self::Anonymous,
        Self::Authenticated,
        Self::BusinessOwner,
        Self::PaymentAgent,
        Self::Admin,
        Self::SuperAdmin,
    ];

    /// Numeric rank. `BusinessOwner` and `PaymentAgent` are peers.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Anonymous => 0,
            Self::Authenticated => 1,
            Self::BusinessOwner | Self::PaymentAgent => 2,
            Self::Admin => 3,
            Self::SuperAdmin => 4,
        }
    }

    /// Whether a caller holding `self` meets a `required` minimum.
    ///
    /// Equal roles match; otherwise the rank must be strictly higher, so peers of equal rank
    /// never stand in for each other.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self == required || self.rank() > required.rank()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "Anonymous",
            Self::Authenticated => "Authenticated",
            Self::BusinessOwner => "BusinessOwner",
            Self::PaymentAgent => "PaymentAgent",
            Self::Admin => "Admin",
            Self::SuperAdmin => "SuperAdmin",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub role_id: String,

    #[sea_orm(unique)]
    pub role_name: RoleName,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
