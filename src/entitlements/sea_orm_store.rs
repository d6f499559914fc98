//! SeaORM-backed account store.
//!
//! Reads the `users` and `trips` tables owned by the application's schema.
//! Only the columns used for entitlement decisions are mapped:
//!
//! ```sql
//! users(id TEXT PRIMARY KEY, is_premium BOOLEAN, is_admin BOOLEAN, free_trip_limit INTEGER NULL)
//! trips(id TEXT PRIMARY KEY, owner_id TEXT, source_type TEXT NULL)
//! ```

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use super::storage::AccountStore;
use super::types::{TripSource, UserAccount};
use crate::error::Result;

mod entity {
    pub mod user {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "users")]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: String,
            pub is_premium: bool,
            pub is_admin: bool,
            pub free_trip_limit: Option<i32>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    pub mod trip {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "trips")]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: String,
            pub owner_id: String,
            pub source_type: Option<String>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }
}

use entity::{trip, user};

/// SeaORM-backed account store.
///
/// # Example
///
/// ```rust,ignore
/// use tripcast::entitlements::{EntitlementsManager, SeaOrmAccountStore};
///
/// let manager = EntitlementsManager::new(SeaOrmAccountStore::new(db.clone()));
/// let entitlement = manager.get_entitlements(&user_id).await?;
/// ```
#[derive(Clone, Debug)]
pub struct SeaOrmAccountStore {
    db: DatabaseConnection,
}

impl SeaOrmAccountStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn model_to_account(model: user::Model) -> UserAccount {
    let free_trip_limit = model.free_trip_limit.map(|limit| {
        u32::try_from(limit).unwrap_or_else(|_| {
            tracing::warn!(
                user_id = %model.id,
                free_trip_limit = limit,
                "negative free_trip_limit stored, treating as 0"
            );
            0
        })
    });

    UserAccount {
        is_admin: model.is_admin,
        is_premium: model.is_premium,
        free_trip_limit,
    }
}

#[async_trait]
impl AccountStore for SeaOrmAccountStore {
    async fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let model = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_account))
    }

    async fn count_quota_trips(&self, user_id: &str) -> Result<u64> {
        tracing::debug!(user_id = %user_id, "counting quota trips");

        let count = trip::Entity::find()
            .filter(trip::Column::OwnerId.eq(user_id))
            .filter(
                Condition::any()
                    .add(trip::Column::SourceType.is_null())
                    .add(trip::Column::SourceType.is_in(TripSource::QUOTA_SOURCE_TYPES)),
            )
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
