//! Boarding house repository.
//!
//! Boarding houses are the scope unit for every ledger operation; this
//! repository only covers provisioning and lookup.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use lodgera_shared::types::BoardingHouseId;

use crate::entities::boarding_houses;

/// Error types for boarding house operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardingHouseError {
    /// Boarding house not found.
    #[error("Boarding house not found: {0}")]
    NotFound(BoardingHouseId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a boarding house.
#[derive(Debug, Clone)]
pub struct CreateBoardingHouseInput {
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: Option<String>,
}

/// Repository for boarding house provisioning.
#[derive(Debug, Clone)]
pub struct BoardingHouseRepository {
    db: DatabaseConnection,
}

impl BoardingHouseRepository {
    /// Creates a new boarding house repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a boarding house.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        input: CreateBoardingHouseInput,
    ) -> Result<boarding_houses::Model, BoardingHouseError> {
        let now = Utc::now().into();
        let model = boarding_houses::ActiveModel {
            id: Set(BoardingHouseId::new().into_inner()),
            name: Set(input.name),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Lists all boarding houses, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<boarding_houses::Model>, BoardingHouseError> {
        Ok(boarding_houses::Entity::find()
            .order_by_asc(boarding_houses::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a boarding house by id.
    ///
    /// # Errors
    ///
    /// Returns [`BoardingHouseError::NotFound`] when absent.
    pub async fn find(
        &self,
        id: BoardingHouseId,
    ) -> Result<boarding_houses::Model, BoardingHouseError> {
        boarding_houses::Entity::find()
            .filter(boarding_houses::Column::Id.eq(id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BoardingHouseError::NotFound(id))
    }
}
