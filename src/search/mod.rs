pub mod filter;
pub mod listing;
pub mod normalize;
pub mod relevance;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Recipe with ID {id} not found")]
    NotFound { id: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
