//! Dependency-checked deletes.
//!
//! A creator or genre may only be removed while no show refers to it. The
//! storage layer does not enforce those references, so every delete goes
//! through two steps:
//!
//! 1. [`prepare_delete`] loads the entity and its dependent shows together so
//!    the caller can show what would block the delete.
//! 2. [`confirm_delete`] repeats both lookups, refuses with
//!    [`DeleteOutcome::Blocked`] if anything still refers to the entity, and
//!    otherwise removes it.
//!
//! Nothing here retries. There is no lock between the dependent check and the
//! removal, so a show created in that window is not detected.

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Show;
use crate::database::repository::{Deletable, Repository, ShowRepository};
use crate::types::{parse_id, EntityKind};

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Invalid {kind} identifier: {value}")]
    InvalidIdentifier { kind: EntityKind, value: String },

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// An entity together with the shows that currently refer to it
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation<E> {
    pub entity: E,
    pub dependents: Vec<Show>,
}

impl<E> DeleteConfirmation<E> {
    pub fn is_blocked(&self) -> bool {
        !self.dependents.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrepareOutcome<E> {
    Ready(DeleteConfirmation<E>),
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<E> {
    Removed,
    Blocked(DeleteConfirmation<E>),
    NotFound,
}

/// Load the entity and its dependents for the confirmation view
pub async fn prepare_delete<E, S>(store: &S, raw_id: &str) -> Result<PrepareOutcome<E>, DeleteError>
where
    E: Deletable,
    S: Repository<E> + ShowRepository + ?Sized,
{
    let id = parse_entity_id::<E>(raw_id)?;
    let (entity, dependents) = load_with_dependents::<E, S>(store, id).await?;

    match entity {
        Some(entity) => {
            debug!(kind = %E::KIND, %id, dependents = dependents.len(), "Prepared delete");
            Ok(PrepareOutcome::Ready(DeleteConfirmation { entity, dependents }))
        }
        None => {
            debug!(kind = %E::KIND, %id, "Delete requested for missing entity");
            Ok(PrepareOutcome::NotFound)
        }
    }
}

/// Re-check dependents and remove the entity if nothing refers to it
pub async fn confirm_delete<E, S>(store: &S, raw_id: &str) -> Result<DeleteOutcome<E>, DeleteError>
where
    E: Deletable,
    S: Repository<E> + ShowRepository + ?Sized,
{
    let id = parse_entity_id::<E>(raw_id)?;
    let (entity, dependents) = load_with_dependents::<E, S>(store, id).await?;

    let Some(entity) = entity else {
        debug!(kind = %E::KIND, %id, "Entity already gone, nothing to remove");
        return Ok(DeleteOutcome::NotFound);
    };

    if !dependents.is_empty() {
        warn!(
            kind = %E::KIND,
            %id,
            dependents = dependents.len(),
            "Delete refused, entity is still referenced"
        );
        return Ok(DeleteOutcome::Blocked(DeleteConfirmation { entity, dependents }));
    }

    let removed = <S as Repository<E>>::remove_by_id(store, id).await?;
    if !removed {
        // Lost a race with another delete; the end state is the same.
        debug!(kind = %E::KIND, %id, "Row vanished before removal");
    }
    info!(kind = %E::KIND, %id, "Removed entity");
    Ok(DeleteOutcome::Removed)
}

fn parse_entity_id<E: Deletable>(raw_id: &str) -> Result<Uuid, DeleteError> {
    parse_id(raw_id).map_err(|_| DeleteError::InvalidIdentifier {
        kind: E::KIND,
        value: raw_id.to_string(),
    })
}

/// Fetch the entity and its dependents concurrently; the first failure wins
async fn load_with_dependents<E, S>(
    store: &S,
    id: Uuid,
) -> Result<(Option<E>, Vec<Show>), DatabaseError>
where
    E: Deletable,
    S: Repository<E> + ShowRepository + ?Sized,
{
    let entity = <S as Repository<E>>::find_by_id(store, id);
    let dependents = async {
        match E::dependents_key(id) {
            Some(key) => store.find_by_foreign_key(key).await,
            None => Ok(Vec::new()),
        }
    };
    futures::try_join!(entity, dependents)
}
