//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule rejections and repository failures so callers can relay them
//! to the player with consistent context. None of them is fatal to the
//! runtime.
use thiserror::Error;

use wulin_core::{EntityId, PerformRejection, RoomId};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Nothing by that name can be fought, or an explicit target is not
    /// engaged.
    #[error("no such target: {0}")]
    NoSuchTarget(String),

    #[error("fighting is forbidden in {room}")]
    UnsafeZoneViolation { room: RoomId },

    #[error(transparent)]
    PreconditionFailed(#[from] PerformRejection),

    #[error("combat store unavailable")]
    PersistenceUnavailable(#[from] RepositoryError),

    #[error("player {0} is not registered")]
    PlayerNotFound(EntityId),

    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,
}
