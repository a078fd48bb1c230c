use std::sync::Arc;

use super::domain::{Role, UserId};
use super::repository::{ProfileStore, RepositoryError};

/// A caller whose role has been re-resolved from the profile store for the
/// current operation. Client-supplied role fields are never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authorization failures raised while resolving or checking an actor.
#[derive(Debug, thiserror::Error)]
pub enum AccessViolation {
    #[error("user '{0}' is not known to the profile store")]
    UnknownUser(String),
    #[error("profile for user '{0}' is incomplete; workflow actions are blocked")]
    IncompleteProfile(String),
    #[error("user '{user}' must hold the {required} role for this action")]
    WrongRole { user: String, required: &'static str },
    #[error("user '{user}' does not own the {entity} it is acting on")]
    NotOwner { user: String, entity: &'static str },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Guard resolving callers against the profile store and enforcing the
/// role/ownership rules shared by every workflow operation.
pub struct AccessGuard<P> {
    profiles: Arc<P>,
}

impl<P> AccessGuard<P>
where
    P: ProfileStore,
{
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    /// Resolve a caller to an [`Actor`]. Unknown users and profiles without a
    /// role both block the operation.
    pub fn resolve(&self, user: &UserId) -> Result<Actor, AccessViolation> {
        let profile = self
            .profiles
            .fetch(user)?
            .ok_or_else(|| AccessViolation::UnknownUser(user.0.clone()))?;

        if !profile.is_complete() {
            return Err(AccessViolation::IncompleteProfile(user.0.clone()));
        }

        let role = profile
            .role
            .ok_or_else(|| AccessViolation::IncompleteProfile(user.0.clone()))?;

        Ok(Actor {
            id: profile.id,
            role,
        })
    }

    pub fn resolve_student(&self, user: &UserId) -> Result<Actor, AccessViolation> {
        let actor = self.resolve(user)?;
        if actor.role != Role::Student {
            return Err(AccessViolation::WrongRole {
                user: actor.id.0,
                required: Role::Student.label(),
            });
        }
        Ok(actor)
    }

    pub fn resolve_mentor(&self, user: &UserId) -> Result<Actor, AccessViolation> {
        let actor = self.resolve(user)?;
        if actor.role != Role::Mentor {
            return Err(AccessViolation::WrongRole {
                user: actor.id.0,
                required: Role::Mentor.label(),
            });
        }
        Ok(actor)
    }

    /// Resolve a reviewer: either the mentor owning `owner`'s resource or an
    /// admin. Everyone else is turned away.
    pub fn resolve_reviewer(
        &self,
        user: &UserId,
        owner: &UserId,
        entity: &'static str,
    ) -> Result<Actor, AccessViolation> {
        let actor = self.resolve(user)?;
        if actor.is_admin() {
            return Ok(actor);
        }
        if actor.role == Role::Mentor && &actor.id == owner {
            return Ok(actor);
        }
        Err(AccessViolation::NotOwner {
            user: actor.id.0,
            entity,
        })
    }

}

/// Require that a resolved actor owns the referenced resource.
pub fn require_owner(
    actor: &Actor,
    owner: &UserId,
    entity: &'static str,
) -> Result<(), AccessViolation> {
    if &actor.id == owner {
        Ok(())
    } else {
        Err(AccessViolation::NotOwner {
            user: actor.id.0.clone(),
            entity,
        })
    }
}
