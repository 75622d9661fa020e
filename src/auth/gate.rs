use tracing::warn;

use crate::{
    auth::models::Identity,
    session::{models::SessionError, store::SessionHandle},
};

pub const AUTHENTICATED_KEY: &str = "logged_in";
pub const IDENTITY_KEY: &str = "user";

pub fn is_authenticated(session: &SessionHandle) -> bool {
    match session.get::<bool>(AUTHENTICATED_KEY) {
        Ok(flag) => flag.unwrap_or(false),
        Err(e) => {
            warn!("Unreadable auth flag for visitor {}: {}", session.visitor(), e);
            false
        }
    }
}

pub fn establish_session(session: &SessionHandle, identity: &Identity) -> Result<(), SessionError> {
    session.set(IDENTITY_KEY, identity)?;
    session.set(AUTHENTICATED_KEY, &true)
}

pub fn current_identity(session: &SessionHandle) -> Result<Option<Identity>, SessionError> {
    if !is_authenticated(session) {
        return Ok(None);
    }

    session.get(IDENTITY_KEY)
}
