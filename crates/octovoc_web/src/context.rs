//! Loads the session context from the server and browser storage.

use crate::client::Client;
use octovoc::SessionContext;
use serde::Deserialize;

/// Session storage key of the level a guest picked, so that a refresh forgets it.
pub const GUEST_LEVEL_KEY: &str = "guestLevel";
/// Local storage key of the logged in user's account details.
pub const USER_KEY: &str = "user";

#[derive(Debug, Default, Deserialize)]
struct StoredUser {
    #[serde(default)]
    gdpr_accepted: bool,
}

/// Builds the context for a new practice session. Call once per session.
pub async fn load_session_context(client: &Client) -> SessionContext {
    let user_id = match client.current_user().await {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!("Failed to fetch current user, practising as a guest: {err}");
            None
        }
    };
    let guest_level = read_storage(Storage::Session, GUEST_LEVEL_KEY);
    let stored_user = read_storage(Storage::Local, USER_KEY);
    session_context(user_id, guest_level.as_deref(), stored_user.as_deref())
}

pub fn session_context(
    user_id: Option<i32>,
    guest_level: Option<&str>,
    stored_user: Option<&str>,
) -> SessionContext {
    let gdpr_accepted = stored_user.and_then(|json| {
        match serde_json::from_str::<StoredUser>(json) {
            Ok(user) => Some(user.gdpr_accepted),
            Err(err) => {
                tracing::warn!("Ignoring malformed stored user: {err}");
                None
            }
        }
    });
    match user_id {
        Some(user_id) => {
            let mut context = SessionContext::student(user_id);
            if let Some(gdpr_accepted) = gdpr_accepted {
                context.gdpr_accepted = gdpr_accepted;
            }
            context
        }
        None => {
            let guest_level = guest_level.and_then(|level| match level.trim().parse::<u8>() {
                Ok(level) => Some(level),
                Err(err) => {
                    tracing::warn!("Ignoring invalid guest level {level:?}: {err}");
                    None
                }
            });
            SessionContext::guest(guest_level, gdpr_accepted.unwrap_or(false))
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Storage {
    Local,
    Session,
}

fn read_storage(storage: Storage, key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let storage = match storage {
        Storage::Local => window.local_storage(),
        Storage::Session => window.session_storage(),
    };
    match storage {
        Ok(Some(storage)) => storage.get_item(key).ok().flatten(),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!("Browser storage is unavailable: {err:?}");
            None
        }
    }
}
