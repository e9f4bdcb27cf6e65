//! Caller identity and platform directory lookup.

use async_trait::async_trait;

use crate::store::types::AccountMeta;

/// Identity of the account behind an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Platform user id.
    pub id: String,
    pub username: String,
    pub discriminator: String,
}

impl CallerIdentity {
    pub fn meta(&self) -> AccountMeta {
        AccountMeta {
            username: self.username.clone(),
            discriminator: self.discriminator.clone(),
        }
    }
}

/// Capability for resolving a platform username to an account id, used by
/// the admin workflow to target someone other than the caller.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn lookup_account_id(&self, username: &str, discriminator: &str) -> Option<String>;
}

/// Directory with no platform behind it; every lookup misses.
pub struct EmptyDirectory;

#[async_trait]
impl Directory for EmptyDirectory {
    async fn lookup_account_id(&self, _username: &str, _discriminator: &str) -> Option<String> {
        None
    }
}

/// Split a "Name#1234" user reference.
pub fn parse_user_ref(reference: &str) -> Option<(&str, &str)> {
    let (name, tag) = reference.split_once('#')?;
    if name.is_empty() || tag.is_empty() {
        return None;
    }
    Some((name, tag))
}
