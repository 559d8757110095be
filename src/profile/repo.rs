use serde::Serialize;
use uuid::Uuid;

use super::dto::UserProfile;
use crate::store::{collections::PROFILE, encode, DocumentStore, StoreError};

pub const PROFILE_DOC_ID: &str = "current";

pub async fn get(store: &dyn DocumentStore, owner: Uuid) -> Result<Option<UserProfile>, StoreError> {
    match store.get(owner, PROFILE, PROFILE_DOC_ID).await? {
        Some(doc) => Ok(Some(doc.decode::<UserProfile>()?.1)),
        None => Ok(None),
    }
}

pub async fn put(store: &dyn DocumentStore, owner: Uuid, profile: &UserProfile) -> Result<(), StoreError> {
    store.put(owner, PROFILE, PROFILE_DOC_ID, encode(profile)?).await
}

pub async fn patch<P: Serialize + Sync>(
    store: &dyn DocumentStore,
    owner: Uuid,
    patch: &P,
) -> Result<(), StoreError> {
    store.update(owner, PROFILE, PROFILE_DOC_ID, encode(patch)?).await
}
