use crate::database::{
    JsonTree, Storage, AUTH, LEGACY_WISHLIST, RECENT_SEARCHES, TMDB_KEY, USERS, WISHLIST,
};
use crate::model::{AuthPayload, Movie};
use crate::users::default_users;
use log::info;
use serde_json::Value;

/// Seed every key the app reads, and migrate or normalize the wishlist.
pub fn bootstrap_storage(storage: &Storage) -> sled::Result<()> {
    let local = storage.local();
    if local.bootstrap_key(AUTH, &AuthPayload::default())? {
        info!("seeded {}", AUTH);
    }
    if local.bootstrap_key(USERS, &default_users())? {
        info!("seeded {}", USERS);
    }
    local.bootstrap_key(RECENT_SEARCHES, &Vec::<String>::new())?;

    if local.get(TMDB_KEY)?.is_none() {
        local.write_raw(TMDB_KEY, "")?;
    }

    match local.get(WISHLIST)? {
        None => match local.get(LEGACY_WISHLIST)? {
            Some(legacy) => {
                info!("migrating {} to {}", LEGACY_WISHLIST, WISHLIST);
                local.insert(WISHLIST, legacy)?;
            }
            None => local.write_json(WISHLIST, &Vec::<Movie>::new())?,
        },
        Some(_) => {
            // untyped, so any valid JSON is kept and only garbage is replaced
            let normalized: Value = local.read_json(WISHLIST, Value::Array(Vec::new()))?;
            local.write_json(WISHLIST, &normalized)?;
        }
    }
    Ok(())
}
