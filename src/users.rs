use crate::auth::{AuthError, AuthResult, Success, REGISTERED};
use crate::database::{JsonTree, Storage, USERS};
use crate::model::StoredUser;
use log::debug;

/// The account every fresh install starts with.
pub fn default_users() -> Vec<StoredUser> {
    vec![StoredUser::new("test@example.com", "demo-key-1234")]
}

/// Locally stored accounts. There is no update or delete.
#[derive(Clone)]
pub struct Users {
    storage: Storage,
}

impl Users {
    pub fn new(storage: Storage) -> Self {
        Users { storage }
    }

    pub fn load(&self) -> sled::Result<Vec<StoredUser>> {
        self.storage.local().read_json(USERS, default_users())
    }

    pub fn save(&self, users: &[StoredUser]) -> sled::Result<()> {
        self.storage.local().write_json(USERS, users)
    }

    pub fn get(&self, id: &str) -> sled::Result<Option<StoredUser>> {
        Ok(self.load()?.into_iter().find(|user| user.id == id))
    }

    /// Exact, case-sensitive match on both fields.
    pub fn find(&self, id: &str, secret: &str) -> sled::Result<Option<StoredUser>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|user| user.id == id && user.secret == secret))
    }

    pub fn register(&self, id: &str, secret: &str) -> AuthResult {
        self.storage
            .local()
            .transact(USERS, default_users(), |mut users| {
                if users.iter().any(|user| user.id == id) {
                    return Err(AuthError::DuplicateUser);
                }
                users.push(StoredUser::new(id, secret));
                Ok((users, ()))
            })?;
        debug!("registered user {}", id);
        Ok(Success::new(REGISTERED))
    }
}
