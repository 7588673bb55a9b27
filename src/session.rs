use crate::auth::{AuthError, AuthResult, Success, AUTH_STATE, LOGGED_IN, LOGGED_OUT, SIGNED_UP};
use crate::database::{JsonTree, Storage, AUTH, SAVED_LOGIN_EMAIL, SESSION_ACTIVE, TMDB_KEY};
use crate::model::{AuthPayload, StoredUser};
use crate::users::Users;
use log::debug;

/// Login state on top of [`Users`].
///
/// A login either survives the end of the session (`keep_login`) or is
/// dropped by the next [`Session::read_auth`] once the session marker is gone.
#[derive(Clone)]
pub struct Session {
    storage: Storage,
    users: Users,
}

impl Session {
    pub fn new(storage: Storage) -> Self {
        let users = Users::new(storage.clone());
        Session { storage, users }
    }

    pub fn users(&self) -> &Users {
        &self.users
    }

    fn stored_auth(&self) -> sled::Result<AuthPayload> {
        self.storage.local().read_json(AUTH, AuthPayload::default())
    }

    fn set_auth(&self, auth: &AuthPayload) -> sled::Result<()> {
        self.storage.local().write_json(AUTH, auth)
    }

    /// Current auth state, expiring a non-persistent login whose session ended.
    pub fn read_auth(&self) -> sled::Result<AuthPayload> {
        let auth = self.stored_auth()?;
        let has_session = self.storage.session().read_raw(SESSION_ACTIVE)?.is_some();
        if !auth.keep_login && !has_session {
            let reset = AuthPayload::default();
            if auth != reset {
                debug!("session ended, logging out {:?}", auth.user_id);
            }
            self.set_auth(&reset)?;
            return Ok(reset);
        }
        Ok(auth)
    }

    /// The stored payload as-is.
    pub fn get_auth(&self) -> AuthResult<AuthPayload> {
        Ok(Success::with_data(AUTH_STATE, self.stored_auth()?))
    }

    pub fn is_logged_in(&self) -> sled::Result<bool> {
        Ok(self.read_auth()?.is_logged_in)
    }

    pub fn current_user(&self) -> sled::Result<Option<StoredUser>> {
        match self.read_auth()?.user_id {
            Some(id) => self.users.get(&id),
            None => Ok(None),
        }
    }

    pub fn api_key(&self) -> sled::Result<Option<String>> {
        Ok(self
            .storage
            .local()
            .read_raw(TMDB_KEY)?
            .filter(|key| !key.is_empty()))
    }

    /// Email to prefill on the sign-in form.
    pub fn saved_login_email(&self) -> sled::Result<Option<String>> {
        Ok(self
            .storage
            .local()
            .read_raw(SAVED_LOGIN_EMAIL)?
            .filter(|email| !email.is_empty()))
    }

    /// `None` forgets the saved email.
    pub fn set_saved_login_email(&self, email: Option<&str>) -> sled::Result<()> {
        match email {
            Some(email) => self.storage.local().write_raw(SAVED_LOGIN_EMAIL, email),
            None => self.storage.local().remove_key(SAVED_LOGIN_EMAIL),
        }
    }

    pub fn login(&self, id: &str, secret: &str, keep_login: bool) -> AuthResult {
        let user = match self.users.find(id, secret)? {
            Some(user) => user,
            None => {
                debug!("rejected login for {}", id);
                return Err(AuthError::InvalidCredentials);
            }
        };
        self.storage.local().write_raw(TMDB_KEY, &user.secret)?;
        self.set_auth(&AuthPayload::logged_in(&user.id, keep_login))?;
        self.storage.session().write_raw(SESSION_ACTIVE, "1")?;
        debug!("logged in {} (keep_login: {})", user.id, keep_login);
        Ok(Success::new(LOGGED_IN))
    }

    /// Register and immediately log in for this session only.
    pub fn sign_up(&self, id: &str, secret: &str) -> AuthResult {
        self.users.register(id, secret)?;
        self.login(id, secret, false)?;
        Ok(Success::new(SIGNED_UP))
    }

    /// A persistent login keeps its user id and API key and only clears the
    /// logged-in flag. Anything else is reset completely.
    pub fn logout(&self) -> AuthResult {
        let auth = self.stored_auth()?;
        if auth.keep_login {
            self.set_auth(&AuthPayload {
                is_logged_in: false,
                ..auth
            })?;
        } else {
            self.storage.local().remove_key(TMDB_KEY)?;
            self.set_auth(&AuthPayload::default())?;
        }
        self.storage.session().remove_key(SESSION_ACTIVE)?;
        debug!("logged out");
        Ok(Success::new(LOGGED_OUT))
    }
}
