use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::path::Path;

pub const USERS: &str = "nf_users";
pub const AUTH: &str = "nf_auth";
pub const TMDB_KEY: &str = "tmdb-key";
pub const SAVED_LOGIN_EMAIL: &str = "nf_saved_login_email";
pub const WISHLIST: &str = "movieWishlist";
pub const LEGACY_WISHLIST: &str = "wishlist";
pub const RECENT_SEARCHES: &str = "recentSearches";
pub const SESSION_ACTIVE: &str = "nf_session_active";

/// Outcome of a failed [`JsonTree::transact`].
#[derive(Debug)]
pub enum TxError<E> {
    Abort(E),
    Storage(sled::Error),
}

/// JSON-valued access to a tree. Corrupt values never reach the caller: they
/// are logged and replaced by the fallback.
pub trait JsonTree {
    fn read_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> sled::Result<T>;
    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> sled::Result<()>;
    /// Writes `value` only if `key` is absent. Returns whether it wrote.
    fn bootstrap_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> sled::Result<bool>;
    fn read_raw(&self, key: &str) -> sled::Result<Option<String>>;
    fn write_raw(&self, key: &str, value: &str) -> sled::Result<()>;
    fn remove_key(&self, key: &str) -> sled::Result<()>;
    /// Read the value at `key` (or `fallback`), run `f` on it and store the
    /// value it returns, atomically. `f` may run more than once on conflict,
    /// so it must be pure. Returning `Err` aborts without writing.
    fn transact<T, R, E, F>(&self, key: &str, fallback: T, f: F) -> Result<R, TxError<E>>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: Fn(T) -> Result<(T, R), E>;
}

fn parse_or<T: DeserializeOwned>(key: &str, raw: Option<&[u8]>, fallback: T) -> T {
    match raw {
        None => fallback,
        Some(bytes) => match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(err) => {
                warn!("[storage] Failed to parse {:?}, falling back: {}", key, err);
                fallback
            }
        },
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> sled::Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| sled::Error::Unsupported(err.to_string()))
}

impl JsonTree for sled::Tree {
    fn read_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> sled::Result<T> {
        Ok(parse_or(key, self.get(key)?.as_deref(), fallback))
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> sled::Result<()> {
        self.insert(key, encode(value)?)?;
        Ok(())
    }

    fn bootstrap_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> sled::Result<bool> {
        // compare_and_swap so a concurrent writer is never overwritten
        let swapped = self.compare_and_swap(key, None as Option<&[u8]>, Some(encode(value)?))?;
        Ok(swapped.is_ok())
    }

    fn read_raw(&self, key: &str) -> sled::Result<Option<String>> {
        Ok(self
            .get(key)?
            .map(|raw| String::from_utf8_lossy(&raw).into_owned()))
    }

    fn write_raw(&self, key: &str, value: &str) -> sled::Result<()> {
        self.insert(key, value.as_bytes())?;
        Ok(())
    }

    fn remove_key(&self, key: &str) -> sled::Result<()> {
        self.remove(key)?;
        Ok(())
    }

    fn transact<T, R, E, F>(&self, key: &str, fallback: T, f: F) -> Result<R, TxError<E>>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: Fn(T) -> Result<(T, R), E>,
    {
        self.transaction(|tree| {
            let current = parse_or(key, tree.get(key)?.as_deref(), fallback.clone());
            let (next, out) = f(current).map_err(ConflictableTransactionError::Abort)?;
            let bytes = encode(&next).map_err(ConflictableTransactionError::Storage)?;
            tree.insert(key.as_bytes(), bytes)?;
            Ok(out)
        })
        .map_err(|err| match err {
            TransactionError::Abort(e) => TxError::Abort(e),
            TransactionError::Storage(e) => TxError::Storage(e),
        })
    }
}

/// The two stores the app works against: `local` outlives the process,
/// `session` only lives as long as this handle's session does.
#[derive(Clone)]
pub struct Storage {
    local: sled::Db,
    session: sled::Db,
}

fn temporary_db() -> sled::Result<sled::Db> {
    sled::Config::new().temporary(true).open()
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> sled::Result<Self> {
        Ok(Storage {
            local: sled::open(path)?,
            session: temporary_db()?,
        })
    }

    pub fn temporary() -> sled::Result<Self> {
        Ok(Storage {
            local: temporary_db()?,
            session: temporary_db()?,
        })
    }

    /// Same persistent store, fresh session store. This is what a restart looks like.
    pub fn new_session(&self) -> sled::Result<Self> {
        Ok(Storage {
            local: self.local.clone(),
            session: temporary_db()?,
        })
    }

    pub fn local(&self) -> &sled::Tree {
        &self.local
    }

    pub fn session(&self) -> &sled::Tree {
        &self.session
    }

    pub fn flush(&self) -> sled::Result<usize> {
        self.local.flush()
    }
}
