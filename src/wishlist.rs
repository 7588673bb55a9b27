use crate::database::{JsonTree, Storage, TxError, WISHLIST};
use crate::model::Movie;
use std::convert::Infallible;

#[derive(Clone)]
pub struct Wishlist {
    storage: Storage,
}

impl Wishlist {
    pub fn new(storage: Storage) -> Self {
        Wishlist { storage }
    }

    pub fn items(&self) -> sled::Result<Vec<Movie>> {
        self.storage.local().read_json(WISHLIST, Vec::new())
    }

    pub fn contains(&self, id: u64) -> sled::Result<bool> {
        Ok(self.items()?.iter().any(|movie| movie.id == id))
    }

    /// Adds the movie, or removes the entry with its id. Returns whether the
    /// movie is on the wishlist afterwards.
    pub fn toggle(&self, movie: &Movie) -> sled::Result<bool> {
        self.storage
            .local()
            .transact(WISHLIST, Vec::new(), |mut items: Vec<Movie>| {
                let before = items.len();
                items.retain(|item| item.id != movie.id);
                let added = items.len() == before;
                if added {
                    items.push(movie.clone());
                }
                Ok::<_, Infallible>((items, added))
            })
            .map_err(|err| match err {
                TxError::Storage(err) => err,
                TxError::Abort(never) => match never {},
            })
    }
}
