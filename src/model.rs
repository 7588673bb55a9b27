use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// TMDB sends `null` for text it doesn't have; read that as the empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: String,
    #[serde(rename = "password")]
    pub secret: String,
}

impl StoredUser {
    pub fn new(id: &str, secret: &str) -> Self {
        StoredUser {
            id: id.to_owned(),
            secret: secret.to_owned(),
        }
    }
}

/// Persisted login state. `user_id` is always set while `is_logged_in` holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub is_logged_in: bool,
    pub user_id: Option<String>,
    pub keep_login: bool,
}

impl AuthPayload {
    pub fn logged_in(user_id: &str, keep_login: bool) -> Self {
        AuthPayload {
            is_logged_in: true,
            user_id: Some(user_id.to_owned()),
            keep_login,
        }
    }
}

/// A movie as returned by TMDB. Fields we don't model are kept in `extra` so
/// the full record survives a trip through the wishlist.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    pub fn new(id: u64, title: &str) -> Self {
        Movie {
            id,
            title: title.to_owned(),
            poster_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
            backdrop_path: None,
            genre_ids: None,
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
