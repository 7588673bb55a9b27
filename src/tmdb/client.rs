use crate::config::Config;
use crate::model::{ListEnvelope, Movie, Page};
use crate::session::Session;
use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no TMDB API key available, log in or build with TMDB_API_KEY")]
    MissingApiKey,
    #[error("TMDB rejected the API key")]
    InvalidApiKey,
    #[error("TMDB rate limit reached, try again later")]
    RateLimited,
    #[error("network unavailable: {0}")]
    NetworkUnavailable(#[source] reqwest::Error),
    #[error("TMDB answered with status {0}")]
    Status(u16),
    #[error("could not decode TMDB response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error(transparent)]
    Http(reqwest::Error),
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),
}

/// Maps the statuses the app cares about to their own errors. Other failures
/// are reported by code.
pub fn check_status(status: StatusCode) -> Result<(), ApiError> {
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::InvalidApiKey),
        StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
        status if status.is_success() => Ok(()),
        status => Err(ApiError::Status(status.as_u16())),
    }
}

// A send error means no response came back at all.
fn send_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::Http(err)
    } else {
        ApiError::NetworkUnavailable(err)
    }
}

/// The one HTTP client for TMDB. Every request carries the key of the
/// current session and a language.
pub struct TmdbClient {
    http: reqwest::Client,
    session: Session,
    base_url: String,
    language: String,
    fallback_api_key: Option<String>,
}

impl TmdbClient {
    pub fn new(config: &Config, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(TmdbClient {
            http,
            session,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            language: config.language.clone(),
            fallback_api_key: config.fallback_api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<String, ApiError> {
        match self.session.api_key()? {
            Some(key) => Ok(key),
            None => self.fallback_api_key.clone().ok_or(ApiError::MissingApiKey),
        }
    }

    /// Caller params in order, then `api_key` and, unless given, `language`.
    fn query(&self, params: &[(&str, &str)]) -> Result<Vec<(String, String)>, ApiError> {
        let mut query: Vec<(String, String)> = params
            .iter()
            .filter(|(name, _)| *name != "api_key")
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        query.push(("api_key".to_owned(), self.api_key()?));
        if !params.iter().any(|(name, _)| *name == "language") {
            query.push(("language".to_owned(), self.language.clone()));
        }
        Ok(query)
    }

    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let query = self.query(params)?;
        debug!("GET {} {:?}", path, params);
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&query)
            .send()
            .await
            .map_err(send_error)?;
        check_status(response.status())?;
        response.json::<T>().await.map_err(ApiError::Decode)
    }

    /// The `results` of a list endpoint, empty if the field is missing.
    pub async fn fetch_list(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<Movie>, ApiError> {
        let envelope: ListEnvelope<Movie> = self.fetch_json(path, params).await?;
        Ok(envelope.results)
    }

    /// One page of a paginated endpoint. Asks for page 1 unless `params` says otherwise.
    pub async fn fetch_page(&self, path: &str, params: &[(&str, &str)]) -> Result<Page<Movie>, ApiError> {
        if params.iter().any(|(name, _)| *name == "page") {
            self.fetch_json(path, params).await
        } else {
            let mut params = params.to_vec();
            params.push(("page", "1"));
            self.fetch_json(path, &params).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Storage;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::json;
    use std::collections::HashMap;

    async fn echo_page(query: web::Query<HashMap<String, String>>) -> HttpResponse {
        let page = query.get("page").and_then(|p| p.parse::<u32>().ok()).unwrap_or(0);
        HttpResponse::Ok().json(json!({
            "page": page,
            "total_pages": 3,
            "total_results": 60,
            "results": [{
                "id": 1,
                "title": format!(
                    "{}|{}",
                    query.get("api_key").map(String::as_str).unwrap_or("-"),
                    query.get("language").map(String::as_str).unwrap_or("-"),
                ),
            }],
        }))
    }

    async fn echo_query(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "results": [{ "id": 1, "title": req.query_string() }],
        }))
    }

    async fn with_nulls() -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "results": [
                { "id": 1, "title": "Alien", "overview": "x", "backdrop_path": null },
                { "id": 2, "title": "Heat", "overview": null, "release_date": null },
            ],
        }))
    }

    async fn no_results() -> HttpResponse {
        HttpResponse::Ok().json(json!({ "page": 1 }))
    }

    async fn unauthorized() -> HttpResponse {
        HttpResponse::Unauthorized().json(json!({ "status_code": 7 }))
    }

    async fn throttled() -> HttpResponse {
        HttpResponse::TooManyRequests().finish()
    }

    async fn broken() -> HttpResponse {
        HttpResponse::InternalServerError().finish()
    }

    async fn garbage() -> HttpResponse {
        HttpResponse::Ok().body("<html>")
    }

    fn fake_tmdb() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route("/movie/popular", web::get().to(echo_page))
                .route("/trending/movie/week", web::get().to(echo_page))
                .route("/search/movie", web::get().to(echo_page))
                .route("/query", web::get().to(echo_query))
                .route("/nulls", web::get().to(with_nulls))
                .route("/empty", web::get().to(no_results))
                .route("/unauthorized", web::get().to(unauthorized))
                .route("/throttled", web::get().to(throttled))
                .route("/broken", web::get().to(broken))
                .route("/garbage", web::get().to(garbage))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn client(base_url: &str, fallback: Option<&str>, logged_in: bool) -> TmdbClient {
        let session = Session::new(Storage::temporary().unwrap());
        if logged_in {
            session.login("test@example.com", "demo-key-1234", false).unwrap();
        }
        let config = Config {
            base_url: base_url.to_owned(),
            fallback_api_key: fallback.map(str::to_owned),
            ..Config::default()
        };
        TmdbClient::new(&config, session).unwrap()
    }

    #[test]
    fn status_translation() {
        assert!(matches!(check_status(StatusCode::UNAUTHORIZED), Err(ApiError::InvalidApiKey)));
        assert!(matches!(check_status(StatusCode::TOO_MANY_REQUESTS), Err(ApiError::RateLimited)));
        assert!(matches!(check_status(StatusCode::NOT_FOUND), Err(ApiError::Status(404))));
        assert!(check_status(StatusCode::OK).is_ok());
    }

    #[actix_rt::test]
    async fn injects_session_key_and_language() {
        let client = client(&fake_tmdb(), Some("build-key"), true);
        let page = client.fetch_page("/movie/popular", &[]).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results[0].title, "demo-key-1234|ko-KR");
    }

    #[actix_rt::test]
    async fn explicit_page_and_language_win() {
        let client = client(&fake_tmdb(), None, true);
        let page = client
            .fetch_page("/movie/popular", &[("page", "2"), ("language", "en-US")])
            .await
            .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.results[0].title, "demo-key-1234|en-US");
    }

    #[actix_rt::test]
    async fn falls_back_to_build_key() {
        let client = client(&fake_tmdb(), Some("build-key"), false);
        let movies = client.fetch_list("/movie/popular", &[]).await.unwrap();
        assert_eq!(movies[0].title, "build-key|ko-KR");
    }

    #[actix_rt::test]
    async fn missing_key_fails_before_sending() {
        // nothing listens here, so a sent request would be NetworkUnavailable
        let client = client("http://127.0.0.1:1", None, false);
        let err = client.fetch_list("/movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingApiKey));
    }

    #[actix_rt::test]
    async fn catalog_helpers() {
        let client = client(&fake_tmdb(), None, true);
        assert_eq!(client.popular(4).await.unwrap().page, 4);
        assert_eq!(client.search("heat", 2).await.unwrap().page, 2);
        assert_eq!(client.trending_week().await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn repeated_params_are_all_sent() {
        let client = client(&fake_tmdb(), None, true);
        let movies = client
            .fetch_list("/query", &[("with_genres", "18"), ("with_genres", "80")])
            .await
            .unwrap();
        assert_eq!(
            movies[0].title,
            "with_genres=18&with_genres=80&api_key=demo-key-1234&language=ko-KR"
        );
    }

    #[actix_rt::test]
    async fn caller_cannot_replace_session_key() {
        let client = client(&fake_tmdb(), None, true);
        let movies = client
            .fetch_list("/query", &[("api_key", "other"), ("language", "en-US")])
            .await
            .unwrap();
        assert_eq!(movies[0].title, "language=en-US&api_key=demo-key-1234");
    }

    #[actix_rt::test]
    async fn null_fields_do_not_fail_the_list() {
        let client = client(&fake_tmdb(), None, true);
        let movies = client.fetch_list("/nulls", &[]).await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].overview, "");
    }

    #[actix_rt::test]
    async fn missing_results_is_empty_list() {
        let client = client(&fake_tmdb(), None, true);
        assert!(client.fetch_list("/empty", &[]).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn translates_failures() {
        let client = client(&fake_tmdb(), None, true);
        let err = client.fetch_list("/unauthorized", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidApiKey));
        let err = client.fetch_list("/throttled", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));
        let err = client.fetch_list("/broken", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
        let err = client.fetch_list("/garbage", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[actix_rt::test]
    async fn unreachable_host_is_network_unavailable() {
        let client = client("http://127.0.0.1:1", None, true);
        let err = client.fetch_list("/movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkUnavailable(_)));
    }
}
