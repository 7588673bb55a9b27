use super::client::{ApiError, TmdbClient};
use crate::model::{Movie, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TrendingWeek,
    Popular,
    NowPlaying,
    TopRated,
    Upcoming,
    Discover,
    Search,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TrendingWeek => "/trending/movie/week",
            Endpoint::Popular => "/movie/popular",
            Endpoint::NowPlaying => "/movie/now_playing",
            Endpoint::TopRated => "/movie/top_rated",
            Endpoint::Upcoming => "/movie/upcoming",
            Endpoint::Discover => "/discover/movie",
            Endpoint::Search => "/search/movie",
        }
    }
}

impl TmdbClient {
    async fn page_of(&self, endpoint: Endpoint, page: u32) -> Result<Page<Movie>, ApiError> {
        let page = page.to_string();
        self.fetch_page(endpoint.path(), &[("page", page.as_str())]).await
    }

    pub async fn popular(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.page_of(Endpoint::Popular, page).await
    }

    pub async fn now_playing(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.page_of(Endpoint::NowPlaying, page).await
    }

    pub async fn top_rated(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.page_of(Endpoint::TopRated, page).await
    }

    pub async fn upcoming(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.page_of(Endpoint::Upcoming, page).await
    }

    /// `params` are passed through as TMDB discover filters, e.g. `with_genres`.
    pub async fn discover(&self, page: u32, params: &[(&str, &str)]) -> Result<Page<Movie>, ApiError> {
        let page = page.to_string();
        let mut params: Vec<(&str, &str)> =
            params.iter().copied().filter(|(name, _)| *name != "page").collect();
        params.push(("page", page.as_str()));
        self.fetch_page(Endpoint::Discover.path(), &params).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<Page<Movie>, ApiError> {
        let page = page.to_string();
        self.fetch_page(Endpoint::Search.path(), &[("query", query), ("page", page.as_str())])
            .await
    }

    pub async fn trending_week(&self) -> Result<Vec<Movie>, ApiError> {
        self.fetch_list(Endpoint::TrendingWeek.path(), &[]).await
    }
}
