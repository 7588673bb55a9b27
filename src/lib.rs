pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod model;
pub mod routes;
pub mod session;
pub mod tmdb;
pub mod users;
pub mod wishlist;
