use log::{info, warn};
use nextflix::bootstrap::bootstrap_storage;
use nextflix::config::Config;
use nextflix::database::Storage;
use nextflix::routes::{guard, Route};
use nextflix::session::Session;
use nextflix::tmdb::TmdbClient;
use nextflix::wishlist::Wishlist;

#[actix_rt::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("nextflix=debug"))
        .init();

    let config = Config::default();
    let storage = Storage::open(&config.db_path)?;
    bootstrap_storage(&storage)?;

    let session = Session::new(storage.clone());
    let auth = session.read_auth()?;
    let wishlist = Wishlist::new(storage.clone());
    info!("{} movies on the wishlist", wishlist.items()?.len());

    if let Some(redirect) = guard(Route::Home, &auth) {
        info!("not logged in, {} redirects to {}", Route::Home.path(), redirect.path());
    } else {
        info!("logged in as {:?}", auth.user_id);
        let client = TmdbClient::new(&config, session)?;
        match client.popular(1).await {
            Ok(page) => {
                info!("popular, page {} of {}", page.page, page.total_pages);
                for movie in page.results.iter().take(10) {
                    let marker = if wishlist.contains(movie.id)? { "*" } else { " " };
                    info!("{} {} ({})", marker, movie.title, movie.release_date);
                }
            }
            Err(err) => warn!("could not load popular movies: {}", err),
        }
    }

    storage.flush()?;
    Ok(())
}
