use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod counties;
pub mod doc;
pub mod favourites;
pub mod health;
pub mod listings;
pub mod params;
pub mod payments;
pub mod photos;
pub mod regions;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/counties", counties::router())
        .nest("/regions", regions::router())
        .nest("/listings", listings::router())
        .nest("/photos", photos::router())
        .nest("/payments", payments::router())
        .nest("/favourites", favourites::router())
        .nest("/users", users::router())
        .nest("/auth", auth::router())
}
