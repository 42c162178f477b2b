use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct County {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Region {
    pub id: i64,
    pub name: String,
    pub county_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub region_id: i64,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Photo {
    pub id: i64,
    pub listing_id: i64,
    pub url: String,
}

/// The `id` is the opaque identifier assigned by the store's auth service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: i64,
    pub user_id: String,
    pub listing_id: i64,
    pub amount: f64,
    pub confirmed: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Favourite {
    pub id: i64,
    pub user_id: String,
    pub listing_id: i64,
}
