use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListingQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub county_id: Option<i64>,
    pub region_id: Option<i64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ListingQuery {
    pub fn pagination(&self) -> (i64, i64) {
        (self.limit.unwrap_or(20), self.skip.unwrap_or(0))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegionQuery {
    pub county_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PhotoQuery {
    pub listing_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentQuery {
    pub user_id: Option<String>,
    pub listing_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FavouriteListQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FavouriteKeyQuery {
    pub user_id: String,
    pub listing_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserQuery {
    pub role: Option<String>,
}
