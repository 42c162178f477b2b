use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::auth::{Claims, LoginRequest, RegisterRequest},
    models::{County, Favourite, Listing, Payment, Photo, Region, User},
    response::ActionResponse,
    routes::{auth, counties, favourites, health, listings, params, payments, photos, regions, users},
    services::reminder::ReminderReport,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        counties::list_counties,
        counties::get_county,
        counties::add_county,
        regions::list_regions,
        regions::get_region,
        regions::add_region,
        listings::list_listings,
        listings::get_listing,
        listings::create_listing,
        photos::upload_photo,
        photos::list_photos,
        photos::delete_photo,
        payments::list_payments,
        payments::create_payment,
        payments::confirm_payment,
        payments::get_payment,
        payments::mpesa_webhook,
        favourites::list_favourites,
        favourites::add_favourite,
        favourites::remove_favourite,
        users::list_users,
        users::get_user,
        users::get_user_by_email,
        users::update_user,
        users::delete_user,
        auth::register,
        auth::login,
        auth::me,
        auth::send_landlord_payment_reminders
    ),
    components(
        schemas(
            County,
            Region,
            Listing,
            Photo,
            User,
            Payment,
            Favourite,
            ActionResponse,
            ReminderReport,
            Claims,
            LoginRequest,
            RegisterRequest,
            counties::CreateCountyRequest,
            regions::CreateRegionRequest,
            listings::CreateListingRequest,
            payments::CreatePaymentRequest,
            favourites::AddFavouriteRequest,
            users::UpdateUserRequest,
            params::ListingQuery,
            params::RegionQuery,
            params::PhotoQuery,
            params::PaymentQuery,
            params::FavouriteListQuery,
            params::FavouriteKeyQuery,
            params::UserQuery,
            health::HealthData
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Counties", description = "County endpoints"),
        (name = "Regions", description = "Region endpoints"),
        (name = "Listings", description = "Listing endpoints"),
        (name = "Photos", description = "Photo upload and records"),
        (name = "Payments", description = "Payment endpoints"),
        (name = "Favourites", description = "Saved-listing endpoints"),
        (name = "Users", description = "User endpoints"),
        (name = "Auth", description = "Authentication and reminder endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
