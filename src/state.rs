use crate::{config::AppConfig, mailer::Mailer, store::StoreClient};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: StoreClient,
    pub mailer: Mailer,
}
