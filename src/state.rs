use crate::config::AppConfig;
use crate::services::api::BookingApi;
use crate::services::token_store::TokenStore;

pub struct AppState {
    pub config: AppConfig,
    pub api: Box<dyn BookingApi>,
    pub tokens: TokenStore,
}
