pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    contact_service::ContactService, engagement_service::EngagementService,
    moderation_service::ModerationService, profile_service::ProfileService,
    search_service::SearchService, stats_service::StatsService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub search_service: SearchService,
    pub engagement_service: EngagementService,
    pub contact_service: ContactService,
    pub moderation_service: ModerationService,
    pub stats_service: StatsService,
    pub profile_service: ProfileService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let search_service = SearchService::new(pool.clone());
        let engagement_service = EngagementService::new(pool.clone());
        let contact_service = ContactService::new(pool.clone());
        let moderation_service = ModerationService::new(pool.clone());
        let stats_service = StatsService::new(pool.clone());
        let profile_service = ProfileService::new(pool.clone());

        Self {
            pool,
            search_service,
            engagement_service,
            contact_service,
            moderation_service,
            stats_service,
            profile_service,
        }
    }
}
