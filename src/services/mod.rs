pub mod contact_service;
pub mod engagement_service;
pub mod fallback;
pub mod moderation_service;
pub mod profile_service;
pub mod search_service;
pub mod stats_service;
