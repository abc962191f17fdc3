pub mod contact_dto;
pub mod engagement_dto;
pub mod profile_dto;
pub mod report_dto;
pub mod search_dto;
pub mod stats_dto;
