pub mod auth;
pub mod authz;
pub mod rate_limit;
