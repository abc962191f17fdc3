pub mod admin;
pub mod candidate;
pub mod contact;
pub mod engagement;
pub mod health;
pub mod recruiter;
pub mod search;
