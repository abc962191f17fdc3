pub mod candidate;
pub mod contact_request;
pub mod engagement;
pub mod recruiter;
pub mod report;
