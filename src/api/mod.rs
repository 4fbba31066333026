pub mod search;
pub mod send_request;
