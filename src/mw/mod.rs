pub mod auth_mw;
pub mod request_mw;
pub mod session_mw;
