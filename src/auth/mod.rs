pub mod db;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod password;
