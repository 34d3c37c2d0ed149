pub mod handlers;
pub mod manage;
