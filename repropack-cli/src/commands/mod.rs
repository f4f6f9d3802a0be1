pub mod build;
pub mod config;
pub mod create;
pub mod download;
pub mod health;
pub mod init;
pub mod list;
