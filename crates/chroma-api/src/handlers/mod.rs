pub mod delete;
pub mod download;
pub mod history;
pub mod upload;
