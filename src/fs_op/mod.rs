pub mod archive;
pub mod content;
pub mod copy;
pub mod create;
pub mod download;
pub mod error;
pub mod files;
pub mod helpers;
pub mod metadata;
pub mod mv;
pub mod path;
pub mod remove;
pub mod sanitize;
pub mod stat;
pub mod units;
pub mod upload;
