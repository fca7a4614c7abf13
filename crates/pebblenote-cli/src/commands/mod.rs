pub mod add;
pub mod buy;
pub mod common;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod pull;
pub mod seed;
pub mod show;
pub mod stats;
pub mod toggle;
