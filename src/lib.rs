pub mod app_context;
pub mod config;
pub mod content;
pub mod error;
pub mod logger;
pub mod media_index;
pub mod migrate;
pub mod post;
pub mod post_list;
pub mod post_repository;
pub mod post_search;
pub mod text_utils;
mod test_data;
