pub mod aggregate;
pub mod api;
pub mod card;
pub mod config;
pub mod link;
pub mod pipeline;
pub mod section;
pub mod table;
pub mod throttle;
pub mod verify;
pub mod voice;
