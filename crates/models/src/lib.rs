pub mod errors;
pub mod db;
pub mod validate;

pub mod user;
pub mod campaign;
pub mod campaign_image;
pub mod story_section;
pub mod roadmap_phase;
pub mod team_member;
pub mod tier;
pub mod milestone;
pub mod contribution;
pub mod event;
pub mod event_milestone;
pub mod event_image;
pub mod event_service;
pub mod service_item;

#[cfg(test)]
mod tests;
