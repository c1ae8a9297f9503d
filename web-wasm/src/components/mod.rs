//! UIコンポーネント

pub mod admin_dashboard;
pub mod analysis_modal;
pub mod chart_card;
pub mod dashboard;
pub mod login_page;
pub mod nav_bar;
pub mod photos_section;
pub mod processing_modal;
pub mod progress_bar;
pub mod upload_card;
