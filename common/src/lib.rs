//! Photo Audit Common Library
//!
//! ブラウザクライアント(WASM)と共有される型と純粋ロジック

pub mod error;
pub mod progress;
pub mod stats;
pub mod types;

pub use error::{ApiError, Result};
pub use progress::{
    analysis_percentage, analysis_total, extraction_finished, extraction_percentage, next_phase,
    AnalysisPhase,
};
pub use stats::{demo_stats, AdminStats, HourCount, SignalCount, SocialContextLeakage};
pub use types::{
    AnalysisCounters, AnalysisDetail, AnalysisProgress, AnalysisReport, AnalysisStatus, Photo,
    PhotoStatus, SessionUser,
};
