//! 進捗の射影ロジック
//!
//! ポーリングで得た生のステータス集合を表示用の進捗率へ落とす純粋関数群。
//! ポーリング周期に依存せず、同じ入力からは常に同じ値が出ること。

use crate::types::{AnalysisCounters, AnalysisDetail, Photo};

/// OCR抽出の進捗率（0〜100）
///
/// 終端ステータス（done/error）の割合。写真が無ければ0
pub fn extraction_percentage(photos: &[Photo]) -> u8 {
    if photos.is_empty() {
        return 0;
    }
    let terminal = photos.iter().filter(|p| p.status.is_terminal()).count();
    ((terminal as f64 / photos.len() as f64) * 100.0).round() as u8
}

/// 抽出ポーリングの終了判定
///
/// 全件が done/error であり、かつ received/extracting が1件も無いこと。
/// 「全件終端」だけでは足りず、処理中ステータスの不在まで要求する二段条件
pub fn extraction_finished(photos: &[Photo]) -> bool {
    let all_terminal = photos.iter().all(|p| p.status.is_terminal());
    let has_active = photos.iter().any(|p| p.status.is_active());
    all_terminal && !has_active
}

/// LLM解析の進捗率（0〜100）
///
/// 写真別明細があれば段階重みの平均を採る。明細が最初のポーリングに
/// 間に合わないことがあるため、無ければカウンタから算出する二段構え
pub fn analysis_percentage(details: &[AnalysisDetail], counters: &AnalysisCounters) -> u8 {
    if !details.is_empty() {
        let sum: f64 = details.iter().map(|d| d.analysis_status.stage_weight()).sum();
        let pct = (sum / details.len() as f64 * 100.0).round();
        return pct.clamp(0.0, 100.0) as u8;
    }

    let total = if counters.photos_found > 0 {
        counters.photos_found
    } else {
        counters.photos_started
    };
    if total == 0 {
        return 0;
    }

    let processed = counters.processed();

    // ジョブが走り出しているのに0%で固まって見えないよう、
    // 処理済みゼロのあいだは固定の中間値を返す
    if counters.photos_started > 0 && processed == 0 {
        return 20;
    }

    ((processed as f64 / total as f64) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// 表示用の解析対象総数（found → started → 明細数 の順で採用）
pub fn analysis_total(counters: &AnalysisCounters, detail_count: usize) -> u32 {
    if counters.photos_found > 0 {
        counters.photos_found
    } else if counters.photos_started > 0 {
        counters.photos_started
    } else {
        detail_count as u32
    }
}

/// 解析実行全体のフェーズ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Analyzing,
    Finalizing,
    Complete,
    Error,
}

impl AnalysisPhase {
    /// 終端フェーズか（complete/error）
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisPhase::Complete | AnalysisPhase::Error)
    }
}

/// 進捗ポーリング1回分からの次フェーズ導出
///
/// 全件処理済みなら finalizing（最終JSON待ち）、それ以外は analyzing。
/// 終端フェーズは後続のポーリングで上書きしない
pub fn next_phase(current: AnalysisPhase, counters: &AnalysisCounters) -> AnalysisPhase {
    if current.is_terminal() {
        return current;
    }
    if counters.photos_started > 0 && counters.processed() >= counters.photos_started {
        AnalysisPhase::Finalizing
    } else {
        AnalysisPhase::Analyzing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisStatus, PhotoStatus};

    fn photo(status: PhotoStatus) -> Photo {
        Photo {
            id: String::new(),
            original_filename: String::new(),
            size: 0,
            status,
            error_message: None,
        }
    }

    fn detail(status: AnalysisStatus) -> AnalysisDetail {
        AnalysisDetail {
            id: String::new(),
            filename: String::new(),
            analysis_status: status,
        }
    }

    // =============================================
    // 抽出進捗テスト
    // =============================================

    #[test]
    fn test_extraction_percentage_half_terminal() {
        // 4件中2件が終端 → 50%
        let photos = vec![
            photo(PhotoStatus::Done),
            photo(PhotoStatus::Error),
            photo(PhotoStatus::Extracting),
            photo(PhotoStatus::Uploaded),
        ];
        assert_eq!(extraction_percentage(&photos), 50);
    }

    #[test]
    fn test_extraction_percentage_empty() {
        assert_eq!(extraction_percentage(&[]), 0);
    }

    #[test]
    fn test_extraction_percentage_rounds() {
        // 3件中1件 → 33.33… → 33
        let photos = vec![
            photo(PhotoStatus::Done),
            photo(PhotoStatus::Extracting),
            photo(PhotoStatus::Extracting),
        ];
        assert_eq!(extraction_percentage(&photos), 33);

        // 3件中2件 → 66.67 → 67
        let photos = vec![
            photo(PhotoStatus::Done),
            photo(PhotoStatus::Done),
            photo(PhotoStatus::Extracting),
        ];
        assert_eq!(extraction_percentage(&photos), 67);
    }

    #[test]
    fn test_extraction_continues_while_extracting() {
        let photos = vec![photo(PhotoStatus::Done), photo(PhotoStatus::Extracting)];
        assert!(!extraction_finished(&photos));
    }

    #[test]
    fn test_extraction_finishes_on_all_terminal() {
        let photos = vec![photo(PhotoStatus::Done), photo(PhotoStatus::Error)];
        assert!(extraction_finished(&photos));
    }

    #[test]
    fn test_extraction_continues_while_received() {
        let photos = vec![photo(PhotoStatus::Done), photo(PhotoStatus::Received)];
        assert!(!extraction_finished(&photos));
    }

    // =============================================
    // 解析進捗テスト（明細あり）
    // =============================================

    #[test]
    fn test_analysis_percentage_from_details() {
        // (0.25 + 0.5 + 1.0) / 3 = 58.33… → 58
        let details = vec![
            detail(AnalysisStatus::Queued),
            detail(AnalysisStatus::SentToLlm),
            detail(AnalysisStatus::Completed),
        ];
        assert_eq!(
            analysis_percentage(&details, &AnalysisCounters::default()),
            58
        );
    }

    #[test]
    fn test_analysis_percentage_all_terminal_is_100() {
        let details = vec![
            detail(AnalysisStatus::Completed),
            detail(AnalysisStatus::FallbackUsed),
            detail(AnalysisStatus::LlmFailed),
        ];
        assert_eq!(
            analysis_percentage(&details, &AnalysisCounters::default()),
            100
        );
    }

    #[test]
    fn test_analysis_percentage_details_win_over_counters() {
        // 明細があればカウンタは見ない
        let details = vec![detail(AnalysisStatus::Pending)];
        let counters = AnalysisCounters {
            photos_found: 10,
            photos_started: 10,
            photos_completed: 10,
            ..Default::default()
        };
        assert_eq!(analysis_percentage(&details, &counters), 0);
    }

    // =============================================
    // 解析進捗テスト（カウンタフォールバック）
    // =============================================

    #[test]
    fn test_analysis_percentage_counters_fallback() {
        let counters = AnalysisCounters {
            photos_found: 4,
            photos_started: 4,
            photos_completed: 1,
            photos_failed: 1,
            ..Default::default()
        };
        assert_eq!(analysis_percentage(&[], &counters), 50);
    }

    #[test]
    fn test_analysis_percentage_interim_20_while_running() {
        // 走り始め（処理済みゼロ）は固定20%
        let counters = AnalysisCounters {
            photos_started: 2,
            ..Default::default()
        };
        assert_eq!(analysis_percentage(&[], &counters), 20);
    }

    #[test]
    fn test_analysis_percentage_zero_when_unknown_total() {
        assert_eq!(analysis_percentage(&[], &AnalysisCounters::default()), 0);
    }

    #[test]
    fn test_analysis_percentage_started_as_total() {
        // found が無ければ started を総数に使う
        let counters = AnalysisCounters {
            photos_started: 3,
            photos_completed: 2,
            photos_fallback: 1,
            ..Default::default()
        };
        assert_eq!(analysis_percentage(&[], &counters), 100);
    }

    #[test]
    fn test_analysis_total_priority() {
        let counters = AnalysisCounters {
            photos_found: 5,
            photos_started: 3,
            ..Default::default()
        };
        assert_eq!(analysis_total(&counters, 7), 5);

        let counters = AnalysisCounters {
            photos_started: 3,
            ..Default::default()
        };
        assert_eq!(analysis_total(&counters, 7), 3);

        assert_eq!(analysis_total(&AnalysisCounters::default(), 7), 7);
    }

    // =============================================
    // フェーズ遷移テスト
    // =============================================

    #[test]
    fn test_next_phase_analyzing_while_in_flight() {
        let counters = AnalysisCounters {
            photos_started: 3,
            photos_completed: 1,
            ..Default::default()
        };
        assert_eq!(
            next_phase(AnalysisPhase::Analyzing, &counters),
            AnalysisPhase::Analyzing
        );
    }

    #[test]
    fn test_next_phase_finalizing_when_all_processed() {
        let counters = AnalysisCounters {
            photos_started: 3,
            photos_completed: 2,
            photos_fallback: 1,
            ..Default::default()
        };
        assert_eq!(
            next_phase(AnalysisPhase::Analyzing, &counters),
            AnalysisPhase::Finalizing
        );
    }

    #[test]
    fn test_next_phase_not_finalizing_before_start() {
        // started=0 のうちは finalizing にしない
        let counters = AnalysisCounters::default();
        assert_eq!(
            next_phase(AnalysisPhase::Analyzing, &counters),
            AnalysisPhase::Analyzing
        );
    }

    #[test]
    fn test_next_phase_terminal_is_sticky() {
        let counters = AnalysisCounters {
            photos_started: 3,
            photos_completed: 3,
            ..Default::default()
        };
        assert_eq!(
            next_phase(AnalysisPhase::Complete, &counters),
            AnalysisPhase::Complete
        );
        assert_eq!(
            next_phase(AnalysisPhase::Error, &counters),
            AnalysisPhase::Error
        );
    }
}
