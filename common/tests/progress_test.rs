//! 進捗射影の結合テスト
//!
//! ポーリング周期に依存せず同じ入力から同じ値が出ることを、
//! ダッシュボードの実シナリオに沿って検証する

use photo_audit_common::{
    analysis_percentage, analysis_total, extraction_finished, extraction_percentage, next_phase,
    AnalysisCounters, AnalysisDetail, AnalysisPhase, AnalysisStatus, Photo, PhotoStatus,
};

fn photos(statuses: &[PhotoStatus]) -> Vec<Photo> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, &status)| Photo {
            id: format!("p{}", i),
            original_filename: format!("photo{}.jpg", i),
            size: 1024,
            status,
            error_message: None,
        })
        .collect()
}

fn details(statuses: &[AnalysisStatus]) -> Vec<AnalysisDetail> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, &analysis_status)| AnalysisDetail {
            id: format!("p{}", i),
            filename: format!("photo{}.jpg", i),
            analysis_status,
        })
        .collect()
}

/// 抽出ジョブ1本分のステータス遷移を追ったときの進捗と終了判定
#[test]
fn test_extraction_lifecycle() {
    // 202直後: 全件 received
    let snapshot = photos(&[PhotoStatus::Received, PhotoStatus::Received]);
    assert_eq!(extraction_percentage(&snapshot), 0);
    assert!(!extraction_finished(&snapshot));

    // 1件目が抽出中
    let snapshot = photos(&[PhotoStatus::Extracting, PhotoStatus::Received]);
    assert!(!extraction_finished(&snapshot));

    // 1件目完了、2件目抽出中 → まだ続行
    let snapshot = photos(&[PhotoStatus::Done, PhotoStatus::Extracting]);
    assert_eq!(extraction_percentage(&snapshot), 50);
    assert!(!extraction_finished(&snapshot));

    // 全件終端（片方はエラー）→ 終了
    let snapshot = photos(&[PhotoStatus::Done, PhotoStatus::Error]);
    assert_eq!(extraction_percentage(&snapshot), 100);
    assert!(extraction_finished(&snapshot));
}

/// done と error の混在は等しく終端として数える
#[test]
fn test_extraction_percentage_counts_error_as_terminal() {
    let snapshot = photos(&[
        PhotoStatus::Done,
        PhotoStatus::Error,
        PhotoStatus::Extracting,
        PhotoStatus::Uploaded,
    ]);
    assert_eq!(extraction_percentage(&snapshot), 50);
}

/// 解析ジョブ1本分: 明細が届くまではカウンタ、届いたら段階重み
#[test]
fn test_analysis_lifecycle() {
    // 開始直後: 明細もカウンタも空 → 0%
    let counters = AnalysisCounters::default();
    assert_eq!(analysis_percentage(&[], &counters), 0);

    // サーバーが走り出した（処理済みゼロ）→ 固定20%
    let counters = AnalysisCounters {
        photos_found: 3,
        photos_started: 3,
        ..Default::default()
    };
    assert_eq!(analysis_percentage(&[], &counters), 20);

    // 明細が届いた → 段階重みの平均に切り替わる
    let list = details(&[
        AnalysisStatus::Queued,
        AnalysisStatus::SentToLlm,
        AnalysisStatus::Completed,
    ]);
    assert_eq!(analysis_percentage(&list, &counters), 58);

    // 全件終端 → 100%
    let list = details(&[
        AnalysisStatus::Completed,
        AnalysisStatus::Completed,
        AnalysisStatus::FallbackUsed,
    ]);
    assert_eq!(analysis_percentage(&list, &counters), 100);
}

/// フェーズは analyzing → finalizing と進み、終端は上書きされない
#[test]
fn test_phase_progression_and_stickiness() {
    let mut phase = AnalysisPhase::Analyzing;

    let counters = AnalysisCounters {
        photos_started: 2,
        photos_completed: 1,
        ..Default::default()
    };
    phase = next_phase(phase, &counters);
    assert_eq!(phase, AnalysisPhase::Analyzing);

    let counters = AnalysisCounters {
        photos_started: 2,
        photos_completed: 1,
        photos_failed: 1,
        ..Default::default()
    };
    phase = next_phase(phase, &counters);
    assert_eq!(phase, AnalysisPhase::Finalizing);

    // 本体レスポンス到着で complete になった後は、遅れて届いた
    // ポーリング結果で finalizing に戻らないこと
    phase = AnalysisPhase::Complete;
    assert_eq!(next_phase(phase, &counters), AnalysisPhase::Complete);
}

/// 表示用総数はカウンタ優先、どちらも無ければ明細数
#[test]
fn test_analysis_total_fallback_chain() {
    let counters = AnalysisCounters {
        photos_found: 4,
        photos_started: 3,
        ..Default::default()
    };
    assert_eq!(analysis_total(&counters, 2), 4);

    let counters = AnalysisCounters {
        photos_started: 3,
        ..Default::default()
    };
    assert_eq!(analysis_total(&counters, 2), 3);

    assert_eq!(analysis_total(&AnalysisCounters::default(), 2), 2);
}

/// 構造的に等しいスナップショットは差し替え不要と判定できる
#[test]
fn test_snapshot_structural_equality_for_replace_guard() {
    let prev = photos(&[PhotoStatus::Done, PhotoStatus::Extracting]);
    let next = photos(&[PhotoStatus::Done, PhotoStatus::Extracting]);
    assert_eq!(prev, next);

    let changed = photos(&[PhotoStatus::Done, PhotoStatus::Done]);
    assert_ne!(prev, changed);
}
