//! 解析進捗モーダル
//!
//! 進捗バーに加え、カウンタと写真別明細から導いた
//! 一行メモ（現在の段階）を表示する

use leptos::prelude::*;
use photo_audit_common::{AnalysisCounters, AnalysisDetail, AnalysisPhase, AnalysisStatus};

use crate::components::progress_bar::ProgressBar;
use crate::pollers::analysis::AnalysisPoller;

/// カウンタと明細から進捗の一行メモを作る
fn progress_note(
    details: &[AnalysisDetail],
    counters: &AnalysisCounters,
    phase: AnalysisPhase,
) -> String {
    let processed = counters.processed();

    let total = if !details.is_empty() {
        details.len() as u32
    } else if counters.photos_started > 0 {
        counters.photos_started
    } else {
        counters.photos_found
    };
    if total == 0 {
        return "開始しています…".to_string();
    }

    let statuses: Vec<AnalysisStatus> = details.iter().map(|d| d.analysis_status).collect();
    let terminal = statuses.iter().filter(|s| s.is_terminal()).count() as u32;
    let in_flight = statuses
        .iter()
        .filter(|s| {
            matches!(
                s,
                AnalysisStatus::Queued
                    | AnalysisStatus::Processing
                    | AnalysisStatus::SentToLlm
                    | AnalysisStatus::Finalizing
            )
        })
        .count() as u32;
    let active = if statuses.is_empty() {
        processed
    } else {
        terminal + in_flight
    };

    let finalizing = phase == AnalysisPhase::Finalizing
        || statuses.contains(&AnalysisStatus::Finalizing)
        || (counters.photos_started > 0 && processed >= counters.photos_started);

    if finalizing {
        return format!("結果を集計中… ({}/{})", active, total);
    }

    let stage = if statuses.contains(&AnalysisStatus::SentToLlm) {
        "LLM送信済み"
    } else if statuses.contains(&AnalysisStatus::Processing) {
        "処理中"
    } else if statuses.contains(&AnalysisStatus::Queued) {
        "待機列"
    } else if counters.photos_started > 0 {
        "処理中"
    } else {
        "開始しています"
    };

    format!(
        "{} ・ {}/{} ・ 完了: {} ・ フォールバック: {} ・ 失敗: {}",
        stage, active, total, counters.photos_completed, counters.photos_fallback, counters.photos_failed
    )
}

#[component]
pub fn AnalysisModal(poller: AnalysisPoller) -> impl IntoView {
    view! {
        <Show when=move || poller.show_modal.get()>
            <div class="processing-modal-overlay">
                <div class="processing-modal">
                    <h2>"解析を実行中"</h2>

                    <ProgressBar percent=Signal::derive(move || poller.percentage()) />

                    <div class="processing-modal-note">
                        "解析には時間がかかることがあります。写真ごとの進捗は下に表示されます"
                    </div>

                    <div class="processing-phase-note">
                        {move || {
                            poller
                                .details
                                .with(|details| {
                                    poller
                                        .counters
                                        .with(|counters| {
                                            progress_note(details, counters, poller.phase.get())
                                        })
                                })
                        }}
                    </div>

                    <div class="processing-status-list">
                        <For
                            each=move || {
                                poller.details.get().into_iter().enumerate().collect::<Vec<_>>()
                            }
                            key=|(index, detail): &(usize, AnalysisDetail)| {
                                if detail.id.is_empty() {
                                    format!("idx-{}", index)
                                } else {
                                    detail.id.clone()
                                }
                            }
                            children=|(index, detail): (usize, AnalysisDetail)| {
                                let filename = if detail.filename.is_empty() {
                                    format!("写真 {}", index + 1)
                                } else {
                                    detail.filename.clone()
                                };
                                let badge_class = detail.analysis_status.badge_class();
                                let label = detail.analysis_status.label();
                                view! {
                                    <div class="processing-status-item">
                                        <span class="status-filename">
                                            {format!("写真 {}: {}", index + 1, filename)}
                                        </span>
                                        <span class=badge_class>{label}</span>
                                    </div>
                                }
                            }
                        />
                        <Show when=move || poller.details.with(|d| d.is_empty())>
                            <div class="processing-status-empty">"解析の進捗を待っています…"</div>
                        </Show>
                    </div>
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(status: AnalysisStatus) -> AnalysisDetail {
        AnalysisDetail {
            id: "p".to_string(),
            filename: "a.jpg".to_string(),
            analysis_status: status,
        }
    }

    #[test]
    fn test_progress_note_before_start() {
        let note = progress_note(&[], &AnalysisCounters::default(), AnalysisPhase::Analyzing);
        assert_eq!(note, "開始しています…");
    }

    #[test]
    fn test_progress_note_counters_only() {
        // 明細が届く前はカウンタベース
        let counters = AnalysisCounters {
            photos_started: 3,
            photos_completed: 1,
            ..Default::default()
        };
        let note = progress_note(&[], &counters, AnalysisPhase::Analyzing);
        assert!(note.starts_with("処理中"));
        assert!(note.contains("1/3"));
        assert!(note.contains("完了: 1"));
    }

    #[test]
    fn test_progress_note_stage_from_details() {
        let counters = AnalysisCounters {
            photos_started: 2,
            ..Default::default()
        };
        let details = vec![
            detail(AnalysisStatus::SentToLlm),
            detail(AnalysisStatus::Pending),
        ];
        let note = progress_note(&details, &counters, AnalysisPhase::Analyzing);
        assert!(note.starts_with("LLM送信済み"));
        assert!(note.contains("1/2"));
    }

    #[test]
    fn test_progress_note_finalizing_when_all_processed() {
        let counters = AnalysisCounters {
            photos_started: 2,
            photos_completed: 2,
            ..Default::default()
        };
        let note = progress_note(&[], &counters, AnalysisPhase::Analyzing);
        assert!(note.starts_with("結果を集計中"));
        assert!(note.contains("2/2"));
    }

    #[test]
    fn test_progress_note_finalizing_from_phase() {
        let counters = AnalysisCounters {
            photos_started: 2,
            photos_completed: 1,
            ..Default::default()
        };
        let note = progress_note(&[], &counters, AnalysisPhase::Finalizing);
        assert!(note.starts_with("結果を集計中"));
    }
}
