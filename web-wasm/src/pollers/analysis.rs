//! LLM解析ジョブのポーラー
//!
//! 本体の /api/photos/analyze は長時間走ることがあるため、
//! 2秒間隔の進捗ポーリングを並走させて中間状態を見せる。
//! 本体レスポンスとポーリングは独立に競走し、complete/error の
//! 終端フェーズは後続のポーリングで上書きしない

use gloo::console;
use gloo::timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_audit_common::{
    analysis_percentage, analysis_total, next_phase, AnalysisCounters, AnalysisDetail,
    AnalysisPhase, AnalysisReport, ApiError,
};

use crate::api;
use crate::pollers::alert;

/// 進捗ポーリングの間隔
const PROGRESS_POLL_INTERVAL_MS: u32 = 2_000;

/// 解析ジョブを完走させるコントローラ
#[derive(Clone, Copy)]
pub struct AnalysisPoller {
    user_id: StoredValue<String>,
    /// start() の再入ガード。実行中の二度目の開始は無視する
    pub analyzing: RwSignal<bool>,
    pub show_modal: RwSignal<bool>,
    pub phase: RwSignal<AnalysisPhase>,
    pub details: RwSignal<Vec<AnalysisDetail>>,
    pub counters: RwSignal<AnalysisCounters>,
    pub report: RwSignal<Option<AnalysisReport>>,
    pub show_report: RwSignal<bool>,
    interval: StoredValue<Option<Interval>, LocalStorage>,
}

impl AnalysisPoller {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id: StoredValue::new(user_id),
            analyzing: RwSignal::new(false),
            show_modal: RwSignal::new(false),
            phase: RwSignal::new(AnalysisPhase::Idle),
            details: RwSignal::new(Vec::new()),
            counters: RwSignal::new(AnalysisCounters::default()),
            report: RwSignal::new(None),
            show_report: RwSignal::new(false),
            interval: StoredValue::new_local(None),
        }
    }

    /// 解析を開始する。実行中なら何もしない
    pub fn start(self) {
        if self.analyzing.get_untracked() {
            console::log!("解析は実行中のため開始要求を無視");
            return;
        }

        // 前回実行の残りをすべて初期化してから走らせる
        self.analyzing.set(true);
        self.show_modal.set(true);
        self.report.set(None);
        self.show_report.set(false);
        self.phase.set(AnalysisPhase::Analyzing);
        self.details.set(Vec::new());
        self.counters.set(AnalysisCounters::default());

        self.begin_progress_polling();

        spawn_local(async move {
            let Some(user_id) = self.user_id.try_get_value() else {
                return;
            };
            let result = api::run_analysis(&user_id).await;
            self.finish(result);
        });
    }

    /// 即時に1回取得し、以後は一定間隔でポーリングする
    fn begin_progress_polling(self) {
        let interval = Interval::new(PROGRESS_POLL_INTERVAL_MS, move || {
            spawn_local(async move { self.progress_tick().await });
        });
        let _ = self.interval.try_update_value(|slot| {
            *slot = Some(interval);
        });
        spawn_local(async move { self.progress_tick().await });
    }

    /// タイマーを無条件に止める（teardown時にも呼ぶ）
    pub fn stop(self) {
        let _ = self.interval.try_update_value(|slot| {
            slot.take();
        });
    }

    fn stopped(self) -> bool {
        self.interval
            .try_with_value(|slot| slot.is_none())
            .unwrap_or(true)
    }

    async fn progress_tick(self) {
        if self.stopped() {
            return;
        }
        let Some(user_id) = self.user_id.try_get_value() else {
            return;
        };

        match api::fetch_analysis_progress(&user_id).await {
            Ok(progress) => {
                // 本体レスポンス処理後に遅れて届いた分は反映しない
                if self.stopped() {
                    return;
                }
                let counters = progress.counters;
                self.details.set(progress.photos);
                self.counters.set(counters);
                self.phase.update(|phase| *phase = next_phase(*phase, &counters));
            }
            // 一時的な失敗ではポーリングを止めない。この回はスキップ
            Err(e) => console::error!(format!("解析進捗の取得失敗: {}", e)),
        }
    }

    /// 本体レスポンスの反映
    fn finish(self, result: Result<AnalysisReport, ApiError>) {
        // teardown済みなら捨てる
        if self.stopped() {
            return;
        }
        self.stop();

        match result {
            Ok(report) => {
                // 最終カウンタがあれば中間値を上書きして正とする
                if let Some(final_counters) = report.progress {
                    self.counters.set(final_counters);
                }
                self.report.set(Some(report));
                self.show_report.set(true);
                self.phase.set(AnalysisPhase::Complete);
                self.show_modal.set(false);
            }
            Err(e) => {
                self.phase.set(AnalysisPhase::Error);
                self.show_modal.set(false);
                alert(&error_message(&e));
            }
        }
        self.analyzing.set(false);
    }

    /// 解析関連の状態を初期化する（写真の全削除時に呼ぶ）
    pub fn reset(self) {
        let _ = self.report.try_set(None);
        let _ = self.show_report.try_set(false);
        let _ = self.phase.try_set(AnalysisPhase::Idle);
        let _ = self.details.try_set(Vec::new());
        let _ = self.counters.try_set(AnalysisCounters::default());
    }

    /// 表示用の進捗率
    pub fn percentage(&self) -> u8 {
        self.details
            .with(|details| self.counters.with(|counters| analysis_percentage(details, counters)))
    }

    /// 表示用の（処理済み, 総数）
    pub fn processed_and_total(&self) -> (u32, u32) {
        let counters = self.counters.get();
        let total = self.details.with(|details| analysis_total(&counters, details.len()));
        (counters.processed(), total)
    }
}

/// 解析失敗時のユーザー向けメッセージ
///
/// 429は一時的な「待ち」として案内し、OCRテキスト不足の400は
/// 先に抽出を促す文言に切り替える
fn error_message(e: &ApiError) -> String {
    if e.is_busy() {
        format!("しばらくお待ちください: {}", e)
    } else if e.is_missing_ocr_text() {
        "抽出済みテキストのある写真が見つかりません。先に「抽出」で写真を処理してから解析してください。"
            .to_string()
    } else {
        format!("解析に失敗しました: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_busy() {
        let e = ApiError::Server {
            status: 429,
            message: "Analysis already in progress".to_string(),
        };
        let message = error_message(&e);
        assert!(message.starts_with("しばらくお待ちください"));
        assert!(message.contains("Analysis already in progress"));
    }

    #[test]
    fn test_error_message_missing_ocr_text() {
        let e = ApiError::Server {
            status: 400,
            message: "No photos with completed OCR text found".to_string(),
        };
        let message = error_message(&e);
        assert!(message.contains("先に「抽出」"));
    }

    #[test]
    fn test_error_message_generic_400_keeps_server_text() {
        let e = ApiError::Server {
            status: 400,
            message: "Bad request".to_string(),
        };
        let message = error_message(&e);
        assert!(message.starts_with("解析に失敗しました"));
        assert!(message.contains("Bad request"));
    }

    #[test]
    fn test_error_message_network() {
        let e = ApiError::Network("Failed to fetch".to_string());
        assert!(error_message(&e).contains("Network error: Failed to fetch"));
    }
}
