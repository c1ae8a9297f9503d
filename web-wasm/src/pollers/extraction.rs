//! OCR抽出ジョブのポーラー
//!
//! idle → requesting → polling → idle。
//! 「処理開始」が202で受理されたら一定間隔でステータスを取得し、
//! 全件が終端（done/error）かつ処理中（received/extracting）が
//! 無くなったところで止まる

use gloo::console;
use gloo::timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_audit_common::{extraction_finished, extraction_percentage, Photo};

use crate::api;
use crate::pollers::alert;

/// ステータスポーリングの間隔
const POLL_INTERVAL_MS: u32 = 1_500;

/// 抽出ジョブを完走させるコントローラ
///
/// タイマーと表示状態を一箇所で持ち、タイマーコールバックには
/// このオブジェクトごと渡す（古い状態を掴ませない）
#[derive(Clone, Copy)]
pub struct ExtractionPoller {
    user_id: StoredValue<String>,
    on_complete: Callback<()>,
    /// 開始要求からポーリング終了まで true
    pub processing: RwSignal<bool>,
    pub show_modal: RwSignal<bool>,
    /// 直近のステータススナップショット
    pub snapshot: RwSignal<Vec<Photo>>,
    interval: StoredValue<Option<Interval>, LocalStorage>,
}

impl ExtractionPoller {
    pub fn new(user_id: String, on_complete: Callback<()>) -> Self {
        Self {
            user_id: StoredValue::new(user_id),
            on_complete,
            processing: RwSignal::new(false),
            show_modal: RwSignal::new(false),
            snapshot: RwSignal::new(Vec::new()),
            interval: StoredValue::new_local(None),
        }
    }

    /// 全写真のOCR処理を開始する
    ///
    /// 202以外はエラーを表示して idle に戻る（ポーリングしない）
    pub fn start(self) {
        self.processing.set(true);
        self.show_modal.set(true);
        self.snapshot.set(Vec::new());

        spawn_local(async move {
            let Some(user_id) = self.user_id.try_get_value() else {
                return;
            };
            match api::start_extraction(&user_id).await {
                Ok(()) => self.begin_polling(),
                Err(e) => {
                    alert(&e.to_string());
                    let _ = self.processing.try_set(false);
                    let _ = self.show_modal.try_set(false);
                }
            }
        });
    }

    /// 即時に1回取得し、以後は一定間隔でポーリングする
    fn begin_polling(self) {
        let interval = Interval::new(POLL_INTERVAL_MS, move || {
            spawn_local(async move { self.poll_tick().await });
        });
        let _ = self.interval.try_update_value(|slot| {
            *slot = Some(interval);
        });
        spawn_local(async move { self.poll_tick().await });
    }

    /// タイマーを無条件に止める（teardown時にも呼ぶ）
    pub fn stop(self) {
        let _ = self.interval.try_update_value(|slot| {
            // Drop でインターバルは解除される
            slot.take();
        });
    }

    /// 停止済み（またはアンマウント済み）か
    fn stopped(self) -> bool {
        self.interval
            .try_with_value(|slot| slot.is_none())
            .unwrap_or(true)
    }

    async fn poll_tick(self) {
        if self.stopped() {
            return;
        }
        let Some(user_id) = self.user_id.try_get_value() else {
            return;
        };

        match api::fetch_extraction_status(&user_id).await {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            // 一時的な失敗ではポーリングを止めない。この回はスキップ
            Err(e) => console::error!(format!("ステータス取得失敗: {}", e)),
        }
    }

    fn apply_snapshot(self, snapshot: Vec<Photo>) {
        // 停止後に遅れて届いたレスポンスは反映しない
        if self.stopped() {
            return;
        }

        // 変化があるときだけ差し替える（構造比較。無駄な再描画を避ける）
        if self.snapshot.with_untracked(|prev| *prev != snapshot) {
            self.snapshot.set(snapshot.clone());
        }

        if extraction_finished(&snapshot) {
            self.stop();
            self.processing.set(false);
            self.show_modal.set(false);
            self.on_complete.run(());
        }
    }

    /// 表示用の進捗率
    pub fn percentage(&self) -> u8 {
        self.snapshot.with(|snapshot| extraction_percentage(snapshot))
    }
}
