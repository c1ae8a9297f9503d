//! 長時間ジョブのポーラー
//!
//! 抽出（OCR）と解析（LLM）はそれぞれ独立したタイマーで進捗を
//! 取得する。同時に存在するタイマーは各1本まで

pub mod analysis;
pub mod extraction;

/// ブラウザのalertでユーザーへ通知する
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
