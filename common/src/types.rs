//! サーバーとやり取りする型定義
//!
//! ダッシュボードが扱うペイロード:
//! - SessionUser: ログイン/登録レスポンス
//! - Photo / PhotoStatus: 写真一覧とOCR処理ステータス
//! - AnalysisDetail / AnalysisStatus: LLM解析の写真別進捗
//! - AnalysisCounters / AnalysisProgress: 解析進捗ポーリングのペイロード
//! - AnalysisReport: /api/photos/analyze の最終結果

use serde::{Deserialize, Serialize};

/// ログイン中のユーザー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub email: String,
    pub user_id: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// 写真のOCR処理ステータス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    #[default]
    Uploaded,
    Received,
    Extracting,
    Processing,
    Done,
    Error,
}

impl PhotoStatus {
    /// 抽出が終端に達したか（done または error）
    pub fn is_terminal(&self) -> bool {
        matches!(self, PhotoStatus::Done | PhotoStatus::Error)
    }

    /// まだ抽出パイプラインの途中か
    pub fn is_active(&self) -> bool {
        matches!(self, PhotoStatus::Received | PhotoStatus::Extracting)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhotoStatus::Uploaded => "📤 アップロード済み",
            PhotoStatus::Received => "📨 受信済み",
            PhotoStatus::Extracting => "🔍 テキスト抽出中...",
            PhotoStatus::Processing => "⏳ 処理中...",
            PhotoStatus::Done => "✓ 完了",
            PhotoStatus::Error => "✗ エラー",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            PhotoStatus::Uploaded => "status-badge uploaded",
            PhotoStatus::Received => "status-badge received",
            PhotoStatus::Extracting => "status-badge extracting",
            PhotoStatus::Processing => "status-badge processing",
            PhotoStatus::Done => "status-badge done",
            PhotoStatus::Error => "status-badge error",
        }
    }
}

/// アップロード済み写真1件
///
/// 一覧APIとステータスポーリングAPIの両方で使う
/// （ポーリング側は size を返さないことがあるため default 付き）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    pub id: String,
    pub original_filename: String,
    pub size: u64,
    pub status: PhotoStatus,
    pub error_message: Option<String>,
}

/// LLM解析の写真別ステータス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Queued,
    Processing,
    SentToLlm,
    Finalizing,
    Completed,
    FallbackUsed,
    LlmFailed,
    Error,
}

impl AnalysisStatus {
    /// 解析が終端に達したか
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisStatus::Completed
                | AnalysisStatus::FallbackUsed
                | AnalysisStatus::LlmFailed
                | AnalysisStatus::Error
        )
    }

    /// 進捗率算出用の段階重み（0.0〜1.0）
    pub fn stage_weight(&self) -> f64 {
        match self {
            AnalysisStatus::Pending => 0.0,
            AnalysisStatus::Queued => 0.25,
            AnalysisStatus::Processing => 0.25,
            AnalysisStatus::SentToLlm => 0.5,
            AnalysisStatus::Finalizing => 0.75,
            AnalysisStatus::Completed
            | AnalysisStatus::FallbackUsed
            | AnalysisStatus::LlmFailed
            | AnalysisStatus::Error => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "⏸ 未処理",
            AnalysisStatus::Queued => "📋 待機列",
            AnalysisStatus::Processing => "⏳ 処理中...",
            AnalysisStatus::SentToLlm => "🤖 LLM送信済み",
            AnalysisStatus::Finalizing => "🧮 集計中...",
            AnalysisStatus::Completed => "✓ 解析済み",
            AnalysisStatus::FallbackUsed => "⚠ フォールバック",
            AnalysisStatus::LlmFailed => "✗ LLM失敗",
            AnalysisStatus::Error => "✗ エラー",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "analysis-status pending",
            AnalysisStatus::Queued => "analysis-status queued",
            AnalysisStatus::Processing => "analysis-status processing",
            AnalysisStatus::SentToLlm => "analysis-status sent",
            AnalysisStatus::Finalizing => "analysis-status finalizing",
            AnalysisStatus::Completed => "analysis-status completed",
            AnalysisStatus::FallbackUsed => "analysis-status fallback",
            AnalysisStatus::LlmFailed => "analysis-status failed",
            AnalysisStatus::Error => "analysis-status error",
        }
    }
}

/// 解析進捗の写真別明細（1回の解析実行のあいだだけ有効）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisDetail {
    pub id: String,
    pub filename: String,
    pub analysis_status: AnalysisStatus,
}

/// サーバー集計の解析カウンタ
///
/// 明細が届く前の進捗フォールバックに使う
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisCounters {
    pub photos_found: u32,
    pub photos_started: u32,
    pub photos_completed: u32,
    pub photos_failed: u32,
    pub photos_fallback: u32,
    pub photos_queued: u32,
}

impl AnalysisCounters {
    /// 処理し終えた件数（completed + failed + fallback）
    pub fn processed(&self) -> u32 {
        self.photos_completed + self.photos_failed + self.photos_fallback
    }
}

/// /api/photos/analysis-progress のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisProgress {
    pub photos: Vec<AnalysisDetail>,
    pub counters: AnalysisCounters,
}

/// /api/photos/analyze の最終結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisReport {
    pub summary: Option<String>,
    /// 最終resultJson（user/admin構造）。形はサーバー都合で揺れるためValueのまま持つ
    pub details: Option<serde_json::Value>,
    /// 最終確定カウンタ。存在すればポーリング中間値より優先する
    pub progress: Option<AnalysisCounters>,
    pub analyzed_photos: u32,
}

impl AnalysisReport {
    /// ユーザー向けサマリー文
    ///
    /// summary → details.user.short_summary → details.short_summary の順で探す
    pub fn short_summary(&self) -> String {
        if let Some(s) = self.summary.as_ref().filter(|s| !s.is_empty()) {
            return s.clone();
        }

        let Some(details) = &self.details else {
            return String::new();
        };

        details
            .pointer("/user/short_summary")
            .or_else(|| details.pointer("/short_summary"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_default()
    }
}
