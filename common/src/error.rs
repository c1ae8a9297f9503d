//! APIエラー型定義

use thiserror::Error;

/// バックエンドAPI呼び出しのエラー
///
/// 分類はUI側の扱いに対応する:
/// - Validation: リクエスト送信前にクライアント側で弾く
/// - Network: fetch自体が失敗した（接続不可など）
/// - Server: サーバーが返した `{error}`。メッセージはそのまま表示する
/// - InvalidResponse: JSONを期待したのに解釈できない本文
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid response from server (status: {status})")]
    InvalidResponse { status: u16, body: String },
}

impl ApiError {
    /// HTTPステータスコード（サーバーレスポンス由来のときのみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::InvalidResponse { status, .. } => {
                Some(*status)
            }
            ApiError::Validation(_) | ApiError::Network(_) => None,
        }
    }

    /// 解析が既にサーバー側で実行中（429）
    pub fn is_busy(&self) -> bool {
        self.status() == Some(429)
    }

    /// OCRテキストが無いため解析できない（400 + 既知のメッセージ）
    pub fn is_missing_ocr_text(&self) -> bool {
        match self {
            ApiError::Server { status: 400, message } => {
                message.contains("No photos with completed OCR")
            }
            _ => false,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display_is_verbatim() {
        let error = ApiError::Server {
            status: 400,
            message: "Geen foto's om te verwerken".to_string(),
        };
        assert_eq!(format!("{}", error), "Geen foto's om te verwerken");
    }

    #[test]
    fn test_network_error_display() {
        let error = ApiError::Network("Failed to fetch".to_string());
        assert_eq!(format!("{}", error), "Network error: Failed to fetch");
    }

    #[test]
    fn test_invalid_response_display_omits_body() {
        // 本文はログ用に保持するが、表示には載せない
        let error = ApiError::InvalidResponse {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("502"));
        assert!(!display.contains("Bad Gateway"));
    }

    #[test]
    fn test_is_busy() {
        let busy = ApiError::Server {
            status: 429,
            message: "Analysis already in progress".to_string(),
        };
        assert!(busy.is_busy());

        let other = ApiError::Server {
            status: 400,
            message: "Analysis already in progress".to_string(),
        };
        assert!(!other.is_busy());
        assert!(!ApiError::Network("x".into()).is_busy());
    }

    #[test]
    fn test_is_missing_ocr_text() {
        let missing = ApiError::Server {
            status: 400,
            message: "No photos with completed OCR text found".to_string(),
        };
        assert!(missing.is_missing_ocr_text());

        // 同じ文言でもステータスが違えば別物
        let wrong_status = ApiError::Server {
            status: 500,
            message: "No photos with completed OCR text found".to_string(),
        };
        assert!(!wrong_status.is_missing_ocr_text());

        let generic = ApiError::Server {
            status: 400,
            message: "Bad request".to_string(),
        };
        assert!(!generic.is_missing_ocr_text());
    }

    #[test]
    fn test_status() {
        assert_eq!(ApiError::Validation("x".into()).status(), None);
        assert_eq!(ApiError::Network("x".into()).status(), None);
        assert_eq!(
            ApiError::Server {
                status: 403,
                message: "Forbidden".into()
            }
            .status(),
            Some(403)
        );
    }
}
