//! バックエンドAPIクライアント
//!
//! すべての呼び出しは X-User-Id ヘッダで利用者を識別する。
//! 非2xxは `{error}` 本文を読んでメッセージをそのまま伝播し、
//! JSONとして読めない本文は InvalidResponse に変換する。
//! 自動リトライはしない（再試行は常に利用者の明示操作）

use photo_audit_common::{
    AdminStats, AnalysisProgress, AnalysisReport, ApiError, Photo, SessionUser,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FormData, Request, RequestInit, Response};

/// APIのベースURL（空 = 同一オリジン）
const API_BASE: &str = "";

/// ログインリクエスト
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// 登録リクエスト
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    confirm_password: &'a str,
    is_admin: bool,
}

/// /api/me のレスポンス
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Me {
    pub is_admin: bool,
}

/// 写真一覧系レスポンスの共通形
#[derive(Default, Deserialize)]
#[serde(default)]
struct PhotosEnvelope {
    photos: Vec<Photo>,
}

/// エラーレスポンスの本文
#[derive(Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

fn to_network_error(value: JsValue) -> ApiError {
    ApiError::Network(js_message(&value))
}

/// ログ・エラー表示用に本文を先頭200文字へ切り詰める
fn snippet(text: &str) -> String {
    match text.char_indices().nth(200) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn new_request(
    method: &str,
    path: &str,
    opts: &RequestInit,
    user_id: Option<&str>,
) -> Result<Request, ApiError> {
    let url = format!("{}{}", API_BASE, path);
    opts.set_method(method);

    let request = Request::new_with_str_and_init(&url, opts).map_err(to_network_error)?;
    if let Some(user_id) = user_id {
        request
            .headers()
            .set("X-User-Id", user_id)
            .map_err(to_network_error)?;
    }
    Ok(request)
}

async fn send(request: Request) -> Result<Response, ApiError> {
    let window = web_sys::window().unwrap();
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(to_network_error)?;
    resp_value
        .dyn_into::<Response>()
        .map_err(to_network_error)
}

async fn get(path: &str, user_id: &str) -> Result<Response, ApiError> {
    let opts = RequestInit::new();
    let request = new_request("GET", path, &opts, Some(user_id))?;
    send(request).await
}

async fn post_empty(path: &str, user_id: &str) -> Result<Response, ApiError> {
    let opts = RequestInit::new();
    let request = new_request("POST", path, &opts, Some(user_id))?;
    send(request).await
}

async fn post_json(path: &str, user_id: Option<&str>, body: &str) -> Result<Response, ApiError> {
    let opts = RequestInit::new();
    opts.set_body(&JsValue::from_str(body));

    let request = new_request("POST", path, &opts, user_id)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(to_network_error)?;
    send(request).await
}

/// 2xxレスポンスのJSON本文をデシリアライズする
async fn json_response<T: serde::de::DeserializeOwned>(resp: &Response) -> Result<T, ApiError> {
    let status = resp.status();
    let invalid = |body: String| ApiError::InvalidResponse { status, body };

    let promise = resp.json().map_err(|_| invalid(String::new()))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|_| invalid(String::new()))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| invalid(snippet(&e.to_string())))
}

/// 非2xxレスポンスをApiErrorへ変換する
///
/// `{error}` があればメッセージをそのまま使い、JSONでなければ
/// InvalidResponse、errorフィールドが無ければ fallback を使う
async fn error_body(resp: &Response, fallback: &str) -> ApiError {
    let status = resp.status();

    let text = match resp.text() {
        Ok(promise) => match JsFuture::from(promise).await {
            Ok(value) => value.as_string().unwrap_or_default(),
            Err(e) => return to_network_error(e),
        },
        Err(e) => return to_network_error(e),
    };

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ApiError::Server {
            status,
            message: body.error.unwrap_or_else(|| fallback.to_string()),
        },
        Err(_) => ApiError::InvalidResponse {
            status,
            body: snippet(&text),
        },
    }
}

/// ログイン
pub async fn login(email: &str, password: &str) -> Result<SessionUser, ApiError> {
    let body = serde_json::to_string(&LoginRequest { email, password })
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let resp = post_json("/api/login", None, &body).await?;

    if resp.ok() {
        json_response(&resp).await
    } else {
        Err(error_body(&resp, "Login failed").await)
    }
}

/// アカウント登録
pub async fn register(
    email: &str,
    password: &str,
    confirm_password: &str,
    is_admin: bool,
) -> Result<SessionUser, ApiError> {
    let body = serde_json::to_string(&RegisterRequest {
        email,
        password,
        confirm_password,
        is_admin,
    })
    .map_err(|e| ApiError::Validation(e.to_string()))?;
    let resp = post_json("/api/register", None, &body).await?;

    if resp.ok() {
        json_response(&resp).await
    } else {
        Err(error_body(&resp, "Registration failed").await)
    }
}

/// 本人確認（管理者フラグの検証に使う）
pub async fn fetch_me(user_id: &str) -> Result<Me, ApiError> {
    let resp = get("/api/me", user_id).await?;

    if resp.ok() {
        json_response(&resp).await
    } else {
        Err(error_body(&resp, "Admin verification failed").await)
    }
}

/// 写真一覧
pub async fn fetch_photos(user_id: &str) -> Result<Vec<Photo>, ApiError> {
    let resp = get("/api/photos", user_id).await?;

    if resp.ok() {
        let envelope: PhotosEnvelope = json_response(&resp).await?;
        Ok(envelope.photos)
    } else {
        Err(error_body(&resp, "Failed to fetch photos").await)
    }
}

/// 写真のアップロード（multipart）
pub async fn upload_photos(
    user_id: &str,
    files: &[File],
    location_opt_in: bool,
) -> Result<(), ApiError> {
    let form = FormData::new().map_err(to_network_error)?;
    for file in files {
        form.append_with_blob_and_filename("files", file, &file.name())
            .map_err(to_network_error)?;
    }
    form.append_with_str("locationOptIn", if location_opt_in { "true" } else { "false" })
        .map_err(to_network_error)?;

    let opts = RequestInit::new();
    // Content-Typeはブラウザに任せる（boundary付きで設定される）
    opts.set_body(form.as_ref());
    let request = new_request("POST", "/api/photos", &opts, Some(user_id))?;
    let resp = send(request).await?;

    if resp.ok() {
        return Ok(());
    }
    Err(error_body(&resp, "Upload failed").await)
}

/// 全写真の削除
pub async fn clear_photos(user_id: &str) -> Result<(), ApiError> {
    let opts = RequestInit::new();
    let request = new_request("DELETE", "/api/photos", &opts, Some(user_id))?;
    let resp = send(request).await?;

    if resp.ok() {
        Ok(())
    } else {
        Err(error_body(&resp, "Unknown error").await)
    }
}

/// 写真1件のバイナリ取得
pub async fn fetch_photo_blob(user_id: &str, photo_id: &str) -> Result<Blob, ApiError> {
    let resp = get(&format!("/api/photos/{}/file", photo_id), user_id).await?;
    if !resp.ok() {
        return Err(error_body(&resp, "Failed to fetch image").await);
    }

    let blob = JsFuture::from(resp.blob().map_err(to_network_error)?)
        .await
        .map_err(to_network_error)?;
    blob.dyn_into::<Blob>().map_err(to_network_error)
}

/// 全写真のOCR処理を開始する
///
/// 非同期ジョブの受理は202のみ成功。それ以外はエラーとして扱う
pub async fn start_extraction(user_id: &str) -> Result<(), ApiError> {
    let resp = post_empty("/api/photos/process-all", user_id).await?;

    if resp.status() == 202 {
        Ok(())
    } else {
        Err(error_body(&resp, "Processing failed").await)
    }
}

/// OCR処理ステータスのポーリング
pub async fn fetch_extraction_status(user_id: &str) -> Result<Vec<Photo>, ApiError> {
    let resp = get("/api/photos/status", user_id).await?;

    if resp.ok() {
        let envelope: PhotosEnvelope = json_response(&resp).await?;
        Ok(envelope.photos)
    } else {
        Err(error_body(&resp, "Failed to retrieve photos status").await)
    }
}

/// LLM解析の実行（長時間かかることがある）
pub async fn run_analysis(user_id: &str) -> Result<AnalysisReport, ApiError> {
    let resp = post_empty("/api/photos/analyze", user_id).await?;

    if resp.ok() {
        json_response(&resp).await
    } else {
        Err(error_body(&resp, "Unknown error").await)
    }
}

/// 解析進捗のポーリング
pub async fn fetch_analysis_progress(user_id: &str) -> Result<AnalysisProgress, ApiError> {
    let resp = get("/api/photos/analysis-progress", user_id).await?;

    if resp.ok() {
        json_response(&resp).await
    } else {
        Err(error_body(&resp, "Failed to fetch analysis progress").await)
    }
}

/// 管理者向け集計統計
pub async fn fetch_admin_stats(user_id: &str) -> Result<AdminStats, ApiError> {
    let resp = get("/api/admin/stats", user_id).await?;

    if resp.ok() {
        json_response(&resp).await
    } else {
        Err(error_body(&resp, "Failed to fetch admin statistics").await)
    }
}
