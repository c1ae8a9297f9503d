//! 写真ストア
//!
//! アップロード済み写真の一覧と、写真ごとの画像ハンドル
//! （オブジェクトURL）を一括で持つコントローラ。
//! ハンドルは作成が冪等（キャッシュ済みなら再fetchしない）で、
//! 全削除と画面破棄のタイミングで必ず解放する

use std::collections::HashMap;

use futures::future::join_all;
use gloo::console;
use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_audit_common::{ApiError, Photo, PhotoStatus};
use web_sys::{File, Url};

use crate::api;

#[derive(Clone, Copy)]
pub struct PhotoStore {
    user_id: StoredValue<String>,
    /// アップロード前の選択ファイル
    pub files: RwSignal<Vec<File>, LocalStorage>,
    pub uploading: RwSignal<bool>,
    /// 直近のアップロード失敗（インライン表示用）
    pub upload_error: RwSignal<Option<ApiError>>,
    pub photos: RwSignal<Vec<Photo>>,
    pub loading: RwSignal<bool>,
    /// photoId → オブジェクトURL
    image_urls: RwSignal<HashMap<String, String>>,
    pub location_opt_in: RwSignal<bool>,
}

impl PhotoStore {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id: StoredValue::new(user_id),
            files: RwSignal::new_local(Vec::new()),
            uploading: RwSignal::new(false),
            upload_error: RwSignal::new(None),
            photos: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
            image_urls: RwSignal::new(HashMap::new()),
            location_opt_in: RwSignal::new(false),
        }
    }

    /// 写真一覧をサーバーのスナップショットで置き換える
    pub fn fetch_photos(self) {
        spawn_local(async move { self.fetch_photos_async().await });
    }

    async fn fetch_photos_async(self) {
        // アンマウント後に走り出した場合は何もしない
        let Some(user_id) = self.user_id.try_get_value() else {
            return;
        };
        let _ = self.loading.try_set(true);

        match api::fetch_photos(&user_id).await {
            Ok(list) => {
                // 構造比較して変化があるときだけ差し替える（無駄な再描画を避ける）
                if self.photos.try_with_untracked(|prev| *prev != list) == Some(true) {
                    let _ = self.photos.try_set(list.clone());
                }

                // ハンドルの無い写真のバイナリをまとめて先読みする
                let missing: Vec<String> = self
                    .image_urls
                    .try_with_untracked(|urls| {
                        list.iter()
                            .filter(|p| !urls.contains_key(&p.id))
                            .map(|p| p.id.clone())
                            .collect()
                    })
                    .unwrap_or_default();
                join_all(missing.into_iter().map(|id| self.fetch_image_blob(id))).await;
            }
            Err(e) => console::error!(format!("写真一覧の取得失敗: {}", e)),
        }

        let _ = self.loading.try_set(false);
    }

    /// 写真1件のバイナリを取得してオブジェクトURLを作る
    ///
    /// 既にハンドルがあれば何もしない。非200は何もキャッシュしない
    pub async fn fetch_image_blob(self, photo_id: String) {
        let Some(user_id) = self.user_id.try_get_value() else {
            return;
        };
        let cached = self
            .image_urls
            .try_with_untracked(|urls| urls.contains_key(&photo_id));
        if cached != Some(false) {
            return;
        }

        match api::fetch_photo_blob(&user_id, &photo_id).await {
            Ok(blob) => match Url::create_object_url_with_blob(&blob) {
                Ok(url) => {
                    let inserted = self
                        .image_urls
                        .try_update(|urls| {
                            urls.insert(photo_id.clone(), url.clone());
                        })
                        .is_some();
                    // 破棄後に届いた分は保持先が無いので即座に失効させる
                    if !inserted {
                        let _ = Url::revoke_object_url(&url);
                    }
                }
                Err(e) => console::error!(format!("オブジェクトURLの作成失敗: {:?}", e)),
            },
            Err(e) => console::error!(format!("画像の取得失敗: {}", e)),
        }
    }

    /// ファイル選択を置き換える
    pub fn set_selection(self, files: Vec<File>) {
        self.files.set(files);
        self.upload_error.set(None);
    }

    /// 選択へ追加する（ドラッグ&ドロップ用）
    pub fn add_to_selection(self, files: Vec<File>) {
        if files.is_empty() {
            return;
        }
        self.files.update(|list| list.extend(files));
        self.upload_error.set(None);
    }

    /// 選択を取り消す
    pub fn clear_selection(self) {
        self.files.set(Vec::new());
        self.upload_error.set(None);
    }

    /// 選択中ファイルをアップロードする
    ///
    /// ファイル未選択は送信前に弾く。成功したら選択をクリアして
    /// 一覧を取り直す。失敗はサーバーのメッセージをそのまま表示する
    pub fn upload(self) {
        let files = self.files.get_untracked();
        if files.is_empty() {
            self.upload_error.set(Some(ApiError::Validation(
                "ファイルを1つ以上選択してください".to_string(),
            )));
            return;
        }

        let user_id = self.user_id.get_value();
        let location_opt_in = self.location_opt_in.get_untracked();
        self.uploading.set(true);
        self.upload_error.set(None);

        spawn_local(async move {
            match api::upload_photos(&user_id, &files, location_opt_in).await {
                Ok(()) => {
                    let _ = self.files.try_set(Vec::new());
                    let _ = self.upload_error.try_set(None);
                    self.fetch_photos();
                }
                Err(e) => {
                    let _ = self.upload_error.try_set(Some(e));
                }
            }
            let _ = self.uploading.try_set(false);
        });
    }

    /// 全写真を削除し、キャッシュ済みハンドルを解放する
    ///
    /// 確認ダイアログは呼び出し側の責務（承諾済みのときだけ呼ぶこと）
    pub async fn clear_all(self) -> Result<(), ApiError> {
        let Some(user_id) = self.user_id.try_get_value() else {
            return Ok(());
        };
        api::clear_photos(&user_id).await?;
        self.release_image_urls();
        let _ = self.photos.try_set(Vec::new());
        Ok(())
    }

    /// オブジェクトURLをすべて失効させる（teardown時にも呼ぶ）
    pub fn release_image_urls(self) {
        let urls = self.image_urls.try_get_untracked().unwrap_or_default();
        for url in urls.values() {
            let _ = Url::revoke_object_url(url);
        }
        let _ = self.image_urls.try_set(HashMap::new());
    }

    /// 写真IDに対応するオブジェクトURL（未取得ならNone）
    pub fn image_url(&self, photo_id: &str) -> Option<String> {
        self.image_urls.with(|urls| urls.get(photo_id).cloned())
    }

    /// 全写真のOCRが done のときだけ解析できる
    pub fn can_analyze(&self) -> bool {
        self.photos.with(|photos| {
            !photos.is_empty() && photos.iter().all(|p| p.status == PhotoStatus::Done)
        })
    }
}
