//! セッション管理
//!
//! ログイン中ユーザーを明示的なセッションオブジェクトとして持ち、
//! localStorage への読み書きはこのモジュールに閉じる。
//! 起動時に復元し、ログイン/ログアウトで書き換える

use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use leptos::prelude::*;
use photo_audit_common::SessionUser;

/// localStorage のキー
const STORAGE_KEY: &str = "photo-audit.user";

/// アプリ全体で共有するセッション
#[derive(Clone, Copy)]
pub struct Session {
    user: RwSignal<Option<SessionUser>>,
}

impl Session {
    /// 保存済みユーザーを復元してセッションを作る（起動時に1回）
    pub fn load() -> Self {
        let stored = LocalStorage::get::<SessionUser>(STORAGE_KEY).ok();
        Session {
            user: RwSignal::new(stored),
        }
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.user.get()
    }

    /// ログイン成功: state と localStorage の両方へ書く
    pub fn login(&self, user: SessionUser) {
        if let Err(e) = LocalStorage::set(STORAGE_KEY, &user) {
            console::error!(format!("セッションの保存失敗: {}", e));
        }
        self.user.set(Some(user));
    }

    /// ログアウト: state と localStorage の両方から消す
    pub fn logout(&self) {
        LocalStorage::delete(STORAGE_KEY);
        self.user.set(None);
    }
}

/// コンテキストからセッションを取得する
pub fn use_session() -> Session {
    expect_context::<Session>()
}
