//! ユーザーダッシュボード
//!
//! 写真ストアと2本のポーラーを組み立てる。抽出完了時の
//! 一覧リフレッシュと、teardown時のタイマー解除・ハンドル解放も
//! ここで配線する

use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_audit_common::SessionUser;

use crate::components::{
    analysis_modal::AnalysisModal, nav_bar::UserNav, photos_section::PhotosSection,
    processing_modal::ProcessingModal, upload_card::UploadCard,
};
use crate::photo_store::PhotoStore;
use crate::pollers::{alert, analysis::AnalysisPoller, extraction::ExtractionPoller};
use crate::session::use_session;

#[component]
pub fn Dashboard(user: SessionUser) -> impl IntoView {
    let session = use_session();

    let store = PhotoStore::new(user.user_id.clone());
    let extraction = ExtractionPoller::new(
        user.user_id.clone(),
        Callback::new(move |_| store.fetch_photos()),
    );
    let analysis = AnalysisPoller::new(user.user_id.clone());

    // 初回ロード
    store.fetch_photos();

    // teardown: タイマーは無条件に止め、画像ハンドルを解放する
    on_cleanup(move || {
        extraction.stop();
        analysis.stop();
        store.release_image_urls();
    });

    // 全削除は確認が取れたときだけリクエストを出す
    let on_clear_all = move |_| {
        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message("アップロード済みの写真をすべて削除しますか？")
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        spawn_local(async move {
            match store.clear_all().await {
                Ok(()) => analysis.reset(),
                Err(e) => alert(&format!("削除に失敗しました: {}", e)),
            }
        });
    };

    view! {
        <div class="dashboard">
            <ProcessingModal poller=extraction />
            <AnalysisModal poller=analysis />

            <UserNav email=user.email.clone() on_logout=move |_| session.logout() />

            <div class="dashboard-columns">
                <UploadCard store=store />
                <PhotosSection
                    store=store
                    extraction=extraction
                    analysis=analysis
                    on_clear_all=on_clear_all
                />
            </div>
        </div>
    }
}
