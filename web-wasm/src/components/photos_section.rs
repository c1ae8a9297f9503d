//! 写真一覧セクション
//!
//! サムネイル（キャッシュ済みオブジェクトURL）とOCRステータスを
//! 並べ、抽出・解析・全削除の操作を提供する

use leptos::prelude::*;

use crate::photo_store::PhotoStore;
use crate::pollers::{analysis::AnalysisPoller, extraction::ExtractionPoller};

#[component]
pub fn PhotosSection<FC>(
    store: PhotoStore,
    extraction: ExtractionPoller,
    analysis: AnalysisPoller,
    on_clear_all: FC,
) -> impl IntoView
where
    FC: Fn(()) + 'static + Clone,
{
    let has_photos = move || store.photos.with(|photos| !photos.is_empty());
    let can_analyze = move || store.can_analyze();

    view! {
        <div class="photos-section">
            <h2>{move || format!("アップロード済みの写真 ({})", store.photos.with(|p| p.len()))}</h2>

            <Show
                when=move || !store.loading.get()
                fallback=|| view! { <div class="loading-photos">"読み込み中..."</div> }
            >
                <Show
                    when=has_photos
                    fallback=|| view! { <div class="no-photos">"写真はまだありません"</div> }
                >
                    <div class="photos-grid">
                        <For
                            each=move || store.photos.get()
                            key=|photo| photo.id.clone()
                            children=move |photo| {
                                let photo_id = photo.id.clone();
                                let filename = photo.original_filename.clone();
                                let thumbnail = move || match store.image_url(&photo_id) {
                                    Some(url) => view! {
                                        <img class="photo-thumbnail" src=url alt=filename.clone() />
                                    }
                                        .into_any(),
                                    None => view! {
                                        <div class="photo-thumbnail-loading">"読み込み中..."</div>
                                    }
                                        .into_any(),
                                };

                                view! {
                                    <div class="photo-card">
                                        {thumbnail}
                                        <div class="photo-info">
                                            <div class="photo-filename">{photo.original_filename.clone()}</div>
                                            <div class="photo-size">
                                                {format!("{:.1} KB", photo.size as f64 / 1024.0)}
                                            </div>
                                            <div class=photo.status.badge_class()>{photo.status.label()}</div>
                                            {photo
                                                .error_message
                                                .clone()
                                                .map(|message| {
                                                    view! {
                                                        <div class="photo-error-message">
                                                            <strong>"エラー: "</strong>
                                                            {message}
                                                        </div>
                                                    }
                                                })}
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>

            <div class="photos-actions">
                <button
                    class="next-btn"
                    disabled=move || extraction.processing.get() || !has_photos()
                    on:click=move |_| extraction.start()
                >
                    {move || if extraction.processing.get() { "抽出中..." } else { "抽出" }}
                </button>

                <button
                    class="analyze-btn"
                    disabled=move || analysis.analyzing.get() || !can_analyze()
                    on:click=move |_| analysis.start()
                >
                    {move || {
                        if analysis.analyzing.get() {
                            let (processed, total) = analysis.processed_and_total();
                            if total > 0 {
                                format!("解析中... ({}/{}) ・ {}%", processed, total, analysis.percentage())
                            } else {
                                "解析中...".to_string()
                            }
                        } else {
                            "解析".to_string()
                        }
                    }}
                </button>

                <button
                    class="clear-btn"
                    disabled=move || extraction.processing.get() || !has_photos()
                    on:click={
                        let on_clear_all = on_clear_all.clone();
                        move |_| on_clear_all(())
                    }
                >
                    "全削除"
                </button>
            </div>

            <Show when=move || !can_analyze() && !analysis.analyzing.get() && has_photos()>
                <p class="hint warning">
                    "⚠️ 解析には全写真のテキスト抽出完了（✓ 完了）が必要です。先に「抽出」を実行してください。"
                </p>
            </Show>
            <Show when=move || !has_photos() && !analysis.analyzing.get() && !store.loading.get()>
                <p class="hint">"写真をアップロードして「抽出」を実行すると解析できます"</p>
            </Show>

            <Show when=move || analysis.show_report.get()>
                <div class="analysis-section">
                    <h3>"覚えておきたいポイント"</h3>
                    <div class="analysis-summary">
                        <p class="summary-text">
                            {move || {
                                let summary = analysis
                                    .report
                                    .with(|report| {
                                        report.as_ref().map(|r| r.short_summary()).unwrap_or_default()
                                    });
                                if summary.is_empty() { "要約はありません".to_string() } else { summary }
                            }}
                        </p>
                    </div>
                </div>
            </Show>
        </div>
    }
}
