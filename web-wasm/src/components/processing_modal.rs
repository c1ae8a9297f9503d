//! OCR処理モーダル
//!
//! ポーリング中のステータススナップショットを進捗バーと
//! 写真別リストで表示する

use leptos::prelude::*;
use photo_audit_common::Photo;

use crate::components::progress_bar::ProgressBar;
use crate::pollers::extraction::ExtractionPoller;

#[component]
pub fn ProcessingModal(poller: ExtractionPoller) -> impl IntoView {
    view! {
        <Show when=move || poller.show_modal.get()>
            <div class="processing-modal-overlay">
                <div class="processing-modal">
                    <h2>"写真を処理中"</h2>

                    <ProgressBar percent=Signal::derive(move || poller.percentage()) />

                    <div class="processing-status-list">
                        <For
                            each=move || {
                                poller.snapshot.get().into_iter().enumerate().collect::<Vec<_>>()
                            }
                            key=|(_, photo): &(usize, Photo)| photo.id.clone()
                            children=|(index, photo): (usize, Photo)| {
                                view! {
                                    <div class="processing-status-item">
                                        <span class="status-filename">
                                            {format!("写真 {}: {}", index + 1, photo.original_filename)}
                                        </span>
                                        <span class=photo.status.badge_class()>{photo.status.label()}</span>
                                    </div>
                                }
                            }
                        />
                    </div>
                </div>
            </div>
        </Show>
    }
}
