//! アップロードカードコンポーネント
//!
//! ドラッグ&ドロップまたはファイル選択で写真を選び、
//! 位置情報オプトインを添えて multipart でアップロードする

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement};

use crate::photo_store::PhotoStore;

/// FileList → Vec<File>
fn collect_files(files: FileList) -> Vec<File> {
    (0..files.length()).filter_map(|i| files.get(i)).collect()
}

#[component]
pub fn UploadCard(store: PhotoStore) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if let Some(dt) = ev.data_transfer() {
            if let Some(files) = dt.files() {
                store.add_to_selection(collect_files(files));
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_file_change = move |ev: Event| {
        let Some(input) = ev
            .target()
            .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(files) = input.files() {
            store.set_selection(collect_files(files));
        }
        // 同じファイルを選び直せるよう入力はリセットしておく
        input.set_value("");
    };

    let has_selection = move || store.files.with(|files| !files.is_empty());

    view! {
        <div class="upload-card">
            <h2>"写真アップロード"</h2>
            <form
                class="upload-form"
                on:submit=move |ev| {
                    ev.prevent_default();
                    store.upload();
                }
            >
                <div
                    class=move || {
                        if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
                    }
                    on:drop=on_drop
                    on:dragover=on_dragover
                    on:dragleave=on_dragleave
                >
                    <div class="upload-icon">"📷"</div>
                    <p>"写真をドラッグ&ドロップ または 下のボタンから選択"</p>
                    <p class="text-muted">"対応形式: JPEG, PNG"</p>
                </div>

                <label class="file-input-label">
                    <input
                        type="file"
                        multiple=true
                        accept="image/*"
                        class="file-input"
                        on:change=on_file_change
                    />
                    <span class="file-input-text">
                        {move || {
                            let count = store.files.with(|files| files.len());
                            if count == 0 {
                                "ファイルを選択".to_string()
                            } else {
                                format!("{}件選択中", count)
                            }
                        }}
                    </span>
                </label>

                <Show when=has_selection>
                    <div class="file-list">
                        {move || {
                            store
                                .files
                                .with(|files| {
                                    files
                                        .iter()
                                        .map(|file| {
                                            view! { <div class="file-item">"📄 " {file.name()}</div> }
                                        })
                                        .collect::<Vec<_>>()
                                })
                        }}
                    </div>
                </Show>

                <p class="text-muted">"要約の精度と速度のため、一度に3枚までを推奨"</p>

                <label class="location-optin-label">
                    <input
                        type="checkbox"
                        prop:checked=move || store.location_opt_in.get()
                        on:change=move |ev| store.location_opt_in.set(event_target_checked(&ev))
                    />
                    <span>"GPS位置情報も含める（写真に記録されている場合）"</span>
                </label>

                <div class="upload-actions">
                    <button
                        type="submit"
                        class="upload-btn"
                        disabled=move || store.uploading.get() || !has_selection()
                    >
                        {move || if store.uploading.get() { "アップロード中..." } else { "アップロード" }}
                    </button>
                    <button
                        type="button"
                        class="clear-btn"
                        disabled=move || store.uploading.get() || !has_selection()
                        on:click=move |_| store.clear_selection()
                    >
                        "選択を取り消す"
                    </button>
                </div>
            </form>

            <Show when=move || store.upload_error.with(|e| e.is_some())>
                <div class="response-box error">
                    <h3>"エラー"</h3>
                    <pre>{move || store.upload_error.get().map(|e| e.to_string()).unwrap_or_default()}</pre>
                </div>
            </Show>
        </div>
    }
}
