//! ログイン/登録画面

use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_audit_common::ApiError;

use crate::api;
use crate::session::use_session;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();

    let (mode, set_mode) = signal(AuthMode::Login);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (register_as_admin, set_register_as_admin) = signal(false);
    let (show_password, set_show_password) = signal(false);
    let (show_confirm, set_show_confirm) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<ApiError>);

    let is_login = move || mode.get() == AuthMode::Login;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            let result = if mode.get_untracked() == AuthMode::Login {
                api::login(&email.get_untracked(), &password.get_untracked()).await
            } else {
                api::register(
                    &email.get_untracked(),
                    &password.get_untracked(),
                    &confirm_password.get_untracked(),
                    register_as_admin.get_untracked(),
                )
                .await
            };

            match result {
                // 成功: セッションへ保存。表示はセッション状態から切り替わる
                Ok(user) => session.login(user),
                Err(e) => {
                    let _ = set_error.try_set(Some(e));
                }
            }
            let _ = set_loading.try_set(false);
        });
    };

    view! {
        <div class="app">
            <div class="auth-card">
                <div class="auth-toggle">
                    <button
                        class=move || if is_login() { "auth-toggle-btn active" } else { "auth-toggle-btn" }
                        on:click=move |_| set_mode.set(AuthMode::Login)
                    >
                        "ログイン"
                    </button>
                    <button
                        class=move || if is_login() { "auth-toggle-btn" } else { "auth-toggle-btn active" }
                        on:click=move |_| set_mode.set(AuthMode::Register)
                    >
                        "新規登録"
                    </button>
                </div>

                <h1 class="auth-title">
                    {move || if is_login() { "おかえりなさい" } else { "アカウント作成" }}
                </h1>

                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label">
                        "メールアドレス"
                        <input
                            type="email"
                            class="auth-input"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required=true
                        />
                    </label>

                    <label class="auth-label">
                        "パスワード"
                        <div class="password-input-wrapper">
                            <input
                                type=move || if show_password.get() { "text" } else { "password" }
                                class="auth-input"
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                required=true
                            />
                            <button
                                type="button"
                                class="password-toggle"
                                on:click=move |_| set_show_password.update(|v| *v = !*v)
                            >
                                {move || if show_password.get() { "👁️" } else { "👁️‍🗨️" }}
                            </button>
                        </div>
                    </label>

                    <Show when=move || !is_login()>
                        <label class="auth-label">
                            "パスワード（確認）"
                            <div class="password-input-wrapper">
                                <input
                                    type=move || if show_confirm.get() { "text" } else { "password" }
                                    class="auth-input"
                                    prop:value=move || confirm_password.get()
                                    on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                                    required=true
                                />
                                <button
                                    type="button"
                                    class="password-toggle"
                                    on:click=move |_| set_show_confirm.update(|v| *v = !*v)
                                >
                                    {move || if show_confirm.get() { "👁️" } else { "👁️‍🗨️" }}
                                </button>
                            </div>
                        </label>

                        <label class="auth-checkbox-label">
                            <input
                                type="checkbox"
                                prop:checked=move || register_as_admin.get()
                                on:change=move |ev| set_register_as_admin.set(event_target_checked(&ev))
                            />
                            "管理者アカウントにする"
                        </label>
                    </Show>

                    <button type="submit" class="auth-submit" disabled=move || loading.get()>
                        {move || {
                            if loading.get() {
                                "送信中..."
                            } else if is_login() {
                                "ログイン"
                            } else {
                                "登録"
                            }
                        }}
                    </button>
                </form>

                <Show when=move || error.get().is_some()>
                    <div class="response-box error">
                        <h3>"エラー"</h3>
                        <pre>{move || error.get().map(|e| e.to_string()).unwrap_or_default()}</pre>
                    </div>
                </Show>
            </div>
        </div>
    }
}
