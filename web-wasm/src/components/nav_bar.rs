//! ダッシュボードのナビゲーションバー

use leptos::prelude::*;

#[component]
pub fn UserNav<F>(email: String, on_logout: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <nav class="dashboard-nav">
            <h1>"Photo Audit"</h1>
            <div class="nav-right">
                <span class="nav-email">{email}</span>
                <button
                    class="logout-btn"
                    on:click={
                        let on_logout = on_logout.clone();
                        move |_| on_logout(())
                    }
                >
                    "ログアウト"
                </button>
            </div>
        </nav>
    }
}

#[component]
pub fn AdminNav<FM, FL>(
    email: String,
    live_mode: ReadSignal<bool>,
    on_set_live_mode: FM,
    on_logout: FL,
) -> impl IntoView
where
    FM: Fn(bool) + 'static + Clone,
    FL: Fn(()) + 'static + Clone,
{
    view! {
        <nav class="dashboard-nav">
            <h1>"Photo Audit 管理"</h1>
            <div class="nav-right">
                <div class="mode-toggle">
                    <button
                        class=move || if live_mode.get() { "mode-btn active" } else { "mode-btn" }
                        on:click={
                            let on_set_live_mode = on_set_live_mode.clone();
                            move |_| on_set_live_mode(true)
                        }
                    >
                        "ライブ"
                    </button>
                    <button
                        class=move || if live_mode.get() { "mode-btn" } else { "mode-btn active" }
                        on:click={
                            let on_set_live_mode = on_set_live_mode.clone();
                            move |_| on_set_live_mode(false)
                        }
                    >
                        "デモ"
                    </button>
                </div>
                <span class="nav-email">{email}</span>
                <button
                    class="logout-btn"
                    on:click={
                        let on_logout = on_logout.clone();
                        move |_| on_logout(())
                    }
                >
                    "ログアウト"
                </button>
            </div>
        </nav>
    }
}
