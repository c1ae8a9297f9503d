//! メインアプリケーションコンポーネント
//!
//! セッション状態で表示を切り替える:
//! 未ログイン → ログイン画面 / 管理者 → 管理ダッシュボード /
//! 一般ユーザー → ダッシュボード

use leptos::prelude::*;

use crate::components::{
    admin_dashboard::AdminDashboard, dashboard::Dashboard, login_page::LoginPage,
};
use crate::session::Session;

#[component]
pub fn App() -> impl IntoView {
    let session = Session::load();
    provide_context(session);

    view! {
        {move || match session.user() {
            None => view! { <LoginPage /> }.into_any(),
            Some(user) if user.is_admin => view! { <AdminDashboard user=user /> }.into_any(),
            Some(user) => view! { <Dashboard user=user /> }.into_any(),
        }}
    }
}
