//! 管理者ダッシュボード
//!
//! /api/me で管理者であることを確認してから統計を取得する。
//! ライブ取得に加え、固定データで表示を確認できるデモモードを持つ

use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_audit_common::{demo_stats, AdminStats, SessionUser};

use crate::api;
use crate::components::chart_card::{BarList, ChartCard, HourHistogram};
use crate::components::nav_bar::AdminNav;
use crate::session::use_session;

const COLOR_TIMESTAMP: &str = "#38bdf8";
const COLOR_SOCIAL: &str = "#a78bfa";
const COLOR_LIABILITY: &str = "#f59e0b";
const COLOR_LOCATION: &str = "#22c55e";

#[component]
pub fn AdminDashboard(user: SessionUser) -> impl IntoView {
    let session = use_session();

    let (stats, set_stats) = signal(None::<AdminStats>);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let (verified, set_verified) = signal(false);
    let (live_mode, set_live_mode) = signal(true);

    let user_id = StoredValue::new(user.user_id.clone());
    let email = user.email.clone();

    // 初回とモード切替時に検証+取得をやり直す
    Effect::new(move |_| {
        let live = live_mode.get();

        spawn_local(async move {
            let _ = set_loading.try_set(true);
            let _ = set_error.try_set(None);

            if !live {
                // デモモード: ローカルの固定データを使う
                let _ = set_verified.try_set(true);
                let _ = set_stats.try_set(Some(demo_stats()));
                let _ = set_loading.try_set(false);
                return;
            }

            let Some(user_id) = user_id.try_get_value() else {
                return;
            };

            match api::fetch_me(&user_id).await {
                Ok(me) if me.is_admin => {
                    let _ = set_verified.try_set(true);
                    match api::fetch_admin_stats(&user_id).await {
                        Ok(live_stats) => {
                            let _ = set_stats.try_set(Some(live_stats));
                            let _ = set_error.try_set(None);
                        }
                        Err(e) => {
                            let _ = set_stats.try_set(None);
                            let _ = set_error.try_set(Some(e.to_string()));
                        }
                    }
                }
                Ok(_) => {
                    let _ = set_error
                        .try_set(Some("アクセス拒否: 管理者権限が必要です".to_string()));
                    let _ = set_verified.try_set(false);
                    let _ = set_stats.try_set(None);
                }
                Err(e) => {
                    let _ = set_error.try_set(Some(format!("管理者確認に失敗: {}", e)));
                    let _ = set_verified.try_set(false);
                    let _ = set_stats.try_set(None);
                }
            }
            let _ = set_loading.try_set(false);
        });
    });

    // ライブ統計が無いあいだはデモデータで枠を埋める
    let data = move || stats.get().unwrap_or_else(demo_stats);

    view! {
        <div class="dashboard page">
            <AdminNav
                email=email
                live_mode=live_mode
                on_set_live_mode=move |live| set_live_mode.set(live)
                on_logout=move |_| session.logout()
            />

            <div class="admin-summary">
                {move || {
                    let d = data();
                    format!("ユーザー数: {} ・ 写真数: {}", d.total_users, d.total_photos)
                }}
            </div>

            <Show when=move || loading.get()>
                <div class="status-panel">
                    <div class="status-title">"読み込み中"</div>
                    <div class="status-subtitle">"ダッシュボードのデータを取得しています…"</div>
                </div>
            </Show>

            <Show when=move || !loading.get() && error.get().is_some()>
                <div class="status-panel error">
                    <div class="status-title">"エラー"</div>
                    <div class="status-subtitle">{move || error.get().unwrap_or_default()}</div>
                </div>
            </Show>

            <Show when=move || !loading.get() && error.get().is_none() && verified.get()>
                <div class="charts-grid">
                    {move || {
                        let d = data();
                        let mode_note = if live_mode.get() {
                            "全解析の集計値".to_string()
                        } else {
                            "デモデータ".to_string()
                        };
                        let hours = d.hours_24();
                        let social = d.social_rows();
                        let liability = d.liability_rows();
                        let location = d.location_rows();
                        view! {
                            <ChartCard
                                title="タイムスタンプ漏洩"
                                subtitle="OCRテキストに時刻らしき表記が現れた回数"
                                note=mode_note
                            >
                                <HourHistogram hours=hours color=COLOR_TIMESTAMP />
                            </ChartCard>

                            <ChartCard
                                title="ソーシャル情報の漏洩"
                                subtitle="OCRテキストから検出した識別子"
                                note="値が大きいほど公開時の露出リスクが高い".to_string()
                            >
                                <BarList rows=social color=COLOR_SOCIAL />
                            </ChartCard>

                            <ChartCard
                                title="職業上のリスクシグナル"
                                subtitle="OCR内容から導いたヒューリスティック"
                                note="リスクの指標であり、断定ではない".to_string()
                            >
                                <BarList rows=liability color=COLOR_LIABILITY />
                            </ChartCard>

                            <ChartCard
                                title="位置情報の漏洩シグナル"
                                subtitle="位置が推定できる記述の検出数"
                            >
                                <BarList rows=location color=COLOR_LOCATION />
                            </ChartCard>
                        }
                    }}
                </div>
            </Show>
        </div>
    }
}
