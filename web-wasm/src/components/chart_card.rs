//! チャートカードコンポーネント
//!
//! 外部チャートライブラリは使わず、CSSバーで描く

use leptos::prelude::*;
use photo_audit_common::{HourCount, SignalCount};

/// タイトル付きのチャート枠
#[component]
pub fn ChartCard(
    title: &'static str,
    subtitle: &'static str,
    #[prop(optional, into)] note: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="chart-card">
            <div class="card-head">
                <div>
                    <h2>{title}</h2>
                    <div class="chart-subtitle">{subtitle}</div>
                </div>
            </div>
            {children()}
            {note.map(|note| view! { <div class="chart-note">{note}</div> })}
        </div>
    }
}

/// 横棒チャート（シグナル名 + カウント）
#[component]
pub fn BarList(rows: Vec<SignalCount>, color: &'static str) -> impl IntoView {
    let max = rows.iter().map(|row| row.count).max().unwrap_or(0).max(1);

    view! {
        <div class="bar-list">
            {rows
                .into_iter()
                .map(|row| {
                    let width = row.count * 100 / max;
                    view! {
                        <div class="bar-row">
                            <span class="bar-label">{row.name.clone()}</span>
                            <div class="bar-track">
                                <div
                                    class="bar-fill"
                                    style=format!("width: {}%; background: {};", width, color)
                                />
                            </div>
                            <span class="bar-value">{row.count}</span>
                        </div>
                    }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}

/// 24時間の縦棒ヒストグラム
#[component]
pub fn HourHistogram(hours: Vec<HourCount>, color: &'static str) -> impl IntoView {
    let max = hours.iter().map(|hour| hour.count).max().unwrap_or(0).max(1);

    view! {
        <div class="hour-histogram">
            {hours
                .into_iter()
                .map(|hour| {
                    let height = hour.count * 100 / max;
                    view! {
                        <div class="hour-col" title=format!("{}時: {}件", hour.hour, hour.count)>
                            <div
                                class="hour-fill"
                                style=format!("height: {}%; background: {};", height, color)
                            />
                            <span class="hour-label">{hour.hour}</span>
                        </div>
                    }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}
