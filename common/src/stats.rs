//! 管理者ダッシュボードの統計型
//!
//! /api/admin/stats のペイロードと、チャート表示向けの正規化、
//! デモモード用の固定データ

use serde::{Deserialize, Serialize};

/// 1時間分のタイムスタンプ漏洩カウント
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourCount {
    pub hour: u8,
    pub count: u32,
}

/// 名前付きシグナルのカウント（チャート1行）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalCount {
    pub name: String,
    pub count: u32,
}

/// OCRテキストから検出した識別子のカウント
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialContextLeakage {
    pub relationship_labels: u32,
    pub handles: u32,
    pub emails: u32,
    pub phone_patterns: u32,
    pub name_entities: u32,
}

/// 管理者向け集計統計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_photos: u64,
    pub timestamp_leakage: Vec<HourCount>,
    pub social_context_leakage: SocialContextLeakage,
    pub professional_liability_signals: Vec<SignalCount>,
    pub location_leakage_signals: Vec<SignalCount>,
}

impl AdminStats {
    /// タイムスタンプ漏洩をちょうど24時間分に正規化する
    ///
    /// 欠損・長さ不一致のデータはゼロ埋めの24件に置き換える
    pub fn hours_24(&self) -> Vec<HourCount> {
        if self.timestamp_leakage.len() == 24 {
            return self.timestamp_leakage.clone();
        }
        (0..24).map(|hour| HourCount { hour, count: 0 }).collect()
    }

    /// ソーシャル漏洩カウントをチャート行へ変換
    pub fn social_rows(&self) -> Vec<SignalCount> {
        let s = &self.social_context_leakage;
        vec![
            SignalCount {
                name: "Relationship Labels".to_string(),
                count: s.relationship_labels,
            },
            SignalCount {
                name: "Handles".to_string(),
                count: s.handles,
            },
            SignalCount {
                name: "Emails".to_string(),
                count: s.emails,
            },
            SignalCount {
                name: "Phone Patterns".to_string(),
                count: s.phone_patterns,
            },
            SignalCount {
                name: "Name Entities".to_string(),
                count: s.name_entities,
            },
        ]
    }

    /// 職業上のリスクシグナル（空ならデモデータで埋める）
    pub fn liability_rows(&self) -> Vec<SignalCount> {
        if !self.professional_liability_signals.is_empty() {
            return self.professional_liability_signals.clone();
        }
        demo_stats().professional_liability_signals
    }

    /// 位置情報の漏洩シグナル（空ならデモデータで埋める）
    pub fn location_rows(&self) -> Vec<SignalCount> {
        if !self.location_leakage_signals.is_empty() {
            return self.location_leakage_signals.clone();
        }
        demo_stats().location_leakage_signals
    }
}

/// デモモード用の固定統計
pub fn demo_stats() -> AdminStats {
    const DEMO_HOURLY: [u32; 24] = [
        12, 9, 7, 6, 5, 8, 14, 22, 31, 38, 42, 45, 47, 44, 41, 39, 36, 33, 30, 27, 24, 20, 17, 14,
    ];

    AdminStats {
        total_users: 156,
        total_photos: 1247,
        timestamp_leakage: DEMO_HOURLY
            .iter()
            .enumerate()
            .map(|(hour, &count)| HourCount {
                hour: hour as u8,
                count,
            })
            .collect(),
        social_context_leakage: SocialContextLeakage {
            relationship_labels: 23,
            handles: 45,
            emails: 18,
            phone_patterns: 12,
            name_entities: 34,
        },
        professional_liability_signals: vec![
            SignalCount {
                name: "Aggression Hits".to_string(),
                count: 14,
            },
            SignalCount {
                name: "Profanity Hits".to_string(),
                count: 9,
            },
            SignalCount {
                name: "Shouting Hits".to_string(),
                count: 22,
            },
        ],
        location_leakage_signals: vec![
            SignalCount {
                name: "Explicit location keywords".to_string(),
                count: 18,
            },
            SignalCount {
                name: "Travel/route context".to_string(),
                count: 27,
            },
            SignalCount {
                name: "No location signals".to_string(),
                count: 5,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_stats_deserialize() {
        let json = r#"{
            "totalUsers": 3,
            "totalPhotos": 17,
            "timestampLeakage": [{"hour": 0, "count": 2}],
            "socialContextLeakage": {"relationshipLabels": 1, "handles": 2, "emails": 3, "phonePatterns": 4, "nameEntities": 5},
            "professionalLiabilitySignals": [{"name": "Aggression Hits", "count": 1}],
            "locationLeakageSignals": []
        }"#;

        let stats: AdminStats = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.social_context_leakage.phone_patterns, 4);
        assert_eq!(stats.professional_liability_signals.len(), 1);
    }

    #[test]
    fn test_hours_24_passthrough_when_complete() {
        let stats = demo_stats();
        let hours = stats.hours_24();
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[8].count, 31);
    }

    #[test]
    fn test_hours_24_zero_fills_bad_lengths() {
        let stats = AdminStats {
            timestamp_leakage: vec![HourCount { hour: 0, count: 9 }],
            ..Default::default()
        };
        let hours = stats.hours_24();
        assert_eq!(hours.len(), 24);
        assert!(hours.iter().all(|h| h.count == 0));
        assert_eq!(hours[23].hour, 23);
    }

    #[test]
    fn test_social_rows_order_and_labels() {
        let stats = demo_stats();
        let rows = stats.social_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "Relationship Labels");
        assert_eq!(rows[0].count, 23);
        assert_eq!(rows[4].name, "Name Entities");
    }

    #[test]
    fn test_signal_rows_fall_back_to_demo_when_empty() {
        let stats = AdminStats::default();
        let rows = stats.liability_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Aggression Hits");

        let rows = stats.location_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].name, "No location signals");
    }

    #[test]
    fn test_signal_rows_use_live_data_when_present() {
        let stats = AdminStats {
            professional_liability_signals: vec![SignalCount {
                name: "Aggression Hits".to_string(),
                count: 99,
            }],
            ..Default::default()
        };
        assert_eq!(stats.liability_rows()[0].count, 99);
    }
}
