//! System monitor panel: state label, distance sensor, and log console

use crate::types::{context::LogEntry, output::Snapshot, state::NarrativeState};

/// Display label for a state
pub fn state_label(state: NarrativeState) -> &'static str {
    use NarrativeState as S;
    match state {
        S::Start => "🌐 系統載入",
        S::InCar => "車內待命",
        S::QteSequence => "QTE挑戰中",
        S::EngineStall => "引擎熄火",
        S::Driving => "駕駛中",
        S::AtGate => "閘門前",
        S::GateOpening => "閘門開啟",
        S::Parked => "已停車",
        S::InteractCat => "🐱 遭遇迷因貓",
        S::InteractSpaghetti => "🍝 義大利麵",
        S::InteractExit => "🧱 地圖邊界",
        S::EndingBlackHole => "🌌 結局：黑洞",
        S::EndingCatChaos => "😵 結局：混亂",
        S::EndingSpaghettiDance => "💃 結局：熱舞",
        S::EndingAdmin => "👮 結局：封鎖",
        S::EndingBsod => "💀 結局：當機",
        S::PaymentNarrative => "繳費說明",
        S::PaymentInput => "📧 輸入信箱",
        S::Finished => "🎉 遊戲結束",
    }
}

/// Status shown by the distance sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningLevel {
    Completed,
    Loading,
    Ready,
    Interact,
    Ending,
    System,
    Finished,
    Danger,
    Warning,
    Caution,
    Safe,
}

impl WarningLevel {
    /// Status for `state`; only the driving-related states look at `distance`
    pub fn for_state(state: NarrativeState, distance: i64) -> Self {
        use NarrativeState as S;
        match state {
            S::Parked => WarningLevel::Completed,
            S::Start => WarningLevel::Loading,
            S::InCar | S::QteSequence | S::EngineStall => WarningLevel::Ready,
            s if s.is_interaction() => WarningLevel::Interact,
            s if s.is_ending() => WarningLevel::Ending,
            S::Finished => WarningLevel::Finished,
            S::PaymentNarrative | S::PaymentInput => WarningLevel::System,
            _ => Self::for_distance(distance),
        }
    }

    pub fn for_distance(distance: i64) -> Self {
        match distance {
            d if d <= 50 => WarningLevel::Danger,
            d if d <= 150 => WarningLevel::Warning,
            d if d <= 300 => WarningLevel::Caution,
            _ => WarningLevel::Safe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WarningLevel::Completed => "🎉 已停車",
            WarningLevel::Loading => "🌐 系統載入中",
            WarningLevel::Ready => "🚗 車輛待命",
            WarningLevel::Interact => "🎮 互動中",
            WarningLevel::Ending => "🌀 異常事件",
            WarningLevel::System => "💳 系統處理中",
            WarningLevel::Finished => "🎮 遊戲結束",
            WarningLevel::Danger => "⚠️ 危險",
            WarningLevel::Warning => "⚡ 注意",
            WarningLevel::Caution => "👀 小心",
            WarningLevel::Safe => "✅ 安全",
        }
    }

    /// Hex colour, `#rrggbb`
    pub fn color(self) -> &'static str {
        match self {
            WarningLevel::Completed
            | WarningLevel::Loading
            | WarningLevel::System
            | WarningLevel::Finished => "#05d9e8",
            WarningLevel::Ready | WarningLevel::Interact => "#00ff88",
            WarningLevel::Ending => "#ff2a6d",
            WarningLevel::Danger => "#ff0000",
            WarningLevel::Warning => "#ff8800",
            WarningLevel::Caution => "#ffff00",
            WarningLevel::Safe => "#00ff00",
        }
    }
}

/// `distance` as a percentage of `full`, capped at 100
pub fn distance_percent(distance: i64, full: i64) -> f64 {
    if full <= 0 {
        return 0.0;
    }
    (distance as f64 / full as f64 * 100.0).min(100.0)
}

/// `[HH:MM:SS] text`
pub fn format_log(entry: &LogEntry) -> String {
    format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.text)
}

/// Everything the dashboard panel shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub state_label: &'static str,
    pub status: WarningLevel,
    pub distance: i64,
    pub percent: f64,
    /// Newest first
    pub logs: Vec<String>,
}

impl DashboardView {
    pub fn new(snapshot: &Snapshot, full_distance: i64) -> Self {
        let distance = snapshot.context.driving_distance;
        Self {
            state_label: state_label(snapshot.state),
            status: WarningLevel::for_state(snapshot.state, distance),
            distance,
            percent: distance_percent(distance, full_distance),
            logs: snapshot.context.logs.iter().rev().map(format_log).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::context::NarrativeContext;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn distance_bands() {
        assert_eq!(WarningLevel::for_distance(-3), WarningLevel::Danger);
        assert_eq!(WarningLevel::for_distance(50), WarningLevel::Danger);
        assert_eq!(WarningLevel::for_distance(51), WarningLevel::Warning);
        assert_eq!(WarningLevel::for_distance(150), WarningLevel::Warning);
        assert_eq!(WarningLevel::for_distance(300), WarningLevel::Caution);
        assert_eq!(WarningLevel::for_distance(301), WarningLevel::Safe);
    }

    #[test]
    fn non_driving_states_ignore_distance() {
        assert_eq!(
            WarningLevel::for_state(NarrativeState::Parked, 0),
            WarningLevel::Completed
        );
        assert_eq!(
            WarningLevel::for_state(NarrativeState::EndingBsod, 0),
            WarningLevel::Ending
        );
        assert_eq!(
            WarningLevel::for_state(NarrativeState::InteractExit, 0),
            WarningLevel::Interact
        );
        assert_eq!(
            WarningLevel::for_state(NarrativeState::Finished, 0),
            WarningLevel::Finished
        );
        assert_eq!(
            WarningLevel::for_state(NarrativeState::Driving, 120),
            WarningLevel::Warning
        );
        assert_eq!(
            WarningLevel::for_state(NarrativeState::AtGate, 0),
            WarningLevel::Danger
        );
    }

    #[test]
    fn percent_is_capped() {
        assert_eq!(distance_percent(250, 500), 50.0);
        assert_eq!(distance_percent(900, 500), 100.0);
        assert_eq!(distance_percent(0, 500), 0.0);
    }

    #[test]
    fn logs_are_newest_first_with_clock_time() {
        let mut ctx = NarrativeContext::default();
        ctx.push_log(Utc.with_ymd_and_hms(2025, 1, 1, 9, 5, 7).unwrap(), "進入車內");
        ctx.push_log(Utc.with_ymd_and_hms(2025, 1, 1, 9, 5, 9).unwrap(), "開始點火校準");
        let snapshot = Snapshot::new(NarrativeState::QteSequence, Arc::new(ctx));

        let view = DashboardView::new(&snapshot, 500);
        assert_eq!(view.state_label, "QTE挑戰中");
        assert_eq!(
            view.logs,
            vec![
                "[09:05:09] 開始點火校準".to_string(),
                "[09:05:07] 進入車內".to_string()
            ]
        );
    }
}
