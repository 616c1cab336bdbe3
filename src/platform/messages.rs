//! Player-facing text for game events

use crate::sim::{FailureReason, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

impl Tone {
    pub fn as_class(&self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Buttons offered in the status popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    Restart,
    Share,
}

impl PopupAction {
    pub fn id(&self) -> &'static str {
        match self {
            PopupAction::Restart => "restart",
            PopupAction::Share => "share",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// CSS modifier: success, fail, timeout, ended
    pub kind: &'static str,
    pub text: String,
    /// (action, label)
    pub actions: Vec<(PopupAction, &'static str)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupChange {
    Show(Popup),
    Hide,
}

pub const CLIPBOARD_OK: &str = "結果をクリップボードにコピーしました！";
pub const CLIPBOARD_FAILED: &str = "コピーに失敗しました。手動でコピーしてください。";

/// Status line for an event; `None` leaves the current line alone
pub fn message_for(event: &GameEvent) -> Option<Message> {
    match event {
        GameEvent::Reset => Some(Message::new("", Tone::Info)),
        GameEvent::LevelStarted { .. } => Some(Message::new("カードを覚えてください…", Tone::Info)),
        GameEvent::SelectionOpened { seconds } => Some(Message::new(
            format!("表示された絵文字を選んでください！（制限時間{seconds}秒）"),
            Tone::Info,
        )),
        GameEvent::Picked {
            matched: true,
            remaining,
            ..
        } if *remaining > 0 => Some(Message::new(
            format!("正解！あと{remaining}枚。"),
            Tone::Success,
        )),
        GameEvent::Picked {
            matched: false,
            mistakes_left,
            ..
        } => Some(Message::new(
            format!("×！もう一度挑戦しましょう。（残りリトライ{mistakes_left}回）"),
            Tone::Error,
        )),
        GameEvent::RoundWon { .. } => Some(Message::new("正解！次のレベルへ進みます。", Tone::Success)),
        GameEvent::RoundLost {
            reason: FailureReason::WrongSymbol { symbol },
        } => Some(Message::new(
            format!("残念！ {symbol} は表示されていませんでした。"),
            Tone::Error,
        )),
        GameEvent::RoundLost {
            reason: FailureReason::TimeExpired,
        } => Some(Message::new("時間切れ！タイムオーバーです。", Tone::Error)),
        GameEvent::SessionEnded { .. } => Some(Message::new(
            "ゲームを終了しました。いつでも再挑戦できます。",
            Tone::Info,
        )),
        GameEvent::Picked { .. }
        | GameEvent::BestScoreRaised { .. }
        | GameEvent::CountdownTick { .. } => None,
    }
}

/// Status popup change for an event
pub fn popup_for(event: &GameEvent) -> Option<PopupChange> {
    let popup = match event {
        GameEvent::Reset | GameEvent::LevelStarted { .. } => return Some(PopupChange::Hide),
        GameEvent::RoundWon { .. } => Popup {
            kind: "success",
            text: "正解！！".to_string(),
            actions: Vec::new(),
        },
        GameEvent::RoundLost {
            reason: FailureReason::WrongSymbol { .. },
        } => Popup {
            kind: "fail",
            text: "残念！".to_string(),
            actions: vec![(PopupAction::Restart, "もう一度挑戦する")],
        },
        GameEvent::RoundLost {
            reason: FailureReason::TimeExpired,
        } => Popup {
            kind: "timeout",
            text: "タイムオーバー！".to_string(),
            actions: vec![(PopupAction::Restart, "もう一度遊ぶ")],
        },
        GameEvent::SessionEnded { summary, .. } => Popup {
            kind: "ended",
            text: summary.clone(),
            actions: vec![
                (PopupAction::Restart, "もう一度遊ぶ"),
                (PopupAction::Share, "結果をシェア"),
            ],
        },
        _ => return None,
    };
    Some(PopupChange::Show(popup))
}
