//! Rank titles and the shareable session summary

use serde::Serialize;

use crate::difficulty::Difficulty;

/// Static rank table for one difficulty
#[derive(Debug, Clone, Copy)]
pub struct RankTable {
    pub label: &'static str,
    pub world: &'static str,
    pub titles: &'static [&'static str],
}

const EASY: RankTable = RankTable {
    label: "初級",
    world: "村の冒険者見習い",
    titles: &["ぼんやり村人", "見習い冒険者", "小さな勇者", "村の英雄", "天才勇者"],
};

const MEDIUM: RankTable = RankTable {
    label: "中級",
    world: "城下町や森の試練",
    titles: &["旅の挑戦者", "森の探検家", "王国の戦士", "記憶の騎士", "スーパー勇者"],
};

const HARD: RankTable = RankTable {
    label: "上級",
    world: "伝説の神殿",
    titles: &["無謀な挑戦者", "記憶忍者", "賢者", "記憶の王", "記憶神"],
};

impl Difficulty {
    pub fn rank_table(&self) -> &'static RankTable {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }
}

/// Rank reached on a difficulty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub label: &'static str,
    pub world_name: &'static str,
    pub title: String,
    /// Pool size of the difficulty
    pub card_count: usize,
}

/// Rank for the level reached. Levels past the last title get a `+`.
pub fn rank_for(difficulty: Difficulty, level: u32) -> Rank {
    let table = difficulty.rank_table();
    let count = table.titles.len();
    let index = (level as usize).clamp(1, count) - 1;
    let mut title = table.titles[index].to_string();
    if level as usize > count {
        title.push('+');
    }
    Rank {
        label: table.label,
        world_name: table.world,
        title,
        card_count: difficulty.pool_size(),
    }
}

/// Plain-text session summary shown when a session is ended
pub fn summary_text(difficulty: Difficulty, level: u32, best: u32) -> String {
    let rank = rank_for(difficulty, level);
    [
        format!("{}（カード{}枚：{}）", rank.label, rank.card_count, rank.world_name),
        format!("現在のレベル: Lv{level}"),
        format!("称号: {}", rank.title),
        format!("最高スコア: {best}"),
    ]
    .join("\n")
}

/// Summary wrapped for the share sheet / clipboard
pub fn share_text(summary: &str) -> String {
    format!("記憶アドベンチャーで挑戦！\n{summary}\nあなたも試してみてね！")
}
