//! ステージ状態管理
//!
//! 解析・物語生成・エクスポートの各ステージについて、進行状態と
//! 呼び出し世代を保持する。完了時は最後に開始した呼び出しの結果のみ反映する。

use std::fmt;

/// パイプラインのステージ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Analyze,
    Story,
    Export,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Analyze, Stage::Story, Stage::Export];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Analyze => "analyze",
            Stage::Story => "story",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ステージの進行状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl StageStatus {
    /// リクエスト送信中か（ローディング表示用）
    pub fn is_loading(&self) -> bool {
        matches!(self, StageStatus::InFlight)
    }

    /// 直近の失敗理由
    pub fn last_error(&self) -> Option<&str> {
        match self {
            StageStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// 開始した呼び出しの識別子
///
/// `basis` は呼び出し開始時点の入力データのリビジョン。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTicket {
    pub(crate) stage: Stage,
    pub(crate) generation: u64,
    pub(crate) basis: u64,
}

impl StageTicket {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub(crate) struct StageTracker {
    stage: Stage,
    generation: u64,
    status: StageStatus,
}

impl StageTracker {
    pub(crate) fn new(stage: Stage) -> Self {
        Self {
            stage,
            generation: 0,
            status: StageStatus::Idle,
        }
    }

    pub(crate) fn status(&self) -> &StageStatus {
        &self.status
    }

    pub(crate) fn begin(&mut self, basis: u64) -> StageTicket {
        self.generation += 1;
        self.status = StageStatus::InFlight;
        StageTicket {
            stage: self.stage,
            generation: self.generation,
            basis,
        }
    }

    /// 最後に開始した呼び出しで、まだ完了していないか
    pub(crate) fn is_current(&self, ticket: &StageTicket) -> bool {
        ticket.stage == self.stage
            && ticket.generation == self.generation
            && self.status.is_loading()
    }

    /// 完了状態を反映（古い呼び出しは無視してfalseを返す）
    pub(crate) fn settle(&mut self, ticket: &StageTicket, status: StageStatus) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = status;
        true
    }

    /// 送信中でなければIdleに戻す
    pub(crate) fn reset_if_settled(&mut self) {
        if !self.status.is_loading() {
            self.status = StageStatus::Idle;
        }
    }
}
