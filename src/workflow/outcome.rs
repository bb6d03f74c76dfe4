//! 条目的最终结果

use std::fmt;

use crate::models::WorkItem;
use crate::workflow::attempt::{AttemptReport, ExecutionFailure};

/// 条目最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// 原输入直接成功
    Succeeded,
    /// 拆分后所有片段都成功
    SucceededViaSplit,
    /// 拆分后部分片段成功
    PartiallyFailed,
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutcomeStatus::Succeeded => "成功",
            OutcomeStatus::SucceededViaSplit => "拆分后成功",
            OutcomeStatus::PartiallyFailed => "部分失败",
            OutcomeStatus::Failed => "失败",
        };
        f.write_str(name)
    }
}

/// 一个拆分片段的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentOutcome {
    pub input: String,
    pub succeeded: bool,
    pub attempts_issued: usize,
}

impl FragmentOutcome {
    pub fn from_report(report: &AttemptReport) -> Self {
        Self {
            input: report.input.clone(),
            succeeded: report.succeeded(),
            attempts_issued: report.attempts_issued(),
        }
    }
}

/// 一个原始条目处理完后的结果，创建后不再修改
#[derive(Debug, Clone)]
pub struct Outcome {
    pub item: WorkItem,
    pub status: OutcomeStatus,
    /// 原输入和所有片段一共发出的尝试次数
    pub attempts_issued: usize,
    /// 原输入失败的原因（直接成功时为 None）
    pub failure: Option<ExecutionFailure>,
    pub fragments: Vec<FragmentOutcome>,
}

impl Outcome {
    /// 不拆分时的结果
    pub fn direct(item: WorkItem, report: AttemptReport) -> Self {
        let status = if report.succeeded() {
            OutcomeStatus::Succeeded
        } else {
            OutcomeStatus::Failed
        };
        Self {
            item,
            status,
            attempts_issued: report.attempts_issued(),
            failure: report.result.err(),
            fragments: Vec::new(),
        }
    }

    /// 拆分后的结果：全部成功 / 部分成功 / 全部失败
    pub fn from_split(item: WorkItem, original: AttemptReport, fragments: Vec<FragmentOutcome>) -> Self {
        let succeeded = fragments.iter().filter(|f| f.succeeded).count();
        let status = if fragments.is_empty() || succeeded == 0 {
            OutcomeStatus::Failed
        } else if succeeded == fragments.len() {
            OutcomeStatus::SucceededViaSplit
        } else {
            OutcomeStatus::PartiallyFailed
        };
        let attempts_issued =
            original.attempts_issued() + fragments.iter().map(|f| f.attempts_issued).sum::<usize>();
        Self {
            item,
            status,
            attempts_issued,
            failure: original.result.err(),
            fragments,
        }
    }

    /// 计入统计的叶子结果：拆分过的按片段计，否则按条目本身计
    pub fn leaf_results(&self) -> Vec<bool> {
        if self.fragments.is_empty() {
            vec![self.status == OutcomeStatus::Succeeded]
        } else {
            self.fragments.iter().map(|f| f.succeeded).collect()
        }
    }

    pub fn fully_succeeded(&self) -> bool {
        matches!(
            self.status,
            OutcomeStatus::Succeeded | OutcomeStatus::SucceededViaSplit
        )
    }
}
