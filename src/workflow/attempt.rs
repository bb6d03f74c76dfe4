//! 单次尝试及其失败分类

use std::fmt;

use thiserror::Error;

/// 流程中的步骤（用于日志定位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SubmitInput,
    WaitReady,
    TriggerQuery,
    Download,
    SaveDialog,
    Acknowledge,
    OpenPublisher,
    SelectVideo,
    SelectAccount,
    FillInfo,
    Publish,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::SubmitInput => "粘贴输入",
            Step::WaitReady => "等待就绪",
            Step::TriggerQuery => "点击查询",
            Step::Download => "点击下载",
            Step::SaveDialog => "保存文件",
            Step::Acknowledge => "消息提示确认",
            Step::OpenPublisher => "打开发布页",
            Step::SelectVideo => "选择视频",
            Step::SelectAccount => "选择账号",
            Step::FillInfo => "填写信息",
            Step::Publish => "点击发布",
        };
        f.write_str(name)
    }
}

/// 一次尝试中的失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepFailure {
    /// 输入框不存在，流程本身已损坏
    #[error("未找到输入框控件")]
    InputFieldMissing,
    /// 等待界面就绪超时
    #[error("等待界面就绪超时 ({step})")]
    QueryTimeout { step: Step },
    /// 查询按钮按名称和位置都找不到
    #[error("未找到查询按钮")]
    QueryControlMissing,
    /// 下载 / 确认控件还没出现
    #[error("未找到下载确认控件")]
    ConfirmationControlMissing,
    #[error("等待保存文件对话框超时")]
    SaveDialogTimeout,
    #[error("等待消息提示对话框超时")]
    AcknowledgmentTimeout,
    /// 发布流程中的控件还没出现
    #[error("未找到控件 '{control}' ({step})")]
    ControlMissing { step: Step, control: String },
    #[error("等待页面加载超时 ({step})")]
    ReadyTimeout { step: Step },
    #[error("找不到视频文件: {video_name}")]
    VideoFileMissing { video_name: String },
    #[error("条目缺少发布所需的字段")]
    MissingPublishFields,
    /// 驱动调用本身出错（控件失效等）
    #[error("界面操作失败 ({step}): {message}")]
    Driver { step: Step, message: String },
}

impl StepFailure {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            StepFailure::InputFieldMissing
                | StepFailure::VideoFileMissing { .. }
                | StepFailure::MissingPublishFields
        )
    }

    /// 失败发生在哪一步
    pub fn step(&self) -> Step {
        match self {
            StepFailure::InputFieldMissing => Step::SubmitInput,
            StepFailure::QueryTimeout { step }
            | StepFailure::ControlMissing { step, .. }
            | StepFailure::ReadyTimeout { step }
            | StepFailure::Driver { step, .. } => *step,
            StepFailure::QueryControlMissing => Step::TriggerQuery,
            StepFailure::ConfirmationControlMissing => Step::Download,
            StepFailure::SaveDialogTimeout => Step::SaveDialog,
            StepFailure::AcknowledgmentTimeout => Step::Acknowledge,
            StepFailure::VideoFileMissing { .. } => Step::SelectVideo,
            StepFailure::MissingPublishFields => Step::FillInfo,
        }
    }

    pub fn driver(step: Step, err: anyhow::Error) -> Self {
        StepFailure::Driver {
            step,
            message: err.to_string(),
        }
    }
}

/// 一次尝试的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub input: String,
    /// 第几次尝试（从 1 开始）
    pub index: usize,
    pub failure: Option<StepFailure>,
}

impl Attempt {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// 一个输入最终失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionFailure {
    /// 不可重试的失败，立即放弃
    #[error("不可重试的失败: {0}")]
    NonRetryable(StepFailure),
    /// 用完了全部尝试次数
    #[error("已达到最大重试次数 ({attempts})，最后一次失败: {last}")]
    RetriesExhausted { attempts: usize, last: StepFailure },
}

impl ExecutionFailure {
    pub fn last_failure(&self) -> &StepFailure {
        match self {
            ExecutionFailure::NonRetryable(failure) => failure,
            ExecutionFailure::RetriesExhausted { last, .. } => last,
        }
    }
}

/// 执行一个输入的完整记录
#[derive(Debug, Clone)]
pub struct AttemptReport {
    pub input: String,
    pub attempts: Vec<Attempt>,
    pub result: Result<(), ExecutionFailure>,
}

impl AttemptReport {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// 发出的尝试次数
    pub fn attempts_issued(&self) -> usize {
        self.attempts.len()
    }

    /// 用完重试次数才失败的（可以尝试拆分）
    pub fn retries_exhausted(&self) -> bool {
        matches!(self.result, Err(ExecutionFailure::RetriesExhausted { .. }))
    }
}
