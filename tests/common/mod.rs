//! 脚本化的界面驱动：按预设计划让某个输入的某次尝试在指定步骤失败

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use batch_ui_automation::infrastructure::{Handle, Role, Selector, TitleMatch, UiDriver};
use batch_ui_automation::models::SelectorTable;
use batch_ui_automation::services::{ControlLocator, RetryPolicy};
use batch_ui_automation::workflow::{SkuDownloadFlow, SplitEscalation, TaskExecutor};
use batch_ui_automation::{RunCoordinator, Timings};
use tokio::sync::watch;

/// 失败发生的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// 粘贴后界面一直不就绪
    ReadyAfterPaste,
    /// 查询后界面一直不就绪
    QueryReady,
    /// 下载链接不存在
    DownloadLink,
    /// 保存文件对话框不出现
    SaveDialog,
    /// 消息提示不出现
    Ack,
}

#[derive(Debug)]
pub struct ScriptedDriver {
    /// 输入 → 每次尝试的失败点（超出部分视为成功）
    plan: HashMap<String, Vec<FailPoint>>,
    /// 输入 → 每次尝试都在这里失败
    always: HashMap<String, FailPoint>,
    pub input_field_present: bool,
    pub reset_succeeds: bool,
    clipboard: Option<String>,
    current: Option<String>,
    ready_calls: usize,
    /// 每次粘贴的内容（按顺序）
    pub pasted: Vec<String>,
    /// 粘贴时剪贴板内容和这次写入的不一致
    pub handoff_violations: usize,
    pub resets: usize,
    /// 完整走到最后一步的输入
    pub completed: Vec<String>,
    /// set_text 写入的非空文本
    pub typed: Vec<String>,
    /// wait_visible 等待过的控件标题（按顺序）
    pub waited: Vec<String>,
    /// 永远不会出现的控件标题
    absent: Vec<String>,
    /// 粘贴到这个输入时发出停止信号
    shutdown_on: Option<(String, watch::Sender<bool>)>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            plan: HashMap::new(),
            always: HashMap::new(),
            input_field_present: true,
            reset_succeeds: true,
            clipboard: None,
            current: None,
            ready_calls: 0,
            pasted: Vec::new(),
            handoff_violations: 0,
            resets: 0,
            completed: Vec::new(),
            typed: Vec::new(),
            waited: Vec::new(),
            absent: Vec::new(),
            shutdown_on: None,
        }
    }

    pub fn without_control(mut self, title: &str) -> Self {
        self.absent.push(title.to_string());
        self
    }

    pub fn shutdown_on_paste(mut self, input: &str, sender: watch::Sender<bool>) -> Self {
        self.shutdown_on = Some((input.to_string(), sender));
        self
    }

    pub fn waits_for(&self, title: &str) -> usize {
        self.waited.iter().filter(|w| w.as_str() == title).count()
    }

    pub fn fail_attempts(mut self, input: &str, points: Vec<FailPoint>) -> Self {
        self.plan.insert(input.to_string(), points);
        self
    }

    pub fn always_fail(mut self, input: &str, point: FailPoint) -> Self {
        self.always.insert(input.to_string(), point);
        self
    }

    pub fn attempts_for(&self, input: &str) -> usize {
        self.pasted.iter().filter(|p| p.as_str() == input).count()
    }

    fn fail_point(&self) -> Option<FailPoint> {
        let input = self.current.as_deref()?;
        if let Some(point) = self.always.get(input) {
            return Some(*point);
        }
        let attempt = self.attempts_for(input);
        self.plan
            .get(input)
            .and_then(|points| points.get(attempt.checked_sub(1)?))
            .copied()
    }

    fn fails_at(&self, point: FailPoint) -> bool {
        self.fail_point() == Some(point)
    }
}

#[async_trait]
impl UiDriver for ScriptedDriver {
    async fn locate(&mut self, selector: &Selector) -> Option<Handle> {
        match selector.role {
            Role::Edit if self.input_field_present => Some(Handle("input".to_string())),
            Role::Button => Some(Handle("query".to_string())),
            Role::Hyperlink if !self.fails_at(FailPoint::DownloadLink) => {
                Some(Handle("download".to_string()))
            }
            _ => None,
        }
    }

    async fn locate_all(&mut self, _role: Role) -> Vec<Handle> {
        Vec::new()
    }

    async fn exists(&mut self, _handle: &Handle) -> bool {
        true
    }

    async fn click(&mut self, _handle: &Handle) -> anyhow::Result<()> {
        Ok(())
    }

    async fn set_text(&mut self, _handle: &Handle, text: &str) -> anyhow::Result<()> {
        if !text.is_empty() {
            self.typed.push(text.to_string());
        }
        Ok(())
    }

    async fn write_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    async fn send_paste(&mut self, handle: &Handle) -> anyhow::Result<()> {
        let Some(text) = self.clipboard.take() else {
            self.handoff_violations += 1;
            anyhow::bail!("剪贴板为空");
        };
        if handle.0 != "input" {
            self.handoff_violations += 1;
        }
        self.pasted.push(text.clone());
        self.ready_calls = 0;
        let stop = matches!(&self.shutdown_on, Some((input, _)) if *input == text);
        self.current = Some(text);
        if stop {
            if let Some((_, sender)) = &self.shutdown_on {
                let _ = sender.send(true);
            }
            // 让出执行权，协调器的停止分支在下一次轮询时生效
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    async fn send_enter(&mut self, _handle: &Handle) -> anyhow::Result<()> {
        Ok(())
    }

    async fn wait_ready(&mut self, _timeout: Duration) -> bool {
        self.ready_calls += 1;
        match self.ready_calls {
            1 => !self.fails_at(FailPoint::ReadyAfterPaste),
            _ => !self.fails_at(FailPoint::QueryReady),
        }
    }

    async fn wait_visible(&mut self, selector: &Selector, _timeout: Duration) -> Option<Handle> {
        let title = match &selector.title {
            TitleMatch::Exact(title) | TitleMatch::Pattern(title) => title.clone(),
        };
        self.waited.push(title.clone());
        if self.absent.contains(&title) {
            return None;
        }
        if selector.role == Role::Edit && !self.input_field_present {
            return None;
        }
        if matches!(&selector.title, TitleMatch::Exact(t) if t == "消息提示") {
            if self.fails_at(FailPoint::Ack) {
                return None;
            }
            if let Some(input) = self.current.clone() {
                self.completed.push(input);
            }
            return Some(Handle("notice".to_string()));
        }
        if self.fails_at(FailPoint::SaveDialog) {
            None
        } else {
            Some(Handle("save".to_string()))
        }
    }

    async fn reset_to_known_state(&mut self) -> bool {
        self.resets += 1;
        self.current = None;
        self.reset_succeeds
    }
}

pub fn sku_flow() -> SkuDownloadFlow {
    SkuDownloadFlow::new(ControlLocator::new(SelectorTable::default()), Timings::immediate())
}

pub fn executor() -> TaskExecutor {
    TaskExecutor::new(RetryPolicy::new(3, Duration::ZERO))
}

pub fn coordinator() -> RunCoordinator {
    RunCoordinator::new(executor(), SplitEscalation::new(3), Duration::ZERO)
}
