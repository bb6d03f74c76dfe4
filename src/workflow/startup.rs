//! 启动导航 - 流程层
//!
//! 连接目标窗口后把界面带到流程的起始页面：
//! 广告后台 → 销售人员登录通道 → (登录) → 工具栏 → 共享关键词 → 输入框
//!
//! 重试前恢复界面时，页面重置之后会再走一遍同样的导航。

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::config::{Credentials, Timings, WorkMode};
use crate::error::SetupError;
use crate::infrastructure::{Handle, UiDriver};
use crate::models::selector_table::{
    AD_BACKEND_LINK, INPUT_FIELD, LOGIN_NAME_INPUT, LOGIN_PASSWORD_INPUT, LOGIN_SUBMIT,
    SALES_LOGIN_LINK, SHARED_KEYWORDS_ENTRY, TOOLBAR_LINK,
};
use crate::services::ControlLocator;

/// 导航中的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    /// 等控件出现后点击，再等待界面就绪
    Open(&'static str),
    /// 登录表单出现时填写并提交；没有表单就跳过
    Login,
    /// 控件必须存在，否则流程无法开始
    Require(&'static str),
}

#[derive(Debug, Clone)]
pub struct StartupSequence {
    locator: ControlLocator,
    steps: Vec<NavStep>,
    credentials: Option<Credentials>,
    timings: Timings,
}

impl StartupSequence {
    pub fn new(
        locator: ControlLocator,
        steps: Vec<NavStep>,
        credentials: Option<Credentials>,
        timings: Timings,
    ) -> Self {
        Self {
            locator,
            steps,
            credentials,
            timings,
        }
    }

    /// 按运行模式选择导航；发布流程每条记录自己从菜单进入，不需要导航
    pub fn for_mode(
        mode: WorkMode,
        locator: ControlLocator,
        credentials: Option<Credentials>,
        timings: Timings,
    ) -> Self {
        let steps = match mode {
            WorkMode::SkuDownload => sku_download_steps(),
            WorkMode::VideoPublish => Vec::new(),
        };
        Self::new(locator, steps, credentials, timings)
    }

    pub fn steps(&self) -> &[NavStep] {
        &self.steps
    }

    /// 依次执行全部导航步骤，任何一步失败都立即返回
    pub async fn run(&self, driver: &mut dyn UiDriver) -> Result<(), SetupError> {
        for step in &self.steps {
            debug!("启动导航: {:?}", step);
            match *step {
                NavStep::Open(name) => self.open(driver, name).await?,
                NavStep::Login => self.login(driver).await,
                NavStep::Require(name) => self.require(driver, name).await?,
            }
        }
        if !self.steps.is_empty() {
            info!("✓ 已进入流程起始页面");
        }
        Ok(())
    }

    async fn open(&self, driver: &mut dyn UiDriver, name: &str) -> Result<(), SetupError> {
        let handle = self
            .locator
            .wait_for(driver, name, self.timings.load_timeout)
            .await
            .ok_or_else(|| SetupError::NavigationFailed {
                control: name.to_string(),
                message: "等待控件出现超时".to_string(),
            })?;
        driver
            .click(&handle)
            .await
            .map_err(|e| SetupError::NavigationFailed {
                control: name.to_string(),
                message: e.to_string(),
            })?;
        info!("已点击 {}", name);
        if !driver.wait_ready(self.timings.ready_timeout).await {
            warn!("点击 {} 后界面未在 {:?} 内就绪，继续导航", name, self.timings.ready_timeout);
        }
        Ok(())
    }

    // 登录出错只记录日志，后续导航会暴露真正的问题
    async fn login(&self, driver: &mut dyn UiDriver) {
        let Some(name_input) = self
            .locator
            .wait_for(driver, LOGIN_NAME_INPUT, self.timings.login_wait_timeout)
            .await
        else {
            info!("没有找到花名输入框，跳过登录");
            return;
        };
        let Some(credentials) = &self.credentials else {
            warn!("出现登录表单但未配置 LOGIN_NAME / LOGIN_PASSWORD，跳过登录");
            return;
        };

        match self.fill_login(driver, &name_input, credentials).await {
            Ok(()) => info!("已输入花名、密码并提交"),
            Err(e) => warn!("登录操作时出错: {}", e),
        }
        driver.wait_ready(self.timings.ready_timeout).await;
    }

    async fn fill_login(
        &self,
        driver: &mut dyn UiDriver,
        name_input: &Handle,
        credentials: &Credentials,
    ) -> anyhow::Result<()> {
        driver.set_text(name_input, &credentials.name).await?;
        let password_input = self
            .locator
            .resolve(driver, LOGIN_PASSWORD_INPUT)
            .await
            .ok_or_else(|| anyhow!("未找到密码输入框"))?;
        driver.set_text(&password_input, &credentials.password).await?;
        let submit = self
            .locator
            .resolve(driver, LOGIN_SUBMIT)
            .await
            .ok_or_else(|| anyhow!("未找到提交按钮"))?;
        driver.click(&submit).await
    }

    async fn require(&self, driver: &mut dyn UiDriver, name: &str) -> Result<(), SetupError> {
        let found = match self
            .locator
            .wait_for(driver, name, self.timings.ready_timeout)
            .await
        {
            Some(handle) => Some(handle),
            None => self.locator.resolve(driver, name).await,
        };
        match found {
            Some(_) => Ok(()),
            None => Err(SetupError::ControlNotFound {
                control: name.to_string(),
            }),
        }
    }
}

fn sku_download_steps() -> Vec<NavStep> {
    vec![
        NavStep::Open(AD_BACKEND_LINK),
        NavStep::Open(SALES_LOGIN_LINK),
        NavStep::Login,
        NavStep::Open(TOOLBAR_LINK),
        NavStep::Open(SHARED_KEYWORDS_ENTRY),
        NavStep::Require(INPUT_FIELD),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectorTable;

    fn sequence(mode: WorkMode) -> StartupSequence {
        StartupSequence::for_mode(
            mode,
            ControlLocator::new(SelectorTable::default()),
            None,
            Timings::immediate(),
        )
    }

    #[test]
    fn sku_navigation_ends_at_the_input_field() {
        let seq = sequence(WorkMode::SkuDownload);
        assert_eq!(seq.steps().first(), Some(&NavStep::Open(AD_BACKEND_LINK)));
        assert_eq!(seq.steps().last(), Some(&NavStep::Require(INPUT_FIELD)));
        assert!(seq.steps().contains(&NavStep::Login));
    }

    #[test]
    fn publish_mode_has_no_navigation() {
        assert!(sequence(WorkMode::VideoPublish).steps().is_empty());
    }
}
