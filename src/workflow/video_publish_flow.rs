//! 视频发布流程 - 流程层
//!
//! 流程顺序：
//! 1. 打开发布页 → 新建发布
//! 2. 上传视频（在文件对话框里粘贴路径）
//! 3. 选择账号
//! 4. 填写标题 / 描述 / 位置 / 定时
//! 5. 点击发布

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;

use crate::config::Timings;
use crate::infrastructure::{paste_text, Handle, Role, Selector, UiDriver};
use crate::models::selector_table::{
    ACCOUNT_PICKER, DESCRIPTION_INPUT, FILE_NAME_INPUT, LOCATION_INPUT, NEW_PUBLISH_BUTTON,
    PUBLISH_MENU, PUBLISH_SUBMIT, SCHEDULE_INPUT, SCHEDULE_TOGGLE, TITLE_INPUT, UPLOAD_AREA,
};
use crate::models::{PublishFields, WorkItem};
use crate::services::{find_video_file, ControlLocator};
use crate::workflow::attempt::{Step, StepFailure};
use crate::workflow::flow::Workflow;

pub struct VideoPublishFlow {
    locator: ControlLocator,
    timings: Timings,
    video_folder: PathBuf,
}

impl VideoPublishFlow {
    pub fn new(locator: ControlLocator, timings: Timings, video_folder: impl Into<PathBuf>) -> Self {
        Self {
            locator,
            timings,
            video_folder: video_folder.into(),
        }
    }

    async fn click_named(
        &self,
        driver: &mut dyn UiDriver,
        name: &str,
        step: Step,
    ) -> Result<Handle, StepFailure> {
        let handle = self
            .locator
            .resolve(driver, name)
            .await
            .ok_or_else(|| StepFailure::ControlMissing {
                step,
                control: name.to_string(),
            })?;
        driver
            .click(&handle)
            .await
            .map_err(|e| StepFailure::driver(step, e))?;
        sleep(self.timings.click_settle).await;
        Ok(handle)
    }

    async fn fill_named(
        &self,
        driver: &mut dyn UiDriver,
        name: &str,
        text: &str,
    ) -> Result<(), StepFailure> {
        let handle = self
            .locator
            .resolve(driver, name)
            .await
            .ok_or_else(|| StepFailure::ControlMissing {
                step: Step::FillInfo,
                control: name.to_string(),
            })?;
        paste_text(driver, &handle, text)
            .await
            .map_err(|e| StepFailure::driver(Step::FillInfo, e))?;
        sleep(self.timings.paste_settle).await;
        Ok(())
    }

    async fn wait_loaded(
        &self,
        driver: &mut dyn UiDriver,
        step: Step,
        timeout: Duration,
    ) -> Result<(), StepFailure> {
        if driver.wait_ready(timeout).await {
            Ok(())
        } else {
            Err(StepFailure::ReadyTimeout { step })
        }
    }

    async fn select_video(&self, driver: &mut dyn UiDriver, video_path: &str) -> Result<(), StepFailure> {
        self.click_named(driver, UPLOAD_AREA, Step::SelectVideo).await?;
        let file_input = self
            .locator
            .wait_for(driver, FILE_NAME_INPUT, self.timings.load_timeout)
            .await
            .ok_or_else(|| StepFailure::ControlMissing {
                step: Step::SelectVideo,
                control: FILE_NAME_INPUT.to_string(),
            })?;
        paste_text(driver, &file_input, video_path)
            .await
            .map_err(|e| StepFailure::driver(Step::SelectVideo, e))?;
        driver
            .send_enter(&file_input)
            .await
            .map_err(|e| StepFailure::driver(Step::SelectVideo, e))?;
        self.wait_loaded(driver, Step::SelectVideo, self.timings.load_timeout)
            .await
    }

    async fn select_account(&self, driver: &mut dyn UiDriver, account: &str) -> Result<(), StepFailure> {
        let picker = self
            .click_named(driver, ACCOUNT_PICKER, Step::SelectAccount)
            .await?;
        paste_text(driver, &picker, account)
            .await
            .map_err(|e| StepFailure::driver(Step::SelectAccount, e))?;
        let option = driver
            .wait_visible(
                &Selector::exact(Role::ListItem, account),
                self.timings.load_timeout,
            )
            .await
            .ok_or_else(|| StepFailure::ControlMissing {
                step: Step::SelectAccount,
                control: account.to_string(),
            })?;
        driver
            .click(&option)
            .await
            .map_err(|e| StepFailure::driver(Step::SelectAccount, e))?;
        sleep(self.timings.click_settle).await;
        Ok(())
    }

    async fn fill_info(&self, driver: &mut dyn UiDriver, fields: &PublishFields) -> Result<(), StepFailure> {
        self.fill_named(driver, TITLE_INPUT, &fields.title).await?;
        if !fields.description.is_empty() {
            self.fill_named(driver, DESCRIPTION_INPUT, &fields.description)
                .await?;
        }
        if let Some(location) = &fields.location {
            self.fill_named(driver, LOCATION_INPUT, location).await?;
        }
        if let Some(schedule_time) = &fields.schedule_time {
            self.click_named(driver, SCHEDULE_TOGGLE, Step::FillInfo)
                .await?;
            self.fill_named(driver, SCHEDULE_INPUT, schedule_time).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Workflow for VideoPublishFlow {
    fn name(&self) -> &str {
        "视频发布"
    }

    fn supports_split(&self) -> bool {
        false
    }

    async fn run_once(&self, driver: &mut dyn UiDriver, item: &WorkItem) -> Result<(), StepFailure> {
        let fields = item
            .fields
            .as_ref()
            .ok_or(StepFailure::MissingPublishFields)?;
        let video_path = find_video_file(&self.video_folder, &fields.video_name).ok_or_else(|| {
            StepFailure::VideoFileMissing {
                video_name: fields.video_name.clone(),
            }
        })?;
        let video_path = video_path.to_string_lossy().to_string();

        self.click_named(driver, PUBLISH_MENU, Step::OpenPublisher)
            .await?;
        self.wait_loaded(driver, Step::OpenPublisher, self.timings.load_timeout)
            .await?;
        self.click_named(driver, NEW_PUBLISH_BUTTON, Step::OpenPublisher)
            .await?;
        self.wait_loaded(driver, Step::OpenPublisher, self.timings.load_timeout)
            .await?;

        self.select_video(driver, &video_path).await?;
        info!("已选择视频: {}", fields.video_name);

        self.select_account(driver, &fields.account).await?;
        info!("已选择账号: {}", fields.account);

        self.fill_info(driver, fields).await?;

        // 发布需要等待较长时间
        self.click_named(driver, PUBLISH_SUBMIT, Step::Publish).await?;
        self.wait_loaded(driver, Step::Publish, self.timings.load_timeout * 2)
            .await?;
        info!("成功发布: {}", fields.video_name);

        Ok(())
    }
}
