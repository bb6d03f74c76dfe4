//! SKU 查询下载流程 - 流程层
//!
//! 流程顺序：
//! 1. 清空输入框并粘贴 SKU
//! 2. 等待界面就绪
//! 3. 点击查询并等待结果
//! 4. 点击"只下载自己站点数据"
//! 5. 确认保存文件对话框
//! 6. 等待"消息提示"并确认两次

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Timings;
use crate::infrastructure::{paste_text, UiDriver};
use crate::models::selector_table::{
    DOWNLOAD_LINK, INPUT_FIELD, MESSAGE_DIALOG, QUERY_BUTTON, SAVE_DIALOG,
};
use crate::models::WorkItem;
use crate::services::ControlLocator;
use crate::workflow::attempt::{Step, StepFailure};
use crate::workflow::flow::Workflow;

pub struct SkuDownloadFlow {
    locator: ControlLocator,
    timings: Timings,
}

impl SkuDownloadFlow {
    pub fn new(locator: ControlLocator, timings: Timings) -> Self {
        Self { locator, timings }
    }
}

#[async_trait]
impl Workflow for SkuDownloadFlow {
    fn name(&self) -> &str {
        "SKU查询下载"
    }

    fn supports_split(&self) -> bool {
        true
    }

    async fn run_once(&self, driver: &mut dyn UiDriver, item: &WorkItem) -> Result<(), StepFailure> {
        let sku = item.id.as_str();

        // 1. 粘贴 SKU
        let input_box = self
            .locator
            .resolve(driver, INPUT_FIELD)
            .await
            .ok_or(StepFailure::InputFieldMissing)?;
        paste_text(driver, &input_box, sku)
            .await
            .map_err(|e| StepFailure::driver(Step::SubmitInput, e))?;
        sleep(self.timings.paste_settle).await;
        info!("成功粘贴SKU: {}", sku);

        // 2. 等待就绪
        if !driver.wait_ready(self.timings.ready_timeout).await {
            return Err(StepFailure::QueryTimeout {
                step: Step::WaitReady,
            });
        }

        // 3. 查询
        let query_button = self
            .locator
            .resolve(driver, QUERY_BUTTON)
            .await
            .ok_or(StepFailure::QueryControlMissing)?;
        driver
            .click(&query_button)
            .await
            .map_err(|e| StepFailure::driver(Step::TriggerQuery, e))?;
        if !driver.wait_ready(self.timings.query_timeout).await {
            return Err(StepFailure::QueryTimeout {
                step: Step::TriggerQuery,
            });
        }

        // 4. 下载
        let download_link = self
            .locator
            .resolve(driver, DOWNLOAD_LINK)
            .await
            .ok_or(StepFailure::ConfirmationControlMissing)?;
        driver
            .click(&download_link)
            .await
            .map_err(|e| StepFailure::driver(Step::Download, e))?;
        info!("成功点击'只下载自己站点数据'，SKU: {}", sku);

        // 5. 保存文件
        let save_dialog = self
            .locator
            .wait_for(driver, SAVE_DIALOG, self.timings.save_dialog_timeout)
            .await
            .ok_or(StepFailure::SaveDialogTimeout)?;
        driver
            .send_enter(&save_dialog)
            .await
            .map_err(|e| StepFailure::driver(Step::SaveDialog, e))?;
        debug!("已确认保存文件，SKU: {}", sku);
        sleep(self.timings.save_settle).await;

        // 6. 消息提示：工具台要求确认两次
        let notice = self
            .locator
            .wait_for(driver, MESSAGE_DIALOG, self.timings.acknowledgment_timeout)
            .await
            .ok_or(StepFailure::AcknowledgmentTimeout)?;
        for _ in 0..2 {
            driver
                .send_enter(&notice)
                .await
                .map_err(|e| StepFailure::driver(Step::Acknowledge, e))?;
        }
        info!("已确认'消息提示'，SKU: {}", sku);

        Ok(())
    }
}
