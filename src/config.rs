use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// 运行模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkMode {
    /// 批量查询并下载 SKU 数据
    SkuDownload,
    /// 批量发布视频
    VideoPublish,
}

impl FromStr for WorkMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sku" | "sku_download" => Ok(WorkMode::SkuDownload),
            "publish" | "video_publish" => Ok(WorkMode::VideoPublish),
            other => Err(ConfigError::UnknownWorkMode {
                value: other.to_string(),
            }),
        }
    }
}

impl WorkMode {
    /// 统计输出中"总数"一行的名称
    pub fn total_label(&self) -> &'static str {
        match self {
            WorkMode::SkuDownload => "总SKU数",
            WorkMode::VideoPublish => "总记录数",
        }
    }
}

/// 登录表单使用的花名和密码
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"******")
            .finish()
    }
}

/// 各步骤的超时与等待时间
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timings {
    /// 粘贴输入后等待界面就绪
    pub ready_timeout: Duration,
    /// 点击查询后等待界面就绪
    pub query_timeout: Duration,
    /// 等待保存文件对话框出现
    pub save_dialog_timeout: Duration,
    /// 确认保存后的固定等待
    pub save_settle: Duration,
    /// 等待"消息提示"对话框（外部处理时间不定，给足时间）
    pub acknowledgment_timeout: Duration,
    /// 粘贴后的固定等待
    pub paste_settle: Duration,
    /// 普通点击后的固定等待
    pub click_settle: Duration,
    /// 页面加载等待（启动导航和发布流程）
    pub load_timeout: Duration,
    /// 判断登录表单是否出现的等待
    pub login_wait_timeout: Duration,
    /// 两个条目之间的固定间隔
    pub inter_item_delay: Duration,
    /// 重试前的基础等待
    pub retry_base_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(3),
            query_timeout: Duration::from_secs(300),
            save_dialog_timeout: Duration::from_secs(30),
            save_settle: Duration::from_secs(5),
            acknowledgment_timeout: Duration::from_secs(1800),
            paste_settle: Duration::from_secs(1),
            click_settle: Duration::from_millis(500),
            load_timeout: Duration::from_secs(30),
            login_wait_timeout: Duration::from_secs(2),
            inter_item_delay: Duration::from_secs(5),
            retry_base_delay: Duration::from_secs(5),
        }
    }
}

impl Timings {
    /// 所有等待都为零，超时保持很短（用于测试和演练）
    pub fn immediate() -> Self {
        Self {
            ready_timeout: Duration::from_millis(10),
            query_timeout: Duration::from_millis(10),
            save_dialog_timeout: Duration::from_millis(10),
            save_settle: Duration::ZERO,
            acknowledgment_timeout: Duration::from_millis(10),
            paste_settle: Duration::ZERO,
            click_settle: Duration::ZERO,
            load_timeout: Duration::from_millis(10),
            login_wait_timeout: Duration::from_millis(10),
            inter_item_delay: Duration::ZERO,
            retry_base_delay: Duration::ZERO,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 运行模式
    pub work_mode: WorkMode,
    /// 数据源路径（SKU 模式为 CSV，发布模式为 Excel 或 CSV 模板）
    pub work_source_path: String,
    /// SKU 所在列名
    pub sku_column: String,
    /// 目标窗口标题
    pub target_window_title: String,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 登录信息；未配置时跳过登录表单
    pub credentials: Option<Credentials>,
    /// 恢复时导航回的起始页（为空则刷新当前页）
    pub start_url: Option<String>,
    /// 视频文件目录
    pub video_folder: String,
    /// 控件选择器表（TOML，可选）
    pub selectors_file: Option<String>,
    /// 单个输入的最大尝试次数
    pub max_retries: usize,
    /// 失败后拆分的份数
    pub split_parts: usize,
    /// 重试等待的增长倍数
    pub retry_backoff_factor: u32,
    /// 重试等待上限
    pub retry_max_delay: Duration,
    /// 各种超时与等待
    pub timings: Timings,
    /// 输出日志文件
    pub output_log_file: String,
    /// 失败条目记录文件
    pub failure_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_mode: WorkMode::SkuDownload,
            work_source_path: "需下载牛牛数据4.csv".to_string(),
            sku_column: "系统SKU".to_string(),
            target_window_title: "数据管理部工具台".to_string(),
            browser_debug_port: 9222,
            credentials: None,
            start_url: None,
            video_folder: "视频文件".to_string(),
            selectors_file: None,
            max_retries: 3,
            split_parts: 3,
            retry_backoff_factor: 1,
            retry_max_delay: Duration::from_secs(60),
            timings: Timings::default(),
            output_log_file: "output.txt".to_string(),
            failure_file: Some("failed.txt".to_string()),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        let t = default.timings.clone();
        let config = Self {
            work_mode: match std::env::var("WORK_MODE") {
                Ok(v) => v.parse()?,
                Err(_) => default.work_mode,
            },
            work_source_path: std::env::var("WORK_SOURCE_PATH").unwrap_or(default.work_source_path),
            sku_column: std::env::var("SKU_COLUMN").unwrap_or(default.sku_column),
            target_window_title: std::env::var("TARGET_WINDOW_TITLE").unwrap_or(default.target_window_title),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            credentials: match (std::env::var("LOGIN_NAME"), std::env::var("LOGIN_PASSWORD")) {
                (Ok(name), Ok(password)) if !name.trim().is_empty() => Some(Credentials { name, password }),
                _ => default.credentials,
            },
            start_url: std::env::var("START_URL").ok().filter(|v| !v.trim().is_empty()).or(default.start_url),
            video_folder: std::env::var("VIDEO_FOLDER").unwrap_or(default.video_folder),
            selectors_file: std::env::var("SELECTORS_FILE").ok().filter(|v| !v.trim().is_empty()).or(default.selectors_file),
            max_retries: std::env::var("MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_retries),
            split_parts: std::env::var("SPLIT_PARTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.split_parts),
            retry_backoff_factor: std::env::var("RETRY_BACKOFF_FACTOR").ok().and_then(|v| v.parse().ok()).unwrap_or(default.retry_backoff_factor),
            retry_max_delay: env_millis("RETRY_MAX_DELAY_MS").unwrap_or(default.retry_max_delay),
            timings: Timings {
                ready_timeout: env_millis("READY_TIMEOUT_MS").unwrap_or(t.ready_timeout),
                query_timeout: env_millis("QUERY_TIMEOUT_MS").unwrap_or(t.query_timeout),
                save_dialog_timeout: env_millis("SAVE_DIALOG_TIMEOUT_MS").unwrap_or(t.save_dialog_timeout),
                save_settle: env_millis("SAVE_SETTLE_MS").unwrap_or(t.save_settle),
                acknowledgment_timeout: env_millis("ACK_TIMEOUT_MS").unwrap_or(t.acknowledgment_timeout),
                paste_settle: env_millis("PASTE_SETTLE_MS").unwrap_or(t.paste_settle),
                click_settle: env_millis("CLICK_SETTLE_MS").unwrap_or(t.click_settle),
                load_timeout: env_millis("LOAD_TIMEOUT_MS").unwrap_or(t.load_timeout),
                login_wait_timeout: env_millis("LOGIN_WAIT_TIMEOUT_MS").unwrap_or(t.login_wait_timeout),
                inter_item_delay: env_millis("INTER_ITEM_DELAY_MS").unwrap_or(t.inter_item_delay),
                retry_base_delay: env_millis("RETRY_BASE_DELAY_MS").unwrap_or(t.retry_base_delay),
            },
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            failure_file: match std::env::var("FAILURE_FILE") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v),
                Err(_) => default.failure_file,
            },
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::MustBePositive {
                field: "MAX_RETRIES".to_string(),
            });
        }
        if self.split_parts == 0 {
            return Err(ConfigError::MustBePositive {
                field: "SPLIT_PARTS".to_string(),
            });
        }
        Ok(())
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.split_parts, 3);
        assert_eq!(config.sku_column, "系统SKU");
    }

    #[test]
    fn zero_retries_is_rejected() {
        let config = Config {
            max_retries: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MustBePositive {
                field: "MAX_RETRIES".to_string()
            })
        );
    }

    #[test]
    fn zero_split_parts_is_rejected() {
        let config = Config {
            split_parts: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn work_mode_parses_aliases() {
        assert_eq!("sku".parse::<WorkMode>(), Ok(WorkMode::SkuDownload));
        assert_eq!(" Publish ".parse::<WorkMode>(), Ok(WorkMode::VideoPublish));
        assert!("excel".parse::<WorkMode>().is_err());
    }

    #[test]
    fn total_label_follows_mode() {
        assert_eq!(WorkMode::SkuDownload.total_label(), "总SKU数");
        assert_eq!(WorkMode::VideoPublish.total_label(), "总记录数");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            name: "Cloris".to_string(),
            password: "secret-pass".to_string(),
        };
        let text = format!("{:?}", credentials);
        assert!(text.contains("Cloris"));
        assert!(!text.contains("secret-pass"));
    }

    #[test]
    fn acknowledgment_wait_is_the_longest() {
        let t = Timings::default();
        assert!(t.acknowledgment_timeout > t.query_timeout);
        assert!(t.acknowledgment_timeout > t.save_dialog_timeout);
    }
}
