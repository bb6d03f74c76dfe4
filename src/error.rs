use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 启动阶段的致命错误（中止整个运行）
    Setup(SetupError),
    /// 浏览器 / 会话相关错误
    Browser(BrowserError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Setup(e) => write!(f, "启动失败: {}", e),
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Setup(e) => Some(e),
            AppError::Browser(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
        }
    }
}

/// 启动阶段错误
///
/// 任何一种都会在处理第一个条目之前中止运行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// 数据源文件不存在
    WorkSourceMissing { path: String },
    /// 数据源中没有任何有效记录
    WorkSourceEmpty { path: String },
    /// 找不到目标窗口
    WindowNotFound { title: String },
    /// 视频文件夹不存在
    VideoFolderMissing { path: String },
    /// 表格缺少必需的列
    MissingColumns { path: String, columns: Vec<String> },
    /// 启动导航后找不到必需的控件
    ControlNotFound { control: String },
    /// 启动导航中途失败
    NavigationFailed { control: String, message: String },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::WorkSourceMissing { path } => write!(f, "找不到数据源文件: {}", path),
            SetupError::WorkSourceEmpty { path } => {
                write!(f, "数据源中没有找到有效记录: {}", path)
            }
            SetupError::WindowNotFound { title } => {
                write!(f, "找不到标题为 '{}' 的窗口", title)
            }
            SetupError::VideoFolderMissing { path } => write!(f, "视频文件夹不存在: {}", path),
            SetupError::MissingColumns { path, columns } => {
                write!(f, "表格 {} 缺少必要的列: {}", path, columns.join(", "))
            }
            SetupError::ControlNotFound { control } => write!(f, "未找到控件 '{}'", control),
            SetupError::NavigationFailed { control, message } => {
                write!(f, "导航到 '{}' 时失败: {}", control, message)
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 连接调试端口失败
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 列出页面失败
    PageListFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConnectionFailed { port, source } => {
                write!(f, "无法连接到浏览器 (端口: {}): {}", port, source)
            }
            BrowserError::PageListFailed { source } => {
                write!(f, "获取页面列表失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::ConnectionFailed { source, .. } | BrowserError::PageListFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// CSV 解析失败
    CsvParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Excel 表格解析失败
    SheetParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            FileError::CsvParseFailed { path, source } => {
                write!(f, "CSV解析失败 ({}): {}", path, source)
            }
            FileError::SheetParseFailed { path, source } => {
                write!(f, "Excel解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. }
            | FileError::CsvParseFailed { source, .. }
            | FileError::SheetParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 数值必须大于零
    MustBePositive { field: String },
    /// 未知的运行模式
    UnknownWorkMode { value: String },
    /// 控件选择器的正则表达式无效
    InvalidSelectorPattern { name: String, pattern: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MustBePositive { field } => write!(f, "配置项 {} 必须大于 0", field),
            ConfigError::UnknownWorkMode { value } => {
                write!(f, "未知的运行模式 '{}'，可选值: sku / publish", value)
            }
            ConfigError::InvalidSelectorPattern { name, pattern } => {
                write!(f, "选择器 {} 的正则表达式无效: {}", name, pattern)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========

impl From<SetupError> for AppError {
    fn from(err: SetupError) -> Self {
        AppError::Setup(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 CSV 解析错误
    pub fn csv_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::CsvParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 Excel 解析错误
    pub fn sheet_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::SheetParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否属于启动阶段的致命错误
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, AppError::Setup(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_errors_are_fatal() {
        let err: AppError = SetupError::WindowNotFound {
            title: "数据管理部工具台".to_string(),
        }
        .into();
        assert!(err.is_fatal_setup());
        assert!(err.to_string().contains("数据管理部工具台"));
    }

    #[test]
    fn missing_columns_are_listed() {
        let err: AppError = SetupError::MissingColumns {
            path: "发布.xlsx".to_string(),
            columns: vec!["账号".to_string(), "描述".to_string()],
        }
        .into();
        assert!(err.is_fatal_setup());
        assert_eq!(err.to_string(), "启动失败: 表格 发布.xlsx 缺少必要的列: 账号, 描述");
    }

    #[test]
    fn write_failures_keep_the_path() {
        let err = AppError::file_write_failed(
            "failed.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_fatal_setup());
        assert!(err.to_string().contains("failed.txt"));
    }

    #[test]
    fn config_errors_are_not_setup_errors() {
        let err: AppError = ConfigError::MustBePositive {
            field: "MAX_RETRIES".to_string(),
        }
        .into();
        assert!(!err.is_fatal_setup());
        assert_eq!(err.to_string(), "配置错误: 配置项 MAX_RETRIES 必须大于 0");
    }
}
