// crates/rosi_foundation/src/error.rs

//! 统一错误类型
//!
//! 各层的错误（`GridError`、`GrowthError`、`ConfigError`、`CouplingError`）
//! 在各自的 crate 中定义，并都能转换为 [`RosiError`]。生长模型与网格之间
//! 的契约违反单独成类，调用方据此决定终止运行。

use thiserror::Error;

/// 统一结果类型
pub type RosiResult<T> = Result<T, RosiError>;

/// RoSi 错误类型
#[derive(Error, Debug)]
pub enum RosiError {
    // ========================================================================
    // IO
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<std::io::Error>,
    },

    // ========================================================================
    // 数据与拓扑
    // ========================================================================
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 原因
        message: String,
    },

    /// 长度不一致，如解向量与单元数
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 长度
        len: usize,
    },

    /// 线网格拓扑错误
    #[error("无效的网格拓扑: {message}")]
    InvalidMesh {
        /// 原因
        message: String,
    },

    /// 生长模型与网格之间的契约被破坏，不可重试
    #[error("契约违反 [{contract}]: {message}")]
    ContractViolation {
        /// 契约名称
        contract: &'static str,
        /// 详情
        message: String,
    },

    // ========================================================================
    // 配置
    // ========================================================================
    /// 配置无法解析
    #[error("配置错误: {message}")]
    Config {
        /// 原因
        message: String,
    },

    /// 缺少配置项
    #[error("缺少必需的配置项: {key}")]
    MissingConfig {
        /// 键名
        key: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 键名
        key: String,
        /// 值
        value: String,
        /// 原因
        reason: String,
    },

    // ========================================================================
    // 其他
    // ========================================================================
    /// 验证报告中有错误
    #[error("验证失败: {0}")]
    Validation(String),

    /// 查找失败
    #[error("资源未找到: {resource}")]
    NotFound {
        /// 资源描述
        resource: String,
    },

    /// 内部状态不一致
    #[error("内部错误: {message}")]
    Internal {
        /// 描述
        message: String,
    },
}

impl RosiError {
    /// IO 错误，保留底层错误
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 长度不一致
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 网格拓扑错误
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 契约违反
    pub fn contract_violation(contract: &'static str, message: impl Into<String>) -> Self {
        Self::ContractViolation {
            contract,
            message: message.into(),
        }
    }

    /// 配置无法解析
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 缺少配置项
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 验证失败
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 查找失败
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 是否为契约违反
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }

    /// `expected == actual`，否则 `SizeMismatch`
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> RosiResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::size_mismatch(name, expected, actual))
        }
    }

    /// `index < len`，否则 `IndexOutOfBounds`
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> RosiResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::index_out_of_bounds(index_type, index, len))
        }
    }
}

impl From<std::io::Error> for RosiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
