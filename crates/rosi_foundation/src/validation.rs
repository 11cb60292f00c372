// crates/rosi_foundation/src/validation.rs

//! 运行时验证报告
//!
//! 用于配置检查和网格一致性检查，收集全部问题后一次性报告，
//! 而不是在第一个问题处返回。
//!
//! ```
//! use rosi_foundation::validation::{ValidationIssue, ValidationReport};
//!
//! let mut report = ValidationReport::new();
//! report.add_error(ValidationIssue::new("root.radius", "必须为正"));
//! assert!(!report.is_valid());
//! ```

use crate::error::{RosiError, RosiResult};
use std::fmt;

/// 单条验证问题
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// 字段路径，如 `coupling.sigma`
    pub field: String,
    /// 问题描述
    pub message: String,
}

impl ValidationIssue {
    /// 创建
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 非有限值
    pub fn non_finite(field: impl Into<String>, value: f64) -> Self {
        Self::new(field, format!("非有限值 {value}"))
    }

    /// 超出范围
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self::new(field, format!("{value} 不在 [{min}, {max}] 内"))
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 验证报告
#[derive(Debug, Default, Clone)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationIssue>,
    /// 警告列表
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// 创建空的验证报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加错误
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    /// 添加警告
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// 值必须有限且位于 `[min, max]`
    pub fn check_range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !value.is_finite() {
            self.add_error(ValidationIssue::non_finite(field, value));
        } else if value < min || value > max {
            self.add_error(ValidationIssue::out_of_range(field, value, min, max));
        }
    }

    /// 值必须有限且严格为正
    pub fn check_positive(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.add_error(ValidationIssue::non_finite(field, value));
        } else if value <= 0.0 {
            self.add_error(ValidationIssue::new(field, format!("必须为正，实际 {value}")));
        }
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 是否通过（无错误）
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// 合并另一个报告
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// 有错误时转换为 `RosiError::Validation`
    pub fn into_result(self) -> RosiResult<Self> {
        if self.has_errors() {
            let joined = self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(RosiError::validation(joined))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "验证报告:")?;
        writeln!(f, "  错误: {} 个", self.errors.len())?;
        writeln!(f, "  警告: {} 个", self.warnings.len())?;

        for (i, err) in self.errors.iter().enumerate() {
            writeln!(f, "  E{}. {}", i + 1, err)?;
        }
        for (i, warn) in self.warnings.iter().enumerate() {
            writeln!(f, "  W{}. {}", i + 1, warn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_check_range_and_positive() {
        let mut report = ValidationReport::new();
        report.check_range("sigma", 0.5, 0.0, 1.0);
        report.check_positive("dt", 1.0);
        assert!(report.is_valid());

        report.check_range("sigma", 1.5, 0.0, 1.0);
        report.check_positive("dt", 0.0);
        report.check_positive("radius", f64::NAN);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[2].message.contains("非有限"));
    }

    #[test]
    fn test_merge_and_into_result() {
        let mut a = ValidationReport::new();
        a.add_warning(ValidationIssue::new("output", "未设置"));
        let mut b = ValidationReport::new();
        b.add_error(ValidationIssue::new("root.kr", "负值"));
        a.merge(b);
        assert!(a.has_warnings());
        let err = a.into_result().unwrap_err();
        assert!(err.to_string().contains("root.kr"));
    }
}
