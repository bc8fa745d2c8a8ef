//! DiagnosticLevel - 诊断级别
//!
//! 语法检查只有两种级别：错误（语法诊断、词法错误、分析中止）
//! 以及跟在错误后面的说明。

use ariadne::{Color, ReportKind};
use colored::*;
use std::fmt;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// 程序不合乎文法，或分析无法继续
    Error,
    /// 补充说明，例如分析器在何处放弃
    Note,
}

impl DiagnosticLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Note => "note",
        }
    }

    /// 终端输出用
    pub fn colored_name(&self) -> ColoredString {
        match self {
            Self::Error => self.name().red().bold(),
            Self::Note => self.name().bright_black().bold(),
        }
    }

    /// 源码报告的标题种类
    pub fn report_kind(&self) -> ReportKind<'static> {
        match self {
            Self::Error => ReportKind::Error,
            Self::Note => ReportKind::Advice,
        }
    }

    /// 源码报告中标注记号的颜色
    pub fn label_color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Note => Color::Blue,
        }
    }

    /// 计入 [`crate::DiagnosticSink::error_count`] 的级别
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
