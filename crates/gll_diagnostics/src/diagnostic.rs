//! Diagnostic - 诊断信息
//!
//! 表示一条带行号的语法检查结果

use crate::level::DiagnosticLevel;

/// 源码位置范围 (字节偏移)
pub type Span = std::ops::Range<usize>;

/// 诊断信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 主要消息（原样输出，不做改写）
    pub message: String,
    /// 1 起始的源码行号（可选）
    pub line: Option<usize>,
    /// 出错记号的字节范围（可选）
    pub span: Option<Span>,
    /// 补充注释
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// 创建新的诊断
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            span: None,
            notes: Vec::new(),
        }
    }

    /// 创建错误诊断
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, message)
    }

    /// 创建注释诊断
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Note, message)
    }

    /// 设置行号
    pub fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置位置信息
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// 添加注释
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::error("Error at line 2: Expected LPAREN, got ID")
            .line(2)
            .span(14..15)
            .with_note("test note");

        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.message, "Error at line 2: Expected LPAREN, got ID");
        assert_eq!(diag.line, Some(2));
        assert_eq!(diag.span, Some(14..15));
        assert_eq!(diag.notes, vec!["test note".to_string()]);
    }

    #[test]
    fn test_different_levels() {
        assert_eq!(Diagnostic::error("error").level, DiagnosticLevel::Error);
        assert_eq!(Diagnostic::note("note").level, DiagnosticLevel::Note);
    }

    #[test]
    fn test_builder_keeps_note_order() {
        let diag = Diagnostic::error("test")
            .with_note("note 1")
            .with_note("note 2");

        assert_eq!(diag.notes, vec!["note 1", "note 2"]);
        assert!(diag.line.is_none());
        assert!(diag.span.is_none());
    }
}
