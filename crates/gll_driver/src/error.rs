//! Analysis Errors
//!
//! 驱动层的致命错误类型，集成统一诊断系统。
//! 可恢复的语法诊断不在这里，它们随 [`crate::Analysis`] 一起返回。

use crate::report::ToDiagnostic;
use gll_diagnostics::{Diagnostic, DiagnosticSink};
use gll_syntax::{LexError, ParseError};
use thiserror::Error;

/// 分析中止
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// 词法错误：遇到无法识别的字符
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    /// 语法分析放弃（输入提前结束或无法同步）
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzeError {
    /// 转换为诊断列表并收集到 DiagnosticSink
    pub fn collect_to_sink(&self, sink: &mut DiagnosticSink) {
        match self {
            AnalyzeError::Lex(err) => {
                sink.add(err.to_diagnostic());
            }
            AnalyzeError::Parse(err) => {
                for diag in err.diagnostics() {
                    sink.add(diag.to_diagnostic());
                }
                sink.add(Diagnostic::error(err.to_string()).line(err.line));
                sink.add(Diagnostic::note(
                    "the parser gave up here; later errors were not reported",
                ));
            }
            AnalyzeError::Io(err) => {
                sink.add(Diagnostic::error(format!("IO error: {}", err)));
            }
        }
    }
}

/// 分析结果类型
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use gll_diagnostics::DiagnosticLevel;
    use gll_syntax::{tokenize, Parser};

    #[test]
    fn test_lex_error_to_sink() {
        let err: AnalyzeError = tokenize("= ^ .\n@").unwrap_err().into();
        let mut sink = DiagnosticSink::new();
        err.collect_to_sink(&mut sink);

        assert_eq!(sink.len(), 1);
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.message, "Invalid character at line 2: @");
        assert_eq!(diag.line, Some(2));
        assert_eq!(diag.span, Some(6..7));
        assert_eq!(err.to_string(), "Lexical error: Invalid character at line 2: @");
    }

    #[test]
    fn test_fatal_parse_error_to_sink() {
        let tokens = tokenize("= ^ .\nSiinter(x) x y").unwrap();
        let err: AnalyzeError = Parser::new().parse(&tokens).unwrap_err().into();

        let mut sink = DiagnosticSink::new();
        err.collect_to_sink(&mut sink);

        let messages: Vec<_> = sink.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Error at line 2: Unexpected token ID while processing Block",
                "Syntax error at line 2: Could not synchronize after error in Block",
                "the parser gave up here; later errors were not reported",
            ]
        );
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.diagnostics()[2].level, DiagnosticLevel::Note);
    }

    #[test]
    fn test_io_error_to_sink() {
        let err = AnalyzeError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing.gll",
        ));
        let mut sink = DiagnosticSink::new();
        err.collect_to_sink(&mut sink);
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics()[0].message, "IO error: missing.gll");
    }
}
