//! 语法层结果到统一诊断的转换
//!
//! 消息文本原样保留，只附加行号、位置和补充注释。

use gll_diagnostics::Diagnostic;
use gll_syntax::{DiagnosticKind, LexError, ParseTable, SyntaxDiagnostic};

/// 转换为统一诊断
pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

impl ToDiagnostic for SyntaxDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string())
            .line(self.line)
            .span(self.span.clone());

        match self.kind {
            DiagnosticKind::UnexpectedToken { non_terminal, .. } => {
                let expected: Vec<String> = ParseTable::get()
                    .first_set(non_terminal)
                    .iter()
                    .map(|kind| kind.to_string())
                    .collect();
                diag.with_note(format!("expected one of: {}", expected.join(", ")))
            }
            DiagnosticKind::ExpectedToken { .. } => diag,
        }
    }
}

impl ToDiagnostic for LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .line(self.line())
            .span(self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gll_syntax::{tokenize, Parser};

    fn diagnostics(source: &str) -> Vec<Diagnostic> {
        let tokens = tokenize(source).unwrap();
        let mut parser = Parser::new();
        parser.parse(&tokens).unwrap();
        parser.diagnostics().iter().map(ToDiagnostic::to_diagnostic).collect()
    }

    #[test]
    fn test_unexpected_token_lists_first_set() {
        let diags = diagnostics("= ^ .\nx = 5 + * 2:3\n. ^ =");
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "Error at line 2: Unexpected token OP_ARIT while processing Factor"
        );
        assert_eq!(
            diags[0].notes,
            vec!["expected one of: BOOLEAN, STRING, NUMBER, OP_LOG, LPAREN, ID"]
        );
        assert_eq!(diags[0].line, Some(2));
    }

    #[test]
    fn test_expected_token_has_no_note() {
        let diags = diagnostics("= ^ .\nSiinter x > 0 {\n}\n. ^ =");
        assert_eq!(diags[0].message, "Error at line 2: Expected LPAREN, got ID");
        assert!(diags[0].notes.is_empty());
        assert_eq!(diags[0].span, Some(14..15));
    }
}
