//! Parser Errors
//!
//! 两类结果严格分开：
//! - [`SyntaxDiagnostic`]：可恢复的语法诊断，只追加到列表，不打断分析
//! - [`ParseError`]：无法恢复的致命错误（输入提前结束、无法同步），中止分析

use crate::grammar::NonTerminal;
use crate::lexer::{Token, TokenKind};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// 可恢复诊断的具体内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// 分析表中没有 (非终结符, 当前记号) 的条目
    UnexpectedToken {
        found: TokenKind,
        non_terminal: NonTerminal,
    },
    /// 终结符不匹配
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                found,
                non_terminal,
            } => write!(f, "Unexpected token {found} while processing {non_terminal}"),
            Self::ExpectedToken { expected, found } => {
                write!(f, "Expected {expected}, got {found}")
            }
        }
    }
}

/// 一条带行号的语法诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    /// 触发诊断的记号的字节范围
    pub span: Range<usize>,
}

impl SyntaxDiagnostic {
    pub fn at(token: &Token, kind: DiagnosticKind) -> Self {
        Self {
            kind,
            line: token.line,
            span: token.span.clone(),
        }
    }
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error at line {}: {}", self.line, self.kind)
    }
}

/// 致命错误的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FatalKind {
    #[error("Unexpected end of input while processing {0}")]
    EndOfInput(NonTerminal),

    #[error("Unexpected end of input, expected {0}")]
    EndOfInputExpecting(TokenKind),

    #[error("Could not synchronize after error in {0}")]
    SyncFailed(NonTerminal),

    /// 嵌套层数超过 [`crate::parser::MAX_DEPTH`]
    #[error("Nesting too deep while processing {0}")]
    TooDeep(NonTerminal),
}

/// 致命语法错误：分析器放弃，而不仅仅是输入不合法
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at line {line}: {kind}")]
pub struct ParseError {
    pub kind: FatalKind,
    /// 最后一个可用记号所在行
    pub line: usize,
    /// 中止之前已经收集到的诊断
    pub diagnostics: Vec<SyntaxDiagnostic>,
}

impl ParseError {
    pub fn new(kind: FatalKind, line: usize) -> Self {
        Self {
            kind,
            line,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        &self.diagnostics
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
