//! GLL Syntax
//!
//! 词法分析与表驱动预测分析。对外只有两个核心操作：
//! [`tokenize`] 把源码变成记号序列，[`Parser::parse`] 判断记号序列是否合乎文法。

pub mod grammar;
pub mod lexer;
pub mod parser;

pub use grammar::{NonTerminal, ParseTable, Production, Symbol, SyncSets};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::{
    DiagnosticKind, FatalKind, ParseError, ParseResult, Parser, SyntaxDiagnostic, MAX_DEPTH,
};

/// 使用共享模式表做词法分析
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new().tokenize(source)
}
