//! Parser Module
//!
//! 表驱动的预测分析器（LL(1)，递归展开，无回溯）。
//!
//! 分析从开始符号 `Programa` 出发做最左深度优先展开：
//! - 非终结符查表选产生式，查不到就记录诊断并按同步集合恢复
//! - 终结符逐个匹配，不匹配就记录诊断并跳过一个记号
//!
//! 分析表与同步集合是进程内共享的只读数据；每个 [`Parser`] 只拥有自己的
//! 游标和诊断列表，因此不同线程可以各自持有 `Parser` 并发分析。

mod cursor;
pub mod error;
mod recovery;


pub use error::{DiagnosticKind, FatalKind, ParseError, ParseResult, SyntaxDiagnostic};

use crate::grammar::{NonTerminal, ParseTable, Symbol, SyncSets};
use crate::lexer::{Token, TokenKind};
use cursor::Cursor;
use tracing::{debug, trace};

/// `expand` 允许的最大递归深度。每层括号占两层，每层代码块占两到三层
pub const MAX_DEPTH: usize = 512;

/// 预测分析器
pub struct Parser {
    table: &'static ParseTable,
    sync: &'static SyncSets,
    diagnostics: Vec<SyntaxDiagnostic>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            table: ParseTable::get(),
            sync: SyncSets::get(),
            diagnostics: Vec::new(),
        }
    }

    /// 分析整个记号序列。
    ///
    /// 返回 `Ok(true)` 当且仅当全部记号归约为开始符号且没有任何诊断；
    /// 有诊断时返回 `Ok(false)`，诊断通过 [`Parser::diagnostics`] 获取。
    /// 无法恢复时返回 `Err(ParseError)`，其中附带中止前收集的诊断。
    pub fn parse(&mut self, tokens: &[Token]) -> ParseResult<bool> {
        self.diagnostics.clear();
        let mut cursor = Cursor::new(tokens);

        if let Err(mut err) = self.expand(&mut cursor, NonTerminal::START, 0) {
            debug!(error = %err, diagnostics = self.diagnostics.len(), "parse aborted");
            err.diagnostics = self.diagnostics.clone();
            return Err(err);
        }

        // 开始符号已完整展开但仍有剩余输入
        if self.diagnostics.is_empty() {
            if let Some(token) = cursor.current() {
                self.record(
                    token,
                    DiagnosticKind::UnexpectedToken {
                        found: token.kind,
                        non_terminal: NonTerminal::START,
                    },
                );
            }
        }

        debug!(
            tokens = tokens.len(),
            consumed = cursor.position(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );
        Ok(self.diagnostics.is_empty())
    }

    /// 最近一次 parse 收集到的诊断，按产生顺序
    pub fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<SyntaxDiagnostic> {
        self.diagnostics
    }

    /// 展开一个非终结符。
    ///
    /// 产生式最后一个符号若是非终结符，就在本层循环展开而不再递归
    /// (`CODE -> Statement CODE`、`ExprTail`、`RestVarList` 等)，
    /// 因此递归深度只随括号与代码块的嵌套增长，不随语句或运算符数量增长。
    fn expand(
        &mut self,
        cursor: &mut Cursor<'_>,
        mut nt: NonTerminal,
        depth: usize,
    ) -> ParseResult<()> {
        if depth > MAX_DEPTH {
            let line = cursor.current().map_or_else(|| cursor.last_line(), |t| t.line);
            debug!(%nt, depth, line, "nesting limit reached");
            return Err(ParseError::new(FatalKind::TooDeep(nt), line));
        }

        loop {
            let Some(token) = cursor.current() else {
                return Err(ParseError::new(
                    FatalKind::EndOfInput(nt),
                    cursor.last_line(),
                ));
            };

            let table = self.table;
            let Some(production) = table.production(nt, token.kind) else {
                self.record(
                    token,
                    DiagnosticKind::UnexpectedToken {
                        found: token.kind,
                        non_terminal: nt,
                    },
                );
                if recovery::synchronize(cursor, self.sync.sync_set(nt)) {
                    return Ok(());
                }
                return Err(ParseError::new(
                    FatalKind::SyncFailed(nt),
                    cursor.last_line(),
                ));
            };

            trace!(%nt, lookahead = %token.kind, line = token.line, %production, "expand");
            let (tail, body) = match production.symbols().split_last() {
                Some((Symbol::NonTerminal(last), body)) => (Some(*last), body),
                _ => (None, production.symbols()),
            };
            for symbol in body {
                match *symbol {
                    Symbol::NonTerminal(next) => self.expand(cursor, next, depth + 1)?,
                    Symbol::Terminal(kind) => self.match_terminal(cursor, kind)?,
                }
            }

            match tail {
                Some(next) => nt = next,
                None => return Ok(()),
            }
        }
    }

    fn match_terminal(&mut self, cursor: &mut Cursor<'_>, expected: TokenKind) -> ParseResult<()> {
        let Some(token) = cursor.current() else {
            return Err(ParseError::new(
                FatalKind::EndOfInputExpecting(expected),
                cursor.last_line(),
            ));
        };

        if token.kind == expected {
            trace!(kind = %expected, value = %token.value, line = token.line, "match");
            cursor.advance();
            return Ok(());
        }

        self.record(
            token,
            DiagnosticKind::ExpectedToken {
                expected,
                found: token.kind,
            },
        );
        recovery::skip_one(cursor);
        Ok(())
    }

    fn record(&mut self, token: &Token, kind: DiagnosticKind) {
        let diagnostic = SyntaxDiagnostic::at(token, kind);
        debug!(%diagnostic, "syntax error");
        self.diagnostics.push(diagnostic);
    }
}
