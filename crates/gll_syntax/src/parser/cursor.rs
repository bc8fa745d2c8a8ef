//! 分析游标：一次 parse 调用中唯一的可变状态

use crate::lexer::Token;

pub(crate) struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// 当前记号，输入耗尽时为 `None`
    pub(crate) fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// 致命错误报告用的行号：最后一个记号所在行
    pub(crate) fn last_line(&self) -> usize {
        self.tokens.last().map_or(1, |t| t.line)
    }
}
