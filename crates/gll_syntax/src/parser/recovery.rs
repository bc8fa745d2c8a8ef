//! Error recovery strategies for the parser.
//!
//! 两级恢复，互相独立：
//! - 终结符不匹配时只跳过一个记号 ([`skip_one`])
//! - 非终结符没有可用产生式时，跳到它的同步集合 ([`synchronize`])

use super::cursor::Cursor;
use crate::lexer::TokenKind;
use std::collections::HashSet;
use tracing::debug;

/// 跳过记号直到当前记号属于同步集合。
///
/// 停在同步记号上，不消费它。没有登记同步集合的非终结符视为已同步，
/// 游标不动。输入耗尽仍未找到时返回 `false`。
pub(crate) fn synchronize(cursor: &mut Cursor<'_>, sync_set: Option<&HashSet<TokenKind>>) -> bool {
    let Some(sync_set) = sync_set else {
        return true;
    };

    let start = cursor.position();
    while let Some(token) = cursor.current() {
        if sync_set.contains(&token.kind) {
            debug!(
                skipped = cursor.position() - start,
                at = %token.kind,
                line = token.line,
                "synchronized"
            );
            return true;
        }
        cursor.advance();
    }

    debug!(skipped = cursor.position() - start, "input exhausted while synchronizing");
    false
}

/// 局部恢复：丢弃当前记号
pub(crate) fn skip_one(cursor: &mut Cursor<'_>) {
    if let Some(token) = cursor.current() {
        debug!(skipped = %token.kind, line = token.line, "skipping mismatched token");
    }
    cursor.advance();
}
