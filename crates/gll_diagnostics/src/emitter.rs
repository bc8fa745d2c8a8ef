//! Emitter - 诊断输出器
//!
//! 负责将诊断信息格式化输出。诊断消息本身原样输出，
//! 这里只负责加上级别前缀、注释以及（可选的）源码片段。

use crate::diagnostic::{Diagnostic, Span};
use ariadne::{Config, Label, Report, Source};
use colored::*;

/// 诊断输出器
pub struct Emitter {
    /// 是否使用颜色
    use_colors: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    /// 创建新的输出器
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// 创建无颜色的输出器
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// 根据开关创建
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// 输出单个诊断到 stderr
    pub fn emit(&self, diagnostic: &Diagnostic) {
        eprint!("{}", self.render(diagnostic));
    }

    /// 输出所有诊断
    pub fn emit_all(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// 输出带源码片段的诊断到 stderr
    pub fn emit_with_source(&self, diagnostic: &Diagnostic, source: &str) {
        eprint!("{}", self.render_with_source(diagnostic, source));
    }

    /// 格式化单个诊断
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        if self.use_colors {
            self.render_colored(diagnostic)
        } else {
            self.render_plain(diagnostic)
        }
    }

    /// 用 ariadne 绘制源码片段；没有位置信息时退回普通格式
    pub fn render_with_source(&self, diagnostic: &Diagnostic, source: &str) -> String {
        let Some(span) = diagnostic.span.clone() else {
            return self.render(diagnostic);
        };
        let span = char_span(source, span);

        let kind = diagnostic.level.report_kind();
        let color = diagnostic.level.label_color();

        let mut builder = Report::build(kind, (), span.start)
            .with_config(Config::default().with_color(self.use_colors))
            .with_message(&diagnostic.message)
            .with_label(
                Label::new(span)
                    .with_message(format!("{}", diagnostic.level))
                    .with_color(color),
            );
        for note in &diagnostic.notes {
            builder = builder.with_note(note);
        }

        let mut buf = Vec::new();
        if builder.finish().write(Source::from(source), &mut buf).is_err() {
            return self.render(diagnostic);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// 带颜色的诊断
    fn render_colored(&self, diagnostic: &Diagnostic) -> String {
        let mut out = format!(
            "{}: {}\n",
            diagnostic.level.colored_name(),
            diagnostic.message.bold()
        );
        for note in &diagnostic.notes {
            out.push_str(&format!(
                "  {} {}\n",
                "=".blue().bold(),
                format!("note: {}", note).bright_black()
            ));
        }
        out
    }

    /// 纯文本诊断
    fn render_plain(&self, diagnostic: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", diagnostic.level, diagnostic.message);
        for note in &diagnostic.notes {
            out.push_str(&format!("  = note: {}\n", note));
        }
        out
    }
}

/// ariadne 以字符为单位计算偏移，记号给出的是字节偏移
fn char_span(source: &str, span: Span) -> Span {
    let clamp = |offset: usize| {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    };
    let start = source[..clamp(span.start)].chars().count();
    let end = source[..clamp(span.end)].chars().count();
    start..end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_creation() {
        let emitter = Emitter::new();
        assert!(emitter.use_colors);

        let emitter_no_color = Emitter::without_colors();
        assert!(!emitter_no_color.use_colors);

        assert!(!Emitter::with_colors(false).use_colors);
    }

    #[test]
    fn test_render_plain_is_verbatim() {
        let emitter = Emitter::without_colors();
        let diag = Diagnostic::error("Error at line 3: Expected ENDDEC, got ID");

        assert_eq!(
            emitter.render(&diag),
            "error: Error at line 3: Expected ENDDEC, got ID\n"
        );
    }

    #[test]
    fn test_render_plain_with_notes() {
        let emitter = Emitter::without_colors();
        let diag = Diagnostic::error("boom")
            .with_note("first")
            .with_note("second");

        assert_eq!(
            emitter.render(&diag),
            "error: boom\n  = note: first\n  = note: second\n"
        );
    }

    #[test]
    fn test_render_with_source_contains_message() {
        let emitter = Emitter::without_colors();
        let source = "= ^ .\nx = 5 + * 2:3\n. ^ =";
        let diag = Diagnostic::error(
            "Error at line 2: Unexpected token OP_ARIT while processing Factor",
        )
        .line(2)
        .span(14..15);

        let rendered = emitter.render_with_source(&diag, source);
        assert!(rendered.contains("Unexpected token OP_ARIT while processing Factor"));
        assert!(rendered.contains("x = 5 + * 2:3"));
    }

    #[test]
    fn test_render_with_source_without_span_falls_back() {
        let emitter = Emitter::without_colors();
        let diag = Diagnostic::note("analysis stopped");

        assert_eq!(
            emitter.render_with_source(&diag, "= ^ ."),
            "note: analysis stopped\n"
        );
    }

    #[test]
    fn test_char_span_counts_chars() {
        let source = "\"ñ\" x";
        // "ñ" 占两个字节
        assert_eq!(char_span(source, 5..6), 4..5);
        assert_eq!(char_span(source, 100..200), 5..5);
    }
}
