//! GLL Driver
//!
//! 驱动模块，串联词法分析与语法分析，给出三种结果之一：
//! - [`Outcome::Accepted`] - 程序合乎文法
//! - [`Outcome::RecoveredWithDiagnostics`] - 发现错误，但分析经恢复后走完
//! - `Err(AnalyzeError)` - 词法失败或分析器放弃

pub mod error;
pub mod report;

pub use error::{AnalyzeError, AnalyzeResult};
pub use gll_syntax as syntax;
pub use report::ToDiagnostic;

use gll_diagnostics::DiagnosticSink;
use gll_syntax::{tokenize, Parser, SyntaxDiagnostic, Token};
use tracing::info;

/// 分析结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    RecoveredWithDiagnostics,
}

/// 一次完整分析的结果
#[derive(Debug)]
pub struct Analysis {
    /// 词法分析得到的记号
    pub tokens: Vec<Token>,
    pub outcome: Outcome,
    /// 按产生顺序排列的语法诊断
    pub diagnostics: Vec<SyntaxDiagnostic>,
}

impl Analysis {
    pub fn is_valid(&self) -> bool {
        self.outcome == Outcome::Accepted
    }

    /// 转换为统一诊断并收集到 DiagnosticSink
    pub fn collect_to_sink(&self, sink: &mut DiagnosticSink) {
        for diag in &self.diagnostics {
            sink.add(diag.to_diagnostic());
        }
    }
}

/// 分析源代码
///
/// # Example
/// ```
/// use gll_driver::{analyze, Outcome};
///
/// let analysis = analyze("= ^ .\nx = 1:3\n. ^ =").unwrap();
/// assert_eq!(analysis.outcome, Outcome::Accepted);
/// ```
pub fn analyze(source: &str) -> AnalyzeResult<Analysis> {
    // 1. 词法分析
    let tokens = tokenize(source)?;

    // 2. 语法分析
    let mut parser = Parser::new();
    let accepted = parser.parse(&tokens)?;
    let outcome = if accepted {
        Outcome::Accepted
    } else {
        Outcome::RecoveredWithDiagnostics
    };

    let diagnostics = parser.into_diagnostics();
    info!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        ?outcome,
        "analysis complete"
    );

    Ok(Analysis {
        tokens,
        outcome,
        diagnostics,
    })
}

/// 读取源文件，IO 失败归入 [`AnalyzeError::Io`]
pub fn read_source(path: &str) -> AnalyzeResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// 从文件分析
pub fn analyze_file(path: &str) -> AnalyzeResult<Analysis> {
    let source = read_source(path)?;
    analyze(&source)
}
