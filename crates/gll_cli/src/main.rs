use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use gll_diagnostics::{DiagnosticSink, Emitter};
use gll_driver::syntax::{tokenize, ParseTable};
use gll_driver::{analyze, read_source, Analysis, AnalyzeResult, Outcome, ToDiagnostic};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gllc")]
#[command(about = "GLL 语法检查器 - 词法分析 + LL(1) 预测分析", version)]
struct Cli {
    /// 关闭彩色输出
    #[arg(long, global = true)]
    no_color: bool,

    /// 日志详细程度 (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 检查源文件是否合乎文法
    Check {
        /// 输入文件
        input: String,

        /// 诊断输出格式
        #[arg(short, long, value_enum, default_value_t = Format::Plain)]
        format: Format,
    },

    /// 输出词法分析得到的记号
    Tokens {
        /// 输入文件
        input: String,
    },

    /// 输出 LL(1) 分析表
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// 每条诊断一行
    Plain,
    /// 带源码片段
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let emitter = Emitter::with_colors(!cli.no_color);

    match cli.command {
        Commands::Check { input, format } => cmd_check(&input, format, &emitter),
        Commands::Tokens { input } => cmd_tokens(&input, &emitter),
        Commands::Table => cmd_table(),
    }

    Ok(())
}

/// RUST_LOG 优先，否则按 -v 次数决定级别
fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// 退出码：0 合乎文法，1 有可恢复的语法错误，2 词法错误、分析器放弃或无法读取文件
fn exit_code(result: &AnalyzeResult<Analysis>) -> i32 {
    match result {
        Ok(analysis) if analysis.outcome == Outcome::Accepted => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

/// 检查命令
fn cmd_check(input: &str, format: Format, emitter: &Emitter) {
    let (source, result) = match read_source(input) {
        Ok(source) => {
            debug!(input, bytes = source.len(), "checking");
            let result = analyze(&source);
            (source, result)
        }
        Err(err) => (String::new(), Err(err)),
    };

    let mut sink = DiagnosticSink::new();
    match &result {
        Ok(analysis) => analysis.collect_to_sink(&mut sink),
        Err(err) => err.collect_to_sink(&mut sink),
    }
    report(&sink, &source, format, emitter);

    let code = exit_code(&result);
    match code {
        0 => println!("Analysis succeeded: the program is syntactically correct."),
        1 => println!("Syntax error."),
        _ => {}
    }
    if code != 0 {
        process::exit(code);
    }
}

/// 记号命令
fn cmd_tokens(input: &str, emitter: &Emitter) {
    let mut sink = DiagnosticSink::new();
    let source = match read_source(input) {
        Ok(source) => source,
        Err(err) => {
            err.collect_to_sink(&mut sink);
            report(&sink, "", Format::Plain, emitter);
            process::exit(2);
        }
    };

    match tokenize(&source) {
        Ok(tokens) => {
            for token in &tokens {
                println!("{}", token);
            }
        }
        Err(err) => {
            sink.add(err.to_diagnostic());
            report(&sink, &source, Format::Pretty, emitter);
            process::exit(2);
        }
    }
}

/// 分析表命令
fn cmd_table() {
    print!("{}", ParseTable::get());
}

/// 诊断一律写到 stderr
fn report(sink: &DiagnosticSink, source: &str, format: Format, emitter: &Emitter) {
    match format {
        Format::Plain => emitter.emit_all(sink.diagnostics()),
        Format::Pretty => {
            for diagnostic in sink.diagnostics() {
                emitter.emit_with_source(diagnostic, source);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gll_driver::AnalyzeError;

    #[test]
    fn test_exit_code_accepted() {
        assert_eq!(exit_code(&analyze("= ^ .\nx = 1:3\n. ^ =")), 0);
    }

    #[test]
    fn test_exit_code_recovered() {
        assert_eq!(exit_code(&analyze("= ^ .\nx = 5 + * 2:3\n. ^ =")), 1);
    }

    #[test]
    fn test_exit_code_fatal() {
        assert_eq!(exit_code(&analyze("= ^ .\nx = 1:3 @\n. ^ =")), 2);
        assert_eq!(exit_code(&analyze("= ^ .\nx = 1:3")), 2);
    }

    #[test]
    fn test_unreadable_file_is_fatal_not_a_syntax_error() {
        let result = read_source("/nonexistent/dir/program.gll").and_then(|s| analyze(&s));
        assert!(matches!(result, Err(AnalyzeError::Io(_))));
        assert_eq!(exit_code(&result), 2);

        let mut sink = DiagnosticSink::new();
        if let Err(err) = &result {
            err.collect_to_sink(&mut sink);
        }
        assert!(sink.has_errors());
    }
}
