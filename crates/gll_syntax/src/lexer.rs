//! Lexer - 词法分析
//!
//! 按固定优先级逐条尝试记号模式，在当前位置第一个匹配成功的模式胜出
//! (first-match-wins，而不是最长匹配)。因此较长、较具体的字面量
//! 必须排在可能遮蔽它们的模式之前：`= ^ .` 在 `=` 之前，关键字在标识符之前。

use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

/// 记号类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // --- 程序界定符 ---
    StartProg,
    EndProg,

    // --- 关键字 ---
    DecVar,
    EndDec,
    Method,
    If,
    Else,
    While,
    For,
    Array,
    Print,
    Read,
    Break,
    Continue,
    Return,

    // --- 类型与字面量 ---
    Type,
    Boolean,
    String,
    Number,

    // --- 运算符 ---
    OpRel,
    OpLog,
    OpArit,

    // --- 标点 ---
    EndStmt,
    Semi,
    Comma,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBrack,
    RBrack,
    Assign,

    Comment,
    Id,
}

impl TokenKind {
    /// 全部记号类别，按词汇表顺序
    pub const ALL: [TokenKind; 35] = [
        TokenKind::StartProg,
        TokenKind::EndProg,
        TokenKind::DecVar,
        TokenKind::EndDec,
        TokenKind::Method,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::While,
        TokenKind::For,
        TokenKind::Array,
        TokenKind::Print,
        TokenKind::Read,
        TokenKind::Break,
        TokenKind::Continue,
        TokenKind::Return,
        TokenKind::Type,
        TokenKind::Boolean,
        TokenKind::String,
        TokenKind::Number,
        TokenKind::OpRel,
        TokenKind::OpLog,
        TokenKind::OpArit,
        TokenKind::EndStmt,
        TokenKind::Semi,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LBrack,
        TokenKind::RBrack,
        TokenKind::Assign,
        TokenKind::Comment,
        TokenKind::Id,
    ];

    /// 诊断信息中使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartProg => "START_PROG",
            Self::EndProg => "END_PROG",
            Self::DecVar => "DECVAR",
            Self::EndDec => "ENDDEC",
            Self::Method => "METHOD",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::For => "FOR",
            Self::Array => "ARRAY",
            Self::Print => "PRINT",
            Self::Read => "READ",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::Return => "RETURN",
            Self::Type => "TYPE",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::OpRel => "OP_REL",
            Self::OpLog => "OP_LOG",
            Self::OpArit => "OP_ARIT",
            Self::EndStmt => "END_STMT",
            Self::Semi => "SEMI",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBrack => "LBRACK",
            Self::RBrack => "RBRACK",
            Self::Assign => "ASSIGN",
            Self::Comment => "COMMENT",
            Self::Id => "ID",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 记号：类别、原文、所在行（1 起始）以及字节范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, span: Range<usize>) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, {}, line={})", self.kind, self.value, self.line)
    }
}

/// 词法错误：当前位置没有任何模式匹配
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Invalid character at line {line}: {ch}")]
    InvalidCharacter { line: usize, ch: char, offset: usize },
}

impl LexError {
    /// 出错字符所在行
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidCharacter { line, .. } => *line,
        }
    }

    /// 出错字符的字节范围
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::InvalidCharacter { ch, offset, .. } => *offset..*offset + ch.len_utf8(),
        }
    }
}

/// 模式表，顺序即优先级。`None` 表示匹配后丢弃（空白）
const PATTERNS: &[(Option<TokenKind>, &str)] = &[
    (None, r"[ \t\n]+"),
    (Some(TokenKind::StartProg), r"= \^ \."),
    (Some(TokenKind::EndProg), r"\. \^ ="),
    (Some(TokenKind::DecVar), r"DECVARinter"),
    (Some(TokenKind::EndDec), r"EndDecinter"),
    (Some(TokenKind::Method), r"Methodinter"),
    (Some(TokenKind::If), r"Siinter"),
    (Some(TokenKind::Else), r"Sinointer"),
    (Some(TokenKind::While), r"Mientinter"),
    (Some(TokenKind::For), r"Forinter"),
    (Some(TokenKind::Array), r"ARRAYinter"),
    (Some(TokenKind::Print), r"Mostrinter"),
    (Some(TokenKind::Read), r"LEERinter"),
    (Some(TokenKind::Break), r"BREAKinter"),
    (Some(TokenKind::Continue), r"CONTINUEinter"),
    (Some(TokenKind::Return), r"Returninter"),
    (Some(TokenKind::Type), r"INTer|FLOATer|STRINGter|BOOLEANter|VOIDter"),
    (Some(TokenKind::Boolean), r"TRUEter|FALSEter"),
    (Some(TokenKind::String), r#""[^"]*""#),
    (Some(TokenKind::Number), r"\d+(\.\d+)?"),
    (Some(TokenKind::OpRel), r"==|!=|>=|<=|>|<"),
    (Some(TokenKind::OpLog), r"ANDter|ORter|NOTter"),
    (Some(TokenKind::OpArit), r"[+\-*/]"),
    (Some(TokenKind::EndStmt), r":3"),
    (Some(TokenKind::Semi), r";"),
    (Some(TokenKind::Comma), r","),
    (Some(TokenKind::Colon), r":"),
    (Some(TokenKind::LParen), r"\("),
    (Some(TokenKind::RParen), r"\)"),
    (Some(TokenKind::LBrace), r"\{"),
    (Some(TokenKind::RBrace), r"\}"),
    (Some(TokenKind::LBrack), r"\["),
    (Some(TokenKind::RBrack), r"\]"),
    (Some(TokenKind::Assign), r"="),
    (Some(TokenKind::Comment), r"##.*"),
    (Some(TokenKind::Id), r"[a-zA-Z_][a-zA-Z0-9_]*"),
];

struct TokenPattern {
    kind: Option<TokenKind>,
    regex: Regex,
}

/// 编译一次，之后只读
static TOKEN_PATTERNS: LazyLock<Vec<TokenPattern>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .map(|(kind, pattern)| TokenPattern {
            kind: *kind,
            regex: Regex::new(&format!(r"\A(?:{pattern})")).expect("token pattern must compile"),
        })
        .collect()
});

/// 词法分析器。除静态模式表外不保存任何状态
#[derive(Clone, Copy)]
pub struct Lexer {
    patterns: &'static [TokenPattern],
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            patterns: LazyLock::force(&TOKEN_PATTERNS).as_slice(),
        }
    }

    /// 将源码转换为记号序列，遇到无法识别的字符立即失败
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut line = 1;
        let mut pos = 0;

        while pos < source.len() {
            let rest = &source[pos..];
            let Some((kind, len)) = self.match_at(rest) else {
                let ch = rest.chars().next().unwrap_or_default();
                debug!(line, offset = pos, %ch, "no token pattern matches");
                return Err(LexError::InvalidCharacter {
                    line,
                    ch,
                    offset: pos,
                });
            };

            let text = &rest[..len];
            if let Some(kind) = kind {
                trace!(%kind, text, line, "token");
                tokens.push(Token::new(kind, text, line, pos..pos + len));
            }

            line += text.matches('\n').count();
            pos += len;
        }

        debug!(tokens = tokens.len(), lines = line, "tokenized source");
        Ok(tokens)
    }

    /// 按优先级尝试每个模式，返回第一个匹配的类别与长度
    fn match_at(&self, rest: &str) -> Option<(Option<TokenKind>, usize)> {
        self.patterns
            .iter()
            .find_map(|p| p.regex.find(rest).map(|m| (p.kind, m.end())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new()
            .tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(TOKEN_PATTERNS.len(), PATTERNS.len());
    }

    #[test]
    fn test_every_kind_has_a_pattern() {
        for kind in TokenKind::ALL {
            assert!(
                PATTERNS.iter().any(|(k, _)| *k == Some(kind)),
                "{kind} has no pattern"
            );
        }
    }

    #[test]
    fn test_declaration_block() {
        let source = "= ^ .\nDECVARinter\n    x: INTer\nEndDecinter\n. ^ =";
        let tokens = Lexer::new().tokenize(source).unwrap();

        let summary: Vec<_> = tokens
            .iter()
            .map(|t| (t.kind, t.value.as_str(), t.line))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::StartProg, "= ^ .", 1),
                (TokenKind::DecVar, "DECVARinter", 2),
                (TokenKind::Id, "x", 3),
                (TokenKind::Colon, ":", 3),
                (TokenKind::Type, "INTer", 3),
                (TokenKind::EndDec, "EndDecinter", 4),
                (TokenKind::EndProg, ". ^ =", 5),
            ]
        );
    }

    #[test]
    fn test_start_marker_beats_assign() {
        assert_eq!(kinds("= ^ ."), vec![TokenKind::StartProg]);
        assert_eq!(kinds(". ^ ="), vec![TokenKind::EndProg]);

        // 不完整的界定符退化为 "="，随后的 "^" 无法识别
        let err = Lexer::new().tokenize("= ^").unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidCharacter {
                line: 1,
                ch: '^',
                offset: 2
            }
        );
    }

    #[test]
    fn test_relational_before_assign() {
        assert_eq!(
            kinds("a == b = c"),
            vec![
                TokenKind::Id,
                TokenKind::OpRel,
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::Id
            ]
        );
        assert_eq!(kinds(">= <= != > <"), vec![TokenKind::OpRel; 5]);
    }

    #[test]
    fn test_statement_terminator_before_colon() {
        assert_eq!(
            kinds("x: INTer:3"),
            vec![
                TokenKind::Id,
                TokenKind::Colon,
                TokenKind::Type,
                TokenKind::EndStmt
            ]
        );
    }

    #[test]
    fn test_keywords_before_identifier() {
        assert_eq!(kinds("Siinter"), vec![TokenKind::If]);
        assert_eq!(kinds("Sinointer"), vec![TokenKind::Else]);
        assert_eq!(kinds("Mientinter Forinter"), vec![TokenKind::While, TokenKind::For]);
        assert_eq!(kinds("ANDter ORter NOTter"), vec![TokenKind::OpLog; 3]);
        assert_eq!(kinds("TRUEter FALSEter"), vec![TokenKind::Boolean; 2]);
        assert_eq!(kinds("Siento"), vec![TokenKind::Id]);
    }

    #[test]
    fn test_first_match_not_longest_match() {
        // 类型关键字先于标识符尝试，即使标识符能匹配更长
        let tokens = Lexer::new().tokenize("INTeresting").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[0].kind, tokens[0].value.as_str()), (TokenKind::Type, "INTer"));
        assert_eq!((tokens[1].kind, tokens[1].value.as_str()), (TokenKind::Id, "esting"));
    }

    #[test]
    fn test_misspelled_type_is_identifier() {
        assert_eq!(kinds("STRINGer"), vec![TokenKind::Id]);
        assert_eq!(kinds("STRINGter"), vec![TokenKind::Type]);
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new().tokenize("10 3.14 0.5").unwrap();
        let values: Vec<_> = tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::Number, "10"),
                (TokenKind::Number, "3.14"),
                (TokenKind::Number, "0.5"),
            ]
        );

        // 没有小数部分时 "." 单独留下，无法识别
        assert!(Lexer::new().tokenize("7.").is_err());
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let tokens = Lexer::new()
            .tokenize("## hola mundo :3\nx")
            .unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].value, "## hola mundo :3");
        assert_eq!((tokens[1].kind, tokens[1].line), (TokenKind::Id, 2));
    }

    #[test]
    fn test_string_with_newline_advances_line() {
        let tokens = Lexer::new().tokenize("\"a\nb\" x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_invalid_character_reports_line() {
        let err = Lexer::new().tokenize("= ^ .\nx = 1:3\ny = @:3").unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidCharacter {
                line: 3,
                ch: '@',
                offset: 18
            }
        );
        assert_eq!(err.to_string(), "Invalid character at line 3: @");
        assert_eq!(err.line(), 3);
        assert_eq!(err.span(), 18..19);
    }

    #[test]
    fn test_carriage_return_is_not_whitespace() {
        let err = Lexer::new().tokenize("x\r\ny").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_spans_index_source() {
        let source = "= ^ .\nMostrinter(\"hola\"):3\n. ^ =";
        for token in Lexer::new().tokenize(source).unwrap() {
            assert_eq!(&source[token.span.clone()], token.value);
        }
    }

    #[test]
    fn test_deterministic_and_monotonic_lines() {
        let sources = [
            "= ^ .\nx = 5 + 3 * 2:3\n\n\ny = x - 1:3\n. ^ =",
            "Siinter(x > 0) {\n  Mostrinter(\"a\nb\"):3\n}\n## fin",
            "",
            "   \n\t\n",
        ];
        let lexer = Lexer::new();
        for source in sources {
            let first = lexer.tokenize(source).unwrap();
            let second = lexer.tokenize(source).unwrap();
            assert_eq!(first, second);
            assert!(first.windows(2).all(|w| w[0].line <= w[1].line));
        }
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Id, "x", 3, 0..1);
        assert_eq!(token.to_string(), "Token(ID, x, line=3)");
    }
}
