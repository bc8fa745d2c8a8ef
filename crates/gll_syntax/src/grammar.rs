//! Grammar - 文法与预测分析表
//!
//! 文法是固定的、手写的 LL(1) 文法。分析表把 (非终结符, 向前看记号)
//! 映射到唯一的产生式；同步集合给出每个非终结符出错后可以安全恢复的位置。
//! 两者都只构建一次，之后只读共享。

use crate::lexer::TokenKind;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

/// 非终结符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NonTerminal {
    Programa,
    Start,
    Finish,
    Code,
    Statement,
    VarDec,
    VarList,
    VarDecItem,
    RestVarList,
    ExpressionStatement,
    ExpressionStatementTail,
    Expresion,
    ExprTail,
    Factor,
    Condition,
    Conditions,
    Block,
    OptionalElse,
    Loops,
    ForInit,
    Method,
    ParamList,
    ParamItem,
    RestParams,
    ArrayDec,
    ArraySize,
    Print,
    Printable,
    Input,
    Break,
    Continue,
    Return,
    Comment,
}

impl NonTerminal {
    /// 开始符号
    pub const START: NonTerminal = NonTerminal::Programa;

    pub const ALL: [NonTerminal; 33] = [
        NonTerminal::Programa,
        NonTerminal::Start,
        NonTerminal::Finish,
        NonTerminal::Code,
        NonTerminal::Statement,
        NonTerminal::VarDec,
        NonTerminal::VarList,
        NonTerminal::VarDecItem,
        NonTerminal::RestVarList,
        NonTerminal::ExpressionStatement,
        NonTerminal::ExpressionStatementTail,
        NonTerminal::Expresion,
        NonTerminal::ExprTail,
        NonTerminal::Factor,
        NonTerminal::Condition,
        NonTerminal::Conditions,
        NonTerminal::Block,
        NonTerminal::OptionalElse,
        NonTerminal::Loops,
        NonTerminal::ForInit,
        NonTerminal::Method,
        NonTerminal::ParamList,
        NonTerminal::ParamItem,
        NonTerminal::RestParams,
        NonTerminal::ArrayDec,
        NonTerminal::ArraySize,
        NonTerminal::Print,
        NonTerminal::Printable,
        NonTerminal::Input,
        NonTerminal::Break,
        NonTerminal::Continue,
        NonTerminal::Return,
        NonTerminal::Comment,
    ];

    /// 诊断信息中使用的文法名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Programa => "Programa",
            Self::Start => "START",
            Self::Finish => "FINISH",
            Self::Code => "CODE",
            Self::Statement => "Statement",
            Self::VarDec => "VarDec",
            Self::VarList => "VarList",
            Self::VarDecItem => "VarDecItem",
            Self::RestVarList => "RestVarList",
            Self::ExpressionStatement => "ExpressionStatement",
            Self::ExpressionStatementTail => "ExpressionStatementTail",
            Self::Expresion => "Expresion",
            Self::ExprTail => "ExprTail",
            Self::Factor => "Factor",
            Self::Condition => "Condition",
            Self::Conditions => "Conditions",
            Self::Block => "Block",
            Self::OptionalElse => "OptionalElse",
            Self::Loops => "Loops",
            Self::ForInit => "ForInit",
            Self::Method => "Method",
            Self::ParamList => "ParamList",
            Self::ParamItem => "ParamItem",
            Self::RestParams => "RestParams",
            Self::ArrayDec => "Array_Dec",
            Self::ArraySize => "ArraySize",
            Self::Print => "Print",
            Self::Printable => "Printable",
            Self::Input => "Input",
            Self::Break => "Break",
            Self::Continue => "Continue",
            Self::Return => "Return",
            Self::Comment => "Comment",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 文法符号：终结符（记号类别）或非终结符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(kind) => write!(f, "{kind}"),
            Symbol::NonTerminal(nt) => write!(f, "{nt}"),
        }
    }
}

/// 产生式右部；空序列即 ε
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Production(Vec<Symbol>);

impl Production {
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// 是否为 ε 产生式
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("ε");
        }
        let rendered: Vec<String> = self.0.iter().map(Symbol::to_string).collect();
        f.write_str(&rendered.join(" "))
    }
}

static PARSE_TABLE: LazyLock<ParseTable> = LazyLock::new(ParseTable::build);
static SYNC_SETS: LazyLock<SyncSets> = LazyLock::new(SyncSets::build);

/// 可以开始一条语句的记号
const STATEMENT_STARTS: [TokenKind; 13] = [
    TokenKind::DecVar,
    TokenKind::Print,
    TokenKind::Id,
    TokenKind::Method,
    TokenKind::If,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Array,
    TokenKind::Read,
    TokenKind::Comment,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Return,
];

fn t(kind: TokenKind) -> Symbol {
    Symbol::Terminal(kind)
}

fn n(nt: NonTerminal) -> Symbol {
    Symbol::NonTerminal(nt)
}

/// 预测分析表
#[derive(Debug)]
pub struct ParseTable {
    rules: HashMap<NonTerminal, HashMap<TokenKind, Production>>,
}

impl ParseTable {
    /// 进程内共享的只读分析表
    pub fn get() -> &'static ParseTable {
        &PARSE_TABLE
    }

    /// 查找 (非终结符, 向前看记号) 对应的产生式
    pub fn production(&self, nt: NonTerminal, lookahead: TokenKind) -> Option<&Production> {
        self.rules.get(&nt)?.get(&lookahead)
    }

    /// 在表中有条目的向前看记号，按词汇表顺序
    pub fn first_set(&self, nt: NonTerminal) -> Vec<TokenKind> {
        let mut kinds: Vec<TokenKind> = self
            .rules
            .get(&nt)
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default();
        kinds.sort();
        kinds
    }

    /// 所有 (非终结符, 向前看, 产生式) 条目，排好序
    pub fn entries(&self) -> Vec<(NonTerminal, TokenKind, &Production)> {
        let mut entries: Vec<_> = self
            .rules
            .iter()
            .flat_map(|(nt, row)| row.iter().map(move |(kind, prod)| (*nt, *kind, prod)))
            .collect();
        entries.sort_by_key(|(nt, kind, _)| (*nt, *kind));
        entries
    }

    /// 登记一组向前看记号共用的产生式
    fn rule(&mut self, nt: NonTerminal, lookaheads: &[TokenKind], symbols: &[Symbol]) {
        let row = self.rules.entry(nt).or_default();
        for &lookahead in lookaheads {
            let previous = row.insert(lookahead, Production(symbols.to_vec()));
            debug_assert!(previous.is_none(), "LL(1) conflict at ({nt}, {lookahead})");
        }
    }

    fn build() -> Self {
        use NonTerminal as N;
        use TokenKind as T;

        let mut table = Self {
            rules: HashMap::new(),
        };

        // 程序与基本结构
        table.rule(N::Programa, &[T::StartProg], &[n(N::Start), n(N::Code), n(N::Finish)]);
        table.rule(N::Start, &[T::StartProg], &[t(T::StartProg)]);
        table.rule(N::Finish, &[T::EndProg], &[t(T::EndProg)]);

        table.rule(N::Code, &STATEMENT_STARTS, &[n(N::Statement), n(N::Code)]);
        table.rule(N::Code, &[T::EndProg, T::RBrace], &[]);

        table.rule(N::Statement, &[T::DecVar], &[n(N::VarDec)]);
        table.rule(N::Statement, &[T::Print], &[n(N::Print)]);
        table.rule(N::Statement, &[T::Id], &[n(N::ExpressionStatement)]);
        table.rule(N::Statement, &[T::Method], &[n(N::Method)]);
        table.rule(N::Statement, &[T::If], &[n(N::Conditions)]);
        table.rule(N::Statement, &[T::While, T::For], &[n(N::Loops)]);
        table.rule(N::Statement, &[T::Array], &[n(N::ArrayDec)]);
        table.rule(N::Statement, &[T::Read], &[n(N::Input)]);
        table.rule(N::Statement, &[T::Comment], &[n(N::Comment)]);
        table.rule(N::Statement, &[T::Break], &[n(N::Break)]);
        table.rule(N::Statement, &[T::Continue], &[n(N::Continue)]);
        table.rule(N::Statement, &[T::Return], &[n(N::Return)]);

        // 变量声明
        table.rule(N::VarDec, &[T::DecVar], &[t(T::DecVar), n(N::VarList), t(T::EndDec)]);
        table.rule(N::VarList, &[T::Id], &[n(N::VarDecItem), n(N::RestVarList)]);
        table.rule(N::VarDecItem, &[T::Id], &[t(T::Id), t(T::Colon), t(T::Type)]);
        table.rule(
            N::RestVarList,
            &[T::Comma],
            &[t(T::Comma), n(N::VarDecItem), n(N::RestVarList)],
        );
        table.rule(N::RestVarList, &[T::EndDec], &[]);

        // 赋值语句
        table.rule(
            N::ExpressionStatement,
            &[T::Id],
            &[t(T::Id), n(N::ExpressionStatementTail)],
        );
        table.rule(
            N::ExpressionStatementTail,
            &[T::Assign],
            &[t(T::Assign), n(N::Expresion), t(T::EndStmt)],
        );
        table.rule(
            N::ExpressionStatementTail,
            &[T::LBrack],
            &[
                t(T::LBrack),
                n(N::Expresion),
                t(T::RBrack),
                t(T::Assign),
                n(N::Expresion),
                t(T::EndStmt),
            ],
        );

        // 表达式：Factor 后接迭代式尾部，从左到右，无需回溯
        table.rule(
            N::Expresion,
            &[T::Id, T::Number, T::String, T::LParen, T::Boolean, T::OpLog],
            &[n(N::Factor), n(N::ExprTail)],
        );
        for op in [T::OpArit, T::OpRel, T::OpLog] {
            table.rule(N::ExprTail, &[op], &[t(op), n(N::Factor), n(N::ExprTail)]);
        }
        // Forinter 头部中条件之后紧跟 SEMI
        table.rule(
            N::ExprTail,
            &[T::EndStmt, T::RParen, T::Comma, T::RBrack, T::Semi],
            &[],
        );

        for leaf in [T::Id, T::Number, T::Boolean, T::String] {
            table.rule(N::Factor, &[leaf], &[t(leaf)]);
        }
        table.rule(
            N::Factor,
            &[T::LParen],
            &[t(T::LParen), n(N::Expresion), t(T::RParen)],
        );
        table.rule(N::Factor, &[T::OpLog], &[t(T::OpLog), n(N::Factor)]);

        table.rule(
            N::Condition,
            &[T::Id, T::Number, T::LParen, T::Boolean, T::OpLog],
            &[n(N::Expresion)],
        );

        // 控制结构
        table.rule(
            N::Conditions,
            &[T::If],
            &[
                t(T::If),
                t(T::LParen),
                n(N::Condition),
                t(T::RParen),
                n(N::Block),
                n(N::OptionalElse),
            ],
        );
        table.rule(N::Block, &[T::LBrace], &[t(T::LBrace), n(N::Code), t(T::RBrace)]);
        table.rule(
            N::OptionalElse,
            &[T::Else],
            &[t(T::Else), t(T::LBrace), n(N::Code), t(T::RBrace)],
        );
        table.rule(N::OptionalElse, &STATEMENT_STARTS, &[]);
        table.rule(N::OptionalElse, &[T::EndProg, T::RBrace], &[]);

        // 循环
        table.rule(
            N::Loops,
            &[T::While],
            &[
                t(T::While),
                t(T::LParen),
                n(N::Condition),
                t(T::RParen),
                n(N::Block),
            ],
        );
        table.rule(
            N::Loops,
            &[T::For],
            &[
                t(T::For),
                t(T::LParen),
                n(N::ForInit),
                t(T::Semi),
                n(N::Condition),
                t(T::Semi),
                n(N::ExpressionStatement),
                t(T::RParen),
                n(N::Block),
            ],
        );
        table.rule(N::ForInit, &[T::DecVar], &[n(N::VarDec)]);
        table.rule(N::ForInit, &[T::Id], &[n(N::ExpressionStatement)]);

        // 方法
        table.rule(
            N::Method,
            &[T::Method],
            &[
                t(T::Method),
                t(T::Id),
                t(T::LParen),
                n(N::ParamList),
                t(T::RParen),
                n(N::Block),
            ],
        );
        table.rule(N::ParamList, &[T::Type], &[n(N::ParamItem), n(N::RestParams)]);
        table.rule(N::ParamList, &[T::RParen], &[]);
        table.rule(N::ParamItem, &[T::Type], &[t(T::Type), t(T::Id)]);
        table.rule(
            N::RestParams,
            &[T::Comma],
            &[t(T::Comma), n(N::ParamItem), n(N::RestParams)],
        );
        table.rule(N::RestParams, &[T::RParen], &[]);

        // 数组
        table.rule(
            N::ArrayDec,
            &[T::Array],
            &[
                t(T::Array),
                t(T::Id),
                t(T::LBrack),
                n(N::ArraySize),
                t(T::RBrack),
                t(T::Colon),
                t(T::Type),
                t(T::EndStmt),
            ],
        );
        table.rule(N::ArraySize, &[T::Number], &[t(T::Number)]);
        table.rule(N::ArraySize, &[T::Id], &[t(T::Id)]);

        // 输入输出
        table.rule(
            N::Print,
            &[T::Print],
            &[
                t(T::Print),
                t(T::LParen),
                n(N::Printable),
                t(T::RParen),
                t(T::EndStmt),
            ],
        );
        table.rule(N::Printable, &[T::String], &[t(T::String)]);
        table.rule(
            N::Printable,
            &[T::Id, T::Number, T::Boolean, T::LParen],
            &[n(N::Expresion)],
        );
        table.rule(
            N::Input,
            &[T::Read],
            &[
                t(T::Read),
                t(T::LParen),
                t(T::Id),
                t(T::RParen),
                t(T::EndStmt),
            ],
        );

        // 流程控制
        table.rule(N::Break, &[T::Break], &[t(T::Break), t(T::EndStmt)]);
        table.rule(N::Continue, &[T::Continue], &[t(T::Continue), t(T::EndStmt)]);
        table.rule(
            N::Return,
            &[T::Return],
            &[t(T::Return), n(N::Expresion), t(T::EndStmt)],
        );

        // 注释作为空语句
        table.rule(N::Comment, &[T::Comment], &[t(T::Comment)]);

        table
    }
}

impl fmt::Display for ParseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (nt, lookahead, production) in self.entries() {
            writeln!(f, "{nt} -> {lookahead} : {production}")?;
        }
        Ok(())
    }
}

/// 恐慌模式恢复用的同步集合
#[derive(Debug)]
pub struct SyncSets {
    sets: HashMap<NonTerminal, HashSet<TokenKind>>,
}

impl SyncSets {
    /// 进程内共享的只读同步集合
    pub fn get() -> &'static SyncSets {
        &SYNC_SETS
    }

    /// 没有登记集合的非终结符返回 `None`
    pub fn sync_set(&self, nt: NonTerminal) -> Option<&HashSet<TokenKind>> {
        self.sets.get(&nt)
    }

    fn build() -> Self {
        use NonTerminal as N;
        use TokenKind as T;

        let sets = [
            (N::Statement, vec![T::EndStmt, T::Semi, T::RBrace, T::EndProg]),
            (N::VarDec, vec![T::EndDec, T::EndStmt, T::RBrace, T::EndProg]),
            (N::Method, vec![T::RBrace, T::EndProg]),
            (N::Conditions, vec![T::Else, T::EndStmt, T::RBrace, T::EndProg]),
            (N::Loops, vec![T::RBrace, T::EndProg]),
            (N::Block, vec![T::RBrace, T::EndProg, T::Else]),
            (
                N::Expresion,
                vec![T::EndStmt, T::Semi, T::RParen, T::Comma, T::RBrack],
            ),
            (N::Code, vec![T::EndProg, T::RBrace]),
        ];

        Self {
            sets: sets
                .into_iter()
                .map(|(nt, kinds)| (nt, kinds.into_iter().collect()))
                .collect(),
        }
    }
}
