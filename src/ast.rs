//! The abstract syntax tree: a closed sum of node variants carrying source
//! position. No node type holds a cycle; every child is owned. `place`/
//! `type_string` are not stored on the node itself -- they are produced
//! as the return value of `TacGenerator::lower` (see `tac.rs`), which keeps the
//! tree immutable during code generation instead of threading `RefCell`s through
//! every expression variant.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortCircuitOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Basic(String),
    Array(Box<Type>, usize),
}

impl Type {
    /// The `size_of`-compatible string form, e.g. `array(array(int,5),3)`.
    pub fn to_type_string(&self) -> String {
        match self {
            Type::Basic(name) => name.clone(),
            Type::Array(elem, n) => format!("array({},{})", elem.to_type_string(), n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loc {
    Id { name: String, pos: Pos },
    Index { base: Box<Loc>, index: Box<Expr>, pos: Pos },
}

impl Loc {
    pub fn pos(&self) -> Pos {
        match self {
            Loc::Id { pos, .. } => *pos,
            Loc::Index { pos, .. } => *pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Loc(Loc),
    IntLiteral(i64, Pos),
    FloatLiteral(f64, Pos),
    BoolLiteral(bool, Pos),
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr>, pos: Pos },
    ShortCircuit { op: ShortCircuitOp, lhs: Box<Expr>, rhs: Box<Expr>, pos: Pos },
    Unary { op: UnaryOp, operand: Box<Expr>, pos: Pos },
    Paren(Box<Expr>),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Loc(l) => l.pos(),
            Expr::IntLiteral(_, p)
            | Expr::FloatLiteral(_, p)
            | Expr::BoolLiteral(_, p) => *p,
            Expr::Binary { pos, .. } | Expr::ShortCircuit { pos, .. } | Expr::Unary { pos, .. } => *pos,
            Expr::Paren(inner) => inner.pos(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub type_: Type,
    pub name: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { loc: Loc, expr: Expr, pos: Pos },
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>>, pos: Pos },
    While { cond: Expr, body: Box<Stmt>, pos: Pos },
    DoWhile { body: Box<Stmt>, cond: Expr, pos: Pos },
    Break(Pos),
    Block(Block),
}

impl Stmt {
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Assign { pos, .. }
            | Stmt::If { pos, .. }
            | Stmt::While { pos, .. }
            | Stmt::DoWhile { pos, .. }
            | Stmt::Break(pos) => *pos,
            Stmt::Block(b) => b.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub block: Block,
}
