//! Syntax-directed three-address-code generation (§4.6): a single post-order walk
//! of the AST, owning its own temp/label counters and break-label stack rather
//! than reaching for process-level globals (design note, §9).

use crate::address::Address;
use crate::ast::{BinaryOp, Block, Decl, Expr, Loc, Program, ShortCircuitOp, Stmt, UnaryOp};
use crate::error::SemanticError;
use crate::instruction::Instruction;
use crate::symtab::{size_of, SymbolKind, SymbolTable};

/// The TAC operand and static type produced by lowering an expression. Kept as a
/// plain return value instead of mutating the AST node (see `ast.rs`).
#[derive(Debug, Clone, PartialEq)]
pub struct Lowered {
    pub place: Address,
    pub type_string: String,
}

pub struct TacGenerator {
    instructions: Vec<Instruction>,
    next_temp: u32,
    next_label: u32,
    break_stack: Vec<String>,
    pub symbols: SymbolTable,
    pub errors: Vec<SemanticError>,
}

impl Default for TacGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TacGenerator {
    pub fn new() -> Self {
        TacGenerator {
            instructions: Vec::new(),
            next_temp: 0,
            next_label: 0,
            break_stack: Vec::new(),
            symbols: SymbolTable::new(),
            errors: Vec::new(),
        }
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn new_temp(&mut self) -> Address {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        Address::Name(name)
    }

    fn new_label(&mut self, description: Option<&str>) -> String {
        let name = format!("L{}", self.next_label);
        self.next_label += 1;
        let _ = description;
        name
    }

    fn push_break(&mut self, label: String) {
        self.break_stack.push(label);
    }

    fn pop_break(&mut self) {
        self.break_stack.pop();
    }

    fn current_break(&mut self, line: usize) -> Option<String> {
        match self.break_stack.last().cloned() {
            Some(l) => Some(l),
            None => {
                self.errors.push(SemanticError::BreakOutsideLoop { line });
                None
            }
        }
    }

    pub fn generate(&mut self, program: &Program) {
        self.lower_block(&program.block);
    }

    fn lower_block(&mut self, block: &Block) {
        self.emit(Instruction::BeginBlock { line: block.pos.line });
        self.symbols.enter_scope();
        for decl in &block.decls {
            self.lower_decl(decl);
        }
        for stmt in &block.stmts {
            self.lower_stmt(stmt);
        }
        self.symbols.leave_scope();
        self.emit(Instruction::EndBlock { line: block.pos.line });
    }

    fn lower_decl(&mut self, decl: &Decl) {
        let type_string = decl.type_.to_type_string();
        match self.symbols.add(&decl.name, &type_string, SymbolKind::Variable, decl.pos.line) {
            Ok(_) => {}
            Err(e) => self.errors.push(e),
        }
        self.emit(Instruction::DeclareSymbol {
            name: decl.name.clone(),
            type_name: type_string,
            line: decl.pos.line,
        });
    }

    fn lower_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { loc, expr, .. } => {
                let rhs = self.lower_expr(expr);
                let target = self.lower_loc(loc);
                match target.is_store {
                    true => self.emit(Instruction::Store {
                        addr: target.lowered.place,
                        value: rhs.place,
                    }),
                    false => self.emit(Instruction::Assign {
                        dst: target.lowered.place,
                        src: rhs.place,
                    }),
                }
            }
            Stmt::If { cond, then_branch, else_branch: None, .. } => {
                let c = self.lower_expr(cond);
                let end = self.new_label(None);
                self.emit(Instruction::IfFalseGoto { cond: c.place, label: end.clone() });
                self.lower_stmt(then_branch);
                self.emit(Instruction::Label { label: end, description: None });
            }
            Stmt::If { cond, then_branch, else_branch: Some(else_branch), .. } => {
                let c = self.lower_expr(cond);
                let else_label = self.new_label(None);
                let end = self.new_label(None);
                self.emit(Instruction::IfFalseGoto { cond: c.place, label: else_label.clone() });
                self.lower_stmt(then_branch);
                self.emit(Instruction::Goto { label: end.clone() });
                self.emit(Instruction::Label { label: else_label, description: None });
                self.lower_stmt(else_branch);
                self.emit(Instruction::Label { label: end, description: None });
            }
            Stmt::While { cond, body, .. } => {
                let cond_label = self.new_label(None);
                let exit_label = self.new_label(None);
                self.emit(Instruction::Label { label: cond_label.clone(), description: None });
                let c = self.lower_expr(cond);
                self.emit(Instruction::IfFalseGoto { cond: c.place, label: exit_label.clone() });
                self.push_break(exit_label.clone());
                self.lower_stmt(body);
                self.pop_break();
                self.emit(Instruction::Goto { label: cond_label });
                self.emit(Instruction::Label { label: exit_label, description: None });
            }
            Stmt::DoWhile { body, cond, .. } => {
                let start_label = self.new_label(None);
                let exit_label = self.new_label(None);
                self.emit(Instruction::Label { label: start_label.clone(), description: None });
                self.push_break(exit_label.clone());
                self.lower_stmt(body);
                self.pop_break();
                let c = self.lower_expr(cond);
                self.emit(Instruction::IfTrueGoto { cond: c.place, label: start_label });
                self.emit(Instruction::Label { label: exit_label, description: None });
            }
            Stmt::Break(pos) => {
                if let Some(label) = self.current_break(pos.line) {
                    self.emit(Instruction::Goto { label });
                }
            }
            Stmt::Block(block) => self.lower_block(block),
        }
    }

    fn lower_expr(&mut self, expr: &Expr) -> Lowered {
        match expr {
            Expr::IntLiteral(v, _) => Lowered {
                place: Address::Constant(v.to_string(), "int".to_string()),
                type_string: "int".to_string(),
            },
            Expr::FloatLiteral(v, _) => Lowered {
                place: Address::Constant(v.to_string(), "float".to_string()),
                type_string: "float".to_string(),
            },
            Expr::BoolLiteral(v, _) => Lowered {
                place: Address::Constant(v.to_string(), "bool".to_string()),
                type_string: "bool".to_string(),
            },
            Expr::Loc(loc) => self.lower_loc(loc).lowered,
            Expr::Paren(inner) => self.lower_expr(inner),
            Expr::Unary { op, operand, pos } => {
                let inner = self.lower_expr(operand);
                let dst = self.new_temp();
                let (op_str, type_string) = match op {
                    UnaryOp::Neg => {
                        if inner.type_string == "int" || inner.type_string == "float" {
                            ("-", inner.type_string.clone())
                        } else {
                            self.errors.push(SemanticError::TypeMismatch {
                                op: "-".into(),
                                lhs: inner.type_string.clone(),
                                rhs: String::new(),
                                line: pos.line,
                            });
                            ("-", "error_type".to_string())
                        }
                    }
                    UnaryOp::Not => {
                        if inner.type_string == "bool" {
                            ("!", "bool".to_string())
                        } else {
                            self.errors.push(SemanticError::TypeMismatch {
                                op: "!".into(),
                                lhs: inner.type_string.clone(),
                                rhs: String::new(),
                                line: pos.line,
                            });
                            ("!", "error_type".to_string())
                        }
                    }
                };
                self.emit(Instruction::UnaryOp {
                    dst: dst.clone(),
                    op: op_str.to_string(),
                    a: inner.place,
                });
                Lowered { place: dst, type_string }
            }
            Expr::Binary { op, lhs, rhs, pos } => {
                let l = self.lower_expr(lhs);
                let r = self.lower_expr(rhs);
                let dst = self.new_temp();
                let type_string = self.binary_result_type(op, &l.type_string, &r.type_string, pos.line);
                self.emit(Instruction::BinaryOp {
                    dst: dst.clone(),
                    op: op.as_str().to_string(),
                    a: l.place,
                    b: r.place,
                });
                Lowered { place: dst, type_string }
            }
            Expr::ShortCircuit { op, lhs, rhs, .. } => self.lower_short_circuit(*op, lhs, rhs),
        }
    }

    fn binary_result_type(&mut self, op: &BinaryOp, lhs: &str, rhs: &str, line: usize) -> String {
        if op.is_comparison() {
            return "bool".to_string();
        }
        match (lhs, rhs) {
            ("float", "float") | ("float", "int") | ("int", "float") => "float".to_string(),
            ("int", "int") => "int".to_string(),
            _ => {
                self.errors.push(SemanticError::TypeMismatch {
                    op: op.as_str().to_string(),
                    lhs: lhs.to_string(),
                    rhs: rhs.to_string(),
                    line,
                });
                "error_type".to_string()
            }
        }
    }

    /// Implements the short-circuit control-flow lowering from §4.6 literally:
    /// the right operand is only reached when the left one has not already
    /// decided the result.
    fn lower_short_circuit(&mut self, op: ShortCircuitOp, lhs: &Expr, rhs: &Expr) -> Lowered {
        let l = self.lower_expr(lhs);
        let result = self.new_temp();
        match op {
            ShortCircuitOp::And => {
                let false_label = self.new_label(None);
                let end = self.new_label(None);
                self.emit(Instruction::IfFalseGoto { cond: l.place, label: false_label.clone() });
                let r = self.lower_expr(rhs);
                self.emit(Instruction::IfFalseGoto { cond: r.place, label: false_label.clone() });
                self.emit(Instruction::Assign { dst: result.clone(), src: Address::constant_bool(true) });
                self.emit(Instruction::Goto { label: end.clone() });
                self.emit(Instruction::Label { label: false_label, description: None });
                self.emit(Instruction::Assign { dst: result.clone(), src: Address::constant_bool(false) });
                self.emit(Instruction::Label { label: end, description: None });
            }
            ShortCircuitOp::Or => {
                let true_label = self.new_label(None);
                let end = self.new_label(None);
                self.emit(Instruction::IfTrueGoto { cond: l.place, label: true_label.clone() });
                let r = self.lower_expr(rhs);
                self.emit(Instruction::IfTrueGoto { cond: r.place, label: true_label.clone() });
                self.emit(Instruction::Assign { dst: result.clone(), src: Address::constant_bool(false) });
                self.emit(Instruction::Goto { label: end.clone() });
                self.emit(Instruction::Label { label: true_label, description: None });
                self.emit(Instruction::Assign { dst: result.clone(), src: Address::constant_bool(true) });
                self.emit(Instruction::Label { label: end, description: None });
            }
        }
        Lowered { place: result, type_string: "bool".to_string() }
    }

    fn lower_loc(&mut self, loc: &Loc) -> LoweredLoc {
        match loc {
            Loc::Id { name, pos } => match self.symbols.lookup(name).cloned() {
                Some(entry) => LoweredLoc {
                    lowered: Lowered {
                        place: Address::Name(entry.address),
                        type_string: entry.type_string,
                    },
                    is_store: false,
                },
                None => {
                    self.errors.push(SemanticError::UndefinedVariable {
                        name: name.clone(),
                        line: pos.line,
                    });
                    LoweredLoc {
                        lowered: Lowered {
                            place: Address::Name(format!("UNDEFINED_VAR_{}", name)),
                            type_string: "error_type".to_string(),
                        },
                        is_store: false,
                    }
                }
            },
            Loc::Index { base, index, pos } => {
                let base_lowered = self.lower_loc(base);
                let idx = self.lower_expr(index);
                let (element_type, _count) = parse_array_type(&base_lowered.lowered.type_string)
                    .unwrap_or_else(|| {
                        self.errors.push(SemanticError::TypeMismatch {
                            op: "[]".to_string(),
                            lhs: base_lowered.lowered.type_string.clone(),
                            rhs: String::new(),
                            line: pos.line,
                        });
                        ("error_type".to_string(), 0)
                    });
                let element_size = size_of(&element_type);
                let offset = self.new_temp();
                self.emit(Instruction::BinaryOp {
                    dst: offset.clone(),
                    op: "*".to_string(),
                    a: idx.place,
                    b: Address::Constant(element_size.to_string(), "int".to_string()),
                });
                let addr = self.new_temp();
                self.emit(Instruction::BinaryOp {
                    dst: addr.clone(),
                    op: "+".to_string(),
                    a: base_lowered.lowered.place,
                    b: offset,
                });
                LoweredLoc {
                    lowered: Lowered {
                        place: addr,
                        type_string: element_type,
                    },
                    is_store: true,
                }
            }
        }
    }
}

struct LoweredLoc {
    lowered: Lowered,
    /// True when an assignment to this location must be emitted as `Store`
    /// (array element) rather than `Assign` (simple scalar).
    is_store: bool,
}

/// Splits `array(T, n)` the same way `symtab::size_of` does, returning the
/// element-type string and element count.
fn parse_array_type(type_string: &str) -> Option<(String, usize)> {
    let rest = type_string.strip_prefix("array(")?;
    let inner = rest.strip_suffix(')')?;
    let mut depth = 0i32;
    let mut split_at = None;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }
    let split_at = split_at?;
    let element = inner[..split_at].trim().to_string();
    let count: usize = inner[split_at + 1..].trim().parse().ok()?;
    Some((element, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Pos, Type};
    use crate::instruction::render_program;

    fn pos() -> Pos {
        Pos { line: 1, column: 1 }
    }

    /// Scenario (1): `{ int x ; x = 3 + 4 ; }`.
    #[test]
    fn assignment_scenario() {
        let program = Program {
            block: Block {
                pos: pos(),
                decls: vec![Decl { type_: Type::Basic("int".into()), name: "x".into(), pos: pos() }],
                stmts: vec![Stmt::Assign {
                    loc: Loc::Id { name: "x".into(), pos: pos() },
                    expr: Expr::Binary {
                        op: BinaryOp::Add,
                        lhs: Box::new(Expr::IntLiteral(3, pos())),
                        rhs: Box::new(Expr::IntLiteral(4, pos())),
                        pos: pos(),
                    },
                    pos: pos(),
                }],
            },
        };
        let mut gen = TacGenerator::new();
        gen.generate(&program);
        assert!(gen.errors.is_empty());
        let rendered = render_program(&gen.into_instructions());
        assert_eq!(
            rendered,
            "BEGIN_BLOCK (Line: 1)\nDECLARE x : int (Line: 1)\n(+, 3, 4, t0)\n(=, t0, _, x_scope1)\nEND_BLOCK (Line: 1)"
        );
    }

    /// Scenario (5): `{ int a [ 10 ] ; a [ 2 ] = 5 ; }`.
    #[test]
    fn array_element_store_scenario() {
        let program = Program {
            block: Block {
                pos: pos(),
                decls: vec![Decl {
                    type_: Type::Array(Box::new(Type::Basic("int".into())), 10),
                    name: "a".into(),
                    pos: pos(),
                }],
                stmts: vec![Stmt::Assign {
                    loc: Loc::Index {
                        base: Box::new(Loc::Id { name: "a".into(), pos: pos() }),
                        index: Box::new(Expr::IntLiteral(2, pos())),
                        pos: pos(),
                    },
                    expr: Expr::IntLiteral(5, pos()),
                    pos: pos(),
                }],
            },
        };
        let mut gen = TacGenerator::new();
        gen.generate(&program);
        assert!(gen.errors.is_empty());
        let rendered = render_program(&gen.into_instructions());
        assert_eq!(
            rendered,
            "BEGIN_BLOCK (Line: 1)\nDECLARE a : array(int,10) (Line: 1)\n(*, 2, 4, t0)\n(+, a_scope1, t0, t1)\n(store, t1, 5, _)\nEND_BLOCK (Line: 1)"
        );
    }

    /// Scenario (4): `{ bool p ; bool q ; p = p && q ; }`.
    #[test]
    fn short_circuit_and_scenario() {
        let program = Program {
            block: Block {
                pos: pos(),
                decls: vec![
                    Decl { type_: Type::Basic("bool".into()), name: "p".into(), pos: pos() },
                    Decl { type_: Type::Basic("bool".into()), name: "q".into(), pos: pos() },
                ],
                stmts: vec![Stmt::Assign {
                    loc: Loc::Id { name: "p".into(), pos: pos() },
                    expr: Expr::ShortCircuit {
                        op: ShortCircuitOp::And,
                        lhs: Box::new(Expr::Loc(Loc::Id { name: "p".into(), pos: pos() })),
                        rhs: Box::new(Expr::Loc(Loc::Id { name: "q".into(), pos: pos() })),
                        pos: pos(),
                    },
                    pos: pos(),
                }],
            },
        };
        let mut gen = TacGenerator::new();
        gen.generate(&program);
        assert!(gen.errors.is_empty());
        let rendered = render_program(&gen.into_instructions());
        assert_eq!(
            rendered,
            "BEGIN_BLOCK (Line: 1)\nDECLARE p : bool (Line: 1)\nDECLARE q : bool (Line: 1)\n\
             (iffalse, p_scope1, _, L0)\n(iffalse, q_scope1, _, L0)\n(=, true, _, t0)\n\
             (goto, _, _, L1)\nL0:\n(=, false, _, t0)\nL1:\n(=, t0, _, p_scope1)\nEND_BLOCK (Line: 1)"
        );
    }

    #[test]
    fn empty_block_has_no_intervening_instructions() {
        let program = Program {
            block: Block { pos: pos(), decls: vec![], stmts: vec![] },
        };
        let mut gen = TacGenerator::new();
        gen.generate(&program);
        let rendered = render_program(&gen.into_instructions());
        assert_eq!(rendered, "BEGIN_BLOCK (Line: 1)\nEND_BLOCK (Line: 1)");
    }

    #[test]
    fn break_outside_loop_is_reported() {
        let program = Program {
            block: Block { pos: pos(), decls: vec![], stmts: vec![Stmt::Break(pos())] },
        };
        let mut gen = TacGenerator::new();
        gen.generate(&program);
        assert_eq!(gen.errors.len(), 1);
        assert!(matches!(gen.errors[0], SemanticError::BreakOutsideLoop { .. }));
    }

    #[test]
    fn every_jump_target_has_exactly_one_matching_label() {
        let program = Program {
            block: Block {
                pos: pos(),
                decls: vec![Decl { type_: Type::Basic("bool".into()), name: "i".into(), pos: pos() }],
                stmts: vec![Stmt::While {
                    cond: Expr::Loc(Loc::Id { name: "i".into(), pos: pos() }),
                    body: Box::new(Stmt::Block(Block { pos: pos(), decls: vec![], stmts: vec![Stmt::Break(pos())] })),
                    pos: pos(),
                }],
            },
        };
        let mut gen = TacGenerator::new();
        gen.generate(&program);
        let instructions = gen.into_instructions();
        for target in instructions.iter().filter_map(Instruction::jump_target) {
            let count = instructions
                .iter()
                .filter(|i| i.defined_label() == Some(target))
                .count();
            assert_eq!(count, 1, "label {} must be defined exactly once", target);
        }
    }
}
