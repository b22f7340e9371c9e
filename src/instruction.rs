//! Three-address instructions and their canonical four-field rendering (§6).

use crate::address::Address;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Assign { dst: Address, src: Address },
    BinaryOp { dst: Address, op: String, a: Address, b: Address },
    UnaryOp { dst: Address, op: String, a: Address },
    Store { addr: Address, value: Address },
    Goto { label: String },
    IfTrueGoto { cond: Address, label: String },
    IfFalseGoto { cond: Address, label: String },
    Label { label: String, description: Option<String> },
    DeclareSymbol { name: String, type_name: String, line: usize },
    BeginBlock { line: usize },
    EndBlock { line: usize },
    Comment { text: String },
}

impl Instruction {
    /// Renders in the canonical four-field form `(op, a, b, c)`, `_` for unused
    /// slots, except for the handful of variants (labels, block markers,
    /// declarations, comments) that render in their own special-cased form.
    pub fn render(&self) -> String {
        match self {
            Instruction::Assign { dst, src } => format!("(=, {}, _, {})", src, dst),
            Instruction::BinaryOp { dst, op, a, b } => format!("({}, {}, {}, {})", op, a, b, dst),
            Instruction::UnaryOp { dst, op, a } => format!("({}, {}, _, {})", op, a, dst),
            Instruction::Store { addr, value } => format!("(store, {}, {}, _)", addr, value),
            Instruction::Goto { label } => format!("(goto, _, _, {})", label),
            Instruction::IfTrueGoto { cond, label } => {
                format!("(iftrue, {}, _, {})", cond, label)
            }
            Instruction::IfFalseGoto { cond, label } => {
                format!("(iffalse, {}, _, {})", cond, label)
            }
            Instruction::Label { label, description } => match description {
                Some(d) => format!("{}:\t# {}", label, d),
                None => format!("{}:", label),
            },
            Instruction::DeclareSymbol { name, type_name, line } => {
                format!("DECLARE {} : {} (Line: {})", name, type_name, line)
            }
            Instruction::BeginBlock { line } => format!("BEGIN_BLOCK (Line: {})", line),
            Instruction::EndBlock { line } => format!("END_BLOCK (Line: {})", line),
            Instruction::Comment { text } => format!("# {}", text),
        }
    }

    /// The label this instruction defines, if it is a `Label`.
    pub fn defined_label(&self) -> Option<&str> {
        match self {
            Instruction::Label { label, .. } => Some(label),
            _ => None,
        }
    }

    /// The label this instruction jumps to, if it is a jump.
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Instruction::Goto { label }
            | Instruction::IfTrueGoto { label, .. }
            | Instruction::IfFalseGoto { label, .. } => Some(label),
            _ => None,
        }
    }
}

pub fn render_program(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(Instruction::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_op_renders_operator_first() {
        let ins = Instruction::BinaryOp {
            dst: Address::Name("t0".into()),
            op: "+".into(),
            a: Address::Constant("3".into(), "int".into()),
            b: Address::Constant("4".into(), "int".into()),
        };
        assert_eq!(ins.render(), "(+, 3, 4, t0)");
    }

    #[test]
    fn assign_renders_src_then_dst() {
        let ins = Instruction::Assign {
            dst: Address::Name("x_scope1".into()),
            src: Address::Name("t0".into()),
        };
        assert_eq!(ins.render(), "(=, t0, _, x_scope1)");
    }

    #[test]
    fn store_renders_address_then_value() {
        let ins = Instruction::Store {
            addr: Address::Name("t1".into()),
            value: Address::Constant("5".into(), "int".into()),
        };
        assert_eq!(ins.render(), "(store, t1, 5, _)");
    }
}
