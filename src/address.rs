//! TAC operand addresses.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Address {
    Name(String),
    Constant(String, String),
    Label(String, Option<String>),
}

impl Address {
    pub fn constant_bool(value: bool) -> Self {
        Address::Constant(value.to_string(), "bool".to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Name(n) => write!(f, "{}", n),
            Address::Constant(v, _) => write!(f, "{}", v),
            Address::Label(l, _) => write!(f, "{}", l),
        }
    }
}
