// src/core/ast.rs
//! Abstract Syntax Tree for metric component expressions.

use crate::core::token::TokenKind;

/// Represents nodes in the Abstract Syntax Tree
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    NumberLiteral {
        text: String,
        line: usize,
        column: usize,
    },
    Identifier {
        name: String,
        line: usize,
        column: usize,
    },
    Call {
        name: String,
        args: Vec<ASTNode>,
        line: usize,
        column: usize,
    },
    BinaryExpr {
        op: TokenKind,
        left: Box<ASTNode>,
        right: Box<ASTNode>,
    },
    UnaryExpr {
        op: TokenKind,
        expr: Box<ASTNode>,
    },
}

impl ASTNode {
    // Utility constructors
    pub fn new_number_at(text: &str, line: usize, column: usize) -> Self {
        ASTNode::NumberLiteral { text: text.to_string(), line, column }
    }
    pub fn new_identifier_at(name: &str, line: usize, column: usize) -> Self {
        ASTNode::Identifier { name: name.to_string(), line, column }
    }
    pub fn new_call_at(name: &str, args: Vec<ASTNode>, line: usize, column: usize) -> Self {
        ASTNode::Call { name: name.to_string(), args, line, column }
    }
    pub fn new_binary_expr(op: TokenKind, left: ASTNode, right: ASTNode) -> Self {
        ASTNode::BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
    pub fn new_unary_expr(op: TokenKind, expr: ASTNode) -> Self {
        ASTNode::UnaryExpr {
            op,
            expr: Box::new(expr),
        }
    }

    /// Source position of the leftmost token of this node.
    pub fn position(&self) -> (usize, usize) {
        match self {
            ASTNode::NumberLiteral { line, column, .. }
            | ASTNode::Identifier { line, column, .. }
            | ASTNode::Call { line, column, .. } => (*line, *column),
            ASTNode::BinaryExpr { left, .. } => left.position(),
            ASTNode::UnaryExpr { expr, .. } => {
                let (line, column) = expr.position();
                (line, column.saturating_sub(1).max(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_node_position_is_left_operand() {
        let node = ASTNode::new_binary_expr(
            TokenKind::Plus,
            ASTNode::new_identifier_at("r", 1, 3),
            ASTNode::new_number_at("2", 1, 7),
        );
        assert_eq!(node.position(), (1, 3));
    }

    #[test]
    fn test_call_node() {
        let call = ASTNode::new_call_at("sin", vec![ASTNode::new_identifier_at("theta", 1, 5)], 1, 1);
        if let ASTNode::Call { name, args, .. } = call {
            assert_eq!(name, "sin");
            assert_eq!(args[0], ASTNode::new_identifier_at("theta", 1, 5));
        } else {
            panic!("Expected Call node");
        }
    }
}
