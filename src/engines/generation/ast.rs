use crate::types::Operator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Boolean combinator tree over named signals.
///
/// Children are uniquely owned; `clone()` is a full structural copy, so two
/// individuals never share subtree storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprNode {
    Leaf {
        name: String,
    },
    Op {
        operator: Operator,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
}

/// A population member; `None` stands for a failed generation
pub type Individual = Option<ExprNode>;

impl ExprNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        ExprNode::Leaf { name: name.into() }
    }

    pub fn op(operator: Operator, left: ExprNode, right: ExprNode) -> Self {
        ExprNode::Op {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: ExprNode, right: ExprNode) -> Self {
        Self::op(Operator::And, left, right)
    }

    pub fn or(left: ExprNode, right: ExprNode) -> Self {
        Self::op(Operator::Or, left, right)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ExprNode::Leaf { .. })
    }

    /// Distinct leaf names in this subtree
    pub fn used_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.visit_leaves(&mut |name| {
            names.insert(name);
        });
        names
    }

    /// Leaf names in left-to-right order, duplicates kept
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit_leaves(&mut |name| names.push(name));
        names
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            ExprNode::Leaf { .. } => 1,
            ExprNode::Op { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Depth of the deepest leaf; a lone leaf has depth 0
    pub fn depth(&self) -> usize {
        match self {
            ExprNode::Leaf { .. } => 0,
            ExprNode::Op { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// True when no signal is referenced twice
    pub fn has_unique_names(&self) -> bool {
        self.used_names().len() == self.leaf_count()
    }

    pub fn is_disjoint_from(&self, other: &ExprNode) -> bool {
        self.used_names().is_disjoint(&other.used_names())
    }

    fn visit_leaves<'a, F: FnMut(&'a str)>(&'a self, f: &mut F) {
        match self {
            ExprNode::Leaf { name } => f(name),
            ExprNode::Op { left, right, .. } => {
                left.visit_leaves(f);
                right.visit_leaves(f);
            }
        }
    }
}

/// Fully parenthesized infix form, e.g. `((A AND B) OR C)`
impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Leaf { name } => f.write_str(name),
            ExprNode::Op {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

/// Recover referenced signal names from an expression string.
///
/// Splits on ASCII parentheses and whitespace and drops the operator
/// tokens. Names containing those characters cannot be recovered this way;
/// use [`ExprNode::leaf_names`] when the tree is at hand.
pub fn extract_signal_names(expression: &str) -> Vec<String> {
    expression
        .split(|c: char| c == '(' || c == ')' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter(|token| {
            !Operator::ALL
                .iter()
                .any(|op| token.eq_ignore_ascii_case(op.token()))
        })
        .map(str::to_string)
        .collect()
}
