//! Debug tree dump, gated behind the `full` feature since `colored`/
//! `hex` are for human-facing debug output, not anything on the hot
//! path.

use colored::Colorize;

use crate::node::{Node, NodeRef};

/// Renders `root` as an indented tree, one line per node, to a string
/// suitable for printing during debugging or in a failing test's
/// output. Internal nodes show their balance and routing key; leaves
/// show key/value/next_leaf_key as hex. Visited nodes are highlighted.
pub fn render(root: &NodeRef) -> String {
    let mut out = String::new();
    render_rec(root, 0, &mut out);
    out
}

fn render_rec(node: &NodeRef, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match &**node {
        Node::Leaf(leaf) => {
            let line = format!(
                "{}leaf key={} value={} next={}",
                indent,
                hex::encode(leaf.key.as_bytes()),
                hex::encode(leaf.value.as_bytes()),
                hex::encode(leaf.next_leaf_key.as_bytes()),
            );
            out.push_str(&if node.is_visited() { line.green().to_string() } else { line });
            out.push('\n');
        }
        Node::Internal(inode) => {
            let line = format!(
                "{}node balance={} routing_key={}",
                indent,
                inode.balance,
                hex::encode(inode.routing_key.as_bytes()),
            );
            out.push_str(&if node.is_visited() { line.green().to_string() } else { line });
            out.push('\n');
            render_rec(&inode.left, depth + 1, out);
            render_rec(&inode.right, depth + 1, out);
        }
        Node::LabelOnly(s) => {
            out.push_str(&format!("{}label-only {}\n", indent, hex::encode(s.label.as_bytes()).dimmed()));
        }
    }
}
