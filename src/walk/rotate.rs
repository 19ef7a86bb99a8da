//! Pure node-graph transforms for the two double rotations. Single
//! rotations are inlined in `walk::modify` and `walk::delete` since
//! they rewrite balances differently depending on whether the walk is
//! inserting or deleting.

use std::rc::Rc;

use crate::error::Error;
use crate::key::Key;
use crate::label::Labeler;
use crate::node::{InternalNode, Node, NodeRef};

fn balance_pair_for_double_left(p_balance: i8) -> Option<(i8, i8)> {
    match p_balance {
        0 => Some((0, 0)),
        -1 => Some((0, 1)),
        1 => Some((-1, 0)),
        _ => None,
    }
}

fn balance_pair_for_double_right(p_balance: i8) -> Option<(i8, i8)> {
    match p_balance {
        0 => Some((0, 0)),
        1 => Some((-1, 0)),
        -1 => Some((0, 1)),
        _ => None,
    }
}

/// Double left rotation on `(cur, left, right)` where `right` is
/// internal and `right.left` (`p`) is internal. `cur_routing_key` is
/// `cur`'s routing key *as of the moment this rotation runs* — in the
/// deletion walk this may already have been overwritten with the
/// shuttled `saved` key before rotation is considered.
///
/// Caller contract: `right` and `p` must already be marked visited.
pub(crate) fn double_left_rotation<L: Labeler, E>(
    cur_routing_key: Key,
    left: NodeRef,
    right: &InternalNode,
    labeler: &L,
) -> Result<NodeRef, Error<E>> {
    log::trace!("double left rotation");
    let p = right
        .left
        .as_internal()
        .ok_or(Error::Protocol("double left rotation pivot must be internal"))?;
    let (new_left_balance, new_right_balance) = balance_pair_for_double_left(p.balance)
        .ok_or(Error::Invariant("pivot balance out of range during double left rotation"))?;

    let new_left_child: NodeRef = Rc::new(Node::Internal(InternalNode::new(
        new_left_balance,
        cur_routing_key,
        left,
        p.left.clone(),
        labeler,
    )));
    let new_right_child: NodeRef = Rc::new(Node::Internal(InternalNode::new(
        new_right_balance,
        right.routing_key.clone(),
        p.right.clone(),
        right.right.clone(),
        labeler,
    )));
    new_left_child.mark_visited();
    new_right_child.mark_visited();
    let top: NodeRef = Rc::new(Node::Internal(InternalNode::new(
        0,
        p.routing_key.clone(),
        new_left_child,
        new_right_child,
        labeler,
    )));
    top.mark_visited();
    Ok(top)
}

/// Mirror image of [`double_left_rotation`], with `p = left.right`.
///
/// Caller contract: `left` and `p` must already be marked visited.
pub(crate) fn double_right_rotation<L: Labeler, E>(
    cur_routing_key: Key,
    left: &InternalNode,
    right: NodeRef,
    labeler: &L,
) -> Result<NodeRef, Error<E>> {
    log::trace!("double right rotation");
    let p = left
        .right
        .as_internal()
        .ok_or(Error::Protocol("double right rotation pivot must be internal"))?;
    let (new_left_balance, new_right_balance) = balance_pair_for_double_right(p.balance)
        .ok_or(Error::Invariant("pivot balance out of range during double right rotation"))?;

    let new_left_child: NodeRef = Rc::new(Node::Internal(InternalNode::new(
        new_left_balance,
        left.routing_key.clone(),
        left.left.clone(),
        p.left.clone(),
        labeler,
    )));
    let new_right_child: NodeRef = Rc::new(Node::Internal(InternalNode::new(
        new_right_balance,
        cur_routing_key,
        p.right.clone(),
        right,
        labeler,
    )));
    new_left_child.mark_visited();
    new_right_child.mark_visited();
    let top: NodeRef = Rc::new(Node::Internal(InternalNode::new(
        0,
        p.routing_key.clone(),
        new_left_child,
        new_right_child,
        labeler,
    )));
    top.mark_visited();
    Ok(top)
}
