//! The shared deletion descent. Entered only after a
//! modify walk set `to_delete`; the spine is walked a second time,
//! guided by [`RoleHooks::replay_comparison`] rather than
//! recomputing comparisons, so prover and verifier make identical
//! decisions even though the verifier never sees the deleted value.

use std::rc::Rc;

use crate::error::Error;
use crate::hooks::RoleHooks;
use crate::key::Key;
use crate::node::{InternalNode, LeafNode, Node, NodeRef};
use crate::value::Value;

use super::rotate;

/// What a subtree's delete walk reports to its parent, plus the
/// `saved` scratch slot used to shuttle the in-order predecessor key
/// and value up from a "hard" deletion's recursive descent rather
/// than threading it through mutable shared state.
pub(crate) struct DeleteOutcome {
    pub new_node: NodeRef,
    pub height_decreased: bool,
    pub saved: Option<(Key, Value)>,
}

pub(crate) fn delete_helper<H: RoleHooks>(
    hooks: &mut H,
    node: NodeRef,
    delete_max: bool,
) -> Result<DeleteOutcome, Error<H::UpdateError>> {
    let inode = match &*node {
        Node::Internal(inode) => inode,
        Node::Leaf(_) => return Err(Error::Protocol("delete walk reached a leaf directly")),
        Node::LabelOnly(_) => return Err(Error::Protocol("reached a LabelOnlyNode during the delete walk")),
    };

    let direction = if delete_max { 1 } else { hooks.replay_comparison()? };

    if direction < 0 && inode.left.is_leaf() {
        return Err(Error::Invariant(
            "delete walk direction points left into a leaf sibling; the key was never in the tree",
        ));
    }

    // Easy deletion: the side the descent is heading into is itself a
    // leaf, so there is no further structure to recurse through.
    if direction >= 0 {
        if let Some(right_leaf) = inode.right.as_leaf() {
            log::debug!("easy deletion: target's right sibling is a leaf");
            node.mark_visited();
            inode.right.mark_visited();
            if delete_max {
                let saved = Some((right_leaf.key.clone(), right_leaf.value.clone()));
                return Ok(DeleteOutcome {
                    new_node: inode.left.clone(),
                    height_decreased: true,
                    saved,
                });
            }
            let new_left = change_next_leaf_key_of_max_node(hooks, inode.left.clone(), right_leaf.next_leaf_key.clone())?;
            return Ok(DeleteOutcome {
                new_node: new_left,
                height_decreased: true,
                saved: None,
            });
        }
    }
    if direction == 0 {
        if let Some(left_leaf) = inode.left.as_leaf() {
            log::debug!("easy deletion: target's left sibling is a leaf");
            node.mark_visited();
            inode.left.mark_visited();
            let new_right =
                change_key_and_value_of_min_node(hooks, inode.right.clone(), left_leaf.key.clone(), left_leaf.value.clone())?;
            return Ok(DeleteOutcome {
                new_node: new_right,
                height_decreased: true,
                saved: None,
            });
        }
    }

    // Hard deletion: recurse further down the appropriate side.
    log::debug!("hard deletion: recursing further before a leaf sibling is found");
    node.mark_visited();

    if direction <= 0 {
        let child_delete_max = direction == 0;
        let child = delete_helper(hooks, inode.left.clone(), child_delete_max)?;

        let mut routing_key = inode.routing_key.clone();
        let mut right = inode.right.clone();
        let mut saved = child.saved;
        if direction == 0 {
            let (saved_key, saved_value) = saved
                .take()
                .ok_or(Error::Protocol("saved scratch slot empty at routing-key rewrite"))?;
            routing_key = saved_key.clone();
            right = change_key_and_value_of_min_node(hooks, right, saved_key, saved_value)?;
        }
        let new_left = child.new_node;

        if !child.height_decreased {
            let new_inode = InternalNode::get_new(inode, Some(new_left), Some(right), None, Some(routing_key), hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            return Ok(DeleteOutcome {
                new_node,
                height_decreased: false,
                saved,
            });
        }

        if inode.balance > 0 {
            right.mark_visited();
            let right_inode = right
                .as_internal()
                .ok_or(Error::Protocol("delete rotation sibling must be internal"))?;
            if right_inode.balance < 0 {
                let p = right_inode.left.clone();
                p.mark_visited();
                let top = rotate::double_left_rotation(routing_key, new_left, right_inode, hooks)?;
                Ok(DeleteOutcome {
                    new_node: top,
                    height_decreased: true,
                    saved,
                })
            } else {
                log::trace!("single left rotation");
                let rb = right_inode.balance;
                let new_cur_balance = 1 - rb;
                let new_top_balance = rb - 1;
                let new_cur = InternalNode::get_new(
                    inode,
                    Some(new_left),
                    Some(right_inode.left.clone()),
                    Some(new_cur_balance),
                    Some(routing_key),
                    hooks,
                );
                let new_cur_ref: NodeRef = Rc::new(Node::Internal(new_cur));
                new_cur_ref.mark_visited();
                let top = InternalNode::get_new(right_inode, Some(new_cur_ref), None, Some(new_top_balance), None, hooks);
                let new_node: NodeRef = Rc::new(Node::Internal(top));
                new_node.mark_visited();
                Ok(DeleteOutcome {
                    new_node,
                    height_decreased: new_top_balance == 0,
                    saved,
                })
            }
        } else {
            let new_balance = inode.balance + 1;
            let new_inode = InternalNode::get_new(inode, Some(new_left), Some(right), Some(new_balance), Some(routing_key), hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            Ok(DeleteOutcome {
                new_node,
                height_decreased: new_balance == 0,
                saved,
            })
        }
    } else {
        let child = delete_helper(hooks, inode.right.clone(), delete_max)?;
        let new_right = child.new_node;
        let saved = child.saved;

        if !child.height_decreased {
            let new_inode = InternalNode::get_new(inode, None, Some(new_right), None, None, hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            return Ok(DeleteOutcome {
                new_node,
                height_decreased: false,
                saved,
            });
        }

        if inode.balance < 0 {
            let left = inode.left.clone();
            left.mark_visited();
            let left_inode = left
                .as_internal()
                .ok_or(Error::Protocol("delete rotation sibling must be internal"))?;
            if left_inode.balance > 0 {
                let p = left_inode.right.clone();
                p.mark_visited();
                let top = rotate::double_right_rotation(inode.routing_key.clone(), left_inode, new_right, hooks)?;
                Ok(DeleteOutcome {
                    new_node: top,
                    height_decreased: true,
                    saved,
                })
            } else {
                log::trace!("single right rotation");
                let lb = left_inode.balance;
                let new_cur_balance = -1 - lb;
                let new_top_balance = lb + 1;
                let new_cur = InternalNode::get_new(
                    inode,
                    Some(left_inode.right.clone()),
                    Some(new_right),
                    Some(new_cur_balance),
                    None,
                    hooks,
                );
                let new_cur_ref: NodeRef = Rc::new(Node::Internal(new_cur));
                new_cur_ref.mark_visited();
                let top = InternalNode::get_new(left_inode, None, Some(new_cur_ref), Some(new_top_balance), None, hooks);
                let new_node: NodeRef = Rc::new(Node::Internal(top));
                new_node.mark_visited();
                Ok(DeleteOutcome {
                    new_node,
                    height_decreased: new_top_balance == 0,
                    saved,
                })
            }
        } else {
            let new_balance = inode.balance - 1;
            let new_inode = InternalNode::get_new(inode, None, Some(new_right), Some(new_balance), None, hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            Ok(DeleteOutcome {
                new_node,
                height_decreased: new_balance == 0,
                saved,
            })
        }
    }
}

/// Walks the right spine of `node` to its maximum leaf, rewriting that
/// leaf's `next_leaf_key`. Marks every node it passes through visited.
pub(crate) fn change_next_leaf_key_of_max_node<H: RoleHooks>(
    hooks: &H,
    node: NodeRef,
    new_next_leaf_key: Key,
) -> Result<NodeRef, Error<H::UpdateError>> {
    node.mark_visited();
    match &*node {
        Node::Leaf(leaf) => {
            let new_leaf = LeafNode::get_new(leaf, None, Some(new_next_leaf_key), hooks);
            let new_node: NodeRef = Rc::new(Node::Leaf(new_leaf));
            new_node.mark_visited();
            Ok(new_node)
        }
        Node::Internal(inode) => {
            let new_right = change_next_leaf_key_of_max_node(hooks, inode.right.clone(), new_next_leaf_key)?;
            let new_inode = InternalNode::get_new(inode, None, Some(new_right), None, None, hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            Ok(new_node)
        }
        Node::LabelOnly(_) => Err(Error::Protocol("reached a LabelOnlyNode rewriting the max-leaf spine")),
    }
}

/// Walks the left spine of `node` to its minimum leaf, rewriting that
/// leaf's key and value. Marks every node it passes through visited.
pub(crate) fn change_key_and_value_of_min_node<H: RoleHooks>(
    hooks: &H,
    node: NodeRef,
    new_key: Key,
    new_value: Value,
) -> Result<NodeRef, Error<H::UpdateError>> {
    node.mark_visited();
    match &*node {
        Node::Leaf(leaf) => {
            let new_leaf = LeafNode::get_new_with_key(leaf, new_key, new_value, hooks);
            let new_node: NodeRef = Rc::new(Node::Leaf(new_leaf));
            new_node.mark_visited();
            Ok(new_node)
        }
        Node::Internal(inode) => {
            let new_left = change_key_and_value_of_min_node(hooks, inode.left.clone(), new_key, new_value)?;
            let new_inode = InternalNode::get_new(inode, Some(new_left), None, None, None, hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            Ok(new_node)
        }
        Node::LabelOnly(_) => Err(Error::Protocol("reached a LabelOnlyNode rewriting the min-leaf spine")),
    }
}
