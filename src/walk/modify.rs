//! The shared insert/update/lookup descent. One
//! function, generic over [`RoleHooks`], walks both the prover's
//! materialized tree and the verifier's proof-backed stand-in; the
//! four hooks are the only place role-specific logic lives.

use std::rc::Rc;

use crate::config::AvlConfig;
use crate::error::Error;
use crate::hooks::RoleHooks;
use crate::key::Key;
use crate::node::{InternalNode, LeafNode, Node, NodeRef};
use crate::operation::UpdateFn;
use crate::value::Value;

use super::rotate;

/// A single in-flight request threaded down the recursion. `update_fn`
/// is consumed exactly once, at the leaf the descent identifies as the
/// operation's target.
pub(crate) struct ModifyRequest<'a, E> {
    pub key: &'a Key,
    pub is_lookup: bool,
    pub update_fn: Option<UpdateFn<E>>,
}

/// What a subtree's modify walk reports to its parent.
pub(crate) struct ModifyOutcome {
    pub new_node: NodeRef,
    pub changed: bool,
    pub height_increased: bool,
    pub to_delete: bool,
    pub old_value: Option<Value>,
}

pub(crate) fn modify_helper<H: RoleHooks>(
    hooks: &mut H,
    node: NodeRef,
    request: &mut ModifyRequest<H::UpdateError>,
    config: &AvlConfig,
) -> Result<ModifyOutcome, Error<H::UpdateError>> {
    match &*node {
        Node::LabelOnly(_) => Err(Error::Protocol("reached a LabelOnlyNode during the modify walk")),
        Node::Leaf(leaf) => modify_leaf(hooks, &node, leaf, request, config),
        Node::Internal(inode) => modify_internal(hooks, &node, inode, request, config),
    }
}

fn modify_leaf<H: RoleHooks>(
    hooks: &mut H,
    node_ref: &NodeRef,
    leaf: &LeafNode,
    request: &mut ModifyRequest<H::UpdateError>,
    config: &AvlConfig,
) -> Result<ModifyOutcome, Error<H::UpdateError>> {
    let matches = hooks.key_matches_leaf(request.key, leaf);

    if request.is_lookup {
        node_ref.mark_visited();
        let old_value = if matches { Some(leaf.value.clone()) } else { None };
        return Ok(ModifyOutcome {
            new_node: node_ref.clone(),
            changed: false,
            height_increased: false,
            to_delete: false,
            old_value,
        });
    }

    let update_fn = request
        .update_fn
        .take()
        .expect("modify_leaf reached with update_fn already consumed");
    let current = if matches { Some(leaf.value.clone()) } else { None };

    match update_fn.call(current) {
        Err(e) => Err(Error::UpdateRejected(e)),
        Ok(None) if matches => {
            // Deletion is deferred to the delete walk; the leaf itself
            // does not change yet.
            node_ref.mark_visited();
            Ok(ModifyOutcome {
                new_node: node_ref.clone(),
                changed: false,
                height_increased: false,
                to_delete: true,
                old_value: Some(leaf.value.clone()),
            })
        }
        Ok(None) => {
            // No-op: nothing here to delete, nothing to insert.
            node_ref.mark_visited();
            Ok(ModifyOutcome {
                new_node: node_ref.clone(),
                changed: false,
                height_increased: false,
                to_delete: false,
                old_value: None,
            })
        }
        Ok(Some(new_value)) => {
            if !config.value_length.validate(new_value.len()) {
                return Err(Error::Precondition("update_fn returned a value of the wrong length"));
            }
            if matches {
                node_ref.mark_visited();
                let new_leaf = LeafNode::get_new(leaf, Some(new_value), None, hooks);
                let new_node: NodeRef = Rc::new(Node::Leaf(new_leaf));
                new_node.mark_visited();
                Ok(ModifyOutcome {
                    new_node,
                    changed: true,
                    height_increased: false,
                    to_delete: false,
                    old_value: Some(leaf.value.clone()),
                })
            } else {
                node_ref.mark_visited();
                let new_subtree = hooks.make_leaf_pair(leaf, request.key, &new_value)?;
                Ok(ModifyOutcome {
                    new_node: new_subtree,
                    changed: true,
                    height_increased: true,
                    to_delete: false,
                    old_value: None,
                })
            }
        }
    }
}

fn modify_internal<H: RoleHooks>(
    hooks: &mut H,
    node_ref: &NodeRef,
    inode: &InternalNode,
    request: &mut ModifyRequest<H::UpdateError>,
    config: &AvlConfig,
) -> Result<ModifyOutcome, Error<H::UpdateError>> {
    let go_left = hooks.next_direction_is_left(request.key, inode);
    let child = if go_left { inode.left.clone() } else { inode.right.clone() };
    let child_outcome = modify_helper(hooks, child, request, config)?;

    // The recursive call succeeded, so this node's own participation
    // can no longer fail: safe to mark it visited.
    node_ref.mark_visited();

    if !child_outcome.changed {
        return Ok(ModifyOutcome {
            new_node: node_ref.clone(),
            changed: false,
            height_increased: false,
            to_delete: child_outcome.to_delete,
            old_value: child_outcome.old_value,
        });
    }

    if !child_outcome.height_increased {
        let new_inode = if go_left {
            InternalNode::get_new(inode, Some(child_outcome.new_node), None, None, None, hooks)
        } else {
            InternalNode::get_new(inode, None, Some(child_outcome.new_node), None, None, hooks)
        };
        let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
        new_node.mark_visited();
        return Ok(ModifyOutcome {
            new_node,
            changed: true,
            height_increased: false,
            to_delete: false,
            old_value: child_outcome.old_value,
        });
    }

    let old_value = child_outcome.old_value;
    if go_left {
        if inode.balance < 0 {
            let new_left = child_outcome.new_node;
            let new_left_inode = new_left
                .as_internal()
                .ok_or(Error::Protocol("insert rotation pivot must be internal"))?;
            if new_left_inode.balance < 0 {
                log::trace!("single right rotation");
                let pivot_right = new_left_inode.right.clone();
                let new_cur = InternalNode::get_new(inode, Some(pivot_right), None, Some(0), None, hooks);
                let new_cur_ref: NodeRef = Rc::new(Node::Internal(new_cur));
                new_cur_ref.mark_visited();
                let top = InternalNode::get_new(new_left_inode, None, Some(new_cur_ref), Some(0), None, hooks);
                let new_node: NodeRef = Rc::new(Node::Internal(top));
                new_node.mark_visited();
                Ok(ModifyOutcome {
                    new_node,
                    changed: true,
                    height_increased: false,
                    to_delete: false,
                    old_value,
                })
            } else {
                let p = new_left_inode.right.clone();
                p.mark_visited();
                let top = rotate::double_right_rotation(
                    inode.routing_key.clone(),
                    new_left_inode,
                    inode.right.clone(),
                    hooks,
                )?;
                Ok(ModifyOutcome {
                    new_node: top,
                    changed: true,
                    height_increased: false,
                    to_delete: false,
                    old_value,
                })
            }
        } else {
            let my_height_increased = inode.balance == 0;
            let new_balance = inode.balance - 1;
            let new_inode =
                InternalNode::get_new(inode, Some(child_outcome.new_node), None, Some(new_balance), None, hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
            new_node.mark_visited();
            Ok(ModifyOutcome {
                new_node,
                changed: true,
                height_increased: my_height_increased,
                to_delete: false,
                old_value,
            })
        }
    } else if inode.balance > 0 {
        let new_right = child_outcome.new_node;
        let new_right_inode = new_right
            .as_internal()
            .ok_or(Error::Protocol("insert rotation pivot must be internal"))?;
        if new_right_inode.balance > 0 {
            log::trace!("single left rotation");
            let pivot_left = new_right_inode.left.clone();
            let new_cur = InternalNode::get_new(inode, None, Some(pivot_left), Some(0), None, hooks);
            let new_cur_ref: NodeRef = Rc::new(Node::Internal(new_cur));
            new_cur_ref.mark_visited();
            let top = InternalNode::get_new(new_right_inode, Some(new_cur_ref), None, Some(0), None, hooks);
            let new_node: NodeRef = Rc::new(Node::Internal(top));
            new_node.mark_visited();
            Ok(ModifyOutcome {
                new_node,
                changed: true,
                height_increased: false,
                to_delete: false,
                old_value,
            })
        } else {
            let p = new_right_inode.left.clone();
            p.mark_visited();
            let top =
                rotate::double_left_rotation(inode.routing_key.clone(), inode.left.clone(), new_right_inode, hooks)?;
            Ok(ModifyOutcome {
                new_node: top,
                changed: true,
                height_increased: false,
                to_delete: false,
                old_value,
            })
        }
    } else {
        let my_height_increased = inode.balance == 0;
        let new_balance = inode.balance + 1;
        let new_inode =
            InternalNode::get_new(inode, None, Some(child_outcome.new_node), Some(new_balance), None, hooks);
        let new_node: NodeRef = Rc::new(Node::Internal(new_inode));
        new_node.mark_visited();
        Ok(ModifyOutcome {
            new_node,
            changed: true,
            height_increased: my_height_increased,
            to_delete: false,
            old_value,
        })
    }
}
