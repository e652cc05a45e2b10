//! Generic mutable traversal over an owned AST.
//!
//! Handlers are installed per node kind, as pre-visit, post-visit, or both.
//! Each handler receives the ancestor-kind chain and a mutable slot holding
//! the node. Overwriting the slot rewrites the subtree (ownership of the old
//! tree moves to the handler); clearing it removes the node, and list
//! children iterate with erase-on-clear semantics.

use crate::ast::{Node, NodeKind};

/// Traversal steering returned by handlers.
///
/// `Skip` suppresses recursion into the current node's children but
/// continues with its siblings; `Stop` unwinds the whole walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Skip,
    Stop,
}

/// A mutable slot holding a node during traversal.
pub type NodeSlot = Option<Box<Node>>;

/// Per-kind visitor callback.
pub type Handler<C> = fn(&mut C, &[NodeKind], &mut NodeSlot) -> Flow;

struct Entry<C> {
    pre: Option<Handler<C>>,
    post: Option<Handler<C>>,
}

/// A visitor: a user-supplied context plus per-kind handler lists.
///
/// Single-threaded and cooperative; cancellation is handler-initiated via
/// [`Flow::Stop`].
pub struct Visitor<C> {
    entries: Vec<Vec<Entry<C>>>,
}

impl<C> Default for Visitor<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Visitor<C> {
    #[must_use]
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(NodeKind::COUNT);
        entries.resize_with(NodeKind::COUNT, Vec::new);
        Self { entries }
    }

    /// Install a handler pair for one node kind. Either phase may be absent.
    pub fn add_handler(
        &mut self,
        kind: NodeKind,
        pre: Option<Handler<C>>,
        post: Option<Handler<C>>,
    ) {
        self.entries[kind as usize].push(Entry { pre, post });
    }

    /// Install the same pre-visit handler for every kind matching `filter`.
    pub fn add_handler_where(&mut self, filter: fn(NodeKind) -> bool, pre: Handler<C>) {
        for kind in NodeKind::all() {
            if filter(kind) {
                self.add_handler(kind, Some(pre), None);
            }
        }
    }

    #[must_use]
    pub fn has_handler_for(&self, kind: NodeKind) -> bool {
        !self.entries[kind as usize].is_empty()
    }

    /// Walk the tree in `slot`, calling handlers around each node.
    pub fn visit(&self, context: &mut C, slot: &mut NodeSlot) -> Flow {
        let mut parents = Vec::new();
        match self.visit_slot(context, &mut parents, slot) {
            Flow::Stop => Flow::Stop,
            _ => Flow::Continue,
        }
    }

    fn run_phase(
        &self,
        context: &mut C,
        parents: &[NodeKind],
        slot: &mut NodeSlot,
        kind: NodeKind,
        pre: bool,
    ) -> Flow {
        for entry in &self.entries[kind as usize] {
            let callback = if pre { entry.pre } else { entry.post };
            if let Some(callback) = callback {
                match callback(context, parents, slot) {
                    Flow::Continue => {}
                    other => return other,
                }
                if slot.is_none() {
                    break;
                }
            }
        }
        Flow::Continue
    }

    fn visit_slot(
        &self,
        context: &mut C,
        parents: &mut Vec<NodeKind>,
        slot: &mut NodeSlot,
    ) -> Flow {
        let Some(node) = slot.as_ref() else {
            return Flow::Continue;
        };
        let kind = node.kind();

        match self.run_phase(context, parents, slot, kind, true) {
            Flow::Stop => return Flow::Stop,
            Flow::Skip => return Flow::Continue,
            Flow::Continue => {}
        }

        // A pre handler may have removed or replaced the node.
        let Some(node) = slot.as_deref_mut() else {
            return Flow::Continue;
        };
        parents.push(node.kind());
        let status = self.visit_children(context, parents, node);
        parents.pop();
        if status == Flow::Stop {
            return Flow::Stop;
        }

        if let Some(node) = slot.as_ref() {
            let kind = node.kind();
            if self.run_phase(context, parents, slot, kind, false) == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn visit_list(
        &self,
        context: &mut C,
        parents: &mut Vec<NodeKind>,
        list: &mut Vec<Node>,
    ) -> Flow {
        let items = std::mem::take(list);
        let mut status = Flow::Continue;
        for node in items {
            if status == Flow::Stop {
                list.push(node);
                continue;
            }
            let mut slot = Some(Box::new(node));
            status = self.visit_slot(context, parents, &mut slot);
            if let Some(node) = slot {
                list.push(*node);
            }
        }
        status
    }

    fn visit_children(
        &self,
        context: &mut C,
        parents: &mut Vec<NodeKind>,
        node: &mut Node,
    ) -> Flow {
        macro_rules! walk {
            ($slot:expr) => {
                if self.visit_slot(context, parents, $slot) == Flow::Stop {
                    return Flow::Stop;
                }
            };
        }
        macro_rules! walk_list {
            ($list:expr) => {
                if self.visit_list(context, parents, $list) == Flow::Stop {
                    return Flow::Stop;
                }
            };
        }

        match node {
            Node::TypePointer(payload) => walk!(&mut payload.value),
            Node::TypeArray(payload) => walk!(&mut payload.element),
            Node::TypeFunction(payload) => {
                walk_list!(&mut payload.arguments);
                walk!(&mut payload.variadic_positional);
                walk!(&mut payload.variadic_keyword);
                walk!(&mut payload.return_type);
            }
            Node::DeclarationUnion(payload) => walk_list!(&mut payload.properties),
            Node::DeclarationStructure(payload) => walk_list!(&mut payload.declarations),
            Node::DeclarationProperty(payload) => walk!(&mut payload.ty),
            Node::DeclarationInterface(payload) => {
                walk_list!(&mut payload.extends);
                walk_list!(&mut payload.declarations);
            }
            Node::DeclarationFunctionArgument(payload) => {
                walk!(&mut payload.property);
                walk!(&mut payload.default_value);
            }
            Node::DeclarationFunction(payload) => {
                walk!(&mut payload.ty);
                walk!(&mut payload.body);
            }
            Node::DeclarationAssignment(payload) => {
                walk!(&mut payload.property);
                walk!(&mut payload.value);
            }
            Node::DeclarationBlock(payload) => walk_list!(&mut payload.declarations),
            Node::StatementReturn(payload) => walk!(&mut payload.value),
            Node::StatementIfConditionalClause(payload) => {
                walk!(&mut payload.condition);
                walk!(&mut payload.body);
            }
            Node::StatementIf(payload) => {
                walk_list!(&mut payload.clauses);
                walk!(&mut payload.else_clause);
            }
            Node::StatementWhile(payload) => {
                walk!(&mut payload.condition);
                walk!(&mut payload.body);
            }
            Node::StatementBlock(payload) => walk_list!(&mut payload.statements),
            Node::ValueArray(payload) => walk_list!(&mut payload.elements),
            Node::ValueArrayRepeated(payload) => walk!(&mut payload.element),
            Node::ValueStructure(payload) => walk_list!(&mut payload.assignments),
            Node::ValueCallKeywordArgument(payload) => walk!(&mut payload.value),
            Node::ValueCall(payload) => {
                walk!(&mut payload.callee);
                walk_list!(&mut payload.arguments);
                walk_list!(&mut payload.keyword_arguments);
            }
            Node::ValueCast(payload) => {
                walk!(&mut payload.value);
                walk!(&mut payload.ty);
            }
            Node::ValueUnary(payload) => walk!(&mut payload.operand),
            Node::ValueBinary(payload) => {
                walk!(&mut payload.left);
                walk!(&mut payload.right);
            }
            // Leaf kinds, including int/float literals whose type tag is
            // embedded rather than owned as a child.
            _ => {}
        }
        Flow::Continue
    }
}
