//! Lexical scope: a stack of frames mapping names to declarations and to
//! opaque backend handles.
//!
//! Frames are pushed on entering blocks and function bodies and popped on
//! exit. Lookup walks frames innermost-first; insertion targets the top
//! frame. Entries own deep clones of their declaration nodes so the scope
//! can outlive mutable traversals of the tree they came from. The backend
//! handle type is a generic parameter; the core itself never inspects it.

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::Node;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("symbol `{0}` is already declared in this frame")]
    Redeclaration(String),
    #[error("node kind `{0}` does not introduce a name")]
    NotANamedDeclaration(&'static str),
}

#[derive(Debug)]
struct Entry<H> {
    declaration: Node,
    handle: Option<H>,
}

#[derive(Debug, Default)]
struct Frame<H> {
    entries: HashMap<String, Entry<H>>,
}

/// The lexical frame stack.
#[derive(Debug)]
pub struct Scope<H = ()> {
    frames: Vec<Frame<H>>,
}

impl<H> Default for Scope<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Scope<H> {
    /// A scope with a single (outermost) frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                entries: HashMap::new(),
            }],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame {
            entries: HashMap::new(),
        });
    }

    /// Pop the innermost frame. The outermost frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Insert a declaration into the top frame under the name it introduces.
    /// Redefinition within the same frame is reported to the caller; outer
    /// frames may freely be shadowed.
    pub fn add_declaration(&mut self, declaration: &Node) -> Result<(), ScopeError> {
        let name = declaration
            .declaration_name()
            .ok_or_else(|| ScopeError::NotANamedDeclaration(declaration.kind().name()))?
            .to_string();
        let frame = self.frames.last_mut().expect("scope always has a frame");
        if frame.entries.contains_key(&name) {
            return Err(ScopeError::Redeclaration(name));
        }
        frame.entries.insert(
            name,
            Entry {
                declaration: declaration.clone(),
                handle: None,
            },
        );
        Ok(())
    }

    /// Innermost-first lookup.
    #[must_use]
    pub fn get_declaration(&self, name: &str) -> Option<&Node> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.entries.get(name))
            .map(|entry| &entry.declaration)
    }

    #[must_use]
    pub fn get_handle(&self, name: &str) -> Option<&H> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.entries.get(name))
            .and_then(|entry| entry.handle.as_ref())
    }

    /// Attach a backend handle to the innermost entry for `name`. Returns
    /// `false` when the name is not in scope.
    pub fn set_handle(&mut self, name: &str, handle: H) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(entry) = frame.entries.get_mut(name) {
                entry.handle = Some(handle);
                return true;
            }
        }
        false
    }

    /// Bulk-insert every top-level declaration of a `declaration-block` into
    /// the current frame, so function bodies can refer to declarations that
    /// appear after them. Errors carry on past individual failures; the
    /// first error is returned.
    pub fn load_declaration_block(&mut self, block: &Node) -> Result<(), ScopeError> {
        let Node::DeclarationBlock(block) = block else {
            return Err(ScopeError::NotANamedDeclaration(block.kind().name()));
        };
        let mut first_error = None;
        for declaration in &block.declarations {
            if let Err(error) = self.add_declaration(declaration) {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
