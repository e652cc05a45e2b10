//! Semantic core of the Forge ahead-of-time compiler
//!
//! The upstream parser hands this crate a root AST; the well-formedness
//! visitor walks it pushing diagnostics into a buffer, and the type
//! resolver computes the type of any node under a scope. When the buffer
//! holds no errors the tree is ready for backend lowering.

/// AST node model, kind registry, debug dump, type formatting, visitor
pub mod ast;
/// Typed emitters for the stable diagnostic catalog
pub mod codes;
/// Lexical casts for literal token text
pub mod lexical;
/// Diagnostic messages, buffering, queries, rendering
pub mod message;
/// Lexical scope frames and backend handles
pub mod scope;
/// The compile session owning sources and messages
pub mod session;
/// Source files, locations, and ranges
pub mod source;
/// Output sink with color and glyph capability bits
pub mod stream;
/// Well-formedness checks and the type resolver
pub mod verification;

pub use self::ast::visitor::{Flow, Visitor};
pub use self::ast::{Node, NodeKind};
pub use self::message::{MessageBuffer, MessageQuery, Severity};
pub use self::scope::Scope;
pub use self::session::CompileSession;
pub use self::source::{Location, SourceContext, SourceRange};
pub use self::stream::OutputStream;
pub use self::verification::{resolve_type, verify};
