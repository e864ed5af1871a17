/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, block and declaration nodes
/// - expressions: Expression nodes and their inferred types
/// - statements: Statement nodes
/// - types: The primitive types and the coercion/operator rules
/// - visitor: The traversal contracts implemented by each pass
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
pub mod visitor;
