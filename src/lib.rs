pub mod ast;
pub mod display_width;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod handles;
pub mod label;
pub mod layout;
pub mod parser;
pub mod persistence;
pub mod transformer;

pub use error::{Diagnostic, LayoutError, SyntaxError};
pub use graph::Graph;
pub use parser::parse_molic;
pub use persistence::{SavedHandles, SavedLayout};
pub use transformer::{transform, transform_with_layout};

pub fn compile(source: &str) -> Result<Graph, SyntaxError> {
    compile_with_layout(source, None)
}

/// Parses and transforms `source`, then merges `saved` on top of the fresh
/// graph: its anchors, whole or half, steer handle allocation and its
/// positions override the default placement.
pub fn compile_with_layout(source: &str, saved: Option<&SavedLayout>) -> Result<Graph, SyntaxError> {
    let diagram = parse_molic(source)?;
    let graph = match saved {
        Some(saved) => {
            let mut graph = transform_with_layout(&diagram, saved);
            saved.apply(&mut graph);
            graph
        }
        None => transform(&diagram, None),
    };
    Ok(graph)
}
