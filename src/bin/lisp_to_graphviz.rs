//! Render a parsed LispIsh tree as Graphviz.
//!
//! Usage:
//!
//! ```ignore
//! <input.lisp lisp_to_graphviz | dot -T png >output.png
//! ```

use std::io::{stdout, Read, Write};

use lispish::render_tree;

fn main() -> std::io::Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let tree = lispish::parse(&input)?;
    stdout().write_all(&render_tree(&tree))
}
