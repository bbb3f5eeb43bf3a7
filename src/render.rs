//! Render a LispIsh tree as a Graphviz graph.
//!
//! Inspired by [@thingskatedid][kate] and [Ben Weintraub][ben].
//!
//! [kate]: https://twitter.com/thingskatedid/status/1386077306381242371?ref_src=twsrc%5Etfw
//! [ben]: https://www.benweintraub.com/2022/11/12/graphviz-in-the-terminal/

use std::io::Write;
use std::process::Stdio;

use dot_writer::{Attributes, DotWriter, Scope};

use crate::data::{escape, Method, Value};

/// Escape text for use inside a quoted DOT label.
fn label_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Node shapes, set by name: `dot_writer::Shape` has no oval or note.
const OVAL: &str = "oval";
const NOTE: &str = "note";
const RECTANGLE: &str = "rectangle";

/// Intermediate state when rendering to Graphviz.
#[derive(Default)]
struct TreeRender {
    node_count: usize,
}

impl TreeRender {
    /// Add a node with the given shape name and label; returns the node's name.
    fn add_node(&mut self, graph: &mut Scope, shape: &str, label: &str) -> String {
        let name = format!("node_{}", self.node_count);
        self.node_count += 1;
        graph
            .node_named(&name)
            .set("shape", shape, false)
            .set_label(&label_escape(label));
        name
    }

    fn method(&mut self, graph: &mut Scope, method: &Method) -> String {
        let node = self.add_node(graph, OVAL, method.name());
        for arg in method.args() {
            let child = self.value(graph, arg);
            graph.edge(node.clone(), child);
        }
        node
    }

    fn value(&mut self, graph: &mut Scope, value: &Value) -> String {
        match value {
            Value::Number(n) => self.add_node(graph, RECTANGLE, &n.to_string()),
            Value::String(s) => self.add_node(graph, NOTE, &escape::quote(s)),
            Value::Method(m) => self.method(graph, m),
        }
    }
}

/// Render the tree as a DOT digraph.
///
/// Method calls are ovals labelled with the name as written,
/// numbers are rectangles, and strings are notes showing the quoted literal.
/// Edges run from each call to its arguments, in order.
///
/// Recurses once per nesting level; trees from [`crate::parse`] are at most
/// [`crate::MAX_DEPTH`] calls deep.
pub fn render_tree(root: &Method) -> Vec<u8> {
    let mut outbuf = Vec::new();
    {
        let mut writer = DotWriter::from(&mut outbuf);
        let mut graph = writer.digraph();
        TreeRender::default().method(&mut graph, root);
    }
    outbuf
}

/// Render DOT source to SVG with the `dot` command.
///
/// If `dot` fails, or `LISPISH_SAVE_GRAPH` is set, the DOT source is kept in a temporary file
/// and its path logged.
pub fn render_svg(gv: &[u8]) -> Result<String, String> {
    let mut dotgraph = std::process::Command::new("dot")
        .arg("-Tsvg")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("failed to launch tree render: {e}"))?;
    dotgraph
        .stdin
        .take()
        .ok_or_else(|| "dot command has no stdin".to_owned())?
        .write_all(gv)
        .map_err(|e| format!("failed to provide graphviz input: {e}"))?;
    let dotgraph = dotgraph
        .wait_with_output()
        .map_err(|e| format!("failed to complete dot command: {e}"))?;

    let save_graph = || {
        let saved = tempfile::NamedTempFile::new().and_then(|mut f| {
            f.write_all(gv)?;
            let (_, pathbuf) = f.keep()?;
            Ok(pathbuf)
        });
        match saved {
            Ok(pathbuf) => tracing::info!("DOT source in {}", pathbuf.display()),
            Err(e) => tracing::warn!("could not save DOT source: {e}"),
        }
    };
    if !dotgraph.status.success() || std::env::var_os("LISPISH_SAVE_GRAPH").is_some() {
        save_graph();
    }

    if dotgraph.status.success() {
        Ok(String::from_utf8_lossy(&dotgraph.stdout).to_string())
    } else {
        Err(format!(
            "failed to render tree: dot failed: {}",
            &String::from_utf8_lossy(&dotgraph.stderr)
        ))
    }
}
