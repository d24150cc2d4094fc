//! GML export - serialize the relationship graph for external graph tools.
//!
//! ```text
//! RelationshipGraph → write_gml() → graph [ node [...] edge [...] ]
//!   → open in Gephi, Cytoscape, networkx.read_gml, ...
//! ```

use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::RelationshipGraph;

/// Write the graph as GML.
///
/// Nodes carry `label` (the character name), `character_id` and `images`;
/// edges carry `relation` (the joined relation labels) and `weight`.
pub fn write_gml(graph: &RelationshipGraph, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "graph [")?;

    for (idx, node) in graph.nodes() {
        writeln!(writer, "  node [")?;
        writeln!(writer, "    id {}", idx.index())?;
        writeln!(writer, "    label \"{}\"", escape(&node.name))?;
        writeln!(writer, "    character_id {}", node.id)?;
        match &node.images {
            Value::Null => {}
            Value::String(s) => writeln!(writer, "    images \"{}\"", escape(s))?,
            other => writeln!(writer, "    images \"{}\"", escape(&other.to_string()))?,
        }
        writeln!(writer, "  ]")?;
    }

    for (source, target, edge) in graph.edges() {
        writeln!(writer, "  edge [")?;
        writeln!(writer, "    source {}", source.index())?;
        writeln!(writer, "    target {}", target.index())?;
        writeln!(writer, "    relation \"{}\"", escape(&edge.label()))?;
        writeln!(writer, "    weight {}", edge.weight)?;
        writeln!(writer, "  ]")?;
    }

    writeln!(writer, "]")?;
    Ok(())
}

/// Save the graph as a GML file, creating or truncating it.
pub fn save_gml(graph: &RelationshipGraph, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_gml(graph, &mut writer)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph saved"
    );
    Ok(())
}

/// GML strings cannot contain `"`; `&` and non-ASCII use character references.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            c if c.is_ascii() => out.push(c),
            c => out.push_str(&format!("&#{};", c as u32)),
        }
    }
    out
}
