use crate::config::EXPORT_BUFFER_SIZE;
use crate::graph::HashtagGraph;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes the graph as `vertices.csv` and `edges.csv` under `output_dir`.
///
/// Row order follows vertex insertion order, so repeated runs over the same
/// input produce byte-identical files.
pub fn export_graph(graph: &HashtagGraph, output_dir: &str) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create graph output directory: {}", output_dir))?;

    write_vertices(graph, output_dir)?;
    write_edges(graph, output_dir)?;

    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        dir = output_dir,
        "Graph exported"
    );

    Ok(())
}

fn write_vertices(graph: &HashtagGraph, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("vertices.csv");
    let mut writer = csv::Writer::from_writer(BufWriter::with_capacity(
        EXPORT_BUFFER_SIZE,
        File::create(&path).with_context(|| format!("Failed to create: {:?}", path))?,
    ));

    writer.write_record(["hashtag", "degree"])?;

    let mut buf = itoa::Buffer::new();
    for tag in graph.vertices() {
        // Every listed vertex has a degree; the graph never drops one
        let degree = graph.degree(tag).unwrap_or(0);
        writer.write_record([tag, buf.format(degree)])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush: {:?}", path))
}

fn write_edges(graph: &HashtagGraph, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("edges.csv");
    let mut writer = csv::Writer::from_writer(BufWriter::with_capacity(
        EXPORT_BUFFER_SIZE,
        File::create(&path).with_context(|| format!("Failed to create: {:?}", path))?,
    ));

    writer.write_record(["source", "target"])?;
    for (u, v) in graph.edges() {
        writer.write_record([u, v])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush: {:?}", path))
}

/// Renders the per-vertex degree table and the average degree.
pub fn write_degree_report<W: Write>(graph: &HashtagGraph, out: &mut W) -> Result<()> {
    for tag in graph.vertices() {
        let degree = graph.degree(tag).unwrap_or(0);
        writeln!(out, "{:<32} {}", tag, degree).context("Failed to write degree report")?;
    }

    match graph.average_degree() {
        Some(avg) => writeln!(out, "Average degree: {:.2}", avg),
        None => writeln!(out, "Average degree: n/a (empty graph)"),
    }
    .context("Failed to write degree report")?;

    Ok(())
}
