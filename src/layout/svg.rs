//! Render a computed layout in SVG format (Scalable Vector Graphics).

use crate::layout::{Edge, Label, Layout, Node};
use crate::settings::LayoutSettings;
use svg::node::element::{Circle, Line, Text};
use svg::node::Text as TextContent;
use svg::Document;

const EDGE_COLOR: &str = "#30363d";
const HIGHLIGHT_COLOR: &str = "#58a6ff";
const DECORATED_COLOR: &str = "#3fb950";
const NODE_COLOR: &str = "#8b949e";
const TEXT_COLOR: &str = "#c9d1d9";

/// Creates an SVG visual representation of a layout.
pub fn print_svg(layout: &Layout, settings: &LayoutSettings) -> Result<String, std::io::Error> {
    let mut document = Document::new();

    for edge in &layout.edges {
        document = document.add(edge_line(edge));
    }
    for node in &layout.nodes {
        document = document.add(commit_dot(node, settings.node_radius));
        document = document.add(hash_text(node, settings.node_radius));
    }
    for label in &layout.labels {
        document = document.add(branch_text(label));
    }

    let height = layout
        .nodes
        .iter()
        .map(|n| n.y)
        .fold(0.0f32, f32::max)
        + settings.margin_top
        + settings.commit_spacing;
    let width = settings.canvas_width;
    document = document
        .set("viewBox", (0.0, 0.0, width, height))
        .set("width", width)
        .set("height", height);

    let mut out: Vec<u8> = vec![];
    svg::write(&mut out, &document)?;
    Ok(String::from_utf8(out).unwrap_or_else(|_| "Invalid UTF8 character.".to_string()))
}

fn edge_line(edge: &Edge) -> Line {
    let (color, width) = if edge.highlighted {
        (HIGHLIGHT_COLOR, 3)
    } else {
        (EDGE_COLOR, 2)
    };
    Line::new()
        .set("x1", edge.x1)
        .set("y1", edge.y1)
        .set("x2", edge.x2)
        .set("y2", edge.y2)
        .set("stroke", color)
        .set("stroke-width", width)
}

fn commit_dot(node: &Node, radius: f32) -> Circle {
    let fill = if node.selected {
        HIGHLIGHT_COLOR
    } else if node.decorated {
        DECORATED_COLOR
    } else {
        NODE_COLOR
    };
    let stroke = if node.selected {
        HIGHLIGHT_COLOR
    } else {
        EDGE_COLOR
    };
    Circle::new()
        .set("cx", node.x)
        .set("cy", node.y)
        .set("r", radius)
        .set("fill", fill)
        .set("stroke", stroke)
        .set("stroke-width", 1)
}

fn hash_text(node: &Node, radius: f32) -> Text {
    let short = &node.hash[..node.hash.len().min(7)];
    Text::new()
        .set("x", node.x + radius + 7.0)
        .set("y", node.y + 4.0)
        .set("fill", TEXT_COLOR)
        .set("font-size", 12)
        .add(TextContent::new(short))
}

fn branch_text(label: &Label) -> Text {
    let (color, weight) = if label.is_current {
        (HIGHLIGHT_COLOR, "600")
    } else {
        (NODE_COLOR, "400")
    };
    Text::new()
        .set("x", label.x)
        .set("y", label.y)
        .set("fill", color)
        .set("font-size", 11)
        .set("font-weight", weight)
        .add(TextContent::new(&label.name))
}

#[cfg(test)]
mod tests {
    use super::print_svg;
    use crate::layout::compute_layout;
    use crate::graph::{BranchInfo, CommitInfo};
    use crate::settings::LayoutSettings;

    #[test]
    fn renders_nodes_edges_and_labels() {
        let commits = vec![
            CommitInfo {
                hash: "aaaaaaaabbbbbbbb".to_string(),
                message: String::new(),
                author: String::new(),
                date: String::new(),
                parents: Vec::new(),
                branches: vec!["main".to_string()],
                tags: Vec::new(),
            },
            CommitInfo {
                hash: "ccccccccdddddddd".to_string(),
                message: String::new(),
                author: String::new(),
                date: String::new(),
                parents: vec!["aaaaaaaabbbbbbbb".to_string()],
                branches: Vec::new(),
                tags: Vec::new(),
            },
        ];
        let branches = vec![BranchInfo {
            name: "main".to_string(),
            commit: "aaaaaaaabbbbbbbb".to_string(),
            is_remote: false,
            is_current: true,
        }];
        let settings = LayoutSettings::default();
        let layout = compute_layout(&commits, &branches, &settings, 1200.0, None);

        let svg = print_svg(&layout, &settings).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("circle"));
        assert!(svg.contains("line"));
        assert!(svg.contains("aaaaaaa"));
        assert!(svg.contains("main"));
    }
}
