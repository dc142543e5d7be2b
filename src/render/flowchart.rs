// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid flowchart subset used by call-flow descriptions.
//!
//! Supported: `flowchart`/`graph` header with optional direction, node shapes, edge chains with
//! `|label|` or `-- label -->` labels, and `click <id> "...navigateToFunction('expr')..."`.
//! Styling statements and subgraph markers are accepted and ignored.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{
    DiagramEdge, DiagramNode, DiagramRenderer, FlowDirection, NodeShape, RenderError,
    RenderedDiagram,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowchartTextRenderer;

impl DiagramRenderer for FlowchartTextRenderer {
    fn render(&self, description: &str) -> Result<RenderedDiagram, RenderError> {
        parse_flowchart(description)
    }
}

/// Longest openers first so `(["x"])` is a stadium, not a round node.
const SHAPES: &[(&str, &str, NodeShape)] = &[
    ("([", "])", NodeShape::Stadium),
    ("((", "))", NodeShape::Circle),
    ("{{", "}}", NodeShape::Hexagon),
    ("[[", "]]", NodeShape::Subroutine),
    ("[(", ")]", NodeShape::Cylinder),
    ("[", "]", NodeShape::Rect),
    ("(", ")", NodeShape::Round),
    ("{", "}", NodeShape::Diamond),
    (">", "]", NodeShape::Asymmetric),
];

const IGNORED_KEYWORDS: &[&str] =
    &["classDef", "class", "style", "linkStyle", "subgraph", "end", "direction"];

fn click_target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"navigateToFunction\(\s*['"]([^'"]*)['"]\s*\)"#).expect("valid regex")
    })
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(quot|amp|lt|gt|\d+);").expect("valid regex"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Statement {
    line_no: usize,
    text: String,
}

/// Splits on newlines and `;` outside double quotes, so quoted labels may span lines.
fn split_statements(input: &str) -> Result<Vec<Statement>, RenderError> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut start_line = 1usize;
    let mut line_no = 1usize;
    let mut in_quote = false;

    let mut flush = |current: &mut String, start_line: usize| {
        let text = current.trim();
        if !text.is_empty() {
            statements.push(Statement { line_no: start_line, text: text.to_owned() });
        }
        current.clear();
    };

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quote = !in_quote;
                current.push(ch);
            }
            '\n' if in_quote => {
                current.push(ch);
                line_no += 1;
            }
            '\n' => {
                flush(&mut current, start_line);
                line_no += 1;
                start_line = line_no;
            }
            ';' if !in_quote => {
                flush(&mut current, start_line);
                start_line = line_no;
            }
            '\r' if !in_quote => {}
            _ => current.push(ch),
        }
    }

    if in_quote {
        return Err(RenderError::UnterminatedLabel { line_no: start_line });
    }
    flush(&mut current, start_line);
    Ok(statements)
}

fn parse_header(trimmed: &str, line_no: usize) -> Result<FlowDirection, RenderError> {
    let mut parts = trimmed.split_whitespace();
    match parts.next() {
        Some("flowchart" | "graph") => {}
        _ => return Err(RenderError::MissingHeader),
    }

    let direction = match parts.next() {
        None | Some("TD" | "TB") => FlowDirection::TopDown,
        Some("BT") => FlowDirection::BottomUp,
        Some("LR") => FlowDirection::LeftRight,
        Some("RL") => FlowDirection::RightLeft,
        Some(other) => {
            return Err(RenderError::InvalidDirection { line_no, direction: other.to_owned() })
        }
    };
    if parts.next().is_some() {
        return Err(RenderError::UnsupportedSyntax { line_no, line: trimmed.to_owned() });
    }
    Ok(direction)
}

fn is_edge_op_start_char(ch: char) -> bool {
    matches!(ch, '<' | '-' | '=' | '.')
}

fn is_edge_op_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | '-' | '=' | '.' | 'o' | 'x')
}

fn is_probable_edge_operator(op: &str) -> bool {
    op.chars().filter(|ch| matches!(ch, '-' | '=' | '.')).count() >= 2
}

/// `(lhs, op, rhs)` around the first edge operator outside labels.
fn split_once_edge_operator(line: &str) -> Option<(&str, &str, &str)> {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut chars = line.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if in_quote {
            in_quote = ch != '"';
            continue;
        }
        match ch {
            '"' => in_quote = true,
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && is_edge_op_start_char(ch) => {
                let mut end = idx + ch.len_utf8();
                while let Some(&(next_idx, next)) = chars.peek() {
                    if !is_edge_op_char(next) {
                        break;
                    }
                    end = next_idx + next.len_utf8();
                    chars.next();
                }
                let op = &line[idx..end];
                if is_probable_edge_operator(op) && !line[..idx].trim().is_empty() {
                    return Some((&line[..idx], op, &line[end..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn is_reverse_operator(op: &str) -> bool {
    op.contains('<') && !op.contains('>')
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSpec {
    id: String,
    label: Option<String>,
    shape: Option<NodeShape>,
}

fn parse_node_spec(token: &str, line_no: usize) -> Result<NodeSpec, RenderError> {
    let trimmed = token.trim();
    let id_end = trimmed
        .char_indices()
        .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_'))
        .map_or(trimmed.len(), |(idx, _)| idx);
    let id = &trimmed[..id_end];
    if id.is_empty() {
        return Err(RenderError::UnsupportedSyntax { line_no, line: trimmed.to_owned() });
    }

    let rest = &trimmed[id_end..];
    let rest = rest.split_once(":::").map_or(rest, |(shape, _class)| shape);
    if rest.is_empty() {
        return Ok(NodeSpec { id: id.to_owned(), label: None, shape: None });
    }

    SHAPES
        .iter()
        .find_map(|(open, close, shape)| {
            let inner = rest.strip_prefix(open)?.strip_suffix(close)?;
            Some(NodeSpec { id: id.to_owned(), label: Some(label_text(inner)), shape: Some(*shape) })
        })
        .ok_or_else(|| RenderError::UnsupportedSyntax { line_no, line: trimmed.to_owned() })
}

/// Strips quotes and markdown backticks, decodes `#quot;`-style entities and line breaks.
fn label_text(raw: &str) -> String {
    let mut label = raw.trim();
    if label.len() >= 2 && label.starts_with('"') && label.ends_with('"') {
        label = &label[1..label.len() - 1];
    }

    let mut text = decode_entities(label);
    if text.len() >= 2 && text.starts_with('`') && text.ends_with('`') {
        text = text[1..text.len() - 1].replace("**", "");
    }
    text.replace("\\n", "\n").replace("<br/>", "\n").replace("<br>", "\n")
}

fn decode_entities(label: &str) -> String {
    entity_re()
        .replace_all(label, |caps: &regex::Captures<'_>| match &caps[1] {
            "quot" => "\"".to_owned(),
            "amp" => "&".to_owned(),
            "lt" => "<".to_owned(),
            "gt" => ">".to_owned(),
            code => code
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| caps[0].to_owned(), String::from),
        })
        .into_owned()
}

#[derive(Debug, Default)]
struct GraphBuilder {
    nodes: Vec<DiagramNode>,
    index: HashMap<String, usize>,
    edges: Vec<DiagramEdge>,
}

impl GraphBuilder {
    /// Later definitions of the same id update its label and shape.
    fn ensure_node(&mut self, spec: NodeSpec) -> usize {
        if let Some(&idx) = self.index.get(&spec.id) {
            let node = &mut self.nodes[idx];
            if let Some(label) = spec.label {
                node.label = label;
            }
            if let Some(shape) = spec.shape {
                node.shape = shape;
            }
            return idx;
        }

        let idx = self.nodes.len();
        self.index.insert(spec.id.clone(), idx);
        self.nodes.push(DiagramNode {
            label: spec.label.unwrap_or_else(|| spec.id.clone()),
            shape: spec.shape.unwrap_or(NodeShape::Rect),
            id: spec.id,
            link: None,
        });
        idx
    }

    fn add_edge(&mut self, lhs: NodeSpec, op: &str, rhs: NodeSpec, label: Option<String>) {
        let (from, to) = if is_reverse_operator(op) { (rhs, lhs) } else { (lhs, rhs) };
        let from = self.ensure_node(from);
        let to = self.ensure_node(to);
        self.edges.push(DiagramEdge { from, to, label });
    }

    fn parse_edges(&mut self, trimmed: &str, line_no: usize) -> Result<bool, RenderError> {
        let Some((first_raw, first_op, tail)) = split_once_edge_operator(trimmed) else {
            return Ok(false);
        };

        // Inline label: `<lhs> -- <label> --> <rhs>`
        if matches!(first_op, "--" | "==") {
            if let Some((label_raw, op, rhs_raw)) = split_once_edge_operator(tail.trim_start()) {
                let label = label_raw.trim();
                if !label.is_empty() {
                    let lhs = parse_node_spec(first_raw, line_no)?;
                    let rhs = parse_node_spec(rhs_raw, line_no)?;
                    self.add_edge(lhs, op, rhs, Some(label_text(label)));
                    return Ok(true);
                }
            }
        }

        let mut current = parse_node_spec(first_raw, line_no)?;
        let mut op = first_op;
        let mut rest = tail;
        loop {
            let mut label = None;
            let mut rhs_and_more = rest.trim_start();
            if let Some(after) = rhs_and_more.strip_prefix('|') {
                let Some(end_idx) = after.find('|') else {
                    return Err(RenderError::UnsupportedSyntax {
                        line_no,
                        line: trimmed.to_owned(),
                    });
                };
                let text = after[..end_idx].trim();
                label = (!text.is_empty()).then(|| label_text(text));
                rhs_and_more = after[end_idx + 1..].trim_start();
            }

            let next = split_once_edge_operator(rhs_and_more);
            let rhs_raw = next.map_or(rhs_and_more, |(rhs_raw, _, _)| rhs_raw);
            let rhs = parse_node_spec(rhs_raw, line_no)?;
            self.add_edge(current, op, rhs.clone(), label);

            let Some((_, next_op, next_rest)) = next else {
                return Ok(true);
            };
            current = rhs;
            op = next_op;
            rest = next_rest;
        }
    }

    fn set_link(&mut self, id: &str, target: String) {
        match self.index.get(id) {
            Some(&idx) => self.nodes[idx].link = Some(target),
            None => tracing::debug!(id, link = %target, "click refers to an undeclared node"),
        }
    }
}

pub fn parse_flowchart(input: &str) -> Result<RenderedDiagram, RenderError> {
    let mut graph = GraphBuilder::default();
    let mut direction = None;
    let mut clicks = Vec::<(String, String)>::new();

    for Statement { line_no, text } in split_statements(input)? {
        let trimmed = text.as_str();
        if trimmed.starts_with("%%") {
            continue;
        }
        if direction.is_none() {
            direction = Some(parse_header(trimmed, line_no)?);
            continue;
        }

        let keyword = trimmed.split_whitespace().next().unwrap_or_default();
        if IGNORED_KEYWORDS.contains(&keyword) {
            continue;
        }
        if keyword == "click" {
            let mut parts = trimmed.splitn(3, char::is_whitespace);
            let id = parts.nth(1).unwrap_or_default();
            let action = parts.next().unwrap_or_default();
            if let Some(caps) = click_target_re().captures(action) {
                clicks.push((id.to_owned(), caps[1].to_owned()));
            }
            continue;
        }

        if !graph.parse_edges(trimmed, line_no)? {
            let spec = parse_node_spec(trimmed, line_no)?;
            graph.ensure_node(spec);
        }
    }

    let Some(direction) = direction else {
        return Err(RenderError::MissingHeader);
    };
    for (id, target) in clicks {
        graph.set_link(&id, target);
    }
    Ok(RenderedDiagram::new(direction, graph.nodes, graph.edges))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{label_text, parse_flowchart, split_statements};
    use crate::render::{FlowDirection, NodeShape, RenderError};

    #[test]
    fn parses_nodes_edges_and_click_targets() {
        let diagram = parse_flowchart(
            r#"flowchart TD
    N1(["`**CartService.GetCart**`"])
    N2["cart, err := s.cartRepo.GetByID(ctx, cartID)"]
    N3{{"err != nil"}}
    N4(("end"))
    N1 --> N2
    N2 --> N3
    N3 --> |Yes| N4
    click N2 "javascript:navigateToFunction('s.cartRepo.GetByID')"
"#,
        )
        .expect("parse");

        assert_eq!(diagram.direction(), FlowDirection::TopDown);
        let shapes = diagram.nodes().iter().map(|node| node.shape).collect::<Vec<_>>();
        assert_eq!(
            shapes,
            vec![NodeShape::Stadium, NodeShape::Rect, NodeShape::Hexagon, NodeShape::Circle]
        );
        assert_eq!(diagram.nodes()[0].label, "CartService.GetCart");
        assert_eq!(diagram.nodes()[1].link.as_deref(), Some("s.cartRepo.GetByID"));
        assert_eq!(diagram.edges().len(), 3);
        assert_eq!(diagram.edges()[2].label.as_deref(), Some("Yes"));
        assert_eq!(
            diagram.labels(),
            vec!["CartService.GetCart", "s.cartRepo.GetByID", "err != nil", "end"]
        );
    }

    #[test]
    fn quoted_labels_may_span_lines() {
        let source = "flowchart TD\n    N2[\"body := fmt.Sprintf(`\nDear %s\n`, name)\"]\n    N1 --> N2\n";
        let statements = split_statements(source).expect("split");
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[2].line_no, 5);

        let diagram = parse_flowchart(source).expect("parse");
        assert_eq!(diagram.nodes()[0].label, "body := fmt.Sprintf(`\nDear %s\n`, name)");
    }

    #[test]
    fn edge_chains_and_inline_labels() {
        let diagram = parse_flowchart("graph LR\nA --> B --> C\nC -- retry --> A\nD <-- C").expect("parse");
        let edges = diagram
            .edges()
            .iter()
            .map(|edge| {
                (
                    diagram.nodes()[edge.from].id.as_str(),
                    diagram.nodes()[edge.to].id.as_str(),
                    edge.label.as_deref(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            edges,
            vec![("A", "B", None), ("B", "C", None), ("C", "A", Some("retry")), ("C", "D", None)]
        );
        assert_eq!(diagram.direction(), FlowDirection::LeftRight);
    }

    #[test]
    fn operators_inside_labels_are_not_edges() {
        let diagram = parse_flowchart("flowchart TD\nN1[\"a --> b\"]\nN2[x-->y]").expect("parse");
        assert!(diagram.edges().is_empty());
        assert_eq!(diagram.nodes()[0].label, "a --> b");
        assert_eq!(diagram.nodes()[1].label, "x-->y");
    }

    #[test]
    fn styling_and_comments_are_ignored() {
        let diagram = parse_flowchart(
            "%% generated\nflowchart TD\nclassDef hot fill:#f00\nsubgraph s1\nA[one]:::hot\nend\nstyle A fill:#0f0\nlinkStyle 0 stroke:#333",
        )
        .expect("parse");
        assert_eq!(diagram.nodes().len(), 1);
        assert_eq!(diagram.nodes()[0].label, "one");
    }

    #[rstest]
    #[case::quote_entity("\"say #quot;hi#quot;\"", "say \"hi\"")]
    #[case::numeric_entity("a #35;1", "a #1")]
    #[case::markdown("\"`**Cart.IsEmpty**`\"", "Cart.IsEmpty")]
    #[case::escaped_newline("\"reject\\ncart.IsEmpty()\"", "reject\ncart.IsEmpty()")]
    #[case::html_break("one<br/>two", "one\ntwo")]
    fn label_decoding(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(label_text(raw), expected);
    }

    #[rstest]
    #[case::empty("", RenderError::MissingHeader)]
    #[case::sequence("sequenceDiagram\nA->>B: hi", RenderError::MissingHeader)]
    #[case::direction("flowchart XY", RenderError::InvalidDirection { line_no: 1, direction: "XY".to_owned() })]
    #[case::unterminated("flowchart TD\nA[\"open", RenderError::UnterminatedLabel { line_no: 2 })]
    #[case::bad_node("flowchart TD\nA[x", RenderError::UnsupportedSyntax { line_no: 2, line: "A[x".to_owned() })]
    #[case::bad_edge_label("flowchart TD\nA -->|x B", RenderError::UnsupportedSyntax { line_no: 2, line: "A -->|x B".to_owned() })]
    fn rejects_unsupported_input(#[case] source: &str, #[case] expected: RenderError) {
        assert_eq!(parse_flowchart(source), Err(expected));
    }

    #[test]
    fn click_on_unknown_node_is_dropped() {
        let diagram = parse_flowchart(
            "flowchart TD\nA[a]\nclick B \"javascript:navigateToFunction('x.Y')\"",
        )
        .expect("parse");
        assert!(diagram.nodes()[0].link.is_none());
    }
}
