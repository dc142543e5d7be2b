// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram rendering for the call-flow view.
//!
//! A [`DiagramRenderer`] turns a diagram description into a [`RenderedDiagram`]: a small graph of
//! labelled nodes that can be laid out as a text outline at any zoom without re-parsing.

use std::fmt;

use crate::nav::Zoom;

pub mod flowchart;
pub mod text;
pub mod worker;

pub use flowchart::FlowchartTextRenderer;
pub use worker::{RenderJob, RenderOutcome, RenderWorker};

/// Label column width at zoom 1.0.
pub const BASE_WRAP_WIDTH: f64 = 36.0;
pub const MIN_WRAP_WIDTH: usize = 8;

pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_TEE_RIGHT: char = '├';
pub const UNICODE_BOX_BOTTOM_LEFT: char = '└';
pub const UNICODE_BOX_HORIZONTAL: char = '─';

pub trait DiagramRenderer {
    fn render(&self, description: &str) -> Result<RenderedDiagram, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    MissingHeader,
    InvalidDirection { line_no: usize, direction: String },
    UnsupportedSyntax { line_no: usize, line: String },
    UnterminatedLabel { line_no: usize },
    WorkerUnavailable,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => {
                f.write_str("expected 'flowchart' or 'graph' as the first statement")
            }
            Self::InvalidDirection { line_no, direction } => write!(
                f,
                "invalid flowchart direction on line {line_no}: {direction} (expected TD/TB/LR/RL/BT)"
            ),
            Self::UnsupportedSyntax { line_no, line } => {
                write!(f, "unsupported Mermaid syntax on line {line_no}: {line}")
            }
            Self::UnterminatedLabel { line_no } => {
                write!(f, "unterminated quoted label starting on line {line_no}")
            }
            Self::WorkerUnavailable => f.write_str("render worker is not running"),
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowDirection {
    #[default]
    TopDown,
    BottomUp,
    LeftRight,
    RightLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rect,
    Round,
    Stadium,
    Subroutine,
    Cylinder,
    Circle,
    Asymmetric,
    Diamond,
    Hexagon,
}

impl NodeShape {
    fn glyph(self) -> char {
        match self {
            Self::Rect => '□',
            Self::Round => '▢',
            Self::Stadium => '◖',
            Self::Subroutine => '▤',
            Self::Cylinder => '◫',
            Self::Circle => '○',
            Self::Asymmetric => '▷',
            Self::Diamond => '◇',
            Self::Hexagon => '⬡',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Call expression attached through a `click` statement.
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub from: usize,
    pub to: usize,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDiagram {
    direction: FlowDirection,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl RenderedDiagram {
    pub(crate) fn new(
        direction: FlowDirection,
        nodes: Vec<DiagramNode>,
        edges: Vec<DiagramEdge>,
    ) -> Self {
        Self { direction, nodes, edges }
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    /// Text a reader can activate: the click expression when a node has one, else its label.
    pub fn labels(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .map(|node| node.link.as_deref().unwrap_or(&node.label))
            .filter(|label| !label.trim().is_empty())
            .collect()
    }

    pub fn wrap_width(zoom: Zoom) -> usize {
        ((BASE_WRAP_WIDTH * zoom.factor()).round() as usize).max(MIN_WRAP_WIDTH)
    }

    /// Indented outline of the graph. Straight chains stay in one column; branches get tree
    /// connectors; nodes reached twice are printed once and referenced with `↺` afterwards.
    pub fn layout(&self, zoom: Zoom) -> Vec<String> {
        let width = Self::wrap_width(zoom);
        let mut outgoing = vec![Vec::<&DiagramEdge>::new(); self.nodes.len()];
        let mut has_incoming = vec![false; self.nodes.len()];
        for edge in &self.edges {
            if let Some(list) = outgoing.get_mut(edge.from) {
                list.push(edge);
            }
            if let Some(flag) = has_incoming.get_mut(edge.to) {
                *flag = true;
            }
        }

        let mut outline = Outline {
            diagram: self,
            outgoing,
            visited: vec![false; self.nodes.len()],
            width,
            lines: Vec::new(),
        };
        for idx in (0..self.nodes.len()).filter(|&idx| !has_incoming[idx]) {
            outline.emit(idx);
        }
        for idx in 0..self.nodes.len() {
            if !outline.visited[idx] {
                outline.emit(idx);
            }
        }
        outline.lines
    }
}

struct Outline<'a> {
    diagram: &'a RenderedDiagram,
    outgoing: Vec<Vec<&'a DiagramEdge>>,
    visited: Vec<bool>,
    width: usize,
    lines: Vec<String>,
}

/// A node waiting to be printed, with the prefixes of its first and following lines.
struct Pending<'a> {
    idx: usize,
    lead: String,
    cont: String,
    edge_label: Option<&'a str>,
}

impl<'a> Outline<'a> {
    /// Prints `root` and everything reachable from it in depth-first order. Uses an explicit
    /// stack so long chains cannot exhaust the thread stack.
    fn emit(&mut self, root: usize) {
        let mut stack =
            vec![Pending { idx: root, lead: String::new(), cont: String::new(), edge_label: None }];
        while let Some(Pending { idx, lead, cont, edge_label }) = stack.pop() {
            let Some(node) = self.diagram.nodes.get(idx) else {
                continue;
            };
            let tag = edge_label.map(|label| format!("[{label}] ")).unwrap_or_default();

            if self.visited[idx] {
                let first = node.label.lines().next().unwrap_or_default();
                let first = text::truncate_with_ellipsis(first, self.width);
                self.lines.push(format!("{lead}{tag}↺ {first}"));
                continue;
            }
            self.visited[idx] = true;

            let marker = if node.link.is_some() { "↗" } else { "" };
            let head = format!("{tag}{}{marker} ", node.shape.glyph());
            let hang = " ".repeat(text::text_len(&head));
            let wrapped = text::wrap_to_width(&node.label, self.width);
            for (line_idx, line) in wrapped.into_iter().enumerate() {
                if line_idx == 0 {
                    self.lines.push(format!("{lead}{head}{line}"));
                } else {
                    self.lines.push(format!("{cont}{hang}{line}"));
                }
            }

            let children: &[&'a DiagramEdge] = &self.outgoing[idx];
            if let &[edge] = children {
                stack.push(Pending {
                    idx: edge.to,
                    lead: cont.clone(),
                    cont,
                    edge_label: edge.label.as_deref(),
                });
                continue;
            }
            let last = children.len().saturating_sub(1);
            // Reversed so the first child is popped first.
            for (child_idx, &edge) in children.iter().enumerate().rev() {
                let (lead, cont) = if child_idx == last {
                    (
                        format!("{cont}{UNICODE_BOX_BOTTOM_LEFT}{UNICODE_BOX_HORIZONTAL} "),
                        format!("{cont}   "),
                    )
                } else {
                    (
                        format!("{cont}{UNICODE_BOX_TEE_RIGHT}{UNICODE_BOX_HORIZONTAL} "),
                        format!("{cont}{UNICODE_BOX_VERTICAL}  "),
                    )
                };
                stack.push(Pending { idx: edge.to, lead, cont, edge_label: edge.label.as_deref() });
            }
        }
    }
}
