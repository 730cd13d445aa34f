//! Table-of-contents tree construction.

use serde::Serialize;

/// A heading as found in the enriched HTML, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub title: String,
    pub anchor: String,
}

/// One entry of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    /// Heading level, 1..=6
    pub level: u8,
    pub title: String,
    /// Id of the heading element in the document HTML
    pub anchor: String,
    pub children: Vec<TocNode>,
}

impl TocNode {
    fn leaf(heading: &Heading) -> Self {
        Self {
            level: heading.level,
            title: heading.title.clone(),
            anchor: heading.anchor.clone(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TocNode::count).sum::<usize>()
    }
}

/// Total number of nodes in a forest of TOC nodes.
pub fn count_nodes(toc: &[TocNode]) -> usize {
    toc.iter().map(TocNode::count).sum()
}

/// Nest headings under the most recent heading with a lower level.
///
/// Stack discipline: pop while the top's level is `>=` the current level,
/// then push. A level-3 heading right after a level-1 heading becomes its
/// child.
pub fn build_toc(headings: &[Heading]) -> Vec<TocNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<TocNode> = Vec::new();

    for heading in headings {
        while stack.last().is_some_and(|top| top.level >= heading.level) {
            if let Some(done) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }
        stack.push(TocNode::leaf(heading));
    }

    while let Some(done) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }

    roots
}

fn attach(stack: &mut [TocNode], roots: &mut Vec<TocNode>, node: TocNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}
