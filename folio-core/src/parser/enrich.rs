//! DOM enrichment pass over the rendered markdown fragment.
//!
//! Pipeline: HTML fragment → RcDom → (anchors, link checks, code class
//! normalization) → HTML fragment.
//!
//! The pass assigns every heading a unique `id`, records headings in document
//! order for the TOC, and annotates (never removes) broken links and images.

use super::slug::{extract_custom_id, slugify, AnchorRegistry};
use super::toc::Heading;
use super::ParseOptions;
use crate::error::FolioError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_fragment, serialize, serialize::SerializeOpts, serialize::TraversalScope,
    Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

/// Kind of problem found while validating links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// `#fragment` link with no matching id in the document
    MissingAnchor,
    /// Relative link to a file that does not exist
    BrokenLink,
    /// Relative image source that does not exist
    BrokenImage,
}

/// A non-fatal content problem, reported alongside the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentWarning {
    pub kind: WarningKind,
    pub target: String,
}

impl std::fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            WarningKind::MissingAnchor => "link to missing anchor",
            WarningKind::BrokenLink => "link to missing file",
            WarningKind::BrokenImage => "missing image",
        };
        write!(f, "{what} '{}'", self.target)
    }
}

pub(crate) struct Enrichment {
    pub html: String,
    pub headings: Vec<Heading>,
    pub warnings: Vec<ContentWarning>,
}

pub(crate) fn enrich(
    fragment: &str,
    options: &ParseOptions,
    shared: &mut AnchorRegistry,
) -> Result<Enrichment, FolioError> {
    let context = QualName::new(None, ns!(html), LocalName::from("body"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
        .one(fragment);
    let root = find_element(&dom.document, "html")
        .ok_or_else(|| FolioError::markup("fragment parser produced no root element"))?;

    let mut elements = Vec::new();
    collect_elements(&root, &mut elements);

    let mut anchors = DocumentAnchors::new(shared);
    for element in &elements {
        if let Some(id) = get_attr(element, "id") {
            let assigned = anchors.reserve_existing(&id);
            if assigned != id {
                set_attr(element, "id", &assigned);
            }
        }
    }

    let mut headings = Vec::new();
    for element in &elements {
        if let Some(level) = heading_level(element) {
            headings.push(assign_anchor(element, level, &mut anchors));
        }
    }

    let base_url = options.base_dir.as_deref().and_then(directory_url);
    let mut warnings = Vec::new();
    for element in &elements {
        match element_name(element).as_deref() {
            Some("a") => check_link(element, &anchors, base_url.as_ref(), options, &mut warnings),
            Some("img") => check_image(element, base_url.as_ref(), options, &mut warnings),
            Some("code") => normalize_code_class(element),
            _ => {}
        }
    }

    Ok(Enrichment {
        html: serialize_children(&root)?,
        headings,
        warnings,
    })
}

/// Ids of one source, placed into a registry that may span several sources.
///
/// `local` holds the ids this source would get on its own, so its own
/// `#fragment` links keep working. When one of them is already taken in
/// `shared`, the element gets a suffixed id and the link is rewritten.
struct DocumentAnchors<'a> {
    local: AnchorRegistry,
    shared: &'a mut AnchorRegistry,
    renamed: HashMap<String, String>,
}

impl<'a> DocumentAnchors<'a> {
    fn new(shared: &'a mut AnchorRegistry) -> Self {
        Self {
            local: AnchorRegistry::new(),
            shared,
            renamed: HashMap::new(),
        }
    }

    /// Keep an id written in the source unless it is already in use.
    fn reserve_existing(&mut self, id: &str) -> String {
        let first_in_source = !self.local.contains(id);
        self.local.reserve(id);
        if !self.shared.contains(id) {
            self.shared.reserve(id);
            return id.to_string();
        }
        let assigned = self.shared.claim(id);
        if first_in_source {
            self.renamed.insert(id.to_string(), assigned.clone());
        }
        assigned
    }

    fn claim(&mut self, base: &str) -> String {
        let local = self.local.claim(base);
        let assigned = self.shared.claim(&local);
        if assigned != local {
            self.renamed.insert(local, assigned.clone());
        }
        assigned
    }

    /// Final id for a fragment link written in this source.
    fn resolve<'s>(&'s self, fragment: &'s str) -> Option<&'s str> {
        if let Some(assigned) = self.renamed.get(fragment) {
            return Some(assigned);
        }
        (self.local.contains(fragment) || self.shared.contains(fragment)).then_some(fragment)
    }
}

fn assign_anchor(element: &Handle, level: u8, anchors: &mut DocumentAnchors<'_>) -> Heading {
    let custom_id = strip_custom_id(element);
    let title = normalize_whitespace(&text_content(element));

    // Ids present in the source were placed in the first pass.
    let anchor = match (get_attr(element, "id"), custom_id) {
        (Some(existing), _) => existing,
        (None, Some(custom)) => anchors.claim(&custom),
        (None, None) => anchors.claim(&slugify(&title)),
    };
    set_attr(element, "id", &anchor);

    Heading {
        level,
        title,
        anchor,
    }
}

/// Removes a trailing `{#id}` from the heading's last text node.
fn strip_custom_id(element: &Handle) -> Option<String> {
    let children = element.children.borrow();
    let last = children.last()?;
    if let NodeData::Text { contents } = &last.data {
        let current = contents.borrow().to_string();
        if let (text, Some(id)) = extract_custom_id(&current) {
            let id = id.to_string();
            let text = text.to_string();
            *contents.borrow_mut() = text.into();
            return Some(id);
        }
    }
    None
}

enum LinkTarget<'a> {
    Ignored,
    Fragment(&'a str),
    Relative(&'a str),
}

fn classify(href: &str) -> LinkTarget<'_> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("//") {
        LinkTarget::Ignored
    } else if let Some(fragment) = href.strip_prefix('#') {
        LinkTarget::Fragment(fragment)
    } else if Url::parse(href).is_ok() {
        LinkTarget::Ignored
    } else {
        LinkTarget::Relative(href)
    }
}

fn check_link(
    element: &Handle,
    anchors: &DocumentAnchors<'_>,
    base_url: Option<&Url>,
    options: &ParseOptions,
    warnings: &mut Vec<ContentWarning>,
) {
    let Some(href) = get_attr(element, "href") else {
        return;
    };

    // Fragment links follow renamed anchors even when validation is off.
    if let LinkTarget::Fragment(fragment) = classify(&href) {
        if let Some(target) = anchors.resolve(fragment) {
            if target != fragment {
                set_attr(element, "href", &format!("#{target}"));
            }
        }
    }
    if !options.validate_links {
        return;
    }

    let kind = match classify(&href) {
        LinkTarget::Ignored => return,
        LinkTarget::Fragment("") => return,
        LinkTarget::Fragment(fragment) if anchors.resolve(fragment).is_some() => return,
        LinkTarget::Fragment(_) => WarningKind::MissingAnchor,
        LinkTarget::Relative(path) => match base_url.and_then(|base| resolve(base, path)) {
            Some(resolved) if resolved.exists() => return,
            Some(_) => WarningKind::BrokenLink,
            None => return,
        },
    };

    flag(element, "broken-link", kind, &href, warnings);
}

fn check_image(
    element: &Handle,
    base_url: Option<&Url>,
    options: &ParseOptions,
    warnings: &mut Vec<ContentWarning>,
) {
    let Some(src) = get_attr(element, "src") else {
        return;
    };
    let LinkTarget::Relative(path) = classify(&src) else {
        return;
    };
    let Some(resolved) = base_url.and_then(|base| resolve(base, path)) else {
        return;
    };

    if resolved.exists() {
        if let Ok(url) = Url::from_file_path(&resolved) {
            set_attr(element, "src", url.as_str());
        }
    } else if options.validate_links {
        flag(element, "broken-image", WarningKind::BrokenImage, &src, warnings);
    }
}

fn flag(
    element: &Handle,
    class: &str,
    kind: WarningKind,
    target: &str,
    warnings: &mut Vec<ContentWarning>,
) {
    let reason = match kind {
        WarningKind::MissingAnchor => "missing-anchor",
        WarningKind::BrokenLink | WarningKind::BrokenImage => "missing-file",
    };
    add_class(element, class);
    set_attr(element, "data-broken", reason);
    warn!(reference = target, reason = reason, "broken reference in document");
    warnings.push(ContentWarning {
        kind,
        target: target.to_string(),
    });
}

fn directory_url(dir: &Path) -> Option<Url> {
    let absolute = std::path::absolute(dir).ok()?;
    Url::from_directory_path(absolute).ok()
}

/// Resolve a relative reference against the document directory, dropping any
/// query or fragment.
fn resolve(base: &Url, reference: &str) -> Option<PathBuf> {
    let mut url = base.join(reference).ok()?;
    url.set_fragment(None);
    url.set_query(None);
    url.to_file_path().ok()
}

/// Lowercase `language-*` classes so the highlighter sees canonical tags.
fn normalize_code_class(element: &Handle) {
    if let Some(class) = get_attr(element, "class") {
        if class.starts_with("language-") && class.chars().any(|c| c.is_ascii_uppercase()) {
            set_attr(element, "class", &class.to_ascii_lowercase());
        }
    }
}

fn heading_level(node: &Handle) -> Option<u8> {
    match element_name(node)?.as_str() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if element_name(node).as_deref() == Some(tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Pre-order list of element descendants (excluding `node`).
fn collect_elements(node: &Handle, out: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if matches!(child.data, NodeData::Element { .. }) {
            out.push(child.clone());
        }
        collect_elements(child, out);
    }
}

fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text
}

fn push_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                push_text(child, out);
            }
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn get_attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn set_attr(node: &Handle, key: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|attr| &*attr.name.local == key) {
            existing.value = value.to_string().into();
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(key)),
                value: value.to_string().into(),
            });
        }
    }
}

fn add_class(node: &Handle, class: &str) {
    let classes = match get_attr(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
        _ => class.to_string(),
    };
    set_attr(node, "class", &classes);
}

/// Serialize the children of `container` (not the container itself).
fn serialize_children(container: &Handle) -> Result<String, FolioError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in container.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| FolioError::markup(format!("could not serialize fragment: {e}")))?;
    }

    String::from_utf8(output)
        .map_err(|e| FolioError::markup(format!("serialized fragment is not utf-8: {e}")))
}
