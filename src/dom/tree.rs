//! Arena-backed document tree used outside the browser.

use super::Document;
use super::html;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(super) struct ElementData {
    pub(super) tag: String,
    pub(super) attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub(super) enum NodeKind {
    Document,
    Doctype(String),
    Comment(String),
    Text(String),
    Element(ElementData),
}

impl NodeKind {
    pub(super) fn element(tag: String, attrs: Vec<(String, String)>) -> Self {
        Self::Element(ElementData { tag, attrs })
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// A parsed HTML page that can be queried, mutated and written back out.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    nodes: Vec<Node>,
}

impl HtmlDocument {
    pub(super) fn empty() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    /// Parse a full page or a fragment.
    pub fn parse(source: &str) -> Result<Self> {
        html::parse(source)
    }

    /// Serialize the whole tree back to markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        html::serialize(self, self.root(), &mut out);
        out
    }

    /// Markup of one element including its own tags.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        html::serialize(self, node, &mut out);
        out
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub(super) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(super) fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut pending = vec![node];
        while let Some(node) = pending.pop() {
            if let NodeKind::Text(text) = self.kind(node) {
                out.push_str(text);
            }
            pending.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .and_then(|el| attr(el, "class"))
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Value of one inline style property, as last written.
    #[must_use]
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let style = self.element(node).and_then(|el| attr(el, "style"))?;
        parse_declarations(style)
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants_matching(self.root(), |el| el.tag.eq_ignore_ascii_case(tag))
    }

    /// Previous element sibling, skipping text and comments.
    #[must_use]
    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&n| n == node)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&n| self.element(n).is_some())
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Ok(el),
            _ => Err(Error::Dom(format!("node {} is not an element", node.0))),
        }
    }

    fn descendants_matching(
        &self,
        scope: NodeId,
        pred: impl Fn(&ElementData) -> bool,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = pending.pop() {
            if let Some(el) = self.element(node)
                && pred(el)
            {
                out.push(node);
            }
            pending.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&n| n != node);
        }
    }
}

impl Document for HtmlDocument {
    type Element = NodeId;

    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants_by_class(&self.root(), class)
    }

    fn descendants_by_class(&self, scope: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants_matching(*scope, |el| {
            attr(el, "class").is_some_and(|c| c.split_whitespace().any(|c| c == class))
        })
    }

    fn children_by_class(&self, parent: &NodeId, class: &str) -> Vec<NodeId> {
        self.children(*parent)
            .iter()
            .copied()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    fn descendants_by_tag(&self, scope: &NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants_matching(*scope, |el| el.tag.eq_ignore_ascii_case(tag))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants_matching(self.root(), |el| attr(el, "id") == Some(id))
            .into_iter()
            .next()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.element(*element)
            .and_then(|el| attr(el, name))
            .map(str::to_owned)
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<()> {
        let el = self.element_mut(*element)?;
        let name = name.to_ascii_lowercase();
        match el.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => el.attrs.push((name, value.to_string())),
        }
        Ok(())
    }

    fn add_class(&mut self, element: &NodeId, class: &str) -> Result<()> {
        if self.has_class(*element, class) {
            return Ok(());
        }
        let joined = match self.attribute(element, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(element, "class", &joined)
    }

    fn set_style_text(&mut self, element: &NodeId, css: &str) -> Result<()> {
        let normalized = serialize_declarations(&parse_declarations(css));
        self.set_attribute(element, "style", &normalized)
    }

    fn set_style_property(&mut self, element: &NodeId, property: &str, value: &str) -> Result<()> {
        let mut decls = self
            .attribute(element, "style")
            .map(|style| parse_declarations(&style))
            .unwrap_or_default();
        match decls
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => decls.push((property.to_ascii_lowercase(), value.to_string())),
        }
        self.set_attribute(element, "style", &serialize_declarations(&decls))
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::element(tag.to_ascii_lowercase(), Vec::new()),
        });
        Ok(id)
    }

    fn set_text(&mut self, element: &NodeId, text: &str) -> Result<()> {
        self.element_mut(*element)?;
        for child in std::mem::take(&mut self.nodes[element.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.append(*element, NodeKind::Text(text.to_string()));
        Ok(())
    }

    fn insert_before(&mut self, reference: &NodeId, node: &NodeId) -> Result<()> {
        let parent = self
            .parent(*reference)
            .ok_or_else(|| Error::Dom("reference node has no parent".into()))?;
        if reference == node {
            return Err(Error::Dom("cannot insert a node before itself".into()));
        }
        self.detach(*node);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|n| n == reference)
            .ok_or_else(|| Error::Dom("reference node not found under its parent".into()))?;
        siblings.insert(pos, *node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }
}

fn attr<'a>(el: &'a ElementData, name: &str) -> Option<&'a str> {
    el.attrs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}
