use rcss_shared::byte_stream::Span;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub type Number = f32;

/// RCSS node that can be found in a syntax tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeType {
    /// Root of a source unit; children are the rules in document order
    StyleSheet { children: Vec<Node> },
    /// A selector followed by a brace-delimited block
    Rule { selector: Node, block: Node },
    /// The `{ ... }` body of a rule; children are declarations in source order
    Block { children: Vec<Node> },
    /// One `property: value ... ;` entry. The value list holds at least one node for a
    /// well-formed declaration, but may be empty when the parse had to recover.
    Declaration { property: String, value: Vec<Node> },
    /// A `.name` selector
    ClassSelector { name: String },
    /// A `#name` selector
    IdSelector { name: String },
    /// A bare element name selector
    ElementSelector { name: String },
    /// A design token reference `@name` or `@name/version` in value position
    TokenRef { name: String, version: Option<String> },
    /// A numeric value with an optional unit
    Number { value: Number, unit: Option<String> },
    /// A color value: `#` hex notation or function notation, raw text preserved
    Color { value: String },
    /// A bare identifier in value position
    Ident { value: String },
}

/// A node in the RCSS syntax tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub node_type: Box<NodeType>,
    pub span: Span,
}

impl Node {
    /// Returns a new node of the given type on the given span
    pub fn new(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type: Box::new(node_type),
            span,
        }
    }

    pub fn is_stylesheet(&self) -> bool {
        matches!(*self.node_type, NodeType::StyleSheet { .. })
    }

    pub fn is_rule(&self) -> bool {
        matches!(*self.node_type, NodeType::Rule { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(*self.node_type, NodeType::Block { .. })
    }

    pub fn is_declaration(&self) -> bool {
        matches!(*self.node_type, NodeType::Declaration { .. })
    }

    pub fn is_selector(&self) -> bool {
        matches!(
            *self.node_type,
            NodeType::ClassSelector { .. } | NodeType::IdSelector { .. } | NodeType::ElementSelector { .. }
        )
    }

    pub fn is_color(&self) -> bool {
        matches!(*self.node_type, NodeType::Color { .. })
    }

    pub fn is_number(&self) -> bool {
        matches!(*self.node_type, NodeType::Number { .. })
    }

    pub fn is_token_ref(&self) -> bool {
        matches!(*self.node_type, NodeType::TokenRef { .. })
    }

    pub fn is_ident(&self) -> bool {
        matches!(*self.node_type, NodeType::Ident { .. })
    }

    /// Returns the name of a selector node, or None for any other node
    pub fn as_selector_name(&self) -> Option<&str> {
        match &*self.node_type {
            NodeType::ClassSelector { name }
            | NodeType::IdSelector { name }
            | NodeType::ElementSelector { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the child nodes in source order. Leaf nodes return an empty slice.
    pub fn children(&self) -> &[Node] {
        match &*self.node_type {
            NodeType::StyleSheet { children } | NodeType::Block { children } => children,
            NodeType::Declaration { value, .. } => value,
            // Rule keeps its selector and block as named fields; use rule_parts
            _ => &[],
        }
    }

    /// Returns the selector and block of a rule node
    pub fn rule_parts(&self) -> Option<(&Node, &Node)> {
        match &*self.node_type {
            NodeType::Rule { selector, block } => Some((selector, block)),
            _ => None,
        }
    }

    /// Depth-first pre-order traversal over this node and everything below it
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        if let Some((selector, block)) = node.rule_parts() {
            self.stack.push(block);
            self.stack.push(selector);
        } else {
            for child in node.children().iter().rev() {
                self.stack.push(child);
            }
        }

        Some(node)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &*self.node_type {
            NodeType::StyleSheet { .. } => write!(f, "[Stylesheet]"),
            NodeType::Rule { .. } => write!(f, "[Rule]"),
            NodeType::Block { .. } => write!(f, "[Block]"),
            NodeType::Declaration { property, .. } => write!(f, "[Declaration] {property}"),
            NodeType::ClassSelector { name } => write!(f, "[ClassSelector] .{name}"),
            NodeType::IdSelector { name } => write!(f, "[IdSelector] #{name}"),
            NodeType::ElementSelector { name } => write!(f, "[ElementSelector] {name}"),
            NodeType::TokenRef { name, version } => match version {
                Some(version) => write!(f, "[TokenRef] @{name}/{version}"),
                None => write!(f, "[TokenRef] @{name}"),
            },
            NodeType::Number { value, unit } => {
                write!(f, "[Number] {}{}", value, unit.as_deref().unwrap_or(""))
            }
            NodeType::Color { value } => write!(f, "[Color] {value}"),
            NodeType::Ident { value } => write!(f, "[Ident] {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(node_type: NodeType) -> Node {
        Node::new(node_type, Span::default())
    }

    #[test]
    fn descendants_walks_pre_order() {
        let rule = leaf(NodeType::Rule {
            selector: leaf(NodeType::ClassSelector { name: "box".to_string() }),
            block: leaf(NodeType::Block {
                children: vec![leaf(NodeType::Declaration {
                    property: "color".to_string(),
                    value: vec![leaf(NodeType::Ident { value: "red".to_string() })],
                })],
            }),
        });
        let sheet = leaf(NodeType::StyleSheet { children: vec![rule] });

        let kinds: Vec<String> = sheet.descendants().map(|n| n.to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "[Stylesheet]",
                "[Rule]",
                "[ClassSelector] .box",
                "[Block]",
                "[Declaration] color",
                "[Ident] red",
            ]
        );
    }

    #[test]
    fn accessors() {
        let selector = leaf(NodeType::IdSelector { name: "title".to_string() });
        assert!(selector.is_selector());
        assert_eq!(selector.as_selector_name(), Some("title"));
        assert!(!selector.is_color());

        let color = leaf(NodeType::Color { value: "#fff".to_string() });
        assert!(color.is_color());
        assert_eq!(color.as_selector_name(), None);
        assert!(color.children().is_empty());
    }
}
