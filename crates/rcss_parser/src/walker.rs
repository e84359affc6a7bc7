use crate::node::{Node, NodeType};
use std::io::Write;
use std::ops::Deref;

/// The walker is used to walk the syntax tree and print it to stdout.
pub struct Walker<'a> {
    root: &'a Node,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    pub fn walk_stdout(&self) {
        let _ = inner_walk(self.root, 0, &mut std::io::stdout());
    }

    pub fn walk_to_string(&self) -> String {
        let mut output: Vec<u8> = Vec::new();

        let _ = inner_walk(self.root, 0, &mut output);

        String::from_utf8_lossy(&output).into_owned()
    }
}

fn inner_walk(node: &Node, depth: usize, f: &mut dyn Write) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    match node.node_type.deref() {
        NodeType::StyleSheet { children } => {
            writeln!(f, "{}[Stylesheet ({})]", prefix, children.len())?;
            for child in children.iter() {
                inner_walk(child, depth + 1, f)?;
            }
        }
        NodeType::Rule { selector, block } => {
            writeln!(f, "{}[Rule]", prefix)?;
            inner_walk(selector, depth + 1, f)?;
            inner_walk(block, depth + 1, f)?;
        }
        NodeType::Block { children } => {
            writeln!(f, "{}[Block]", prefix)?;
            for child in children.iter() {
                inner_walk(child, depth + 1, f)?;
            }
        }
        NodeType::Declaration { property, value } => {
            writeln!(f, "{}[Declaration] property: {}", prefix, property)?;
            for child in value.iter() {
                inner_walk(child, depth + 1, f)?;
            }
        }
        NodeType::ClassSelector { name } => {
            writeln!(f, "{}[ClassSelector] {}", prefix, name)?;
        }
        NodeType::IdSelector { name } => {
            writeln!(f, "{}[IdSelector] {}", prefix, name)?;
        }
        NodeType::ElementSelector { name } => {
            writeln!(f, "{}[ElementSelector] {}", prefix, name)?;
        }
        NodeType::TokenRef { name, version } => match version {
            Some(version) => writeln!(f, "{}[TokenRef] {}/{}", prefix, name, version)?,
            None => writeln!(f, "{}[TokenRef] {}", prefix, name)?,
        },
        NodeType::Number { value, unit } => {
            writeln!(f, "{}[Number] {}{}", prefix, value, unit.as_deref().unwrap_or(""))?;
        }
        NodeType::Color { value } => {
            writeln!(f, "{}[Color] {}", prefix, value)?;
        }
        NodeType::Ident { value } => {
            writeln!(f, "{}[Ident] {}", prefix, value)?;
        }
    }
    Ok(())
}
