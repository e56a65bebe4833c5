//! Sink for converting parser events into a raw tag tree.

use crate::parser::event::Event;
use crate::raw::RawNode;

/// Converts parser events into [`RawNode`]s.
pub struct Sink {
    events: Vec<Event>,
}

impl Sink {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Consume the sink and build the tree.
    ///
    /// Scopes still open at the end of the events are closed.
    pub fn finish(self) -> Vec<RawNode> {
        let mut root = Vec::new();
        let mut stack: Vec<RawNode> = Vec::new();

        for event in self.events {
            match event {
                Event::StartChapter { number } => stack.push(RawNode::Chapter {
                    number,
                    children: Vec::new(),
                }),
                Event::StartVerse { label } => stack.push(RawNode::Verse {
                    label,
                    children: Vec::new(),
                }),
                Event::StartParagraph { marker } => stack.push(RawNode::Paragraph {
                    marker,
                    children: Vec::new(),
                }),
                Event::StartCharacter { marker } => stack.push(RawNode::Character {
                    marker,
                    attributes: Vec::new(),
                    children: Vec::new(),
                }),
                Event::Attributes(attrs) => {
                    if let Some(RawNode::Character { attributes, .. }) = stack.last_mut() {
                        *attributes = attrs;
                    }
                }
                Event::Text(text) => attach(&mut stack, &mut root, RawNode::Text(text)),
                Event::Opaque {
                    marker,
                    style,
                    source,
                } => attach(
                    &mut stack,
                    &mut root,
                    RawNode::Opaque {
                        marker,
                        style,
                        source,
                    },
                ),
                Event::Finish => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
            }
        }

        while let Some(node) = stack.pop() {
            attach(&mut stack, &mut root, node);
        }

        root
    }
}

fn attach(stack: &mut [RawNode], root: &mut Vec<RawNode>, node: RawNode) {
    match stack.last_mut().and_then(RawNode::children_mut) {
        Some(children) => children.push(node),
        None => root.push(node),
    }
}
