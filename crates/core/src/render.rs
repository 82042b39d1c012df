//! Feed renderer.
//!
//! Content is built off-document as a [`Fragment`] and handed to the surface
//! as one replacement of the container's children; nothing is merged with the
//! previous content.

use chrono::{FixedOffset, Local, Offset};

use crate::diff::{Feed, FeedPayload};
use crate::fmt::{fmt_number_grouped, fmt_time_of_day};
use crate::model::{ChatMessage, LeaderboardEntry};
use crate::surface::{ElementId, Surface};

impl Feed {
    pub fn element(self) -> ElementId {
        match self {
            Feed::Leaderboard => ElementId::Leaderboard,
            Feed::Messages => ElementId::ChatMessages,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Feed::Leaderboard => "No leaderboard data",
            Feed::Messages => "No messages yet",
        }
    }
}

/// A detached UI node. Text is always inserted as text, never as markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: &'static str,
    pub class: &'static str,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag,
            class,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Own text followed by every descendant's, space separated.
    pub fn text_content(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(t) = &self.text {
            parts.push(t.clone());
        }
        for child in &self.children {
            let t = child.text_content();
            if !t.is_empty() {
                parts.push(t);
            }
        }
        parts.join(" ")
    }
}

/// Off-document content for one container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// `text_content` of each top-level node.
    pub fn lines(&self) -> Vec<String> {
        self.nodes.iter().map(Node::text_content).collect()
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// Where message times are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// The machine's zone, looked up on every render so DST changes apply.
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    zone: Zone,
}

impl Renderer {
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self {
            zone: Zone::Fixed(utc_offset),
        }
    }

    pub fn local() -> Self {
        Self { zone: Zone::Local }
    }

    /// The UTC offset in effect right now.
    pub fn utc_offset(&self) -> FixedOffset {
        match self.zone {
            Zone::Local => Local::now().offset().fix(),
            Zone::Fixed(offset) => offset,
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, payload: FeedPayload<'_>) {
        let feed = payload.feed();
        let target = feed.element();

        if payload.is_empty() {
            surface.replace_children(target, placeholder(feed));
            return;
        }

        match payload {
            FeedPayload::Leaderboard(entries) => {
                surface.replace_children(target, leaderboard_fragment(entries));
            }
            FeedPayload::Messages(messages) => {
                surface.replace_children(target, self.messages_fragment(messages));
                surface.scroll_to_end(target);
            }
        }
    }

    pub fn messages_fragment(&self, messages: &[ChatMessage]) -> Fragment {
        let offset = self.utc_offset();
        messages
            .iter()
            .map(|msg| {
                let class = if msg.is_achievement() {
                    "message achievement"
                } else {
                    "message"
                };
                let header = Node::element("div", "message-header")
                    .with_child(Node::element("span", "message-player").with_text(&msg.player))
                    .with_child(
                        Node::element("span", "message-time")
                            .with_text(fmt_time_of_day(msg.timestamp.as_ref(), offset)),
                    );
                Node::element("div", class)
                    .with_child(header)
                    .with_child(Node::element("div", "message-text").with_text(&msg.message))
            })
            .collect()
    }
}

/// Rows in input order; rank is the 1-based position.
pub fn leaderboard_fragment(entries: &[LeaderboardEntry]) -> Fragment {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Node::element("div", "leaderboard-item")
                .with_child(Node::element("div", "rank").with_text(format!("#{}", i + 1)))
                .with_child(Node::element("div", "player-name").with_text(&entry.player))
                .with_child(Node::element("div", "score").with_text(fmt_number_grouped(entry.score)))
        })
        .collect()
}

pub fn placeholder(feed: Feed) -> Fragment {
    std::iter::once(Node::element("div", "placeholder").with_text(feed.placeholder())).collect()
}
