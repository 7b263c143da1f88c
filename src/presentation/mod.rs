//! Message → displayable content. Pure: no network, no state.

mod links;

use chrono::{DateTime, Local, Utc};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::models::{Message, MessageRole, Product};

pub use links::{LinkPolicy, LinkStyle, LINK_REL, LINK_TARGET};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Link { label: String, href: String, style: LinkStyle },
    LineBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    ListItem,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub inlines: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage<'a> {
    pub id: &'a str,
    pub role: MessageRole,
    pub blocks: Vec<Block>,
    pub timestamp: DateTime<Utc>,
    pub products: &'a [Product],
}

impl RenderedMessage<'_> {
    pub fn links(&self) -> impl Iterator<Item = (&str, &str, LinkStyle)> {
        self.blocks.iter().flat_map(|b| &b.inlines).filter_map(|inline| match inline {
            Inline::Link { label, href, style } => Some((label.as_str(), href.as_str(), *style)),
            _ => None,
        })
    }

    /// `HH:MM` in the viewer's local time zone.
    pub fn local_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Assistant content is read as Markdown; user content is shown verbatim.
pub fn render<'a>(message: &'a Message, policy: &LinkPolicy) -> RenderedMessage<'a> {
    let blocks = match message.role {
        MessageRole::User => vec![Block {
            kind: BlockKind::Paragraph,
            inlines: vec![Inline::Text(message.content.clone())],
        }],
        MessageRole::Assistant => parse_markdown(&message.content, policy),
    };

    RenderedMessage {
        id: &message.id,
        role: message.role,
        blocks,
        timestamp: message.timestamp,
        products: &message.suggested_products,
    }
}

struct BlockBuilder<'p> {
    policy: &'p LinkPolicy,
    blocks: Vec<Block>,
    current: Option<Block>,
    link: Option<(String, String)>,
}

impl<'p> BlockBuilder<'p> {
    fn open(&mut self, kind: BlockKind) {
        // A paragraph inside a loose list item belongs to that item.
        if kind == BlockKind::Paragraph
            && self
                .current
                .as_ref()
                .is_some_and(|b| b.kind == BlockKind::ListItem && b.inlines.is_empty())
        {
            return;
        }
        self.close();
        self.current = Some(Block { kind, inlines: Vec::new() });
    }

    fn close(&mut self) {
        if let Some(block) = self.current.take() {
            if !block.inlines.is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((label, _)) = self.link.as_mut() {
            label.push_str(text);
            return;
        }
        let block = self
            .current
            .get_or_insert_with(|| Block { kind: BlockKind::Paragraph, inlines: Vec::new() });
        match block.inlines.last_mut() {
            Some(Inline::Text(existing)) => existing.push_str(text),
            _ => block.inlines.push(Inline::Text(text.to_string())),
        }
    }

    fn push(&mut self, inline: Inline) {
        self.current
            .get_or_insert_with(|| Block { kind: BlockKind::Paragraph, inlines: Vec::new() })
            .inlines
            .push(inline);
    }

    fn finish(mut self) -> Vec<Block> {
        self.close();
        self.blocks
    }
}

fn parse_markdown(source: &str, policy: &LinkPolicy) -> Vec<Block> {
    let mut builder = BlockBuilder { policy, blocks: Vec::new(), current: None, link: None };

    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Paragraph) => builder.open(BlockKind::Paragraph),
            Event::Start(Tag::Item) => builder.open(BlockKind::ListItem),
            Event::Start(Tag::Heading { .. }) => builder.open(BlockKind::Heading),
            Event::End(TagEnd::Paragraph) => {
                if builder.current.as_ref().is_some_and(|b| b.kind == BlockKind::Paragraph) {
                    builder.close();
                }
            }
            Event::End(TagEnd::Item | TagEnd::Heading(_)) => builder.close(),
            Event::Start(Tag::Link { dest_url, .. }) => {
                builder.link = Some((String::new(), dest_url.to_string()));
            }
            Event::End(TagEnd::Link) => {
                if let Some((label, href)) = builder.link.take() {
                    let style = builder.policy.classify(&href);
                    let label = if label.is_empty() { href.clone() } else { label };
                    builder.push(Inline::Link { label, href, style });
                }
            }
            Event::Text(text) | Event::Code(text) => builder.text(&text),
            Event::Html(html) | Event::InlineHtml(html) => builder.text(&html),
            Event::SoftBreak => builder.text(" "),
            Event::HardBreak => builder.push(Inline::LineBreak),
            _ => {}
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(content: &str) -> Message {
        Message::assistant("a1".to_string(), content.to_string(), Utc::now(), vec![])
    }

    fn policy() -> LinkPolicy {
        LinkPolicy::new("caviaarmode.com")
    }

    #[test]
    fn storefront_link_becomes_call_to_action() {
        let msg = assistant(
            "Check the [size guide](https://caviaarmode.com/size-guide) or [this blog](https://example.com/fit).",
        );
        let rendered = render(&msg, &policy());
        let links: Vec<_> = rendered.links().collect();
        assert_eq!(
            links,
            [
                ("size guide", "https://caviaarmode.com/size-guide", LinkStyle::CallToAction),
                ("this blog", "https://example.com/fit", LinkStyle::Plain),
            ]
        );
        assert_eq!(rendered.blocks.len(), 1);
        assert_eq!(rendered.blocks[0].inlines[0], Inline::Text("Check the ".to_string()));
    }

    #[test]
    fn user_content_is_never_interpreted() {
        let msg = Message::user(
            "u1".to_string(),
            "[x](https://caviaarmode.com)".to_string(),
            Utc::now(),
        );
        let rendered = render(&msg, &policy());
        assert_eq!(rendered.links().count(), 0);
        assert_eq!(
            rendered.blocks,
            vec![Block {
                kind: BlockKind::Paragraph,
                inlines: vec![Inline::Text("[x](https://caviaarmode.com)".to_string())],
            }]
        );
    }

    #[test]
    fn paragraphs_and_list_items_become_blocks() {
        let msg = assistant("Sizes:\n\n- Small\n- **Medium**\n\nNeed help?");
        let blocks = render(&msg, &policy()).blocks;
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            [BlockKind::Paragraph, BlockKind::ListItem, BlockKind::ListItem, BlockKind::Paragraph]
        );
        assert_eq!(blocks[2].inlines, vec![Inline::Text("Medium".to_string())]);
    }

    #[test]
    fn autolinks_use_the_url_as_label() {
        let msg = assistant("Visit <https://caviaarmode.com/return-policy>");
        let rendered = render(&msg, &policy());
        let links: Vec<_> = rendered.links().collect();
        assert_eq!(
            links,
            [(
                "https://caviaarmode.com/return-policy",
                "https://caviaarmode.com/return-policy",
                LinkStyle::CallToAction
            )]
        );
    }

    #[test]
    fn soft_breaks_join_lines() {
        let msg = assistant("Small: Chest 34-36\nMedium: Chest 38-40");
        let blocks = render(&msg, &policy()).blocks;
        assert_eq!(
            blocks[0].inlines,
            vec![Inline::Text("Small: Chest 34-36 Medium: Chest 38-40".to_string())]
        );
    }

    #[test]
    fn products_are_passed_through() {
        let product = Product {
            id: 1,
            name: "Black Formal Shirt".to_string(),
            price: 2799.0,
            currency: "INR".to_string(),
            image_url: String::new(),
            url: "https://caviaarmode.com/products/black-formal-shirt".to_string(),
            category: "shirts".to_string(),
        };
        let msg = Message::assistant(
            "a2".to_string(),
            "Try this".to_string(),
            Utc::now(),
            vec![product.clone()],
        );
        let rendered = render(&msg, &policy());
        assert_eq!(rendered.products, &[product][..]);
    }

    #[test]
    fn time_is_shown_in_the_local_zone() {
        use chrono::TimeZone;

        let at = Utc.with_ymd_and_hms(2025, 8, 20, 14, 22, 0).unwrap();
        let msg = Message::assistant("a3".to_string(), "Hi".to_string(), at, vec![]);
        let expected = at.with_timezone(&Local).format("%H:%M").to_string();
        assert_eq!(render(&msg, &policy()).local_time(), expected);
    }
}
