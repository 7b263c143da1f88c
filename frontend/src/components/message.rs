use caviaar_chat::presentation::{
    render, Block, BlockKind, Inline, LinkStyle, RenderedMessage, LINK_REL, LINK_TARGET,
};
use caviaar_chat::{Message, Product};
use leptos::prelude::*;

use crate::state::WidgetState;

/// A single chat message bubble.
#[component]
pub fn MessageBubble(message: Message) -> impl IntoView {
    let state = expect_context::<WidgetState>();
    let (blocks, products, time) = state.link_policy.with_value(|policy| {
        let rendered = render(&message, policy);
        let time = rendered.local_time();
        let RenderedMessage { blocks, products, .. } = rendered;
        (blocks, products.to_vec(), time)
    });

    let css_class = if message.is_user() { "message user" } else { "message assistant" };
    let body = blocks.into_iter().map(block_view).collect_view();

    view! {
        <div class=css_class>
            <div class="bubble">{body}</div>
            {(!products.is_empty()).then(|| {
                view! {
                    <div class="product-cards">
                        {products
                            .into_iter()
                            .map(|product| view! { <ProductCard product=product /> })
                            .collect_view()}
                    </div>
                }
            })}
            <div class="timestamp">{time}</div>
        </div>
    }
}

#[component]
fn ProductCard(product: Product) -> impl IntoView {
    let price = format!("{:.2} {}", product.price, product.currency);
    let alt = product.name.clone();

    view! {
        <a class="product-card" href=product.url target=LINK_TARGET rel=LINK_REL>
            <img src=product.image_url alt=alt />
            <div class="product-name">{product.name}</div>
            <div class="product-price">{price}</div>
            <div class="product-category">{product.category}</div>
        </a>
    }
}

fn block_view(block: Block) -> AnyView {
    let inlines = block.inlines.into_iter().map(inline_view).collect_view();
    match block.kind {
        BlockKind::Paragraph => view! { <p>{inlines}</p> }.into_any(),
        BlockKind::ListItem => view! { <li>{inlines}</li> }.into_any(),
        BlockKind::Heading => view! { <h4>{inlines}</h4> }.into_any(),
    }
}

fn inline_view(inline: Inline) -> AnyView {
    match inline {
        Inline::Text(text) => text.into_any(),
        Inline::LineBreak => view! { <br /> }.into_any(),
        Inline::Link { label, href, style } => {
            let class = match style {
                LinkStyle::CallToAction => "cta-link",
                LinkStyle::Plain => "plain-link",
            };
            view! {
                <a class=class href=href target=LINK_TARGET rel=LINK_REL>
                    {label}
                    {(style == LinkStyle::CallToAction).then_some(" ↗")}
                </a>
            }
            .into_any()
        }
    }
}
