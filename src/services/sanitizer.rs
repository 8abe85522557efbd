//! Content Sanitizer.
//!
//! Reduces a candidate subtree to allow-listed content. The arena is cloned
//! first and every removal happens on the clone; the source document is never
//! touched.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ego_tree::{NodeId, Tree};
use scraper::{ElementRef, Node, Selector};
use tracing::debug;

use crate::dom::document::{collapse_whitespace, is_hidden, text_len, trimmed_text, ImageSize};
use crate::services::rules::CompiledRules;
use crate::types::content::{ContentElement, ContentFragment};

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector should parse")
});
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("image selector should parse"));
static FIGCAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption").expect("figcaption selector should parse"));

/// Reduces a candidate subtree to a [`ContentFragment`].
pub struct ContentSanitizer<'r> {
    rules: &'r CompiledRules,
}

impl<'r> ContentSanitizer<'r> {
    pub fn new(rules: &'r CompiledRules) -> Self {
        Self { rules }
    }

    /// Emits the deduplicated headings first, then the remaining content
    /// blocks in document order.
    pub fn sanitize(&self, candidate: ElementRef<'_>) -> ContentFragment {
        let mut tree: Tree<Node> = candidate.tree().clone();
        let root_id = candidate.id();
        let removed = self.strip(&mut tree, root_id);
        let figures = self.place_figures(&mut tree, root_id);
        scrub_attributes(&mut tree, root_id);

        let mut fragment = ContentFragment::new();
        let Some(root) = tree.get(root_id).and_then(ElementRef::wrap) else {
            return fragment;
        };

        self.collect_headings(root, &mut fragment);
        self.collect_blocks(root, &figures, &mut fragment);

        let headings = fragment.headings().count();
        let figure_count = fragment.figures().count();
        debug!(
            removed,
            headings,
            figures = figure_count,
            blocks = fragment.len() - headings - figure_count,
            "sanitized candidate"
        );
        fragment
    }

    /// Detaches boilerplate and hidden descendants of `root`. Returns how many
    /// subtrees were removed.
    fn strip(&self, tree: &mut Tree<Node>, root_id: NodeId) -> usize {
        let boilerplate: Vec<NodeId> = match tree.get(root_id).and_then(ElementRef::wrap) {
            Some(root) => self
                .rules
                .boilerplate
                .iter()
                .flat_map(|selector| root.select(selector))
                .map(|el| el.id())
                .collect(),
            None => return 0,
        };
        let mut removed = detach_all(tree, &boilerplate);

        let hidden: Vec<NodeId> = match tree.get(root_id).and_then(ElementRef::wrap) {
            Some(root) => root
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .filter(|el| is_hidden(*el))
                .map(|el| el.id())
                .collect(),
            None => Vec::new(),
        };
        removed += detach_all(tree, &hidden);
        removed
    }

    /// Resolves every image to a figure while its size attributes are intact.
    ///
    /// Figures are keyed by where they are emitted: an image inside a text
    /// block that is serialized whole is taken out of it and keyed by that
    /// block, so it follows the block; any other image is keyed by itself.
    /// Icons get no entry.
    fn place_figures(
        &self,
        tree: &mut Tree<Node>,
        root_id: NodeId,
    ) -> HashMap<NodeId, Vec<ContentElement>> {
        let mut figures: HashMap<NodeId, Vec<ContentElement>> = HashMap::new();
        let mut taken = Vec::new();
        if let Some(root) = tree.get(root_id).and_then(ElementRef::wrap) {
            for img in root.select(&IMAGES) {
                let key = match emitted_block(root_id, img) {
                    Some(block) => {
                        taken.push(img.id());
                        block
                    }
                    None => img.id(),
                };
                if let Some(figure) = self.figure(img) {
                    figures.entry(key).or_default().push(figure);
                }
            }
        }
        detach_all(tree, &taken);
        figures
    }

    /// Headings inside a block that is emitted whole stay in that block.
    fn collect_headings(&self, root: ElementRef<'_>, fragment: &mut ContentFragment) {
        let mut seen: HashSet<String> = HashSet::new();
        for heading in root.select(&HEADINGS) {
            if emitted_block(root.id(), heading).is_some() {
                continue;
            }
            let text = collapse_whitespace(&trimmed_text(heading));
            if text.is_empty() || !seen.insert(text.clone()) {
                continue;
            }
            let level = heading.value().name()[1..].parse().unwrap_or(2);
            fragment.push(ContentElement::Heading { level, text });
        }
    }

    fn collect_blocks(
        &self,
        parent: ElementRef<'_>,
        figures: &HashMap<NodeId, Vec<ContentElement>>,
        fragment: &mut ContentFragment,
    ) {
        for child in parent.children().filter_map(ElementRef::wrap) {
            let name = child.value().name();
            if HEADINGS.matches(&child) || self.is_caption(child) {
                continue;
            }
            if name == "img" {
                if let Some(figure) = figures.get(&child.id()) {
                    fragment.elements.extend(figure.iter().cloned());
                }
                continue;
            }
            match block_for(child) {
                Some(block) if text_len(child) > 0 => {
                    fragment.push(block);
                    if let Some(taken) = figures.get(&child.id()) {
                        fragment.elements.extend(taken.iter().cloned());
                    }
                }
                // Empty blocks may still wrap images.
                _ => self.collect_blocks(child, figures, fragment),
            }
        }
    }

    /// Captions are attached to their figure, never emitted on their own.
    fn is_caption(&self, el: ElementRef<'_>) -> bool {
        el.value().name() == "figcaption"
            || self.rules.cms_captions.iter().any(|sel| sel.matches(&el))
    }

    fn figure(&self, img: ElementRef<'_>) -> Option<ContentElement> {
        if ImageSize::of(img).is_smaller_than(self.rules.rules.min_image_px) {
            return None;
        }
        let attr = |name: &str| {
            img.value()
                .attr(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let src = attr("src").or_else(|| attr("data-src"))?;
        let alt = attr("alt");
        let caption = alt
            .clone()
            .or_else(|| self.figcaption_of(img))
            .or_else(|| self.cms_caption_of(img));
        Some(ContentElement::Figure { src, alt, caption })
    }

    /// Caption from the enclosing `<figure>`.
    fn figcaption_of(&self, img: ElementRef<'_>) -> Option<String> {
        let figure = img
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "figure")?;
        figure
            .select(&FIGCAPTION)
            .map(|c| collapse_whitespace(&trimmed_text(c)))
            .find(|t| !t.is_empty())
    }

    /// Caption text from the enclosing CMS image container.
    fn cms_caption_of(&self, img: ElementRef<'_>) -> Option<String> {
        let container = img.ancestors().filter_map(ElementRef::wrap).find(|el| {
            self.rules
                .image_containers
                .iter()
                .any(|sel| sel.matches(el))
        })?;
        self.rules.cms_captions.iter().find_map(|sel| {
            container
                .select(sel)
                .map(|c| collapse_whitespace(&trimmed_text(c)))
                .find(|t| !t.is_empty())
        })
    }
}

fn is_block(el: ElementRef<'_>) -> bool {
    matches!(
        el.value().name(),
        "p" | "ul" | "ol" | "blockquote" | "pre" | "code" | "table"
    )
}

/// The block `el` ends up serialized inside, if any: its outermost block
/// ancestor below `root_id` that carries text.
fn emitted_block(root_id: NodeId, el: ElementRef<'_>) -> Option<NodeId> {
    let ancestors: Vec<ElementRef<'_>> = el
        .ancestors()
        .take_while(|node| node.id() != root_id)
        .filter_map(ElementRef::wrap)
        .collect();
    ancestors
        .into_iter()
        .rev()
        .find(|block| is_block(*block) && text_len(*block) > 0)
        .map(|block| block.id())
}

/// Drops event handlers and inline styles below `root_id`.
fn scrub_attributes(tree: &mut Tree<Node>, root_id: NodeId) {
    let ids: Vec<NodeId> = match tree.get(root_id) {
        Some(root) => root.descendants().map(|node| node.id()).collect(),
        None => return,
    };
    for id in ids {
        if let Some(mut node) = tree.get_mut(id) {
            if let Node::Element(el) = node.value() {
                el.attrs.retain(|name, _| {
                    let local: &str = &name.local;
                    !(local.starts_with("on") || local == "style")
                });
            }
        }
    }
}

/// Maps an allow-listed element kind to its content block.
fn block_for(el: ElementRef<'_>) -> Option<ContentElement> {
    if !is_block(el) {
        return None;
    }
    let html = el.html();
    match el.value().name() {
        "p" => Some(ContentElement::Paragraph { html }),
        "ul" => Some(ContentElement::List { ordered: false, html }),
        "ol" => Some(ContentElement::List { ordered: true, html }),
        "blockquote" => Some(ContentElement::Blockquote { html }),
        "pre" | "code" => Some(ContentElement::CodeBlock { html }),
        "table" => Some(ContentElement::Table { html }),
        _ => None,
    }
}

fn detach_all(tree: &mut Tree<Node>, ids: &[NodeId]) -> usize {
    let mut count = 0;
    for id in ids {
        if let Some(mut node) = tree.get_mut(*id) {
            node.detach();
            count += 1;
        }
    }
    count
}

/// Sanitizes a candidate using the built-in rules.
pub fn sanitize(candidate: ElementRef<'_>) -> ContentFragment {
    ContentSanitizer::new(CompiledRules::builtin()).sanitize(candidate)
}
