use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, trace};

use super::models::{DetailRecord, ListItemRecord};
use crate::error::{Error, Result};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

// Class attributes are matched as whole strings: a fragment carrying extra
// classes (`summary-content release-year`) is a different section and must
// not take a position.

// Search listing (`madara-core/content/content-search` template)
static ITEM_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class*="c-tabs-item__content"]"#));
static ITEM_TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="post-title"] > h3[class="h4"] > a"#));
static ITEM_COVER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="tab-thumb c-image-hover"] > a > img"#));
static SUMMARY_HEADING: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="summary-heading"] > h5"#));
static SUMMARY_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="summary-content"]"#));
static LAST_UPDATED: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="meta-item post-on"] > span[class="font-meta"]"#));
static LATEST_CHAPTER: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"div[class="meta-item latest-chap"] > span[class="font-meta chapter"] > a"#)
});
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

// Item page
static DETAIL_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"h1[class="title"]"#));
static DETAIL_COVER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="thumb"] > img"#));
static DETAIL_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"div[class="description-summary"] > div[class="summary__content show-more"]"#)
});
static DETAIL_GENRES: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="genres-content"] > a"#));
static DETAIL_STATUS: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"div[class="post-status"] > div[class="summary-content"] > a"#)
});

/// Lazy-load attributes in the order Madara themes use them. The eager `src`
/// is a placeholder on listing pages.
const LAZY_SRC_ATTRS: &[&str] = &["data-src", "data-lazy-src"];

/// Summary sections a listing heading can introduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Summary {
    Alternative,
    Credits,
    Genres,
    Status,
}

impl Summary {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Alternative" => Some(Summary::Alternative),
            "Authors" | "Artists" => Some(Summary::Credits),
            "Genres" => Some(Summary::Genres),
            "Status" => Some(Summary::Status),
            _ => None,
        }
    }
}

/// Parse without ever failing. html5ever recovers from malformed markup and
/// records what it fixed up; those diagnostics are only worth a trace line.
fn parse_lenient(markup: &str) -> Html {
    let document = Html::parse_document(markup);
    if !document.errors.is_empty() {
        trace!(
            count = document.errors.len(),
            first = %document.errors[0],
            "Recovered from malformed markup"
        );
    }
    document
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope.select(selector).next().map(text_of).unwrap_or_default()
}

fn link_labels(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope.select(selector).map(text_of).collect()
}

fn lazy_src(img: ElementRef<'_>) -> Option<&str> {
    LAZY_SRC_ATTRS
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Make `src` absolute against `base`. Returns `src` unchanged when it is
/// already absolute or cannot be resolved.
pub fn absolutize(base: &str, src: &str) -> String {
    let src = src.trim();
    if src.is_empty() || Url::parse(src).is_ok() {
        return src.to_string();
    }
    Url::parse(base)
        .and_then(|base| base.join(src))
        .map(String::from)
        .unwrap_or_else(|_| src.to_string())
}

/// Extract every catalog entry from a search listing fragment.
///
/// Blocks without a title link are dropped; every other field falls back to
/// empty. A listing with no usable block is [`Error::NoItemsFound`].
pub fn extract_list(markup: &str) -> Result<Vec<ListItemRecord>> {
    let document = parse_lenient(markup);
    let mut blocks = 0usize;

    let items: Vec<ListItemRecord> = document
        .select(&ITEM_BLOCK)
        .inspect(|_| blocks += 1)
        .filter_map(extract_item)
        .collect();

    debug!(blocks, items = items.len(), "Parsed catalog listing");

    if items.is_empty() {
        return Err(Error::NoItemsFound);
    }
    Ok(items)
}

fn extract_item(block: ElementRef<'_>) -> Option<ListItemRecord> {
    let link = block.select(&ITEM_TITLE_LINK).next()?;
    let title = text_of(link);
    let url = link.attr("href").map(str::trim).unwrap_or_default().to_string();
    if title.is_empty() || url.is_empty() {
        trace!(title = %title, url = %url, "Skipping block without title link");
        return None;
    }

    let cover_image = block
        .select(&ITEM_COVER)
        .next()
        .and_then(lazy_src)
        .map(|src| absolutize(&url, src))
        .unwrap_or_default();

    let mut item = ListItemRecord {
        title,
        url,
        cover_image,
        last_updated: first_text(block, &LAST_UPDATED),
        latest_chapter: first_text(block, &LATEST_CHAPTER),
        ..Default::default()
    };
    fill_summary(block, &mut item);

    Some(item)
}

/// Content fragments carry no identifiers, so each recognized heading claims
/// the next fragment in document order. The position advances even when the
/// fragment is missing; unrecognized headings do not claim one.
fn fill_summary(block: ElementRef<'_>, item: &mut ListItemRecord) {
    let contents: Vec<ElementRef<'_>> = block.select(&SUMMARY_CONTENT).collect();
    let mut position = 0;

    for heading in block.select(&SUMMARY_HEADING) {
        let label = text_of(heading);
        let Some(section) = Summary::from_label(&label) else {
            trace!(label = %label, "Ignoring unknown summary heading");
            continue;
        };
        let fragment = contents.get(position).copied();
        position += 1;

        match section {
            Summary::Alternative => {
                item.description = fragment.map(text_of).unwrap_or_default();
            }
            Summary::Credits => {}
            Summary::Genres => {
                item.genres = fragment
                    .map(|content| link_labels(content, &LINK))
                    .unwrap_or_default();
            }
            Summary::Status => {
                item.status = fragment.map(text_of).unwrap_or_default();
            }
        }
    }
}

/// Extract an item page. Only a missing title fails the record.
pub fn extract_detail(markup: &str) -> Result<DetailRecord> {
    let document = parse_lenient(markup);
    let root = document.root_element();

    let title = first_text(root, &DETAIL_TITLE);
    if title.is_empty() {
        return Err(Error::MissingTitle);
    }

    let cover_image = root
        .select(&DETAIL_COVER)
        .next()
        .and_then(|img| {
            ["src", "data-src"]
                .iter()
                .filter_map(|attr| img.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
        })
        .unwrap_or_default()
        .to_string();

    let record = DetailRecord {
        title,
        cover_image,
        description: first_text(root, &DETAIL_DESCRIPTION),
        genres: link_labels(root, &DETAIL_GENRES),
        status: first_text(root, &DETAIL_STATUS),
    };

    debug!(title = %record.title, genres = record.genres.len(), "Parsed item page");
    Ok(record)
}
