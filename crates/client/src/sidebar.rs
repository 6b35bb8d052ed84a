//! Table-of-contents extraction.
//!
//! The sidebar page lists chapter headings and episode links in reading
//! order inside an `ol.widget-toc-items` list. Headings carry no content of
//! their own; each episode inherits the most recent heading as its sub
//! title. Extraction is two stages: parse the list into [`TocEntry`]
//! values, then fold them into episodes carrying the heading forward.

use std::sync::LazyLock;

use episearch_core::{Episode, Error};
use scraper::{ElementRef, Html, Selector};

static TOC_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ol.widget-toc-items").expect("invalid selector"));
static TOC_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ol.widget-toc-items li").expect("invalid selector"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").expect("invalid selector"));
static EPISODE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector"));

/// Class marking a list item as a chapter heading rather than an episode.
const CHAPTER_CLASS: &str = "widget-toc-chapter";

/// One entry of the table-of-contents list, in sidebar order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocEntry {
    /// A chapter heading; updates the running sub title.
    Chapter { title: String },
    /// An episode reference with its display label and link.
    Episode { label: String, href: String },
}

/// Parse a sidebar page into its ordered table-of-contents entries.
pub fn parse_toc(html: &str) -> Result<Vec<TocEntry>, Error> {
    let doc = Html::parse_document(html);
    if doc.select(&TOC_LIST).next().is_none() {
        return Err(Error::MalformedSidebarEntry("table-of-contents list not found".to_string()));
    }
    doc.select(&TOC_ITEMS).map(parse_entry).collect()
}

fn parse_entry(item: ElementRef<'_>) -> Result<TocEntry, Error> {
    let label = item
        .select(&LABEL)
        .next()
        .map(|span| span.text().collect::<String>())
        .ok_or_else(|| Error::MalformedSidebarEntry("entry without a label span".to_string()))?;

    if has_class(item, CHAPTER_CLASS) {
        return Ok(TocEntry::Chapter { title: label });
    }

    let href = item
        .select(&EPISODE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedSidebarEntry(format!("episode entry {label:?} without a link")))?;

    Ok(TocEntry::Episode { label, href })
}

fn has_class(item: ElementRef<'_>, class: &str) -> bool {
    item.value()
        .attr("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Fold the entries into episodes, carrying the current chapter title.
///
/// The accumulator starts as `("", [])`; chapter entries replace the title
/// and emit nothing, episode entries capture the title by value. A later
/// heading never touches already-emitted episodes.
pub fn fold_episodes(entries: &[TocEntry]) -> Result<Vec<Episode>, Error> {
    let (_, episodes) = entries.iter().try_fold((String::new(), Vec::new()), fold_entry)?;
    Ok(episodes)
}

fn fold_entry(
    (current_title, mut episodes): (String, Vec<Episode>), entry: &TocEntry,
) -> Result<(String, Vec<Episode>), Error> {
    match entry {
        TocEntry::Chapter { title } => Ok((title.clone(), episodes)),
        TocEntry::Episode { label, href } => {
            let (work_id, episode_id) = ids_from_href(href)?;
            episodes.push(Episode {
                work_id,
                sub_title: current_title.clone(),
                number: label.clone(),
                episode_id,
            });
            Ok((current_title, episodes))
        }
    }
}

/// Work and episode ids from an episode link.
///
/// The link path ends `.../{work_id}/episodes/{episode_id}`: the episode id
/// is the last segment and the work id the third from the end.
fn ids_from_href(href: &str) -> Result<(u64, u64), Error> {
    let segments: Vec<&str> = href.split('/').collect();
    if segments.len() < 3 {
        return Err(Error::MalformedSidebarEntry(format!("episode link {href:?} has too few path segments")));
    }

    let episode_id = segments[segments.len() - 1];
    let work_id = segments[segments.len() - 3];
    match (work_id.parse(), episode_id.parse()) {
        (Ok(work_id), Ok(episode_id)) => Ok((work_id, episode_id)),
        _ => Err(Error::MalformedSidebarEntry(format!("episode link {href:?} has non-numeric ids"))),
    }
}

/// Extract the full ordered episode list from a sidebar page.
pub fn extract_episodes(html: &str) -> Result<Vec<Episode>, Error> {
    fold_episodes(&parse_toc(html)?)
}
