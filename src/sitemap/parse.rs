// src/sitemap/parse.rs
// =============================================================================
// Parses sitemap XML into nested sitemap URLs and page URLs.
//
// Two document shapes exist:
//
//   <sitemapindex xmlns="...">             <urlset xmlns="...">
//     <sitemap><loc>A.xml</loc></sitemap>    <url><loc>/page</loc></url>
//   </sitemapindex>                        </urlset>
//
// We don't hard-code the namespace URI: sites use several schema versions.
// The root element's namespace (as resolved by quick-xml's NsReader) is the
// one we match children against. Elements without any namespace count as
// the standard sitemap namespace.
//
// Only the direct structure is read: root > sitemap|url > loc. Extension
// elements (image:loc, video:content_loc, ...) live in other namespaces or
// deeper levels and are skipped.
// =============================================================================

use crate::error::{CrawlError, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Namespace assumed for elements that don't declare one
pub const SITEMAP_NAMESPACE: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// Lists other sitemaps
    Index,
    /// Lists pages
    UrlSet,
}

// Everything a sitemap document points at
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SitemapContents {
    /// <sitemap><loc> entries
    pub sitemaps: Vec<String>,
    /// <url><loc> entries
    pub pages: Vec<String>,
}

impl SitemapContents {
    // A document with any nested sitemap is an index, even if it also has pages
    pub fn kind(&self) -> SitemapKind {
        if self.sitemaps.is_empty() {
            SitemapKind::UrlSet
        } else {
            SitemapKind::Index
        }
    }
}

// Which second-level element we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Sitemap,
    Url,
    Ignored,
}

pub fn parse_sitemap(xml: &[u8]) -> Result<SitemapContents> {
    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut contents = SitemapContents::default();

    let mut root_ns: Option<Vec<u8>> = None;
    let mut seen_root = false;
    let mut depth = 0usize;
    let mut entry = Entry::Ignored;
    // Some(..) while inside a <loc> we want to collect
    let mut loc: Option<String> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        let ns = namespace_of(&resolved);

        match event {
            Event::Start(e) => {
                depth += 1;
                let in_root_ns = ns.is_some() && ns == root_ns.as_deref();

                match depth {
                    1 => {
                        seen_root = true;
                        root_ns = ns.map(<[u8]>::to_vec);
                    }
                    2 => {
                        entry = match e.local_name().as_ref() {
                            b"sitemap" if in_root_ns => Entry::Sitemap,
                            b"url" if in_root_ns => Entry::Url,
                            _ => Entry::Ignored,
                        };
                    }
                    3 if entry != Entry::Ignored
                        && in_root_ns
                        && e.local_name().as_ref() == b"loc" =>
                    {
                        loc = Some(String::new());
                    }
                    _ => {}
                }
            }
            // A self-closing root (<urlset/>) is a valid, empty sitemap
            Event::Empty(_) if depth == 0 => seen_root = true,
            Event::Text(e) if depth == 3 => {
                if let Some(text) = loc.as_mut() {
                    text.push_str(&e.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(e) if depth == 3 => {
                if let Some(text) = loc.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                match depth {
                    3 => {
                        if let Some(text) = loc.take() {
                            let value = text.trim();
                            if !value.is_empty() {
                                match entry {
                                    Entry::Sitemap => contents.sitemaps.push(value.to_string()),
                                    Entry::Url => contents.pages.push(value.to_string()),
                                    Entry::Ignored => {}
                                }
                            }
                        }
                    }
                    2 => entry = Entry::Ignored,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if !seen_root {
        return Err(CrawlError::Malformed("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(CrawlError::Malformed(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }

    Ok(contents)
}

// Namespace URI of an element, with unprefixed/undeclared elements mapped to
// the standard sitemap namespace. Unknown prefixes resolve to nothing.
fn namespace_of<'a>(resolved: &'a ResolveResult<'a>) -> Option<&'a [u8]> {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) => Some(*ns),
        ResolveResult::Unbound => Some(SITEMAP_NAMESPACE),
        ResolveResult::Unknown(_) => None,
    }
}
