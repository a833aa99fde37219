//! RSS feed generation.

use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};

use super::index::SiteIndex;
use super::render::SiteContext;

/// Build the RSS 2.0 feed XML for the site.
///
/// `lastBuildDate` is the newest post's date rather than the wall clock, so
/// rebuilding unchanged input yields byte-identical output.
pub fn build_feed(site: &SiteContext, base_url: &str, index: &SiteIndex) -> String {
    let base = base_url.trim_end_matches('/');

    let items: Vec<rss::Item> = index
        .entries()
        .iter()
        .map(|entry| {
            let link = format!("{}{}", base, entry.url);
            ItemBuilder::default()
                .title(entry.title.clone())
                .link(link.clone())
                .guid(GuidBuilder::default().permalink(true).value(link).build())
                .description(entry.description.clone())
                .pub_date(entry.date.to_rfc2822())
                .author(site.author.clone())
                .build()
        })
        .collect();

    let last_build = index.entries().first().map(|e| e.date.to_rfc2822());

    let channel = ChannelBuilder::default()
        .title(site.title.clone())
        .link(base.to_string())
        .description(site.description.clone().unwrap_or_default())
        .last_build_date(last_build)
        .generator(concat!("folio ", env!("CARGO_PKG_VERSION")).to_string())
        .items(items)
        .build();

    channel.to_string()
}
