use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::archive::ArchiveStore;
use crate::client::{ClientError, HubSpotClient, Listing};
use crate::resource::Resource;

/// Per-resource record counts of one dump run.
pub struct DumpStats {
    pub counts: Vec<(Resource, usize)>,
}

impl DumpStats {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Fetch authors, topics, posts and comments and write every record to the archive.
/// Any HTTP or I/O failure aborts the run; re-running overwrites by id.
pub fn run(client: &HubSpotClient, store: &ArchiveStore) -> Result<DumpStats> {
    println!("Dumping blog content to {:?}...", store.root());
    info!("Dumping portal {} to {:?}", client.hub_id(), store.root());

    let counts = vec![
        step(store, Resource::Author, client.authors())?,
        step(store, Resource::Topic, client.topics())?,
        step(store, Resource::Post, client.posts())?,
        step(store, Resource::Comment, client.comments())?,
    ];

    Ok(DumpStats { counts })
}

fn step(
    store: &ArchiveStore,
    resource: Resource,
    fetched: Result<Listing, ClientError>,
) -> Result<(Resource, usize)> {
    let listing = fetched.with_context(|| format!("Failed to fetch {}", resource))?;
    let n = archive_listing(store, listing)?;
    println!("Dumped {} {}.", n, resource);
    Ok((resource, n))
}

fn archive_listing(store: &ArchiveStore, listing: Listing) -> Result<usize> {
    let resource = listing.resource();

    let pb = ProgressBar::new(listing.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:>9} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message(resource.plural());

    let mut count = 0usize;
    for record in listing {
        store.write_record(resource, &record)?;
        count += 1;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(count)
}
