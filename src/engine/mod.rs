//! Export engine module
//!
//! Fetches each requested collection (falling back to alternate endpoints
//! where configured), flattens and projects the items, and writes the
//! resulting tables.

mod types;

pub use types::{Collection, ExportOptions, ExportStats, FetchedCollection};

use crate::config::{ExportConfig, FallbackSettings};
use crate::error::Result;
use crate::flatten::flatten_all;
use crate::http::{ReqwestTransport, RetryingFetcher, Sleeper, TokioSleeper};
use crate::output::CsvWriter;
use crate::pagination::{CursorPaginator, PaginatorConfig, SweepRequest};
use crate::project::{project, Table};
use crate::types::JsonValue;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrates a whole export run
#[derive(Debug)]
pub struct Exporter {
    paginator: CursorPaginator,
    writer: CsvWriter,
    fallbacks: FallbackSettings,
    stats: ExportStats,
}

impl Exporter {
    /// Create an exporter from its parts
    pub fn new(paginator: CursorPaginator, writer: CsvWriter, fallbacks: FallbackSettings) -> Self {
        Self {
            paginator,
            writer,
            fallbacks,
            stats: ExportStats::default(),
        }
    }

    /// Build an exporter that really sleeps between attempts and pages
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        Self::from_config_with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Build an exporter with an explicit sleeper
    pub fn from_config_with_sleeper(
        config: &ExportConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        let fetcher_config = config.fetcher_config();
        let transport = ReqwestTransport::new(&fetcher_config.user_agent)?;
        let fetcher = RetryingFetcher::with_parts(fetcher_config, Arc::new(transport), sleeper);
        let paginator = CursorPaginator::new(
            fetcher,
            PaginatorConfig {
                base_url: config.base_url.clone(),
                page_delay: config.page_delay(),
                client: config.client.clone(),
            },
        );
        Ok(Self::new(
            paginator,
            CsvWriter::new(&config.output_dir),
            config.fallbacks.clone(),
        ))
    }

    /// Get statistics
    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    /// Get the writer
    pub fn writer(&self) -> &CsvWriter {
        &self.writer
    }

    /// Fetch every item of a collection.
    ///
    /// The primary endpoint is tried first. If it fails and the collection
    /// has fallbacks, they are tried in order and the first non-empty
    /// result wins; if none yields items the collection is empty. Without
    /// fallbacks the primary failure is returned. A primary that succeeds
    /// with no items is final.
    pub async fn fetch_collection(
        &mut self,
        collection: Collection,
        options: &ExportOptions,
    ) -> Result<FetchedCollection> {
        let sweep = SweepRequest::new(&options.user_id, collection.endpoint())
            .token(options.token.clone())
            .per_page(options.per_page)
            .country(&options.country);

        info!("Fetching {collection} ({})...", collection.endpoint());
        let primary_error = match self.paginator.paginate(&sweep).await {
            Ok(items) => {
                return Ok(FetchedCollection {
                    collection,
                    endpoint: Some(collection.endpoint().to_string()),
                    items,
                })
            }
            Err(e) => e,
        };

        let fallbacks = collection.fallbacks(&self.fallbacks).to_vec();
        if fallbacks.is_empty() {
            return Err(primary_error);
        }
        warn!("Failed to fetch {collection} (will try fallbacks): {primary_error}");

        for endpoint in fallbacks {
            self.stats.add_fallback();
            info!("Trying fallback endpoint: {endpoint}");
            match self.paginator.paginate(&sweep.with_endpoint(&endpoint)).await {
                Ok(items) if !items.is_empty() => {
                    info!("Found results on endpoint: {endpoint}");
                    return Ok(FetchedCollection {
                        collection,
                        endpoint: Some(endpoint),
                        items,
                    });
                }
                Ok(_) => debug!("Fallback {endpoint} returned no items"),
                Err(e) => debug!("Fallback {endpoint} error: {e}"),
            }
        }

        warn!("No endpoint produced {collection}; exporting an empty collection");
        Ok(FetchedCollection {
            collection,
            endpoint: None,
            items: Vec::new(),
        })
    }

    /// Turn fetched items into `(file stem, table)` pairs to write
    pub fn tabulate(
        collection: Collection,
        items: &[JsonValue],
        options: &ExportOptions,
    ) -> Vec<(String, Table)> {
        let stem = collection.file_stem(&options.user_id);
        let rows = flatten_all(items);
        let projection = project(&rows, &collection.schema(), options.letterboxd);

        let mut tables = vec![(stem.clone(), projection.primary)];
        if let Some(secondary) = projection.secondary {
            tables.push((format!("{stem}_letterboxd"), secondary));
        }
        if options.raw {
            tables.push((format!("{stem}_raw"), Table::from_rows(&rows)));
        }
        tables
    }

    /// Fetch, project and write one collection
    pub async fn export_collection(
        &mut self,
        collection: Collection,
        options: &ExportOptions,
    ) -> Result<FetchedCollection> {
        let fetched = self.fetch_collection(collection, options).await?;
        info!("Got {} {collection} items.", fetched.items.len());
        self.stats.add_items(fetched.items.len());

        for (stem, table) in Self::tabulate(collection, &fetched.items, options) {
            if let Some(path) = self.writer.write(&stem, &table)? {
                self.stats.add_file(path);
            }
        }
        self.stats.add_collection();
        Ok(fetched)
    }

    /// Export collections in order, stopping at the first failure
    pub async fn export(
        &mut self,
        collections: &[Collection],
        options: &ExportOptions,
    ) -> Result<ExportStats> {
        let start = Instant::now();
        for collection in collections {
            self.export_collection(*collection, options).await?;
        }
        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Done: {} collections, {} items, {} files in {}ms",
            self.stats.collections_exported,
            self.stats.items_fetched,
            self.stats.files_written.len(),
            self.stats.duration_ms
        );
        Ok(self.stats.clone())
    }
}
