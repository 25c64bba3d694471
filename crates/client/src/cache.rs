//! Client-side entity cache.
//!
//! Each collection the UI shows is cached as one snapshot. Concurrent reads
//! of a missing entry share a single fetch. The financial summary expires
//! shortly after it was fetched; collections stay until a mutation
//! invalidates them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ClientError;
use fintools_shared::resources::{
    AssetResource, ExpenseResource, FinancialSummary, FounderContribution, ProductResource,
    RevenueResource, TransactionResource,
};

/// Default lifetime of a cached summary.
pub const DEFAULT_SUMMARY_TTL: Duration = Duration::from_secs(5);

const MAX_ENTRIES: u64 = 32;

/// A cacheable server collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `GET /expenses`
    Expenses,
    /// `GET /revenues`
    Revenues,
    /// `GET /assets`
    Assets,
    /// `GET /products`
    Products,
    /// `GET /transactions`
    Transactions,
    /// `GET /dashboard/summary`
    Summary,
    /// `GET /dashboard/founder-contributions`
    FounderContributions,
}

impl Resource {
    /// Every resource, in display order.
    pub const ALL: [Self; 7] = [
        Self::Expenses,
        Self::Revenues,
        Self::Assets,
        Self::Products,
        Self::Transactions,
        Self::Summary,
        Self::FounderContributions,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Cached contents of one [`Resource`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Snapshot {
    Expenses(Vec<ExpenseResource>),
    Revenues(Vec<RevenueResource>),
    Assets(Vec<AssetResource>),
    Products(Vec<ProductResource>),
    Transactions(Vec<TransactionResource>),
    Summary(FinancialSummary),
    FounderContributions(Vec<FounderContribution>),
}

/// A write whose effects the cache must forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Expense created, updated or deleted. May spawn or remove products.
    Expense,
    /// Revenue created, updated, deleted or verified.
    Revenue,
    /// Asset created, updated, revalued or deleted.
    Asset,
    /// Product created, updated or deleted. Deletion may reset an expense flag.
    Product,
    /// A product was sold, booking a revenue.
    ProductSale,
    /// A product was created from an expense.
    ProductFromExpense,
    /// Transaction written. May create or refresh an asset.
    Transaction,
    /// A founder's contribution changed.
    Contribution,
}

impl Mutation {
    /// Resources whose cached snapshots become stale.
    #[must_use]
    pub const fn affects(self) -> &'static [Resource] {
        use Resource::{
            Assets, Expenses, FounderContributions, Products, Revenues, Summary, Transactions,
        };
        match self {
            Self::Expense => &[Expenses, Products, Summary],
            Self::Revenue => &[Revenues, Summary],
            Self::Asset => &[Assets, Summary],
            Self::Product | Self::ProductFromExpense => &[Products, Expenses],
            Self::ProductSale => &[Products, Revenues, Summary],
            Self::Transaction => &[Transactions, Assets, Summary],
            Self::Contribution => &[FounderContributions, Summary],
        }
    }
}

/// Loads a resource from the server.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches the current contents of `resource`.
    async fn fetch(&self, resource: Resource) -> Result<Snapshot, ClientError>;
}

#[async_trait]
impl Fetcher for ApiClient {
    async fn fetch(&self, resource: Resource) -> Result<Snapshot, ClientError> {
        Ok(match resource {
            Resource::Expenses => Snapshot::Expenses(self.expenses().await?),
            Resource::Revenues => Snapshot::Revenues(self.revenues().await?),
            Resource::Assets => Snapshot::Assets(self.assets().await?),
            Resource::Products => Snapshot::Products(self.products().await?),
            Resource::Transactions => Snapshot::Transactions(self.transactions().await?),
            Resource::Summary => Snapshot::Summary(self.summary().await?),
            Resource::FounderContributions => {
                Snapshot::FounderContributions(self.founder_contributions().await?)
            }
        })
    }
}

/// A snapshot tagged with the invalidation generation its fetch started in.
#[derive(Clone)]
struct Entry {
    generation: u64,
    snapshot: Arc<Snapshot>,
}

/// Only the summary expires on its own.
struct SummaryThrottle {
    ttl: Duration,
}

impl Expiry<Resource, Entry> for SummaryThrottle {
    fn expire_after_create(
        &self,
        key: &Resource,
        _value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        (*key == Resource::Summary).then_some(self.ttl)
    }
}

/// Fetch-or-cached access to server collections.
pub struct EntityCache<F: Fetcher> {
    fetcher: Arc<F>,
    cache: Cache<Resource, Entry>,
    /// Bumped on every invalidation, per resource.
    generations: Arc<[AtomicU64; Resource::ALL.len()]>,
}

impl<F: Fetcher> Clone for EntityCache<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            cache: self.cache.clone(),
            generations: Arc::clone(&self.generations),
        }
    }
}

impl<F: Fetcher> std::fmt::Debug for EntityCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl<F: Fetcher> EntityCache<F> {
    /// Creates a cache with the default summary lifetime.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self::with_summary_ttl(fetcher, DEFAULT_SUMMARY_TTL)
    }

    /// Creates a cache whose summary expires after `ttl`.
    #[must_use]
    pub fn with_summary_ttl(fetcher: F, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .expire_after(SummaryThrottle { ttl })
            .build();

        Self {
            fetcher: Arc::new(fetcher),
            cache,
            generations: Arc::new(std::array::from_fn(|_| AtomicU64::new(0))),
        }
    }

    /// Returns the cached snapshot, fetching it when absent or expired.
    ///
    /// Concurrent callers for the same resource wait on one fetch. A failed
    /// fetch is not cached. A snapshot whose fetch overlapped an invalidation
    /// of the same resource is discarded and fetched again.
    pub async fn get(&self, resource: Resource) -> Result<Arc<Snapshot>, Arc<ClientError>> {
        loop {
            let generation = self.generation(resource);
            let fetcher = Arc::clone(&self.fetcher);
            let entry = self
                .cache
                .try_get_with(resource, async move {
                    debug!(?resource, "Fetching resource");
                    let snapshot = fetcher.fetch(resource).await?;
                    Ok::<_, ClientError>(Entry {
                        generation,
                        snapshot: Arc::new(snapshot),
                    })
                })
                .await?;

            if entry.generation == self.generation(resource) {
                return Ok(entry.snapshot);
            }
            debug!(?resource, "Discarding snapshot fetched across an invalidation");
            self.cache.invalidate(&resource).await;
        }
    }

    fn generation(&self, resource: Resource) -> u64 {
        self.generations[resource.slot()].load(Ordering::Acquire)
    }

    fn bump(&self, resource: Resource) {
        self.generations[resource.slot()].fetch_add(1, Ordering::AcqRel);
    }

    /// The cached snapshot, without fetching.
    pub async fn peek(&self, resource: Resource) -> Option<Arc<Snapshot>> {
        self.cache.get(&resource).await.map(|entry| entry.snapshot)
    }

    /// Drops one resource.
    pub async fn invalidate(&self, resource: Resource) {
        self.bump(resource);
        self.cache.invalidate(&resource).await;
    }

    /// Drops everything, e.g. on logout.
    pub fn invalidate_all(&self) {
        for resource in Resource::ALL {
            self.bump(resource);
        }
        self.cache.invalidate_all();
    }

    /// Drops a resource and fetches it again.
    pub async fn refresh(&self, resource: Resource) -> Result<Arc<Snapshot>, Arc<ClientError>> {
        self.invalidate(resource).await;
        self.get(resource).await
    }

    /// Applies a local edit to a cached snapshot ahead of the server.
    ///
    /// Returns false when the resource is not cached. A patched summary
    /// keeps its original expiry.
    pub async fn patch<P>(&self, resource: Resource, edit: P) -> bool
    where
        P: FnOnce(&mut Snapshot),
    {
        let Some(current) = self.cache.get(&resource).await else {
            return false;
        };
        let mut next = (*current.snapshot).clone();
        edit(&mut next);
        let entry = Entry {
            generation: current.generation,
            snapshot: Arc::new(next),
        };
        self.cache.insert(resource, entry).await;
        true
    }

    /// Forgets every resource a completed write may have changed.
    pub async fn after_mutation(&self, mutation: Mutation) {
        for resource in mutation.affects() {
            self.invalidate(*resource).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use rust_decimal_macros::dec;

    /// Serves empty collections and a summary whose profit counts the fetches.
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    impl CountingFetcher {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for Arc<CountingFetcher> {
        async fn fetch(&self, resource: Resource) -> Result<Snapshot, ClientError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let delay = self.delay.unwrap_or(Duration::from_millis(20));
            tokio::time::sleep(delay).await;
            if self.fail {
                return Err(ClientError::Server {
                    status: 500,
                    message: "Server Error".into(),
                });
            }
            Ok(match resource {
                Resource::Summary => Snapshot::Summary(FinancialSummary {
                    pure_profit: call.into(),
                    ..FinancialSummary::default()
                }),
                Resource::Expenses => Snapshot::Expenses(Vec::new()),
                Resource::Revenues => Snapshot::Revenues(Vec::new()),
                Resource::Assets => Snapshot::Assets(Vec::new()),
                Resource::Products => Snapshot::Products(Vec::new()),
                Resource::Transactions => Snapshot::Transactions(Vec::new()),
                Resource::FounderContributions => Snapshot::FounderContributions(Vec::new()),
            })
        }
    }

    fn cache(ttl: Duration) -> (Arc<CountingFetcher>, EntityCache<Arc<CountingFetcher>>) {
        let fetcher = Arc::new(CountingFetcher::default());
        (Arc::clone(&fetcher), EntityCache::with_summary_ttl(fetcher, ttl))
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let (fetcher, cache) = cache(DEFAULT_SUMMARY_TTL);

        let (a, b) = tokio::join!(cache.get(Resource::Expenses), cache.get(Resource::Expenses));
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(fetcher.calls(), 1);

        cache.get(Resource::Expenses).await.unwrap();
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_summary_refetches_after_window() {
        let (fetcher, cache) = cache(Duration::from_millis(100));

        cache.get(Resource::Summary).await.unwrap();
        cache.get(Resource::Summary).await.unwrap();
        assert_eq!(fetcher.calls(), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        cache.get(Resource::Summary).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_collections_do_not_expire() {
        let (fetcher, cache) = cache(Duration::from_millis(50));

        cache.get(Resource::Products).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        cache.get(Resource::Products).await.unwrap();
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_sale_invalidates_products_revenues_and_summary() {
        let (fetcher, cache) = cache(DEFAULT_SUMMARY_TTL);
        for resource in Resource::ALL {
            cache.get(resource).await.unwrap();
        }
        assert_eq!(fetcher.calls(), Resource::ALL.len());

        cache.after_mutation(Mutation::ProductSale).await;

        assert!(cache.peek(Resource::Products).await.is_none());
        assert!(cache.peek(Resource::Revenues).await.is_none());
        assert!(cache.peek(Resource::Summary).await.is_none());
        assert!(cache.peek(Resource::Expenses).await.is_some());
        assert!(cache.peek(Resource::Assets).await.is_some());

        let summary = cache.get(Resource::Summary).await.unwrap();
        assert!(matches!(&*summary, Snapshot::Summary(s) if s.pure_profit == dec!(8)));
    }

    #[tokio::test]
    async fn test_refresh_and_invalidate_all() {
        let (fetcher, cache) = cache(DEFAULT_SUMMARY_TTL);

        cache.get(Resource::Assets).await.unwrap();
        cache.refresh(Resource::Assets).await.unwrap();
        assert_eq!(fetcher.calls(), 2);

        cache.invalidate_all();
        cache.get(Resource::Assets).await.unwrap();
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn test_patch_edits_cached_entry_only() {
        let (fetcher, cache) = cache(DEFAULT_SUMMARY_TTL);

        let edit = |snapshot: &mut Snapshot| {
            if let Snapshot::Summary(summary) = snapshot {
                summary.total_revenue += dec!(2800);
            }
        };
        assert!(!cache.patch(Resource::Summary, edit).await);

        cache.get(Resource::Summary).await.unwrap();
        assert!(cache.patch(Resource::Summary, edit).await);

        let summary = cache.get(Resource::Summary).await.unwrap();
        assert!(matches!(&*summary, Snapshot::Summary(s) if s.total_revenue == dec!(2800)));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let fetcher = Arc::new(CountingFetcher {
            fail: true,
            ..CountingFetcher::default()
        });
        let cache = EntityCache::new(Arc::clone(&fetcher));

        assert!(cache.get(Resource::Revenues).await.is_err());
        assert!(cache.get(Resource::Revenues).await.is_err());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_mutation_during_fetch_forces_refetch() {
        let fetcher = Arc::new(CountingFetcher {
            delay: Some(Duration::from_millis(200)),
            ..CountingFetcher::default()
        });
        let cache = EntityCache::new(Arc::clone(&fetcher));

        let reader = cache.clone();
        let pending = tokio::spawn(async move { reader.get(Resource::Products).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.after_mutation(Mutation::Product).await;

        assert!(pending.await.unwrap().is_ok());
        cache.get(Resource::Products).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_reader_joining_stale_fetch_gets_fresh_snapshot() {
        let fetcher = Arc::new(CountingFetcher {
            delay: Some(Duration::from_millis(200)),
            ..CountingFetcher::default()
        });
        let cache = EntityCache::new(Arc::clone(&fetcher));

        let reader = cache.clone();
        let pending = tokio::spawn(async move { reader.get(Resource::Summary).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.after_mutation(Mutation::Revenue).await;
        let late = cache.get(Resource::Summary).await.unwrap();

        assert!(matches!(&*late, Snapshot::Summary(s) if s.pure_profit >= dec!(2)));
        assert!(pending.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_all_during_fetch_forces_refetch() {
        let fetcher = Arc::new(CountingFetcher {
            delay: Some(Duration::from_millis(150)),
            ..CountingFetcher::default()
        });
        let cache = EntityCache::new(Arc::clone(&fetcher));

        let (first, ()) = tokio::join!(cache.get(Resource::Summary), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            cache.invalidate_all();
        });
        assert!(matches!(&*first.unwrap(), Snapshot::Summary(s) if s.pure_profit == dec!(2)));

        cache.get(Resource::Summary).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn test_every_mutation_touches_its_own_collection() {
        assert!(Mutation::Expense.affects().contains(&Resource::Expenses));
        assert!(Mutation::Transaction.affects().contains(&Resource::Assets));
        assert!(Mutation::Contribution.affects().contains(&Resource::FounderContributions));
        assert!(!Mutation::Revenue.affects().contains(&Resource::Products));
    }
}
