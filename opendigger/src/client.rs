use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use timeseries::{ActivityHeatmap, MetricSeries};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::metric::Metric;
use crate::payload::{self, ProjectMeta};
use crate::project::ProjectRef;
use crate::retry::RetryPolicy;

const ACTIVE_DATES_FILE: &str = "active_dates_and_times.json";
const META_FILE: &str = "meta.json";

/// The three core series loaded together for a project overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub openrank: MetricSeries,
    pub activity: MetricSeries,
    pub participants: MetricSeries,
    /// Core metrics that failed to load and were left empty.
    pub failed: Vec<Metric>,
}

pub type ProjectCache = TtlCache<ProjectRef, ProjectMetrics>;

/// Fetches metric files from an OpenDigger static host.
#[derive(Clone)]
pub struct OpenDiggerClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
    cache: Arc<ProjectCache>,
}

impl OpenDiggerClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let cache = Arc::new(TtlCache::new(config.cache_ttl()));
        Self::with_cache(config, cache)
    }

    /// Builds a client around an existing cache, so several clients (or a
    /// test) can share and inspect it.
    pub fn with_cache(config: &ClientConfig, cache: Arc<ProjectCache>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            retry: config.retry_policy(),
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<ProjectCache> {
        &self.cache
    }

    fn metric_url(&self, project: &ProjectRef, file: &str) -> String {
        format!("{}/{}/{file}", self.base_url, project.path())
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let http = &self.http;
        self.retry
            .run(move || async move {
                debug!("GET {url}");
                let response = http
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| FetchError::from_reqwest(url, e))?;
                response
                    .json::<Value>()
                    .await
                    .map_err(|e| FetchError::from_reqwest(url, e))
            })
            .await
    }

    pub async fn fetch_metric(
        &self,
        project: &ProjectRef,
        metric: Metric,
    ) -> Result<MetricSeries, FetchError> {
        let url = self.metric_url(project, &metric.file_name());
        let body = self.get_json(&url).await?;
        payload::decode_metric(metric, &url, body)
    }

    /// Fetches several metrics concurrently. A metric that fails is logged and
    /// comes back as an empty series.
    pub async fn fetch_metrics(
        &self,
        project: &ProjectRef,
        metrics: &[Metric],
    ) -> BTreeMap<Metric, MetricSeries> {
        let results = join_all(metrics.iter().map(|&m| self.fetch_metric(project, m))).await;

        metrics
            .iter()
            .zip(results)
            .map(|(&metric, result)| {
                let series = result.unwrap_or_else(|e| {
                    warn!("failed to fetch {metric} for {project}: {e}");
                    MetricSeries::new()
                });
                (metric, series)
            })
            .collect()
    }

    pub async fn fetch_active_dates(
        &self,
        project: &ProjectRef,
    ) -> Result<ActivityHeatmap, FetchError> {
        let url = self.metric_url(project, ACTIVE_DATES_FILE);
        let body = self.get_json(&url).await?;
        payload::decode_heatmap(&url, body)
    }

    pub async fn fetch_meta(&self, project: &ProjectRef) -> Result<ProjectMeta, FetchError> {
        let url = self.metric_url(project, META_FILE);
        let body = self.get_json(&url).await?;
        payload::decode_meta(&url, body)
    }

    /// Loads the core metrics for `project`, served from cache while fresh.
    ///
    /// Individual failures leave an empty series and are listed in
    /// `failed`; only when all of them fail is an error returned (and
    /// nothing cached).
    pub async fn fetch_project(&self, project: &ProjectRef) -> Result<ProjectMetrics, FetchError> {
        self.cache
            .get_or_try_insert_with(project.clone(), || self.load_project(project))
            .await
    }

    async fn load_project(&self, project: &ProjectRef) -> Result<ProjectMetrics, FetchError> {
        let (openrank, activity, participants) = tokio::join!(
            self.fetch_metric(project, Metric::Openrank),
            self.fetch_metric(project, Metric::Activity),
            self.fetch_metric(project, Metric::Participants),
        );

        let mut failed = Vec::new();
        let mut settle = |metric: Metric, result: Result<MetricSeries, FetchError>| {
            result.unwrap_or_else(|e| {
                warn!("failed to fetch {metric} for {project}: {e}");
                failed.push(metric);
                MetricSeries::new()
            })
        };
        let openrank = settle(Metric::Openrank, openrank);
        let activity = settle(Metric::Activity, activity);
        let participants = settle(Metric::Participants, participants);
        let metrics = ProjectMetrics {
            openrank,
            activity,
            participants,
            failed,
        };

        if metrics.failed.len() == Metric::CORE.len() {
            return Err(FetchError::AllFailed {
                project: project.full_name(),
            });
        }

        info!(
            "loaded {project}: {} openrank, {} activity, {} participants periods",
            metrics.openrank.len(),
            metrics.activity.len(),
            metrics.participants.len()
        );
        Ok(metrics)
    }
}
