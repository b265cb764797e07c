//! Sequential, budgeted fetching of external sources.

use serde::Serialize;

use crate::client::SourceClient;
use crate::normalize::normalize_source_url;

/// Maximum characters kept from a single source before the truncation marker.
pub const MAX_SOURCE_CHARS: usize = 20_000;

/// Maximum characters of source content kept across one fetch run.
pub const MAX_TOTAL_CHARS: usize = 60_000;

/// Appended to content that was cut short.
pub const TRUNCATION_MARKER: &str = "\n\n[Truncated]";

/// Character budgets applied while fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Per-source cap (characters, before the truncation marker)
    pub per_source: usize,

    /// Aggregate cap across all fetched sources (characters)
    pub total: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            per_source: MAX_SOURCE_CHARS,
            total: MAX_TOTAL_CHARS,
        }
    }
}

/// A source that was retrieved successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSource {
    /// URL as the user supplied it
    pub raw_url: String,

    /// URL that was actually requested
    pub normalized_url: String,

    /// Clamped text content
    pub content: String,
}

impl FetchedSource {
    /// Number of characters stored for this source.
    pub fn chars(&self) -> usize {
        self.content.chars().count()
    }
}

/// A source that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// URL as the user supplied it
    pub raw_url: String,

    /// Human-readable reason
    pub error: String,
}

/// Outcome of one fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFetchResult {
    pub fetched: Vec<FetchedSource>,
    pub failed: Vec<FetchFailure>,
    pub combined_context: String,
}

impl SourceFetchResult {
    /// Per-source summary for user-facing reporting.
    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            fetched: self
                .fetched
                .iter()
                .map(|s| FetchedEntry {
                    url: s.raw_url.clone(),
                    chars: s.chars(),
                })
                .collect(),
            failed: self
                .failed
                .iter()
                .map(|f| FailedEntry {
                    url: f.raw_url.clone(),
                    error: f.error.clone(),
                })
                .collect(),
        }
    }

    /// Total characters of fetched content (headers excluded).
    pub fn total_chars(&self) -> usize {
        self.fetched.iter().map(FetchedSource::chars).sum()
    }
}

/// Serializable report of which sources were used and which failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub fetched: Vec<FetchedEntry>,
    pub failed: Vec<FailedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedEntry {
    pub url: String,
    pub chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub url: String,
    pub error: String,
}

/// Split a comma or newline separated list of URLs, dropping blank entries.
pub fn parse_source_list(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep at most `max_chars` characters, appending the truncation marker if anything was cut.
pub fn clamp_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Cut `text` to exactly `budget` characters, keeping the marker inside the budget when it fits.
fn fill_budget(text: &str, budget: usize) -> String {
    let marker_chars = TRUNCATION_MARKER.chars().count();
    if budget >= marker_chars {
        let mut out = take_chars(text, budget - marker_chars);
        out.push_str(TRUNCATION_MARKER);
        out
    } else {
        take_chars(text, budget)
    }
}

fn take_chars(text: &str, n: usize) -> String {
    match text.char_indices().nth(n) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

fn combine(fetched: &[FetchedSource]) -> String {
    fetched
        .iter()
        .map(|s| format!("[External Source] {}\n\n{}", s.raw_url, s.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetches sources in input order under per-source and aggregate budgets.
pub struct SourceFetcher<C> {
    client: C,
    limits: FetchLimits,
}

impl<C: SourceClient> SourceFetcher<C> {
    /// Create a fetcher with the default limits.
    pub fn new(client: C) -> Self {
        Self {
            client,
            limits: FetchLimits::default(),
        }
    }

    /// Override the character budgets.
    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Fetch every source in `sources_input`.
    ///
    /// Failures are recorded and skipped. Once the aggregate budget is filled
    /// the run stops; later sources are neither fetched nor reported.
    pub async fn fetch_all(&self, sources_input: Option<&str>) -> SourceFetchResult {
        let sources = sources_input.map(parse_source_list).unwrap_or_default();
        if sources.is_empty() {
            return SourceFetchResult::default();
        }

        let mut fetched = Vec::new();
        let mut failed = Vec::new();
        let mut total = 0usize;

        for raw_url in sources {
            let normalized_url = normalize_source_url(&raw_url);
            if normalized_url != raw_url {
                tracing::debug!(url = %raw_url, normalized = %normalized_url, "Normalized source URL");
            }

            let text = match self.client.get_text(&normalized_url).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(url = %raw_url, error = %e, "Failed to fetch source");
                    failed.push(FetchFailure {
                        raw_url,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let clamped = clamp_text(&text, self.limits.per_source);
            let len = clamped.chars().count();
            let remaining = self.limits.total.saturating_sub(total);

            if len >= remaining {
                let content = if len > remaining {
                    fill_budget(&clamped, remaining)
                } else {
                    clamped
                };

                tracing::info!(
                    url = %raw_url,
                    chars = remaining,
                    "Source budget filled, skipping remaining sources"
                );

                fetched.push(FetchedSource {
                    raw_url,
                    normalized_url,
                    content,
                });
                break;
            }

            tracing::debug!(url = %raw_url, chars = len, "Fetched source");
            total += len;
            fetched.push(FetchedSource {
                raw_url,
                normalized_url,
                content: clamped,
            });
        }

        let combined_context = combine(&fetched);

        SourceFetchResult {
            fetched,
            failed,
            combined_context,
        }
    }
}
