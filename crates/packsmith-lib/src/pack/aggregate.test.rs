use super::*;
use crate::api::{PackageVersion, StaticPackageProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const MOD_ID: &str = "sonic.heroes.tweaks";

fn identity() -> ModIdentity {
    ModIdentity::new(MOD_ID, "Heroes Tweaks")
}

fn images(uris: &[&str]) -> Option<Vec<DownloadableImage>> {
    Some(uris.iter().map(|uri| DownloadableImage::new(*uri)).collect())
}

fn candidate(
    version: Option<&str>,
    image_uris: Option<&[&str]>,
    readme: Option<&str>,
    description: Option<&str>,
) -> PackageCandidate {
    PackageCandidate {
        version: version.and_then(PackageVersion::parse_lenient),
        images: image_uris.and_then(images),
        markdown_readme: readme.map(str::to_string),
        description: description.map(str::to_string),
    }
}

fn static_provider(name: &str, candidates: Vec<PackageCandidate>) -> Arc<dyn PackageProvider> {
    Arc::new(StaticPackageProvider::new(name).with_candidates(MOD_ID, candidates))
}

/// Counts calls, returns nothing
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl PackageProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn search_for_mod(
        &self,
        _identity: &ModIdentity,
        _options: &SearchOptions,
        _cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Never answers; only cancellation can get past it
struct HangingProvider;

#[async_trait]
impl PackageProvider for HangingProvider {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn search_for_mod(
        &self,
        _identity: &ModIdentity,
        _options: &SearchOptions,
        _cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError> {
        std::future::pending().await
    }
}

async fn run(providers: &[Arc<dyn PackageProvider>]) -> Result<AggregatedResult, AggregateError> {
    aggregate(
        &identity(),
        providers,
        &SearchOptions::default(),
        &CancellationToken::new(),
    )
    .await
}

// ============================================================================
// Merge rules
// ============================================================================

#[test]
fn test_merge_of_nothing_is_empty() {
    let result = merge_candidates(&[]);
    assert!(result.is_empty());
    assert_eq!(result, AggregatedResult::default());
}

#[test]
fn test_higher_version_with_gallery_wins() {
    let candidates = vec![
        candidate(Some("1.0"), Some(&["img1"]), Some("A"), None),
        candidate(Some("2.0"), Some(&["img2", "img3"]), Some("B"), None),
    ];

    let group = highest_version_group(&candidates);
    assert_eq!(group.len(), 1);
    assert_eq!(group[0].markdown_readme.as_deref(), Some("B"));

    let result = merge_candidates(&candidates);
    assert_eq!(result.images, images(&["img2", "img3"]));
    assert_eq!(result.markdown_readme.as_deref(), Some("B"));
}

#[test]
fn test_thumbnail_only_newest_version_keeps_larger_gallery() {
    let candidates = vec![
        candidate(Some("1.0"), Some(&["a", "b", "c"]), None, None),
        candidate(Some("3.0"), Some(&["thumb"]), None, None),
    ];

    let result = merge_candidates(&candidates);
    assert_eq!(result.images, images(&["a", "b", "c"]));
}

#[test]
fn test_newest_version_gallery_overrides_larger_older_gallery() {
    let candidates = vec![
        candidate(Some("1.0"), Some(&["a", "b", "c", "d"]), None, None),
        candidate(Some("2.0"), Some(&["x", "y"]), None, None),
    ];

    let result = merge_candidates(&candidates);
    assert_eq!(result.images, images(&["x", "y"]));
}

#[test]
fn test_general_pass_prefers_strictly_more_images() {
    let candidates = vec![
        candidate(None, Some(&["a"]), None, None),
        candidate(None, Some(&["b"]), None, None),
        candidate(None, Some(&["c", "d"]), None, None),
        candidate(None, Some(&["e", "f"]), None, None),
        candidate(None, None, None, None),
    ];

    let result = merge_candidates(&candidates);
    assert_eq!(result.images, images(&["c", "d"]));
}

#[test]
fn test_empty_image_list_counts_as_known() {
    let candidates = vec![candidate(None, Some(&[]), None, None)];
    let result = merge_candidates(&candidates);
    assert_eq!(result.images, Some(Vec::new()));
}

#[test]
fn test_image_count_never_regresses_without_version_override() {
    let sizes = [2usize, 0, 5, 1, 5, 3, 7, 0];
    let mut current: Option<Vec<DownloadableImage>> = None;

    for size in sizes {
        let offered: Vec<DownloadableImage> = (0..size)
            .map(|i| DownloadableImage::new(format!("img-{size}-{i}")))
            .collect();
        let before = current.as_ref().map_or(0, Vec::len);
        if adopt_images(current.as_deref(), &offered) {
            current = Some(offered);
        }
        let after = current.as_ref().map_or(0, Vec::len);
        assert!(after >= before, "regressed from {before} to {after}");
    }
}

#[test]
fn test_readme_and_summary_first_non_empty_in_general_pass() {
    let candidates = vec![
        candidate(None, None, Some(""), Some("")),
        candidate(None, None, Some("first readme"), Some("first summary")),
        candidate(None, None, Some("second readme"), Some("second summary")),
    ];

    let result = merge_candidates(&candidates);
    assert_eq!(result.markdown_readme.as_deref(), Some("first readme"));
    assert_eq!(result.summary.as_deref(), Some("first summary"));
}

#[test]
fn test_single_version_group_last_writer_wins() {
    let candidates = vec![
        candidate(Some("1.5"), None, Some("one"), Some("s-one")),
        candidate(None, None, Some("unversioned"), Some("s-unversioned")),
        candidate(Some("1.5.0"), None, Some("two"), Some("s-two")),
        candidate(Some("1.5"), None, None, Some("s-three")),
    ];

    let group = highest_version_group(&candidates);
    assert_eq!(group.len(), 3);

    let result = merge_candidates(&candidates);
    assert_eq!(result.markdown_readme.as_deref(), Some("two"));
    assert_eq!(result.summary.as_deref(), Some("s-three"));
}

#[test]
fn test_group_resets_on_strictly_greater_version() {
    let candidates = vec![
        candidate(Some("1.0"), None, Some("old"), None),
        candidate(Some("1.0"), None, Some("old too"), None),
        candidate(Some("1.1-beta"), None, Some("beta"), None),
        candidate(Some("1.1"), None, Some("new"), None),
    ];

    let group = highest_version_group(&candidates);
    assert_eq!(group.len(), 1);
    assert_eq!(merge_candidates(&candidates).markdown_readme.as_deref(), Some("new"));
}

#[test]
fn test_no_versions_means_no_group() {
    let candidates = vec![candidate(None, Some(&["a", "b"]), Some("r"), Some("s"))];
    assert!(highest_version_group(&candidates).is_empty());
}

// ============================================================================
// Provider orchestration
// ============================================================================

#[tokio::test]
async fn test_no_providers_yields_empty_result() {
    let result = run(&[]).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_providers_with_no_candidates_yield_empty_result() {
    let providers = vec![
        static_provider("first", vec![]),
        Arc::new(StaticPackageProvider::new("unrelated")) as Arc<dyn PackageProvider>,
    ];
    assert!(run(&providers).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scenario_two_providers() {
    let providers = vec![
        static_provider(
            "a",
            vec![candidate(Some("1.0"), Some(&["img1"]), Some("A"), None)],
        ),
        static_provider(
            "b",
            vec![candidate(Some("2.0"), Some(&["img2", "img3"]), Some("B"), None)],
        ),
    ];

    let result = run(&providers).await.unwrap();
    assert_eq!(result.images, images(&["img2", "img3"]));
    assert_eq!(result.markdown_readme.as_deref(), Some("B"));
}

#[tokio::test]
async fn test_all_providers_failing_is_not_an_error() {
    let providers: Vec<Arc<dyn PackageProvider>> = vec![
        Arc::new(StaticPackageProvider::new("a").with_failure(MOD_ID, "timeout")),
        Arc::new(StaticPackageProvider::new("b").with_failure(MOD_ID, "500")),
    ];

    let result = run(&providers).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_failing_provider_does_not_hide_later_ones() {
    let providers: Vec<Arc<dyn PackageProvider>> = vec![
        Arc::new(StaticPackageProvider::new("a").with_failure(MOD_ID, "boom")),
        static_provider("b", vec![candidate(None, None, None, Some("from b"))]),
    ];

    let result = run(&providers).await.unwrap();
    assert_eq!(result.summary.as_deref(), Some("from b"));
}

#[tokio::test]
async fn test_cancelled_before_any_provider_call() {
    let counting = Arc::new(CountingProvider::default());
    let providers: Vec<Arc<dyn PackageProvider>> = vec![counting.clone()];
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = aggregate(&identity(), &providers, &SearchOptions::default(), &cancel).await;

    assert_eq!(result, Err(AggregateError::Cancelled));
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_during_search_stops_remaining_providers() {
    let counting = Arc::new(CountingProvider::default());
    let providers: Vec<Arc<dyn PackageProvider>> = vec![
        static_provider("fast", vec![candidate(None, None, Some("partial"), None)]),
        Arc::new(HangingProvider),
        counting.clone(),
    ];
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        aggregate(&identity(), &providers, &SearchOptions::default(), &cancel),
    )
    .await
    .expect("cancellation should interrupt the hanging provider");

    assert_eq!(result, Err(AggregateError::Cancelled));
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}
