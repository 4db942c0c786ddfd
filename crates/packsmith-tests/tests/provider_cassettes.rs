//! Provider behaviour against recorded responses

use anyhow::Result;
use packsmith_lib::api::gamebanana::SearchResults;
use packsmith_lib::api::nuget::{SearchResponse, hit_to_candidates};
use packsmith_lib::api::{
    GameBananaProvider, ModIdentity, NuGetProvider, PackageProvider, PackageVersion,
    SearchOptions,
};
use packsmith_lib::networking::{NetworkingConfig, NetworkingManager};
use packsmith_lib::pack::{aggregate, merge_candidates};
use packsmith_tests::{load_vcr_response, mount_cassette};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn hooks() -> ModIdentity {
    ModIdentity::new("reloaded.sharedlib.hooks", "Shared Hooks")
}

#[test]
fn nuget_cassette_expands_versions() -> Result<()> {
    let response: SearchResponse = load_vcr_response("nuget/search_hooks.json")?;
    assert_eq!(response.total_hits, 2);

    let hit = &response.data[0];
    let all = hit_to_candidates(hit, false);
    let versions: Vec<String> = all
        .iter()
        .filter_map(|c| c.version.as_ref().map(|v| v.to_string()))
        .collect();
    assert_eq!(versions, vec!["1.0.0", "1.1.0", "1.2.0"]);

    let best = hit_to_candidates(hit, true);
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].version, Some(PackageVersion::new(1, 2, 0)));
    Ok(())
}

#[test]
fn gamebanana_cassette_decodes_descriptions() -> Result<()> {
    let results: SearchResults = load_vcr_response("gamebanana/search_hooks.json")?;
    let candidate = results.records[0].to_candidate();

    assert_eq!(
        candidate.description.as_deref(),
        Some("Hooks & detours for Reloaded-II")
    );
    assert_eq!(candidate.images.as_ref().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn providers_filter_to_exact_matches() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "nuget/service_index.json").await?;
    mount_cassette(&mut server, "nuget/search_hooks.json").await?;
    mount_cassette(&mut server, "gamebanana/search_hooks.json").await?;

    let networking = NetworkingManager::new(NetworkingConfig::default())?;
    let nuget = NuGetProvider::new(
        networking.clone(),
        vec![format!("{}/v3/index.json", server.url())],
    );
    let gamebanana = GameBananaProvider::with_base_url(networking, server.url(), None);
    let cancel = CancellationToken::new();
    let options = SearchOptions::default();

    let from_nuget = nuget.search_for_mod(&hooks(), &options, &cancel).await?;
    assert_eq!(from_nuget.len(), 1);

    let from_gamebanana = gamebanana.search_for_mod(&hooks(), &options, &cancel).await?;
    assert_eq!(from_gamebanana.len(), 1);
    assert_eq!(from_gamebanana[0].version, Some(PackageVersion::new(1, 3, 0)));

    let merged = merge_candidates(&[from_nuget, from_gamebanana].concat());
    assert_eq!(merged.images.as_ref().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn aggregate_survives_a_broken_feed() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    mount_cassette(&mut server, "gamebanana/search_hooks.json").await?;
    server
        .mock("GET", "/v3/index.json")
        .with_status(503)
        .create_async()
        .await;

    let networking = NetworkingManager::new(NetworkingConfig::default())?;
    let providers: Vec<Arc<dyn PackageProvider>> = vec![
        Arc::new(NuGetProvider::new(
            networking.clone(),
            vec![format!("{}/v3/index.json", server.url())],
        )),
        Arc::new(GameBananaProvider::with_base_url(networking, server.url(), None)),
    ];

    let result = aggregate(
        &hooks(),
        &providers,
        &SearchOptions::default(),
        &CancellationToken::new(),
    )
    .await?;

    assert_eq!(
        result.summary.as_deref(),
        Some("Hooks & detours for Reloaded-II")
    );
    assert_eq!(result.images.map(|images| images.len()), Some(2));
    Ok(())
}
