use super::*;
use crate::networking::NetworkingConfig;
use mockito::{Matcher, Server};

const SEARCH_BODY: &str = r#"{
  "totalHits": 2,
  "data": [
    {
      "id": "Reloaded.SharedLib.Hooks",
      "version": "1.9.0",
      "description": "Shared hooking library for mods.",
      "iconUrl": "https://cdn.example.com/hooks.png",
      "versions": [
        { "version": "1.8.0", "downloads": 10 },
        { "version": "1.9.0", "downloads": 20 }
      ]
    },
    {
      "id": "Reloaded.SharedLib.Hooks.Extras",
      "version": "0.1.0",
      "description": "Not the droid you are looking for"
    }
  ]
}"#;

fn networking() -> NetworkingManager {
    NetworkingManager::new(NetworkingConfig::default()).unwrap()
}

fn identity() -> ModIdentity {
    ModIdentity::new("reloaded.sharedlib.hooks", "Shared Hooks")
}

async fn mock_search(server: &mut Server, path: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "reloaded.sharedlib.hooks".into()),
            Matcher::UrlEncoded("take".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEARCH_BODY)
        .create_async()
        .await
}

#[test]
fn test_hit_to_candidates_best_version_only() {
    let response: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
    let candidates = hit_to_candidates(&response.data[0], true);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].version, PackageVersion::parse_lenient("1.9.0"));
    assert_eq!(
        candidates[0].images,
        Some(vec![DownloadableImage::new("https://cdn.example.com/hooks.png")])
    );
    assert_eq!(
        candidates[0].description.as_deref(),
        Some("Shared hooking library for mods.")
    );
    assert_eq!(candidates[0].markdown_readme, None);
}

#[test]
fn test_hit_to_candidates_expands_versions() {
    let response: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();

    let all = hit_to_candidates(&response.data[0], false);
    let versions: Vec<String> = all
        .iter()
        .map(|c| c.version.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(versions, vec!["1.8.0", "1.9.0"]);

    // No listed versions falls back to the hit version; no icon means no image info
    let extras = hit_to_candidates(&response.data[1], false);
    assert_eq!(extras.len(), 1);
    assert_eq!(extras[0].images, None);
}

#[test]
fn test_blank_description_falls_back_to_summary() {
    let hit = SearchHit {
        id: "x".into(),
        version: "1.0".into(),
        title: None,
        description: Some("   ".into()),
        summary: Some("Short summary".into()),
        icon_url: Some(String::new()),
        versions: vec![],
    };

    let candidates = hit_to_candidates(&hit, true);
    assert_eq!(candidates[0].description.as_deref(), Some("Short summary"));
    assert_eq!(candidates[0].images, None);
}

#[tokio::test]
async fn test_search_filters_exact_id() {
    let mut server = Server::new_async().await;
    let mock = mock_search(&mut server, "/query").await;

    let provider = NuGetProvider::new(networking(), vec![format!("{}/query", server.url())]);
    let candidates = provider
        .search_for_mod(&identity(), &SearchOptions::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].version, PackageVersion::parse_lenient("1.9"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_index_resolved_once() {
    let mut server = Server::new_async().await;
    let index_body = format!(
        r#"{{"version": "3.0.0", "resources": [
            {{"@id": "{0}/flat", "@type": "PackageBaseAddress/3.0.0"}},
            {{"@id": "{0}/search", "@type": "SearchQueryService/3.5.0"}}
        ]}}"#,
        server.url()
    );
    let index = server
        .mock("GET", "/v3/index.json")
        .with_status(200)
        .with_body(index_body)
        .expect(1)
        .create_async()
        .await;
    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_BODY)
        .expect(2)
        .create_async()
        .await;

    let provider = NuGetProvider::new(
        networking(),
        vec![format!("{}/v3/index.json", server.url())],
    );
    for _ in 0..2 {
        let found = provider
            .search_for_mod(&identity(), &SearchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    index.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn test_failed_feed_is_tolerated_when_another_succeeds() {
    let mut server = Server::new_async().await;
    let _broken = server
        .mock("GET", "/broken")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let _good = mock_search(&mut server, "/query").await;

    let provider = NuGetProvider::new(
        networking(),
        vec![
            format!("{}/broken", server.url()),
            format!("{}/query", server.url()),
        ],
    );
    let found = provider
        .search_for_mod(&identity(), &SearchOptions::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_all_feeds_failing_is_an_error() {
    let mut server = Server::new_async().await;
    let _broken = server
        .mock("GET", "/broken")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let provider = NuGetProvider::new(networking(), vec![format!("{}/broken", server.url())]);
    let result = provider
        .search_for_mod(&identity(), &SearchOptions::default(), &CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(ProviderError::Network {
            source: NetworkingError::HttpStatus { status: 503, .. }
        })
    ));
}

#[tokio::test]
async fn test_max_providers_limits_feeds() {
    let mut server = Server::new_async().await;
    let first = mock_search(&mut server, "/first").await;
    let second = server
        .mock("GET", "/second")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let provider = NuGetProvider::new(
        networking(),
        vec![
            format!("{}/first", server.url()),
            format!("{}/second", server.url()),
        ],
    );
    let options = SearchOptions {
        max_providers: 1,
        ..Default::default()
    };
    provider
        .search_for_mod(&identity(), &options, &CancellationToken::new())
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_no_feeds_is_misconfigured() {
    let provider = NuGetProvider::new(networking(), vec![]);
    let result = provider
        .search_for_mod(&identity(), &SearchOptions::default(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(ProviderError::Misconfigured { .. })));
}
