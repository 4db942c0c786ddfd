use super::*;
use crate::networking::NetworkingConfig;
use mockito::{Matcher, Server};

const RESULTS_BODY: &str = r#"{
  "_aMetadata": { "_nRecordCount": 3, "_bIsComplete": true },
  "_aRecords": [
    {
      "_idRow": 408376,
      "_sModelName": "Mod",
      "_sName": "Shared Hooks",
      "_sVersion": "2.0",
      "_sDescription": "Hooks &amp; helpers",
      "_aPreviewMedia": {
        "_aImages": [
          { "_sBaseUrl": "https://images.example.com/ss/mods/", "_sFile": "one.jpg", "_sCaption": "Menu" },
          { "_sBaseUrl": "https://images.example.com/ss/mods", "_sFile": "two.jpg" }
        ]
      }
    },
    {
      "_idRow": 1,
      "_sModelName": "Mod",
      "_sName": "Shared Hooks Remix",
      "_sVersion": "9.9"
    },
    {
      "_idRow": 2,
      "_sModelName": "Mod",
      "_sName": "shared hooks",
      "_sVersion": ""
    }
  ]
}"#;

fn provider(server: &Server, game_id: Option<u64>) -> GameBananaProvider {
    let networking = NetworkingManager::new(NetworkingConfig::default()).unwrap();
    GameBananaProvider::with_base_url(networking, server.url(), game_id)
}

#[test]
fn test_record_to_candidate() {
    let results: SearchResults = serde_json::from_str(RESULTS_BODY).unwrap();
    let candidate = results.records[0].to_candidate();

    assert_eq!(candidate.version, PackageVersion::parse_lenient("2.0.0"));
    assert_eq!(candidate.description.as_deref(), Some("Hooks & helpers"));
    assert_eq!(
        candidate.images,
        Some(vec![
            DownloadableImage::new("https://images.example.com/ss/mods/one.jpg")
                .with_caption("Menu"),
            DownloadableImage::new("https://images.example.com/ss/mods/two.jpg"),
        ])
    );
}

#[test]
fn test_blank_version_and_missing_media() {
    let results: SearchResults = serde_json::from_str(RESULTS_BODY).unwrap();
    let candidate = results.records[2].to_candidate();

    assert_eq!(candidate.version, None);
    assert_eq!(candidate.images, None);
    assert_eq!(candidate.description, None);
}

#[tokio::test]
async fn test_search_matches_name_case_insensitively() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/apiv11/Util/Search/Results")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("_sModelName".into(), "Mod".into()),
            Matcher::UrlEncoded("_sSearchString".into(), "Shared Hooks".into()),
            Matcher::UrlEncoded("_nPerpage".into(), "50".into()),
            Matcher::UrlEncoded("_idGameRow".into(), "6061".into()),
        ]))
        .with_status(200)
        .with_body(RESULTS_BODY)
        .create_async()
        .await;

    let candidates = provider(&server, Some(6061))
        .search_for_mod(
            &ModIdentity::new("reloaded.sharedlib.hooks", "Shared Hooks"),
            &SearchOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].images.as_ref().map(Vec::len), Some(2));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_respects_max_results() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/apiv11/Util/Search/Results")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(RESULTS_BODY)
        .create_async()
        .await;

    let options = SearchOptions {
        max_results: 1,
        ..Default::default()
    };
    let candidates = provider(&server, None)
        .search_for_mod(
            &ModIdentity::new("x", "Shared Hooks"),
            &options,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
}

#[tokio::test]
async fn test_search_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/apiv11/Util/Search/Results")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let result = provider(&server, None)
        .search_for_mod(
            &ModIdentity::new("x", "Shared Hooks"),
            &SearchOptions::default(),
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(ProviderError::Network { .. })));
}
