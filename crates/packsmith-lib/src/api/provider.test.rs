use super::*;

fn candidate(version: &str) -> PackageCandidate {
    PackageCandidate {
        version: PackageVersion::parse_lenient(version),
        ..Default::default()
    }
}

#[test]
fn test_default_search_options() {
    let options = SearchOptions::default();
    assert_eq!(options.max_results, 50);
    assert_eq!(options.max_providers, 4);
    assert!(options.only_best_version);
}

#[test]
fn test_mod_identity_display() {
    let identity = ModIdentity::new("reloaded.sharedlib.hooks", "Shared Hooks");
    assert_eq!(identity.to_string(), "Shared Hooks (reloaded.sharedlib.hooks)");
}

#[test]
fn test_image_caption_serialization() {
    let bare = serde_json::to_value(DownloadableImage::new("https://x/a.png")).unwrap();
    assert!(bare.get("caption").is_none());

    let captioned = DownloadableImage::new("https://x/a.png").with_caption("Title screen");
    let json = serde_json::to_value(&captioned).unwrap();
    assert_eq!(json["caption"], "Title screen");
}

#[tokio::test]
async fn test_static_provider_known_and_unknown_ids() {
    let provider = StaticPackageProvider::new("static")
        .with_candidates("a.mod", vec![candidate("1.0"), candidate("1.1")]);
    let cancel = CancellationToken::new();
    let options = SearchOptions::default();

    let found = provider
        .search_for_mod(&ModIdentity::new("a.mod", "A"), &options, &cancel)
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    let missing = provider
        .search_for_mod(&ModIdentity::new("b.mod", "B"), &options, &cancel)
        .await
        .unwrap();
    assert!(missing.is_empty());
    assert_eq!(provider.name(), "static");
}

#[tokio::test]
async fn test_static_provider_honours_max_results() {
    let provider = StaticPackageProvider::new("static").with_candidates(
        "a.mod",
        vec![candidate("1.0"), candidate("1.1"), candidate("1.2")],
    );
    let options = SearchOptions {
        max_results: 2,
        ..Default::default()
    };

    let found = provider
        .search_for_mod(
            &ModIdentity::new("a.mod", "A"),
            &options,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn test_static_provider_failure_and_cancel() {
    let provider = StaticPackageProvider::new("flaky").with_failure("a.mod", "503");
    let identity = ModIdentity::new("a.mod", "A");
    let options = SearchOptions::default();

    let err = provider
        .search_for_mod(&identity, &options, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Failed { ref provider, .. } if provider == "flaky"));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = provider
        .search_for_mod(&identity, &options, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Cancelled));
}
