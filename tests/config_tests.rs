use gallery_frame::config::{Configuration, DEFAULT_BASE_URL, RetryPolicy};
use std::io::Write;
use std::time::Duration;

#[test]
fn defaults_match_slideshow_constants() {
    let cfg = Configuration::default();
    assert_eq!(cfg.catalog.base_url, DEFAULT_BASE_URL);
    assert!(cfg.catalog.api_key.is_empty());
    assert_eq!(cfg.catalog.search_page_size, 20);
    assert_eq!(cfg.catalog.fields.first().map(String::as_str), Some("id"));
    assert_eq!(cfg.catalog.fields.len(), 13);
    assert_eq!(cfg.catalog.retry, RetryPolicy::default());
    assert_eq!(cfg.catalog.retry.max_attempts, 3);

    assert_eq!(cfg.slideshow.initial_page_size, 50);
    assert_eq!(cfg.slideshow.growth_page_size, 20);
    assert_eq!(cfg.slideshow.trailing_window, 10);
    assert_eq!(cfg.slideshow.advance_interval, Duration::from_secs(50));
    assert_eq!(cfg.slideshow.info_hide_delay, Duration::from_secs(8));
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
catalog:
  base-url: "https://catalog.example"
  api-key: "abc-123"
  retry:
    max-attempts: 5
    rate-limit-backoff: 250ms
    network-retry-delay: 2s
slideshow:
  initial-page-size: 30
  trailing-window: 4
  advance-interval: 10s
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.catalog.base_url, "https://catalog.example");
    assert_eq!(cfg.catalog.api_key, "abc-123");
    assert_eq!(cfg.catalog.retry.max_attempts, 5);
    assert_eq!(cfg.catalog.retry.rate_limit_backoff, Duration::from_millis(250));
    assert_eq!(cfg.catalog.retry.network_retry_delay, Duration::from_secs(2));
    assert_eq!(cfg.slideshow.initial_page_size, 30);
    assert_eq!(cfg.slideshow.trailing_window, 4);
    assert_eq!(cfg.slideshow.advance_interval, Duration::from_secs(10));
    // untouched keys keep their defaults
    assert_eq!(cfg.slideshow.growth_page_size, 20);
    assert_eq!(cfg.slideshow.info_hide_delay, Duration::from_secs(8));

    assert!(cfg.validated().is_ok());
}

#[test]
fn custom_field_list() {
    let yaml = r#"
catalog:
  api-key: k
  fields: [id, title, primaryimageurl]
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.catalog.fields, vec!["id", "title", "primaryimageurl"]);
}

#[test]
fn unknown_keys_are_rejected() {
    let yaml = r#"
slideshow:
  autoplay-speed: 3
"#;
    let err = serde_yaml::from_str::<Configuration>(yaml).unwrap_err();
    assert!(err.to_string().contains("autoplay-speed"), "{err}");
}

#[test]
fn missing_api_key_fails_validation() {
    let err = Configuration::default().validated().unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("api-key"), "{msg}");
}

#[test]
fn zero_sizes_and_durations_fail_validation() {
    let cases = [
        "slideshow:\n  initial-page-size: 0\n",
        "slideshow:\n  growth-page-size: 0\n",
        "slideshow:\n  trailing-window: 0\n",
        "slideshow:\n  advance-interval: 0s\n",
        "slideshow:\n  info-hide-delay: 0s\n",
        "catalog:\n  retry:\n    max-attempts: 0\n",
        "catalog:\n  base-url: ftp://catalog.example\n",
    ];
    for case in cases {
        let mut cfg: Configuration = serde_yaml::from_str(case).unwrap();
        cfg.catalog.api_key = "k".into();
        assert!(cfg.validated().is_err(), "expected rejection for {case:?}");
    }
}

#[test]
fn loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "catalog:\n  api-key: from-file\nslideshow:\n  info-hide-delay: 5s").unwrap();

    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.catalog.api_key, "from-file");
    assert_eq!(cfg.slideshow.info_hide_delay, Duration::from_secs(5));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Configuration::from_yaml_file(dir.path().join("absent.yaml")).is_err());
}
