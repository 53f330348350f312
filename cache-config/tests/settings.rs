use cache_config::{Backend, Settings};

#[test]
fn parses_memory_backend() {
    let yaml = r#"
backend:
  type: memory
  max_entries: 10000
"#;
    let settings = Settings::from_yaml_str(yaml).expect("failed to deserialize");
    match settings.backend {
        Backend::Memory(config) => assert_eq!(config.max_entries.get(), 10000),
        other => panic!("expected memory backend, got {other:?}"),
    }
    assert_eq!(settings.server.port, 2424);
    assert_eq!(settings.server.admin_port, 2525);
    assert_eq!(settings.server.max_num_values, 10);
    assert_eq!(settings.server.max_size_bytes, 10_240);
}

#[test]
fn parses_composite_backend() {
    let yaml = r#"
backend:
  type: composite
  primary:
    type: memory
    max_entries: 1000
  secondary:
    type: redis
    connection_string: "redis://localhost:6379"
"#;
    let settings = Settings::from_yaml_str(yaml).expect("failed to deserialize");
    match settings.backend {
        Backend::Composite(config) => {
            assert!(matches!(*config.primary, Backend::Memory(_)));
            assert!(matches!(*config.secondary, Backend::Redis(_)));
        }
        other => panic!("expected composite backend, got {other:?}"),
    }
}

#[test]
fn full_document_overrides_defaults() {
    let yaml = r#"
server:
  port: 9000
  admin_port: 9001
  max_num_values: 5
  allow_keys: true
  api_key: "secret"
ttl:
  max_ttl_seconds: 3600
  extra_ttl_seconds: 30
rate_limiter:
  enabled: true
  num_requests: 50.0
backend:
  type: memory
  max_entries: 256
metrics:
  type: prometheus
  scrape_path: "/internal/metrics"
logging:
  level: debug
  format: json
"#;
    let settings = Settings::from_yaml_str(yaml).expect("failed to deserialize");
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.server.admin_port, 9001);
    assert!(settings.server.allow_keys);
    assert_eq!(settings.server.api_key.as_deref(), Some("secret"));
    assert_eq!(settings.ttl.max_ttl_seconds, 3600);
    assert!(settings.rate_limiter.enabled);
    assert_eq!(settings.rate_limiter.num_requests, 50.0);
    assert_eq!(settings.metrics.scrape_path, "/internal/metrics");
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.logging.format, "json");
}
