use sha1_fingerprint::fingerprint::{components, compute_fingerprint, Hardware, Screen};
use sha1_fingerprint::{
    digest, get_fingerprint, Environment, Error, FileStorage, FingerprintConfig, Fingerprinter,
    MemoryStorage, Result, Signals, Storage,
};
use std::cell::Cell;

fn desktop() -> Signals {
    Signals {
        canvas: Some("data:image/png;base64,iVBORw0KGgo".to_string()),
        audio: Some("-120.5,-118.25,-117,-116.75,-116.5".to_string()),
        screen: Screen {
            width: 1920,
            height: 1080,
            pixel_ratio: 2.0,
        },
        hardware: Hardware {
            concurrency: Some(8),
            memory_gb: Some(16.0),
        },
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36"
            .to_string(),
        fonts: vec!["Arial".into(), "Georgia".into(), "Verdana".into()],
    }
}

/// Counts how often the drawing surface is used.
struct CountingEnv {
    inner: Signals,
    canvas_calls: Cell<u32>,
}

impl Environment for CountingEnv {
    fn canvas(&self) -> Result<String> {
        self.canvas_calls.set(self.canvas_calls.get() + 1);
        self.inner.canvas()
    }
    fn audio(&self) -> Result<String> {
        self.inner.audio()
    }
    fn screen(&self) -> Screen {
        self.inner.screen()
    }
    fn hardware(&self) -> Hardware {
        self.inner.hardware()
    }
    fn user_agent(&self) -> String {
        self.inner.user_agent()
    }
    fn has_font(&self, family: &str) -> bool {
        self.inner.has_font(family)
    }
}

struct FailingStorage;

impl Storage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )))
    }
    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }
}

#[test]
fn digest_of_joined_components() {
    let config = FingerprintConfig::default();
    let parts = components(&desktop(), &config);
    assert_eq!(
        parts,
        vec![
            "data:image/png;base64,iVBORw0KGgo",
            "-120.5,-118.25,-117,-116.75,-116.5",
            "3840x2160",
            "8|16",
            "Chrome|Windows",
            "Arial,Verdana,Georgia",
        ]
    );
    let expected = digest(parts.join("|"));
    assert_eq!(compute_fingerprint(&desktop(), &config), expected);
    assert_eq!(expected.len(), 40);
}

#[test]
fn component_order_matters() {
    let config = FingerprintConfig::default();
    let mut parts = components(&desktop(), &config);
    let fp = compute_fingerprint(&desktop(), &config);
    parts.swap(0, 1);
    assert_ne!(digest(parts.join("|")), fp);
}

#[test]
fn separator_is_configurable() {
    let config = FingerprintConfig {
        separator: ';',
        ..FingerprintConfig::default()
    };
    let parts = components(&desktop(), &config);
    assert_eq!(compute_fingerprint(&desktop(), &config), digest(parts.join(";")));
    assert_ne!(
        compute_fingerprint(&desktop(), &config),
        compute_fingerprint(&desktop(), &FingerprintConfig::default())
    );
}

#[test]
fn degraded_environment_still_fingerprints() {
    let mut signals = desktop();
    signals.canvas = None;
    signals.audio = None;
    let config = FingerprintConfig::default();
    let parts = components(&signals, &config);
    assert_eq!(parts[0], "canvas-unsupported");
    assert_eq!(parts[1], "audio-unsupported");
    assert_eq!(compute_fingerprint(&signals, &config).len(), 40);
}

#[test]
fn second_call_is_served_from_storage() {
    let env = CountingEnv {
        inner: desktop(),
        canvas_calls: Cell::new(0),
    };
    let storage = MemoryStorage::new();
    let config = FingerprintConfig::default();

    let first = get_fingerprint(&env, Some(&storage), &config);
    assert_eq!(env.canvas_calls.get(), 1);
    assert_eq!(storage.get("deviceFingerprint").unwrap(), Some(first.clone()));

    let second = get_fingerprint(&env, Some(&storage), &config);
    assert_eq!(second, first);
    assert_eq!(env.canvas_calls.get(), 1);
}

#[test]
fn stored_value_wins_over_recomputation() {
    let storage = MemoryStorage::new();
    storage.set("deviceFingerprint", "cafebabe").unwrap();
    let fp = get_fingerprint(&desktop(), Some(&storage), &FingerprintConfig::default());
    assert_eq!(fp, "cafebabe");
}

#[test]
fn empty_stored_value_is_a_miss() {
    let storage = MemoryStorage::new();
    storage.set("deviceFingerprint", "").unwrap();
    let config = FingerprintConfig::default();
    let fp = get_fingerprint(&desktop(), Some(&storage), &config);
    assert_eq!(fp, compute_fingerprint(&desktop(), &config));
    assert_eq!(storage.get("deviceFingerprint").unwrap(), Some(fp));
}

#[test]
fn storage_failures_do_not_prevent_a_digest() {
    let config = FingerprintConfig::default();
    let expected = compute_fingerprint(&desktop(), &config);
    assert_eq!(get_fingerprint(&desktop(), Some(&FailingStorage), &config), expected);
    assert_eq!(get_fingerprint(&desktop(), None, &config), expected);
}

#[test]
fn file_backed_fingerprinter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let config = FingerprintConfig {
        storage_key: "fp".to_string(),
        ..FingerprintConfig::default()
    };

    let fingerprinter = Fingerprinter::new()
        .with_config(config.clone())
        .with_storage(FileStorage::new(&path));
    let fp = fingerprinter.fingerprint(&desktop());
    assert_eq!(fp, compute_fingerprint(&desktop(), &config));

    // a different environment still sees the cached value
    let reopened = Fingerprinter::new()
        .with_config(config)
        .with_storage(FileStorage::new(&path));
    assert_eq!(reopened.fingerprint(&Signals::default()), fp);
}

#[test]
fn signals_from_json() {
    let signals = Signals::from_json(
        r#"{
            "canvas": "data:image/png;base64,iVBORw0KGgo",
            "audio": "-120.5,-118.25,-117,-116.75,-116.5",
            "screen": {"width": 1920, "height": 1080, "pixel_ratio": 2},
            "hardware": {"concurrency": 8, "memory_gb": 16},
            "user_agent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36",
            "fonts": ["Arial", "Georgia", "Verdana"]
        }"#,
    )
    .unwrap();
    assert_eq!(signals, desktop());

    let partial = Signals::from_json(r#"{"user_agent": "curl/8.0"}"#).unwrap();
    assert_eq!(partial.screen.pixel_ratio, 1.0);
    assert!(partial.canvas().is_err());
}
