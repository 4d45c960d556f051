//! Layered YAML configuration for the torc daemon and CLI.
//!
//! Documents are merged in order (earlier = base, later = override), the
//! merged tree is hashed for logging, and then deserialised into
//! [`TorcConfig`]. Every field has a default, so an empty document set yields
//! a runnable configuration.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

mod consumption;

pub use consumption::{report_unused_keys, UnusedKeyPolicy, UnusedKeyReport, CONSUMED_POINTERS};

// ---------------------------------------------------------------------------
// Typed config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorcConfig {
    pub storage: StorageConfig,
    pub menu: MenuConfig,
    pub public: SurfaceConfig,
    pub admin: SurfaceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per session.
    pub sessions_root: PathBuf,
    /// Global popularity record.
    pub popular_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sessions_root: PathBuf::from("Sessions"),
            popular_path: PathBuf::from("popular.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub path: PathBuf,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("menu.txt"),
        }
    }
}

/// Listener + static UI directory for one HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl SurfaceConfig {
    pub fn public_default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from("web"),
        }
    }

    pub fn admin_default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            static_dir: PathBuf::from("admin"),
        }
    }
}

// `public` and `admin` share a type but not defaults, so the two sections
// deserialise through dedicated partial structs.
#[derive(Deserialize)]
struct PartialSurface {
    addr: Option<SocketAddr>,
    static_dir: Option<PathBuf>,
}

impl PartialSurface {
    fn fill(self, base: SurfaceConfig) -> SurfaceConfig {
        SurfaceConfig {
            addr: self.addr.unwrap_or(base.addr),
            static_dir: self.static_dir.unwrap_or(base.static_dir),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    storage: StorageConfig,
    menu: MenuConfig,
    public: Option<PartialSurface>,
    admin: Option<PartialSurface>,
}

impl Default for TorcConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl TorcConfig {
    pub fn defaults() -> Self {
        Self {
            storage: StorageConfig::default(),
            menu: MenuConfig::default(),
            public: SurfaceConfig::public_default(),
            admin: SurfaceConfig::admin_default(),
        }
    }

    fn from_json(v: &Value) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_value(v.clone()).context("config does not match schema")?;
        Ok(Self {
            storage: raw.storage,
            menu: raw.menu,
            public: match raw.public {
                Some(p) => p.fill(SurfaceConfig::public_default()),
                None => SurfaceConfig::public_default(),
            },
            admin: match raw.admin {
                Some(p) => p.fill(SurfaceConfig::admin_default()),
                None => SurfaceConfig::admin_default(),
            },
        })
    }

    /// Apply `TORC_*` overrides. `lookup` is `std::env::var(..).ok()` in
    /// production and a map in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TORC_PUBLIC_ADDR") {
            self.public.addr = v
                .parse()
                .with_context(|| format!("TORC_PUBLIC_ADDR is not a socket address: {v}"))?;
        }
        if let Some(v) = lookup("TORC_ADMIN_ADDR") {
            self.admin.addr = v
                .parse()
                .with_context(|| format!("TORC_ADMIN_ADDR is not a socket address: {v}"))?;
        }
        if let Some(v) = lookup("TORC_SESSIONS_ROOT") {
            self.storage.sessions_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("TORC_POPULAR_PATH") {
            self.storage.popular_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("TORC_MENU_PATH") {
            self.menu.path = PathBuf::from(v);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub config: TorcConfig,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Like [`load_layered_yaml`] but silently skips paths that do not exist.
/// Returns the loaded config and the paths that were actually read.
pub fn load_existing_layers<P: AsRef<Path>>(paths: &[P]) -> Result<(LoadedConfig, Vec<PathBuf>)> {
    let mut used = Vec::new();
    let mut docs = Vec::new();
    for p in paths {
        let p = p.as_ref();
        if !p.is_file() {
            continue;
        }
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
        used.push(p.to_path_buf());
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    Ok((load_layered_yaml_from_strings(&doc_refs)?, used))
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses as null; treat it as an empty mapping.
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let config = TorcConfig::from_json(&merged)?;
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        config,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
