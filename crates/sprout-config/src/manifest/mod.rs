//! `"cljs"` manifest section parsing and defaults

use camino::Utf8Path;
use serde_json::{Map, Value};
use sprout_core::error::SproutError;
use sprout_core::types::DependencySet;
use tracing::warn;

use crate::ConfigResult;

/// Manifest file name, relative to the project root
pub const MANIFEST_FILE: &str = "package.json";

/// Top-level key of the manifest section Sprout owns
pub const SECTION: &str = "cljs";

pub const FAKE_PROJECT_FILE: &str = "fakeProjectFile";

/// File name Leiningen looks for in the directory it runs in
pub const PROJECT_FILE_NAME: &str = "project.clj";
pub const TEMPDIR: &str = "tempdir";
pub const TARGET: &str = "target";
pub const ASSET_PATH: &str = "assetPath";
pub const SRC: &str = "src";
pub const MAIN: &str = "main";
pub const REPL_PORT: &str = "replPort";
pub const REPL_HOST: &str = "replHost";
pub const DEPENDENCIES: &str = "dependencies";

/// Every option the section understands
pub const KNOWN_KEYS: &[&str] = &[
    FAKE_PROJECT_FILE,
    TEMPDIR,
    TARGET,
    ASSET_PATH,
    SRC,
    MAIN,
    REPL_PORT,
    REPL_HOST,
    DEPENDENCIES,
];

/// Built-in option values. `main` has no default.
pub fn default_options() -> Map<String, Value> {
    let mut options = Map::new();
    options.insert(FAKE_PROJECT_FILE.to_string(), Value::from(PROJECT_FILE_NAME));
    options.insert(TEMPDIR.to_string(), Value::from(".sprout"));
    options.insert(TARGET.to_string(), Value::from("out/main.js"));
    options.insert(ASSET_PATH.to_string(), Value::from("out"));
    options.insert(SRC.to_string(), Value::from("src"));
    options.insert(REPL_PORT.to_string(), Value::from(5044));
    options.insert(REPL_HOST.to_string(), Value::from("localhost"));
    options.insert(DEPENDENCIES.to_string(), Value::Object(Map::new()));
    options
}

/// Validated, defaulted view of the manifest section
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestConfig {
    /// Section values merged over the defaults
    values: Map<String, Value>,
    /// Parsed dependency map
    dependencies: DependencySet,
    /// Section keys that are not recognized options
    unknown_keys: Vec<String>,
}

impl ManifestConfig {
    /// Build the config from a parsed manifest document
    pub fn from_document(document: &Value) -> ConfigResult<Self> {
        let root = document.as_object().ok_or_else(|| SproutError::ConfigValidation {
            field: MANIFEST_FILE.to_string(),
            reason: "manifest must be a JSON object".to_string(),
        })?;

        let section = match root.get(SECTION) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(section)) => section.clone(),
            Some(_) => {
                return Err(SproutError::ConfigValidation {
                    field: SECTION.to_string(),
                    reason: "section must be a JSON object".to_string(),
                })
            }
        };

        let mut values = default_options();
        let mut unknown_keys = Vec::new();
        for (key, value) in section {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!("Unknown option '{}' in \"{}\" section", key, SECTION);
                unknown_keys.push(key.clone());
            }
            values.insert(key, value);
        }

        let dependencies = parse_dependencies(values.get(DEPENDENCIES))?;
        check_project_file_name(values.get(FAKE_PROJECT_FILE))?;

        Ok(Self {
            values,
            dependencies,
            unknown_keys,
        })
    }

    /// Look up an option, failing when it has neither a value nor a default
    pub fn get(&self, key: &str) -> ConfigResult<&Value> {
        match self.values.get(key) {
            None | Some(Value::Null) => Err(SproutError::ConfigKeyUndefined {
                key: key.to_string(),
            }),
            Some(value) => Ok(value),
        }
    }

    /// Look up a string option
    pub fn get_str(&self, key: &str) -> ConfigResult<&str> {
        self.get(key)?.as_str().ok_or_else(|| SproutError::ConfigValidation {
            field: key.to_string(),
            reason: "expected a string".to_string(),
        })
    }

    pub fn fake_project_file(&self) -> ConfigResult<&str> {
        self.get_str(FAKE_PROJECT_FILE)
    }

    pub fn tempdir(&self) -> ConfigResult<&str> {
        self.get_str(TEMPDIR)
    }

    pub fn target(&self) -> ConfigResult<&str> {
        self.get_str(TARGET)
    }

    pub fn asset_path(&self) -> ConfigResult<&str> {
        self.get_str(ASSET_PATH)
    }

    pub fn src(&self) -> ConfigResult<&str> {
        self.get_str(SRC)
    }

    /// Entry-point namespace
    pub fn main(&self) -> ConfigResult<&str> {
        self.get_str(MAIN)
    }

    pub fn repl_host(&self) -> ConfigResult<&str> {
        self.get_str(REPL_HOST)
    }

    /// REPL port, accepted as a JSON number or numeric string
    pub fn repl_port(&self) -> ConfigResult<u16> {
        let value = self.get(REPL_PORT)?;
        let port = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };

        port.and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p != 0)
            .ok_or_else(|| SproutError::ConfigValidation {
                field: REPL_PORT.to_string(),
                reason: format!("'{}' is not a valid port", value),
            })
    }

    /// Declared dependencies
    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    /// Section keys that produced an unknown-option warning
    pub fn unknown_keys(&self) -> &[String] {
        &self.unknown_keys
    }
}

/// Validate and convert the `dependencies` option
fn parse_dependencies(value: Option<&Value>) -> ConfigResult<DependencySet> {
    let map = match value {
        None | Some(Value::Null) => return Ok(DependencySet::new()),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(SproutError::ConfigValidation {
                field: DEPENDENCIES.to_string(),
                reason: "expected an object of \"group/artifact\": \"version\" pairs".to_string(),
            })
        }
    };

    let mut dependencies = DependencySet::new();
    for (key, version) in map {
        let coord = key.parse()?;
        let version = version.as_str().ok_or_else(|| SproutError::ConfigValidation {
            field: format!("{}.{}", DEPENDENCIES, key),
            reason: "version must be a string".to_string(),
        })?;
        if version.contains('\0') {
            return Err(SproutError::ConfigValidation {
                field: format!("{}.{}", DEPENDENCIES, key),
                reason: "version contains a NUL byte".to_string(),
            });
        }
        dependencies.insert(coord, version);
    }

    Ok(dependencies)
}

/// Leiningen only reads a descriptor named `project.clj`, so the option may
/// move it into a subdirectory of `tempdir` but not rename it.
fn check_project_file_name(value: Option<&Value>) -> ConfigResult<()> {
    let Some(Value::String(path)) = value else {
        return Ok(());
    };

    if Utf8Path::new(path).file_name() == Some(PROJECT_FILE_NAME) {
        Ok(())
    } else {
        Err(SproutError::ConfigValidation {
            field: FAKE_PROJECT_FILE.to_string(),
            reason: format!("'{}' must name a file called {}", path, PROJECT_FILE_NAME),
        })
    }
}

/// Parse manifest text into a JSON document
pub fn parse_manifest(content: &str) -> ConfigResult<Value> {
    serde_json::from_str(content).map_err(|e| SproutError::JsonParse {
        message: format!("JSON parsing error: {}", e),
    })
}
