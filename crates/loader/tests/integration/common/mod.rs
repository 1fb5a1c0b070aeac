//! Common utilities for loader integration tests.

use hotbind_loader::{CodeLoader, LoaderConfig};

/// Scans only the fixture module and binds one configured bean.
pub const CONFIG: &str = r#"
namespaces = ["integration::game"]

[[bean]]
name = "main_player"
class = "Player"
priority = 3
"#;

pub fn config() -> LoaderConfig {
	LoaderConfig::from_toml_str(CONFIG).expect("fixture config parses")
}

/// Initializes a loader over every type registered in the test binary.
pub fn loader_with(config: LoaderConfig) -> CodeLoader {
	let _ = tracing_subscriber::fmt::try_init();
	let mut loader = CodeLoader::new(config);
	loader.initialize().expect("fresh loader initializes");
	loader
}

pub fn loader() -> CodeLoader {
	loader_with(config())
}
