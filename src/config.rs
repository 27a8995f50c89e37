/// Default number of names requested per country and category
pub const DEFAULT_TOP_N: i64 = 500;

/// Default directory holding the per-country dataset files
pub const DEFAULT_DATASET_DIR: &str = "data";

/// Default directory for generated lexicon files
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Base name shared by every generated artifact
pub const LEXICON_BASENAME: &str = "names-lexicon";

/// Exported identifier used by the module-style artifacts
pub const EXPORT_NAME: &str = "nameLexicon";

/// Upstream dataset credited in generated file headers
pub const DATASET_SOURCE_URL: &str = "https://github.com/philipperemy/name-dataset";

/// Bump when the cached dataset layout changes
pub const CACHE_VERSION: u32 = 1;

/// Progress update interval (tick every N records)
pub const PROGRESS_INTERVAL: u64 = 10_000;
