use std::path::Path;
use tower_http::services::ServeDir;

/// Serve the driver's browser UI (HTML, JS, map tiles) from `dir`.
///
/// Used as the router fallback, so `/api/*` routes always win. Missing files
/// are a plain 404.
pub fn service(dir: &Path) -> ServeDir {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "static directory not found, only the API is served");
    }
    ServeDir::new(dir)
}
