mod compare;
mod query;
pub use compare::compare_versions;
pub use query::query;

use crate::types::config::Config;

/// `True` if several versions of `package` may be installed side by side
pub fn installonlypkgs(config: &Config, package: &str) -> String {
    if config.is_installonly(package) {
        "True".to_string()
    } else {
        "False".to_string()
    }
}
