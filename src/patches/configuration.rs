//! Patches for `configuration.ts`.

use super::{silence_lint_banner, FilePatcher, FileRole, Rule};
use crate::error::Result;

const USERNAME_FIELD: &str = "username?: string;";
const USERNAME_AND_TIMEOUT_FIELDS: &str = "username?: string;
    defaultRequestTimeout?: number;";

const FORM_DATA_ASSIGNMENT: &str = "this.formDataCtor = param.formDataCtor;";
const FORM_DATA_AND_TIMEOUT_ASSIGNMENTS: &str = "this.formDataCtor = param.formDataCtor;
        this.defaultRequestTimeout = param.defaultRequestTimeout;";

/// Renames `basePath` to `baseUrl` and adds a `defaultRequestTimeout` setting.
pub struct ConfigurationPatcher;

impl FilePatcher for ConfigurationPatcher {
    fn role(&self) -> FileRole {
        FileRole::Configuration
    }

    fn rules(&self) -> Result<Vec<Rule>> {
        Ok(vec![
            silence_lint_banner(),
            Rule::replace_all("basePath rename", "basePath", "baseUrl"),
            Rule::replace_all("timeout field", USERNAME_FIELD, USERNAME_AND_TIMEOUT_FIELDS),
            Rule::replace(
                "timeout assignment",
                FORM_DATA_ASSIGNMENT,
                FORM_DATA_AND_TIMEOUT_ASSIGNMENTS,
            ),
        ])
    }
}
