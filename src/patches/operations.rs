//! Patches for `api.ts`.
//!
//! typescript-axios emits four blocks per tag: a parameter creator, a functional
//! wrapper, a factory and an API class. Only the class is meant to be consumed, so the
//! first two become module-private, the factory is cut down to its doc comment and the
//! class gains a lazily created singleton.

use super::{silence_lint_banner, FilePatcher, FileRole, Rule};
use crate::error::Result;

const AUTH_HELPER_IMPORTS: &str =
    "setApiKeyToObject, setBasicAuthToObject, setBearerAuthToObject, setOAuthToObject, ";

const FACTORY_PATTERN: &str = r"export const (.*)ApiFactory[\s\S]*?object-oriented interface";
const FACTORY_STUB: &str = "
/**
 * ${1}Api - object-oriented interface
";

const API_CLASS_PATTERN: &str = r"export class (.*)Api extends BaseAPI \{";
const SINGLETON_API_CLASS: &str = "export class ${1}Api extends BaseAPI {
  public static instance: ${1}Api;
  public static getInstance(): ${1}Api {
    this.instance = this.instance || new ${1}Api();
    return this.instance;
  }
";

/// Trims the per-tag API surface down to singleton classes.
pub struct OperationsPatcher;

impl FilePatcher for OperationsPatcher {
    fn role(&self) -> FileRole {
        FileRole::Operations
    }

    fn rules(&self) -> Result<Vec<Rule>> {
        Ok(vec![
            silence_lint_banner(),
            Rule::pattern_all(
                "private param creators",
                r"export const (.*?)ApiAxiosParamCreator",
                "const ${1}ApiAxiosParamCreator",
            )?,
            Rule::replace_all("BASE_PATH argument", "BASE_PATH, configuration", "configuration"),
            Rule::pattern_all("private functional wrappers", r"export const (.*?)ApiFp", "const ${1}ApiFp")?,
            // Cascading deletes break cache invalidation in consumers.
            Rule::replace_all("cascade disabled", "cascade?: boolean", "cascade?: false").optional(),
            Rule::pattern_all("flatten enum names", "Enum|enum", "")?.optional(),
            Rule::replace("auth helper imports", AUTH_HELPER_IMPORTS, ""),
            Rule::pattern_all("factory stubs", FACTORY_PATTERN, FACTORY_STUB)?,
            Rule::pattern_all("singleton accessors", API_CLASS_PATTERN, SINGLETON_API_CLASS)?,
            Rule::replace_all("base URL lookup", "this.basePath", "this.configuration.baseUrl"),
        ])
    }
}
