//! Text patches for the files produced by typescript-axios.
//!
//! The generator's output is never parsed. Each output file has a [`FileRole`] and an
//! ordered list of [`Rule`]s, each a pure `String -> String` rewrite applied left to
//! right. A rule that finds nothing leaves the text unchanged; the number of matches is
//! recorded in a [`PatchReport`] so callers can decide whether a miss matters.
//!
//! Patches are meant to be applied exactly once. Applying a set twice is unsupported.
//!
//! # Roles
//!
//! - **Entry** (`index.ts`): see [`entry::EntryPatcher`]
//! - **Common** (`common.ts`): see [`common::CommonPatcher`]
//! - **Configuration** (`configuration.ts`): see [`configuration::ConfigurationPatcher`]
//! - **Base** (`base.ts`): see [`base::BasePatcher`]
//! - **Operations** (`api.ts`): see [`operations::OperationsPatcher`]
//!
//! # Example
//!
//! ```
//! use openapi_client_patcher::patches::{FileRole, PatchSet};
//!
//! let set = PatchSet::for_role(FileRole::Entry).unwrap();
//! let outcome = set.apply("export * from \"./api\";\n");
//! assert!(outcome.text.ends_with("export * from \"./base\";\n"));
//! assert!(outcome.report.is_complete());
//! ```

pub mod base;
pub mod common;
pub mod configuration;
pub mod entry;
pub mod operations;

use crate::error::{Error, Result};
use log::{debug, warn};
use regex::Regex;
use std::fmt;

/// Lint header emitted by the generator at the top of every file.
const LINT_BANNER: &str = "/* tslint:disable */\n/* eslint-disable */";
/// Header that silences both the linter and the type checker.
const SILENCED_BANNER: &str = "/* eslint-disable */\n// @ts-nocheck";

/// Trait for the per-role patch definitions.
///
/// Implementations return their rules in the order they must be applied.
pub trait FilePatcher {
    /// The file this patcher rewrites.
    fn role(&self) -> FileRole;

    /// Builds the ordered rule list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if a rule's regular expression does not compile.
    fn rules(&self) -> Result<Vec<Rule>>;
}

/// The five files of the generated client that get patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// `index.ts`, the package entry point
    Entry,
    /// `common.ts`, shared request helpers
    Common,
    /// `configuration.ts`, the client configuration type
    Configuration,
    /// `base.ts`, the base client class
    Base,
    /// `api.ts`, the per-tag operation classes
    Operations,
}

impl FileRole {
    /// All roles in patch order.
    pub const ALL: [FileRole; 5] = [
        FileRole::Entry,
        FileRole::Common,
        FileRole::Configuration,
        FileRole::Base,
        FileRole::Operations,
    ];

    /// Name of the generated file for this role.
    pub fn file_name(self) -> &'static str {
        match self {
            FileRole::Entry => "index.ts",
            FileRole::Common => "common.ts",
            FileRole::Configuration => "configuration.ts",
            FileRole::Base => "base.ts",
            FileRole::Operations => "api.ts",
        }
    }

    /// Short lowercase name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            FileRole::Entry => "entry",
            FileRole::Common => "common",
            FileRole::Configuration => "configuration",
            FileRole::Base => "base",
            FileRole::Operations => "operations",
        }
    }

    fn patcher(self) -> Box<dyn FilePatcher> {
        match self {
            FileRole::Entry => Box::new(entry::EntryPatcher),
            FileRole::Common => Box::new(common::CommonPatcher),
            FileRole::Configuration => Box::new(configuration::ConfigurationPatcher),
            FileRole::Base => Box::new(base::BasePatcher),
            FileRole::Operations => Box::new(operations::OperationsPatcher),
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named text rewrite.
///
/// Rules are required by default: a required rule that matches nothing means the
/// generator's output drifted. [`Rule::optional`] marks rules whose target only exists
/// for some APIs.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    kind: RuleKind,
    required: bool,
}

#[derive(Debug, Clone)]
enum RuleKind {
    Literal {
        from: &'static str,
        to: &'static str,
        all: bool,
    },
    Pattern {
        regex: Regex,
        to: &'static str,
        all: bool,
    },
    Append(&'static str),
}

impl Rule {
    /// Replaces the first occurrence of `from`.
    pub fn replace(name: &'static str, from: &'static str, to: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::Literal { from, to, all: false },
            required: true,
        }
    }

    /// Replaces every occurrence of `from`.
    pub fn replace_all(name: &'static str, from: &'static str, to: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::Literal { from, to, all: true },
            required: true,
        }
    }

    /// Replaces the first match of `pattern`. `to` may reference groups as `${1}`.
    pub fn pattern(name: &'static str, pattern: &str, to: &'static str) -> Result<Self> {
        Ok(Self {
            name,
            kind: RuleKind::Pattern {
                regex: compile(name, pattern)?,
                to,
                all: false,
            },
            required: true,
        })
    }

    /// Replaces every match of `pattern`. `to` may reference groups as `${1}`.
    pub fn pattern_all(name: &'static str, pattern: &str, to: &'static str) -> Result<Self> {
        Ok(Self {
            name,
            kind: RuleKind::Pattern {
                regex: compile(name, pattern)?,
                to,
                all: true,
            },
            required: true,
        })
    }

    /// Appends `suffix` to the end of the text. Always counts as one match.
    pub fn append(name: &'static str, suffix: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::Append(suffix),
            required: true,
        }
    }

    /// Marks the rule as one whose target may legitimately be absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Human-readable rule name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Applies the rule, returning the new text and how many places were rewritten.
    pub fn apply(&self, text: &str) -> (String, usize) {
        match &self.kind {
            RuleKind::Literal { from, to, all: false } => {
                if text.contains(from) {
                    (text.replacen(from, to, 1), 1)
                } else {
                    (text.to_string(), 0)
                }
            }
            RuleKind::Literal { from, to, all: true } => {
                let matches = text.matches(from).count();
                (text.replace(from, to), matches)
            }
            RuleKind::Pattern { regex, to, all: false } => {
                let matches = usize::from(regex.is_match(text));
                (regex.replace(text, *to).into_owned(), matches)
            }
            RuleKind::Pattern { regex, to, all: true } => {
                let matches = regex.find_iter(text).count();
                (regex.replace_all(text, *to).into_owned(), matches)
            }
            RuleKind::Append(suffix) => (format!("{}{}", text, suffix), 1),
        }
    }
}

fn compile(rule: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        rule,
        message: e.to_string(),
    })
}

/// Swaps the generator's lint header for one that also disables type checking.
pub(crate) fn silence_lint_banner() -> Rule {
    Rule::replace("lint banner", LINT_BANNER, SILENCED_BANNER)
}

/// Ordered rules for one file role.
#[derive(Debug, Clone)]
pub struct PatchSet {
    role: FileRole,
    rules: Vec<Rule>,
}

/// Result of applying a [`PatchSet`].
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// The patched file content
    pub text: String,
    /// Match counts per rule
    pub report: PatchReport,
}

/// Match counts of every rule of one role, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub role: FileRole,
    pub rules: Vec<RuleReport>,
}

/// How often one rule matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub name: &'static str,
    pub matches: usize,
    pub required: bool,
}

impl RuleReport {
    fn is_miss(&self) -> bool {
        self.matches == 0
    }
}

impl PatchSet {
    pub fn new(role: FileRole, rules: Vec<Rule>) -> Self {
        Self { role, rules }
    }

    /// Builds the standard rule list for `role`.
    pub fn for_role(role: FileRole) -> Result<Self> {
        let patcher = role.patcher();
        Ok(Self::new(patcher.role(), patcher.rules()?))
    }

    pub fn role(&self) -> FileRole {
        self.role
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Applies every rule in order. Misses are recorded, never raised.
    pub fn apply(&self, text: &str) -> PatchOutcome {
        let mut current = text.to_string();
        let mut reports = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (patched, matches) = rule.apply(&current);
            debug!("[{}] {}: {} match(es)", self.role, rule.name(), matches);
            current = patched;
            reports.push(RuleReport {
                name: rule.name(),
                matches,
                required: rule.is_required(),
            });
        }

        PatchOutcome {
            text: current,
            report: PatchReport {
                role: self.role,
                rules: reports,
            },
        }
    }
}

impl PatchReport {
    /// Names of the required rules that matched nothing.
    pub fn unmatched(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.required && rule.is_miss())
            .map(|rule| rule.name)
            .collect()
    }

    /// Whether every required rule matched at least once.
    pub fn is_complete(&self) -> bool {
        self.unmatched().is_empty()
    }

    /// Fails with [`Error::UnmatchedPatches`] unless every required rule matched.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        Err(Error::UnmatchedPatches {
            role: self.role.name(),
            rules: self.unmatched(),
        })
    }

    /// Logs a warning for each required rule that matched nothing.
    ///
    /// Optional rules without a match are only mentioned at debug level.
    pub fn warn_unmatched(&self) {
        for rule in self.rules.iter().filter(|rule| rule.is_miss()) {
            if rule.required {
                warn!(
                    "Patch rule '{}' did not match anything in {}",
                    rule.name,
                    self.role.file_name()
                );
            } else {
                debug!(
                    "Optional patch rule '{}' found nothing in {}",
                    rule.name,
                    self.role.file_name()
                );
            }
        }
    }
}
