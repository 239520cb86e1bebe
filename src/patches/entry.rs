//! Patches for `index.ts`.

use super::{FilePatcher, FileRole, Rule};
use crate::error::Result;

/// Re-export appended so runtime symbols can be imported from the package entry point.
const BASE_REEXPORT: &str = "\nexport * from \"./base\";\n";

/// Re-exports the base client module from the entry point.
pub struct EntryPatcher;

impl FilePatcher for EntryPatcher {
    fn role(&self) -> FileRole {
        FileRole::Entry
    }

    fn rules(&self) -> Result<Vec<Rule>> {
        Ok(vec![Rule::append("base re-export", BASE_REEXPORT)])
    }
}
