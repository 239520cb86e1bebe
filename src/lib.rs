//! OpenAPI client patcher - Generated typescript-axios clients that fit a shared runtime.
//!
//! This library turns the OpenAPI document of a running service into input that
//! `openapi-generator-cli` (typescript-axios target) can consume, and afterwards patches
//! the generated TypeScript so that API classes are singletons sharing one configurable
//! runtime: default timeout, base URL, bearer token and ordered interceptor hooks.
//!
//! # Architecture
//!
//! The pipeline runs strictly in sequence:
//!
//! 1. [`fetcher`] - Retrieves the raw document and rewrites `anyOf` to `oneOf`
//! 2. [`normalizer`] - Pins the document to OpenAPI 3.0 and strips unsupported sections
//! 3. [`sanitizer`] - Recursively rewrites schema nodes the generator mishandles
//! 4. [`generator`] - Runs the external generator on the normalized document
//! 5. [`patches`] - Ordered text rewrites for each of the five generated files
//! 6. [`workspace`] - Stages everything in a temporary directory and places the result
//!
//! [`serializer`] writes documents as JSON or YAML, and [`cli`] ties the steps together.
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_client_patcher::{
//!     fetcher::DocumentFetcher,
//!     generator::GeneratorCommand,
//!     normalizer::normalize,
//!     workspace::{patch_generated_files, place_files, Workspace},
//! };
//! use std::path::{Path, PathBuf};
//!
//! let raw = DocumentFetcher::new().unwrap()
//!     .fetch("https://127.0.0.1:8000/openapi.json")
//!     .unwrap();
//! let document = normalize(raw).unwrap();
//!
//! let workspace = Workspace::new().unwrap();
//! let schema = workspace.write_schema(&document).unwrap();
//! GeneratorCommand::new(PathBuf::from("openapi-generator-cli"), schema, workspace.generated_dir())
//!     .run()
//!     .unwrap();
//!
//! patch_generated_files(&workspace.generated_dir(), false).unwrap();
//! place_files(&workspace.generated_dir(), Path::new("src/api")).unwrap();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod fetcher;
pub mod normalizer;
pub mod sanitizer;
pub mod generator;
pub mod patches;
pub mod workspace;
pub mod serializer;
pub mod error;
