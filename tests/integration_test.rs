use openapi_client_patcher::{
    cli::{run, CliArgs, SchemaFormat},
    fetcher::parse_document,
    normalizer::normalize,
    patches::{FileRole, PatchSet},
    workspace::{patch_generated_files, Workspace},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn generated_fixture(role: FileRole) -> String {
    fs::read_to_string(fixtures_dir().join("generated").join(role.file_name()))
        .expect("Failed to read generated fixture")
}

fn normalized_fixture() -> Value {
    let text = fs::read_to_string(fixtures_dir().join("openapi_3_1.json"))
        .expect("Failed to read document fixture");
    normalize(parse_document(&text).expect("Fixture should parse")).expect("Fixture should normalize")
}

/// Collects every key of every mapping in the tree.
fn collect_keys(value: &Value, keys: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                keys.push(key.clone());
                collect_keys(child, keys);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_keys(item, keys)),
        _ => {}
    }
}

#[test]
fn test_minimal_document_end_to_end() {
    let raw = r#"{
        "openapi": "3.1.0",
        "info": { "title": "Pets", "version": "1.0.0", "summary": "Pet store" },
        "paths": {
            "/pets": {
                "get": {
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "application/json": {
                                    "schema": { "anyOf": [{ "type": "null" }, { "type": "string" }] }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "securitySchemes": { "bearer": { "type": "http", "scheme": "bearer" } }
        }
    }"#;

    let document = normalize(parse_document(raw).unwrap()).unwrap();

    assert_eq!(document["openapi"], "3.0.0");
    assert!(document["info"].get("summary").is_none());
    assert!(document["components"].get("securitySchemes").is_none());
    assert_eq!(
        document["paths"]["/pets"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
        json!({ "type": "string", "nullable": true })
    );
}

#[test]
fn test_fixture_document_normalization() {
    let document = normalized_fixture();

    assert_eq!(document["openapi"], "3.0.0");
    assert_eq!(
        document["info"],
        json!({ "title": "Case Management API", "description": "Internal API", "version": "1.4.0" })
    );

    let get = &document["paths"]["/v1/cases"]["get"];
    assert_eq!(get["operationId"], "retrieve_cases");
    assert_eq!(get["parameters"][0]["schema"], json!({ "type": "integer", "title": "Limit" }));
    assert_eq!(
        document["paths"]["/v1/cases/{case_id}"]["delete"]["operationId"],
        "delete_case"
    );

    let case = &document["components"]["schemas"]["Case"]["properties"];
    assert_eq!(
        case["description"],
        json!({ "type": "string", "maxLength": 1000, "nullable": true })
    );
    assert_eq!(
        case["subject"],
        json!({ "$ref": "#/components/schemas/Subject", "nullable": true })
    );
    assert_eq!(
        case["location"],
        json!({ "oneOf": [{ "type": "number" }, { "type": "number" }] })
    );
    assert_eq!(
        case["codes"],
        json!({ "oneOf": [{ "type": "string" }, { "type": "integer" }] })
    );
    assert_eq!(case["kind"], json!({ "type": "string" }));

    let audit = &document["components"]["schemas"]["AuditLog"]["properties"];
    assert!(audit["0"].get("user").is_none());
    assert_eq!(audit["owner"]["user"], "kept");
}

#[test]
fn test_fixture_document_has_no_stripped_keys() {
    let document = normalized_fixture();

    let mut keys = Vec::new();
    collect_keys(&document, &mut keys);

    for stripped in ["default", "const", "uniqueItems", "prefixItems", "anyOf", "securitySchemes"] {
        assert!(
            !keys.iter().any(|key| key == stripped),
            "'{}' should not survive normalization",
            stripped
        );
    }
}

#[test]
fn test_every_patch_rule_matches_generator_output() {
    for role in FileRole::ALL {
        let set = PatchSet::for_role(role).unwrap();

        let outcome = set.apply(&generated_fixture(role));

        assert!(
            outcome.report.is_complete(),
            "{} has unmatched rules: {:?}",
            role,
            outcome.report.unmatched()
        );
    }
}

#[test]
fn test_operations_patch_match_counts() {
    let set = PatchSet::for_role(FileRole::Operations).unwrap();

    let outcome = set.apply(&generated_fixture(FileRole::Operations));

    let counts: Vec<(&str, usize)> = outcome
        .report
        .rules
        .iter()
        .map(|rule| (rule.name, rule.matches))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("lint banner", 1),
            ("private param creators", 2),
            ("BASE_PATH argument", 2),
            ("private functional wrappers", 2),
            ("cascade disabled", 4),
            ("flatten enum names", 6),
            ("auth helper imports", 1),
            ("factory stubs", 2),
            ("singleton accessors", 2),
            ("base URL lookup", 2),
        ]
    );
}

#[test]
fn test_operations_patch_result() {
    let set = PatchSet::for_role(FileRole::Operations).unwrap();

    let text = set.apply(&generated_fixture(FileRole::Operations)).text;

    for tag in ["Cases", "Subjects"] {
        assert!(text.contains(&format!("\nconst {}ApiAxiosParamCreator = function", tag)));
        assert!(text.contains(&format!("\nconst {}ApiFp = function", tag)));
        assert!(!text.contains(&format!("{}ApiFactory", tag)));
        assert!(text.contains(&format!(
            "  public static getInstance(): {tag}Api {{\n    this.instance = this.instance || new {tag}Api();",
            tag = tag
        )));
    }
    assert!(!text.contains("this.basePath"));
    assert!(!text.contains("Enum"));
    assert!(text.contains("export const CaseStatus = {"));
}

#[test]
fn test_base_patch_result() {
    let set = PatchSet::for_role(FileRole::Base).unwrap();

    let text = set.apply(&generated_fixture(FileRole::Base)).text;

    assert!(text.contains("export const BASE_PATH = \"\";"));
    assert!(text.contains("export class ClientRuntime {"));
    assert!(text.contains("this.runtime.onRequest.reduce((prev, curr) => {"));
    assert!(text.contains("this.runtime.onResponseRejected.forEach(cb => cb(err));"));
    assert!(text.contains("export const COLLECTION_FORMATS = {"));
    assert!(text.contains("export class RequiredError extends Error {"));
    assert!(!text.contains("protected basePath"));
}

#[test]
fn test_patch_set_is_not_idempotent() {
    let set = PatchSet::for_role(FileRole::Entry).unwrap();

    let once = set.apply(&generated_fixture(FileRole::Entry)).text;
    let twice = set.apply(&once).text;

    assert_eq!(once.matches("export * from \"./base\";").count(), 1);
    assert_eq!(twice.matches("export * from \"./base\";").count(), 2);
}

#[test]
fn test_patch_generated_directory_strict() {
    let workspace = Workspace::new().unwrap();
    let dir = workspace.generated_dir();
    fs::create_dir_all(&dir).unwrap();
    for role in FileRole::ALL {
        fs::write(dir.join(role.file_name()), generated_fixture(role)).unwrap();
    }

    let reports = patch_generated_files(&dir, true).unwrap();

    assert_eq!(reports.len(), 5);
    assert!(reports.iter().all(|report| report.is_complete()));
    let configuration = fs::read_to_string(dir.join("configuration.ts")).unwrap();
    assert!(configuration.contains("this.defaultRequestTimeout = param.defaultRequestTimeout;"));
    assert!(!configuration.contains("basePath"));
}

#[test]
fn test_strict_patching_accepts_api_without_cascade_or_enums() {
    let workspace = Workspace::new().unwrap();
    let dir = workspace.generated_dir();
    fs::create_dir_all(&dir).unwrap();
    for role in FileRole::ALL {
        let mut content = generated_fixture(role);
        if role == FileRole::Operations {
            content = content
                .replace("cascade?: boolean", "force?: boolean")
                .replace("Enum", "Kind")
                .replace("enum", "kind");
        }
        fs::write(dir.join(role.file_name()), content).unwrap();
    }

    let reports = patch_generated_files(&dir, true).unwrap();

    let operations = &reports[4];
    assert_eq!(operations.role, FileRole::Operations);
    assert!(operations.is_complete());
    let api = fs::read_to_string(dir.join("api.ts")).unwrap();
    assert!(api.contains("force?: boolean"));
    assert!(api.contains("export const CaseStatusKind = {"));
}

/// Writes a stand-in generator that copies the fixture output and records its input.
#[cfg(unix)]
fn fake_generator(dir: &Path, received: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("openapi-generator-cli");
    let content = format!(
        "#!/bin/sh\n\
         # generate -i <input> -g typescript-axios --additional-properties=... -o <output>\n\
         [ \"$1\" = generate ] || exit 2\n\
         [ \"$5\" = typescript-axios ] || exit 3\n\
         mkdir -p \"$8\"\n\
         cp \"{fixtures}\"/*.ts \"$8\"/\n\
         cp \"$3\" \"{received}\"\n",
        fixtures = fixtures_dir().join("generated").display(),
        received = received.display()
    );
    fs::write(&script, content).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_pipeline_from_local_document() {
    let temp_dir = TempDir::new().unwrap();
    let received = temp_dir.path().join("received.json");
    let schema_output = temp_dir.path().join("normalized.yaml");
    let target_dir = temp_dir.path().join("client").join("src");
    fs::create_dir_all(&target_dir).unwrap();
    fs::write(target_dir.join("api.ts"), "stale").unwrap();

    let args = CliArgs {
        target_dir: target_dir.clone(),
        url: String::new(),
        input: Some(fixtures_dir().join("openapi_3_1.json")),
        generator: Some(fake_generator(temp_dir.path(), &received)),
        schema_output: Some(schema_output.clone()),
        schema_format: SchemaFormat::Yaml,
        strict: true,
        verbose: false,
    };

    run(args).expect("Pipeline should succeed");

    let sent: Value = serde_json::from_str(&fs::read_to_string(&received).unwrap()).unwrap();
    assert_eq!(sent, normalized_fixture());
    assert!(fs::read_to_string(&schema_output).unwrap().contains("retrieve_cases"));

    for role in FileRole::ALL {
        let placed = fs::read_to_string(target_dir.join(role.file_name())).unwrap();
        assert!(
            placed.starts_with("/* eslint-disable */\n// @ts-nocheck") || role == FileRole::Entry,
            "{} was not patched",
            role.file_name()
        );
    }
    let index = fs::read_to_string(target_dir.join("index.ts")).unwrap();
    assert!(index.ends_with("export * from \"./base\";\n"));
    let api = fs::read_to_string(target_dir.join("api.ts")).unwrap();
    assert!(api.contains("public static getInstance(): CasesApi {"));
}

#[cfg(unix)]
#[test]
fn test_pipeline_fails_when_generator_fails() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("failing-generator");
    fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    let target_dir = temp_dir.path().join("out");

    let args = CliArgs {
        target_dir: target_dir.clone(),
        url: String::new(),
        input: Some(fixtures_dir().join("openapi_3_1.json")),
        generator: Some(script),
        schema_output: None,
        schema_format: SchemaFormat::Json,
        strict: false,
        verbose: false,
    };

    let err = run(args).unwrap_err();

    assert!(err.to_string().contains("client generator failed"));
    assert!(!target_dir.exists());
}
