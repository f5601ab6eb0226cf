//! HTTP plugin loading against the users fixture

use std::path::PathBuf;

use mosaic_binder::{RuleRegistry, Severity};
use mosaic_plugins::http::{InterfaceConfig, MethodConfig, DEFAULT_FORM_MAX_MEMORY};
use mosaic_plugins::{HttpPlugin, Loaded, Module, Plugin};

fn fixture() -> Module {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.json");
    Module::from_path(path).unwrap()
}

fn load() -> Loaded<Vec<InterfaceConfig>> {
    HttpPlugin
        .load_interfaces(&fixture(), &RuleRegistry::default())
        .unwrap()
}

fn method<'a>(loaded: &'a Loaded<Vec<InterfaceConfig>>, name: &str) -> &'a MethodConfig {
    loaded.config[0]
        .methods
        .iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("method {name} not loaded"))
}

#[test]
fn test_interface_options() {
    let loaded = load();
    assert_eq!(loaded.config.len(), 1);

    let users = &loaded.config[0];
    assert_eq!(users.name, "Users");
    assert_eq!(users.options.default.accept, "application/json");
    assert_eq!(users.options.default.content_type, "application/json");
    assert!(users.options.copy_dto_types);
}

#[test]
fn test_methods_with_bad_signature_are_skipped() {
    let loaded = load();
    let names: Vec<&str> = loaded.config[0]
        .methods
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Get", "Delete", "Create"]);

    let broken = loaded
        .diagnostics
        .failures()
        .find(|d| d.message.contains("Users.Broken"))
        .unwrap();
    assert_eq!(
        broken.to_string(),
        "users.go:20:2: Users.Broken: invalid method signature, the first parameter must be a context"
    );
}

#[test]
fn test_method_defaults_and_inheritance() {
    let loaded = load();

    let get = method(&loaded, "Get");
    assert_eq!(get.options.method, "GET");
    assert_eq!(get.options.form_max_memory, DEFAULT_FORM_MAX_MEMORY);
    assert_eq!(get.options.default.accept, "application/json");
    assert_eq!(get.options.default.content_type, "application/json");
    assert_eq!(get.options.openapi.tags, vec!["users", "public"]);
    assert_eq!(get.options.wrap_resp.path, "data.user");
    assert_eq!(get.options.wrap_resp.path_parts, vec!["data", "user"]);
    assert!(get.options.wrap_req.path_parts.is_empty());

    let query = &get.options.query.values;
    assert_eq!(query.len(), 1);
    assert_eq!(query[0].name, "perpage");
    assert_eq!(query[0].values, vec!["perpage", "10"]);

    let create = method(&loaded, "Create");
    // The method default is left empty; generators fall back to POST
    assert_eq!(create.options.method, "");
    assert_eq!(create.options.form_max_memory, 1024);
    assert_eq!(create.options.default.content_type, "multipart/form-data");
    assert_eq!(create.options.default.accept, "application/json");
    assert!(create.options.single.req);
    assert!(!create.options.single.resp);
    assert!(create.options.use_opt.multipart);
}

#[test]
fn test_params_are_partitioned() {
    let loaded = load();
    let get = method(&loaded, "Get");

    assert_eq!(get.context.as_deref(), Some("ctx"));
    assert_eq!(get.path_params, vec!["userId"]);
    assert_eq!(get.query_params, vec!["filter"]);
    assert!(get.body_params.is_empty());

    let user_id = &get.params[1];
    assert_eq!(user_id.options.http_type, "path");
    assert!(user_id.options.required);
    assert_eq!(user_id.path_param_index, Some(2));
    assert_eq!(user_id.path_param_name.as_deref(), Some("userId"));

    let filter = &get.params[2];
    assert_eq!(filter.name, "q");
    assert!(filter.options.name.omitempty);
    assert_eq!(filter.path_param_index, None);

    let create = method(&loaded, "Create");
    assert_eq!(create.header_params, vec!["userName"]);
    assert_eq!(create.cookie_params, vec!["token"]);
    assert_eq!(create.body_params, vec!["profile"]);
    assert_eq!(create.params[1].name, "USER-NAME");
    assert_eq!(create.params[2].name, "token");
    assert_eq!(create.params[3].options.http_type, "body");
}

#[test]
fn test_results_are_partitioned() {
    let loaded = load();

    let get = method(&loaded, "Get");
    assert_eq!(get.error.as_deref(), Some("err"));
    assert_eq!(get.body_results, vec!["userProfile"]);
    assert_eq!(get.results[0].name, "user_profile");
    assert_eq!(get.results.len(), 2);

    let create = method(&loaded, "Create");
    assert_eq!(create.header_results, vec!["requestID"]);
    assert_eq!(create.results[0].name, "X-Request-ID");
    assert!(create.body_results.is_empty());
}

#[test]
fn test_diagnostics() {
    let loaded = load();
    let diagnostics = &loaded.diagnostics;

    assert!(loaded.has_failures());
    assert_eq!(diagnostics.failure_count(), 3);
    assert_eq!(diagnostics.warning_count(), 1);

    let method = diagnostics
        .failures()
        .find(|d| d.key.as_deref() == Some("http-method"))
        .unwrap();
    assert!(method
        .message
        .starts_with("http-method: value \"FETCH\" is not one of [GET"));
    assert_eq!(method.position.as_ref().unwrap().line, 17);

    let format = diagnostics
        .failures()
        .find(|d| d.key.as_deref() == Some("http-name"))
        .unwrap();
    assert!(format
        .message
        .starts_with("http-name format: value \"bogus\" is not one of"));

    let unused = diagnostics.warnings().next().unwrap();
    assert_eq!(unused.severity, Severity::Warning);
    assert_eq!(
        unused.message,
        "http-unknown: annotation is not used by the http plugin"
    );
    assert_eq!(unused.position.as_ref().unwrap().line, 6);
}

#[test]
fn test_trace_paths() {
    let loaded = load();
    let trace = &loaded.trace;

    assert!(trace.contains("Users.InterfaceOptions.copy_dto_types"));
    assert!(trace.contains("Users.Get.MethodOptions.method"));
    assert!(trace.contains("Users.Get.MethodOptions.query.values[0]"));
    assert!(trace.contains("Users.Get.filter.ParamOptions.name.omitempty"));

    let entry = trace.get("Users.Get.MethodOptions.path").unwrap();
    assert_eq!(entry.annotation.value(), "/users/:userId");
    assert_eq!(entry.position.line, 11);

    // Unset fields leave no entry
    assert!(!trace.contains("Users.Create.MethodOptions.method"));
}

#[test]
fn test_erased_report() {
    let report = HttpPlugin
        .load(&fixture(), &RuleRegistry::default())
        .unwrap();

    assert_eq!(report.config[0]["name"], "Users");
    let get = &report.config[0]["methods"][0];
    assert_eq!(get["options"]["use"]["multipart"], false);
    assert_eq!(get["params"][1]["path_param_index"], 2);
    assert!(get["params"][2].get("path_param_index").is_none());
    assert_eq!(report.diagnostics.failure_count(), 3);
}

#[test]
fn test_empty_module() {
    let loaded = HttpPlugin
        .load_interfaces(&Module::default(), &RuleRegistry::default())
        .unwrap();
    assert!(loaded.config.is_empty());
    assert!(loaded.diagnostics.is_empty());
    assert!(loaded.trace.is_empty());
}

#[test]
fn test_conversion_failure_keeps_default() {
    let module = Module::from_json(
        r#"{"interfaces": [{
            "name": "Files",
            "methods": [{
                "name": "Upload",
                "comments": [{"text": "// @http-form-max-memory lots", "position": {"file": "f.go", "line": 3}}],
                "params": [{"name": "ctx", "is_context": true}],
                "results": [{"name": "err", "is_error": true}]
            }]
        }]}"#,
    )
    .unwrap();

    let loaded = HttpPlugin
        .load_interfaces(&module, &RuleRegistry::default())
        .unwrap();
    assert_eq!(loaded.diagnostics.failure_count(), 1);

    let failure = loaded.diagnostics.failures().next().unwrap();
    assert!(failure
        .message
        .starts_with("http-form-max-memory: cannot parse \"lots\" as int64"));
    assert_eq!(failure.position.as_ref().unwrap().to_string(), "f.go:3");

    let upload = &loaded.config[0].methods[0];
    assert_eq!(upload.options.form_max_memory, DEFAULT_FORM_MAX_MEMORY);
    assert!(!loaded.trace.contains("Files.Upload.MethodOptions.form_max_memory"));
}
