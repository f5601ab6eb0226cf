//! Rule checks, custom rules and schema usage errors

use std::collections::BTreeMap;
use std::sync::OnceLock;

use mosaic_annotation::{AnnotationIndex, Position};
use mosaic_binder::{
    field, Bind, Decoder, FieldValue, Rule, RuleContext, RuleRegistry, RuleSpec, Schema,
    SchemaError, Severity,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Endpoint {
    method: String,
    path: String,
    timeout: u32,
    summary: String,
}

impl Bind for Endpoint {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Endpoint>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Endpoint")
                .scalar(
                    field("method")
                        .one_of(["GET", "POST", "DELETE"])
                        .default_value("POST"),
                    |e| &mut e.method,
                )
                .scalar(field("path").required(), |e| &mut e.path)
                .scalar(field("timeout"), |e| &mut e.timeout)
                .scalar(field("summary"), |e| &mut e.summary)
                .build()
        })
    }
}

fn index(lines: &[&str]) -> AnnotationIndex {
    AnnotationIndex::from_lines(
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| (*l, Position::new("api.go", i + 10, 1))),
    )
    .0
}

#[test]
fn test_required_reports_once_and_siblings_bind() {
    let rules = RuleRegistry::default();
    let decoded = Decoder::new(&rules)
        .decode::<Endpoint>("http", &index(&["@http-method GET", "@http-timeout 30"]))
        .unwrap();

    assert_eq!(decoded.value.method, "GET");
    assert_eq!(decoded.value.timeout, 30);
    assert_eq!(decoded.diagnostics.len(), 1);
    let failure = decoded.diagnostics.iter().next().unwrap();
    assert_eq!(failure.severity, Severity::Failure);
    assert_eq!(failure.key.as_deref(), Some("http-path"));
    assert_eq!(failure.message, "http-path: required");
    assert!(failure.position.is_none());
}

#[test]
fn test_required_position_when_present_but_empty() {
    let rules = RuleRegistry::default();
    let decoded = Decoder::new(&rules)
        .decode::<Endpoint>("http", &index(&["@http-path"]))
        .unwrap();

    let failure = decoded.diagnostics.iter().next().unwrap();
    assert_eq!(failure.position.as_ref().unwrap().line, 10);
    assert_eq!(failure.to_string(), "api.go:10:1: http-path: required");
}

#[test]
fn test_one_of() {
    let rules = RuleRegistry::default();
    let decoder = Decoder::new(&rules);

    let inside = decoder
        .decode::<Endpoint>("http", &index(&["@http-method DELETE", "@http-path /x"]))
        .unwrap();
    assert!(inside.diagnostics.is_empty());

    let outside = decoder
        .decode::<Endpoint>("http", &index(&["@http-method FETCH", "@http-path /x"]))
        .unwrap();
    assert_eq!(outside.diagnostics.failure_count(), 1);
    assert!(outside.diagnostics.summary().contains("FETCH"));
}

#[test]
fn test_one_of_default_is_not_persisted() {
    let rules = RuleRegistry::default();
    let decoded = Decoder::new(&rules)
        .decode::<Endpoint>("http", &index(&["@http-path /x"]))
        .unwrap();

    assert!(decoded.diagnostics.is_empty());
    assert_eq!(decoded.value.method, "");
}

#[test]
fn test_failures_do_not_hide_each_other() {
    let rules = RuleRegistry::default();
    let decoded = Decoder::new(&rules)
        .decode::<Endpoint>(
            "http",
            &index(&["@http-method FETCH", "@http-timeout soon", "@http-summary ok"]),
        )
        .unwrap();

    assert_eq!(decoded.value.summary, "ok");
    assert_eq!(decoded.diagnostics.failure_count(), 3);
    let keys: Vec<&str> = decoded
        .diagnostics
        .iter()
        .filter_map(|d| d.key.as_deref())
        .collect();
    assert_eq!(keys, vec!["http-method", "http-path", "http-timeout"]);
}

#[test]
fn test_idempotent_decoding() {
    let rules = RuleRegistry::default();
    let idx = index(&["@http-method FETCH", "@http-timeout 5"]);
    let decoder = Decoder::new(&rules);

    let first = decoder.decode::<Endpoint>("http", &idx).unwrap();
    let second = decoder.decode::<Endpoint>("http", &idx).unwrap();
    assert_eq!(first.value, second.value);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.trace, second.trace);
}

struct Absolute;

impl Rule for Absolute {
    fn check(&self, value: &dyn FieldValue, ctx: &RuleContext<'_>) -> Result<(), String> {
        let prefix = ctx.param("prefix").unwrap_or("/");
        match value.as_text() {
            Some(text) if text.starts_with(prefix) => Ok(()),
            _ => Err(format!("{}: must start with {prefix}", ctx.subject)),
        }
    }
}

#[derive(Debug, Default)]
struct Mount {
    path: String,
}

impl Bind for Mount {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Mount>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Mount")
                .scalar(
                    field("path").rule(RuleSpec::new("absolute").with_param("prefix", "/api")),
                    |m| &mut m.path,
                )
                .build()
        })
    }
}

#[test]
fn test_custom_rule() {
    let mut rules = RuleRegistry::default();
    rules.register("absolute", Absolute);
    let decoder = Decoder::new(&rules);

    let ok = decoder
        .decode::<Mount>("svc", &index(&["@svc-path /api/users"]))
        .unwrap();
    assert!(ok.diagnostics.is_empty());

    let bad = decoder
        .decode::<Mount>("svc", &index(&["@svc-path users"]))
        .unwrap();
    assert_eq!(
        bad.diagnostics.iter().next().unwrap().message,
        "svc-path: must start with /api"
    );
}

#[test]
fn test_unknown_rule_is_a_schema_error() {
    let rules = RuleRegistry::default();
    let err = Decoder::new(&rules)
        .decode::<Mount>("svc", &AnnotationIndex::new())
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownRule {
            schema: "Mount",
            field: "path",
            rule: "absolute".into(),
        }
    );
}

#[derive(Debug, Default)]
struct Duplicated {
    a: String,
    b: String,
}

impl Bind for Duplicated {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Duplicated>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Duplicated")
                .scalar(field("a").named("same"), |d| &mut d.a)
                .scalar(field("b").named("same"), |d| &mut d.b)
                .build()
        })
    }
}

#[derive(Debug, Default)]
struct Loose {
    value: String,
}

impl Bind for Loose {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Loose>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Loose")
                .scalar(field("value").from_param(), |l| &mut l.value)
                .build()
        })
    }
}

#[derive(Debug, Default)]
struct Outer {
    inner: Nesting,
}

#[derive(Debug, Default)]
struct Nesting {
    deeper: Loose,
}

impl Bind for Outer {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Outer>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Outer")
                .inline(field("inner"), |o| &mut o.inner)
                .build()
        })
    }
}

impl Bind for Nesting {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Nesting>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Nesting")
                .group(field("deeper"), |n| &mut n.deeper)
                .build()
        })
    }
}

#[derive(Debug, Default)]
struct RuledGroup {
    inner: Endpoint,
}

impl Bind for RuledGroup {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<RuledGroup>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("RuledGroup")
                .group(field("inner").required(), |r| &mut r.inner)
                .build()
        })
    }
}

#[test]
fn test_schema_errors_abort_the_call() {
    let rules = RuleRegistry::default();
    let decoder = Decoder::new(&rules);
    let idx = index(&["@x-same a"]);

    assert!(matches!(
        decoder.decode::<Duplicated>("x", &idx),
        Err(SchemaError::DuplicateName { schema: "Duplicated", .. })
    ));
    assert!(matches!(
        decoder.decode::<Loose>("x", &idx),
        Err(SchemaError::InlineOnly {
            field: "value",
            policy: "fromParam",
            ..
        })
    ));
    assert!(matches!(
        decoder.decode::<Outer>("x", &idx),
        Err(SchemaError::NestedInline {
            schema: "Nesting",
            field: "deeper",
        })
    ));
    assert!(matches!(
        decoder.decode::<RuledGroup>("x", &idx),
        Err(SchemaError::RuleOnComposite { field: "inner", .. })
    ));
}

#[test]
fn test_diagnostics_serialize() {
    let rules = RuleRegistry::default();
    let decoded = Decoder::new(&rules)
        .decode::<Endpoint>("http", &index(&["@http-method GET"]))
        .unwrap();

    let json = serde_json::to_value(&decoded.diagnostics).unwrap();
    assert_eq!(json[0]["severity"], "failure");
    assert_eq!(json[0]["key"], "http-path");
    assert!(json[0].get("position").is_none());

    let trace = serde_json::to_value(&decoded.trace).unwrap();
    let entry = &trace["Endpoint.method"];
    assert_eq!(entry["annotation"]["key"], "http-method");
    assert_eq!(entry["position"]["line"], 10);
    let _: BTreeMap<String, serde_json::Value> = serde_json::from_value(trace).unwrap();
}
