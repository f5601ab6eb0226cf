//! Annotation tables of the HTTP generator
//!
//! Interface, method, parameter and result options, each read from the
//! `http-*` annotations written above the matching declaration.

use std::sync::OnceLock;

use mosaic_binder::{field, Bind, Schema};
use serde::Serialize;

/// HTTP verbs accepted by `@http-method`
pub const METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

pub const DEFAULT_METHOD: &str = "POST";

/// Wire name formats accepted by `@http-name ... format=`
pub const NAME_FORMATS: [&str; 5] = ["lowerCamel", "kebab", "screamingKebab", "snake", "screamingSnake"];

pub const DEFAULT_NAME_FORMAT: &str = "lowerCamel";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefaultOpt {
    pub content_type: String,
    pub accept: String,
}

impl Bind for DefaultOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<DefaultOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("DefaultOpt")
                .scalar(field("content_type"), |d| &mut d.content_type)
                .scalar(field("accept"), |d| &mut d.accept)
                .build()
        })
    }
}

/// `@http-default-*` and `@http-copy-dto-types` above an interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceOptions {
    pub default: DefaultOpt,
    pub copy_dto_types: bool,
}

impl Bind for InterfaceOptions {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<InterfaceOptions>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("InterfaceOptions")
                .group(field("default"), |i| &mut i.default)
                .flag(field("copy_dto_types"), |i| &mut i.copy_dto_types)
                .build()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenapiOpt {
    pub tags: Vec<String>,
}

impl Bind for OpenapiOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<OpenapiOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("OpenapiOpt")
                .list(field("tags"), |o| &mut o.tags)
                .build()
        })
    }
}

/// One `@http-query-value <name> <values>...` line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryValue {
    pub name: String,
    /// All options of the line, the name included
    pub values: Vec<String>,
}

impl Bind for QueryValue {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<QueryValue>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("QueryValue")
                .scalar(field("name").from_value().required(), |q| &mut q.name)
                .options(field("values"), |q| &mut q.values)
                .build()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryOpt {
    pub values: Vec<QueryValue>,
}

impl Bind for QueryOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<QueryOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("QueryOpt")
                .inline_list(field("values").named("value"), |q| &mut q.values)
                .build()
        })
    }
}

/// Dotted path a request or response body is nested under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WrapOpt {
    pub path: String,
    pub path_parts: Vec<String>,
}

impl Bind for WrapOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<WrapOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("WrapOpt")
                .scalar(field("path"), |w| &mut w.path)
                .build()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SingleOpt {
    pub req: bool,
    pub resp: bool,
}

impl Bind for SingleOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<SingleOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("SingleOpt")
                .flag(field("req"), |s| &mut s.req)
                .flag(field("resp"), |s| &mut s.resp)
                .build()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UseOpt {
    pub multipart: bool,
    pub url_encoded: bool,
}

impl Bind for UseOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<UseOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("UseOpt")
                .flag(field("multipart"), |u| &mut u.multipart)
                .flag(field("url_encoded"), |u| &mut u.url_encoded)
                .build()
        })
    }
}

/// Options above an interface method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodOptions {
    pub time_format: String,
    pub method: String,
    pub path: String,
    pub openapi: OpenapiOpt,
    pub form_max_memory: i64,
    pub query: QueryOpt,
    pub wrap_req: WrapOpt,
    pub wrap_resp: WrapOpt,
    pub single: SingleOpt,
    pub default: DefaultOpt,
    #[serde(rename = "use")]
    pub use_opt: UseOpt,
}

impl Bind for MethodOptions {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<MethodOptions>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("MethodOptions")
                .scalar(field("time_format"), |m| &mut m.time_format)
                .scalar(
                    field("method").one_of(METHODS).default_value(DEFAULT_METHOD),
                    |m| &mut m.method,
                )
                .scalar(field("path"), |m| &mut m.path)
                .group(field("openapi"), |m| &mut m.openapi)
                .scalar(field("form_max_memory"), |m| &mut m.form_max_memory)
                .group(field("query"), |m| &mut m.query)
                .group(field("wrap_req"), |m| &mut m.wrap_req)
                .group(field("wrap_resp"), |m| &mut m.wrap_resp)
                .group(field("single"), |m| &mut m.single)
                .group(field("default"), |m| &mut m.default)
                .group(field("use_opt").named("use"), |m| &mut m.use_opt)
                .build()
        })
    }
}

/// `@http-name [value] [omitempty] [format=...]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameOpt {
    pub value: String,
    pub omitempty: bool,
    pub format: String,
}

impl Bind for NameOpt {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<NameOpt>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("NameOpt")
                .scalar(field("value").from_value(), |n| &mut n.value)
                .option_flag(field("omitempty"), |n| &mut n.omitempty)
                .scalar(
                    field("format")
                        .from_param()
                        .one_of(NAME_FORMATS)
                        .default_value(DEFAULT_NAME_FORMAT),
                    |n| &mut n.format,
                )
                .build()
        })
    }
}

/// Options above a method parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamOptions {
    pub name: NameOpt,
    pub http_type: String,
    pub required: bool,
}

impl Bind for ParamOptions {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ParamOptions>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("ParamOptions")
                .inline(field("name"), |p| &mut p.name)
                .scalar(field("http_type").named("type"), |p| &mut p.http_type)
                .flag(field("required"), |p| &mut p.required)
                .build()
        })
    }
}

/// Options above a method result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultOptions {
    pub name: NameOpt,
    pub http_type: String,
    pub required: bool,
    pub flat: bool,
}

impl Bind for ResultOptions {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ResultOptions>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("ResultOptions")
                .inline(field("name"), |r| &mut r.name)
                .scalar(field("http_type").named("type"), |r| &mut r.http_type)
                .flag(field("required"), |r| &mut r.required)
                .flag(field("flat"), |r| &mut r.flat)
                .build()
        })
    }
}
