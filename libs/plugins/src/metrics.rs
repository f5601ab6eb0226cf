//! Metrics middleware generator configuration

use std::sync::OnceLock;

use mosaic_binder::{field, Bind, RuleRegistry, Schema};
use serde::Serialize;

use crate::error::Result;
use crate::model::Module;
use crate::plugin::{Collector, LoadReport, Loaded, Plugin};

pub const PREFIX: &str = "metrics";

/// `@metrics-skip` above a method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsMethodOptions {
    pub skip: bool,
}

impl Bind for MetricsMethodOptions {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<MetricsMethodOptions>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("MetricsMethodOptions")
                .flag(field("skip"), |m| &mut m.skip)
                .build()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsMethod {
    pub name: String,
    pub options: MetricsMethodOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsInterface {
    pub name: String,
    pub methods: Vec<MetricsMethod>,
}

/// Loader for `@metrics-*` annotations
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsPlugin;

impl MetricsPlugin {
    pub fn load_interfaces(
        &self,
        module: &Module,
        rules: &RuleRegistry,
    ) -> Result<Loaded<Vec<MetricsInterface>>> {
        let mut collector = Collector::new(self, rules);
        let mut interfaces = Vec::with_capacity(module.interfaces.len());

        for iface in &module.interfaces {
            collector.scan(&iface.name, &iface.comments);

            let mut methods = Vec::with_capacity(iface.methods.len());
            for method in &iface.methods {
                let options: MetricsMethodOptions = collector.decode(
                    &format!("{}.{}", iface.name, method.name),
                    &method.name,
                    &method.comments,
                )?;
                methods.push(MetricsMethod {
                    name: method.name.clone(),
                    options,
                });
            }

            interfaces.push(MetricsInterface {
                name: iface.name.clone(),
                methods,
            });
        }

        Ok(collector.finish(interfaces))
    }
}

impl Plugin for MetricsPlugin {
    fn name(&self) -> &'static str {
        "metrics-middleware"
    }

    fn prefix(&self) -> &'static str {
        PREFIX
    }

    fn load(&self, module: &Module, rules: &RuleRegistry) -> Result<LoadReport> {
        self.load_interfaces(module, rules)?.into_report()
    }
}
