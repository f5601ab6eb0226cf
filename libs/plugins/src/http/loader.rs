//! Resolution of HTTP options for every interface of a module

use mosaic_binder::strcase;

use super::{
    format_name, InterfaceConfig, InterfaceOptions, MethodConfig, MethodOptions, ParamConfig,
    ParamOptions, ResultConfig, ResultOptions, BODY, COOKIE, DEFAULT_FORM_MAX_MEMORY, HEADER,
    PATH, QUERY,
};
use crate::error::Result;
use crate::model::{Interface, Method};
use crate::plugin::Collector;

/// Decode and post-process the HTTP options of every interface
///
/// A method whose signature does not start with a context or does not end
/// with an error is reported and left out of the result.
pub(crate) fn load(collector: &mut Collector<'_>, interfaces: &[Interface]) -> Result<Vec<InterfaceConfig>> {
    let mut configs = Vec::with_capacity(interfaces.len());

    for iface in interfaces {
        let options: InterfaceOptions =
            collector.decode(&iface.name, &iface.name, &iface.comments)?;

        let mut config = InterfaceConfig {
            name: iface.name.clone(),
            options,
            methods: Vec::with_capacity(iface.methods.len()),
        };

        for method in &iface.methods {
            if let Some(method) = load_method(collector, &config.options, iface, method)? {
                config.methods.push(method);
            }
        }

        tracing::debug!(
            interface = %iface.name,
            methods = config.methods.len(),
            "loaded http interface"
        );
        configs.push(config);
    }

    Ok(configs)
}

fn load_method(
    collector: &mut Collector<'_>,
    iface_options: &InterfaceOptions,
    iface: &Interface,
    method: &Method,
) -> Result<Option<MethodConfig>> {
    let path = format!("{}.{}", iface.name, method.name);
    let mut options: MethodOptions = collector.decode(&path, &method.name, &method.comments)?;

    if options.form_max_memory == 0 {
        options.form_max_memory = DEFAULT_FORM_MAX_MEMORY;
    }
    if options.default.accept.is_empty() {
        options.default.accept = iface_options.default.accept.clone();
    }
    if options.default.content_type.is_empty() {
        options.default.content_type = iface_options.default.content_type.clone();
    }
    for wrap in [&mut options.wrap_req, &mut options.wrap_resp] {
        if !wrap.path.is_empty() {
            wrap.path_parts = wrap.path.split('.').map(str::to_string).collect();
        }
    }

    if !method.params.first().is_some_and(|p| p.is_context) {
        collector.fail(
            format!("{path}: invalid method signature, the first parameter must be a context"),
            method.position.as_ref(),
        );
        return Ok(None);
    }

    let mut config = MethodConfig {
        name: method.name.clone(),
        options,
        ..Default::default()
    };

    for param in &method.params {
        let mut options: ParamOptions = collector.decode(
            &format!("{path}.{}", param.name),
            &param.name,
            &param.comments,
        )?;

        if param.is_context {
            config.context = Some(param.name.clone());
        }
        if options.http_type.is_empty() {
            options.http_type = BODY.to_string();
        }

        config.params.push(ParamConfig {
            var: param.name.clone(),
            type_name: param.type_name.clone(),
            name: format_name(&options.name.value, &param.name, &options.name.format),
            options,
            path_param_index: None,
            path_param_name: None,
        });
    }

    for (index, segment) in config.options.path.split('/').enumerate() {
        let Some(name) = segment.strip_prefix(':') else {
            continue;
        };
        for param in config
            .params
            .iter_mut()
            .filter(|p| strcase::to_lower_camel(&p.var) == name)
        {
            param.options.http_type = PATH.to_string();
            param.options.required = true;
            param.path_param_index = Some(index);
            param.path_param_name = Some(name.to_string());
        }
    }

    for (param, var) in config.params.iter().zip(&method.params) {
        if var.is_context {
            continue;
        }
        let group = match param.options.http_type.as_str() {
            QUERY => &mut config.query_params,
            HEADER => &mut config.header_params,
            COOKIE => &mut config.cookie_params,
            PATH => &mut config.path_params,
            _ => &mut config.body_params,
        };
        group.push(param.var.clone());
    }

    if !method.results.last().is_some_and(|r| r.is_error) {
        collector.fail(
            format!("{path}: invalid method signature, the last result must be an error"),
            method.position.as_ref(),
        );
        return Ok(None);
    }

    for result in &method.results {
        let options: ResultOptions = collector.decode(
            &format!("{path}.{}", result.name),
            &result.name,
            &result.comments,
        )?;

        if result.is_error {
            config.error = Some(result.name.clone());
        } else {
            let group = match options.http_type.as_str() {
                HEADER => &mut config.header_results,
                COOKIE => &mut config.cookie_results,
                _ => &mut config.body_results,
            };
            group.push(result.name.clone());
        }

        config.results.push(ResultConfig {
            var: result.name.clone(),
            type_name: result.type_name.clone(),
            name: format_name(&options.name.value, &result.name, &options.name.format),
            options,
        });
    }

    Ok(Some(config))
}
