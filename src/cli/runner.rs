//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::confirm::PromptConfirmer;
use crate::engine::{Engine, Operation};
use crate::error::{Error, Result};
use crate::invoker::HttpInvoker;
use crate::loader::{load_service, ServiceDefinition};
use crate::services;
use crate::sink::JsonLinesSink;
use crate::types::{JsonObject, JsonValue};
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;

/// Options of the `invoke` command
#[derive(Debug, Clone, Default)]
pub struct InvokeArgs {
    /// Operation or command name
    pub operation: String,
    /// Name=Value parameters
    pub params: Vec<(String, String)>,
    /// JSON object of parameters
    pub params_json: Option<String>,
    /// Select rule
    pub select: Option<String>,
    /// Legacy pass-thru switch
    pub pass_thru: bool,
    /// Starting cursor
    pub next_token: Option<String>,
    /// Single page only
    pub no_auto_iteration: bool,
    /// Skip confirmation
    pub force: bool,
    /// Keep arrays as one document
    pub no_enumerate: bool,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Invoke {
                operation,
                params,
                params_json,
                select,
                pass_thru,
                next_token,
                no_auto_iteration,
                force,
                no_enumerate,
            } => {
                let args = InvokeArgs {
                    operation: operation.clone(),
                    params: params.clone(),
                    params_json: params_json.clone(),
                    select: select.clone(),
                    pass_thru: *pass_thru,
                    next_token: next_token.clone(),
                    no_auto_iteration: *no_auto_iteration,
                    force: *force,
                    no_enumerate: *no_enumerate,
                };
                self.invoke(&args).await
            }
            Commands::List => self.list_services(),
            Commands::Operations => self.operations(),
            Commands::Validate { file } => self.validate(file),
        }
    }

    /// Load service definition
    fn load_service(&self) -> Result<ServiceDefinition> {
        let service = self
            .cli
            .service
            .as_ref()
            .ok_or_else(|| Error::config("Service not specified (use -s flag)"))?;
        load_service(service)
    }

    /// Invoke one operation and stream projected values to stdout
    async fn invoke(&self, args: &InvokeArgs) -> Result<()> {
        let service = self.load_service()?;
        let def = service.operation(&args.operation)?;

        let raw = collect_params(&args.params, args.params_json.as_deref())?;
        let bound = def.bind(raw)?;

        let mut builder = def
            .context_builder()
            .params(bound)
            .select_opt(args.select.clone())
            .pass_thru(args.pass_thru)
            .no_auto_iteration(args.no_auto_iteration)
            .force(args.force);
        if let Some(token) = &args.next_token {
            builder = builder.starting_cursor(Some(token.clone()));
        }
        let context = builder.build()?;

        let operation = Operation::from_definition(&service, def);
        let invoker = HttpInvoker::for_service(&service, self.cli.endpoint_url.as_deref())?;
        let mut engine = Engine::new(invoker).with_confirmer(PromptConfirmer::stdio());

        let mut sink = JsonLinesSink::new(std::io::stdout())
            .with_pretty(self.cli.format == OutputFormat::Pretty)
            .with_enumerate(!args.no_enumerate);

        let summary = engine.run(&operation, &context, &mut sink).await?;

        if context.manual_control() {
            if let Some(cursor) = &summary.last_cursor {
                info!("More results are available; continue with --next-token {cursor}");
            }
        }

        Ok(())
    }

    /// List operations of the selected service
    fn operations(&self) -> Result<()> {
        let service = self.load_service()?;

        let operations: Vec<Value> = service
            .operations
            .iter()
            .map(|op| {
                let parameters: Vec<Value> = op
                    .parameters
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "type": p.param_type,
                            "required": p.required,
                            "description": p.description
                        })
                    })
                    .collect();

                json!({
                    "name": op.name,
                    "command": op.command,
                    "description": op.description,
                    "mutating": op.mutating,
                    "paginated": op.pagination.is_some(),
                    "default_select": op.default_select.as_deref().unwrap_or("*"),
                    "pass_thru_param": op.pass_thru_param,
                    "parameters": parameters
                })
            })
            .collect();

        self.output_message(&json!({
            "service": service.name,
            "title": service.display_name(),
            "operations": operations
        }));

        Ok(())
    }

    /// Validate a definition file
    fn validate(&self, file: &Path) -> Result<()> {
        let service = load_service(file)?;

        self.output_message(&json!({
            "valid": true,
            "message": format!(
                "Service '{}' is valid with {} operations",
                service.name,
                service.operations.len()
            )
        }));

        Ok(())
    }

    /// List built-in services
    fn list_services(&self) -> Result<()> {
        let mut entries = Vec::new();
        for name in services::list_builtin() {
            let service = load_service(name)?;
            entries.push(json!({
                "name": service.name,
                "title": service.display_name(),
                "endpoint": service.base_url,
                "operations": service
                    .operations
                    .iter()
                    .map(|op| op.display_name().to_string())
                    .collect::<Vec<_>>()
            }));
        }

        self.output_message(&json!({ "services": entries }));

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Merge `Name=Value` pairs over an optional JSON object of parameters
pub fn collect_params(pairs: &[(String, String)], params_json: Option<&str>) -> Result<JsonObject> {
    let mut params = match params_json {
        Some(text) => match serde_json::from_str::<JsonValue>(text)? {
            JsonValue::Object(map) => map,
            _ => return Err(Error::config("--params-json must be a JSON object")),
        },
        None => JsonObject::new(),
    };

    for (name, value) in pairs {
        params.insert(name.clone(), JsonValue::String(value.clone()));
    }
    Ok(params)
}
