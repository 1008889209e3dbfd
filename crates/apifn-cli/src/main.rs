use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use apifn_core::load_api_file;
use apifn_http::{Arguments, Function, HttpSettings, Module, SETTINGS_FILE_NAME, load_settings};

#[derive(Parser)]
#[command(name = "apifn", about = "Call API descriptions as functions", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the functions of an API description
    Inspect {
        /// Path to the API description (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Validate an API description, or arguments against one of its functions
    Validate {
        /// Path to the API description
        #[arg(short, long)]
        input: PathBuf,

        /// Function id to validate arguments against
        #[arg(short, long)]
        function: Option<String>,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Call a function and print the decoded response body
    Call {
        /// Path to the API description
        #[arg(short, long)]
        input: PathBuf,

        /// Function id
        #[arg(short, long)]
        function: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// Call even if the arguments do not validate
        #[arg(long)]
        skip_validation: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Overrides for the settings file.
#[derive(clap::Args)]
struct ConnectionArgs {
    /// Base URI, overriding the description's baseUri
    #[arg(long)]
    base_uri: Option<String>,

    /// User name for basic auth
    #[arg(long)]
    user: Option<String>,

    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,

    /// Bearer access token
    #[arg(long)]
    token: Option<String>,

    /// Settings file
    #[arg(long, default_value = SETTINGS_FILE_NAME)]
    settings: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Validate {
            input,
            function,
            args,
        } => cmd_validate(&input, function.as_deref(), &args),

        Commands::Call {
            input,
            function,
            args,
            connection,
            skip_validation,
        } => cmd_call(&input, &function, &args, &connection, skip_validation),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apifn", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_module(path: &Path) -> Result<Module> {
    let api = load_api_file(path).with_context(|| format!("failed to load {}", path.display()))?;
    Ok(Module::new(api))
}

fn find_function<'a>(module: &'a Module, id: &str) -> Result<&'a Function> {
    module.function(id).with_context(|| {
        let known: Vec<&str> = module.functions().iter().map(|f| f.id()).collect();
        format!("unknown function `{id}` (available: {})", known.join(", "))
    })
}

fn parse_arguments(raw: &str) -> Result<Arguments> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("arguments are not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("arguments must be a JSON object"),
    }
}

/// Flags first, then the settings file, then what the description declares.
fn resolve_settings(connection: &ConnectionArgs, declared: HttpSettings) -> Result<HttpSettings> {
    let flags = HttpSettings {
        base_uri: connection.base_uri.clone(),
        user: connection.user.clone(),
        password: connection.password.clone(),
        access_token: connection.token.clone(),
    };
    let file = load_settings(&connection.settings)?.unwrap_or_default();
    Ok(flags.or(file).or(declared))
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let module = load_module(input)?;
    let summary = build_inspect_summary(&module);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_validate(input: &Path, function: Option<&str>, args: &str) -> Result<()> {
    let module = load_module(input)?;

    let Some(id) = function else {
        let api = module.api();
        eprintln!("Valid API description: {}", api.title);
        if let Some(ref version) = api.version {
            eprintln!("  Version: {}", version);
        }
        eprintln!("  Types: {}", api.types.len());
        eprintln!("  Methods: {}", api.all_methods().len());
        eprintln!("  Functions: {}", module.functions().len());
        eprintln!("Validation successful.");
        return Ok(());
    };

    let function = find_function(&module, id)?;
    let report = function.validate_parameters(&parse_arguments(args)?);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_ok {
        anyhow::bail!("arguments for `{id}` are invalid");
    }
    Ok(())
}

fn cmd_call(
    input: &Path,
    id: &str,
    args: &str,
    connection: &ConnectionArgs,
    skip_validation: bool,
) -> Result<()> {
    let module = load_module(input)?;
    module.set_settings(resolve_settings(connection, module.settings())?);

    let function = find_function(&module, id)?;
    let args = parse_arguments(args)?;

    if !skip_validation {
        let report = function.validate_parameters(&args);
        if !report.is_ok {
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
            anyhow::bail!("arguments for `{id}` are invalid (use --skip-validation to call anyway)");
        }
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let body = runtime
        .block_on(function.call(&args))
        .with_context(|| format!("call to `{id}` failed"))?;
    log::info!("`{id}` returned");

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn build_inspect_summary(module: &Module) -> serde_json::Value {
    let api = module.api();

    let functions: Vec<serde_json::Value> = module
        .functions()
        .iter()
        .map(|f| {
            let method = f.operation().method();
            serde_json::json!({
                "id": f.id(),
                "displayName": f.display_name(),
                "method": method.method.as_str(),
                "path": method.full_path,
                "view": f.is_view(),
                "parameters": f.parameters(),
                "returnType": f.return_type().map(|t| t.to_string()),
            })
        })
        .collect();

    serde_json::json!({
        "title": api.title,
        "version": api.version,
        "baseUri": api.base_uri,
        "types": api.types.keys().collect::<Vec<_>>(),
        "securitySchemes": module
            .security_schemas()
            .iter()
            .map(|s| &s.name)
            .collect::<Vec<_>>(),
        "functions": functions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const API: &str = r#"
title: Inventory
version: "2"
baseUri: http://inventory.test
types:
  Item:
    properties:
      sku: string
resources:
  /items/{sku}:
    methods:
      get:
        annotations:
          id: getItem
          views:
            - id: firstItem
              fixedParameters:
                sku: A-1
        responses:
          "200":
            body:
              application/json: Item
"#;

    fn module() -> Module {
        Module::new(apifn_core::load_api_yaml(API).unwrap())
    }

    #[test]
    fn test_parse_arguments() {
        let args = parse_arguments(r#"{"sku": "A-1"}"#).unwrap();
        assert_eq!(args["sku"], "A-1");
        assert!(parse_arguments("[1]").is_err());
        assert!(parse_arguments("{").is_err());
    }

    #[test]
    fn test_find_function_lists_known_ids() {
        let module = module();
        assert_eq!(find_function(&module, "getItem").unwrap().id(), "getItem");
        let err = find_function(&module, "nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown function `nope` (available: getItem, firstItem)"
        );
    }

    #[test]
    fn test_resolve_settings_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&settings_path, "user: file\npassword: secret\n").unwrap();

        let connection = ConnectionArgs {
            base_uri: None,
            user: Some("cli".into()),
            password: None,
            token: None,
            settings: settings_path,
        };
        let declared = HttpSettings {
            base_uri: Some("http://declared.test".into()),
            user: Some("declared".into()),
            ..HttpSettings::default()
        };
        let settings = resolve_settings(&connection, declared).unwrap();
        assert_eq!(settings.base_uri.as_deref(), Some("http://declared.test"));
        assert_eq!(settings.user.as_deref(), Some("cli"));
        assert_eq!(settings.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_settings_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let connection = ConnectionArgs {
            base_uri: Some("http://flag.test".into()),
            user: None,
            password: None,
            token: None,
            settings: dir.path().join(SETTINGS_FILE_NAME),
        };
        let settings = resolve_settings(&connection, HttpSettings::default()).unwrap();
        assert_eq!(settings.base_uri.as_deref(), Some("http://flag.test"));
        assert!(settings.auth().is_none());
    }

    #[test]
    fn test_inspect_summary() {
        let summary = build_inspect_summary(&module());
        assert_eq!(summary["title"], "Inventory");
        assert_eq!(summary["types"], serde_json::json!(["Item"]));

        let functions = summary["functions"].as_array().unwrap();
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0]["method"], "GET");
        assert_eq!(functions[0]["path"], "/items/{sku}");
        assert_eq!(functions[0]["returnType"], "Item");
        assert_eq!(functions[0]["parameters"][0]["name"], "sku");
        assert_eq!(functions[1]["view"], true);
        assert_eq!(functions[1]["parameters"], serde_json::json!([]));
    }
}
