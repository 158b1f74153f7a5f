//! Demo command-line interface for the LLM Tool Bridge
//!
//! Loads configuration, constructs the selected provider adapter through the
//! registry, registers a calculator tool and runs one prompt through the
//! resolution loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use serde_json::{Value, json};
use tracing::{debug, info};

use bridge_providers::providers::{
    AzureOpenAIAdapter, AzureOpenAIProvider, GeminiAdapter, GeminiProvider, OpenAIAdapter,
    OpenAIProvider,
};
use bridge_providers::{ProviderAdapter, global_registry, register_builtin_adapters};
use bridge_runtime::ToolBridge;
use bridge_tools::{ParameterDefinition, ParameterType, Tool, ToolError};
use bridge_utils::{ConfigManager, ToolBridgeConfig, init_tracing, load_dotenv};

const DEFAULT_PROMPT: &str = "I need to calculate the area of a rectangle with width 5.2 and \
                              height 3.8. The formula is width multiplied by height. Can you \
                              help me?";

#[derive(Parser, Debug)]
#[command(name = "toolbridge")]
#[command(about = "Run a prompt through an LLM provider with a calculator tool", long_about = None)]
struct Args {
    /// Provider adapter to use (defaults to the configured default_provider)
    #[arg(short, long)]
    provider: Option<String>,

    /// Path to a configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prompt to send
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Cap on resolved tool calls per exchange
    #[arg(long)]
    max_tool_calls: Option<usize>,

    /// List registered adapters and exit
    #[arg(long)]
    list_providers: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = load_dotenv(None);

    let args = Args::parse();
    let config = ConfigManager::load(args.config.as_deref());
    init_tracing(&config.log_level);

    if !loaded.is_empty() {
        debug!(count = loaded.len(), "Loaded variables from .env file");
    }

    let registry = global_registry();
    register_builtin_adapters(registry);

    if args.list_providers {
        for name in registry.adapter_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let provider_name = args
        .provider
        .or_else(|| config.default_provider.clone())
        .with_context(|| {
            format!(
                "no provider selected; pass --provider or set default_provider (available: {})",
                registry.adapter_names().join(", ")
            )
        })?;

    let adapter = build_adapter(&config, &provider_name)?;
    info!(provider = %adapter.name(), "Constructed provider adapter");
    print_capabilities(adapter.as_ref());

    let mut bridge = ToolBridge::with_adapter(adapter);
    if let Some(max) = args.max_tool_calls {
        bridge = bridge.with_max_tool_calls(max);
    }
    bridge.register_tool(calculator_tool())?;

    println!("\nPrompt: {}", args.prompt.trim());
    let response = bridge.execute(args.prompt, vec![]).await?;

    if let Some(content) = response.content {
        println!("\nResponse: {content}");
    }
    if !response.tool_calls.is_empty() {
        println!("\nUnresolved tool calls:");
        for call in &response.tool_calls {
            let arguments = Value::Object(call.arguments.clone());
            println!("  {}({arguments})", call.tool_name);
        }
    }

    Ok(())
}

/// Construct the adapter from its config block, or from environment
/// variables when the built-in provider has no block
fn build_adapter(
    config: &ToolBridgeConfig,
    name: &str,
) -> anyhow::Result<Arc<dyn ProviderAdapter>> {
    let registry = global_registry();
    if let Ok(block) = config.provider_config(name) {
        return registry
            .create(name, block)
            .with_context(|| format!("failed to construct adapter '{name}' from its config block"));
    }

    debug!(provider = name, "No config block found, constructing from environment");
    let adapter: Arc<dyn ProviderAdapter> = match name {
        "openai" => Arc::new(OpenAIAdapter::new(OpenAIProvider::from_env()?)),
        "azure_openai" => Arc::new(AzureOpenAIAdapter::new(AzureOpenAIProvider::from_env()?)),
        "gemini" => Arc::new(GeminiAdapter::new(GeminiProvider::from_env()?)),
        other => bail!(
            "provider '{other}' has no configuration block (available adapters: {})",
            registry.adapter_names().join(", ")
        ),
    };
    Ok(adapter)
}

fn print_capabilities(adapter: &dyn ProviderAdapter) {
    let capabilities = adapter.capabilities();
    println!("Provider: {}", adapter.name());
    println!("  tool calling:   {}", capabilities.supports_tool_calling);
    println!("  multiple tools: {}", capabilities.supports_multiple_tools);
    println!("  streaming:      {}", capabilities.supports_streaming);
    println!("  vision:         {}", capabilities.supports_vision);
    if let Some(limit) = capabilities.max_tokens_limit {
        println!("  max tokens:     {limit}");
    }
}

fn calculator_tool() -> Tool {
    Tool::new("calculator", "Performs mathematical calculations")
        .with_parameter(
            "operation",
            ParameterDefinition::new(ParameterType::String, "The operation to perform")
                .with_enum_values(vec!["add", "subtract", "multiply", "divide"]),
        )
        .with_parameter(
            "x",
            ParameterDefinition::new(ParameterType::Number, "First operand"),
        )
        .with_parameter(
            "y",
            ParameterDefinition::new(ParameterType::Number, "Second operand"),
        )
        .with_handler(|args| async move {
            let operation = args["operation"].as_str().unwrap_or_default().to_string();
            let x = args["x"].as_f64().unwrap_or_default();
            let y = args["y"].as_f64().unwrap_or_default();
            let result = match operation.as_str() {
                "add" => x + y,
                "subtract" => x - y,
                "multiply" => x * y,
                "divide" => {
                    if y == 0.0 {
                        return Err(ToolError::ExecutionFailed("Division by zero".to_string()));
                    }
                    x / y
                }
                other => {
                    return Err(ToolError::ExecutionFailed(format!(
                        "Unknown operation: {other}"
                    )));
                }
            };
            Ok(json!({"operation": operation, "x": x, "y": y, "result": result}))
        })
}
