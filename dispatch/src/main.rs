use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use dmr_dispatch::constants::defaults;
use dmr_dispatch::constants::model::COMPOSITE;
use dmr_dispatch::{ConfigManager, Dispatcher, Operation, ResourceAddress};

const USAGE: &str = "usage: dmr [--config <dir>] <address> <operation> [name=value ...]";

struct Invocation {
    config_dir: String,
    operation: Operation,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let (config_dir, rest) = match args {
        [flag, dir, rest @ ..] if flag == "--config" => (dir.clone(), rest),
        rest => (defaults::CONFIG_DIR.to_string(), rest),
    };

    let [address, name, parameters @ ..] = rest else {
        return Err(anyhow!(USAGE));
    };

    if name == COMPOSITE {
        return Err(anyhow!("Composite operations cannot be built from the command line"));
    }

    let address: ResourceAddress = address.parse()?;
    let mut operation = Operation::new(name.as_str(), address);
    for parameter in parameters {
        let (key, raw) = parameter
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid parameter '{}', expected name=value", parameter))?;
        // `true`, `5` and quoted strings keep their type, anything else is a string
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        operation = operation.with_parameter(key, value);
    }

    Ok(Invocation {
        config_dir,
        operation,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("dmr_dispatch=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args)?;

    let config_manager = ConfigManager::new(invocation.config_dir).await?;
    let config = config_manager.get_current_config();
    let dispatcher = Dispatcher::from_config(&config)?;

    info!("Executing '{}' on {}", invocation.operation.name(), invocation.operation.address());

    match dispatcher.dispatch_and_wait(invocation.operation).await {
        Some(Ok(response)) => {
            match response.decode(dispatcher.codec().as_ref()) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => {
                    warn!("Response body did not decode ({}), printing it raw", e);
                    println!("{}", response.body);
                }
            }
            Ok(())
        }
        Some(Err(e)) => {
            error!("Operation failed: {}", e);
            Err(e.into())
        }
        None => {
            warn!("No result delivered; the endpoint redirected the request");
            Ok(())
        }
    }
}
