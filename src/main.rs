use clap::Parser;
use mollusk_rest::config::AppConfig;
use mollusk_rest::core::ConfigProvider;
use mollusk_rest::utils::logger;
use mollusk_rest::utils::validation::{validate_socket_addr, Validate};
use mollusk_rest::{
    AppContext, CliConfig, Command, HttpResource, MolluskController, MolluskError, MolluskId,
    Resource,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_logger(&config.logging, cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if let Err(e) = run(cli.command, config).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(command: Command, config: AppConfig) -> Result<(), MolluskError> {
    match command {
        Command::Serve { .. } => {
            let addr = validate_socket_addr("server.bind", &config.server.bind)?;
            mollusk_rest::server::serve(addr, &config.server.root).await?;
        }
        Command::List => {
            let ctx = AppContext::with_mollusks(mollusks(&config)?);
            let controller = MolluskController::init(ctx).await?;
            print_json(&controller.state().mollusks)?;
        }
        Command::Add { fields } => {
            let ctx = AppContext::with_mollusks(mollusks(&config)?);
            let mut controller =
                MolluskController::init_with_refresh_target(ctx, config.refresh_target()).await?;
            for (key, value) in fields {
                controller.state_mut().new_mollusk.set(key, value);
            }
            controller.add_mollusk().await;
            print_json(&controller.state().mollusks)?;
        }
        Command::Get { id } => {
            let mollusk = mollusks(&config)?.get(&MolluskId::from(id)).await?;
            print_json(&mollusk)?;
        }
        Command::Remove { id } => {
            mollusks(&config)?.remove(&MolluskId::from(id.as_str())).await?;
            println!("🗑️  Removed mollusk {}", id);
        }
    }

    Ok(())
}

fn mollusks(config: &AppConfig) -> Result<Arc<HttpResource>, MolluskError> {
    let resource = HttpResource::mollusks(config)?;
    tracing::info!("Mollusks bound to {}", resource.template().as_str());
    Ok(Arc::new(resource))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), MolluskError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
