use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use freshfarm::config::{AppConfig, CliArgs};
use freshfarm::{handlers, logging, microsvc, InMemoryModelStore, LogNotifier, Storefront};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_args(CliArgs::parse())?;
    logging::init(config.log_format)?;

    if config.session_secret.is_none() {
        warn!("no session secret configured, login tokens will not survive a restart");
    }
    let app = Storefront::new(InMemoryModelStore::new(), Arc::new(LogNotifier::new()))
        .with_policy(config.policy());

    if let Some(admin) = &config.admin {
        let user = app
            .accounts()
            .bootstrap_admin(&admin.name, &admin.email, &admin.password)?;
        info!(user_id = %user.id, email = %user.email, "admin account ready");
    }

    let service = Arc::new(handlers::service(app));
    info!(commands = service.commands().len(), "starting freshfarm");
    microsvc::serve(service, &config.bind.to_string()).await?;
    Ok(())
}
