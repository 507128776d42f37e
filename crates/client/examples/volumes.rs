//! Creates a volume, lists and inspects it, then removes it again.

use std::collections::HashMap;

use dockwire::models::CreateVolume;
use dockwire::{ApiError, Docker};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let docker = Docker::connect_default()?;
    let volumes = docker.volumes();

    let options = CreateVolume {
        name: Some("dockwire-example".to_owned()),
        labels: Some(HashMap::from([("created-by".to_owned(), "dockwire".to_owned())])),
        ..CreateVolume::default()
    };
    let volume = volumes.create(&options).await?;
    info!(name = %volume.name, mountpoint = %volume.mountpoint, "created volume");

    for volume in volumes.list().await?.volumes() {
        info!(name = %volume.name, driver = %volume.driver, scope = %volume.scope, "volume");
    }

    let inspected = volumes.inspect(&volume.name).await?;
    info!(labels = ?inspected.labels, "inspected volume");

    volumes.remove(&volume.name, false).await?;

    match volumes.inspect(&volume.name).await {
        Err(e) if e.is_not_found() => info!(name = %volume.name, "volume is gone"),
        Err(e) => return Err(e),
        Ok(_) => warn!(name = %volume.name, "volume still exists"),
    }

    Ok(())
}
