//! Pings the daemon and prints its version and system information.
//!
//! Uses `DOCKER_HOST` when set, `/var/run/docker.sock` otherwise.

use dockwire::Docker;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let docker = match Docker::connect_default() {
        Ok(docker) => docker,
        Err(e) => {
            error!(cause = %e, "can't resolve daemon socket");
            return;
        }
    };

    match docker.system().ping().await {
        Ok(answer) => info!(%answer, "ping"),
        Err(e) => {
            error!(cause = %e, "daemon is not reachable");
            return;
        }
    }

    match docker.system().version().await {
        Ok(version) => info!(version = %version.version, api_version = %version.api_version, os = %version.os, arch = %version.arch, "version"),
        Err(e) => error!(cause = %e, "can't get version"),
    }

    match docker.system().info().await {
        Ok(system) => info!(
            containers = system.containers,
            running = system.containers_running,
            images = system.images,
            driver = %system.driver,
            ncpu = system.ncpu,
            "system info"
        ),
        Err(e) => error!(cause = %e, "can't get system info"),
    }
}
