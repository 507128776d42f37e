//! Payloads of the volume, network and system endpoints.
//!
//! Field names follow the daemon's PascalCase JSON. Fields the daemon omits
//! on some platforms or versions default instead of failing deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Volume Types
// ============================================================================

/// A volume as returned by inspect, list and create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Volume {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub created_at: Option<String>,
    pub status: Option<HashMap<String, serde_json::Value>>,
    pub labels: Option<HashMap<String, String>>,
    /// `local` or `global`.
    pub scope: String,
    pub options: Option<HashMap<String, String>>,
    pub usage_data: Option<UsageData>,
}

/// Disk usage of a volume, only filled in by the system df endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsageData {
    /// Bytes used, `-1` when not available.
    pub size: i64,
    /// Number of containers referencing the volume, `-1` when not available.
    pub ref_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VolumeList {
    /// `null` on the wire when there are no volumes.
    pub volumes: Option<Vec<Volume>>,
    pub warnings: Option<Vec<String>>,
}

impl VolumeList {
    pub fn volumes(&self) -> &[Volume] {
        self.volumes.as_deref().unwrap_or_default()
    }
}

/// Body of a volume create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateVolume {
    /// Generated by the daemon when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_opts: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl CreateVolume {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VolumePrune {
    pub volumes_deleted: Option<Vec<String>>,
    /// Bytes.
    pub space_reclaimed: u64,
}

// ============================================================================
// Network Types
// ============================================================================

/// A network as returned by list and inspect.
///
/// `Containers` is only filled in by inspect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Network {
    pub name: String,
    pub id: String,
    pub created: String,
    /// `local`, `global` or `swarm`.
    pub scope: String,
    pub driver: String,
    #[serde(rename = "EnableIPv6")]
    pub enable_ipv6: bool,
    #[serde(rename = "IPAM")]
    pub ipam: Option<Ipam>,
    pub internal: bool,
    pub attachable: bool,
    pub ingress: bool,
    pub containers: Option<HashMap<String, NetworkContainer>>,
    pub options: Option<HashMap<String, String>>,
    pub labels: Option<HashMap<String, String>>,
}

/// Endpoint of a container attached to a network, keyed by container id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkContainer {
    pub name: String,
    #[serde(rename = "EndpointID")]
    pub endpoint_id: String,
    pub mac_address: String,
    #[serde(rename = "IPv4Address")]
    pub ipv4_address: String,
    #[serde(rename = "IPv6Address")]
    pub ipv6_address: String,
}

/// IP address management of a network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ipam {
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Vec<IpamConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IpamConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(rename = "IPRange", skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

/// Body of a network create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateNetwork {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duplicate: Option<bool>,
    /// `bridge` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(rename = "EnableIPv6", skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    #[serde(rename = "IPAM", skip_serializing_if = "Option::is_none")]
    pub ipam: Option<Ipam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

impl CreateNetwork {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Answer to a network create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkCreated {
    pub id: String,
    /// Empty when the daemon has nothing to report.
    pub warning: Option<String>,
}

/// Body of a network connect request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectNetwork {
    /// Container id or name.
    pub container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_config: Option<EndpointConfig>,
}

impl ConnectNetwork {
    pub fn container<S: Into<String>>(container: S) -> Self {
        Self { container: container.into(), endpoint_config: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointConfig {
    #[serde(rename = "IPAMConfig", skip_serializing_if = "Option::is_none")]
    pub ipam_config: Option<IpamConfig>,
}

/// Body of a network disconnect request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisconnectNetwork {
    pub container: String,
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkPrune {
    pub networks_deleted: Option<Vec<String>>,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Version {
    pub platform: Option<Platform>,
    pub components: Option<Vec<Component>>,
    pub version: String,
    pub api_version: String,
    #[serde(rename = "MinAPIVersion")]
    pub min_api_version: Option<String>,
    pub git_commit: String,
    pub go_version: String,
    pub os: String,
    pub arch: String,
    pub kernel_version: Option<String>,
    pub experimental: Option<bool>,
    pub build_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Platform {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Component {
    pub name: String,
    pub version: String,
    pub details: Option<serde_json::Value>,
}

/// Subset of the daemon's system information; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SystemInfo {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub containers: i64,
    pub containers_running: i64,
    pub containers_paused: i64,
    pub containers_stopped: i64,
    pub images: i64,
    pub driver: String,
    pub docker_root_dir: String,
    pub logging_driver: String,
    pub cgroup_driver: String,
    pub kernel_version: String,
    pub operating_system: String,
    #[serde(rename = "OSType")]
    pub os_type: String,
    pub architecture: String,
    #[serde(rename = "NCPU")]
    pub ncpu: i64,
    pub mem_total: i64,
    pub server_version: String,
    pub debug: bool,
    pub labels: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_volume_list_with_null_volumes() {
        let list: VolumeList = serde_json::from_str(r#"{"Volumes":null,"Warnings":null}"#).unwrap();
        assert!(list.volumes().is_empty());
    }

    #[test]
    fn test_volume() {
        let volume: Volume = serde_json::from_str(indoc! {r#"
        {
            "CreatedAt": "2024-03-01T10:00:00Z",
            "Driver": "local",
            "Labels": {"com.example.team": "infra"},
            "Mountpoint": "/var/lib/docker/volumes/data/_data",
            "Name": "data",
            "Options": null,
            "Scope": "local"
        }
        "#})
        .unwrap();

        assert_eq!(volume.name, "data");
        assert_eq!(volume.driver, "local");
        assert_eq!(volume.labels.unwrap()["com.example.team"], "infra");
        assert!(volume.options.is_none());
        assert!(volume.usage_data.is_none());
    }

    #[test]
    fn test_create_volume_skips_unset_fields() {
        let body = serde_json::to_string(&CreateVolume::named("data")).unwrap();
        assert_eq!(body, r#"{"Name":"data"}"#);
    }

    #[test]
    fn test_network_inspect() {
        let network: Network = serde_json::from_str(indoc! {r#"
        {
            "Name": "app_net",
            "Id": "7d86d31b1478e7cca9ebed7e73aa0fdeec46c5ca29497431d3007d2d9e15ed99",
            "Created": "2024-03-01T10:00:00.000000000Z",
            "Scope": "local",
            "Driver": "bridge",
            "EnableIPv6": false,
            "IPAM": {"Driver": "default", "Config": [{"Subnet": "172.19.0.0/16", "Gateway": "172.19.0.1"}], "Options": null},
            "Internal": false,
            "Attachable": true,
            "Ingress": false,
            "Containers": {
                "19a4d5d687db": {
                    "Name": "web",
                    "EndpointID": "628cadb8bcb92de107b2a1e516cbffe463e321f548feb37697cce00ad694f21a",
                    "MacAddress": "02:42:ac:13:00:02",
                    "IPv4Address": "172.19.0.2/16",
                    "IPv6Address": ""
                }
            },
            "Options": {},
            "Labels": {"com.docker.compose.project": "app"}
        }
        "#})
        .unwrap();

        assert_eq!(network.name, "app_net");
        assert!(network.attachable);
        let ipam = network.ipam.unwrap();
        assert_eq!(ipam.config.unwrap()[0].gateway.as_deref(), Some("172.19.0.1"));
        assert_eq!(network.containers.unwrap()["19a4d5d687db"].ipv4_address, "172.19.0.2/16");
    }

    #[test]
    fn test_network_requests_wire_names() {
        let create = CreateNetwork {
            enable_ipv6: Some(true),
            ipam: Some(Ipam {
                driver: "default".to_owned(),
                config: Some(vec![IpamConfig { subnet: Some("10.10.0.0/16".to_owned()), ..IpamConfig::default() }]),
                options: None,
            }),
            ..CreateNetwork::named("app_net")
        };
        assert_eq!(
            serde_json::to_string(&create).unwrap(),
            r#"{"Name":"app_net","EnableIPv6":true,"IPAM":{"Driver":"default","Config":[{"Subnet":"10.10.0.0/16"}]}}"#
        );

        let connect = ConnectNetwork {
            endpoint_config: Some(EndpointConfig {
                ipam_config: Some(IpamConfig { ip_range: Some("10.10.1.0/24".to_owned()), ..IpamConfig::default() }),
            }),
            ..ConnectNetwork::container("web")
        };
        assert_eq!(
            serde_json::to_string(&connect).unwrap(),
            r#"{"Container":"web","EndpointConfig":{"IPAMConfig":{"IPRange":"10.10.1.0/24"}}}"#
        );
    }

    #[test]
    fn test_system_info_renamed_fields() {
        let info: SystemInfo =
            serde_json::from_str(r#"{"ID":"7TRN:IPZB","NCPU":8,"OSType":"linux","MemTotal":2095882240,"Swarm":{}}"#).unwrap();

        assert_eq!(info.id, "7TRN:IPZB");
        assert_eq!(info.ncpu, 8);
        assert_eq!(info.os_type, "linux");
        assert_eq!(info.mem_total, 2_095_882_240);
    }
}
