//! Omada tool catalog and request templates.
//!
//! Site-scoped paths look like `/<controllerId>/api/v2/sites/<site>/...`. The controller id
//! comes from the session; when it is not known yet the prefix is left off.

use homelab_rest_tools::{
    Arguments, Method, ParamSpec, ParamType, RequestPlan, Result, Route, ToolDescriptor, ToolSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmadaTool {
    ListSites,
    ListDevices,
    GetDeviceInfo,
    ListClients,
    GetNetworkStats,
    ListSsids,
    RebootDevice,
    BlockClient,
    UnblockClient,
}

/// Where a call is routed on the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    pub controller_id: Option<String>,
    pub site_id: String,
}

impl SiteScope {
    fn site<I, S>(&self, rest: I, method: Method) -> RequestPlan
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments: Vec<String> = ["api", "v2", "sites", self.site_id.as_str()]
            .into_iter()
            .map(str::to_string)
            .collect();
        segments.extend(rest.into_iter().map(Into::into));
        RequestPlan::new(method, segments)
            .under(self.controller_id.clone())
            .render_field("result")
    }
}

const DEVICE_MAC: ParamSpec = ParamSpec::required("mac", ParamType::String, "Device MAC address");
const CLIENT_MAC: ParamSpec = ParamSpec::required("mac", ParamType::String, "Client MAC address");

static LIST_SITES: ToolDescriptor = ToolDescriptor {
    name: "list_sites",
    description: "List all sites in Omada controller",
    method: Method::GET,
    params: &[],
};

static LIST_DEVICES: ToolDescriptor = ToolDescriptor {
    name: "list_devices",
    description: "List all network devices (APs, switches, gateways)",
    method: Method::GET,
    params: &[ParamSpec::optional(
        "type",
        ParamType::String,
        "Device type filter: ap, switch, gateway (optional)",
    )
    .one_of(&["ap", "switch", "gateway"])],
};

static GET_DEVICE_INFO: ToolDescriptor = ToolDescriptor {
    name: "get_device_info",
    description: "Get detailed information about a specific device",
    method: Method::GET,
    params: &[DEVICE_MAC],
};

static LIST_CLIENTS: ToolDescriptor = ToolDescriptor {
    name: "list_clients",
    description: "List connected clients",
    method: Method::GET,
    params: &[ParamSpec::optional(
        "online",
        ParamType::Boolean,
        "Filter by online status (optional)",
    )],
};

static GET_NETWORK_STATS: ToolDescriptor = ToolDescriptor {
    name: "get_network_stats",
    description: "Get network statistics and health",
    method: Method::GET,
    params: &[],
};

static LIST_SSIDS: ToolDescriptor = ToolDescriptor {
    name: "list_ssids",
    description: "List all wireless SSIDs",
    method: Method::GET,
    params: &[],
};

static REBOOT_DEVICE: ToolDescriptor = ToolDescriptor {
    name: "reboot_device",
    description: "Reboot a network device",
    method: Method::POST,
    params: &[DEVICE_MAC],
};

static BLOCK_CLIENT: ToolDescriptor = ToolDescriptor {
    name: "block_client",
    description: "Block a client from the network",
    method: Method::POST,
    params: &[CLIENT_MAC],
};

static UNBLOCK_CLIENT: ToolDescriptor = ToolDescriptor {
    name: "unblock_client",
    description: "Unblock a client from the network",
    method: Method::POST,
    params: &[CLIENT_MAC],
};

impl ToolSet for OmadaTool {
    const ALL: &'static [Self] = &[
        Self::ListSites,
        Self::ListDevices,
        Self::GetDeviceInfo,
        Self::ListClients,
        Self::GetNetworkStats,
        Self::ListSsids,
        Self::RebootDevice,
        Self::BlockClient,
        Self::UnblockClient,
    ];

    fn descriptor(self) -> &'static ToolDescriptor {
        match self {
            Self::ListSites => &LIST_SITES,
            Self::ListDevices => &LIST_DEVICES,
            Self::GetDeviceInfo => &GET_DEVICE_INFO,
            Self::ListClients => &LIST_CLIENTS,
            Self::GetNetworkStats => &GET_NETWORK_STATS,
            Self::ListSsids => &LIST_SSIDS,
            Self::RebootDevice => &REBOOT_DEVICE,
            Self::BlockClient => &BLOCK_CLIENT,
            Self::UnblockClient => &UNBLOCK_CLIENT,
        }
    }
}

impl Route for OmadaTool {
    type Scope = SiteScope;

    fn plan(self, args: &Arguments, scope: &SiteScope) -> Result<RequestPlan> {
        let plan = match self {
            Self::ListSites => RequestPlan::get(["api", "v2", "sites"])
                .under(scope.controller_id.clone())
                .render_field("result"),
            Self::ListDevices => scope
                .site(["devices"], Method::GET)
                .query_opt("type", args.optional_str("type")),
            Self::GetDeviceInfo => scope.site(["devices", args.required_str("mac")?], Method::GET),
            Self::ListClients => scope
                .site(["clients"], Method::GET)
                .query_opt("filters.active", args.optional_bool("online")),
            Self::GetNetworkStats => scope.site(["stat", "dashboard"], Method::GET),
            Self::ListSsids => scope.site(["setting", "wlans"], Method::GET),
            Self::RebootDevice => {
                let mac = args.required_str("mac")?;
                scope
                    .site(["cmd", "devices", mac, "reboot"], Method::POST)
                    .confirm(format!("Device {mac} reboot initiated successfully"))
            }
            Self::BlockClient => {
                let mac = args.required_str("mac")?;
                scope
                    .site(["cmd", "clients", mac, "block"], Method::POST)
                    .confirm(format!("Client {mac} blocked successfully"))
            }
            Self::UnblockClient => {
                let mac = args.required_str("mac")?;
                scope
                    .site(["cmd", "clients", mac, "unblock"], Method::POST)
                    .confirm(format!("Client {mac} unblocked successfully"))
            }
        };
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::{OmadaTool, SiteScope};
    use homelab_rest_tools::dispatch::resolve;
    use homelab_rest_tools::{Method, Rendering, RequestPlan, Route};
    use serde_json::{Value, json};

    fn scope(cid: Option<&str>) -> SiteScope {
        SiteScope {
            controller_id: cid.map(str::to_string),
            site_id: "Default".to_string(),
        }
    }

    fn plan(name: &str, args: Value, scope: &SiteScope) -> RequestPlan {
        let raw = args.as_object().cloned().expect("object");
        let (tool, args) = resolve::<OmadaTool>(name, raw).expect("resolve");
        tool.plan(&args, scope).expect("plan")
    }

    #[test]
    fn list_sites_is_controller_scoped_only() {
        let p = plan("list_sites", json!({}), &scope(Some("abc")));
        assert_eq!(p.path(), "/abc/api/v2/sites");
        assert_eq!(p.rendering, Rendering::Field("result"));
    }

    #[test]
    fn site_paths_include_controller_and_site() {
        let p = plan("list_ssids", json!({}), &scope(Some("abc")));
        assert_eq!(p.path(), "/abc/api/v2/sites/Default/setting/wlans");

        let p = plan("get_network_stats", json!({}), &scope(Some("abc")));
        assert_eq!(p.path(), "/abc/api/v2/sites/Default/stat/dashboard");
    }

    #[test]
    fn unknown_controller_drops_the_prefix() {
        let p = plan("list_devices", json!({"type": "ap"}), &scope(None));
        assert_eq!(p.path(), "/api/v2/sites/Default/devices");
        assert_eq!(p.query, vec![("type".to_string(), "ap".to_string())]);
    }

    #[test]
    fn online_filter_maps_to_active_flag() {
        let p = plan("list_clients", json!({"online": true}), &scope(Some("c")));
        assert_eq!(
            p.query,
            vec![("filters.active".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn commands_post_and_confirm() {
        let p = plan(
            "reboot_device",
            json!({"mac": "AA-BB-CC-DD-EE-FF"}),
            &scope(Some("c")),
        );
        assert_eq!(p.method, Method::POST);
        assert_eq!(
            p.path(),
            "/c/api/v2/sites/Default/cmd/devices/AA-BB-CC-DD-EE-FF/reboot"
        );
        assert!(p.body.is_none());
        assert_eq!(
            p.rendering,
            Rendering::Confirmation("Device AA-BB-CC-DD-EE-FF reboot initiated successfully".into())
        );

        let p = plan("unblock_client", json!({"mac": "11:22"}), &scope(Some("c")));
        assert_eq!(
            p.rendering,
            Rendering::Confirmation("Client 11:22 unblocked successfully".into())
        );
    }

    #[test]
    fn device_type_is_restricted() {
        let raw = json!({"type": "router"}).as_object().cloned().expect("object");
        assert!(resolve::<OmadaTool>("list_devices", raw).is_err());
    }
}
