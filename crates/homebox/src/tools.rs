//! HomeBox tool catalog and request templates.
//!
//! Paths are relative to the API root (`<base>/api/v1`).

use homelab_rest_tools::{
    Arguments, Method, ParamSpec, ParamType, RequestPlan, Result, Route, ToolDescriptor, ToolSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeboxTool {
    ListItems,
    GetItem,
    CreateItem,
    UpdateItem,
    DeleteItem,
    ListLocations,
    CreateLocation,
    ListLabels,
    CreateLabel,
    SearchItems,
}

const ITEM_ID: ParamSpec = ParamSpec::required("itemId", ParamType::String, "The item ID");

static LIST_ITEMS: ToolDescriptor = ToolDescriptor {
    name: "list_items",
    description: "List all inventory items",
    method: Method::GET,
    params: &[
        ParamSpec::optional("search", ParamType::String, "Search query (optional)"),
        ParamSpec::optional(
            "locationId",
            ParamType::String,
            "Filter by location ID (optional)",
        ),
        ParamSpec::optional("labelId", ParamType::String, "Filter by label ID (optional)"),
    ],
};

static GET_ITEM: ToolDescriptor = ToolDescriptor {
    name: "get_item",
    description: "Get details of a specific item",
    method: Method::GET,
    params: &[ITEM_ID],
};

static CREATE_ITEM: ToolDescriptor = ToolDescriptor {
    name: "create_item",
    description: "Create a new inventory item",
    method: Method::POST,
    params: &[
        ParamSpec::required("name", ParamType::String, "Item name"),
        ParamSpec::optional("description", ParamType::String, "Item description"),
        ParamSpec::optional("locationId", ParamType::String, "Location ID"),
        ParamSpec::optional("quantity", ParamType::Number, "Quantity"),
    ],
};

static UPDATE_ITEM: ToolDescriptor = ToolDescriptor {
    name: "update_item",
    description: "Update an existing item",
    method: Method::PUT,
    params: &[
        ITEM_ID,
        ParamSpec::optional("name", ParamType::String, "Item name (optional)"),
        ParamSpec::optional(
            "description",
            ParamType::String,
            "Item description (optional)",
        ),
        ParamSpec::optional("quantity", ParamType::Number, "Quantity (optional)"),
    ],
};

static DELETE_ITEM: ToolDescriptor = ToolDescriptor {
    name: "delete_item",
    description: "Delete an inventory item",
    method: Method::DELETE,
    params: &[ParamSpec::required(
        "itemId",
        ParamType::String,
        "The item ID to delete",
    )],
};

static LIST_LOCATIONS: ToolDescriptor = ToolDescriptor {
    name: "list_locations",
    description: "List all storage locations",
    method: Method::GET,
    params: &[],
};

static CREATE_LOCATION: ToolDescriptor = ToolDescriptor {
    name: "create_location",
    description: "Create a new storage location",
    method: Method::POST,
    params: &[
        ParamSpec::required("name", ParamType::String, "Location name"),
        ParamSpec::optional(
            "description",
            ParamType::String,
            "Location description (optional)",
        ),
    ],
};

static LIST_LABELS: ToolDescriptor = ToolDescriptor {
    name: "list_labels",
    description: "List all labels/tags",
    method: Method::GET,
    params: &[],
};

static CREATE_LABEL: ToolDescriptor = ToolDescriptor {
    name: "create_label",
    description: "Create a new label/tag",
    method: Method::POST,
    params: &[
        ParamSpec::required("name", ParamType::String, "Label name"),
        ParamSpec::optional(
            "description",
            ParamType::String,
            "Label description (optional)",
        ),
        ParamSpec::optional(
            "color",
            ParamType::String,
            "Label color (hex code, optional)",
        ),
    ],
};

static SEARCH_ITEMS: ToolDescriptor = ToolDescriptor {
    name: "search_items",
    description: "Search items by various criteria",
    method: Method::GET,
    params: &[ParamSpec::required("query", ParamType::String, "Search query")],
};

impl ToolSet for HomeboxTool {
    const ALL: &'static [Self] = &[
        Self::ListItems,
        Self::GetItem,
        Self::CreateItem,
        Self::UpdateItem,
        Self::DeleteItem,
        Self::ListLocations,
        Self::CreateLocation,
        Self::ListLabels,
        Self::CreateLabel,
        Self::SearchItems,
    ];

    fn descriptor(self) -> &'static ToolDescriptor {
        match self {
            Self::ListItems => &LIST_ITEMS,
            Self::GetItem => &GET_ITEM,
            Self::CreateItem => &CREATE_ITEM,
            Self::UpdateItem => &UPDATE_ITEM,
            Self::DeleteItem => &DELETE_ITEM,
            Self::ListLocations => &LIST_LOCATIONS,
            Self::CreateLocation => &CREATE_LOCATION,
            Self::ListLabels => &LIST_LABELS,
            Self::CreateLabel => &CREATE_LABEL,
            Self::SearchItems => &SEARCH_ITEMS,
        }
    }
}

impl Route for HomeboxTool {
    type Scope = ();

    fn plan(self, args: &Arguments, _scope: &()) -> Result<RequestPlan> {
        let plan = match self {
            Self::ListItems => RequestPlan::get(["items"])
                .query_opt("q", args.optional_str("search"))
                .query_opt("locations", args.optional_str("locationId"))
                .query_opt("labels", args.optional_str("labelId")),
            Self::GetItem => RequestPlan::get(["items", args.required_str("itemId")?]),
            Self::CreateItem => RequestPlan::post(["items"]).json(args.to_body()),
            Self::UpdateItem => RequestPlan::put(["items", args.required_str("itemId")?])
                .json(args.to_body_without("itemId")),
            Self::DeleteItem => {
                let item_id = args.required_str("itemId")?;
                RequestPlan::delete(["items", item_id])
                    .confirm(format!("Item {item_id} deleted successfully"))
            }
            Self::ListLocations => RequestPlan::get(["locations"]),
            Self::CreateLocation => RequestPlan::post(["locations"]).json(args.to_body()),
            Self::ListLabels => RequestPlan::get(["labels"]),
            Self::CreateLabel => RequestPlan::post(["labels"]).json(args.to_body()),
            Self::SearchItems => {
                RequestPlan::get(["items", "search"]).query("q", args.required_str("query")?)
            }
        };
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::HomeboxTool;
    use homelab_rest_tools::dispatch::resolve;
    use homelab_rest_tools::{Method, Rendering, RequestPlan, Route, ToolSet};
    use serde_json::{Value, json};

    fn plan(name: &str, args: Value) -> RequestPlan {
        let raw = args.as_object().cloned().expect("object");
        let (tool, args) = resolve::<HomeboxTool>(name, raw).expect("resolve");
        tool.plan(&args, &()).expect("plan")
    }

    #[test]
    fn catalog_names_are_unique_and_ordered() {
        let names: Vec<&str> = HomeboxTool::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "list_items",
                "get_item",
                "create_item",
                "update_item",
                "delete_item",
                "list_locations",
                "create_location",
                "list_labels",
                "create_label",
                "search_items",
            ]
        );
    }

    #[test]
    fn list_items_maps_filters_to_vendor_query_names() {
        let p = plan("list_items", json!({"search": "drill", "locationId": "L1"}));
        assert_eq!(p.method, Method::GET);
        assert_eq!(p.path(), "/items");
        assert_eq!(
            p.query,
            vec![
                ("q".to_string(), "drill".to_string()),
                ("locations".to_string(), "L1".to_string()),
            ]
        );
    }

    #[test]
    fn list_items_skips_empty_filters() {
        let p = plan("list_items", json!({"search": "", "labelId": "tag"}));
        assert_eq!(p.query, vec![("labels".to_string(), "tag".to_string())]);
    }

    #[test]
    fn update_item_sends_everything_but_the_id() {
        let p = plan("update_item", json!({"itemId": "i9", "quantity": 3}));
        assert_eq!(p.method, Method::PUT);
        assert_eq!(p.path(), "/items/i9");
        assert_eq!(p.body, Some(json!({"quantity": 3})));
    }

    #[test]
    fn delete_item_confirms_instead_of_echoing() {
        let p = plan("delete_item", json!({"itemId": "i9"}));
        assert_eq!(p.method, Method::DELETE);
        assert_eq!(
            p.rendering,
            Rendering::Confirmation("Item i9 deleted successfully".to_string())
        );
    }

    #[test]
    fn search_items_hits_search_endpoint() {
        let p = plan("search_items", json!({"query": "hammer"}));
        assert_eq!(p.path(), "/items/search");
        assert_eq!(p.query, vec![("q".to_string(), "hammer".to_string())]);
    }
}
