//! n8n tool catalog and request templates.

use homelab_rest_tools::{
    Arguments, Method, ParamSpec, ParamType, RequestPlan, Result, Route, ToolDescriptor, ToolSet,
};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum N8nTool {
    ListWorkflows,
    GetWorkflow,
    ActivateWorkflow,
    DeactivateWorkflow,
    ExecuteWorkflow,
    ListExecutions,
}

static LIST_WORKFLOWS: ToolDescriptor = ToolDescriptor {
    name: "list_workflows",
    description: "List all workflows in n8n",
    method: Method::GET,
    params: &[ParamSpec::optional(
        "active",
        ParamType::Boolean,
        "Filter by active status (optional)",
    )],
};

static GET_WORKFLOW: ToolDescriptor = ToolDescriptor {
    name: "get_workflow",
    description: "Get details of a specific workflow",
    method: Method::GET,
    params: &[ParamSpec::required(
        "workflowId",
        ParamType::String,
        "The workflow ID",
    )],
};

static ACTIVATE_WORKFLOW: ToolDescriptor = ToolDescriptor {
    name: "activate_workflow",
    description: "Activate a workflow",
    method: Method::PATCH,
    params: &[ParamSpec::required(
        "workflowId",
        ParamType::String,
        "The workflow ID to activate",
    )],
};

static DEACTIVATE_WORKFLOW: ToolDescriptor = ToolDescriptor {
    name: "deactivate_workflow",
    description: "Deactivate a workflow",
    method: Method::PATCH,
    params: &[ParamSpec::required(
        "workflowId",
        ParamType::String,
        "The workflow ID to deactivate",
    )],
};

static EXECUTE_WORKFLOW: ToolDescriptor = ToolDescriptor {
    name: "execute_workflow",
    description: "Execute a workflow",
    method: Method::POST,
    params: &[
        ParamSpec::required("workflowId", ParamType::String, "The workflow ID to execute"),
        ParamSpec::optional(
            "data",
            ParamType::Object,
            "Input data for the workflow (optional)",
        ),
    ],
};

static LIST_EXECUTIONS: ToolDescriptor = ToolDescriptor {
    name: "list_executions",
    description: "List workflow executions",
    method: Method::GET,
    params: &[
        ParamSpec::optional(
            "workflowId",
            ParamType::String,
            "Filter by workflow ID (optional)",
        ),
        ParamSpec::optional(
            "status",
            ParamType::String,
            "Filter by status: success, error, waiting (optional)",
        )
        .one_of(&["success", "error", "waiting"]),
    ],
};

impl ToolSet for N8nTool {
    const ALL: &'static [Self] = &[
        Self::ListWorkflows,
        Self::GetWorkflow,
        Self::ActivateWorkflow,
        Self::DeactivateWorkflow,
        Self::ExecuteWorkflow,
        Self::ListExecutions,
    ];

    fn descriptor(self) -> &'static ToolDescriptor {
        match self {
            Self::ListWorkflows => &LIST_WORKFLOWS,
            Self::GetWorkflow => &GET_WORKFLOW,
            Self::ActivateWorkflow => &ACTIVATE_WORKFLOW,
            Self::DeactivateWorkflow => &DEACTIVATE_WORKFLOW,
            Self::ExecuteWorkflow => &EXECUTE_WORKFLOW,
            Self::ListExecutions => &LIST_EXECUTIONS,
        }
    }
}

impl Route for N8nTool {
    type Scope = ();

    fn plan(self, args: &Arguments, _scope: &()) -> Result<RequestPlan> {
        let plan = match self {
            Self::ListWorkflows => {
                RequestPlan::get(["workflows"]).query_opt("active", args.optional_bool("active"))
            }
            Self::GetWorkflow => RequestPlan::get(["workflows", args.required_str("workflowId")?]),
            Self::ActivateWorkflow => set_active(args.required_str("workflowId")?, true),
            Self::DeactivateWorkflow => set_active(args.required_str("workflowId")?, false),
            Self::ExecuteWorkflow => {
                let data = args.get("data").cloned().unwrap_or_else(|| json!({}));
                RequestPlan::post(["workflows", args.required_str("workflowId")?, "execute"])
                    .json(data)
            }
            Self::ListExecutions => RequestPlan::get(["executions"])
                .query_opt("workflowId", args.optional_str("workflowId"))
                .query_opt("status", args.optional_str("status")),
        };
        Ok(plan)
    }
}

fn set_active(workflow_id: &str, active: bool) -> RequestPlan {
    let verb = if active { "activated" } else { "deactivated" };
    RequestPlan::patch(["workflows", workflow_id])
        .json(json!({ "active": active }))
        .confirm(format!("Workflow {workflow_id} {verb} successfully"))
}

#[cfg(test)]
mod tests {
    use super::N8nTool;
    use homelab_rest_tools::dispatch::resolve;
    use homelab_rest_tools::{Method, Rendering, RequestPlan, Route};
    use serde_json::{Value, json};

    fn plan(name: &str, args: Value) -> RequestPlan {
        let raw = args.as_object().cloned().expect("object");
        let (tool, args) = resolve::<N8nTool>(name, raw).expect("resolve");
        tool.plan(&args, &()).expect("plan")
    }

    #[test]
    fn activate_patches_active_flag_and_confirms() {
        let p = plan("activate_workflow", json!({"workflowId": "42"}));
        assert_eq!(p.method, Method::PATCH);
        assert_eq!(p.path(), "/workflows/42");
        assert_eq!(p.body, Some(json!({"active": true})));
        assert_eq!(
            p.rendering,
            Rendering::Confirmation("Workflow 42 activated successfully".to_string())
        );
    }

    #[test]
    fn deactivate_sends_false() {
        let p = plan("deactivate_workflow", json!({"workflowId": "42"}));
        assert_eq!(p.body, Some(json!({"active": false})));
        assert_eq!(
            p.rendering,
            Rendering::Confirmation("Workflow 42 deactivated successfully".to_string())
        );
    }

    #[test]
    fn list_workflows_forwards_false_filter() {
        let p = plan("list_workflows", json!({"active": false}));
        assert_eq!(p.query, vec![("active".to_string(), "false".to_string())]);
        assert!(plan("list_workflows", json!({})).query.is_empty());
    }

    #[test]
    fn execute_defaults_to_empty_payload() {
        let p = plan("execute_workflow", json!({"workflowId": "7"}));
        assert_eq!(p.method, Method::POST);
        assert_eq!(p.path(), "/workflows/7/execute");
        assert_eq!(p.body, Some(json!({})));

        let p = plan(
            "execute_workflow",
            json!({"workflowId": "7", "data": {"email": "a@b.c"}}),
        );
        assert_eq!(p.body, Some(json!({"email": "a@b.c"})));
    }

    #[test]
    fn list_executions_rejects_unknown_status() {
        let raw = json!({"status": "crashed"}).as_object().cloned().expect("object");
        let err = resolve::<N8nTool>("list_executions", raw).unwrap_err();
        assert!(err.to_string().contains("success, error, waiting"));
    }
}
