//! Static capability manifest served at `/agent/capabilities`.

use std::collections::BTreeMap;

use serde::Serialize;

use aibridge_common::BRIDGE_VERSION;

#[derive(Clone, Debug, Serialize)]
pub struct Capability {
    pub name: &'static str,
    pub description: &'static str,
    pub params: BTreeMap<&'static str, &'static str>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityManifest {
    pub version: &'static str,
    pub capabilities: Vec<Capability>,
    pub ai_mode: &'static str,
}

fn capability(
    name: &'static str,
    description: &'static str,
    params: &[(&'static str, &'static str)],
) -> Capability {
    Capability {
        name,
        description,
        params: params.iter().copied().collect(),
    }
}

/// The fixed action vocabulary plus the chain surfaces.
pub fn capabilities(live_ai: bool) -> CapabilityManifest {
    CapabilityManifest {
        version: BRIDGE_VERSION,
        capabilities: vec![
            capability(
                "query",
                "Process natural language queries using AI",
                &[("prompt", "The query to process")],
            ),
            capability(
                "transact",
                "Execute transactions on the NEAR blockchain",
                &[
                    ("contractId", "NEAR contract to interact with"),
                    ("method", "Contract method to call"),
                    ("args", "Arguments to pass to the method"),
                ],
            ),
            capability(
                "analyze",
                "Analyze data using AI capabilities",
                &[("data", "Data to analyze")],
            ),
            capability(
                "status",
                "Get detailed status of the agent and its connections",
                &[],
            ),
            capability(
                "zcash",
                "Interact with Zcash blockchain and privacy features",
                &[
                    ("operation", "Operation type (transfer, shield, deshield, private)"),
                    ("amount", "Amount to transfer or shield"),
                    ("recipient", "Recipient address"),
                ],
            ),
            capability(
                "secret",
                "Execute privacy-preserving operations using Secret Network TEEs",
                &[
                    ("operation", "Operation type (swap, compute, query)"),
                    ("privacy", "Privacy level (maximum, standard, minimal)"),
                    ("data", "Data to process in TEE"),
                ],
            ),
        ],
        ai_mode: if live_ai {
            "Using NEAR AI API"
        } else {
            "Using simulation mode"
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_shape() {
        let manifest = serde_json::to_value(capabilities(false)).unwrap();
        assert_eq!(manifest["version"], "alpha-0.1.0");
        assert_eq!(manifest["aiMode"], "Using simulation mode");
        let names: Vec<_> = manifest["capabilities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["query", "transact", "analyze", "status", "zcash", "secret"]);
        assert!(manifest["capabilities"][3]["params"].as_object().unwrap().is_empty());
    }
}
