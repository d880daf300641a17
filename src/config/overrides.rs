use serde::Serialize;

/// Values given on the command line, layered over every other source.
///
/// Absent fields are skipped so they never clobber file or environment values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(rename = "simulated_latency_ms", skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<u64>>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.latency_ms.is_none() && self.items.is_none()
    }

    /// Re-encode as global CLI flags so a child process sees the same values
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(latency_ms) = self.latency_ms {
            args.push("--latency-ms".to_string());
            args.push(latency_ms.to_string());
        }
        if let Some(items) = &self.items {
            let joined = items
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            args.push(format!("--items={joined}"));
        }
        args
    }
}
