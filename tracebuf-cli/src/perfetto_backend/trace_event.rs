use anyhow::Context;
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum InstantScope {
    #[serde(rename = "t")]
    Thread,
}

pub type TracingArgsMap<T> = std::collections::BTreeMap<String, T>;

#[derive(Debug, Serialize, Clone, PartialEq)]
// rename the enum variants to match the Perfetto trace event types
// ==> {ph = "X", "i", "M"} in one dictionary (tagged enum)
#[serde(tag = "ph")]
pub enum TracingEvent {
    #[serde(rename = "X")]
    Complete {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cat: Option<String>,
        pid: u32,
        tid: u32,
        ts: u64,
        dur: u64,
        #[serde(skip_serializing_if = "TracingArgsMap::is_empty")]
        args: TracingArgsMap<String>,
    },
    #[serde(rename = "i")]
    Instant {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cat: Option<String>,
        ts: u64,
        pid: u32,
        tid: u32,
        #[serde(rename = "s")]
        scope: InstantScope,
        #[serde(skip_serializing_if = "TracingArgsMap::is_empty")]
        args: TracingArgsMap<String>,
    },
    #[serde(rename = "M")]
    Metadata {
        name: String,
        pid: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        tid: Option<u32>,
        #[serde(skip_serializing_if = "TracingArgsMap::is_empty")]
        args: TracingArgsMap<String>,
    },
}

impl TracingEvent {
    /// Convert the tracing event to a JSON string for Perfetto
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("Failed to serialize TracingEvent to JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_event_json() {
        let event = TracingEvent::Instant {
            name: "99".to_string(),
            cat: None,
            ts: 1500,
            pid: 1,
            tid: 0,
            scope: InstantScope::Thread,
            args: TracingArgsMap::from([("value".to_string(), "0x00000063".to_string())]),
        };

        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ph": "i",
                "name": "99",
                "ts": 1500,
                "pid": 1,
                "tid": 0,
                "s": "t",
                "args": { "value": "0x00000063" }
            })
        );
    }

    #[test]
    fn test_complete_event_skips_empty_fields() {
        let event = TracingEvent::Complete {
            name: "group 0".to_string(),
            cat: None,
            pid: 1,
            tid: 1,
            ts: 10,
            dur: 30,
            args: TracingArgsMap::new(),
        };

        let json = event.to_json().unwrap();
        assert!(!json.contains("cat"));
        assert!(!json.contains("args"));
        assert!(json.contains("\"ph\":\"X\""));
    }
}
