//! Output formatting for Claude Code hook responses
//!
//! Produces the JSON output format expected by Claude Code hooks. An allow
//! is the empty object.

use serde::Serialize;

use crate::rules::Violation;

/// Main output structure for Claude Code hooks
#[derive(Debug, Serialize)]
pub struct HookOutput {
    /// Hook-specific output containing the permission decision
    #[serde(rename = "hookSpecificOutput", skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,

    /// Optional system message to show the user
    #[serde(rename = "systemMessage", skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

/// Hook-specific output with permission decision
#[derive(Debug, Serialize)]
pub struct HookSpecificOutput {
    /// The hook event name (typically "PreToolUse")
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,

    /// Permission decision, always "deny" when present
    #[serde(rename = "permissionDecision")]
    pub permission_decision: String,

    /// Why the action was denied
    #[serde(rename = "permissionDecisionReason")]
    pub permission_decision_reason: String,
}

/// Decision result from the guard engine
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Allow the operation
    Allow { reason: String },

    /// Deny the operation. Content writes carry every violation found.
    Deny {
        rule_id: String,
        reason: String,
        violations: Vec<Violation>,
    },

    /// Warn but allow (warn-only mode)
    Warn { rule_id: String, reason: String },
}

impl Decision {
    /// Create an allow decision
    pub fn allow(reason: impl Into<String>) -> Self {
        Decision::Allow {
            reason: reason.into(),
        }
    }

    /// Create a deny decision
    pub fn deny(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Decision::Deny {
            rule_id: rule_id.into(),
            reason: reason.into(),
            violations: Vec::new(),
        }
    }

    /// Deny a content write. The reason lists every violation in rule order.
    pub fn deny_violations(violations: Vec<Violation>) -> Self {
        let rule_id = violations
            .first()
            .map(|v| v.id.clone())
            .unwrap_or_else(|| "anti-pattern".to_string());

        let messages: Vec<String> = violations.iter().map(Violation::describe).collect();
        let reason = format!("Anti-pattern detected:\n{}", messages.join("\n\n"));

        Decision::Deny {
            rule_id,
            reason,
            violations,
        }
    }

    /// Check if this is an allow decision
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    /// Check if this is a deny decision
    pub fn is_deny(&self) -> bool {
        matches!(self, Decision::Deny { .. })
    }

    /// Get the rule ID if applicable
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Decision::Allow { .. } => None,
            Decision::Deny { rule_id, .. } => Some(rule_id),
            Decision::Warn { rule_id, .. } => Some(rule_id),
        }
    }

    /// Get the reason
    pub fn reason(&self) -> &str {
        match self {
            Decision::Allow { reason } => reason,
            Decision::Deny { reason, .. } => reason,
            Decision::Warn { reason, .. } => reason,
        }
    }

    /// Violations behind a content-write denial
    pub fn violations(&self) -> &[Violation] {
        match self {
            Decision::Deny { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Downgrade a denial to a warning
    pub fn into_warning(self) -> Self {
        match self {
            Decision::Deny {
                rule_id, reason, ..
            } => Decision::Warn { rule_id, reason },
            other => other,
        }
    }
}

impl HookOutput {
    /// Create an allow response (empty output = allow)
    pub fn allow() -> Self {
        HookOutput {
            hook_specific_output: None,
            system_message: None,
        }
    }

    /// Create a deny response with reason
    pub fn deny(hook_event_name: &str, reason: &str) -> Self {
        HookOutput {
            hook_specific_output: Some(HookSpecificOutput {
                hook_event_name: hook_event_name.to_string(),
                permission_decision: "deny".to_string(),
                permission_decision_reason: reason.to_string(),
            }),
            system_message: None,
        }
    }

    /// Create a warn response (allows but shows warning)
    pub fn warn(message: &str) -> Self {
        HookOutput {
            hook_specific_output: None,
            system_message: Some(format!("[code-guardian] Warning: {}", message)),
        }
    }

    /// Create output from a Decision
    pub fn from_decision(decision: &Decision, hook_event_name: &str) -> Self {
        match decision {
            Decision::Allow { .. } => HookOutput::allow(),
            Decision::Deny { reason, .. } => HookOutput::deny(hook_event_name, reason),
            Decision::Warn { reason, .. } => HookOutput::warn(reason),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
