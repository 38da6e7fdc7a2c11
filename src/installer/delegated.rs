//! Delegated installer: the whole manifest as one instruction to the
//! assistant endpoint, with the summary parsed from its reply text.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{Error, Result};
use crate::persona::rules::PERSONA_ID_KEY;
use crate::persona::{Manifest, RuleKind};

use super::client::ApiClient;
use super::extract::summary_from_output;
use super::{InstallSummary, Installer};

const REPLY_SHAPE: &str = r#"{"success": true, "personas": [{"name": "<persona name>", "id": "<persona id>"}], "rules": [{"name": "<rule name>", "id": "<rule id>"}], "error": null}"#;

pub struct DelegatedInstaller {
    client: ApiClient,
    endpoint: String,
}

impl DelegatedInstaller {
    pub fn new(client: ApiClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

/// Natural-language instruction listing every tool call and the reply shape.
pub fn build_instruction(manifest: &Manifest) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "Install the following personas and rules. Work through the steps in order.");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "1. For each persona below, call create_persona with its name and the full prompt text between the BEGIN/END markers. Record the id it returns."
    );
    let _ = writeln!(
        out,
        "2. For each rule below, call create_rule with its condition and instruction. In hard-switch instructions, replace {{{{{}}}}} with the id recorded for the rule's persona.",
        PERSONA_ID_KEY
    );
    let _ = writeln!(
        out,
        "3. Reply with a single JSON object and nothing else, exactly in this shape:"
    );
    let _ = writeln!(out, "{}", REPLY_SHAPE);
    let _ = writeln!(
        out,
        "If any call fails, stop and reply with \"success\": false, the records created so far, and the failure in \"error\"."
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Personas ({})", manifest.personas.len());
    for (i, persona) in manifest.personas.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}. {} ({})", i + 1, persona.name, persona.role);
        let _ = writeln!(out, "----- BEGIN PROMPT -----");
        let _ = writeln!(out, "{}", persona.rendered_prompt.trim_end());
        let _ = writeln!(out, "----- END PROMPT -----");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Rules ({})", manifest.rules.len());
    for rule in &manifest.rules {
        let persona = manifest
            .persona(rule.role)
            .map(|p| p.name.as_str())
            .unwrap_or(rule.role.slug());
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}", rule.name);
        let _ = writeln!(out, "- kind: {}", rule.kind);
        if rule.kind == RuleKind::HardSwitch {
            let _ = writeln!(out, "- persona: {}", persona);
        }
        let _ = writeln!(out, "- condition: {}", rule.trigger_condition);
        let _ = writeln!(out, "- instruction: {}", rule.instruction_text);
    }

    out
}

#[async_trait]
impl Installer for DelegatedInstaller {
    fn name(&self) -> &'static str {
        "delegated"
    }

    async fn install(&self, manifest: &Manifest) -> Result<InstallSummary> {
        let instruction = build_instruction(manifest);
        info!(
            endpoint = %self.endpoint,
            chars = instruction.len(),
            "Sending install instruction"
        );

        let reply = self
            .client
            .post_json(&self.endpoint, &json!({ "input": instruction }))
            .await?;

        let output = reply.get("output").and_then(Value::as_str).ok_or_else(|| {
            Error::remote_malformed(
                self.client.endpoint(&self.endpoint),
                "reply has no 'output' text",
            )
        })?;

        Ok(summary_from_output(output))
    }
}
