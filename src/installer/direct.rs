//! Direct installer: one create call per persona, then one per rule.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::Result;
use crate::persona::{Manifest, PersonaRole};

use super::client::ApiClient;
use super::{value_as_id, InstallSummary, InstalledRecord, Installer};

const PERSONAS_PATH: &str = "personas";
const RULES_PATH: &str = "rules";

pub struct DirectInstaller {
    client: ApiClient,
}

impl DirectInstaller {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn id_of(reply: &Value) -> Option<String> {
    reply.get("id").and_then(value_as_id)
}

#[async_trait]
impl Installer for DirectInstaller {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn install(&self, manifest: &Manifest) -> Result<InstallSummary> {
        let mut summary = InstallSummary::default();
        let mut persona_ids: HashMap<PersonaRole, String> = HashMap::new();

        for persona in &manifest.personas {
            let reply = self
                .client
                .post_json(
                    PERSONAS_PATH,
                    &json!({ "name": persona.name, "prompt": persona.rendered_prompt }),
                )
                .await?;

            let id = id_of(&reply);
            info!(role = %persona.role, name = %persona.name, id = ?id, "Persona created");
            if let Some(id) = &id {
                persona_ids.insert(persona.role, id.clone());
            }
            summary.personas.push(InstalledRecord {
                name: persona.name.clone(),
                id,
            });
        }

        for rule in &manifest.rules {
            let instruction = if rule.needs_persona_id() {
                match persona_ids.get(&rule.role) {
                    Some(id) => rule.instruction_for(id),
                    None => {
                        warn!(rule = %rule.name, role = %rule.role, "No persona id returned, skipping rule");
                        continue;
                    }
                }
            } else {
                rule.instruction_text.clone()
            };

            let reply = self
                .client
                .post_json(
                    RULES_PATH,
                    &json!({ "condition": rule.trigger_condition, "instruction": instruction }),
                )
                .await?;

            let id = id_of(&reply);
            info!(rule = %rule.name, id = ?id, "Rule created");
            summary.rules.push(InstalledRecord {
                name: rule.name.clone(),
                id,
            });
        }

        summary.success = true;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::persona::{PersonaNames, TemplateStore};
    use mockito::{Matcher, Server};
    use std::time::Duration;
    use tempfile::TempDir;

    fn manifest() -> Manifest {
        let tmp = TempDir::new().unwrap();
        let store = TemplateStore::new(tmp.path());
        Manifest::build(&store, &PersonaNames::default(), "/ledger.md", "persona").unwrap()
    }

    fn installer(url: &str) -> DirectInstaller {
        DirectInstaller::new(ApiClient::new(url, "tok".into(), Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_creates_personas_then_rules() {
        let mut server = Server::new_async().await;
        let personas = server
            .mock("POST", "/personas")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"id": "p-1"}"#)
            .expect(7)
            .create_async()
            .await;
        let switch_rules = server
            .mock("POST", "/rules")
            .match_body(Matcher::Regex("set_active_persona\\('p-1'\\)".into()))
            .with_status(200)
            .with_body(r#"{"id": "r-1"}"#)
            .expect(4)
            .create_async()
            .await;
        let methodology_rules = server
            .mock("POST", "/rules")
            .match_body(Matcher::Regex("without switching persona".into()))
            .with_status(200)
            .with_body(r#"{"id": "r-2"}"#)
            .expect(2)
            .create_async()
            .await;

        let summary = installer(&server.url()).install(&manifest()).await.unwrap();

        assert!(summary.success);
        assert_eq!(summary.personas.len(), 7);
        assert_eq!(summary.rules.len(), 6);
        assert_eq!(summary.personas[0].id.as_deref(), Some("p-1"));
        personas.assert_async().await;
        switch_rules.assert_async().await;
        methodology_rules.assert_async().await;
    }

    #[tokio::test]
    async fn test_switch_rules_skipped_without_persona_id() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/personas")
            .with_status(200)
            .with_body(r#"{"id": ""}"#)
            .create_async()
            .await;
        let rules = server
            .mock("POST", "/rules")
            .with_status(200)
            .with_body("{}")
            .expect(2)
            .create_async()
            .await;

        let summary = installer(&server.url()).install(&manifest()).await.unwrap();

        assert_eq!(summary.rules.len(), 2);
        assert!(summary.rules.iter().all(|r| r.name.ends_with("methodology")));
        rules.assert_async().await;
    }

    #[tokio::test]
    async fn test_first_failure_stops_install() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/personas")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;
        let rules = server
            .mock("POST", "/rules")
            .expect(0)
            .create_async()
            .await;

        let err = installer(&server.url()).install(&manifest()).await.unwrap_err();

        assert!(matches!(err, Error::RemoteStatus { status: 500, .. }));
        rules.assert_async().await;
    }
}
