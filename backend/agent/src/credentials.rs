use coachline_config::AgentSection;

/// Credentials for the agent service. Only their presence matters here.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AgentCredentials {
    pub agent_id: Option<String>,
    pub api_key: Option<String>,
    pub branch_id: Option<String>,
}

impl AgentCredentials {
    pub fn new(agent_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            api_key: Some(api_key.into()),
            branch_id: None,
        }
    }

    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// True iff both the agent id and the api key are non-empty.
    pub fn is_configured(&self) -> bool {
        non_empty(&self.agent_id).is_some() && non_empty(&self.api_key).is_some()
    }

    pub(crate) fn agent_id(&self) -> Option<&str> {
        non_empty(&self.agent_id)
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        non_empty(&self.api_key)
    }

    pub(crate) fn branch_id(&self) -> Option<&str> {
        non_empty(&self.branch_id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl From<&AgentSection> for AgentCredentials {
    fn from(section: &AgentSection) -> Self {
        Self {
            agent_id: section.agent_id.clone(),
            api_key: section.api_key.clone(),
            branch_id: section.branch_id.clone(),
        }
    }
}

// Keep the key out of debug output.
impl std::fmt::Debug for AgentCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentCredentials")
            .field("agent_id", &self.agent_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("branch_id", &self.branch_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_check() {
        assert!(!AgentCredentials::default().is_configured());
        assert!(!AgentCredentials::new("", "sk_x").is_configured());
        assert!(!AgentCredentials::new("agent", " ").is_configured());
        assert!(AgentCredentials::new("agent", "sk_x").is_configured());
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = AgentCredentials::new("agent", "sk_super_secret");
        assert!(!format!("{creds:?}").contains("sk_super_secret"));
    }

    #[test]
    fn test_from_config_section() {
        let section = AgentSection {
            agent_id: Some("agent_9".into()),
            api_key: Some("sk_9".into()),
            branch_id: Some("main".into()),
        };
        let creds = AgentCredentials::from(&section);
        assert!(creds.is_configured());
        assert_eq!(creds.branch_id(), Some("main"));
    }
}
