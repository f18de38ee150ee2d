//! Wire shapes for the Jira REST API and their mapping into the domain model.

use serde::{Deserialize, Serialize};

use crate::model::{Assignee, ChangeEvent, Issue, IssueHistory, IssueType};

/// A user from `/rest/api/3/user/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerUser {
  pub account_id: String,
  pub email_address: Option<String>,
  pub display_name: Option<String>,
}

impl TrackerUser {
  pub fn matches_email(&self, email: &str) -> bool {
    self.email_address.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  #[serde(default)]
  pub start_at: u64,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraAccount {
  pub account_id: Option<String>,
  pub email_address: Option<String>,
  pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
  pub summary: Option<String>,
  pub assignee: Option<JiraAccount>,
  pub issuetype: Option<Named>,
  pub status: Option<Named>,
  #[serde(rename = "customfield_10026")]
  pub story_points: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
  pub field: String,
  #[serde(rename = "fromString")]
  pub from_value: Option<String>,
  #[serde(rename = "toString")]
  pub to_value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct History {
  pub author: Option<JiraAccount>,
  pub created: Option<String>,
  #[serde(default)]
  pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
  #[serde(default)]
  pub histories: Vec<History>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
  pub key: String,
  #[serde(default)]
  pub fields: IssueFields,
  pub changelog: Option<Changelog>,
}

impl JiraIssue {
  pub fn type_name(&self) -> Option<&str> {
    self.fields.issuetype.as_ref().and_then(|t| t.name.as_deref())
  }

  /// Jira lists histories newest-first; the domain history is oldest-first,
  /// with each history's items kept in their listed order.
  pub fn into_issue(self) -> Issue {
    let JiraIssue { key, fields, changelog } = self;

    let events: Vec<ChangeEvent> = changelog
      .map(|c| c.histories)
      .unwrap_or_default()
      .into_iter()
      .rev()
      .flat_map(|h| {
        let timestamp = h.created.unwrap_or_default();
        let author = h.author.and_then(|a| a.email_address.or(a.display_name));
        h.items.into_iter().map(move |item| ChangeEvent {
          field_name: item.field,
          from_value: item.from_value,
          to_value: item.to_value,
          timestamp: timestamp.clone(),
          author: author.clone(),
        })
      })
      .collect();

    let assignee = fields
      .assignee
      .map(|a| Assignee { account_id: a.account_id, email: a.email_address, display_name: a.display_name })
      .unwrap_or_default();

    Issue {
      key,
      assignee,
      issue_type: IssueType::from_name(fields.issuetype.and_then(|t| t.name).as_deref().unwrap_or("")),
      story_points: fields.story_points,
      status: fields.status.and_then(|s| s.name),
      title: fields.summary,
      history: IssueHistory::new(events),
    }
  }
}
