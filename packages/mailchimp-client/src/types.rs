use serde::{Deserialize, Serialize};

/// A paginated collection endpoint (`count`/`offset` convention).
///
/// Each collection returns its items under a resource-specific field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Tags { list_id: String },
    Campaigns,
    InterestCategories { list_id: String },
    Interests { list_id: String, category_id: String },
    Segments { list_id: String },
}

impl Collection {
    pub fn path(&self) -> String {
        match self {
            Collection::Tags { list_id } => format!("/lists/{}/tag-search", list_id),
            Collection::Campaigns => "/campaigns".to_string(),
            Collection::InterestCategories { list_id } => {
                format!("/lists/{}/interest-categories", list_id)
            }
            Collection::Interests {
                list_id,
                category_id,
            } => format!(
                "/lists/{}/interest-categories/{}/interests",
                list_id, category_id
            ),
            Collection::Segments { list_id } => format!("/lists/{}/segments", list_id),
        }
    }

    /// Name of the array field holding the items in a page body.
    pub fn field(&self) -> &'static str {
        match self {
            Collection::Tags { .. } => "tags",
            Collection::Campaigns => "campaigns",
            Collection::InterestCategories { .. } => "categories",
            Collection::Interests { .. } => "interests",
            Collection::Segments { .. } => "segments",
        }
    }
}

/// One page of a collection.
#[derive(Debug, Clone)]
pub struct CollectionPage<T> {
    pub items: Vec<T>,
    /// `total_items` as reported upstream, when present.
    pub total_items: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub settings: Option<CampaignSettingsView>,
}

/// Subset of campaign settings echoed back by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignSettingsView {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject_line: Option<String>,
}

/// A "group" in the Mailchimp UI.
#[derive(Debug, Clone, Deserialize)]
pub struct InterestCategory {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// An option inside a group.
#[derive(Debug, Clone, Deserialize)]
pub struct Interest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// "saved", "static" or "fuzzy", depending on the account.
    #[serde(rename = "type", default)]
    pub segment_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateInterestRequest {
    pub name: String,
}

/// Body for `POST /campaigns`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCampaignRequest {
    #[serde(rename = "type")]
    pub campaign_type: String,
    pub recipients: Recipients,
    pub settings: CampaignSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipients {
    pub list_id: String,
    pub segment_opts: SegmentOpts,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentOpts {
    #[serde(rename = "match")]
    pub match_mode: String,
    pub conditions: Vec<SegmentCondition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentCondition {
    pub condition_type: String,
    pub field: String,
    pub op: String,
    pub value: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignSettings {
    pub title: String,
    pub subject_line: String,
    pub from_name: String,
    pub reply_to: String,
}

impl CreateCampaignRequest {
    /// A regular campaign sent to list members who picked `interest_id`
    /// inside the interest category `category_id`.
    pub fn for_interest(
        list_id: &str,
        category_id: &str,
        interest_id: &str,
        settings: CampaignSettings,
    ) -> Self {
        Self {
            campaign_type: "regular".to_string(),
            recipients: Recipients {
                list_id: list_id.to_string(),
                segment_opts: SegmentOpts {
                    match_mode: "all".to_string(),
                    conditions: vec![SegmentCondition {
                        condition_type: "Interests".to_string(),
                        field: format!("interests-{}", category_id),
                        op: "interestcontains".to_string(),
                        value: vec![interest_id.to_string()],
                    }],
                },
            },
            settings,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignContent {
    pub html: String,
}

/// Minimal view of a created object: only the id is relied on.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths_and_fields() {
        let interests = Collection::Interests {
            list_id: "abc".into(),
            category_id: "3da1d0b028".into(),
        };
        assert_eq!(
            interests.path(),
            "/lists/abc/interest-categories/3da1d0b028/interests"
        );
        assert_eq!(interests.field(), "interests");

        let tags = Collection::Tags {
            list_id: "abc".into(),
        };
        assert_eq!(tags.path(), "/lists/abc/tag-search");
        assert_eq!(tags.field(), "tags");

        assert_eq!(Collection::Campaigns.field(), "campaigns");
    }

    #[test]
    fn test_campaign_request_targets_interest() {
        let request = CreateCampaignRequest::for_interest(
            "list1",
            "cat1",
            "int1",
            CampaignSettings {
                title: "Health Committee".into(),
                subject_line: "Update".into(),
                from_name: "Reports".into(),
                reply_to: "reports@example.org".into(),
            },
        );

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["type"], "regular");
        assert_eq!(json["recipients"]["list_id"], "list1");
        assert_eq!(json["recipients"]["segment_opts"]["match"], "all");
        let condition = &json["recipients"]["segment_opts"]["conditions"][0];
        assert_eq!(condition["condition_type"], "Interests");
        assert_eq!(condition["field"], "interests-cat1");
        assert_eq!(condition["op"], "interestcontains");
        assert_eq!(condition["value"][0], "int1");
        assert_eq!(json["settings"]["title"], "Health Committee");
    }
}
