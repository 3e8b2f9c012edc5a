//! Read-only listing of an audience's tags, campaigns, groups and segments.
//!
//! Output is one CSV section per resource, each preceded by a `# TITLE` line,
//! for operators checking what exists before or after provisioning.

use mailchimp_client::{
    Campaign, Collection, Interest, InterestCategory, MailchimpClient, Segment, Tag,
};
use serde::de::DeserializeOwned;
use std::io::Write;

use crate::common::{fetch_all, FetchError};
use crate::kernel::MailchimpSource;

/// An interest category with all of its interests.
#[derive(Debug, Clone)]
pub struct Group {
    pub category: InterestCategory,
    pub interests: Vec<Interest>,
}

pub struct Audience {
    client: MailchimpClient,
    list_id: String,
    page_size: u64,
}

impl Audience {
    pub fn new(client: MailchimpClient, list_id: impl Into<String>, page_size: u64) -> Self {
        Self {
            client,
            list_id: list_id.into(),
            page_size,
        }
    }

    async fn fetch<T>(&self, collection: Collection) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let source = MailchimpSource::<T>::new(self.client.clone(), collection);
        fetch_all(&source, self.page_size).await
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, FetchError> {
        self.fetch(Collection::Tags {
            list_id: self.list_id.clone(),
        })
        .await
    }

    pub async fn campaigns(&self) -> Result<Vec<Campaign>, FetchError> {
        self.fetch(Collection::Campaigns).await
    }

    /// Every interest category, each with its interests (one walk per category).
    pub async fn groups(&self) -> Result<Vec<Group>, FetchError> {
        let categories: Vec<InterestCategory> = self
            .fetch(Collection::InterestCategories {
                list_id: self.list_id.clone(),
            })
            .await?;

        let mut groups = Vec::with_capacity(categories.len());
        for category in categories {
            let interests = self
                .fetch(Collection::Interests {
                    list_id: self.list_id.clone(),
                    category_id: category.id.clone(),
                })
                .await?;
            groups.push(Group {
                category,
                interests,
            });
        }
        Ok(groups)
    }

    pub async fn segments(&self) -> Result<Vec<Segment>, FetchError> {
        self.fetch(Collection::Segments {
            list_id: self.list_id.clone(),
        })
        .await
    }
}

fn section<'a, W: Write>(
    out: &'a mut W,
    title: &str,
    header: &[&str],
) -> csv::Result<csv::Writer<&'a mut W>> {
    writeln!(out, "# {} ({})", title, header.join(","))?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header)?;
    Ok(writer)
}

pub fn write_tags<W: Write>(out: &mut W, tags: &[Tag]) -> csv::Result<()> {
    let mut writer = section(out, "TAGS", &["id", "name"])?;
    for tag in tags {
        writer.write_record([tag.id.to_string(), tag.name.clone().unwrap_or_default()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_campaigns<W: Write>(out: &mut W, campaigns: &[Campaign]) -> csv::Result<()> {
    let mut writer = section(
        out,
        "CAMPAIGNS",
        &["id", "title", "subject_line", "status"],
    )?;
    for campaign in campaigns {
        let settings = campaign.settings.clone().unwrap_or_default();
        writer.write_record([
            campaign.id.clone(),
            settings.title.unwrap_or_default(),
            settings.subject_line.unwrap_or_default(),
            campaign.status.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Categories without interests still get a row, with the interest columns blank.
pub fn write_groups<W: Write>(out: &mut W, groups: &[Group]) -> csv::Result<()> {
    let mut writer = section(
        out,
        "GROUPS",
        &["category_id", "category_title", "interest_id", "interest_name"],
    )?;
    for group in groups {
        let category_id = group.category.id.as_str();
        let category_title = group.category.title.as_deref().unwrap_or_default();
        if group.interests.is_empty() {
            writer.write_record([category_id, category_title, "", ""])?;
        }
        for interest in &group.interests {
            writer.write_record([
                category_id,
                category_title,
                interest.id.as_str(),
                interest.name.as_deref().unwrap_or_default(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_segments<W: Write>(out: &mut W, segments: &[Segment]) -> csv::Result<()> {
    let mut writer = section(out, "SEGMENTS", &["id", "name", "type"])?;
    for segment in segments {
        writer.write_record([
            segment.id.to_string(),
            segment.name.clone().unwrap_or_default(),
            segment.segment_type.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
