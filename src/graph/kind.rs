//! Resource type tags and the declared-name property of each.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The type tag of a template resource.
///
/// Only the first four kinds can be emulated locally; everything else is
/// kept as [`ResourceKind::Other`] with its original tag so the template
/// round-trips unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "SmolStr", into = "SmolStr")]
pub enum ResourceKind {
    /// `AWS::SNS::Topic`
    Topic,
    /// `AWS::SQS::Queue`
    Queue,
    /// `AWS::S3::Bucket`
    Bucket,
    /// `AWS::DynamoDB::Table`
    Table,
    /// Any type with no local emulation rule.
    Other(SmolStr),
}

impl ResourceKind {
    /// Every kind the indexer knows how to resolve.
    pub const SUPPORTED: [ResourceKind; 4] = [
        ResourceKind::Topic,
        ResourceKind::Queue,
        ResourceKind::Bucket,
        ResourceKind::Table,
    ];

    /// Parse a CloudFormation type tag.
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "AWS::SNS::Topic" => ResourceKind::Topic,
            "AWS::SQS::Queue" => ResourceKind::Queue,
            "AWS::S3::Bucket" => ResourceKind::Bucket,
            "AWS::DynamoDB::Table" => ResourceKind::Table,
            other => ResourceKind::Other(SmolStr::new(other)),
        }
    }

    /// The CloudFormation type tag.
    pub fn type_tag(&self) -> &str {
        match self {
            ResourceKind::Topic => "AWS::SNS::Topic",
            ResourceKind::Queue => "AWS::SQS::Queue",
            ResourceKind::Bucket => "AWS::S3::Bucket",
            ResourceKind::Table => "AWS::DynamoDB::Table",
            ResourceKind::Other(tag) => tag,
        }
    }

    /// The property holding the resource's declared name, if the kind is supported.
    pub fn name_property(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Topic => Some("TopicName"),
            ResourceKind::Queue => Some("QueueName"),
            ResourceKind::Bucket => Some("BucketName"),
            ResourceKind::Table => Some("TableName"),
            ResourceKind::Other(_) => None,
        }
    }

    /// Check if the indexer has a resolution rule for this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, ResourceKind::Other(_))
    }

    /// Short lowercase label for messages.
    pub fn display(&self) -> &str {
        match self {
            ResourceKind::Topic => "topic",
            ResourceKind::Queue => "queue",
            ResourceKind::Bucket => "bucket",
            ResourceKind::Table => "table",
            ResourceKind::Other(tag) => tag,
        }
    }
}

impl From<SmolStr> for ResourceKind {
    fn from(tag: SmolStr) -> Self {
        Self::from_type_tag(&tag)
    }
}

impl From<&str> for ResourceKind {
    fn from(tag: &str) -> Self {
        Self::from_type_tag(tag)
    }
}

impl From<ResourceKind> for SmolStr {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Other(tag) => tag,
            supported => SmolStr::new(supported.type_tag()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("AWS::SNS::Topic", ResourceKind::Topic, "TopicName")]
    #[case("AWS::SQS::Queue", ResourceKind::Queue, "QueueName")]
    #[case("AWS::S3::Bucket", ResourceKind::Bucket, "BucketName")]
    #[case("AWS::DynamoDB::Table", ResourceKind::Table, "TableName")]
    fn test_supported_type_tags(
        #[case] tag: &str,
        #[case] kind: ResourceKind,
        #[case] property: &str,
    ) {
        let parsed = ResourceKind::from_type_tag(tag);
        assert_eq!(parsed, kind);
        assert!(parsed.is_supported());
        assert_eq!(parsed.type_tag(), tag);
        assert_eq!(parsed.name_property(), Some(property));
    }

    #[test]
    fn test_unsupported_type_tag_is_preserved() {
        let kind = ResourceKind::from_type_tag("AWS::Lambda::Function");
        assert!(!kind.is_supported());
        assert_eq!(kind.name_property(), None);
        assert_eq!(kind.type_tag(), "AWS::Lambda::Function");
        assert_eq!(SmolStr::from(kind), "AWS::Lambda::Function");
    }

    #[test]
    fn test_supported_list_is_exhaustive() {
        assert!(ResourceKind::SUPPORTED.iter().all(ResourceKind::is_supported));
        assert_eq!(ResourceKind::SUPPORTED.len(), 4);
    }

    #[test]
    fn test_serde_uses_type_tag() {
        let kind: ResourceKind = serde_json::from_str("\"AWS::SQS::Queue\"").unwrap();
        assert_eq!(kind, ResourceKind::Queue);
        assert_eq!(
            serde_json::to_string(&ResourceKind::Bucket).unwrap(),
            "\"AWS::S3::Bucket\""
        );
    }
}
