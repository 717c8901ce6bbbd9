//! Catalog of recognized infrastructure services.
//!
//! A [`ServiceCatalog`] maps a canonical service key (the token form that
//! appears in diagram text, e.g. `ec2`) to a human-readable display name.
//! It is fixed for the lifetime of a run and passed explicitly into every
//! component that filters tokens; membership decides whether an extracted
//! token is counted at all.

use std::collections::HashMap;

/// Builtin AWS service keys and display names.
const BUILTIN_SERVICES: &[(&str, &str)] = &[
    ("ec2", "Amazon EC2"),
    ("s3", "Amazon S3"),
    ("lambda", "AWS Lambda"),
    ("dynamodb", "Amazon DynamoDB"),
    ("rds", "Amazon RDS"),
    ("cloudfront", "Amazon CloudFront"),
    ("apigateway", "Amazon API Gateway"),
    ("sns", "Amazon SNS"),
    ("sqs", "Amazon SQS"),
    ("kinesis", "Amazon Kinesis"),
    ("ecs", "Amazon ECS"),
    ("eks", "Amazon EKS"),
    ("fargate", "AWS Fargate"),
    ("elasticache", "Amazon ElastiCache"),
    ("redshift", "Amazon Redshift"),
    ("route53", "Amazon Route 53"),
    ("cloudwatch", "Amazon CloudWatch"),
    ("stepfunctions", "AWS Step Functions"),
    ("glue", "AWS Glue"),
    ("athena", "Amazon Athena"),
];

/// Read-only mapping of canonical service keys to display names.
///
/// Tokens absent from the catalog are dropped during ingestion; they are
/// never counted and never reported as errors.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    entries: HashMap<String, String>,
}

impl ServiceCatalog {
    /// The builtin AWS catalog.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_SERVICES.iter().copied())
    }

    /// Build a catalog from `(key, display name)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(key, name)| (key.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// Parse a catalog from a JSON object of key -> display name.
    ///
    /// ## Errors
    ///
    /// Returns the underlying parse error if `json` is not a flat string
    /// object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Whether `key` is a recognized service.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Display name for `key`, `None` if unrecognized.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over the canonical keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
