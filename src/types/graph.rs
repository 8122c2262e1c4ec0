use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Entity,
    Concept,
    Section,
    Reference,
    Note,
    System,
    Person,
    Organization,
    Event,
    Place,
    Item,
    Document,
    Location,
    Project,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "ENTITY",
            Self::Concept => "CONCEPT",
            Self::Section => "SECTION",
            Self::Reference => "REFERENCE",
            Self::Note => "NOTE",
            Self::System => "SYSTEM",
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Event => "EVENT",
            Self::Place => "PLACE",
            Self::Item => "ITEM",
            Self::Document => "DOCUMENT",
            Self::Location => "LOCATION",
            Self::Project => "PROJECT",
        }
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ENTITY" => Ok(Self::Entity),
            "CONCEPT" => Ok(Self::Concept),
            "SECTION" => Ok(Self::Section),
            "REFERENCE" => Ok(Self::Reference),
            "NOTE" => Ok(Self::Note),
            "SYSTEM" => Ok(Self::System),
            "PERSON" => Ok(Self::Person),
            "ORGANIZATION" => Ok(Self::Organization),
            "EVENT" => Ok(Self::Event),
            "PLACE" => Ok(Self::Place),
            "ITEM" => Ok(Self::Item),
            "DOCUMENT" => Ok(Self::Document),
            "LOCATION" => Ok(Self::Location),
            "PROJECT" => Ok(Self::Project),
            _ => Err(format!("Unknown node type: {}", s)),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    AffiliatedWith,
    ParticipatedIn,
    LocatedIn,
    PartOf,
    References,
    ProducedBy,
    SimilarTo,
    RelatedTo,
    Mentions,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AffiliatedWith => "AFFILIATED_WITH",
            Self::ParticipatedIn => "PARTICIPATED_IN",
            Self::LocatedIn => "LOCATED_IN",
            Self::PartOf => "PART_OF",
            Self::References => "REFERENCES",
            Self::ProducedBy => "PRODUCED_BY",
            Self::SimilarTo => "SIMILAR_TO",
            Self::RelatedTo => "RELATED_TO",
            Self::Mentions => "MENTIONS",
        }
    }
}

impl std::str::FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AFFILIATED_WITH" => Ok(Self::AffiliatedWith),
            "PARTICIPATED_IN" => Ok(Self::ParticipatedIn),
            "LOCATED_IN" => Ok(Self::LocatedIn),
            "PART_OF" => Ok(Self::PartOf),
            "REFERENCES" => Ok(Self::References),
            "PRODUCED_BY" => Ok(Self::ProducedBy),
            "SIMILAR_TO" => Ok(Self::SimilarTo),
            "RELATED_TO" => Ok(Self::RelatedTo),
            "MENTIONS" => Ok(Self::Mentions),
            _ => Err(format!("Unknown edge type: {}", s)),
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    pub name: String,

    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_uri: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            node_type,
            name: name.into(),
            properties: HashMap::new(),
            source_uri: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_source_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }

    /// Name followed by the property values, the text that indexes and
    /// embedders see for this node.
    pub fn searchable_text(&self) -> String {
        let mut keys: Vec<&String> = self.properties.keys().collect();
        keys.sort();

        let mut text = self.name.clone();
        for key in keys {
            match &self.properties[key] {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => {
                    text.push(' ');
                    text.push_str(s);
                }
                other => {
                    text.push(' ');
                    text.push_str(&other.to_string());
                }
            }
        }
        text
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: String,

    pub source_id: String,

    pub target_id: String,

    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_uri: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type,
            properties: HashMap::new(),
            source_uri: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// The endpoint on the other side of `node_id`.
    pub fn far_end(&self, node_id: &str) -> &str {
        if self.source_id == node_id {
            &self.target_id
        } else {
            &self.source_id
        }
    }
}
