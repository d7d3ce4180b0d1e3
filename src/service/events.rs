//! Event-source bindings of a function.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::resolve::RefExpr;

/// The source side of an event binding that points at a resource by ARN.
///
/// Serverless accepts both a bare ARN and a detailed block:
///
/// ```yaml
/// - sqs: arn:aws:sqs:us-east-1:000000000000:jobs
/// - sqs:
///     arn: !GetAtt Jobs.Arn
///     batchSize: 10
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ArnSource {
    /// `sqs: <arn>`
    Short(RefExpr),
    /// `sqs: { arn: <arn>, ... }`
    Detailed {
        /// The ARN-shaped field.
        arn: RefExpr,
        /// The other settings of the binding, kept verbatim.
        extra: IndexMap<String, Value>,
    },
}

impl ArnSource {
    /// The ARN-shaped field.
    pub fn arn(&self) -> &RefExpr {
        match self {
            ArnSource::Short(arn) | ArnSource::Detailed { arn, .. } => arn,
        }
    }

    /// The ARN-shaped field, mutably.
    pub fn arn_mut(&mut self) -> &mut RefExpr {
        match self {
            ArnSource::Short(arn) | ArnSource::Detailed { arn, .. } => arn,
        }
    }

    fn decode(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) if map.contains_key("arn") => {
                let mut arn = Value::Null;
                let mut extra = IndexMap::with_capacity(map.len() - 1);
                for (key, value) in map {
                    if key == "arn" {
                        arn = value;
                    } else {
                        extra.insert(key, value);
                    }
                }
                let arn = RefExpr::decode(arn).map_err(|e| e.to_string())?;
                Ok(ArnSource::Detailed { arn, extra })
            }
            other => RefExpr::decode(other)
                .map(ArnSource::Short)
                .map_err(|e| e.to_string()),
        }
    }

    fn encode(&self) -> Value {
        match self {
            ArnSource::Short(arn) => arn.encode(),
            ArnSource::Detailed { arn, extra } => {
                let mut map = Map::new();
                map.insert("arn".to_string(), arn.encode());
                for (key, value) in extra {
                    map.insert(key.clone(), value.clone());
                }
                Value::Object(map)
            }
        }
    }
}

/// One entry of a function's `events` list.
#[derive(Clone, Debug, PartialEq)]
pub enum EventBinding {
    /// `- sqs: ...`, a queue consumer.
    Sqs(ArnSource),
    /// `- stream: ...`, a DynamoDB or Kinesis stream consumer.
    Stream(ArnSource),
    /// `- sns: ...`, a topic subscription.
    Sns(ArnSource),
    /// Any other binding (`http`, `schedule`, `s3`, ...), kept verbatim.
    Other(Value),
}

impl EventBinding {
    /// The binding key as written in the document.
    pub fn kind(&self) -> &str {
        match self {
            EventBinding::Sqs(_) => "sqs",
            EventBinding::Stream(_) => "stream",
            EventBinding::Sns(_) => "sns",
            EventBinding::Other(Value::Object(map)) if map.len() == 1 => {
                map.keys().next().map_or("unknown", String::as_str)
            }
            EventBinding::Other(_) => "unknown",
        }
    }

    /// The ARN-shaped field, for kinds that carry one.
    pub fn arn(&self) -> Option<&RefExpr> {
        match self {
            EventBinding::Sqs(source) | EventBinding::Stream(source) | EventBinding::Sns(source) => {
                Some(source.arn())
            }
            EventBinding::Other(_) => None,
        }
    }

    /// The ARN-shaped field, mutably.
    pub fn arn_mut(&mut self) -> Option<&mut RefExpr> {
        match self {
            EventBinding::Sqs(source) | EventBinding::Stream(source) | EventBinding::Sns(source) => {
                Some(source.arn_mut())
            }
            EventBinding::Other(_) => None,
        }
    }

    fn decode(value: Value) -> Result<Self, String> {
        let map = match value {
            Value::Object(map) if map.len() == 1 => map,
            other => return Ok(EventBinding::Other(other)),
        };
        let Some((key, inner)) = map.into_iter().next() else {
            return Ok(EventBinding::Other(Value::Object(Map::new())));
        };
        let wrap: Option<fn(ArnSource) -> EventBinding> = match key.as_str() {
            "sqs" => Some(EventBinding::Sqs),
            "stream" => Some(EventBinding::Stream),
            "sns" => Some(EventBinding::Sns),
            _ => None,
        };
        let Some(wrap) = wrap else {
            let mut map = Map::new();
            map.insert(key, inner);
            return Ok(EventBinding::Other(Value::Object(map)));
        };
        ArnSource::decode(inner)
            .map(wrap)
            .map_err(|e| format!("invalid `{}` event: {}", key, e))
    }

    fn encode(&self) -> Value {
        let (key, source) = match self {
            EventBinding::Sqs(source) => ("sqs", source),
            EventBinding::Stream(source) => ("stream", source),
            EventBinding::Sns(source) => ("sns", source),
            EventBinding::Other(value) => return value.clone(),
        };
        let mut map = Map::new();
        map.insert(key.to_string(), source.encode());
        Value::Object(map)
    }
}

impl Serialize for EventBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EventBinding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        EventBinding::decode(value).map_err(D::Error::custom)
    }
}
