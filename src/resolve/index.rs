//! The resolved index: logical name to local value.
//!
//! Built once per activation from a [`ResourceGraph`] and a
//! [`LocalEndpoint`]. Every parameter and every resource of a supported
//! kind gets exactly one entry; resources of other kinds get none. An
//! entry may carry no values (a parameter without a default, a resource
//! without a plain-string name), so a reference to it fails later in the
//! walker.
//!
//! ## Resolution rules
//!
//! | Kind   | Reference value                        | Attribute      |
//! |--------|----------------------------------------|----------------|
//! | topic  | `arn:aws:sns:<region>:<account>:<name>` | none           |
//! | queue  | `<scheme>://<host>/<account>/<name>`    | `arn:aws:sqs:<region>:<account>:<name>` (any attribute name) |
//! | bucket | `<name>`                               | none           |
//! | table  | `<name>`                               | none           |

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;

use crate::base::{LocalEndpoint, LogicalName};
use crate::graph::{Resource, ResourceGraph, ResourceKind};

/// The `Fn::GetAtt` attribute every supported attribute form is published under.
pub const ARN_ATTRIBUTE: &str = "Arn";

/// Where an index entry came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntrySource {
    /// A template parameter.
    Parameter,
    /// A resource of the given kind.
    Resource(ResourceKind),
}

/// The secondary value of an entry, reachable through `Fn::GetAtt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeValue {
    /// Attribute name, e.g. `Arn`.
    pub name: SmolStr,
    /// The concrete value.
    pub value: String,
}

/// One resolved logical name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Where the entry came from.
    pub source: EntrySource,
    /// What `Ref` resolves to. `None` for a parameter with no default.
    pub reference: Option<String>,
    /// What `Fn::GetAtt` resolves to, for kinds that expose one.
    pub attribute: Option<AttributeValue>,
}

impl IndexEntry {
    /// The attribute value, for kinds that expose one.
    ///
    /// Every `Fn::GetAtt` on the entry resolves to it, whatever attribute
    /// the expression names.
    pub fn attribute_value(&self) -> Option<&str> {
        self.attribute.as_ref().map(|attr| attr.value.as_str())
    }
}

/// Flat map from logical name to local values.
///
/// Immutable once built. A fresh activation builds a fresh index.
#[derive(Clone, Debug, Default)]
pub struct ResolvedIndex {
    entries: IndexMap<LogicalName, IndexEntry, FxBuildHasher>,
}

impl ResolvedIndex {
    /// Build the index for a graph.
    ///
    /// Parameters are registered first, then resources, in declaration
    /// order. A resource sharing a name with a parameter replaces it.
    pub fn build(graph: &ResourceGraph, endpoint: &LocalEndpoint) -> Self {
        let mut entries = IndexMap::with_capacity_and_hasher(graph.len(), FxBuildHasher);

        for (name, parameter) in graph.parameters() {
            tracing::debug!(name = %name, "registering parameter");
            entries.insert(
                name.clone(),
                IndexEntry {
                    source: EntrySource::Parameter,
                    reference: parameter.default.clone(),
                    attribute: None,
                },
            );
        }

        for (name, resource) in graph.resources() {
            let Some(entry) = resolve_resource(name, resource, endpoint) else {
                continue;
            };
            tracing::debug!(name = %name, kind = %resource.kind.display(), "registering resource");
            if let Some(previous) = entries.insert(name.clone(), entry) {
                tracing::warn!(
                    name = %name,
                    replaced = ?previous.source,
                    "resource shares its logical name with an earlier declaration"
                );
            }
        }

        Self { entries }
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    /// What `Ref name` resolves to.
    pub fn reference(&self, name: &str) -> Option<&str> {
        self.get(name)?.reference.as_deref()
    }

    /// What `Fn::GetAtt name.<any>` resolves to.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name)?.attribute_value()
    }

    /// Check if a name has an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over all entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&LogicalName, &IndexEntry)> + '_ {
        self.entries.iter()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply the resolution rule for a resource's kind.
///
/// Returns `None` for unsupported kinds. A supported kind whose
/// declared-name property is missing or not a plain string still gets an
/// entry, with no values.
fn resolve_resource(
    name: &LogicalName,
    resource: &Resource,
    endpoint: &LocalEndpoint,
) -> Option<IndexEntry> {
    if !resource.kind.is_supported() {
        tracing::debug!(name = %name, kind = %resource.kind, "skipping resource with no local emulation");
        return None;
    }

    let Some(declared) = resource.declared_name() else {
        tracing::warn!(
            name = %name,
            kind = %resource.kind,
            property = resource.kind.name_property().unwrap_or_default(),
            "resource has no plain-string name property; it has no local value"
        );
        return Some(IndexEntry {
            source: EntrySource::Resource(resource.kind.clone()),
            reference: None,
            attribute: None,
        });
    };

    let (reference, attribute) = match &resource.kind {
        ResourceKind::Topic => (endpoint.arn("sns", declared), None),
        ResourceKind::Queue => (
            endpoint.queue_url(declared),
            Some(AttributeValue {
                name: SmolStr::new_static(ARN_ATTRIBUTE),
                value: endpoint.arn("sqs", declared),
            }),
        ),
        ResourceKind::Bucket | ResourceKind::Table => (declared.to_string(), None),
        ResourceKind::Other(_) => return None,
    };

    Some(IndexEntry {
        source: EntrySource::Resource(resource.kind.clone()),
        reference: Some(reference),
        attribute,
    })
}
