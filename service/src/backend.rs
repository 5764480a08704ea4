// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::future::Future;

use jid::{BareJid, Jid};
use minidom::Element;
use xmpp_parsers::data_forms::Field;
use xmpp_parsers::pubsub::{AffiliationAttribute, ItemId, NodeName, Subscription};

use crate::error::PubSubError;
use crate::feature::PubSubFeature;

/// The type of a node, as advertised in service discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// A leaf node, holding items.
    Leaf,

    /// A collection node, holding other nodes.
    Collection,
}

impl NodeType {
    /// The node type as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Leaf => "leaf",
            NodeType::Collection => "collection",
        }
    }
}

/// Discovery information about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// Whether the node is a leaf or a collection.
    pub node_type: NodeType,

    /// Meta-data fields describing the node, included in disco#info as a
    /// data form when non-empty.
    pub meta_data: Vec<Field>,
}

/// One subscription held at this service.
#[derive(Debug, Clone)]
pub struct SubscriptionInfo {
    /// The node subscribed to.
    pub node: NodeName,

    /// The subscribed entity.
    pub subscriber: Jid,

    /// The state of the subscription.
    pub state: Subscription,
}

/// Node configuration options as submitted by an owner.  The FORM_TYPE
/// control field has already been stripped.
pub type NodeOptions = BTreeMap<String, String>;

/// The store behind a publish-subscribe service.
///
/// Node, subscription and affiliation state live entirely behind this
/// trait; the dispatcher only translates between stanzas and these calls.
/// Every method resolves asynchronously, and every default implementation
/// refuses the operation with [`PubSubError::Unsupported`] naming the
/// feature involved, so a backend only implements what it supports.  The
/// requestor has been reduced to bare form before any call.
///
/// Implementations write plain `async fn`s:
///
/// ```
/// use jid::BareJid;
/// use minidom::Element;
/// use xmpp_parsers::pubsub::NodeName;
/// use xmpp_pubsub_service::{PubSubBackend, PubSubError};
///
/// struct Log;
///
/// impl PubSubBackend for Log {
///     async fn publish(
///         &self,
///         requestor: BareJid,
///         node: NodeName,
///         items: Vec<Element>,
///     ) -> Result<(), PubSubError> {
///         println!("{} published {} item(s) to {}", requestor, items.len(), node.0);
///         Ok(())
///     }
/// }
/// ```
pub trait PubSubBackend {
    /// Store items published to a node.
    fn publish(
        &self,
        requestor: BareJid,
        node: NodeName,
        items: Vec<Element>,
    ) -> impl Future<Output = Result<(), PubSubError>> + Send {
        let _ = (requestor, node, items);
        async { Err(PubSubError::Unsupported(PubSubFeature::Publish)) }
    }

    /// Subscribe `subscriber` to a node, returning the node and the
    /// resulting subscription state.
    fn subscribe(
        &self,
        requestor: BareJid,
        node: NodeName,
        subscriber: Jid,
    ) -> impl Future<Output = Result<(NodeName, Subscription), PubSubError>> + Send {
        let _ = (requestor, node, subscriber);
        async { Err(PubSubError::Unsupported(PubSubFeature::Subscribe)) }
    }

    /// Remove the subscription of `subscriber` from a node.
    fn unsubscribe(
        &self,
        requestor: BareJid,
        node: NodeName,
        subscriber: Jid,
    ) -> impl Future<Output = Result<(), PubSubError>> + Send {
        let _ = (requestor, node, subscriber);
        async { Err(PubSubError::Unsupported(PubSubFeature::Subscribe)) }
    }

    /// List the requestor’s subscriptions across the service.
    fn subscriptions(
        &self,
        requestor: BareJid,
    ) -> impl Future<Output = Result<Vec<SubscriptionInfo>, PubSubError>> + Send {
        let _ = requestor;
        async {
            Err(PubSubError::Unsupported(
                PubSubFeature::RetrieveSubscriptions,
            ))
        }
    }

    /// List the requestor’s affiliations across the service.
    fn affiliations(
        &self,
        requestor: BareJid,
    ) -> impl Future<Output = Result<Vec<(NodeName, AffiliationAttribute)>, PubSubError>> + Send
    {
        let _ = requestor;
        async {
            Err(PubSubError::Unsupported(
                PubSubFeature::RetrieveAffiliations,
            ))
        }
    }

    /// Create a node.  `node` is the requested identifier; the returned
    /// identifier may differ when the service assigns its own.
    fn create(
        &self,
        requestor: BareJid,
        node: Option<NodeName>,
    ) -> impl Future<Output = Result<NodeName, PubSubError>> + Send {
        let _ = (requestor, node);
        async { Err(PubSubError::Unsupported(PubSubFeature::CreateNodes)) }
    }

    /// The configuration offered to owners of newly created nodes.
    fn get_default_configuration(
        &self,
        requestor: BareJid,
    ) -> impl Future<Output = Result<Vec<Field>, PubSubError>> + Send {
        let _ = requestor;
        async { Err(PubSubError::Unsupported(PubSubFeature::RetrieveDefault)) }
    }

    /// The current configuration of a node.
    fn get_configuration(
        &self,
        requestor: BareJid,
        node: Option<NodeName>,
    ) -> impl Future<Output = Result<Vec<Field>, PubSubError>> + Send {
        let _ = (requestor, node);
        async { Err(PubSubError::Unsupported(PubSubFeature::ConfigNode)) }
    }

    /// Apply a submitted node configuration.
    fn set_configuration(
        &self,
        requestor: BareJid,
        node: NodeName,
        options: NodeOptions,
    ) -> impl Future<Output = Result<(), PubSubError>> + Send {
        let _ = (requestor, node, options);
        async { Err(PubSubError::Unsupported(PubSubFeature::ConfigNode)) }
    }

    /// Retrieve items from a node, as stored `<item/>` elements.  When
    /// both a maximum and explicit identifiers are given, resolving the
    /// combination is up to the backend.
    fn items(
        &self,
        requestor: BareJid,
        node: NodeName,
        max_items: Option<u32>,
        item_ids: Vec<ItemId>,
    ) -> impl Future<Output = Result<Vec<Element>, PubSubError>> + Send {
        let _ = (requestor, node, max_items, item_ids);
        async { Err(PubSubError::Unsupported(PubSubFeature::RetrieveItems)) }
    }

    /// Remove the given items from a node.
    fn retract(
        &self,
        requestor: BareJid,
        node: NodeName,
        item_ids: Vec<ItemId>,
    ) -> impl Future<Output = Result<(), PubSubError>> + Send {
        let _ = (requestor, node, item_ids);
        async { Err(PubSubError::Unsupported(PubSubFeature::RetractItems)) }
    }

    /// Remove all items from a node.
    fn purge(
        &self,
        requestor: BareJid,
        node: NodeName,
    ) -> impl Future<Output = Result<(), PubSubError>> + Send {
        let _ = (requestor, node);
        async { Err(PubSubError::Unsupported(PubSubFeature::PurgeNodes)) }
    }

    /// Delete a node altogether.
    fn delete(
        &self,
        requestor: BareJid,
        node: NodeName,
    ) -> impl Future<Output = Result<(), PubSubError>> + Send {
        let _ = (requestor, node);
        async { Err(PubSubError::Unsupported(PubSubFeature::DeleteNodes)) }
    }

    /// Discovery information about a node, or `None` when the node does
    /// not exist.
    fn get_node_info(
        &self,
        requestor: BareJid,
        node: NodeName,
    ) -> impl Future<Output = Result<Option<NodeInfo>, PubSubError>> + Send {
        let _ = (requestor, node);
        async { Ok(None) }
    }

    /// The nodes this requestor may see in disco#items.
    fn get_nodes(
        &self,
        requestor: BareJid,
    ) -> impl Future<Output = Result<Vec<NodeName>, PubSubError>> + Send {
        let _ = requestor;
        async { Ok(Vec::new()) }
    }

    /// Retrieval of per-subscription options.  `request` is the verbatim
    /// `<options/>` element; the returned payload, if any, goes into the
    /// IQ result.
    fn options_get(
        &self,
        requestor: BareJid,
        request: Element,
    ) -> impl Future<Output = Result<Option<Element>, PubSubError>> + Send {
        let _ = (requestor, request);
        async { Err(PubSubError::OptionsUnavailable) }
    }

    /// Submission of per-subscription options.
    fn options_set(
        &self,
        requestor: BareJid,
        request: Element,
    ) -> impl Future<Output = Result<Option<Element>, PubSubError>> + Send {
        let _ = (requestor, request);
        async { Err(PubSubError::OptionsUnavailable) }
    }

    /// Owner retrieval of node affiliations (`<affiliations/>` in the
    /// owner namespace, passed verbatim).
    fn manage_affiliations_get(
        &self,
        requestor: BareJid,
        request: Element,
    ) -> impl Future<Output = Result<Option<Element>, PubSubError>> + Send {
        let _ = (requestor, request);
        async {
            Err(PubSubError::Unsupported(
                PubSubFeature::ModifyAffiliations,
            ))
        }
    }

    /// Owner manipulation of node affiliations.
    fn manage_affiliations_set(
        &self,
        requestor: BareJid,
        request: Element,
    ) -> impl Future<Output = Result<Option<Element>, PubSubError>> + Send {
        let _ = (requestor, request);
        async {
            Err(PubSubError::Unsupported(
                PubSubFeature::ModifyAffiliations,
            ))
        }
    }

    /// Owner retrieval of node subscriptions.
    fn manage_subscriptions_get(
        &self,
        requestor: BareJid,
        request: Element,
    ) -> impl Future<Output = Result<Option<Element>, PubSubError>> + Send {
        let _ = (requestor, request);
        async {
            Err(PubSubError::Unsupported(
                PubSubFeature::ManageSubscriptions,
            ))
        }
    }

    /// Owner manipulation of node subscriptions.
    fn manage_subscriptions_set(
        &self,
        requestor: BareJid,
        request: Element,
    ) -> impl Future<Output = Result<Option<Element>, PubSubError>> + Send {
        let _ = (requestor, request);
        async {
            Err(PubSubError::Unsupported(
                PubSubFeature::ManageSubscriptions,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    struct Bare;

    impl PubSubBackend for Bare {}

    #[test]
    fn defaults_refuse_with_the_matching_feature() {
        let backend = Bare;
        let requestor = BareJid::new("hamlet@denmark.lit").unwrap();
        let node = NodeName(String::from("n"));

        let err = block_on(backend.publish(requestor.clone(), node.clone(), vec![])).unwrap_err();
        assert_eq!(err, PubSubError::Unsupported(PubSubFeature::Publish));

        let err = block_on(backend.create(requestor.clone(), None)).unwrap_err();
        assert_eq!(err, PubSubError::Unsupported(PubSubFeature::CreateNodes));

        // Unsubscribing advertises the same capability as subscribing.
        let err = block_on(backend.unsubscribe(
            requestor.clone(),
            node.clone(),
            Jid::from(requestor.clone()),
        ))
        .unwrap_err();
        assert_eq!(err, PubSubError::Unsupported(PubSubFeature::Subscribe));
    }

    #[test]
    fn discovery_defaults_are_empty() {
        let backend = Bare;
        let requestor = BareJid::new("hamlet@denmark.lit").unwrap();

        let info = block_on(backend.get_node_info(requestor.clone(), NodeName(String::from("n"))))
            .unwrap();
        assert!(info.is_none());

        let nodes = block_on(backend.get_nodes(requestor)).unwrap();
        assert!(nodes.is_empty());
    }
}
