// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use core::fmt;

use crate::ns;

/// The XEP-0060 feature vocabulary.
///
/// A service advertises the features it supports in disco#info, and names
/// one of them in the `<unsupported/>` application condition when it
/// rejects a request it does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PubSubFeature {
    /// Publishing items to a node.
    Publish,

    /// Subscribing and unsubscribing.
    Subscribe,

    /// Creation of nodes.
    CreateNodes,

    /// Retrieval of the entities’ own subscriptions.
    RetrieveSubscriptions,

    /// Retrieval of the entities’ own affiliations.
    RetrieveAffiliations,

    /// Retrieval and manipulation of node configuration.
    ConfigNode,

    /// Retrieval of the default node configuration.
    RetrieveDefault,

    /// Retrieval of items from a node.
    RetrieveItems,

    /// Retraction of published items.
    RetractItems,

    /// Purging all items from a node.
    PurgeNodes,

    /// Deletion of nodes.
    DeleteNodes,

    /// Owner-side manipulation of node affiliations.
    ModifyAffiliations,

    /// Owner-side manipulation of node subscriptions.
    ManageSubscriptions,

    /// Per-subscription options.  Only ever named in errors, when a
    /// service rejects an options request.
    SubscriptionOptionsUnavailable,
}

impl PubSubFeature {
    /// The feature name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PubSubFeature::Publish => "publish",
            PubSubFeature::Subscribe => "subscribe",
            PubSubFeature::CreateNodes => "create-nodes",
            PubSubFeature::RetrieveSubscriptions => "retrieve-subscriptions",
            PubSubFeature::RetrieveAffiliations => "retrieve-affiliations",
            PubSubFeature::ConfigNode => "config-node",
            PubSubFeature::RetrieveDefault => "retrieve-default",
            PubSubFeature::RetrieveItems => "retrieve-items",
            PubSubFeature::RetractItems => "retract-items",
            PubSubFeature::PurgeNodes => "purge-nodes",
            PubSubFeature::DeleteNodes => "delete-nodes",
            PubSubFeature::ModifyAffiliations => "modify-affiliations",
            PubSubFeature::ManageSubscriptions => "manage-subscriptions",
            PubSubFeature::SubscriptionOptionsUnavailable => "subscription-options-unavailable",
        }
    }

    /// The disco#info feature var, `pubsub#<feature>`.
    pub fn var(&self) -> String {
        format!("{}#{}", ns::PUBSUB, self.as_str())
    }
}

impl fmt::Display for PubSubFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
