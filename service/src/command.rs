// Copyright (c) 2026 xmpp-pubsub-service contributors.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use minidom::Element;

use crate::ns;

/// The request kind of an incoming info/query stanza.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IqKind {
    /// An `<iq type='get'/>`.
    Get,

    /// An `<iq type='set'/>`.
    Set,
}

/// A publish-subscribe operation, identified by the shape of the request.
///
/// Matching is keyed on the IQ kind, the namespace of the `<pubsub/>`
/// payload (plain or `#owner`), and the name of its first child element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Publish items to a node.
    Publish,

    /// Subscribe an entity to a node.
    Subscribe,

    /// Remove a subscription.
    Unsubscribe,

    /// Retrieve per-subscription options.
    OptionsGet,

    /// Change per-subscription options.
    OptionsSet,

    /// Retrieve the requester’s subscriptions.
    Subscriptions,

    /// Retrieve the requester’s affiliations.
    Affiliations,

    /// Create a node.
    Create,

    /// Retrieve items from a node.
    Items,

    /// Retract items from a node.
    Retract,

    /// Retrieve the default node configuration.
    Default,

    /// Retrieve a node configuration form.
    ConfigureGet,

    /// Submit a node configuration form.
    ConfigureSet,

    /// Remove all items from a node.
    Purge,

    /// Delete a node.
    Delete,

    /// Owner retrieval of node affiliations.
    AffiliationsGet,

    /// Owner manipulation of node affiliations.
    AffiliationsSet,

    /// Owner retrieval of node subscriptions.
    SubscriptionsGet,

    /// Owner manipulation of node subscriptions.
    SubscriptionsSet,
}

impl Command {
    /// Match a `<pubsub/>` payload against the request grammar.
    ///
    /// Returns the command together with the child element carrying its
    /// parameters.  Anything that does not match the grammar is not ours
    /// to answer and yields `None`.  Matching never reads attributes and
    /// never mutates the stanza.
    pub fn match_request<'a>(kind: IqKind, payload: &'a Element) -> Option<(Command, &'a Element)> {
        let owner = if payload.is("pubsub", ns::PUBSUB) {
            false
        } else if payload.is("pubsub", ns::PUBSUB_OWNER) {
            true
        } else {
            return None;
        };

        let child = payload.children().next()?;
        if !child.has_ns(if owner { ns::PUBSUB_OWNER } else { ns::PUBSUB }) {
            return None;
        }

        let command = match (kind, owner, child.name()) {
            (IqKind::Set, false, "publish") => Command::Publish,
            (IqKind::Set, false, "subscribe") => Command::Subscribe,
            (IqKind::Set, false, "unsubscribe") => Command::Unsubscribe,
            (IqKind::Get, false, "options") => Command::OptionsGet,
            (IqKind::Set, false, "options") => Command::OptionsSet,
            (IqKind::Get, false, "subscriptions") => Command::Subscriptions,
            (IqKind::Get, false, "affiliations") => Command::Affiliations,
            (IqKind::Set, false, "create") => Command::Create,
            (IqKind::Get, false, "items") => Command::Items,
            (IqKind::Set, false, "retract") => Command::Retract,
            (IqKind::Get, true, "default") => Command::Default,
            (IqKind::Get, true, "configure") => Command::ConfigureGet,
            (IqKind::Set, true, "configure") => Command::ConfigureSet,
            (IqKind::Set, true, "purge") => Command::Purge,
            (IqKind::Set, true, "delete") => Command::Delete,
            (IqKind::Get, true, "affiliations") => Command::AffiliationsGet,
            (IqKind::Set, true, "affiliations") => Command::AffiliationsSet,
            (IqKind::Get, true, "subscriptions") => Command::SubscriptionsGet,
            (IqKind::Set, true, "subscriptions") => Command::SubscriptionsSet,
            _ => return None,
        };
        Some((command, child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(ns: &str, child: &str) -> Element {
        format!("<pubsub xmlns='{ns}'><{child} xmlns='{ns}'/></pubsub>")
            .parse()
            .unwrap()
    }

    #[test]
    fn full_table() {
        use Command::*;
        let table: &[(IqKind, &str, &str, Command)] = &[
            (IqKind::Set, ns::PUBSUB, "publish", Publish),
            (IqKind::Set, ns::PUBSUB, "subscribe", Subscribe),
            (IqKind::Set, ns::PUBSUB, "unsubscribe", Unsubscribe),
            (IqKind::Get, ns::PUBSUB, "options", OptionsGet),
            (IqKind::Set, ns::PUBSUB, "options", OptionsSet),
            (IqKind::Get, ns::PUBSUB, "subscriptions", Subscriptions),
            (IqKind::Get, ns::PUBSUB, "affiliations", Affiliations),
            (IqKind::Set, ns::PUBSUB, "create", Create),
            (IqKind::Get, ns::PUBSUB, "items", Items),
            (IqKind::Set, ns::PUBSUB, "retract", Retract),
            (IqKind::Get, ns::PUBSUB_OWNER, "default", Default),
            (IqKind::Get, ns::PUBSUB_OWNER, "configure", ConfigureGet),
            (IqKind::Set, ns::PUBSUB_OWNER, "configure", ConfigureSet),
            (IqKind::Set, ns::PUBSUB_OWNER, "purge", Purge),
            (IqKind::Set, ns::PUBSUB_OWNER, "delete", Delete),
            (IqKind::Get, ns::PUBSUB_OWNER, "affiliations", AffiliationsGet),
            (IqKind::Set, ns::PUBSUB_OWNER, "affiliations", AffiliationsSet),
            (IqKind::Get, ns::PUBSUB_OWNER, "subscriptions", SubscriptionsGet),
            (IqKind::Set, ns::PUBSUB_OWNER, "subscriptions", SubscriptionsSet),
        ];
        assert_eq!(table.len(), 19);
        for (kind, namespace, child, expected) in table {
            let elem = payload(namespace, child);
            let (command, matched) = Command::match_request(*kind, &elem).unwrap();
            assert_eq!(command, *expected);
            assert_eq!(matched.name(), *child);
        }
    }

    #[test]
    fn wrong_kind_does_not_match() {
        let elem = payload(ns::PUBSUB, "publish");
        assert!(Command::match_request(IqKind::Get, &elem).is_none());

        let elem = payload(ns::PUBSUB_OWNER, "default");
        assert!(Command::match_request(IqKind::Set, &elem).is_none());
    }

    #[test]
    fn namespaces_do_not_cross() {
        // <default/> only exists in the owner namespace.
        let elem = payload(ns::PUBSUB, "default");
        assert!(Command::match_request(IqKind::Get, &elem).is_none());
        // ... and <items/> only in the plain one.
        let elem = payload(ns::PUBSUB_OWNER, "items");
        assert!(Command::match_request(IqKind::Get, &elem).is_none());
    }

    #[test]
    fn child_in_foreign_namespace_is_ignored() {
        let elem: Element = "<pubsub xmlns='http://jabber.org/protocol/pubsub'><publish xmlns='urn:example:other' node='x'/></pubsub>"
            .parse()
            .unwrap();
        assert!(Command::match_request(IqKind::Set, &elem).is_none());
    }

    #[test]
    fn empty_payload_does_not_match() {
        let elem: Element = "<pubsub xmlns='http://jabber.org/protocol/pubsub'/>"
            .parse()
            .unwrap();
        assert!(Command::match_request(IqKind::Set, &elem).is_none());
    }

    #[test]
    fn foreign_payload_does_not_match() {
        let elem: Element = "<query xmlns='http://jabber.org/protocol/disco#info'/>"
            .parse()
            .unwrap();
        assert!(Command::match_request(IqKind::Get, &elem).is_none());
    }
}
